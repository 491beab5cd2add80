//! Run configuration.
//!
//! Values resolve in two layers: `MODELWATCH_*` environment variables first,
//! then command-line flags on top. Empty environment values count as unset so
//! a scheduler template can leave placeholders blank.

use anyhow::{Context, Result, anyhow, bail};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG: &str = "https://openrouter.ai/api/v1/models";
pub const DEFAULT_URL_BASE: &str = "https://openrouter.ai";
pub const DEFAULT_BASELINE: &str = "modelwatch-baseline.txt";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_CATALOG: &str = "MODELWATCH_CATALOG";
pub const ENV_URL_BASE: &str = "MODELWATCH_URL_BASE";
pub const ENV_BASELINE: &str = "MODELWATCH_BASELINE";
pub const ENV_WEBHOOK_URL: &str = "MODELWATCH_WEBHOOK_URL";
pub const ENV_TIMEOUT_SECS: &str = "MODELWATCH_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Fully resolved settings for one run.
pub struct MonitorConfig {
    /// Catalog URL or local path.
    pub catalog: String,
    /// Prefix joined with each model slug to build detail-page URLs.
    pub url_base: String,
    pub baseline_path: PathBuf,
    /// Webhook for notifications; `None` prints to stdout instead.
    pub webhook_url: Option<String>,
    /// Bound applied to every network call.
    pub timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG.to_string(),
            url_base: DEFAULT_URL_BASE.to_string(),
            baseline_path: PathBuf::from(DEFAULT_BASELINE),
            webhook_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl MonitorConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(value) = get(ENV_CATALOG) {
            config.catalog = value;
        }
        if let Some(value) = get(ENV_URL_BASE) {
            config.url_base = value;
        }
        if let Some(value) = get(ENV_BASELINE) {
            config.baseline_path = PathBuf::from(value);
        }
        config.webhook_url = get(ENV_WEBHOOK_URL);
        if let Some(value) = get(ENV_TIMEOUT_SECS) {
            config.timeout =
                parse_timeout(&value).with_context(|| format!("invalid {ENV_TIMEOUT_SECS}"))?;
        }
        Ok(config)
    }

    /// Layer command-line flags over the environment-derived values.
    pub fn apply(&mut self, overrides: &CliOverrides) {
        if let Some(value) = &overrides.catalog {
            self.catalog = value.clone();
        }
        if let Some(value) = &overrides.url_base {
            self.url_base = value.clone();
        }
        if let Some(value) = &overrides.baseline_path {
            self.baseline_path = value.clone();
        }
        if let Some(value) = &overrides.webhook_url {
            self.webhook_url = Some(value.clone());
        }
        if let Some(value) = overrides.timeout {
            self.timeout = value;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Values supplied on the command line; `None` keeps the environment value.
pub struct CliOverrides {
    pub catalog: Option<String>,
    pub url_base: Option<String>,
    pub baseline_path: Option<PathBuf>,
    pub webhook_url: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CliAction {
    #[default]
    Run,
    ShowBaseline,
    Help,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Parsed command line.
pub struct Cli {
    pub action: CliAction,
    pub verbose: bool,
    pub overrides: CliOverrides,
}

impl Cli {
    /// Parse flags, excluding the program name.
    pub fn parse_from(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut cli = Cli::default();
        let mut args = args.into_iter();
        while let Some(raw) = args.next() {
            let flag = raw
                .to_str()
                .ok_or_else(|| anyhow!("Invalid UTF-8 in argument {:?}", raw))?;
            match flag {
                "--catalog" => cli.overrides.catalog = Some(next_value(&mut args, flag)?),
                "--url-base" => cli.overrides.url_base = Some(next_value(&mut args, flag)?),
                "--baseline" => {
                    cli.overrides.baseline_path = Some(PathBuf::from(next_value(&mut args, flag)?))
                }
                "--webhook" => cli.overrides.webhook_url = Some(next_value(&mut args, flag)?),
                "--timeout" => {
                    let value = next_value(&mut args, flag)?;
                    cli.overrides.timeout =
                        Some(parse_timeout(&value).context("invalid --timeout")?);
                }
                "--verbose" | "-v" => cli.verbose = true,
                "--show-baseline" => cli.action = CliAction::ShowBaseline,
                "--help" | "-h" => cli.action = CliAction::Help,
                other => bail!("Unknown argument: {other}"),
            }
        }
        Ok(cli)
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("Missing value for {flag}"))?;
    value
        .into_string()
        .map_err(|raw| anyhow!("Invalid UTF-8 in value for {flag}: {:?}", raw))
}

fn parse_timeout(value: &str) -> Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("expected whole seconds, got '{value}'"))?;
    if secs == 0 {
        bail!("timeout must be at least one second");
    }
    Ok(Duration::from_secs(secs))
}

pub fn usage() -> &'static str {
    "Usage: modelwatch [options]\n\nOptions:\n  --catalog URL|PATH   Catalog endpoint or local JSON file (env MODELWATCH_CATALOG)\n  --url-base URL       Prefix for model detail links (env MODELWATCH_URL_BASE)\n  --baseline PATH      Baseline file (env MODELWATCH_BASELINE)\n  --webhook URL        POST notifications here instead of stdout (env MODELWATCH_WEBHOOK_URL)\n  --timeout SECS       Network timeout in seconds (env MODELWATCH_TIMEOUT_SECS)\n  --show-baseline      Print the stored baseline and exit\n  --verbose, -v        Debug logging (RUST_LOG overrides)\n  --help, -h           Show this message\n"
}
