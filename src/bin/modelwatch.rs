//! Runs one catalog monitor pass.
//!
//! Intended to be invoked on a fixed interval by an external scheduler. Exit
//! status is 0 when the run completed (first-run initialization, no changes, or
//! new models announced, even if delivery failed), 1 when the catalog could not
//! be fetched or parsed or the baseline could not be written, and 2 on usage
//! errors.

use anyhow::{Context, Result};
use modelwatch::config::usage;
use modelwatch::{
    BaselineStore, CatalogLocation, Cli, CliAction, Monitor, MonitorConfig, Notifier,
    StdoutNotifier, WebhookNotifier,
};
use std::env;
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = match Cli::parse_from(env::args_os().skip(1)) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err:#}\n\n{}", usage());
            std::process::exit(2);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.action == CliAction::Help {
        print!("{}", usage());
        return Ok(());
    }

    init_logging(cli.verbose);

    let mut config = MonitorConfig::from_env()?;
    config.apply(&cli.overrides);
    let store = BaselineStore::new(&config.baseline_path);

    if cli.action == CliAction::ShowBaseline {
        return show_baseline(&store);
    }

    let source = CatalogLocation::parse(&config.catalog).into_source(config.timeout);
    let notifier: Box<dyn Notifier> = match &config.webhook_url {
        Some(url) => Box::new(WebhookNotifier::new(url.clone(), config.timeout)),
        None => Box::new(StdoutNotifier),
    };

    let outcome = Monitor::new(source.as_ref(), notifier.as_ref(), &store, &config.url_base)
        .run()
        .context("monitor run failed")?;
    info!(
        "run complete: {}",
        serde_json::to_string(&outcome).context("serializing run outcome")?
    );
    Ok(())
}

fn show_baseline(store: &BaselineStore) -> Result<()> {
    let ids = store
        .load()
        .with_context(|| format!("reading {}", store.path().display()))?
        .unwrap_or_default();
    let mut stdout = io::stdout().lock();
    for id in &ids {
        writeln!(stdout, "{id}")?;
    }
    info!("{} identifiers in {}", ids.len(), store.path().display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
