#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use modelwatch::{CatalogSource, FetchError, NotificationMessage, Notifier, NotifyError};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

pub fn modelwatch_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_modelwatch"))
}

/// Command for the CLI with every MODELWATCH_* variable cleared.
pub fn modelwatch_command() -> Command {
    let mut cmd = Command::new(modelwatch_binary());
    for key in [
        "MODELWATCH_CATALOG",
        "MODELWATCH_URL_BASE",
        "MODELWATCH_BASELINE",
        "MODELWATCH_WEBHOOK_URL",
        "MODELWATCH_TIMEOUT_SECS",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Catalog JSON in the `{"data": [...]}` envelope.
pub fn catalog_json(records: &[Value]) -> String {
    json!({ "data": records }).to_string()
}

pub fn ids_catalog(ids: &[&str]) -> String {
    let records: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    catalog_json(&records)
}

pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

/// Catalog source that always returns the same text.
pub struct FixedSource(pub String);

impl CatalogSource for FixedSource {
    fn fetch(&self) -> Result<String, FetchError> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "fixture".to_string()
    }
}

/// Notifier that records every message and optionally fails delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<NotificationMessage>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.messages.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.messages.borrow_mut().push(message.clone());
        if self.fail {
            return Err(NotifyError::Transport {
                url: "recording".to_string(),
                reason: "simulated outage".to_string(),
            });
        }
        Ok(())
    }
}

/// Single-request HTTP server on localhost.
///
/// The join handle yields the raw request (head and body) once the response
/// has been written.
pub struct OneShotServer {
    pub url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    pub fn start(status_line: &str, body: &str) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").context("binding test listener")?;
        let addr = listener.local_addr()?;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept test connection");
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).expect("read request line") == 0 {
                    break;
                }
                if let Some(value) = line
                    .to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(str::trim)
                {
                    content_length = value.parse().unwrap_or(0);
                }
                let end_of_head = line == "\r\n";
                request.push_str(&line);
                if end_of_head {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).expect("read request body");
            request.push_str(&String::from_utf8_lossy(&body));

            let mut stream = reader.into_inner();
            stream
                .write_all(response.as_bytes())
                .expect("write test response");
            stream.flush().ok();
            request
        });
        Ok(Self {
            url: format!("http://{addr}"),
            handle,
        })
    }

    pub fn request(self) -> String {
        self.handle.join().expect("test server thread panicked")
    }
}

/// Localhost listener that never accepts, so clients connect and then hang
/// waiting for a response.
pub struct SilentServer {
    pub url: String,
    _listener: TcpListener,
}

impl SilentServer {
    pub fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").context("binding silent listener")?;
        let addr = listener.local_addr()?;
        Ok(Self {
            url: format!("http://{addr}"),
            _listener: listener,
        })
    }
}
