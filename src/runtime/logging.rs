use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{self, LoggingSettings};

/// Where log lines go: the configured file, else the state directory.
pub fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings
        .file
        .clone()
        .or_else(|| config::state_dir().map(|d| d.join("encore.log")))
}

fn open_log(path: &PathBuf) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. The terminal belongs to the TUI, so
/// output goes to a file; without a usable file, logs are discarded.
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let path = log_path(settings);
    let file = path.as_ref().and_then(|p| open_log(p).ok());
    let opened = file.is_some().then(|| path.clone()).flatten();

    let fmt = tracing_subscriber::fmt::layer().with_ansi(false);
    let installed = match file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.with_writer(Mutex::new(file)))
            .try_init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.with_writer(io::sink))
            .try_init(),
    };
    if let Err(e) = installed {
        debug!(error = %e, "keeping the already installed subscriber");
    }
    opened
}
