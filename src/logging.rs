use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use thiserror::Error;

use crate::config::{LogTarget, LoggingConfig};

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("unknown log level `{0}`")]
    Level(String),

    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no log file configured and HOME is not set")]
    NoHome,

    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}

/// Default log file: ~/.local/share/cligen/cligen.log.
pub fn default_log_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(Path::new(&home).join(".local/share/cligen/cligen.log"))
}

pub fn parse_level(level: &str) -> Result<LevelFilter, LogInitError> {
    LevelFilter::from_str(level.trim()).map_err(|_| LogInitError::Level(level.to_string()))
}

/// Install a global logger for hosts that do not bring their own.
///
/// Nothing is installed when the level is `off`. A second call fails with
/// [`LogInitError::SetLogger`].
pub fn init(config: &LoggingConfig) -> Result<(), LogInitError> {
    let level = parse_level(&config.level)?;
    if level == LevelFilter::Off {
        return Ok(());
    }
    let log_config = ConfigBuilder::new().set_thread_level(LevelFilter::Off).build();

    match config.target {
        LogTarget::Stderr => {
            TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto)?;
        }
        LogTarget::File => {
            let path = match &config.file {
                Some(path) => path.clone(),
                None => default_log_path().ok_or(LogInitError::NoHome)?,
            };
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| LogInitError::Open {
                    path: path.clone(),
                    source,
                })?;
            WriteLogger::init(level, log_config, file)?;
        }
    }
    log::debug!("logging at {level} to {:?}", config.target);
    Ok(())
}
