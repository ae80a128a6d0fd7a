use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError};

/// Installs the global subscriber, writing to `config.file` or `default_file`.
///
/// The terminal UI owns stdout, so events always go to a file.
pub fn init(config: &LogConfig, default_file: &Path) -> Result<(), AppError> {
    let file = config.file.as_deref().unwrap_or(default_file);
    let appender = file_appender(file)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_target(true)
        .with_ansi(false)
        .with_writer(appender)
        .try_init()
        .map_err(AppError::LoggingInit)
}

fn file_appender(file: &Path) -> Result<RollingFileAppender, AppError> {
    let directory = file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = file
        .file_name()
        .ok_or_else(|| AppError::StoragePathResolution {
            details: format!("log file path {} has no file name", file.display()),
        })?;

    std::fs::create_dir_all(directory).map_err(|source| AppError::StorageDirCreate {
        path: directory.to_path_buf(),
        source,
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)
        .map_err(|error| AppError::LoggingInit(Box::new(error)))
}
