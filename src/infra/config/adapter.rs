use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::config::{load, AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Reads the TOML config file, then applies command-line overrides on top.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
    base_url_override: Option<String>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            base_url_override: None,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        self.base_url_override = base_url.map(str::to_owned);
        self
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        let mut config = load(self.path.as_deref())?;

        if let Some(base_url) = &self.base_url_override {
            config.server.base_url = base_url.clone();
        }

        Ok(config)
    }
}
