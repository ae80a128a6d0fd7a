mod adapter;
mod app_config;
mod file_config;
mod loader;

pub use adapter::{ConfigAdapter, FileConfigAdapter};
pub use app_config::{AppConfig, LogConfig, ServerConfig, DEFAULT_BASE_URL};
pub use loader::load;
