mod backend;
mod paths;
mod settings;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{AbzPaths, BASE_DIR_ENV, ConfigError};
pub use settings::{AppConfig, EditorSettings, LoggingConfig, ServerConfig};
