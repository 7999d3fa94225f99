pub mod config;
pub mod path_processing;

pub use config::{CONFIG_FILE_NAME, CONFIG_PATH_ENV, ConfigError, PanelConfig, default_config_path, load_config_from_path};
pub use path_processing::expand_tilde;
