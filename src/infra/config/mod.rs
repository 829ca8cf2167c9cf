pub mod run_config;

pub use run_config::{CONFIG_FILE_NAME, ConfigError, RunConfigFile};
