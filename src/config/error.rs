use config::ConfigError as _ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("network not configured: {name:?}")]
    UnknownNetwork { name: String },

    #[error(transparent)]
    Config(#[from] _ConfigError),
}
