use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Unknown trigger zone: {0}")]
    UnknownZone(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
