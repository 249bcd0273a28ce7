use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Dice service error: {0}")]
    DiceError(String),

    #[error("Invalid dice notation: {0}")]
    NotationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
