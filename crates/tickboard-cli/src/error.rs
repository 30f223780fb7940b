use thiserror::Error;
use tickboard_core::SinkError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickboard_core::ValidationError),

    #[error(transparent)]
    Config(#[from] tickboard_core::ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Render(#[from] SinkError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
            Self::Logging(_) => 10,
            Self::Render(SinkError::Encode(_)) => 4,
            Self::Render(_) => 6,
        }
    }
}
