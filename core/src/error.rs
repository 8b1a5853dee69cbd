use thiserror::Error;

pub type Result<T> = std::result::Result<T, TerrainError>;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // Raised by every consumer of the height field before generate() ran
    #[error("terrain has not been generated yet, call generate() first")]
    NotGenerated,

    #[error("invalid color band table: {0}")]
    InvalidColorBands(String),

    #[error("invalid color `{value}`: {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        TerrainError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
