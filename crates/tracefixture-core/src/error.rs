use thiserror::Error;

/// Core error type shared across tracefixture crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The fixture configuration violates a documented bound.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by tracefixture crates.
pub type Result<T> = std::result::Result<T, Error>;
