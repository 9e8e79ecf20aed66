//! Error types for recoverable kernel failures.
//!
//! Broken invariants (out-of-order tasks, removing an empty position,
//! touching a dormant life form) are bugs and panic instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    /// Configuration values that cannot drive a simulation
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// No factory registered under this name
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    /// Malformed population description
    #[error("Population error: {0}")]
    Population(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<KernelError>,
    },
}

pub type Result<T> = std::result::Result<T, KernelError>;

impl KernelError {
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    #[must_use]
    pub fn unknown_species<S: Into<String>>(name: S) -> Self {
        Self::UnknownSpecies(name.into())
    }

    #[must_use]
    pub fn population<S: Into<String>>(msg: S) -> Self {
        Self::Population(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KernelError::config("grid too small");
        assert_eq!(err.to_string(), "Configuration error: grid too small");
    }

    #[test]
    fn test_error_context() {
        let err = KernelError::unknown_species("Dragon").with_context("loading population");
        assert!(err.to_string().contains("loading population"));
        assert!(err.to_string().contains("Dragon"));
    }

    #[test]
    fn test_from_toml_error() {
        let parse = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: KernelError = parse.into();
        assert!(matches!(err, KernelError::Toml(_)));
    }
}
