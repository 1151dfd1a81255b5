//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid render configuration, render graph compile failures, unknown passes, missing
//! textures, IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("render graph compile error: {0}")]
    Compile(String),

    #[error("unknown pass '{id}'")]
    UnknownPass { id: String },

    #[error("missing texture '{id}'")]
    MissingTexture { id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn display_names_the_missing_texture() {
        let err = Error::MissingTexture { id: "albedo".into() };
        assert_eq!(err.to_string(), "missing texture 'albedo'");
    }

    #[test]
    fn display_names_the_unknown_pass() {
        let err = Error::UnknownPass { id: "main".into() };
        assert_eq!(err.to_string(), "unknown pass 'main'");
    }
}
