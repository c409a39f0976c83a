//! Error types for the search crate.
//!
//! Only lexicon configuration and catalog decoding can fail. Tokenization,
//! query parsing and scoring are total functions and never return these.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while loading configuration or catalog data.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Reading a lexicon or catalog file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lexicon TOML could not be parsed
    #[error("Lexicon parse error: {0}")]
    LexiconParse(#[from] toml::de::Error),

    /// Lexicon could not be rendered back to TOML
    #[error("Lexicon serialize error: {0}")]
    LexiconSerialize(#[from] toml::ser::Error),

    /// Lexicon parsed but violates a structural rule
    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),

    /// Catalog JSON could not be decoded
    #[error("Catalog decode error: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Error code for integration with structured error reports.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// File could not be read
    Io = 11001,
    /// Lexicon TOML syntax or type error
    LexiconParse = 11002,
    /// Lexicon could not be serialized
    LexiconSerialize = 11003,
    /// Lexicon failed validation
    InvalidLexicon = 11004,
    /// Catalog JSON error
    Catalog = 11005,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::Io(_) => SearchErrorCode::Io,
            SearchError::LexiconParse(_) => SearchErrorCode::LexiconParse,
            SearchError::LexiconSerialize(_) => SearchErrorCode::LexiconSerialize,
            SearchError::InvalidLexicon(_) => SearchErrorCode::InvalidLexicon,
            SearchError::Catalog(_) => SearchErrorCode::Catalog,
        }
    }
}
