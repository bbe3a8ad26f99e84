//! Error types for the VITS2 text frontend and synthesis driver

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown cleaner: {0}")]
    UnknownCleaner(String),

    #[error("Duplicate symbol {symbol:?} at position {position} (first defined at {first})")]
    DuplicateSymbol {
        symbol: String,
        first: usize,
        position: usize,
    },

    #[error("Unknown symbol: {0:?}")]
    UnknownSymbol(String),

    #[error("Invalid symbol id {id} (table has {size} symbols)")]
    InvalidId { id: i64, size: usize },

    #[error("Invalid filler id: {0}")]
    InvalidFillerId(i64),

    #[error("Synthesis failed for utterance {index}: {reason}")]
    SynthesisFailed { index: String, reason: String },

    #[error("Failed to write output {name}: {reason}")]
    WriteFailed { name: String, reason: String },

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Audio encoding error: {0}")]
    AudioError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::ConfigError(e.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(e: hound::Error) -> Self {
        Error::AudioError(e.to_string())
    }
}
