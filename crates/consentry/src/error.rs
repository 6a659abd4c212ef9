// error.rs — Error types for the consent engine.

use thiserror::Error;

/// Errors that can occur in the consent subsystem.
///
/// Engine action paths never surface these to the caller: configuration
/// faults degrade the engine at construction, and store write failures are
/// logged and swallowed mid-pass. The `Result` forms exist for library
/// callers driving the stores directly.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize stored consent data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A capability descriptor was supplied with an empty name.
    #[error("capability with empty name at position {0}")]
    EmptyCapabilityName(usize),

    /// Two capability descriptors share a name.
    #[error("duplicate capability name: {0}")]
    DuplicateCapability(String),

    /// The presentation surface is missing a required control.
    #[error("missing surface control: {0}")]
    MissingControl(String),
}
