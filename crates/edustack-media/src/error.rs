//! Handler error types.

/// Errors raised by the media pipeline handlers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar {
        /// The variable name.
        name: &'static str,
    },

    /// The triggering event carried no records.
    #[error("upload event carried no records")]
    EmptyEvent,

    /// The triggering event record is missing a required field.
    #[error("upload event record is missing {field}")]
    MissingEventField {
        /// The absent field.
        field: &'static str,
    },

    /// The object key did not percent-decode to valid UTF-8.
    #[error("object key is not valid percent-encoded UTF-8: {key}")]
    KeyDecode {
        /// The raw key.
        key: String,
    },

    /// The object key is too shallow to carry a section identifier.
    ///
    /// Section ids are read positionally from the key's third path segment;
    /// shorter keys fail here instead of silently misindexing.
    #[error("cannot extract section id from key {key}: {segments} path segment(s), need at least 3")]
    SectionIdUnresolvable {
        /// The decoded object key.
        key: String,
        /// How many segments the key actually has.
        segments: usize,
    },

    /// A transcoding service call failed.
    #[error("transcoding service call failed: {operation}: {message}")]
    Service {
        /// The failed operation.
        operation: &'static str,
        /// The underlying failure description.
        message: String,
    },

    /// The transcoding service accepted the job but returned no id.
    #[error("transcoding service response carried no job id")]
    MissingJobId,

    /// Payload serialization failed.
    #[error("failed to serialize callback payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The status callback request failed.
    #[error("status callback request failed: {0}")]
    Callback(#[from] reqwest::Error),
}
