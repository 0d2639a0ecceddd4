/// Core error type for the cartoon pipeline.
///
/// Adapter crates map their specific failures into this closed set so the
/// fault boundary can decide by exhaustive matching what reaches the user:
/// a provider rejection is shown verbatim, everything else collapses into a
/// generic failure notice plus an operator-side report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// The provider explicitly rejected the request (non-zero envelope
    /// code). The message is user-correctable, e.g. a content-moderation
    /// rejection, and is delivered to the chat as-is.
    #[error("provider error: code={code}, message={message}")]
    Provider { code: i64, message: String },

    /// Network-level failure or a non-success HTTP status on either the
    /// file fetch or the transform call.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed provider envelope or nested payload. An infrastructure
    /// fault, never shown verbatim to the user.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("file not found: {0}")]
    NotFound(String),

    /// Unclassified fatal catch-all (messenger failures and the like).
    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
