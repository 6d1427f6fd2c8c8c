use thiserror::Error;

/// Reasons a datagram is not accepted as a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Message too short: {0} bytes")]
    TooShort(usize),

    #[error("Message is a response, not a query")]
    NotQuery,

    #[error("Expected exactly one question, got {0}")]
    QuestionCount(u16),

    #[error("Compressed or extended label in question name")]
    CompressedName,

    #[error("Non-ASCII byte in question name")]
    NonAsciiName,

    #[error("Question name exceeds 253 bytes")]
    NameTooLong,

    #[error("Message truncated inside the question section")]
    Truncated,
}
