use thiserror::Error;

/// Errors that can occur while reading from or writing to a Bundle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran out of bytes before the value was complete
    #[error("Unexpected end of Bundle: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A length-prefixed string did not contain valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// A blob was too long to be described by its u32 length prefix
    #[error("Length {length} does not fit in a u32 length prefix")]
    LengthOverflow { length: usize },
}
