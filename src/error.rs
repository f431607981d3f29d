use std::fmt;

/// Error returned when header metadata is rejected.
///
/// Sanitization is all-or-nothing: when this error is returned no
/// [`CanonicalMetadata`](crate::CanonicalMetadata) was produced.
///
/// # Examples
///
/// ```
/// use grpc_mock::{MetadataError, MetadataErrorKind};
///
/// let error = MetadataError::new(MetadataErrorKind::InvalidArgument, "bad key");
/// assert_eq!(error.kind(), MetadataErrorKind::InvalidArgument);
/// assert_eq!(error.message(), "bad key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataError {
    kind: MetadataErrorKind,
    message: String,
}

impl MetadataError {
    /// Creates a new metadata error.
    pub fn new(kind: MetadataErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(MetadataErrorKind::TypeMismatch, message)
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(MetadataErrorKind::InvalidArgument, message)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> MetadataErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "metadata rejected ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for MetadataError {}

/// Kind of metadata error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataErrorKind {
    /// The input, a key, or a value element has the wrong type.
    TypeMismatch,
    /// The type is right but the content is not: bad key syntax,
    /// disallowed characters, or a value that is neither string nor list.
    InvalidArgument,
}

impl fmt::Display for MetadataErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}
