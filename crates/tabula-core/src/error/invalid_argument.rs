use super::Error;

/// Error when a caller passes a malformed address or an argument that does
/// not fit the requested operation.
#[derive(Debug)]
pub(super) struct InvalidArgumentError {
    message: Box<str>,
}

impl std::error::Error for InvalidArgumentError {}

impl core::fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgumentError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidArgument(_))
    }
}
