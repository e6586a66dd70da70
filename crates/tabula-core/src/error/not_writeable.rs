use super::Error;

/// Error when a write targets a schema or table flagged read-only.
#[derive(Debug)]
pub(super) struct NotWriteableError {
    target: Box<str>,
}

impl std::error::Error for NotWriteableError {}

impl core::fmt::Display for NotWriteableError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "not writeable: {} is read-only", self.target)
    }
}

impl Error {
    /// Creates a not writeable error for the named schema object.
    pub fn not_writeable(target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NotWriteable(NotWriteableError {
            target: target.into().into(),
        }))
    }

    /// Returns `true` if this error is a not writeable error.
    pub fn is_not_writeable(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NotWriteable(_))
    }
}
