use super::Error;

/// Error establishing a connection to the database.
#[derive(Debug)]
pub(super) struct ConnectionError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection failed: {}", self.inner)
    }
}

impl Error {
    /// Creates a connection error from the vendor error that caused it.
    pub fn connection(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError { inner: err.into() }))
    }

    /// Returns `true` if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Connection(_))
    }
}
