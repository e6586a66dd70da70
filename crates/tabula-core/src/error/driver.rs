use super::Error;

/// Failure reported by the database itself. Vendor error types never cross
/// the driver boundary; they are boxed in here.
#[derive(Debug)]
pub(super) struct DriverError {
    vendor: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.vendor.source()
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "database error: {}", self.vendor)
    }
}

impl Error {
    /// Wraps an error raised by `rusqlite`, `mysql_async`, the file store or
    /// any other backend.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            vendor: Box::new(err),
        }))
    }

    pub fn is_driver(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Driver(_))
    }
}
