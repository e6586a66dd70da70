use super::Error;

/// Error when a value cannot be coerced into the declared type of the
/// column it is written to.
#[derive(Debug)]
pub(super) struct ValidationError {
    table: Box<str>,
    column: Box<str>,
    message: Box<str>,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid value for {}.{}: {}",
            self.table, self.column, self.message
        )
    }
}

impl Error {
    /// Creates a validation error for `table.column`.
    pub fn validation(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            table: table.into().into(),
            column: column.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }
}
