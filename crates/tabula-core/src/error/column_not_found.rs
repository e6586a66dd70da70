use super::Error;

/// Error when an address or condition names a column the table does not
/// define.
#[derive(Debug)]
pub(super) struct ColumnNotFoundError {
    table: Box<str>,
    column: Box<str>,
}

impl std::error::Error for ColumnNotFoundError {}

impl core::fmt::Display for ColumnNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "column not found: {}.{}", self.table, self.column)
    }
}

impl Error {
    /// Creates a column not found error.
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ColumnNotFound(ColumnNotFoundError {
            table: table.into().into(),
            column: column.into().into(),
        }))
    }

    /// Returns `true` if this error is a column not found error.
    pub fn is_column_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ColumnNotFound(_))
    }
}
