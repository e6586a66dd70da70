use super::Error;

/// Error when an address names a table the schema does not define.
#[derive(Debug)]
pub(super) struct TableNotFoundError {
    table: Box<str>,
}

impl std::error::Error for TableNotFoundError {}

impl core::fmt::Display for TableNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "table not found: {}", self.table)
    }
}

impl Error {
    /// Creates a table not found error.
    pub fn table_not_found(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TableNotFound(TableNotFoundError {
            table: table.into().into(),
        }))
    }

    /// Returns `true` if this error is a table not found error.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TableNotFound(_))
    }
}
