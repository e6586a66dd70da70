use std::time::Duration;

use super::{Error, ErrorKind};

/// Raised by callers that hold edit sessions open across requests once the
/// session outlives its allowed duration.
#[derive(Debug)]
pub(super) struct TransactionTimeoutError {
    duration: Duration,
}

impl Error {
    /// Creates a transaction timeout error for a session that was open for
    /// longer than `duration`.
    pub fn transaction_timeout(duration: Duration) -> Error {
        ErrorKind::TransactionTimeout(TransactionTimeoutError { duration }).into()
    }

    /// Returns `true` if this error is a transaction timeout.
    pub fn is_transaction_timeout(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransactionTimeout(_))
    }
}

impl std::error::Error for TransactionTimeoutError {}

impl core::fmt::Display for TransactionTimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transaction timed out after {:?}", self.duration)
    }
}
