use super::Error;

/// The kind of queued write that failed to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Insert,
    Update,
    Remove,
}

/// A specific queued write did not apply. Surfaces as `NotCreated`,
/// `NotUpdated` or `NotDeleted` depending on the operation.
#[derive(Debug)]
pub(super) struct WriteFailedError {
    op: WriteOp,
    target: Box<str>,
}

impl std::error::Error for WriteFailedError {}

impl core::fmt::Display for WriteFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let verb = match self.op {
            WriteOp::Insert => "create",
            WriteOp::Update => "update",
            WriteOp::Remove => "delete",
        };
        write!(f, "could not {verb} {}", self.target)
    }
}

impl Error {
    /// Creates an error for a queued write that failed to apply.
    pub fn write_failed(op: WriteOp, target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::WriteFailed(WriteFailedError {
            op,
            target: target.into().into(),
        }))
    }

    fn is_write_failed(&self, expected: WriteOp) -> bool {
        matches!(self.kind(), super::ErrorKind::WriteFailed(err) if err.op == expected)
    }

    /// Returns `true` if a queued insert failed.
    pub fn is_not_created(&self) -> bool {
        self.is_write_failed(WriteOp::Insert)
    }

    /// Returns `true` if a queued update failed.
    pub fn is_not_updated(&self) -> bool {
        self.is_write_failed(WriteOp::Update)
    }

    /// Returns `true` if a queued remove failed.
    pub fn is_not_deleted(&self) -> bool {
        self.is_write_failed(WriteOp::Remove)
    }
}
