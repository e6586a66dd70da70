use super::Error;

/// Wraps the failure that stopped the transaction queue from committing.
#[derive(Debug)]
pub(super) struct CommitFailedError {
    stage: Stage,
}

#[derive(Debug)]
enum Stage {
    Begin,

    /// Zero-based index of the queued write that failed
    Write(usize),

    Finish,
}

impl std::error::Error for CommitFailedError {}

impl core::fmt::Display for CommitFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.stage {
            Stage::Begin => f.write_str("commit failed: transaction could not begin"),
            Stage::Write(position) => {
                write!(f, "commit failed at queued write #{}", position + 1)
            }
            Stage::Finish => f.write_str("commit failed: transaction could not be committed"),
        }
    }
}

impl Error {
    /// Creates a commit failed error. `position` is the zero-based index of
    /// the queued write that failed; attach the failure with
    /// [`Error::context`].
    pub fn commit_failed(position: usize) -> Error {
        CommitFailedError::new(Stage::Write(position))
    }

    /// The driver refused to open the transaction.
    pub fn commit_not_started() -> Error {
        CommitFailedError::new(Stage::Begin)
    }

    /// Every write was sent but the driver failed to commit them.
    pub fn commit_not_finished() -> Error {
        CommitFailedError::new(Stage::Finish)
    }

    /// Returns `true` if this error is a commit failure.
    pub fn is_commit_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CommitFailed(_))
    }
}

impl CommitFailedError {
    fn new(stage: Stage) -> Error {
        Error::from(super::ErrorKind::CommitFailed(CommitFailedError { stage }))
    }
}
