mod adhoc;
mod column_not_found;
mod commit_failed;
mod connection;
mod driver;
mod invalid_argument;
mod invalid_schema;
mod not_writeable;
mod record_not_found;
mod table_not_found;
mod transaction_timeout;
mod unsupported_feature;
mod validation;
mod write_failed;

use adhoc::AdhocError;
use column_not_found::ColumnNotFoundError;
use commit_failed::CommitFailedError;
use connection::ConnectionError;
use driver::DriverError;
use invalid_argument::InvalidArgumentError;
use invalid_schema::InvalidSchemaError;
use not_writeable::NotWriteableError;
use record_not_found::RecordNotFoundError;
use std::sync::Arc;
use table_not_found::TableNotFoundError;
use transaction_timeout::TransactionTimeoutError;
use unsupported_feature::UnsupportedFeatureError;
use validation::ValidationError;
use write_failed::WriteFailedError;

pub use write_failed::WriteOp;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Tabula.
///
/// The error is a single pointer wide. It carries a kind and, optionally, the
/// error that caused it; [`Error::context`] builds such chains.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => {
                    assert!(
                        inner.cause.is_none(),
                        "consequent error must not already have a cause"
                    );
                    inner.kind
                }
                Err(_) => panic!("consequent error must not be shared"),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    /// The error that caused this one, if any.
    pub fn cause(&self) -> Option<&Error> {
        self.inner.as_ref().and_then(|inner| inner.cause.as_ref())
    }

    /// The innermost error of the chain.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) = err.cause() {
            err = cause;
        }
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.cause()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Creates an ad-hoc error from format arguments. Prefer the `err!` and
    /// `bail!` macros.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args)))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Some(cause) = self.cause() {
            return Some(cause);
        }

        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Connection(err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    InvalidArgument(InvalidArgumentError),
    InvalidSchema(InvalidSchemaError),
    TableNotFound(TableNotFoundError),
    ColumnNotFound(ColumnNotFoundError),
    RecordNotFound(RecordNotFoundError),
    NotWriteable(NotWriteableError),
    TransactionTimeout(TransactionTimeoutError),
    WriteFailed(WriteFailedError),
    CommitFailed(CommitFailedError),
    Connection(ConnectionError),
    Driver(DriverError),
    UnsupportedFeature(UnsupportedFeatureError),
    Validation(ValidationError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            InvalidArgument(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            TableNotFound(err) => core::fmt::Display::fmt(err, f),
            ColumnNotFound(err) => core::fmt::Display::fmt(err, f),
            RecordNotFound(err) => core::fmt::Display::fmt(err, f),
            NotWriteable(err) => core::fmt::Display::fmt(err, f),
            TransactionTimeout(err) => core::fmt::Display::fmt(err, f),
            WriteFailed(err) => core::fmt::Display::fmt(err, f),
            CommitFailed(err) => core::fmt::Display::fmt(err, f),
            Connection(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
            Validation(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown tabula error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::driver(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::driver(err)
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = err!("root cause");
        let mid = err!("middle context");
        let top = err!("top context");

        let chained = root.context(mid).context(top);
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn table_not_found() {
        let err = Error::table_not_found("guestbook");
        assert!(err.is_table_not_found());
        assert_eq!(err.to_string(), "table not found: guestbook");
    }

    #[test]
    fn column_not_found() {
        let err = Error::column_not_found("guestbook", "nope");
        assert!(err.is_column_not_found());
        assert_eq!(err.to_string(), "column not found: guestbook.nope");
    }

    #[test]
    fn commit_failed_wraps_cause() {
        let cause = Error::driver(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk on fire",
        ))
        .context(Error::write_failed(WriteOp::Update, "guestbook.7"));
        let err = cause.context(Error::commit_failed(1));

        assert!(err.is_commit_failed());
        assert!(err.cause().unwrap().is_not_updated());
        assert!(err.root().is_driver());
        assert_eq!(
            err.to_string(),
            "commit failed at queued write #2: could not update guestbook.7: database error: disk on fire"
        );
    }

    #[test]
    fn commit_failed_outside_a_write() {
        let err = err!("connection reset").context(Error::commit_not_finished());
        assert!(err.is_commit_failed());
        assert_eq!(
            err.to_string(),
            "commit failed: transaction could not be committed: connection reset"
        );

        assert!(Error::commit_not_started().is_commit_failed());
    }

    #[test]
    fn record_not_found_with_context() {
        let err = Error::record_not_found("guestbook.7")
            .context(err!("select failed"));
        assert_eq!(err.to_string(), "select failed: record not found: guestbook.7");
        assert!(err.root().is_record_not_found());
    }

    #[test]
    fn write_failed_kinds() {
        assert!(Error::write_failed(WriteOp::Insert, "t.*").is_not_created());
        assert!(Error::write_failed(WriteOp::Update, "t.1").is_not_updated());
        assert!(Error::write_failed(WriteOp::Remove, "t.1").is_not_deleted());
        assert!(!Error::write_failed(WriteOp::Remove, "t.1").is_not_created());
    }

    #[test]
    fn validation_message() {
        let err = Error::validation("guestbook", "guestbook_id", "expected integer, got \"abc\"");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "invalid value for guestbook.guestbook_id: expected integer, got \"abc\""
        );
    }
}
