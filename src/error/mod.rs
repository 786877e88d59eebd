use std::sync::Arc;

use crate::invalid::Invalid;

pub(crate) mod civil;
pub(crate) mod duration;
pub(crate) mod tz;
pub(crate) mod unit;

/// Creates a new ad hoc error with no causal chain.
///
/// This accepts the same arguments as the `format!` macro.
macro_rules! err {
    ($($tt:tt)*) => {{
        crate::error::Error::from_args(format_args!($($tt)*))
    }}
}

pub(crate) use err;

/// An error that can occur in this crate.
///
/// Most operations in this crate never return an error. Instead, values like
/// [`Instant`](crate::Instant), [`Duration`](crate::Duration) and
/// [`Interval`](crate::Interval) carry their own invalidity as a sentinel
/// (see [`Invalid`]). An `Error` shows up in a few other places:
///
/// * Time zone database lookup failure.
/// * Parse errors for POSIX time zone rules and unit names.
/// * Configuration problems, like an out of range week rule.
/// * Converting an invalid sentinel into a hard failure via one of the
/// `validate` methods.
///
/// An error renders as a chain of messages, from the outermost context down
/// to the root cause, separated by `: `. Beyond that, only a handful of
/// predicates like [`Error::is_range`] are offered for introspection.
#[derive(Clone)]
pub struct Error {
    /// Shared so that an error is one word wide and cheap to clone.
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates an error with the given message, usually built with
    /// [`format_args!`](format_args).
    ///
    /// # Example
    ///
    /// ```
    /// use calends::Error;
    ///
    /// let err = Error::from_args(format_args!("something failed"));
    /// assert_eq!(err.to_string(), "something failed");
    /// ```
    pub fn from_args(message: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(message)))
    }

    /// Returns true when the root cause of this error is a parameter outside
    /// of its allowed range.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::civil::WeekRules;
    ///
    /// assert!(WeekRules::new(8, 4).unwrap_err().is_range());
    /// ```
    pub fn is_range(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Range(_))
    }

    /// Returns true when this error was produced from an invalid value.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Instant};
    ///
    /// let fields = CalendarFields::new(2024, 13, 1, 0, 0, 0, 0);
    /// let err = Instant::from_calendar(fields, Zone::UTC)
    ///     .validate()
    ///     .unwrap_err();
    /// assert!(err.is_invalid());
    /// ```
    pub fn is_invalid(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Invalid(_))
    }

    /// Returns true when this error originated from a failed time zone
    /// lookup.
    ///
    /// # Example
    ///
    /// ```
    /// let err = calends::tz::db().get("Mars/Olympus_Mons").unwrap_err();
    /// assert!(err.is_zone_lookup());
    /// ```
    pub fn is_zone_lookup(&self) -> bool {
        use self::tz::Error as TzError;

        matches!(*self.root().kind(), ErrorKind::Tz(TzError::NotFound { .. }))
    }

    /// Returns the invalid value this error was created from, if any.
    pub fn invalid(&self) -> Option<&Invalid> {
        match *self.root().kind() {
            ErrorKind::Invalid(ref invalid) => Some(invalid),
            _ => None,
        }
    }
}

impl Error {
    /// Creates an error for a parameter, named by `what`, whose `given` value
    /// is outside `min..=max`.
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> Error {
        Error::from(ErrorKind::Range(RangeError::new(what, given, min, max)))
    }

    #[inline(never)]
    #[cold]
    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        let mut err = consequent.into_error();
        let inner = Arc::get_mut(&mut err.inner)
            .expect("consequent error must be freshly created");
        assert!(inner.cause.is_none(), "cause of consequence must be `None`");
        inner.cause = Some(self);
        err
    }

    /// Returns the innermost cause of this error.
    fn root(&self) -> &Error {
        let mut err = self;
        while let Some(ref cause) = err.inner.cause {
            err = cause;
        }
        err
    }

    /// Returns this error followed by each of its causes, outermost first.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    /// Returns the kind of this error.
    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl std::error::Error for Error {}

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
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

/// What went wrong, grouped by the area of the crate it came from.
#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Civil(self::civil::Error),
    Duration(self::duration::Error),
    Invalid(Invalid),
    Range(RangeError),
    Tz(self::tz::Error),
    Unit(self::unit::Error),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Adhoc(ref msg) => msg.fmt(f),
            Civil(ref err) => err.fmt(f),
            Duration(ref err) => err.fmt(f),
            Invalid(ref invalid) => invalid.fmt(f),
            Range(ref err) => err.fmt(f),
            Tz(ref err) => err.fmt(f),
            Unit(ref err) => err.fmt(f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(ErrorInner { kind, cause: None }) }
    }
}

impl From<Invalid> for Error {
    #[cold]
    #[inline(never)]
    fn from(invalid: Invalid) -> Error {
        ErrorKind::Invalid(invalid).into()
    }
}

/// A free form message, created via `Error::from_args` or `err!`.
struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    fn from_args(message: core::fmt::Arguments<'_>) -> AdhocError {
        AdhocError { message: message.to_string().into_boxed_str() }
    }
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.message, f)
    }
}

impl core::fmt::Debug for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.message, f)
    }
}

/// A named parameter outside of its inclusive bounds.
#[derive(Debug)]
struct RangeError {
    what: &'static str,
    given: i128,
    min: i128,
    max: i128,
}

impl RangeError {
    fn new(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> RangeError {
        RangeError { what, given: given.into(), min: min.into(), max: max.into() }
    }
}

impl std::error::Error for RangeError {}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let RangeError { what, given, min, max } = *self;
        write!(
            f,
            "parameter '{what}' with value {given} \
             is not in the required range of {min}..={max}",
        )
    }
}

/// Conversion into `Error` for the crate's area specific error types,
/// without exposing public `From` impls.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// Wraps the error of a `Result` as the cause of another error.
pub(crate) trait ErrorContext<T> {
    /// Makes the error in `self`, if any, the cause of `consequent`.
    fn context(self, consequent: impl IntoError) -> Result<T, Error>;

    /// Like `context`, but only builds the consequent on failure.
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: IntoError,
{
    fn context(self, consequent: impl IntoError) -> Result<T, Error> {
        self.map_err(|err| err.into_error().context(consequent))
    }

    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error> {
        self.map_err(|err| err.into_error().context(consequent()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_one_word() {
        assert_eq!(core::mem::size_of::<usize>(), core::mem::size_of::<Error>());
    }

    #[test]
    fn chain_display() {
        let root = Error::range("minutes", 2000, -1559, 1559);
        let err = root.context(Error::from_args(format_args!("bad offset")));
        insta::assert_snapshot!(
            err,
            @"bad offset: parameter 'minutes' with value 2000 is not in the required range of -1559..=1559",
        );
        assert!(err.is_range());
        assert!(!err.is_invalid());
    }
}
