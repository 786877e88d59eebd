/*!
Invalid sentinels.

Values in this crate are never constructed in a half-valid state. Instead,
every [`Instant`](crate::Instant), [`Duration`](crate::Duration) and
[`Interval`](crate::Interval) is either valid or carries an [`Invalid`]
describing why it is not. Operations on invalid values propagate the
invalidity instead of failing.

When strict mode is enabled via
[`settings::set_throw_on_invalid`](crate::settings::set_throw_on_invalid),
constructing a new invalid value panics instead.
*/

use std::sync::Arc;

use crate::{error::Error, settings};

/// A machine readable reason for why a value is invalid.
///
/// The `Display` implementation renders the stable, lowercase reason string,
/// e.g., `unit out of range`.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reason {
    /// A calendar field, like a month of `13`, was out of its range.
    UnitOutOfRange,
    /// The time zone given could not be resolved.
    UnsupportedZone,
    /// The resulting millisecond count exceeds `±8.64e15`.
    MillisOutOfRange,
    /// Calendar fields from incompatible styles were mixed, e.g., a week
    /// number together with a month.
    ConflictingFields,
    /// A weekday was given that does not match the Gregorian date given.
    MismatchedWeekday,
    /// A quantity was not a finite number.
    InvalidInput,
    /// The start of an interval was invalid.
    MissingOrInvalidStart,
    /// The end of an interval was invalid.
    MissingOrInvalidEnd,
    /// The end of an interval came before its start.
    EndBeforeStart,
    /// A caller explicitly created an invalid value.
    UserDefined,
}

impl Reason {
    /// Returns the stable string form of this reason.
    pub fn as_str(&self) -> &'static str {
        use self::Reason::*;

        match *self {
            UnitOutOfRange => "unit out of range",
            UnsupportedZone => "unsupported zone",
            MillisOutOfRange => "timestamp out of range",
            ConflictingFields => "conflicting fields",
            MismatchedWeekday => "mismatched weekday",
            InvalidInput => "invalid input",
            MissingOrInvalidStart => "missing or invalid start",
            MissingOrInvalidEnd => "missing or invalid end",
            EndBeforeStart => "end before start",
            UserDefined => "user defined",
        }
    }
}

impl core::fmt::Display for Reason {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reason and explanation attached to an invalid value.
///
/// This is cheap to clone.
///
/// # Example
///
/// ```
/// use calends::{civil::CalendarFields, invalid::Reason, tz::Zone, Instant};
///
/// let instant = Instant::from_calendar(
///     CalendarFields::new(2024, 13, 1, 0, 0, 0, 0),
///     Zone::UTC,
/// );
/// let invalid = instant.invalid().unwrap();
/// assert_eq!(invalid.reason(), Reason::UnitOutOfRange);
/// assert_eq!(
///     invalid.explanation(),
///     Some("you specified 13 as a month, which is invalid"),
/// );
/// ```
#[derive(Clone)]
pub struct Invalid {
    inner: Arc<InvalidInner>,
}

#[derive(Debug, Eq, PartialEq)]
struct InvalidInner {
    reason: Reason,
    explanation: Option<Box<str>>,
}

impl Invalid {
    /// Create a new invalid value.
    ///
    /// # Panics
    ///
    /// This panics with the rendered error when strict mode is enabled.
    #[cold]
    #[inline(never)]
    pub(crate) fn new(reason: Reason, explanation: Option<String>) -> Invalid {
        let explanation = explanation.map(String::into_boxed_str);
        let invalid =
            Invalid { inner: Arc::new(InvalidInner { reason, explanation }) };
        debug!("created invalid value: {invalid}");
        if settings::throw_on_invalid() {
            panic!("{}", Error::from(invalid.clone()));
        }
        invalid
    }

    /// Like `Invalid::new`, but formats the explanation.
    #[cold]
    #[inline(never)]
    pub(crate) fn explain(
        reason: Reason,
        explanation: core::fmt::Arguments<'_>,
    ) -> Invalid {
        Invalid::new(reason, Some(explanation.to_string()))
    }

    /// Creates an invalid value with a caller provided explanation.
    ///
    /// Like every other way of creating an invalid value, this panics when
    /// strict mode is enabled.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{invalid::{Invalid, Reason}, Instant};
    ///
    /// let instant = Instant::from_invalid(Invalid::user_defined("no data"));
    /// assert!(!instant.is_valid());
    /// assert_eq!(instant.invalid().unwrap().reason(), Reason::UserDefined);
    /// assert_eq!(instant.invalid().unwrap().to_string(), "user defined: no data");
    /// ```
    pub fn user_defined(explanation: &str) -> Invalid {
        Invalid::new(Reason::UserDefined, Some(explanation.to_string()))
    }

    /// Returns an invalid value for a calendar field that is out of range.
    pub(crate) fn unit_out_of_range(unit: &str, value: i64) -> Invalid {
        Invalid::explain(
            Reason::UnitOutOfRange,
            format_args!("you specified {value} as a {unit}, which is invalid"),
        )
    }

    /// Combines the invalidity of two operands into one value.
    ///
    /// The reason of the first invalid operand wins. The explanation names
    /// both operands. At least one operand must be invalid.
    pub(crate) fn compose(
        operation: &str,
        first: Option<&Invalid>,
        second: Option<&Invalid>,
    ) -> Invalid {
        let reason = first
            .or(second)
            .map(|inv| inv.reason())
            .unwrap_or(Reason::InvalidInput);
        let describe = |inv: Option<&Invalid>| match inv {
            None => String::from("valid"),
            Some(inv) => inv.to_string(),
        };
        Invalid::explain(
            reason,
            format_args!(
                "created by {operation} an invalid value \
                 (left: {}; right: {})",
                describe(first),
                describe(second),
            ),
        )
    }

    /// Returns the machine readable reason.
    pub fn reason(&self) -> Reason {
        self.inner.reason
    }

    /// Returns the human readable explanation, if one exists.
    pub fn explanation(&self) -> Option<&str> {
        self.inner.explanation.as_deref()
    }
}

impl Eq for Invalid {}

impl PartialEq for Invalid {
    fn eq(&self, rhs: &Invalid) -> bool {
        Arc::ptr_eq(&self.inner, &rhs.inner) || self.inner == rhs.inner
    }
}

impl core::fmt::Debug for Invalid {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Invalid")
            .field("reason", &self.inner.reason)
            .field("explanation", &self.inner.explanation)
            .finish()
    }
}

impl core::fmt::Display for Invalid {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.explanation() {
            None => write!(f, "{}", self.reason()),
            Some(explanation) => {
                write!(f, "{}: {}", self.reason(), explanation)
            }
        }
    }
}

impl std::error::Error for Invalid {}
