use crate::error::{unit::Error as E, Error};

/// A unit of time or calendar quantity.
///
/// Units are used to name the quantities in a [`Duration`](crate::Duration),
/// to pick the boundaries for [`Instant::start_of`](crate::Instant::start_of)
/// and to choose the output units of a calendar difference.
///
/// # Example: ordering
///
/// Bigger units compare greater than smaller units.
///
/// ```
/// use calends::Unit;
///
/// assert!(Unit::Year > Unit::Quarter);
/// assert!(Unit::Quarter > Unit::Month);
/// assert!(Unit::Day > Unit::Hour);
/// assert!(Unit::Second > Unit::Millisecond);
/// ```
///
/// # Example: parsing
///
/// Units parse from their singular or plural names, case insensitively.
///
/// ```
/// use calends::Unit;
///
/// assert_eq!("months".parse::<Unit>()?, Unit::Month);
/// assert_eq!("Hour".parse::<Unit>()?, Unit::Hour);
/// assert!("fortnight".parse::<Unit>().is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Unit {
    /// A Gregorian calendar year of 365 or 366 days.
    Year = 8,
    /// Three calendar months.
    Quarter = 7,
    /// A Gregorian calendar month of 28 to 31 days.
    Month = 6,
    /// Seven days.
    Week = 5,
    /// A calendar day. This is usually 24 hours, but days crossing a
    /// daylight saving time transition may be shorter or longer.
    Day = 4,
    /// Sixty minutes.
    Hour = 3,
    /// Sixty seconds.
    Minute = 2,
    /// A thousand milliseconds.
    Second = 1,
    /// The smallest unit this crate represents.
    Millisecond = 0,
}

impl Unit {
    /// Every unit, from biggest to smallest.
    pub const ALL: [Unit; 9] = [
        Unit::Year,
        Unit::Quarter,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Millisecond,
    ];

    /// Returns the position of this unit in [`Unit::ALL`].
    pub(crate) fn index(self) -> usize {
        8 - self as usize
    }

    /// Returns true for units of a day or bigger.
    pub(crate) fn is_calendar(self) -> bool {
        self >= Unit::Day
    }

    /// A human readable singular description of this unit of time.
    pub fn singular(&self) -> &'static str {
        match *self {
            Unit::Year => "year",
            Unit::Quarter => "quarter",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
            Unit::Millisecond => "millisecond",
        }
    }

    /// A human readable plural description of this unit of time.
    pub fn plural(&self) -> &'static str {
        match *self {
            Unit::Year => "years",
            Unit::Quarter => "quarters",
            Unit::Month => "months",
            Unit::Week => "weeks",
            Unit::Day => "days",
            Unit::Hour => "hours",
            Unit::Minute => "minutes",
            Unit::Second => "seconds",
            Unit::Millisecond => "milliseconds",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.plural())
    }
}

impl core::str::FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Unit, Error> {
        Unit::ALL
            .into_iter()
            .find(|unit| {
                s.eq_ignore_ascii_case(unit.singular())
                    || s.eq_ignore_ascii_case(unit.plural())
            })
            .ok_or_else(|| E::unknown(s).into())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Unit {
    fn arbitrary(g: &mut quickcheck::Gen) -> Unit {
        Unit::ALL[usize::arbitrary(g) % Unit::ALL.len()]
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.index().shrink().map(|i| Unit::ALL[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_position() {
        for (i, unit) in Unit::ALL.into_iter().enumerate() {
            assert_eq!(unit.index(), i);
        }
        assert_eq!(Unit::Year.index(), 0);
        assert_eq!(Unit::Millisecond.index(), 8);
    }

    #[test]
    fn sorted_biggest_first() {
        for pair in Unit::ALL.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn parse_error() {
        insta::assert_snapshot!(
            "fortnights".parse::<Unit>().unwrap_err(),
            @r###"unrecognized unit "fortnights", expected a singular or plural unit name like 'year', 'months' or 'milliseconds'"###,
        );
    }
}
