use crate::Unit;

/// Days in a year, averaged over the 400 year Gregorian cycle.
const DAYS_PER_YEAR_ACCURATE: f64 = 146_097.0 / 400.0;
/// Days in a month, averaged over the 400 year Gregorian cycle.
const DAYS_PER_MONTH_ACCURATE: f64 = 146_097.0 / 4_800.0;

/// The ratios used to convert calendar units to other units.
///
/// Weeks, days and every smaller unit always convert exactly: a week is 7
/// days, a day is 24 hours and so on. Years, quarters and months have no
/// fixed length, so converting them requires picking one.
///
/// # Example
///
/// ```
/// use calends::{ConversionAccuracy, Duration, Unit};
///
/// let year = Duration::new().years(1);
/// assert_eq!(year.total(Unit::Day), 365.0);
/// let year = year.with_accuracy(ConversionAccuracy::Longterm);
/// assert_eq!(year.total(Unit::Day), 365.2425);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ConversionAccuracy {
    /// A year is 365 days, a quarter is 91 days and a month is 30 days.
    /// A year is 52 weeks, a quarter is 13 weeks and a month is 4 weeks.
    #[default]
    Casual,
    /// A year is 365.2425 days and a month is a twelfth of that.
    Longterm,
}

/// The amount of smaller units in one calendar unit.
///
/// Quarters are a third of the months, and only years hold them.
struct CalendarRatios {
    months: f64,
    weeks: f64,
    days: f64,
}

impl ConversionAccuracy {
    fn calendar(self, unit: Unit) -> CalendarRatios {
        use self::ConversionAccuracy::*;

        match (self, unit) {
            (Casual, Unit::Year) => CalendarRatios {
                months: 12.0,
                weeks: 52.0,
                days: 365.0,
            },
            (Casual, Unit::Quarter) => CalendarRatios {
                months: 3.0,
                weeks: 13.0,
                days: 91.0,
            },
            (Casual, _) => CalendarRatios {
                months: 1.0,
                weeks: 4.0,
                days: 30.0,
            },
            (Longterm, Unit::Year) => CalendarRatios {
                months: 12.0,
                weeks: DAYS_PER_YEAR_ACCURATE / 7.0,
                days: DAYS_PER_YEAR_ACCURATE,
            },
            (Longterm, Unit::Quarter) => CalendarRatios {
                months: 3.0,
                weeks: DAYS_PER_YEAR_ACCURATE / 28.0,
                days: DAYS_PER_YEAR_ACCURATE / 4.0,
            },
            (Longterm, _) => CalendarRatios {
                months: 1.0,
                weeks: DAYS_PER_MONTH_ACCURATE / 7.0,
                days: DAYS_PER_MONTH_ACCURATE,
            },
        }
    }

    /// Returns how many `to` make up one `from`.
    ///
    /// `from` must be bigger than `to`.
    pub(crate) fn ratio(self, from: Unit, to: Unit) -> f64 {
        debug_assert!(from > to, "cannot convert {from:?} to {to:?}");
        match from {
            Unit::Year | Unit::Quarter | Unit::Month => {
                let ratios = self.calendar(from);
                match to {
                    Unit::Quarter => ratios.months / 3.0,
                    Unit::Month => ratios.months,
                    Unit::Week => ratios.weeks,
                    _ => {
                        ratios.days * (fixed_millis(Unit::Day) / fixed_millis(to))
                    }
                }
            }
            _ => fixed_millis(from) / fixed_millis(to),
        }
    }
}

/// Returns the length of a unit of fixed length in milliseconds.
fn fixed_millis(unit: Unit) -> f64 {
    match unit {
        Unit::Week => 604_800_000.0,
        Unit::Day => 86_400_000.0,
        Unit::Hour => 3_600_000.0,
        Unit::Minute => 60_000.0,
        Unit::Second => 1_000.0,
        Unit::Millisecond => 1.0,
        unit => unreachable!("{unit:?} has no fixed length"),
    }
}
