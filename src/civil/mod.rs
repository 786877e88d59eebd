/*!
Calendar field records and the Gregorian calendar arithmetic behind them.

This module provides the plain records that an [`Instant`](crate::Instant)
is converted to and from:

* [`CalendarFields`] is a Gregorian date and clock time.
* [`WeekDate`] is a date in a week calendar, decided by [`WeekRules`].
* [`OrdinalDate`] is a year and a day of that year.
* [`FieldSpec`] is a partially specified set of fields in any one of the
three styles above, used with
[`Instant::from_fields`](crate::Instant::from_fields) and
[`Instant::set`](crate::Instant::set).

None of these records carry a time zone. They are converted to an instant
only together with a [`Zone`](crate::tz::Zone).

# Example

```
use calends::civil::{self, CalendarFields, WeekRules};

assert!(civil::is_leap_year(2024));
assert!(!civil::is_leap_year(1900));
assert_eq!(civil::days_in_month(2023, 2), 28);

let fields = CalendarFields::date(2020, 12, 31);
assert_eq!(fields.week_date(WeekRules::ISO).week_number, 53);
assert_eq!(fields.ordinal_date().ordinal, 366);
```
*/

use crate::invalid::{Invalid, Reason};

use self::itime::{IDate, IDateTime, IEpochDay, ITime, MILLIS_PER_DAY};

pub use self::{
    ordinal::OrdinalDate,
    week::{WeekDate, WeekRules},
};

pub(crate) mod itime;
mod ordinal;
pub(crate) mod resolve;
mod week;

/// Years beyond this are outside the range of any instant.
pub(crate) const YEAR_LIMIT: i32 = 300_000;

/// Days since the Unix epoch beyond this, in either direction, are past
/// every supported year yet still within the days `IEpochDay::to_date`
/// handles.
const EPOCH_DAY_LIMIT: i64 = (YEAR_LIMIT as i64 + 2_000) * 366;

/// Returns true if and only if the given year is a leap year.
///
/// A year is a leap year when it is divisible by 4, except for years
/// divisible by 100 but not by 400.
pub fn is_leap_year(year: i32) -> bool {
    itime::is_leap_year(year)
}

/// Returns the number of days in the given month of the given year.
///
/// The month must be in `1..=12`.
pub fn days_in_month(year: i32, month: i32) -> i32 {
    itime::days_in_month(year, month)
}

/// Returns the number of days, 365 or 366, in the given year.
pub fn days_in_year(year: i32) -> i32 {
    itime::days_in_year(year)
}

/// Returns the number of weeks, 52 or 53, in the given week year.
pub fn weeks_in_week_year(week_year: i32, rules: WeekRules) -> i32 {
    week::weeks_in_week_year(week_year, rules)
}

/// A Gregorian calendar date and a clock time with millisecond precision.
///
/// This is a plain record. Constructing one does no validation. The fields
/// are validated when the record is converted to an instant, for example
/// with [`Instant::from_calendar`](crate::Instant::from_calendar).
///
/// An hour of `24` is accepted there when all smaller fields are zero, and
/// means midnight at the start of the next day.
///
/// # Example
///
/// ```
/// use calends::{civil::CalendarFields, tz::Zone, Instant};
///
/// let fields = CalendarFields::new(2024, 2, 29, 23, 59, 59, 999);
/// let instant = Instant::from_calendar(fields, Zone::UTC);
/// assert_eq!(instant.fields(), Some(fields));
/// assert_eq!(fields.to_string(), "2024-02-29T23:59:59.999");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CalendarFields {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub millisecond: i32,
}

impl CalendarFields {
    /// Creates a new record from every field.
    pub const fn new(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millisecond: i32,
    ) -> CalendarFields {
        CalendarFields { year, month, day, hour, minute, second, millisecond }
    }

    /// Creates a new record for midnight at the start of the given date.
    pub const fn date(year: i32, month: i32, day: i32) -> CalendarFields {
        CalendarFields::new(year, month, day, 0, 0, 0, 0)
    }

    /// Returns the quarter, from `1` to `4`, that the month falls in.
    pub fn quarter(&self) -> i32 {
        (self.month + 2) / 3
    }

    /// Returns the ISO weekday, from `1` (Monday) to `7` (Sunday).
    pub fn weekday(&self) -> i32 {
        self.to_idate().to_epoch_day().weekday()
    }

    /// Converts the date to a date in the week calendar of the given
    /// rules.
    pub fn week_date(&self, rules: WeekRules) -> WeekDate {
        WeekDate::from_idate(self.to_idate(), rules)
    }

    /// Converts the date to an ordinal date.
    pub fn ordinal_date(&self) -> OrdinalDate {
        OrdinalDate::from_idate(self.to_idate())
    }

    pub(crate) fn from_idate(date: IDate) -> CalendarFields {
        CalendarFields::date(date.year, date.month, date.day)
    }

    pub(crate) fn from_idatetime(dt: IDateTime) -> CalendarFields {
        let IDateTime { date, time } = dt;
        CalendarFields::new(
            date.year,
            date.month,
            date.day,
            time.hour,
            time.minute,
            time.second,
            time.millisecond,
        )
    }

    /// Returns the wall clock time as milliseconds since the Unix epoch as
    /// if it were in UTC.
    ///
    /// Every field may overflow into the next bigger one. For example, a
    /// month of `13` is January of the next year and an hour of `24` is
    /// midnight of the next day. The year must be within the supported
    /// range.
    pub(crate) fn to_local_millis(&self) -> i64 {
        let months = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let first = IDate {
            year: months.div_euclid(12) as i32,
            month: months.rem_euclid(12) as i32 + 1,
            day: 1,
        };
        let epoch_day =
            first.to_epoch_day().epoch_day + i64::from(self.day) - 1;
        let time = ITime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            millisecond: self.millisecond,
        };
        epoch_day * MILLIS_PER_DAY + time.to_millisecond().millisecond
    }

    /// Returns the date, with overflowing fields carried.
    ///
    /// Dates far outside the supported range of years saturate at its
    /// edges.
    fn to_idate(&self) -> IDate {
        let month_limit = i64::from(YEAR_LIMIT) * 12;
        let months = (i64::from(self.year) * 12 + i64::from(self.month) - 1)
            .clamp(-month_limit, month_limit);
        let first = IDate {
            year: months.div_euclid(12) as i32,
            month: months.rem_euclid(12) as i32 + 1,
            day: 1,
        };
        let time = ITime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            millisecond: self.millisecond,
        };
        let carry = time.to_millisecond().millisecond.div_euclid(MILLIS_PER_DAY);
        let epoch_day =
            first.to_epoch_day().epoch_day + i64::from(self.day) - 1 + carry;
        IEpochDay {
            epoch_day: epoch_day.clamp(-EPOCH_DAY_LIMIT, EPOCH_DAY_LIMIT),
        }
        .to_date()
    }

    /// Returns an invalid value describing the first field out of range.
    pub(crate) fn check(&self) -> Result<(), Invalid> {
        self.check_date()?;
        self.check_time()
    }

    fn check_date(&self) -> Result<(), Invalid> {
        check_year(self.year)?;
        if !(1..=12).contains(&self.month) {
            return Err(Invalid::unit_out_of_range("month", self.month.into()));
        }
        let days = itime::days_in_month(self.year, self.month);
        if !(1..=days).contains(&self.day) {
            return Err(Invalid::unit_out_of_range("day", self.day.into()));
        }
        Ok(())
    }

    fn check_time(&self) -> Result<(), Invalid> {
        let top_of_day = self.hour == 24
            && self.minute == 0
            && self.second == 0
            && self.millisecond == 0;
        if !(0..=23).contains(&self.hour) && !top_of_day {
            return Err(Invalid::unit_out_of_range("hour", self.hour.into()));
        }
        if !(0..=59).contains(&self.minute) {
            return Err(Invalid::unit_out_of_range(
                "minute",
                self.minute.into(),
            ));
        }
        if !(0..=59).contains(&self.second) {
            return Err(Invalid::unit_out_of_range(
                "second",
                self.second.into(),
            ));
        }
        if !(0..=999).contains(&self.millisecond) {
            return Err(Invalid::unit_out_of_range(
                "millisecond",
                self.millisecond.into(),
            ));
        }
        Ok(())
    }
}

impl core::fmt::Display for CalendarFields {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if (0..=9999).contains(&self.year) {
            write!(f, "{:04}", self.year)?;
        } else {
            write!(f, "{:+07}", self.year)?;
        }
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
        )
    }
}

/// Converts days since the Unix epoch to a date within the supported range
/// of years.
pub(crate) fn checked_date(epoch_day: i64) -> Result<IDate, Invalid> {
    if !(-EPOCH_DAY_LIMIT..=EPOCH_DAY_LIMIT).contains(&epoch_day) {
        return Err(Invalid::explain(
            Reason::MillisOutOfRange,
            format_args!(
                "day {epoch_day} since the Unix epoch is outside the \
                 supported range",
            ),
        ));
    }
    let date = IEpochDay { epoch_day }.to_date();
    check_year(date.year)?;
    Ok(date)
}

/// Checks that a year is within the range of years an instant can have.
pub(crate) fn check_year(year: i32) -> Result<(), Invalid> {
    if !(-YEAR_LIMIT..=YEAR_LIMIT).contains(&year) {
        return Err(Invalid::explain(
            Reason::MillisOutOfRange,
            format_args!(
                "year {year} is outside the supported range of \
                 {}..={YEAR_LIMIT}",
                -YEAR_LIMIT,
            ),
        ));
    }
    Ok(())
}

/// A partially specified set of calendar fields.
///
/// Fields come in three styles: Gregorian (year, month and day), week
/// (week year, week number and weekday) and ordinal (year and day of the
/// year). The clock fields can be used with any style. Which style is in
/// use is decided by the fields that are set:
///
/// * A week year or week number selects the week style. They cannot be
/// combined with a year, month, day or ordinal.
/// * An ordinal selects the ordinal style. It cannot be combined with a
/// month or day.
/// * A weekday without any Gregorian field selects the week style.
/// * Everything else is the Gregorian style. A weekday given along with a
/// Gregorian date must agree with it.
///
/// Combining styles produces an invalid instant with
/// [`Reason::ConflictingFields`].
///
/// Week fields are interpreted with [`WeekRules::ISO`] unless other rules
/// are given with [`FieldSpec::week_rules`].
///
/// # Example
///
/// ```
/// use calends::{civil::FieldSpec, tz::Zone, Instant};
///
/// let spec = FieldSpec::new().week_year(2015).week_number(53).weekday(7);
/// let instant = Instant::from_fields(spec, Zone::UTC);
/// assert_eq!(instant.to_string(), "2016-01-03T00:00:00.000Z");
///
/// let spec = FieldSpec::new().year(2024).ordinal(60).hour(12);
/// let instant = Instant::from_fields(spec, Zone::UTC);
/// assert_eq!(instant.to_string(), "2024-02-29T12:00:00.000Z");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldSpec {
    year: Option<i32>,
    month: Option<i32>,
    day: Option<i32>,
    ordinal: Option<i32>,
    week_year: Option<i32>,
    week_number: Option<i32>,
    weekday: Option<i32>,
    hour: Option<i32>,
    minute: Option<i32>,
    second: Option<i32>,
    millisecond: Option<i32>,
    week_rules: Option<WeekRules>,
}

/// How missing fields are filled in by `FieldSpec::resolve`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Fill {
    /// Fields bigger than the biggest field given come from the base. The
    /// rest take their minimum value.
    Leading,
    /// Every missing field comes from the base.
    All,
}

/// The style of fields in a `FieldSpec`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Style {
    Gregorian,
    Week,
    Ordinal,
}

impl FieldSpec {
    /// Creates an empty set of fields.
    pub fn new() -> FieldSpec {
        FieldSpec::default()
    }

    /// Sets the Gregorian year.
    pub fn year(self, year: i32) -> FieldSpec {
        FieldSpec { year: Some(year), ..self }
    }

    /// Sets the month, from `1` to `12`.
    pub fn month(self, month: i32) -> FieldSpec {
        FieldSpec { month: Some(month), ..self }
    }

    /// Sets the day of the month.
    pub fn day(self, day: i32) -> FieldSpec {
        FieldSpec { day: Some(day), ..self }
    }

    /// Sets the day of the year, starting at `1`.
    pub fn ordinal(self, ordinal: i32) -> FieldSpec {
        FieldSpec { ordinal: Some(ordinal), ..self }
    }

    /// Sets the week year.
    pub fn week_year(self, week_year: i32) -> FieldSpec {
        FieldSpec { week_year: Some(week_year), ..self }
    }

    /// Sets the week number, starting at `1`.
    pub fn week_number(self, week_number: i32) -> FieldSpec {
        FieldSpec { week_number: Some(week_number), ..self }
    }

    /// Sets the weekday, from `1` to `7`, relative to the start of the week
    /// of the week rules in use.
    pub fn weekday(self, weekday: i32) -> FieldSpec {
        FieldSpec { weekday: Some(weekday), ..self }
    }

    /// Sets the hour, from `0` to `23`.
    pub fn hour(self, hour: i32) -> FieldSpec {
        FieldSpec { hour: Some(hour), ..self }
    }

    /// Sets the minute, from `0` to `59`.
    pub fn minute(self, minute: i32) -> FieldSpec {
        FieldSpec { minute: Some(minute), ..self }
    }

    /// Sets the second, from `0` to `59`.
    pub fn second(self, second: i32) -> FieldSpec {
        FieldSpec { second: Some(second), ..self }
    }

    /// Sets the millisecond, from `0` to `999`.
    pub fn millisecond(self, millisecond: i32) -> FieldSpec {
        FieldSpec { millisecond: Some(millisecond), ..self }
    }

    /// Sets the rules used to interpret the week year, week number and
    /// weekday.
    pub fn week_rules(self, rules: WeekRules) -> FieldSpec {
        FieldSpec { week_rules: Some(rules), ..self }
    }

    pub(crate) fn rules(&self) -> WeekRules {
        self.week_rules.unwrap_or(WeekRules::ISO)
    }

    pub(crate) fn weekday_given(&self) -> Option<i32> {
        self.weekday
    }

    /// Decides the style of these fields.
    pub(crate) fn style(&self) -> Result<Style, Invalid> {
        let has_ordinal = self.ordinal.is_some();
        let has_month_day = self.month.is_some() || self.day.is_some();
        let has_gregorian = self.year.is_some() || has_month_day;
        let definite_week =
            self.week_year.is_some() || self.week_number.is_some();
        if (has_gregorian || has_ordinal) && definite_week {
            return Err(Invalid::explain(
                Reason::ConflictingFields,
                format_args!(
                    "a week year or week number cannot be combined with \
                     a year, month, day or ordinal",
                ),
            ));
        }
        if has_month_day && has_ordinal {
            return Err(Invalid::explain(
                Reason::ConflictingFields,
                format_args!("an ordinal cannot be combined with a month or day"),
            ));
        }
        Ok(if definite_week || (self.weekday.is_some() && !has_gregorian) {
            Style::Week
        } else if has_ordinal {
            Style::Ordinal
        } else {
            Style::Gregorian
        })
    }

    /// Fills in missing fields from `base` and converts the result to a
    /// validated Gregorian record.
    pub(crate) fn resolve(
        &self,
        base: &CalendarFields,
        fill: Fill,
    ) -> Result<(CalendarFields, Style), Invalid> {
        let style = self.style()?;
        let time = [self.hour, self.minute, self.second, self.millisecond];
        let base_time = [base.hour, base.minute, base.second, base.millisecond];
        let fields = match style {
            Style::Gregorian => {
                let [year, month, day, hour, minute, second, millisecond] =
                    fill_units(
                        [self.year, self.month, self.day],
                        [base.year, base.month, base.day],
                        [1, 1],
                        time,
                        base_time,
                        fill,
                    );
                let mut fields = CalendarFields::new(
                    year,
                    month,
                    day,
                    hour,
                    minute,
                    second,
                    millisecond,
                );
                // Keep the base day when it would overflow the new month.
                if fill == Fill::All && self.day.is_none() {
                    check_year(fields.year)?;
                    if (1..=12).contains(&fields.month) {
                        fields.day = fields
                            .day
                            .min(itime::days_in_month(fields.year, fields.month));
                    }
                }
                fields.check()?;
                fields
            }
            Style::Week => {
                let rules = self.rules();
                let base_week = base.week_date(rules);
                let [week_year, week_number, weekday, hour, minute, second, millisecond] =
                    fill_units(
                        [self.week_year, self.week_number, self.weekday],
                        [
                            base_week.week_year,
                            base_week.week_number,
                            base_week.weekday,
                        ],
                        [1, 1],
                        time,
                        base_time,
                        fill,
                    );
                let week = WeekDate { week_year, week_number, weekday };
                week.check(rules)?;
                let date = week.to_idate(rules);
                let fields = CalendarFields::new(
                    date.year,
                    date.month,
                    date.day,
                    hour,
                    minute,
                    second,
                    millisecond,
                );
                fields.check_time()?;
                fields
            }
            Style::Ordinal => {
                let base_ordinal = base.ordinal_date();
                let [year, ordinal, hour, minute, second, millisecond] =
                    fill_units(
                        [self.year, self.ordinal],
                        [base_ordinal.year, base_ordinal.ordinal],
                        [1],
                        time,
                        base_time,
                        fill,
                    );
                let ordinal = OrdinalDate { year, ordinal };
                ordinal.check()?;
                let date = ordinal.to_idate();
                let fields = CalendarFields::new(
                    date.year,
                    date.month,
                    date.day,
                    hour,
                    minute,
                    second,
                    millisecond,
                );
                fields.check_time()?;
                fields
            }
        };
        Ok((fields, style))
    }
}

/// Fills missing date and time fields, given from biggest to smallest.
///
/// With `Fill::Leading`, missing fields before the first given field come
/// from the base and missing fields after it take their minimum, where the
/// minimum of every clock field is `0`. The biggest date field has no
/// minimum since it always comes from the base when missing.
fn fill_units<const D: usize, const M: usize, const N: usize>(
    date: [Option<i32>; D],
    base_date: [i32; D],
    date_minimum: [i32; M],
    time: [Option<i32>; 4],
    base_time: [i32; 4],
    fill: Fill,
) -> [i32; N] {
    let mut out = [0; N];
    let mut found_first = false;
    for i in 0..N {
        let (given, base, minimum) = if i < D {
            let minimum = if i == 0 { base_date[0] } else { date_minimum[i - 1] };
            (date[i], base_date[i], minimum)
        } else {
            (time[i - D], base_time[i - D], 0)
        };
        out[i] = match given {
            Some(value) => {
                found_first = true;
                value
            }
            None if fill == Fill::Leading && found_first => minimum,
            None => base,
        };
    }
    out
}

#[cfg(feature = "serde")]
macro_rules! serde_record {
    ($name:ident { $($field:ident),+ $(,)? }) => {
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                use serde::ser::SerializeStruct;

                const FIELDS: &[&str] = &[$(stringify!($field)),+];
                let mut record =
                    serializer.serialize_struct(stringify!($name), FIELDS.len())?;
                $( record.serialize_field(stringify!($field), &self.$field)?; )+
                record.end()
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<$name, D::Error> {
                use serde::de;

                const FIELDS: &[&str] = &[$(stringify!($field)),+];

                struct RecordVisitor;

                impl<'de> de::Visitor<'de> for RecordVisitor {
                    type Value = $name;

                    fn expecting(
                        &self,
                        f: &mut core::fmt::Formatter,
                    ) -> core::fmt::Result {
                        f.write_str(concat!("a ", stringify!($name), " record"))
                    }

                    fn visit_map<A: de::MapAccess<'de>>(
                        self,
                        mut map: A,
                    ) -> Result<$name, A::Error> {
                        $( let mut $field: Option<i32> = None; )+
                        while let Some(key) = map.next_key::<String>()? {
                            match key.as_str() {
                                $(
                                    stringify!($field) => {
                                        if $field.is_some() {
                                            return Err(de::Error::duplicate_field(
                                                stringify!($field),
                                            ));
                                        }
                                        $field = Some(map.next_value()?);
                                    }
                                )+
                                unknown => {
                                    return Err(de::Error::unknown_field(
                                        unknown, FIELDS,
                                    ));
                                }
                            }
                        }
                        Ok($name {
                            $(
                                $field: $field.ok_or_else(|| {
                                    de::Error::missing_field(stringify!($field))
                                })?,
                            )+
                        })
                    }
                }

                deserializer.deserialize_struct(
                    stringify!($name),
                    FIELDS,
                    RecordVisitor,
                )
            }
        }
    };
}

#[cfg(feature = "serde")]
serde_record!(CalendarFields {
    year,
    month,
    day,
    hour,
    minute,
    second,
    millisecond,
});

#[cfg(feature = "serde")]
serde_record!(WeekDate { week_year, week_number, weekday });

#[cfg(feature = "serde")]
serde_record!(OrdinalDate { year, ordinal });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        let check = |f: CalendarFields| f.check().map_err(|e| e.to_string());
        assert!(check(CalendarFields::new(2024, 2, 29, 23, 59, 59, 999)).is_ok());
        assert!(check(CalendarFields::new(2024, 2, 29, 24, 0, 0, 0)).is_ok());
        insta::assert_snapshot!(
            check(CalendarFields::date(2024, 13, 1)).unwrap_err(),
            @"unit out of range: you specified 13 as a month, which is invalid",
        );
        insta::assert_snapshot!(
            check(CalendarFields::date(2023, 2, 29)).unwrap_err(),
            @"unit out of range: you specified 29 as a day, which is invalid",
        );
        insta::assert_snapshot!(
            check(CalendarFields::new(2024, 1, 1, 24, 0, 0, 1)).unwrap_err(),
            @"unit out of range: you specified 24 as a hour, which is invalid",
        );
        insta::assert_snapshot!(
            check(CalendarFields::new(2024, 1, 1, 0, 60, 0, 0)).unwrap_err(),
            @"unit out of range: you specified 60 as a minute, which is invalid",
        );
        insta::assert_snapshot!(
            check(CalendarFields::new(2024, 1, 1, 0, 0, 0, 1000)).unwrap_err(),
            @"unit out of range: you specified 1000 as a millisecond, which is invalid",
        );
        insta::assert_snapshot!(
            check(CalendarFields::date(400_000, 1, 1)).unwrap_err(),
            @"timestamp out of range: year 400000 is outside the supported range of -300000..=300000",
        );
    }

    #[test]
    fn local_millis_carry() {
        let millis = |f: CalendarFields| f.to_local_millis();
        assert_eq!(millis(CalendarFields::date(1970, 1, 1)), 0);
        assert_eq!(
            millis(CalendarFields::date(2023, 13, 1)),
            millis(CalendarFields::date(2024, 1, 1)),
        );
        assert_eq!(
            millis(CalendarFields::date(2024, 0, 1)),
            millis(CalendarFields::date(2023, 12, 1)),
        );
        assert_eq!(
            millis(CalendarFields::date(2024, 2, 30)),
            millis(CalendarFields::date(2024, 3, 1)),
        );
        assert_eq!(
            millis(CalendarFields::new(2024, 2, 29, 24, 0, 0, 0)),
            millis(CalendarFields::date(2024, 3, 1)),
        );
        assert_eq!(
            millis(CalendarFields::date(2024, 3, 0)),
            millis(CalendarFields::date(2024, 2, 29)),
        );
    }

    #[test]
    fn extreme_fields_saturate() {
        let huge = CalendarFields::new(
            i32::MAX,
            i32::MAX,
            i32::MAX,
            i32::MAX,
            i32::MAX,
            i32::MAX,
            i32::MAX,
        );
        assert!(huge.ordinal_date().year > YEAR_LIMIT);
        assert!((1..=7).contains(&huge.weekday()));
        let tiny = CalendarFields::date(i32::MIN, i32::MIN, i32::MIN);
        assert!(tiny.week_date(WeekRules::ISO).week_year < -YEAR_LIMIT);
        // Carrying still applies inside the supported range.
        let carried = CalendarFields::date(2023, 13, 1).ordinal_date();
        assert_eq!(carried, OrdinalDate::new(2024, 1));
    }

    #[test]
    fn quarters_and_weekdays() {
        let quarters: Vec<i32> =
            (1..=12).map(|m| CalendarFields::date(2024, m, 1).quarter()).collect();
        assert_eq!(quarters, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
        // 2024-01-01 was a Monday.
        assert_eq!(CalendarFields::date(2024, 1, 1).weekday(), 1);
        assert_eq!(CalendarFields::date(2024, 1, 7).weekday(), 7);
    }

    #[test]
    fn display() {
        let f = CalendarFields::new(2024, 3, 9, 7, 5, 3, 12);
        assert_eq!(f.to_string(), "2024-03-09T07:05:03.012");
        let f = CalendarFields::date(-44, 3, 15);
        assert_eq!(f.to_string(), "-000044-03-15T00:00:00.000");
        let f = CalendarFields::date(10_000, 1, 1);
        assert_eq!(f.to_string(), "+010000-01-01T00:00:00.000");
    }

    #[test]
    fn spec_styles() {
        let spec = FieldSpec::new();
        assert_eq!(spec.style().unwrap(), Style::Gregorian);
        assert_eq!(spec.weekday(3).style().unwrap(), Style::Week);
        assert_eq!(spec.year(2024).weekday(3).style().unwrap(), Style::Gregorian);
        assert_eq!(spec.week_number(3).style().unwrap(), Style::Week);
        assert_eq!(spec.year(2024).ordinal(3).style().unwrap(), Style::Ordinal);
        insta::assert_snapshot!(
            spec.year(2024).week_number(3).style().unwrap_err(),
            @"conflicting fields: a week year or week number cannot be combined with a year, month, day or ordinal",
        );
        insta::assert_snapshot!(
            spec.month(2).ordinal(3).style().unwrap_err(),
            @"conflicting fields: an ordinal cannot be combined with a month or day",
        );
    }

    #[test]
    fn fill_leading() {
        let base = CalendarFields::new(2024, 7, 15, 13, 45, 30, 500);
        let resolve = |spec: FieldSpec| spec.resolve(&base, Fill::Leading).unwrap().0;

        assert_eq!(
            resolve(FieldSpec::new().month(3)),
            CalendarFields::date(2024, 3, 1),
        );
        assert_eq!(
            resolve(FieldSpec::new().hour(9)),
            CalendarFields::new(2024, 7, 15, 9, 0, 0, 0),
        );
        assert_eq!(
            resolve(FieldSpec::new().day(2).minute(5)),
            CalendarFields::new(2024, 7, 2, 0, 5, 0, 0),
        );
        assert_eq!(resolve(FieldSpec::new()), base);
        assert_eq!(
            resolve(FieldSpec::new().week_number(1)),
            CalendarFields::date(2024, 1, 1),
        );
        assert_eq!(
            resolve(FieldSpec::new().ordinal(32)),
            CalendarFields::date(2024, 2, 1),
        );
    }

    #[test]
    fn fill_all() {
        let base = CalendarFields::new(2024, 1, 31, 13, 45, 30, 500);
        let resolve = |spec: FieldSpec| spec.resolve(&base, Fill::All);

        assert_eq!(
            resolve(FieldSpec::new().month(2)).unwrap().0,
            CalendarFields::new(2024, 2, 29, 13, 45, 30, 500),
        );
        assert_eq!(
            resolve(FieldSpec::new().hour(0)).unwrap().0,
            CalendarFields::new(2024, 1, 31, 0, 45, 30, 500),
        );
        // 2024-01-31 is a Wednesday in ISO week 5.
        assert_eq!(
            resolve(FieldSpec::new().weekday(1)).unwrap().0,
            CalendarFields::new(2024, 1, 29, 13, 45, 30, 500),
        );
        assert!(resolve(FieldSpec::new().month(2).day(30)).is_err());
        assert!(resolve(FieldSpec::new().month(13)).is_err());
    }
}
