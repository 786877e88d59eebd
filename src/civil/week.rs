use crate::{
    civil::{
        check_year, checked_date,
        itime::{self, IDate, IEpochDay},
        CalendarFields,
    },
    error::Error,
    invalid::Invalid,
};

/// The rules that decide how days are grouped into numbered weeks.
///
/// A week starts on a particular weekday, and the first week of a week year
/// is the first week containing at least a minimum number of days of the
/// new Gregorian year. [`WeekRules::ISO`] starts weeks on Monday and
/// requires four days, which means week 1 is the week containing January 4.
///
/// Weekdays are numbered from `1` (Monday) to `7` (Sunday) when specifying
/// the start of the week. The weekdays reported by a [`WeekDate`] computed
/// with non-ISO rules are relative to the start of the week, so `1` is
/// always the first day of the week.
///
/// # Example
///
/// ```
/// use calends::civil::{CalendarFields, WeekDate, WeekRules};
///
/// // Weeks starting on Sunday where January 1 is always in week 1.
/// let us = WeekRules::new(7, 1)?;
/// let date = CalendarFields::date(2024, 1, 1);
/// assert_eq!(date.week_date(us), WeekDate::new(2024, 1, 2));
/// assert_eq!(date.week_date(WeekRules::ISO), WeekDate::new(2024, 1, 1));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeekRules {
    start_of_week: i32,
    min_days_in_first_week: i32,
}

impl WeekRules {
    /// The ISO 8601 week rules.
    pub const ISO: WeekRules =
        WeekRules { start_of_week: 1, min_days_in_first_week: 4 };

    /// Creates new week rules.
    ///
    /// # Errors
    ///
    /// This returns an error when either value is outside `1..=7`.
    pub fn new(
        start_of_week: i32,
        min_days_in_first_week: i32,
    ) -> Result<WeekRules, Error> {
        if !(1..=7).contains(&start_of_week) {
            return Err(Error::range("start of week", start_of_week, 1, 7));
        }
        if !(1..=7).contains(&min_days_in_first_week) {
            return Err(Error::range(
                "minimum days in first week",
                min_days_in_first_week,
                1,
                7,
            ));
        }
        Ok(WeekRules { start_of_week, min_days_in_first_week })
    }

    /// The ISO weekday (`1` is Monday) that weeks start on.
    pub fn start_of_week(&self) -> i32 {
        self.start_of_week
    }

    /// The number of days of a new year the first week must contain.
    pub fn min_days_in_first_week(&self) -> i32 {
        self.min_days_in_first_week
    }

    /// Converts an ISO weekday into a weekday relative to the start of the
    /// week.
    pub(crate) fn local_weekday(&self, iso_weekday: i32) -> i32 {
        (iso_weekday - self.start_of_week + 7) % 7 + 1
    }

    /// Returns the number of days between the first day of the week year
    /// and January 1. This is negative or zero when the week year starts
    /// in December of the previous year.
    fn first_week_offset(&self, year: i32) -> i32 {
        let anchor = IDate { year, month: 1, day: self.min_days_in_first_week };
        let anchor_weekday = self.local_weekday(anchor.to_epoch_day().weekday());
        -anchor_weekday + self.min_days_in_first_week - 1
    }
}

impl Default for WeekRules {
    fn default() -> WeekRules {
        WeekRules::ISO
    }
}

/// A date in a week calendar: a week year, a week number and a weekday.
///
/// Under [`WeekRules::ISO`], the weekday runs from `1` (Monday) to `7`
/// (Sunday). Under other rules, `1` is the first day of the week.
///
/// # Example
///
/// Week years do not always agree with Gregorian years near the new year.
///
/// ```
/// use calends::civil::{CalendarFields, WeekDate, WeekRules};
///
/// let date = CalendarFields::date(2014, 12, 29);
/// assert_eq!(date.week_date(WeekRules::ISO), WeekDate::new(2015, 1, 1));
///
/// let date = CalendarFields::date(2016, 1, 3);
/// assert_eq!(date.week_date(WeekRules::ISO), WeekDate::new(2015, 53, 7));
///
/// let back = WeekDate::new(2015, 53, 7).to_calendar(WeekRules::ISO)?;
/// assert_eq!(back, CalendarFields::date(2016, 1, 3));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeekDate {
    pub week_year: i32,
    pub week_number: i32,
    pub weekday: i32,
}

impl WeekDate {
    /// Creates a new week date record. No validation is performed.
    pub const fn new(week_year: i32, week_number: i32, weekday: i32) -> WeekDate {
        WeekDate { week_year, week_number, weekday }
    }

    /// Converts this week date to a Gregorian date at midnight.
    ///
    /// Out of range week numbers and weekdays carry into neighboring
    /// weeks.
    ///
    /// # Errors
    ///
    /// This returns an error when the week year, or the date after
    /// carrying, is outside the supported range of years.
    pub fn to_calendar(
        &self,
        rules: WeekRules,
    ) -> Result<CalendarFields, Error> {
        check_year(self.week_year)?;
        let date = checked_date(self.to_epoch_day(rules))?;
        Ok(CalendarFields::from_idate(date))
    }

    pub(crate) fn from_idate(date: IDate, rules: WeekRules) -> WeekDate {
        let IDate { year, month, day } = date;
        let ordinal = super::ordinal::ordinal(year, month, day);
        let weekday = rules.local_weekday(date.to_epoch_day().weekday());
        let week_number = (ordinal - weekday + 14
            - rules.min_days_in_first_week)
            .div_euclid(7);
        if week_number < 1 {
            let week_year = year - 1;
            WeekDate {
                week_year,
                week_number: weeks_in_week_year(week_year, rules),
                weekday,
            }
        } else if week_number > weeks_in_week_year(year, rules) {
            WeekDate { week_year: year + 1, week_number: 1, weekday }
        } else {
            WeekDate { week_year: year, week_number, weekday }
        }
    }

    /// The week year must be within the supported range.
    pub(crate) fn to_idate(&self, rules: WeekRules) -> IDate {
        IEpochDay { epoch_day: self.to_epoch_day(rules) }.to_date()
    }

    /// Counts days from the day of January that the first week must
    /// contain.
    fn to_epoch_day(&self, rules: WeekRules) -> i64 {
        let anchor = IDate {
            year: self.week_year,
            month: 1,
            day: rules.min_days_in_first_week,
        }
        .to_epoch_day();
        let anchor_weekday = rules.local_weekday(anchor.weekday());
        anchor.epoch_day
            + (i64::from(self.week_number) - 1) * 7
            + i64::from(self.weekday)
            - i64::from(anchor_weekday)
    }

    /// Returns an invalid value describing the first field out of range.
    pub(crate) fn check(&self, rules: WeekRules) -> Result<(), Invalid> {
        check_year(self.week_year)?;
        let weeks = weeks_in_week_year(self.week_year, rules);
        if !(1..=weeks).contains(&self.week_number) {
            return Err(Invalid::unit_out_of_range(
                "week number",
                self.week_number.into(),
            ));
        }
        if !(1..=7).contains(&self.weekday) {
            return Err(Invalid::unit_out_of_range(
                "weekday",
                self.weekday.into(),
            ));
        }
        Ok(())
    }
}

/// Returns the number of weeks, 52 or 53, in the given week year.
pub(crate) fn weeks_in_week_year(week_year: i32, rules: WeekRules) -> i32 {
    let offset = rules.first_week_offset(week_year);
    let offset_next = rules.first_week_offset(week_year + 1);
    (itime::days_in_year(week_year) - offset + offset_next) / 7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(year: i32, month: i32, day: i32) -> WeekDate {
        WeekDate::from_idate(IDate { year, month, day }, WeekRules::ISO)
    }

    #[test]
    fn iso_boundaries() {
        assert_eq!(iso(2014, 12, 29), WeekDate::new(2015, 1, 1));
        assert_eq!(iso(2016, 1, 3), WeekDate::new(2015, 53, 7));
        assert_eq!(iso(2016, 1, 4), WeekDate::new(2016, 1, 1));
        assert_eq!(iso(2008, 12, 29), WeekDate::new(2009, 1, 1));
        assert_eq!(iso(2010, 1, 3), WeekDate::new(2009, 53, 7));
        assert_eq!(iso(2021, 1, 1), WeekDate::new(2020, 53, 5));
        assert_eq!(iso(2024, 12, 30), WeekDate::new(2025, 1, 1));
    }

    #[test]
    fn weeks_per_year() {
        let weeks = |y| weeks_in_week_year(y, WeekRules::ISO);
        assert_eq!(weeks(2004), 53);
        assert_eq!(weeks(2009), 53);
        assert_eq!(weeks(2015), 53);
        assert_eq!(weeks(2020), 53);
        assert_eq!(weeks(2023), 52);
        assert_eq!(weeks(2024), 52);
        assert_eq!(weeks(2026), 53);
    }

    #[test]
    fn roundtrip_every_day_iso() {
        for year in 1900..=2101 {
            for month in 1..=12 {
                for day in 1..=itime::days_in_month(year, month) {
                    let date = IDate { year, month, day };
                    let week = WeekDate::from_idate(date, WeekRules::ISO);
                    assert!(week.check(WeekRules::ISO).is_ok(), "{date:?}");
                    assert_eq!(week.to_idate(WeekRules::ISO), date);
                }
            }
        }
    }

    #[test]
    fn roundtrip_every_rule() {
        for start in 1..=7 {
            for min_days in 1..=7 {
                let rules = WeekRules::new(start, min_days).unwrap();
                for year in 1998..=2030 {
                    for month in [1, 2, 6, 12] {
                        for day in 1..=itime::days_in_month(year, month) {
                            let date = IDate { year, month, day };
                            let week = WeekDate::from_idate(date, rules);
                            assert!(week.check(rules).is_ok(), "{date:?}");
                            assert_eq!(
                                week.to_idate(rules),
                                date,
                                "{date:?} {rules:?}",
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn sunday_weeks() {
        let rules = WeekRules::new(7, 1).unwrap();
        // 2023-12-31 is a Sunday, so it starts the first week of 2024.
        let week = WeekDate::from_idate(IDate { year: 2023, month: 12, day: 31 }, rules);
        assert_eq!(week, WeekDate::new(2024, 1, 1));
        let week = WeekDate::from_idate(IDate { year: 2024, month: 1, day: 6 }, rules);
        assert_eq!(week, WeekDate::new(2024, 1, 7));
    }

    #[test]
    fn rules_out_of_range() {
        insta::assert_snapshot!(
            WeekRules::new(0, 4).unwrap_err(),
            @"parameter 'start of week' with value 0 is not in the required range of 1..=7",
        );
        insta::assert_snapshot!(
            WeekRules::new(1, 8).unwrap_err(),
            @"parameter 'minimum days in first week' with value 8 is not in the required range of 1..=7",
        );
    }

    #[test]
    fn huge_week_numbers_are_errors() {
        let week = WeekDate::new(2020, i32::MAX, 1);
        insta::assert_snapshot!(
            week.to_calendar(WeekRules::ISO).unwrap_err(),
            @"timestamp out of range: day 15032403782 since the Unix epoch is outside the supported range",
        );
        let week = WeekDate::new(2020, i32::MIN, i32::MIN);
        assert!(week.to_calendar(WeekRules::ISO).is_err());
        let week = WeekDate::new(i32::MAX, 1, 1);
        assert!(week.to_calendar(WeekRules::ISO).is_err());
        // Small overflows still carry.
        let week = WeekDate::new(2015, 54, 1);
        assert_eq!(
            week.to_calendar(WeekRules::ISO).unwrap(),
            CalendarFields::date(2016, 1, 4),
        );
    }

    #[test]
    fn check_ranges() {
        let err = WeekDate::new(2023, 53, 1).check(WeekRules::ISO).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"unit out of range: you specified 53 as a week number, which is invalid",
        );
        assert!(WeekDate::new(2020, 53, 1).check(WeekRules::ISO).is_ok());
        let err = WeekDate::new(2020, 1, 8).check(WeekRules::ISO).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"unit out of range: you specified 8 as a weekday, which is invalid",
        );
    }
}
