use crate::{
    civil::{
        check_year, checked_date,
        itime::{self, IDate, IEpochDay},
        CalendarFields,
    },
    error::Error,
    invalid::Invalid,
};

/// Days before the first of each month in a common year.
static COMMON_LADDER: [i32; 12] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Days before the first of each month in a leap year.
static LEAP_LADDER: [i32; 12] =
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

fn ladder(year: i32) -> &'static [i32; 12] {
    if itime::is_leap_year(year) {
        &LEAP_LADDER
    } else {
        &COMMON_LADDER
    }
}

/// Returns the day of the year, starting at `1`, for a Gregorian date.
///
/// Months outside `1..=12` are clamped.
pub(crate) fn ordinal(year: i32, month: i32, day: i32) -> i32 {
    let month0 = month.clamp(1, 12) - 1;
    day.saturating_add(ladder(year)[month0 as usize])
}

/// A date given as a year and a day of that year.
///
/// # Example
///
/// ```
/// use calends::civil::{CalendarFields, OrdinalDate};
///
/// let date = CalendarFields::date(2024, 3, 1);
/// assert_eq!(date.ordinal_date(), OrdinalDate::new(2024, 61));
/// let back = OrdinalDate::new(2023, 60).to_calendar()?;
/// assert_eq!(back, CalendarFields::date(2023, 3, 1));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OrdinalDate {
    pub year: i32,
    pub ordinal: i32,
}

impl OrdinalDate {
    /// Creates a new ordinal date record. No validation is performed.
    pub const fn new(year: i32, ordinal: i32) -> OrdinalDate {
        OrdinalDate { year, ordinal }
    }

    /// Converts this ordinal date to a Gregorian date at midnight.
    ///
    /// Ordinals outside of the year carry into neighboring years. Use
    /// [`Instant::from_fields`](crate::Instant::from_fields) for validated
    /// conversions.
    ///
    /// # Errors
    ///
    /// This returns an error when the year, or the date after carrying, is
    /// outside the supported range of years.
    pub fn to_calendar(&self) -> Result<CalendarFields, Error> {
        check_year(self.year)?;
        let date = checked_date(self.to_epoch_day())?;
        Ok(CalendarFields::from_idate(date))
    }

    fn to_epoch_day(&self) -> i64 {
        let jan1 = IDate { year: self.year, month: 1, day: 1 };
        jan1.to_epoch_day().epoch_day + i64::from(self.ordinal) - 1
    }

    pub(crate) fn from_idate(date: IDate) -> OrdinalDate {
        OrdinalDate {
            year: date.year,
            ordinal: ordinal(date.year, date.month, date.day),
        }
    }

    /// Finds the last month whose first day comes before the ordinal.
    ///
    /// The year must be within the supported range.
    pub(crate) fn to_idate(&self) -> IDate {
        if !(1..=itime::days_in_year(self.year)).contains(&self.ordinal) {
            return IEpochDay { epoch_day: self.to_epoch_day() }.to_date();
        }
        let ladder = ladder(self.year);
        let month0 = ladder
            .iter()
            .rposition(|&before| before < self.ordinal)
            .unwrap_or(0);
        IDate {
            year: self.year,
            month: month0 as i32 + 1,
            day: self.ordinal - ladder[month0],
        }
    }

    pub(crate) fn check(&self) -> Result<(), Invalid> {
        check_year(self.year)?;
        if !(1..=itime::days_in_year(self.year)).contains(&self.ordinal) {
            return Err(Invalid::unit_out_of_range(
                "day of the year",
                self.ordinal.into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladders_match_month_lengths() {
        for (year, ladder) in [(2023, &COMMON_LADDER), (2024, &LEAP_LADDER)] {
            let mut total = 0;
            for month in 1..=12 {
                assert_eq!(ladder[month as usize - 1], total);
                total += itime::days_in_month(year, month);
            }
            assert_eq!(total, itime::days_in_year(year));
        }
    }

    #[test]
    fn roundtrip_every_day() {
        for year in [1900, 2000, 2023, 2024] {
            for month in 1..=12 {
                for day in 1..=itime::days_in_month(year, month) {
                    let date = IDate { year, month, day };
                    let ord = OrdinalDate::from_idate(date);
                    assert!(ord.check().is_ok());
                    assert_eq!(ord.to_idate(), date);
                }
            }
        }
    }

    #[test]
    fn known_ordinals() {
        assert_eq!(ordinal(2023, 1, 1), 1);
        assert_eq!(ordinal(2023, 12, 31), 365);
        assert_eq!(ordinal(2024, 12, 31), 366);
        assert_eq!(ordinal(2024, 2, 29), 60);
        let date = OrdinalDate::new(2024, 366).to_idate();
        assert_eq!(date, IDate { year: 2024, month: 12, day: 31 });
        let date = OrdinalDate::new(2023, 366).to_idate();
        assert_eq!(date, IDate { year: 2024, month: 1, day: 1 });
        let date = OrdinalDate::new(2024, 0).to_idate();
        assert_eq!(date, IDate { year: 2023, month: 12, day: 31 });
    }

    #[test]
    fn huge_ordinals_are_errors() {
        assert!(OrdinalDate::new(2023, i32::MAX).to_calendar().is_err());
        assert!(OrdinalDate::new(2023, i32::MIN).to_calendar().is_err());
        assert!(OrdinalDate::new(i32::MIN, 1).to_calendar().is_err());
        assert_eq!(
            OrdinalDate::new(2023, 366).to_calendar().unwrap(),
            CalendarFields::date(2024, 1, 1),
        );
        // Months past December count as December.
        assert_eq!(ordinal(2023, 13, 1), 335);
        assert_eq!(ordinal(2023, 0, 1), 1);
    }

    #[test]
    fn out_of_range() {
        insta::assert_snapshot!(
            OrdinalDate::new(2023, 366).check().unwrap_err(),
            @"unit out of range: you specified 366 as a day of the year, which is invalid",
        );
        assert!(OrdinalDate::new(2024, 366).check().is_ok());
        assert!(OrdinalDate::new(2024, 0).check().is_err());
    }
}
