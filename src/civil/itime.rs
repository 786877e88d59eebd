/*!
This module defines the internal core time data types.

This includes physical time (i.e., a millisecond timestamp) and civil time.

These types exist to provide a home for the core algorithms in this crate.
For example, converting from a timestamp to a Gregorian calendar date and
clock time.

These routines are specifically implemented on simple primitive integer types
and implicitly assume that the inputs are valid (i.e., within the crate's
minimum and maximum ranges). Validation happens one layer up, in
`civil::CalendarFields`.

# Naming

The types in this module are prefixed with letter `I` to make it clear that
they are internal types. Specifically, to distinguish them from the public
types. For example, `CalendarFields` versus `IDateTime`.
*/

/// The number of milliseconds in a single civil day.
pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct ITimestamp {
    pub(crate) millisecond: i64,
}

impl ITimestamp {
    /// Converts a Unix millisecond timestamp with an offset to a Gregorian
    /// datetime.
    ///
    /// The offset should correspond to the number of minutes required to
    /// add to this timestamp to get the local time.
    #[inline(always)]
    pub(crate) const fn to_datetime(&self, offset: IOffset) -> IDateTime {
        let local = self.millisecond + (offset.minute as i64) * 60_000;
        let epoch_day = local.div_euclid(MILLIS_PER_DAY);
        let millisecond = local.rem_euclid(MILLIS_PER_DAY);
        let date = IEpochDay { epoch_day }.to_date();
        let time = ITimeMillisecond { millisecond }.to_time();
        IDateTime { date, time }
    }
}

/// An offset from UTC, in minutes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IOffset {
    pub(crate) minute: i32,
}

impl IOffset {
    pub(crate) const UTC: IOffset = IOffset { minute: 0 };
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IDateTime {
    pub(crate) date: IDate,
    pub(crate) time: ITime,
}

impl IDateTime {
    /// Converts a Gregorian datetime and its offset to a Unix millisecond
    /// timestamp.
    ///
    /// The offset should correspond to the number of minutes required to
    /// subtract from this datetime in order to get to UTC.
    #[inline(always)]
    pub(crate) const fn to_timestamp(&self, offset: IOffset) -> ITimestamp {
        let epoch_day = self.date.to_epoch_day().epoch_day;
        let millisecond = epoch_day * MILLIS_PER_DAY
            + self.time.to_millisecond().millisecond
            - (offset.minute as i64) * 60_000;
        ITimestamp { millisecond }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IEpochDay {
    pub(crate) epoch_day: i64,
}

impl IEpochDay {
    /// Converts days since the Unix epoch to a Gregorian date.
    ///
    /// This is Neri-Schneider, shifted by `s` 400-year cycles so that the
    /// whole supported range (roughly 275,000 years on either side of the
    /// epoch) stays non-negative.
    ///
    /// Ref: <https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L40C3-L40C34>
    #[inline(always)]
    #[allow(non_upper_case_globals, non_snake_case)] // to mimic source
    pub(crate) const fn to_date(&self) -> IDate {
        const s: u64 = 1_000;
        const K: u64 = 719468 + 146097 * s;
        const L: u64 = 400 * s;

        let N = (self.epoch_day + K as i64) as u64;

        let N_1 = 4 * N + 3;
        let C = N_1 / 146097;
        let N_C = (N_1 % 146097) / 4;

        let N_2 = 4 * N_C + 3;
        let P_2 = 2939745 * N_2;
        let Z = P_2 / 4294967296;
        let N_Y = (P_2 % 4294967296) / 2939745 / 4;
        let Y = 100 * C + Z;

        let N_3 = 2141 * N_Y + 197913;
        let M = N_3 / 65536;
        let D = (N_3 % 65536) / 2141;

        let J = N_Y >= 306;
        let year = (Y as i64) - (L as i64) + (J as i64);
        let month = (if J { M - 12 } else { M }) as i32;
        let day = (D + 1) as i32;
        IDate { year: year as i32, month, day }
    }

    /// Returns the ISO weekday, where Monday is `1` and Sunday is `7`.
    ///
    /// This works by using the knowledge that 1970-01-01 was a Thursday.
    ///
    /// Ref: <http://howardhinnant.github.io/date_algorithms.html>
    #[inline(always)]
    pub(crate) const fn weekday(&self) -> i32 {
        ((self.epoch_day + 3).rem_euclid(7) + 1) as i32
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IDate {
    pub(crate) year: i32,
    pub(crate) month: i32,
    pub(crate) day: i32,
}

impl IDate {
    /// Converts a Gregorian date to days since the Unix epoch.
    ///
    /// This is Neri-Schneider. There's no branching or divisions of signed
    /// values. The month must be in `1..=12` and the day must be at least
    /// `1`. Days past the end of the month simply carry into the following
    /// months.
    ///
    /// Ref: <https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L83>
    #[inline(always)]
    #[allow(non_upper_case_globals, non_snake_case)] // to mimic source
    pub(crate) const fn to_epoch_day(&self) -> IEpochDay {
        const s: u64 = 1_000;
        const K: u64 = 719468 + 146097 * s;
        const L: u64 = 400 * s;

        let month = self.month as u64;
        let day = self.day as u64;

        let J = month <= 2;
        let Y = ((self.year as i64) + (L as i64) - (J as i64)) as u64;
        let M = if J { month + 12 } else { month };
        let D = day - 1;
        let C = Y / 100;

        let y_star = 1461 * Y / 4 - C + C / 4;
        let m_star = (979 * M - 2919) / 32;
        let N = y_star + m_star + D;

        let epoch_day = (N as i64) - (K as i64);
        IEpochDay { epoch_day }
    }
}

/// Represents a clock time to millisecond precision.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct ITime {
    pub(crate) hour: i32,
    pub(crate) minute: i32,
    pub(crate) second: i32,
    pub(crate) millisecond: i32,
}

impl ITime {
    pub(crate) const ZERO: ITime =
        ITime { hour: 0, minute: 0, second: 0, millisecond: 0 };

    /// Returns the number of milliseconds since midnight.
    ///
    /// An hour of `24` is permitted and results in a value equal to the
    /// length of a day.
    #[inline(always)]
    pub(crate) const fn to_millisecond(&self) -> ITimeMillisecond {
        let mut millisecond: i64 = 0;
        millisecond += (self.hour as i64) * 3_600_000;
        millisecond += (self.minute as i64) * 60_000;
        millisecond += (self.second as i64) * 1_000;
        millisecond += self.millisecond as i64;
        ITimeMillisecond { millisecond }
    }
}

/// Represents a single point in the day, to millisecond precision.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct ITimeMillisecond {
    pub(crate) millisecond: i64,
}

impl ITimeMillisecond {
    #[inline(always)]
    pub(crate) const fn to_time(&self) -> ITime {
        let mut millisecond = self.millisecond;
        let mut time = ITime::ZERO;
        if millisecond != 0 {
            time.hour = (millisecond / 3_600_000) as i32;
            millisecond %= 3_600_000;
            if millisecond != 0 {
                time.minute = (millisecond / 60_000) as i32;
                millisecond %= 60_000;
                if millisecond != 0 {
                    time.second = (millisecond / 1_000) as i32;
                    time.millisecond = (millisecond % 1_000) as i32;
                }
            }
        }
        time
    }
}

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
#[inline]
pub(crate) const fn is_leap_year(year: i32) -> bool {
    // Divisible by 4, except centuries not divisible by 400.
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}

/// Return the number of days in the given month.
#[inline]
pub(crate) const fn days_in_month(year: i32, month: i32) -> i32 {
    // Branchless: odd months before August and even months after are 31.
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

/// Return the number of days in the given year.
#[inline]
pub(crate) const fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_epochday_date() {
        for year in -9999..=9999 {
            for month in 1..=12 {
                for day in 1..=days_in_month(year, month) {
                    let date = IDate { year, month, day };
                    let epoch_day = date.to_epoch_day();
                    let date_roundtrip = epoch_day.to_date();
                    assert_eq!(date, date_roundtrip);
                }
            }
        }
    }

    #[test]
    fn roundtrip_epochday_extremes() {
        for epoch_day in (-100_000_100..=-99_999_900)
            .chain(-1_000..=1_000)
            .chain(99_999_900..=100_000_100)
        {
            let epoch_day = IEpochDay { epoch_day };
            let date = epoch_day.to_date();
            assert_eq!(epoch_day, date.to_epoch_day(), "{date:?}");
        }
    }

    #[test]
    fn known_epoch_days() {
        let d = |year, month, day| IDate { year, month, day }.to_epoch_day();
        assert_eq!(d(1970, 1, 1).epoch_day, 0);
        assert_eq!(d(1969, 12, 31).epoch_day, -1);
        assert_eq!(d(2000, 3, 1).epoch_day, 11_017);
        assert_eq!(d(-271821, 4, 20).epoch_day, -100_000_000);
        assert_eq!(d(275760, 9, 13).epoch_day, 100_000_000);
        // Days past the end of a month carry forward.
        assert_eq!(d(2024, 1, 32), d(2024, 2, 1));
    }

    #[test]
    fn weekday_from_epoch_day() {
        // 1970-01-01 was a Thursday.
        assert_eq!(IEpochDay { epoch_day: 0 }.weekday(), 4);
        assert_eq!(IEpochDay { epoch_day: -1 }.weekday(), 3);
        assert_eq!(IEpochDay { epoch_day: 3 }.weekday(), 7);
        assert_eq!(IEpochDay { epoch_day: 4 }.weekday(), 1);
    }

    #[test]
    fn roundtrip_millisecond_time() {
        for second in 0..=86_399 {
            for millisecond in [0, 1, 250, 500, 999] {
                let ms = ITimeMillisecond {
                    millisecond: second * 1_000 + millisecond,
                };
                let time = ms.to_time();
                assert_eq!(ms, time.to_millisecond());
            }
        }
    }

    #[test]
    fn timestamp_datetime_offsets() {
        let ts = ITimestamp { millisecond: 0 };
        let dt = ts.to_datetime(IOffset { minute: -300 });
        assert_eq!(dt.date, IDate { year: 1969, month: 12, day: 31 });
        assert_eq!(
            dt.time,
            ITime { hour: 19, minute: 0, second: 0, millisecond: 0 }
        );
        assert_eq!(dt.to_timestamp(IOffset { minute: -300 }), ts);

        let ts = ITimestamp { millisecond: -1 };
        let dt = ts.to_datetime(IOffset::UTC);
        assert_eq!(dt.date, IDate { year: 1969, month: 12, day: 31 });
        assert_eq!(
            dt.time,
            ITime { hour: 23, minute: 59, second: 59, millisecond: 999 }
        );
        assert_eq!(dt.to_timestamp(IOffset::UTC), ts);
    }

    #[test]
    fn leap_year() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2001));
        assert!(!is_leap_year(2002));
        assert!(!is_leap_year(2003));
        assert!(is_leap_year(2004));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
        assert!(is_leap_year(-400));
    }

    #[test]
    fn number_of_days_in_month() {
        assert_eq!(days_in_month(2024, 1), 31);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2024, 3), 31);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 5), 31);
        assert_eq!(days_in_month(2024, 6), 30);
        assert_eq!(days_in_month(2024, 7), 31);
        assert_eq!(days_in_month(2024, 8), 31);
        assert_eq!(days_in_month(2024, 9), 30);
        assert_eq!(days_in_month(2024, 10), 31);
        assert_eq!(days_in_month(2024, 11), 30);
        assert_eq!(days_in_month(2024, 12), 31);

        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_year(2000), 366);
        assert_eq!(days_in_year(1900), 365);
    }
}
