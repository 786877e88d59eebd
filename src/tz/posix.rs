/*!
Provides a parser and evaluator for [POSIX `TZ` rule strings][posix-env].

Registered zones and zones parsed from `TZ` strings are backed by rules like
`EST5EDT,M3.2.0,M11.1.0`, and TZif data ends with one that covers the years
after its last transition. Such a rule gives a standard offset and,
optionally, a daylight saving time offset along with the days on which DST
begins and ends each year. The rule is applied to every year, so it is
proleptic in both directions.

Note that a POSIX time zone like `EST5` corresponds to the UTC offset `-05:00`,
and `GMT-4` corresponds to the UTC offset `+04:00`. Yes, it's backwards.

The IANA v3+ extension permitting transition hours in the range `-167..=167`
is always enabled.

[posix-env]: https://pubs.opengroup.org/onlinepubs/9699919799/basedefs/V1_chap08.html#tag_08_03
*/

use core::cell::Cell;

use crate::{
    civil::itime::{
        days_in_month, is_leap_year, IDate, IEpochDay, ITimestamp, IOffset,
        MILLIS_PER_DAY,
    },
    error::{err, tz::Error as E, Error, ErrorContext},
};

/// A POSIX time zone rule.
///
/// Unlike what POSIX specifies, this requires an explicit rule whenever a
/// DST abbreviation is present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PosixTimeZone {
    std_abbrev: Box<str>,
    /// Seconds east of UTC.
    std_offset: i32,
    dst: Option<PosixDst>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct PosixDst {
    abbrev: Box<str>,
    /// Seconds east of UTC.
    offset: i32,
    rule: Rule,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Rule {
    start: DayTime,
    end: DayTime,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DayTime {
    date: DateSpec,
    /// Seconds after midnight of `date`, in the range `-604799..=604799`.
    time: i32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DateSpec {
    /// Julian day `1..=365` where February 29 is never counted.
    JulianOne(i16),
    /// Zero based Julian day `0..=365` counting February 29.
    JulianZero(i16),
    /// The nth weekday of a month. A week of `5` means the last such weekday.
    /// The weekday is in `0..=6` with `0` corresponding to Sunday.
    WeekdayOfMonth { month: i8, week: i8, weekday: i8 },
}

/// The offset in effect at some instant along with its metadata.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct OffsetInfo<'a> {
    pub(crate) seconds: i32,
    pub(crate) abbrev: &'a str,
    pub(crate) is_dst: bool,
}

impl PosixTimeZone {
    /// Parse a POSIX `TZ` rule from the given string.
    pub(crate) fn parse(input: &str) -> Result<PosixTimeZone, Error> {
        let parser = Parser::new(input);
        parser.parse().with_context(|| E::invalid_posix(input))
    }

    /// Returns the offset, abbreviation and DST status in effect at the
    /// given Unix millisecond timestamp.
    pub(crate) fn to_offset_info(&self, millis: i64) -> OffsetInfo<'_> {
        let standard = OffsetInfo {
            seconds: self.std_offset,
            abbrev: &self.std_abbrev,
            is_dst: false,
        };
        let Some(ref dst) = self.dst else { return standard };
        let year =
            ITimestamp { millisecond: millis }.to_datetime(IOffset::UTC).date.year;
        let (start, end) = self.dst_range_utc(dst, year);
        let in_dst = if start <= end {
            start <= millis && millis < end
        } else {
            !(end <= millis && millis < start)
        };
        if in_dst {
            OffsetInfo { seconds: dst.offset, abbrev: &dst.abbrev, is_dst: true }
        } else {
            standard
        }
    }

    /// Returns true when this rule never changes its offset.
    pub(crate) fn is_fixed(&self) -> bool {
        self.dst.is_none()
    }

    /// Returns the standard offset of this rule in seconds.
    pub(crate) fn std_offset_seconds(&self) -> i32 {
        self.std_offset
    }

    /// Returns the DST start and end as Unix milliseconds in the given year.
    ///
    /// The start may come after the end. This tends to happen in the
    /// southern hemisphere.
    fn dst_range_utc(&self, dst: &PosixDst, year: i32) -> (i64, i64) {
        // DST starts with respect to standard time and ends with respect to
        // DST time.
        let start = dst.rule.start.to_millis(year, self.std_offset);
        let end = dst.rule.end.to_millis(year, dst.offset);
        (start, end)
    }
}

impl core::fmt::Display for PosixTimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write_abbrev(f, &self.std_abbrev)?;
        write_posix_offset(f, self.std_offset)?;
        if let Some(ref dst) = self.dst {
            write_abbrev(f, &dst.abbrev)?;
            if dst.offset != self.std_offset + 3600 {
                write_posix_offset(f, dst.offset)?;
            }
            write!(f, ",{},{}", dst.rule.start, dst.rule.end)?;
        }
        Ok(())
    }
}

impl DayTime {
    /// Converts this transition to a Unix millisecond timestamp in the given
    /// year, where the transition time is expressed in local time with the
    /// given offset.
    ///
    /// The result is clamped to the given year.
    fn to_millis(&self, year: i32, offset_seconds: i32) -> i64 {
        let first = IDate { year, month: 1, day: 1 }.to_epoch_day().epoch_day;
        let next =
            IDate { year: year + 1, month: 1, day: 1 }.to_epoch_day().epoch_day;
        let min = first * MILLIS_PER_DAY;
        let max = next * MILLIS_PER_DAY - 1;
        let Some(day) = self.date.to_epoch_day(year) else { return max };
        let millis = day * MILLIS_PER_DAY
            + i64::from(self.time - offset_seconds) * 1_000;
        millis.clamp(min, max)
    }
}

impl core::fmt::Display for DayTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.date {
            DateSpec::JulianOne(n) => write!(f, "J{n}")?,
            DateSpec::JulianZero(n) => write!(f, "{n}")?,
            DateSpec::WeekdayOfMonth { month, week, weekday } => {
                write!(f, "M{month}.{week}.{weekday}")?
            }
        }
        // Two o'clock is the default, so it's elided.
        if self.time != 2 * 3600 {
            f.write_str("/")?;
            let sign = if self.time < 0 { "-" } else { "" };
            let secs = self.time.unsigned_abs();
            let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
            write!(f, "{sign}{h}")?;
            if m != 0 || s != 0 {
                write!(f, ":{m:02}")?;
            }
            if s != 0 {
                write!(f, ":{s:02}")?;
            }
        }
        Ok(())
    }
}

impl DateSpec {
    /// Returns the epoch day this specification refers to in the given
    /// year.
    ///
    /// This returns `None` only for a zero based Julian day of `365` in a
    /// non-leap year.
    fn to_epoch_day(&self, year: i32) -> Option<i64> {
        let first = IDate { year, month: 1, day: 1 }.to_epoch_day().epoch_day;
        match *self {
            DateSpec::JulianOne(n) => {
                let mut ordinal = i64::from(n);
                if is_leap_year(year) && ordinal >= 60 {
                    ordinal += 1;
                }
                Some(first + ordinal - 1)
            }
            DateSpec::JulianZero(n) => {
                if n == 365 && !is_leap_year(year) {
                    return None;
                }
                Some(first + i64::from(n))
            }
            DateSpec::WeekdayOfMonth { month, week, weekday } => {
                let month = i32::from(month);
                let weekday = i64::from(weekday);
                let start = IDate { year, month, day: 1 }.to_epoch_day();
                if week == 5 {
                    let last = start.epoch_day
                        + i64::from(days_in_month(year, month))
                        - 1;
                    let last_weekday = sunday_zero(last);
                    Some(last - (last_weekday - weekday).rem_euclid(7))
                } else {
                    let first_weekday = sunday_zero(start.epoch_day);
                    let first_match = start.epoch_day
                        + (weekday - first_weekday).rem_euclid(7);
                    Some(first_match + 7 * (i64::from(week) - 1))
                }
            }
        }
    }
}

/// Returns the weekday of the given epoch day, where Sunday is `0`.
fn sunday_zero(epoch_day: i64) -> i64 {
    i64::from(IEpochDay { epoch_day }.weekday() % 7)
}

fn write_abbrev(
    f: &mut core::fmt::Formatter,
    abbrev: &str,
) -> core::fmt::Result {
    if abbrev.bytes().all(|b| b.is_ascii_alphabetic()) {
        f.write_str(abbrev)
    } else {
        write!(f, "<{abbrev}>")
    }
}

fn write_posix_offset(
    f: &mut core::fmt::Formatter,
    seconds_east: i32,
) -> core::fmt::Result {
    // POSIX offsets are positive west of UTC.
    let sign = if seconds_east > 0 { "-" } else { "" };
    let secs = seconds_east.unsigned_abs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    write!(f, "{sign}{h}")?;
    if m != 0 || s != 0 {
        write!(f, ":{m:02}")?;
    }
    if s != 0 {
        write!(f, ":{s:02}")?;
    }
    Ok(())
}

/// A parser for POSIX time zones.
#[derive(Debug)]
struct Parser<'s> {
    /// The `TZ` string that we're parsing.
    tz: &'s [u8],
    /// The parser's current position in `tz`.
    pos: Cell<usize>,
}

impl<'s> Parser<'s> {
    fn new(tz: &'s str) -> Parser<'s> {
        Parser { tz: tz.as_bytes(), pos: Cell::new(0) }
    }

    /// Parses a POSIX time zone and ensures that the entire TZ string was
    /// consumed.
    fn parse(&self) -> Result<PosixTimeZone, Error> {
        if self.is_done() {
            return Err(err!("an empty string is not a valid POSIX time zone"));
        }
        let std_abbrev = self
            .parse_abbreviation()
            .context(err!("failed to parse standard abbreviation"))?;
        if self.is_done() {
            return Err(err!(
                "expected a standard offset after abbreviation \
                 `{std_abbrev}`, but found the end of the string",
            ));
        }
        let std_offset = self
            .parse_posix_offset()
            .context(err!("failed to parse standard offset"))?;
        let mut dst = None;
        if !self.is_done()
            && (self.byte().is_ascii_alphabetic() || self.byte() == b'<')
        {
            dst = Some(self.parse_posix_dst(std_offset)?);
        }
        if !self.is_done() {
            return Err(err!(
                "expected entire TZ string to be a valid POSIX \
                 time zone, but found `{}` after what would otherwise \
                 be a valid POSIX TZ string",
                String::from_utf8_lossy(self.remaining()),
            ));
        }
        Ok(PosixTimeZone { std_abbrev, std_offset, dst })
    }

    /// Parse a DST zone with an explicit transition rule.
    ///
    /// This assumes the parser is positioned at the first byte of the DST
    /// abbreviation.
    fn parse_posix_dst(&self, std_offset: i32) -> Result<PosixDst, Error> {
        let abbrev = self
            .parse_abbreviation()
            .context(err!("failed to parse DST abbreviation"))?;
        // One hour ahead of standard time unless given explicitly.
        let mut offset = std_offset + 3600;
        if !self.is_done() && self.byte() != b',' {
            offset = self
                .parse_posix_offset()
                .context(err!("failed to parse DST offset"))?;
        }
        if self.is_done() {
            return Err(err!(
                "DST abbreviation `{abbrev}` must be followed by \
                 an explicit transition rule",
            ));
        }
        if self.byte() != b',' || !self.bump() {
            return Err(err!(
                "after parsing DST offset in POSIX time zone string, \
                 expected a ',' followed by a transition rule",
            ));
        }
        let start = self
            .parse_posix_datetime_spec()
            .context(err!("failed to parse start of DST transition rule"))?;
        if self.maybe_byte() != Some(b',') || !self.bump() {
            return Err(err!(
                "expected end of DST rule after parsing the start \
                 of the DST rule"
            ));
        }
        let end = self
            .parse_posix_datetime_spec()
            .context(err!("failed to parse end of DST transition rule"))?;
        Ok(PosixDst { abbrev, offset, rule: Rule { start, end } })
    }

    /// Parse a time zone abbreviation, either quoted with `<` and `>` or
    /// made up of only ASCII letters.
    fn parse_abbreviation(&self) -> Result<Box<str>, Error> {
        const MAX_LEN: usize = 30;

        let quoted = self.byte() == b'<';
        if quoted && !self.bump() {
            return Err(err!(
                "found opening '<' quote for abbreviation in \
                 POSIX time zone string, and expected a name \
                 following it, but found the end of string instead"
            ));
        }
        let start = self.pos();
        while !self.is_done() {
            let byte = self.byte();
            let ok = if quoted {
                byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'-'
            } else {
                byte.is_ascii_alphabetic()
            };
            if !ok {
                break;
            }
            self.bump();
        }
        let abbrev = &self.tz[start..self.pos()];
        if quoted {
            if self.maybe_byte() != Some(b'>') {
                return Err(err!(
                    "found quoted abbreviation `{}`, but did not find \
                     expected end-of-quoted abbreviation '>' character",
                    String::from_utf8_lossy(abbrev),
                ));
            }
            self.bump();
        }
        if abbrev.len() < 3 {
            return Err(err!(
                "expected abbreviation with 3 or more bytes, but found \
                 abbreviation `{}` with {} bytes",
                String::from_utf8_lossy(abbrev),
                abbrev.len(),
            ));
        }
        if abbrev.len() > MAX_LEN {
            return Err(err!(
                "expected abbreviation with at most {MAX_LEN} bytes, \
                 but found one with {} bytes",
                abbrev.len(),
            ));
        }
        // Only ASCII is accepted above.
        let abbrev = core::str::from_utf8(abbrev)
            .map_err(|_| err!("abbreviation is not valid UTF-8"))?;
        Ok(abbrev.into())
    }

    /// Parse a POSIX time offset and return it as seconds east of UTC.
    fn parse_posix_offset(&self) -> Result<i32, Error> {
        let sign = self.parse_optional_sign()?.unwrap_or(1);
        let hour = self.parse_number_with_upto_n_digits(2)?;
        if !(0..=24).contains(&hour) {
            return Err(err!(
                "parsed hour `{hour}`, but hour in \
                 POSIX time zone must be in range `0..=24`",
            ));
        }
        let (minute, second) = self.parse_minute_second()?;
        // Yes, we flip the sign, because POSIX is backwards.
        Ok(-sign * (hour * 3600 + minute * 60 + second))
    }

    /// Parses a POSIX datetime specification, e.g., `M3.2.0/2`.
    fn parse_posix_datetime_spec(&self) -> Result<DayTime, Error> {
        let date = self.parse_posix_date_spec()?;
        let mut daytime = DayTime { date, time: 2 * 3600 };
        if self.maybe_byte() != Some(b'/') {
            return Ok(daytime);
        }
        if !self.bump() {
            return Err(err!(
                "expected time specification after '/' following a date \
                 specification in a POSIX time zone DST transition rule",
            ));
        }
        let sign = self.parse_optional_sign()?.unwrap_or(1);
        let hour = self.parse_number_with_upto_n_digits(3)?;
        if !(0..=167).contains(&hour) {
            return Err(err!(
                "parsed hour `{hour}`, but hour in IANA v3+ \
                 POSIX time zone must be in range `-167..=167`",
            ));
        }
        let (minute, second) = self.parse_minute_second()?;
        daytime.time = sign * (hour * 3600 + minute * 60 + second);
        Ok(daytime)
    }

    /// Parses a POSIX date specification: `Jn`, `n` or `Mm.w.d`.
    fn parse_posix_date_spec(&self) -> Result<DateSpec, Error> {
        match self.maybe_byte() {
            Some(b'J') => {
                if !self.bump() {
                    return Err(err!(
                        "expected one-based Julian day after 'J' in date \
                         specification, but got the end of the string",
                    ));
                }
                let n = self.parse_number_with_upto_n_digits(3)?;
                if !(1..=365).contains(&n) {
                    return Err(err!(
                        "parsed one based Julian day `{n}`, \
                         but it must be in range 1..=365",
                    ));
                }
                Ok(DateSpec::JulianOne(n as i16))
            }
            Some(b'0'..=b'9') => {
                let n = self.parse_number_with_upto_n_digits(3)?;
                if !(0..=365).contains(&n) {
                    return Err(err!(
                        "parsed zero based Julian day `{n}`, \
                         but it must be in range 0..=365",
                    ));
                }
                Ok(DateSpec::JulianZero(n as i16))
            }
            Some(b'M') => {
                if !self.bump() {
                    return Err(err!(
                        "expected month-week-weekday after 'M' in date \
                         specification, but got the end of the string",
                    ));
                }
                let month = self.parse_number_with_upto_n_digits(2)?;
                if !(1..=12).contains(&month) {
                    return Err(err!(
                        "parsed month `{month}`, but month in \
                         POSIX time zone must be in range 1..=12",
                    ));
                }
                self.expect_dot("month")?;
                let week = self.parse_number_with_exactly_n_digits(1)?;
                if !(1..=5).contains(&week) {
                    return Err(err!(
                        "parsed week `{week}`, but week in \
                         POSIX time zone must be in range 1..=5"
                    ));
                }
                self.expect_dot("week")?;
                let weekday = self.parse_number_with_exactly_n_digits(1)?;
                if !(0..=6).contains(&weekday) {
                    return Err(err!(
                        "parsed weekday `{weekday}`, but weekday in \
                         POSIX time zone must be in range `0..=6` \
                         (with `0` corresponding to Sunday)",
                    ));
                }
                Ok(DateSpec::WeekdayOfMonth {
                    month: month as i8,
                    week: week as i8,
                    weekday: weekday as i8,
                })
            }
            Some(byte) => Err(err!(
                "expected 'J', a digit or 'M' at the beginning of a date \
                 specification of a POSIX time zone DST transition rule, \
                 but got `{}` instead",
                char::from(byte).escape_default(),
            )),
            None => Err(err!(
                "expected a date specification, but found the end \
                 of the string",
            )),
        }
    }

    fn expect_dot(&self, after: &str) -> Result<(), Error> {
        if self.maybe_byte() != Some(b'.') || !self.bump() {
            return Err(err!(
                "expected '.' and more digits after {after} \
                 in POSIX time zone rule"
            ));
        }
        Ok(())
    }

    /// Parses the optional `:mm[:ss]` suffix of a time.
    fn parse_minute_second(&self) -> Result<(i32, i32), Error> {
        let (mut minute, mut second) = (0, 0);
        if self.maybe_byte() == Some(b':') {
            if !self.bump() {
                return Err(err!(
                    "incomplete time in POSIX timezone (missing minutes)",
                ));
            }
            minute = self.parse_number_with_exactly_n_digits(2)?;
            if self.maybe_byte() == Some(b':') {
                if !self.bump() {
                    return Err(err!(
                        "incomplete time in POSIX timezone (missing seconds)",
                    ));
                }
                second = self.parse_number_with_exactly_n_digits(2)?;
            }
        }
        if !(0..=59).contains(&minute) || !(0..=59).contains(&second) {
            return Err(err!(
                "minutes and seconds in POSIX time zone \
                 must be in range `0..=59`",
            ));
        }
        Ok((minute, second))
    }

    /// Parses a number expressed in exactly `n` digits.
    fn parse_number_with_exactly_n_digits(
        &self,
        n: usize,
    ) -> Result<i32, Error> {
        let mut number: i32 = 0;
        for i in 0..n {
            match self.maybe_byte() {
                Some(byte @ b'0'..=b'9') => {
                    number = number * 10 + i32::from(byte - b'0');
                    self.bump();
                }
                Some(byte) => {
                    return Err(err!(
                        "invalid digit, expected 0-9 but got {}",
                        char::from(byte).escape_default(),
                    ))
                }
                None => {
                    return Err(err!("expected {n} digits, but found {i}"))
                }
            }
        }
        Ok(number)
    }

    /// Parses a number expressed with at least 1 and up to `n` digits.
    fn parse_number_with_upto_n_digits(&self, n: usize) -> Result<i32, Error> {
        let mut number: i32 = 0;
        for i in 0..n {
            match self.maybe_byte() {
                Some(byte @ b'0'..=b'9') => {
                    number = number * 10 + i32::from(byte - b'0');
                    self.bump();
                }
                _ if i == 0 => {
                    return Err(err!("invalid number, no digits found"))
                }
                _ => break,
            }
        }
        Ok(number)
    }

    /// Parses an optional sign. If one is consumed, then it is guaranteed
    /// that more input follows it.
    fn parse_optional_sign(&self) -> Result<Option<i32>, Error> {
        let sign = match self.maybe_byte() {
            Some(b'-') => -1,
            Some(b'+') => 1,
            _ => return Ok(None),
        };
        if !self.bump() {
            return Err(err!("expected digit after sign, but got end of input"));
        }
        Ok(Some(sign))
    }
}

/// Helper routines for parsing a POSIX `TZ` string.
impl<'s> Parser<'s> {
    /// Bump the parser to the next byte.
    ///
    /// If the end of the input has been reached, then `false` is returned.
    fn bump(&self) -> bool {
        if self.is_done() {
            return false;
        }
        self.pos.set(self.pos() + 1);
        !self.is_done()
    }

    fn is_done(&self) -> bool {
        self.pos() == self.tz.len()
    }

    /// Return the byte at the current position of the parser.
    ///
    /// This panics if the parser is positioned at the end of the TZ
    /// string.
    fn byte(&self) -> u8 {
        self.tz[self.pos()]
    }

    fn maybe_byte(&self) -> Option<u8> {
        self.tz.get(self.pos()).copied()
    }

    fn pos(&self) -> usize {
        self.pos.get()
    }

    fn remaining(&self) -> &'s [u8] {
        &self.tz[self.pos()..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posix_time_zone(input: &str) -> PosixTimeZone {
        let tz = PosixTimeZone::parse(input).unwrap();
        // Printing a rule and parsing it back must be lossless.
        let reparsed = PosixTimeZone::parse(&tz.to_string()).unwrap();
        assert_eq!(tz, reparsed);
        tz
    }

    fn offset_seconds(tz: &PosixTimeZone, millis: i64) -> i32 {
        tz.to_offset_info(millis).seconds
    }

    fn millis(y: i32, m: i32, d: i32, h: i64, min: i64) -> i64 {
        let day = IDate { year: y, month: m, day: d }.to_epoch_day().epoch_day;
        day * MILLIS_PER_DAY + h * 3_600_000 + min * 60_000
    }

    #[test]
    fn parse_fixed() {
        let tz = posix_time_zone("EST5");
        assert!(tz.is_fixed());
        assert_eq!(tz.std_offset_seconds(), -5 * 3600);
        let tz = posix_time_zone("<+0530>-5:30");
        assert_eq!(tz.std_offset_seconds(), 5 * 3600 + 30 * 60);
        assert_eq!(tz.to_offset_info(0).abbrev, "+0530");
    }

    #[test]
    fn parse_rules() {
        let tz = posix_time_zone("EST5EDT,M3.2.0,M11.1.0");
        assert_eq!(tz.to_string(), "EST5EDT,M3.2.0,M11.1.0");
        let tz = posix_time_zone("CET-1CEST,M3.5.0,M10.5.0/3");
        assert_eq!(tz.to_string(), "CET-1CEST,M3.5.0,M10.5.0/3");
        let tz = posix_time_zone("WART4WARST,J1/-3,J365/20");
        assert_eq!(tz.to_string(), "WART4WARST,J1/-3,J365/20");
        posix_time_zone("IST-1GMT0,M10.5.0,M3.5.0/1");
        posix_time_zone("<-03>3<-02>,M3.5.0/-2,M10.5.0/-1");
    }

    #[test]
    fn parse_errors() {
        insta::assert_snapshot!(
            PosixTimeZone::parse("").unwrap_err(),
            @"failed to parse `` as a POSIX time zone rule: an empty string is not a valid POSIX time zone",
        );
        insta::assert_snapshot!(
            PosixTimeZone::parse("EST5EDT").unwrap_err(),
            @"failed to parse `EST5EDT` as a POSIX time zone rule: DST abbreviation `EDT` must be followed by an explicit transition rule",
        );
        insta::assert_snapshot!(
            PosixTimeZone::parse("EST25").unwrap_err(),
            @"failed to parse `EST25` as a POSIX time zone rule: failed to parse standard offset: parsed hour `25`, but hour in POSIX time zone must be in range `0..=24`",
        );
        assert!(PosixTimeZone::parse("ES5").is_err());
        assert!(PosixTimeZone::parse("EST5EDT,M13.1.0,M11.1.0").is_err());
        assert!(PosixTimeZone::parse("EST5EDT,M3.2.0,M11.1.0x").is_err());
    }

    #[test]
    fn new_york_transitions() {
        let tz = posix_time_zone("EST5EDT,M3.2.0,M11.1.0");
        // 2024-03-10 07:00 UTC is 02:00 EST, the start of DST.
        let start = millis(2024, 3, 10, 7, 0);
        assert_eq!(offset_seconds(&tz, start - 1), -5 * 3600);
        assert_eq!(offset_seconds(&tz, start), -4 * 3600);
        assert!(tz.to_offset_info(start).is_dst);
        assert_eq!(tz.to_offset_info(start).abbrev, "EDT");
        // 2024-11-03 06:00 UTC is 02:00 EDT, the end of DST.
        let end = millis(2024, 11, 3, 6, 0);
        assert_eq!(offset_seconds(&tz, end - 1), -4 * 3600);
        assert_eq!(offset_seconds(&tz, end), -5 * 3600);
    }

    #[test]
    fn southern_hemisphere() {
        let tz = posix_time_zone("AEST-10AEDT,M10.1.0,M4.1.0/3");
        assert_eq!(offset_seconds(&tz, millis(2024, 1, 15, 0, 0)), 11 * 3600);
        assert_eq!(offset_seconds(&tz, millis(2024, 6, 15, 0, 0)), 10 * 3600);
        assert_eq!(
            offset_seconds(&tz, millis(2024, 12, 15, 0, 0)),
            11 * 3600
        );
    }

    #[test]
    fn date_specs() {
        // The last Sunday of March 2024 is the 31st.
        let spec = DateSpec::WeekdayOfMonth { month: 3, week: 5, weekday: 0 };
        let day = IDate { year: 2024, month: 3, day: 31 }.to_epoch_day();
        assert_eq!(spec.to_epoch_day(2024), Some(day.epoch_day));
        // The second Sunday of March 2024 is the 10th.
        let spec = DateSpec::WeekdayOfMonth { month: 3, week: 2, weekday: 0 };
        let day = IDate { year: 2024, month: 3, day: 10 }.to_epoch_day();
        assert_eq!(spec.to_epoch_day(2024), Some(day.epoch_day));
        // J60 is always March 1.
        let day = IDate { year: 2024, month: 3, day: 1 }.to_epoch_day();
        assert_eq!(DateSpec::JulianOne(60).to_epoch_day(2024), Some(day.epoch_day));
        // Zero based day 365 only exists in leap years.
        assert_eq!(DateSpec::JulianZero(365).to_epoch_day(2023), None);
        assert!(DateSpec::JulianZero(365).to_epoch_day(2024).is_some());
    }
}
