use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    civil::{
        self,
        itime::{IOffset, ITimestamp, MILLIS_PER_DAY},
        resolve, CalendarFields, FieldSpec, Fill, OrdinalDate, Style,
        WeekDate, WeekRules,
    },
    diff,
    duration::Duration,
    error::{civil::Error as E, Error},
    interval::Interval,
    invalid::{Invalid, Reason},
    settings,
    tz::{NameStyle, OffsetFormat, Zone},
    unit::Unit,
};

/// The biggest number of milliseconds, in either direction from the Unix
/// epoch, an instant can have. This is 100,000,000 days.
pub(crate) const MAX_MILLIS: i64 = 8_640_000_000_000_000;

/// A point on the timeline, viewed in a time zone.
///
/// An `Instant` is a count of milliseconds since the Unix epoch paired with
/// a [`Zone`]. The calendar fields in that zone, and the zone's offset, are
/// computed once when the instant is created and are cheap to read.
///
/// # Validity
///
/// Creating an instant never fails. Instead, when the inputs do not
/// describe a point in time (a month of `13`, an unknown zone, a timestamp
/// beyond `±8.64e15` milliseconds), the instant is *invalid* and carries an
/// [`Invalid`] describing why. Every accessor on an invalid instant returns
/// `None` (or `false`), and every transformation returns another invalid
/// instant. Use [`Instant::validate`] to turn an invalid instant into an
/// [`Error`].
///
/// # Local time that is skipped or repeated
///
/// When calendar fields name a wall clock time that did not happen in the
/// zone, because clocks sprang forward over it, the time is moved forward
/// by the size of the jump. When they name a wall clock time that happened
/// twice, because clocks fell back, the earlier instant is picked unless
/// the operation started from an instant already using the later offset.
///
/// # Equality
///
/// Two valid instants are equal when they are the same point in time and
/// are in the same zone. Two invalid instants are equal when they carry
/// equal invalid values.
///
/// # Example
///
/// ```
/// use calends::{civil::CalendarFields, tz::Zone, Instant, ToDuration};
///
/// let zone = Zone::named("America/New_York");
///
/// // 02:30 never happened on this day, so it resolves to 03:30.
/// let fields = CalendarFields::new(2024, 3, 10, 2, 30, 0, 0);
/// let instant = Instant::from_calendar(fields, zone.clone());
/// assert_eq!(instant.to_string(), "2024-03-10T03:30:00.000-04:00");
///
/// // Adding a month clamps the day to the end of the month.
/// let fields = CalendarFields::date(2024, 1, 31);
/// let instant = Instant::from_calendar(fields, zone).plus(&1.month());
/// assert_eq!(instant.to_string(), "2024-02-29T00:00:00.000-05:00");
///
/// let instant = Instant::from_calendar(
///     CalendarFields::new(2024, 13, 1, 0, 0, 0, 0),
///     Zone::UTC,
/// );
/// assert!(!instant.is_valid());
/// assert_eq!(instant.year(), None);
/// assert_eq!(instant.to_string(), "Invalid DateTime");
/// ```
#[derive(Clone)]
pub struct Instant {
    zone: Zone,
    state: State,
}

#[derive(Clone)]
enum State {
    Valid(Snapshot),
    Invalid(Invalid),
}

/// Everything about a valid instant that is derived from its timestamp and
/// zone.
#[derive(Clone, Copy, Debug)]
struct Snapshot {
    millis: i64,
    /// Minutes east of UTC in effect at `millis`.
    offset: i32,
    fields: CalendarFields,
    /// Always in ISO week rules.
    week: WeekDate,
    ordinal: i32,
}

impl Snapshot {
    fn new(millis: i64, offset: i32) -> Snapshot {
        let dt = ITimestamp { millisecond: millis }
            .to_datetime(IOffset { minute: offset });
        Snapshot {
            millis,
            offset,
            fields: CalendarFields::from_idatetime(dt),
            week: WeekDate::from_idate(dt.date, WeekRules::ISO),
            ordinal: OrdinalDate::from_idate(dt.date).ordinal,
        }
    }

    /// Returns the wall clock time as milliseconds since the Unix epoch as
    /// if it were in UTC.
    fn local_millis(&self) -> i64 {
        self.millis + i64::from(self.offset) * 60_000
    }
}

impl Instant {
    /// Creates an instant from milliseconds since the Unix epoch.
    ///
    /// The instant is invalid when the zone is invalid or when `millis` is
    /// beyond `±8.64e15`.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Instant};
    ///
    /// let instant = Instant::from_millis(1_719_792_000_000, Zone::named("Asia/Tokyo"));
    /// let fields = CalendarFields::new(2024, 7, 1, 9, 0, 0, 0);
    /// assert_eq!(instant.fields(), Some(fields));
    /// assert_eq!(instant.offset(), Some(540));
    ///
    /// assert!(!Instant::from_millis(8_640_000_000_000_001, Zone::UTC).is_valid());
    /// ```
    pub fn from_millis(millis: i64, zone: Zone) -> Instant {
        let Some(offset) = zone.offset(millis) else {
            return Instant::unsupported_zone(zone);
        };
        if !(-MAX_MILLIS..=MAX_MILLIS).contains(&millis) {
            let invalid = Invalid::explain(
                Reason::MillisOutOfRange,
                format_args!(
                    "{millis} milliseconds since the Unix epoch is outside \
                     the supported range of -{MAX_MILLIS}..={MAX_MILLIS}",
                ),
            );
            return Instant::invalid_in(zone, invalid);
        }
        Instant { zone, state: State::Valid(Snapshot::new(millis, offset)) }
    }

    /// Creates an instant from seconds since the Unix epoch.
    ///
    /// Fractions of a millisecond are truncated. A value that is not finite
    /// produces an invalid instant.
    pub fn from_seconds(seconds: f64, zone: Zone) -> Instant {
        if !seconds.is_finite() {
            let invalid = Invalid::explain(
                Reason::InvalidInput,
                format_args!(
                    "{seconds} is not a finite number of seconds \
                     since the Unix epoch",
                ),
            );
            return Instant::invalid_in(zone, invalid);
        }
        match float_to_millis(seconds * 1000.0) {
            Some(millis) => Instant::from_millis(millis, zone),
            None => {
                let invalid = Invalid::explain(
                    Reason::MillisOutOfRange,
                    format_args!(
                        "{seconds} seconds since the Unix epoch is outside \
                         the supported range",
                    ),
                );
                Instant::invalid_in(zone, invalid)
            }
        }
    }

    /// Returns the current instant in the default zone.
    ///
    /// The clock and the default zone can both be changed through
    /// [`settings`](crate::settings).
    pub fn now() -> Instant {
        Instant::from_millis(settings::now(), settings::default_zone())
    }

    /// Creates an instant from complete Gregorian calendar fields, read as
    /// wall clock time in the given zone.
    ///
    /// Every field is validated. Fields that are out of range produce an
    /// invalid instant instead of carrying into the next field.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, invalid::Reason, tz::Zone, Instant};
    ///
    /// let fields = CalendarFields::new(2017, 3, 12, 5, 45, 10, 765);
    /// let instant = Instant::from_calendar(fields, Zone::UTC);
    /// assert_eq!(instant.to_millis(), Some(1_489_297_510_765));
    ///
    /// let fields = CalendarFields::date(2023, 2, 29);
    /// let instant = Instant::from_calendar(fields, Zone::UTC);
    /// assert_eq!(instant.invalid().unwrap().reason(), Reason::UnitOutOfRange);
    /// ```
    pub fn from_calendar(fields: CalendarFields, zone: Zone) -> Instant {
        if !zone.is_valid() {
            return Instant::unsupported_zone(zone);
        }
        if let Err(invalid) = fields.check() {
            return Instant::invalid_in(zone, invalid);
        }
        Instant::resolve_local(fields.to_local_millis(), zone, None)
    }

    /// Creates an instant from a partial set of calendar fields, read as
    /// wall clock time in the given zone.
    ///
    /// Fields bigger than the biggest field given are taken from the
    /// current time in the zone. Fields smaller than it take their minimum
    /// value. See [`FieldSpec`] for the styles of fields that can be given.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::FieldSpec, invalid::Reason, tz::Zone, Instant};
    ///
    /// let spec = FieldSpec::new().year(2024).month(5);
    /// let instant = Instant::from_fields(spec, Zone::UTC);
    /// assert_eq!(instant.to_string(), "2024-05-01T00:00:00.000Z");
    ///
    /// // 2024-05-01 was a Wednesday, not a Monday.
    /// let spec = FieldSpec::new().year(2024).month(5).day(1).weekday(1);
    /// let instant = Instant::from_fields(spec, Zone::UTC);
    /// assert_eq!(instant.invalid().unwrap().reason(), Reason::MismatchedWeekday);
    ///
    /// let spec = FieldSpec::new().month(5).week_number(3);
    /// let instant = Instant::from_fields(spec, Zone::UTC);
    /// assert_eq!(instant.invalid().unwrap().reason(), Reason::ConflictingFields);
    /// ```
    pub fn from_fields(spec: FieldSpec, zone: Zone) -> Instant {
        if !zone.is_valid() {
            return Instant::unsupported_zone(zone);
        }
        let now = Instant::from_millis(settings::now(), zone.clone());
        let Some(base) = now.fields() else { return now };
        match spec.resolve(&base, Fill::Leading) {
            Err(invalid) => Instant::invalid_in(zone, invalid),
            Ok((fields, style)) => {
                Instant::resolve_local(fields.to_local_millis(), zone, None)
                    .check_weekday(&spec, style)
            }
        }
    }

    /// Creates an invalid instant in UTC.
    pub fn from_invalid(invalid: Invalid) -> Instant {
        Instant::invalid_in(Zone::UTC, invalid)
    }

    /// Returns a copy of this instant with some of its calendar fields
    /// replaced.
    ///
    /// Fields not given are kept. When the month changes and no day is
    /// given, the day is clamped to the end of the new month. The offset
    /// of this instant is preferred when the new wall clock time happened
    /// twice.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::{CalendarFields, FieldSpec}, tz::Zone, Instant};
    ///
    /// let instant = Instant::from_calendar(
    ///     CalendarFields::new(2024, 3, 31, 10, 0, 0, 0),
    ///     Zone::UTC,
    /// );
    /// let changed = instant.set(FieldSpec::new().month(2));
    /// assert_eq!(changed.to_string(), "2024-02-29T10:00:00.000Z");
    ///
    /// // Move to the Monday of the same ISO week.
    /// let monday = instant.set(FieldSpec::new().weekday(1));
    /// assert_eq!(monday.to_string(), "2024-03-25T10:00:00.000Z");
    /// ```
    pub fn set(&self, spec: FieldSpec) -> Instant {
        let snap = match self.state {
            State::Valid(ref snap) => snap,
            State::Invalid(_) => return self.clone(),
        };
        match spec.resolve(&snap.fields, Fill::All) {
            Err(invalid) => Instant::invalid_in(self.zone.clone(), invalid),
            Ok((fields, style)) => Instant::resolve_local(
                fields.to_local_millis(),
                self.zone.clone(),
                Some(snap.offset),
            )
            .check_weekday(&spec, style),
        }
    }

    /// Returns the same point in time viewed in a different zone.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{tz::Zone, Instant};
    ///
    /// let instant = Instant::from_millis(1_719_792_000_000, Zone::UTC);
    /// let tokyo = instant.set_zone(Zone::named("Asia/Tokyo"));
    /// assert_eq!(tokyo.to_string(), "2024-07-01T09:00:00.000+09:00");
    /// assert_eq!(tokyo.to_millis(), instant.to_millis());
    /// ```
    pub fn set_zone(&self, zone: Zone) -> Instant {
        if zone == self.zone {
            return self.clone();
        }
        match self.state {
            State::Invalid(ref invalid) => {
                Instant { zone, state: State::Invalid(invalid.clone()) }
            }
            State::Valid(ref snap) => Instant::from_millis(snap.millis, zone),
        }
    }

    /// Returns the same wall clock time in a different zone, which is
    /// usually a different point in time.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{tz::Zone, Instant};
    ///
    /// let instant = Instant::from_millis(1_719_792_000_000, Zone::UTC);
    /// let tokyo = instant.set_zone_keeping_local_time(Zone::named("Asia/Tokyo"));
    /// assert_eq!(tokyo.to_string(), "2024-07-01T00:00:00.000+09:00");
    /// ```
    pub fn set_zone_keeping_local_time(&self, zone: Zone) -> Instant {
        let snap = match self.state {
            State::Valid(ref snap) if zone.is_valid() => snap,
            _ => return self.set_zone(zone),
        };
        let hint = zone.offset(snap.millis);
        Instant::resolve_local(snap.local_millis(), zone, hint)
    }

    /// Returns the same point in time in UTC.
    pub fn to_utc(&self) -> Instant {
        self.set_zone(Zone::UTC)
    }

    /// Returns the same point in time in the default zone.
    pub fn to_local(&self) -> Instant {
        self.set_zone(settings::default_zone())
    }

    /// Adds a duration to this instant.
    ///
    /// Whole years, quarters and months are added to the calendar: the
    /// month changes and the day is clamped to the end of the new month.
    /// Whole weeks and days are then added to the calendar day, so the
    /// wall clock time is kept across daylight saving time transitions.
    /// Everything else, including fractions of calendar units, is added
    /// as elapsed time.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Instant, ToDuration};
    ///
    /// let zone = Zone::named("America/New_York");
    /// let start = Instant::from_calendar(
    ///     CalendarFields::new(2024, 3, 9, 12, 0, 0, 0),
    ///     zone,
    /// );
    /// // A calendar day keeps the wall clock time...
    /// assert_eq!(start.plus(&1.day()).to_string(), "2024-03-10T12:00:00.000-04:00");
    /// // ...while 24 hours does not.
    /// assert_eq!(start.plus(&24.hours()).to_string(), "2024-03-10T13:00:00.000-04:00");
    /// ```
    pub fn plus(&self, duration: &Duration) -> Instant {
        let snap = match self.state {
            State::Valid(ref snap) => snap,
            State::Invalid(_) => return self.clone(),
        };
        if let Some(invalid) = duration.invalid() {
            return Instant {
                zone: self.zone.clone(),
                state: State::Invalid(invalid.clone()),
            };
        }
        match self.try_plus(snap, duration) {
            Ok(instant) => instant,
            Err(_) => {
                let invalid = Invalid::explain(
                    Reason::MillisOutOfRange,
                    format_args!(
                        "adding {duration} to {self} is outside \
                         the supported range",
                    ),
                );
                Instant::invalid_in(self.zone.clone(), invalid)
            }
        }
    }

    /// Does the arithmetic of `plus`, failing only when the result is out
    /// of range.
    fn try_plus(
        &self,
        snap: &Snapshot,
        duration: &Duration,
    ) -> Result<Instant, ()> {
        let whole = |unit| duration.get(unit).trunc();
        let months = f64::from(snap.fields.year) * 12.0
            + f64::from(snap.fields.month - 1)
            + whole(Unit::Year) * 12.0
            + whole(Unit::Quarter) * 3.0
            + whole(Unit::Month);
        let year = (months / 12.0).floor();
        let month = months - year * 12.0 + 1.0;
        if year.abs() > f64::from(civil::YEAR_LIMIT) {
            return Err(());
        }
        let (year, month) = (year as i32, month as i32);
        let day = f64::from(
            snap.fields.day.min(civil::days_in_month(year, month)),
        ) + whole(Unit::Day)
            + whole(Unit::Week) * 7.0;
        if day.abs() > MAX_MILLIS as f64 / MILLIS_PER_DAY as f64 * 2.0 {
            return Err(());
        }
        let fields = CalendarFields { year, month, day: day as i32, ..snap.fields };
        let Some(resolved) = resolve::resolve(
            fields.to_local_millis(),
            &self.zone,
            Some(snap.offset),
        ) else {
            return Ok(Instant::unsupported_zone(self.zone.clone()));
        };
        let fraction = Duration::new()
            .years(duration.get(Unit::Year) - whole(Unit::Year))
            .quarters(duration.get(Unit::Quarter) - whole(Unit::Quarter))
            .months(duration.get(Unit::Month) - whole(Unit::Month))
            .weeks(duration.get(Unit::Week) - whole(Unit::Week))
            .days(duration.get(Unit::Day) - whole(Unit::Day))
            .hours(duration.get(Unit::Hour))
            .minutes(duration.get(Unit::Minute))
            .seconds(duration.get(Unit::Second))
            .milliseconds(duration.get(Unit::Millisecond))
            .to_millis();
        if fraction == 0.0 {
            return Ok(Instant::from_millis(resolved.millis, self.zone.clone()));
        }
        let millis = float_to_millis(resolved.millis as f64 + fraction)
            .ok_or(())?;
        Ok(Instant::from_millis(millis, self.zone.clone()))
    }

    /// Subtracts a duration from this instant.
    ///
    /// This is the same as adding the negated duration.
    pub fn minus(&self, duration: &Duration) -> Instant {
        self.plus(&duration.negate())
    }

    /// Returns the start of the given unit of time containing this instant.
    ///
    /// Weeks start on Monday. Use [`Instant::start_of_with`] for other week
    /// rules.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Instant, Unit};
    ///
    /// let instant = Instant::from_calendar(
    ///     CalendarFields::new(2024, 8, 15, 13, 45, 30, 500),
    ///     Zone::UTC,
    /// );
    /// assert_eq!(instant.start_of(Unit::Quarter).to_string(), "2024-07-01T00:00:00.000Z");
    /// assert_eq!(instant.start_of(Unit::Week).to_string(), "2024-08-12T00:00:00.000Z");
    /// assert_eq!(instant.start_of(Unit::Hour).to_string(), "2024-08-15T13:00:00.000Z");
    /// assert_eq!(instant.end_of(Unit::Month).to_string(), "2024-08-31T23:59:59.999Z");
    /// ```
    pub fn start_of(&self, unit: Unit) -> Instant {
        self.start_of_with(unit, WeekRules::ISO)
    }

    /// Like [`Instant::start_of`], but weeks start on the first day of the
    /// week of the given rules.
    pub fn start_of_with(&self, unit: Unit, rules: WeekRules) -> Instant {
        let snap = match self.state {
            State::Valid(ref snap) => snap,
            State::Invalid(_) => return self.clone(),
        };
        if unit == Unit::Millisecond {
            return self.clone();
        }
        let mut fields = snap.fields;
        fields.millisecond = 0;
        if unit >= Unit::Minute {
            fields.second = 0;
        }
        if unit >= Unit::Hour {
            fields.minute = 0;
        }
        if unit >= Unit::Day {
            fields.hour = 0;
        }
        match unit {
            Unit::Year => {
                fields.month = 1;
                fields.day = 1;
            }
            Unit::Quarter => {
                fields.month = (fields.quarter() - 1) * 3 + 1;
                fields.day = 1;
            }
            Unit::Month => fields.day = 1,
            Unit::Week => {
                let back = (snap.week.weekday - rules.start_of_week())
                    .rem_euclid(7);
                fields.day -= back;
            }
            _ => {}
        }
        Instant::resolve_local(
            fields.to_local_millis(),
            self.zone.clone(),
            Some(snap.offset),
        )
    }

    /// Returns the last millisecond of the given unit of time containing
    /// this instant.
    ///
    /// Weeks start on Monday. Use [`Instant::end_of_with`] for other week
    /// rules.
    pub fn end_of(&self, unit: Unit) -> Instant {
        self.end_of_with(unit, WeekRules::ISO)
    }

    /// Like [`Instant::end_of`], but weeks start on the first day of the
    /// week of the given rules.
    pub fn end_of_with(&self, unit: Unit, rules: WeekRules) -> Instant {
        self.plus(&Duration::new().set(unit, 1))
            .start_of_with(unit, rules)
            .minus(&Duration::from_millis(1.0))
    }

    /// Returns true when both instants fall in the same unit of time, as
    /// seen in the zone of `other`.
    ///
    /// This is false when either instant is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Instant, Unit};
    ///
    /// let a = Instant::from_calendar(CalendarFields::date(2024, 3, 1), Zone::UTC);
    /// let b = Instant::from_calendar(CalendarFields::date(2024, 3, 31), Zone::UTC);
    /// assert!(a.has_same(&b, Unit::Month));
    /// assert!(!a.has_same(&b, Unit::Week));
    /// ```
    pub fn has_same(&self, other: &Instant, unit: Unit) -> bool {
        let (Some(_), Some(millis)) = (self.to_millis(), other.to_millis())
        else {
            return false;
        };
        let adjusted = self.set_zone_keeping_local_time(other.zone.clone());
        let (Some(start), Some(end)) = (
            adjusted.start_of(unit).to_millis(),
            adjusted.end_of(unit).to_millis(),
        ) else {
            return false;
        };
        start <= millis && millis <= end
    }

    /// Returns the difference `self - other` in the given units.
    ///
    /// Calendar units (years, quarters, months, weeks and days) count how
    /// many of them can be added to the earlier instant without passing
    /// the later one. Smaller units receive the elapsed time that remains.
    /// When no smaller unit is requested, the remainder becomes a fraction
    /// of the smallest calendar unit requested. An empty list of units
    /// means milliseconds.
    ///
    /// Diffing with an invalid instant produces an invalid duration.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Duration, Instant, Unit};
    ///
    /// let start = Instant::from_calendar(
    ///     CalendarFields::new(1982, 5, 25, 9, 45, 0, 0),
    ///     Zone::UTC,
    /// );
    /// let end = Instant::from_calendar(
    ///     CalendarFields::new(1983, 10, 14, 10, 30, 0, 0),
    ///     Zone::UTC,
    /// );
    /// let dur = end.diff(&start, &[Unit::Month, Unit::Day]);
    /// assert_eq!(dur, Duration::new().months(16).days(19.03125));
    ///
    /// let dur = start.diff(&end, &[Unit::Month, Unit::Day, Unit::Hour]);
    /// assert_eq!(dur, Duration::new().months(-16).days(-19).hours(-0.75));
    /// ```
    pub fn diff(&self, other: &Instant, units: &[Unit]) -> Duration {
        let (Some(this), Some(that)) = (self.to_millis(), other.to_millis())
        else {
            return Duration::from_invalid(Invalid::compose(
                "diffing",
                self.invalid(),
                other.invalid(),
            ));
        };
        let units: &[Unit] =
            if units.is_empty() { &[Unit::Millisecond] } else { units };
        if that > this {
            diff::calendar_diff(self, other, units).negate()
        } else {
            diff::calendar_diff(other, self, units)
        }
    }

    /// Returns the interval from this instant to `other`.
    ///
    /// The interval is invalid when `other` comes before this instant.
    pub fn until(&self, other: &Instant) -> Interval {
        Interval::new(self.clone(), other.clone())
    }

    /// Returns the earliest of the given instants.
    ///
    /// An invalid instant is returned as soon as it is seen. Ties keep the
    /// first instant given. This returns `None` when no instants are given.
    pub fn min<I: IntoIterator<Item = Instant>>(instants: I) -> Option<Instant> {
        Instant::best_by(instants, |candidate, best| candidate < best)
    }

    /// Returns the latest of the given instants.
    ///
    /// An invalid instant is returned as soon as it is seen. Ties keep the
    /// first instant given. This returns `None` when no instants are given.
    pub fn max<I: IntoIterator<Item = Instant>>(instants: I) -> Option<Instant> {
        Instant::best_by(instants, |candidate, best| candidate > best)
    }

    fn best_by<I, F>(instants: I, better: F) -> Option<Instant>
    where
        I: IntoIterator<Item = Instant>,
        F: Fn(i64, i64) -> bool,
    {
        let mut best: Option<(i64, Instant)> = None;
        for instant in instants {
            let Some(millis) = instant.to_millis() else {
                return Some(instant);
            };
            match best {
                Some((best_millis, _)) if !better(millis, best_millis) => {}
                _ => best = Some((millis, instant)),
            }
        }
        best.map(|(_, instant)| instant)
    }
}

/// Accessors.
///
/// Every accessor returns `None` for invalid instants.
impl Instant {
    /// Returns the zone this instant is viewed in.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Returns true when this instant is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, State::Valid(_))
    }

    /// Returns why this instant is invalid, if it is.
    pub fn invalid(&self) -> Option<&Invalid> {
        match self.state {
            State::Valid(_) => None,
            State::Invalid(ref invalid) => Some(invalid),
        }
    }

    /// Returns this instant when it is valid, or an error otherwise.
    pub fn validate(self) -> Result<Instant, Error> {
        match self.state {
            State::Valid(_) => Ok(self),
            State::Invalid(invalid) => Err(Error::from(invalid)),
        }
    }

    /// Returns milliseconds since the Unix epoch.
    pub fn to_millis(&self) -> Option<i64> {
        self.snapshot().map(|snap| snap.millis)
    }

    /// Returns seconds since the Unix epoch, including the fraction.
    pub fn to_seconds(&self) -> Option<f64> {
        self.to_millis().map(|millis| millis as f64 / 1000.0)
    }

    /// Returns the offset from UTC, in minutes, in effect at this instant.
    pub fn offset(&self) -> Option<i32> {
        self.snapshot().map(|snap| snap.offset)
    }

    /// Returns the Gregorian calendar fields of this instant in its zone.
    pub fn fields(&self) -> Option<CalendarFields> {
        self.snapshot().map(|snap| snap.fields)
    }

    pub fn year(&self) -> Option<i32> {
        self.fields().map(|f| f.year)
    }

    pub fn month(&self) -> Option<i32> {
        self.fields().map(|f| f.month)
    }

    pub fn day(&self) -> Option<i32> {
        self.fields().map(|f| f.day)
    }

    pub fn hour(&self) -> Option<i32> {
        self.fields().map(|f| f.hour)
    }

    pub fn minute(&self) -> Option<i32> {
        self.fields().map(|f| f.minute)
    }

    pub fn second(&self) -> Option<i32> {
        self.fields().map(|f| f.second)
    }

    pub fn millisecond(&self) -> Option<i32> {
        self.fields().map(|f| f.millisecond)
    }

    /// Returns the quarter, from `1` to `4`.
    pub fn quarter(&self) -> Option<i32> {
        self.fields().map(|f| f.quarter())
    }

    /// Returns the ISO weekday, from `1` (Monday) to `7` (Sunday).
    pub fn weekday(&self) -> Option<i32> {
        self.snapshot().map(|snap| snap.week.weekday)
    }

    /// Returns the day of the year, starting at `1`.
    pub fn ordinal(&self) -> Option<i32> {
        self.snapshot().map(|snap| snap.ordinal)
    }

    /// Returns the ISO week year.
    pub fn week_year(&self) -> Option<i32> {
        self.snapshot().map(|snap| snap.week.week_year)
    }

    /// Returns the ISO week number.
    pub fn week_number(&self) -> Option<i32> {
        self.snapshot().map(|snap| snap.week.week_number)
    }

    /// Returns the ISO week date.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::{CalendarFields, WeekDate}, tz::Zone, Instant};
    ///
    /// let instant = Instant::from_calendar(CalendarFields::date(2021, 1, 1), Zone::UTC);
    /// assert_eq!(instant.week_date(), Some(WeekDate::new(2020, 53, 5)));
    /// assert_eq!(instant.ordinal(), Some(1));
    /// ```
    pub fn week_date(&self) -> Option<WeekDate> {
        self.snapshot().map(|snap| snap.week)
    }

    /// Returns the ordinal date.
    pub fn ordinal_date(&self) -> Option<OrdinalDate> {
        self.snapshot().map(|snap| OrdinalDate {
            year: snap.fields.year,
            ordinal: snap.ordinal,
        })
    }

    /// Returns the week date under the default week rules.
    ///
    /// See [`settings::set_default_week_rules`].
    pub fn local_week_date(&self) -> Option<WeekDate> {
        self.local_week_date_with(settings::default_week_rules())
    }

    /// Returns the week date under the given week rules.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::{CalendarFields, WeekDate, WeekRules}, tz::Zone, Instant};
    ///
    /// // A Sunday.
    /// let instant = Instant::from_calendar(CalendarFields::date(2024, 1, 7), Zone::UTC);
    /// assert_eq!(instant.week_date(), Some(WeekDate::new(2024, 1, 7)));
    /// let us = WeekRules::new(7, 1)?;
    /// assert_eq!(instant.local_week_date_with(us), Some(WeekDate::new(2024, 2, 1)));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn local_week_date_with(&self, rules: WeekRules) -> Option<WeekDate> {
        self.fields().map(|f| f.week_date(rules))
    }

    /// Returns the weekday under the default week rules, where `1` is the
    /// first day of the week.
    pub fn local_weekday(&self) -> Option<i32> {
        self.local_week_date().map(|w| w.weekday)
    }

    /// Returns the week number under the default week rules.
    pub fn local_week_number(&self) -> Option<i32> {
        self.local_week_date().map(|w| w.week_number)
    }

    /// Returns the week year under the default week rules.
    pub fn local_week_year(&self) -> Option<i32> {
        self.local_week_date().map(|w| w.week_year)
    }

    /// Returns the number of days in this instant's month.
    pub fn days_in_month(&self) -> Option<i32> {
        self.fields().map(|f| civil::days_in_month(f.year, f.month))
    }

    /// Returns the number of days in this instant's year.
    pub fn days_in_year(&self) -> Option<i32> {
        self.fields().map(|f| civil::days_in_year(f.year))
    }

    /// Returns the number of weeks in this instant's ISO week year.
    pub fn weeks_in_week_year(&self) -> Option<i32> {
        self.week_year()
            .map(|wy| civil::weeks_in_week_year(wy, WeekRules::ISO))
    }

    /// Returns the number of weeks in this instant's week year under the
    /// default week rules.
    pub fn weeks_in_local_week_year(&self) -> Option<i32> {
        let rules = settings::default_week_rules();
        self.local_week_date_with(rules)
            .map(|w| civil::weeks_in_week_year(w.week_year, rules))
    }

    /// Returns true when this instant's year is a leap year.
    ///
    /// This is false for invalid instants.
    pub fn is_in_leap_year(&self) -> bool {
        self.year().map_or(false, civil::is_leap_year)
    }

    /// Returns the name of the offset in effect at this instant.
    pub fn offset_name(&self, style: NameStyle) -> Option<String> {
        let millis = self.to_millis()?;
        self.zone.offset_name(millis, style)
    }

    /// Formats the offset in effect at this instant.
    pub fn format_offset(&self, format: OffsetFormat) -> Option<String> {
        let millis = self.to_millis()?;
        self.zone.format_offset(millis, format)
    }

    /// Returns true when daylight saving time is in effect at this instant.
    ///
    /// This is decided by comparing the offset to the offsets at the start
    /// of January and May of the same year. The offset is in daylight
    /// saving time when it is bigger than either.
    ///
    /// This is false for invalid instants.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{tz::Zone, Instant};
    ///
    /// let zone = Zone::named("Australia/Sydney");
    /// // 2024-01-01T00:00:00Z
    /// assert!(Instant::from_millis(1_704_067_200_000, zone.clone()).is_in_dst());
    /// // 2024-07-01T00:00:00Z
    /// assert!(!Instant::from_millis(1_719_792_000_000, zone).is_in_dst());
    /// ```
    pub fn is_in_dst(&self) -> bool {
        let Some(offset) = self.offset() else { return false };
        if self.zone.is_offset_fixed() {
            return false;
        }
        let january = self.set(FieldSpec::new().month(1).day(1)).offset();
        let may = self.set(FieldSpec::new().month(5)).offset();
        january.map_or(false, |o| offset > o) || may.map_or(false, |o| offset > o)
    }

    /// Returns true when this instant's zone never changes its offset.
    ///
    /// This is false for invalid instants.
    pub fn is_offset_fixed(&self) -> bool {
        self.is_valid() && self.zone.is_offset_fixed()
    }
}

/// Crate internal helpers.
impl Instant {
    fn snapshot(&self) -> Option<&Snapshot> {
        match self.state {
            State::Valid(ref snap) => Some(snap),
            State::Invalid(_) => None,
        }
    }

    fn invalid_in(zone: Zone, invalid: Invalid) -> Instant {
        Instant { zone, state: State::Invalid(invalid) }
    }

    fn unsupported_zone(zone: Zone) -> Instant {
        let invalid = Invalid::explain(
            Reason::UnsupportedZone,
            format_args!("the zone \"{zone}\" is not supported"),
        );
        Instant::invalid_in(zone, invalid)
    }

    /// Resolves a wall clock time, given as local milliseconds, in a zone.
    fn resolve_local(local: i64, zone: Zone, hint: Option<i32>) -> Instant {
        match resolve::resolve(local, &zone, hint) {
            None => Instant::unsupported_zone(zone),
            Some(resolved) => Instant::from_millis(resolved.millis, zone),
        }
    }

    /// Invalidates this instant when a weekday was given along with a
    /// Gregorian date that falls on a different weekday.
    fn check_weekday(self, spec: &FieldSpec, style: Style) -> Instant {
        let (Style::Gregorian, Some(weekday), Some(iso)) =
            (style, spec.weekday_given(), self.weekday())
        else {
            return self;
        };
        if spec.rules().local_weekday(iso) == weekday {
            return self;
        }
        let invalid = Invalid::explain(
            Reason::MismatchedWeekday,
            format_args!(
                "you can't specify both a weekday of {weekday} \
                 and a date of {self}",
            ),
        );
        Instant::invalid_in(self.zone, invalid)
    }
}

impl Eq for Instant {}

impl PartialEq for Instant {
    fn eq(&self, rhs: &Instant) -> bool {
        match (&self.state, &rhs.state) {
            (State::Valid(a), State::Valid(b)) => {
                a.millis == b.millis && self.zone == rhs.zone
            }
            (State::Invalid(a), State::Invalid(b)) => a == b,
            _ => false,
        }
    }
}

impl core::fmt::Debug for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.state {
            State::Valid(ref snap) => f
                .debug_struct("Instant")
                .field("millis", &snap.millis)
                .field("zone", &self.zone)
                .field("local", &format_args!("{self}"))
                .finish(),
            State::Invalid(ref invalid) => {
                f.debug_tuple("Instant").field(invalid).finish()
            }
        }
    }
}

/// Renders the instant in ISO 8601 with milliseconds and an offset, like
/// `2024-07-01T09:00:00.000+09:00`. Fixed zones with a zero offset use `Z`.
/// Invalid instants render as `Invalid DateTime`.
impl core::fmt::Display for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let Some(snap) = self.snapshot() else {
            return f.write_str("Invalid DateTime");
        };
        write!(f, "{}", snap.fields)?;
        if snap.offset == 0 && self.zone.is_universal() {
            return f.write_str("Z");
        }
        match self.zone.format_offset(snap.millis, OffsetFormat::Short) {
            Some(offset) => f.write_str(&offset),
            None => Ok(()),
        }
    }
}

/// Converts a system time to an instant in UTC.
///
/// # Errors
///
/// This fails when the system time is beyond `±8.64e15` milliseconds from
/// the Unix epoch.
impl TryFrom<SystemTime> for Instant {
    type Error = Error;

    fn try_from(time: SystemTime) -> Result<Instant, Error> {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(dur) => i64::try_from(dur.as_millis())
                .ok()
                .filter(|&ms| ms <= MAX_MILLIS)
                .ok_or(E::SystemTimeAfterEpochOverflow)?,
            Err(err) => i64::try_from(err.duration().as_millis())
                .ok()
                .filter(|&ms| ms <= MAX_MILLIS)
                .map(|ms| -ms)
                .ok_or(E::SystemTimeBeforeEpochOverflow)?,
        };
        Instant::from_millis(millis, Zone::UTC).validate()
    }
}

/// Converts an instant to a system time.
///
/// # Errors
///
/// This fails when the instant is invalid.
impl TryFrom<Instant> for SystemTime {
    type Error = Error;

    fn try_from(instant: Instant) -> Result<SystemTime, Error> {
        let millis =
            instant.to_millis().ok_or(E::InvalidInstantToSystemTime)?;
        let dur = std::time::Duration::from_millis(millis.unsigned_abs());
        Ok(if millis >= 0 { UNIX_EPOCH + dur } else { UNIX_EPOCH - dur })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Instant {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as _;

        match self.state {
            State::Valid(ref snap) => serializer.serialize_i64(snap.millis),
            State::Invalid(ref invalid) => Err(S::Error::custom(invalid)),
        }
    }
}

/// Deserializes milliseconds since the Unix epoch as an instant in UTC.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Instant {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Instant, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        Instant::from_millis(millis, Zone::UTC)
            .validate()
            .map_err(serde::de::Error::custom)
    }
}

/// Truncates a floating point count of milliseconds, failing when it is not
/// finite or beyond the supported range.
fn float_to_millis(millis: f64) -> Option<i64> {
    if !millis.is_finite() || millis.abs() > MAX_MILLIS as f64 {
        return None;
    }
    Some(millis.trunc() as i64)
}
