use crate::{
    error::{duration::Error as E, Error},
    invalid::{Invalid, Reason},
    unit::Unit,
};

pub use self::matrix::ConversionAccuracy;

mod matrix;

/// The units `Duration::shift_to_all` converts to. Quarters are left out.
const SHIFT_ALL: [Unit; 8] = [
    Unit::Year,
    Unit::Month,
    Unit::Week,
    Unit::Day,
    Unit::Hour,
    Unit::Minute,
    Unit::Second,
    Unit::Millisecond,
];

type Values = [Option<f64>; 9];

/// A quantity of time expressed as an amount of each unit.
///
/// A `Duration` is a bag of units, from years down to milliseconds, each
/// holding a signed real number. Only the units explicitly set are present.
/// Reading a unit that is not present returns zero, and units are never
/// added by an operation unless asked for, so `{ hours: 1, seconds: 30 }`
/// stays that way until it is explicitly converted with
/// [`Duration::shift_to`] or [`Duration::normalize`].
///
/// Calendar units (years, quarters and months) have no fixed length. When
/// they must be converted to other units, the ratios used come from the
/// duration's [`ConversionAccuracy`]. When a duration is added to an
/// [`Instant`](crate::Instant), calendar units are applied to the calendar
/// instead.
///
/// Like the other values in this crate, a `Duration` is either valid or
/// carries an [`Invalid`] describing why it is not. Every operation on an
/// invalid duration returns an invalid duration, and every unit of an
/// invalid duration reads as NaN.
///
/// # Equality
///
/// Two valid durations are equal when each of their units are equal, where
/// a unit that is not present equals an explicit zero. Use
/// [`Duration::has`] to tell an absent unit from an explicit zero.
/// Conversion accuracy is ignored. Invalid durations are never equal to
/// anything.
///
/// # Example
///
/// ```
/// use calends::{Duration, ToDuration, Unit};
///
/// let dur = 1.hours() + 30.seconds();
/// let shifted = dur.shift_to(&[Unit::Minute, Unit::Millisecond]);
/// assert_eq!(shifted, Duration::new().minutes(60).milliseconds(30_000));
/// assert_eq!(dur.to_millis(), 3_630_000.0);
/// assert_eq!(dur.to_string(), "PT1H30S");
/// ```
#[derive(Clone)]
pub struct Duration {
    values: Values,
    accuracy: ConversionAccuracy,
    invalid: Option<Invalid>,
}

impl Duration {
    /// Creates an empty duration, with no units present.
    pub fn new() -> Duration {
        Duration {
            values: [None; 9],
            accuracy: ConversionAccuracy::Casual,
            invalid: None,
        }
    }

    /// Creates a duration of the given number of milliseconds.
    pub fn from_millis(millis: f64) -> Duration {
        Duration::new().milliseconds(millis)
    }

    /// Creates an invalid duration.
    pub fn from_invalid(invalid: Invalid) -> Duration {
        Duration { invalid: Some(invalid), ..Duration::new() }
    }

    /// Sets the amount of years.
    pub fn years(self, years: impl Into<f64>) -> Duration {
        self.set(Unit::Year, years)
    }

    /// Sets the amount of quarters.
    pub fn quarters(self, quarters: impl Into<f64>) -> Duration {
        self.set(Unit::Quarter, quarters)
    }

    /// Sets the amount of months.
    pub fn months(self, months: impl Into<f64>) -> Duration {
        self.set(Unit::Month, months)
    }

    /// Sets the amount of weeks.
    pub fn weeks(self, weeks: impl Into<f64>) -> Duration {
        self.set(Unit::Week, weeks)
    }

    /// Sets the amount of days.
    pub fn days(self, days: impl Into<f64>) -> Duration {
        self.set(Unit::Day, days)
    }

    /// Sets the amount of hours.
    pub fn hours(self, hours: impl Into<f64>) -> Duration {
        self.set(Unit::Hour, hours)
    }

    /// Sets the amount of minutes.
    pub fn minutes(self, minutes: impl Into<f64>) -> Duration {
        self.set(Unit::Minute, minutes)
    }

    /// Sets the amount of seconds.
    pub fn seconds(self, seconds: impl Into<f64>) -> Duration {
        self.set(Unit::Second, seconds)
    }

    /// Sets the amount of milliseconds.
    pub fn milliseconds(self, milliseconds: impl Into<f64>) -> Duration {
        self.set(Unit::Millisecond, milliseconds)
    }

    /// Sets the amount of the given unit, making it present.
    ///
    /// Setting a value that is not finite produces an invalid duration.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{invalid::Reason, Duration, Unit};
    ///
    /// let dur = Duration::new().set(Unit::Day, 2).set(Unit::Day, 3);
    /// assert_eq!(dur.get(Unit::Day), 3.0);
    ///
    /// let dur = Duration::new().set(Unit::Day, f64::NAN);
    /// assert_eq!(dur.invalid().unwrap().reason(), Reason::InvalidInput);
    /// ```
    pub fn set(mut self, unit: Unit, value: impl Into<f64>) -> Duration {
        if self.invalid.is_some() {
            return self;
        }
        let value = value.into();
        if !value.is_finite() {
            return Duration::from_invalid(not_finite(unit, value));
        }
        self.values[unit.index()] = Some(value);
        self
    }

    /// Returns the amount of the given unit.
    ///
    /// Units that are not present are zero. Every unit of an invalid
    /// duration is NaN.
    pub fn get(&self, unit: Unit) -> f64 {
        if self.invalid.is_some() {
            return f64::NAN;
        }
        self.values[unit.index()].unwrap_or(0.0)
    }

    /// Returns true when the given unit is present.
    pub fn has(&self, unit: Unit) -> bool {
        self.values[unit.index()].is_some()
    }

    /// Returns the present units and their amounts, biggest unit first.
    pub fn units(&self) -> impl Iterator<Item = (Unit, f64)> + '_ {
        Unit::ALL
            .into_iter()
            .filter_map(|unit| Some((unit, self.values[unit.index()]?)))
    }

    /// Returns the ratios used to convert calendar units.
    pub fn accuracy(&self) -> ConversionAccuracy {
        self.accuracy
    }

    /// Returns this duration with different conversion ratios.
    pub fn with_accuracy(self, accuracy: ConversionAccuracy) -> Duration {
        Duration { accuracy, ..self }
    }

    /// Returns true when this duration is valid.
    pub fn is_valid(&self) -> bool {
        self.invalid.is_none()
    }

    /// Returns why this duration is invalid, if it is.
    pub fn invalid(&self) -> Option<&Invalid> {
        self.invalid.as_ref()
    }

    /// Returns this duration when it is valid, or an error otherwise.
    pub fn validate(self) -> Result<Duration, Error> {
        match self.invalid {
            None => Ok(self),
            Some(invalid) => Err(Error::from(invalid)),
        }
    }

    /// Returns the total length of this duration in milliseconds.
    ///
    /// Calendar units are converted with the duration's conversion ratios.
    /// This is NaN for invalid durations.
    pub fn to_millis(&self) -> f64 {
        if self.invalid.is_some() {
            return f64::NAN;
        }
        to_millis(self.accuracy, &self.values)
    }

    /// Returns the total length of this duration in the given unit.
    ///
    /// This is NaN for invalid durations.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{Duration, Unit};
    ///
    /// let dur = Duration::new().hours(36);
    /// assert_eq!(dur.total(Unit::Day), 1.5);
    /// assert_eq!(dur.total(Unit::Minute), 2_160.0);
    /// ```
    pub fn total(&self, unit: Unit) -> f64 {
        self.shift_to(&[unit]).get(unit)
    }

    /// Converts this duration to use exactly the given units.
    ///
    /// Units are filled from biggest to smallest. Each unit given receives
    /// the whole part of its own amount plus everything carried down from
    /// bigger units, and passes its fractional part on to the next unit.
    /// The smallest unit given keeps whatever fraction remains. Units not
    /// given are dropped after their amount is carried along.
    ///
    /// The result is [normalized](Duration::normalize), so the amounts of
    /// smaller units are rolled into bigger units when they are big enough.
    ///
    /// An empty list of units returns this duration unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{Duration, Unit};
    ///
    /// let dur = Duration::new().hours(1).seconds(30);
    /// let shifted = dur.shift_to(&[Unit::Minute, Unit::Millisecond]);
    /// assert_eq!(shifted.get(Unit::Minute), 60.0);
    /// assert_eq!(shifted.get(Unit::Millisecond), 30_000.0);
    ///
    /// let dur = Duration::new().days(1.5);
    /// let shifted = dur.shift_to(&[Unit::Day, Unit::Hour]);
    /// assert_eq!(shifted, Duration::new().days(1).hours(12));
    ///
    /// let dur = Duration::new().years(1);
    /// let shifted = dur.shift_to(&[Unit::Month]);
    /// assert_eq!(shifted, Duration::new().months(12));
    /// ```
    pub fn shift_to(&self, units: &[Unit]) -> Duration {
        if self.invalid.is_some() || units.is_empty() {
            return self.clone();
        }
        let accuracy = self.accuracy;
        let mut built: Values = [None; 9];
        let mut accumulated: Values = [None; 9];
        let mut last = Unit::Year;
        for unit in Unit::ALL {
            if units.contains(&unit) {
                last = unit;
                let mut own = 0.0;
                // Boil everything not yet converted down into this unit.
                for from in Unit::ALL {
                    if let Some(ref mut pending) = accumulated[from.index()] {
                        own += accuracy.ratio(from, unit) * *pending;
                        *pending = 0.0;
                    }
                }
                own += self.values[unit.index()].unwrap_or(0.0);
                let whole = own.trunc();
                built[unit.index()] = Some(whole);
                // Scaling first keeps, e.g., 1.001 - 1 from printing as
                // 0.0009999999999998899 in the smallest unit.
                accumulated[unit.index()] =
                    Some((own * 1000.0 - whole * 1000.0) / 1000.0);
            } else if let Some(value) = self.values[unit.index()] {
                accumulated[unit.index()] = Some(value);
            }
        }
        // Whatever remains becomes the fraction of the smallest unit.
        let mut remainder = 0.0;
        for from in Unit::ALL {
            let Some(pending) = accumulated[from.index()] else { continue };
            if pending == 0.0 {
                continue;
            }
            match from.cmp(&last) {
                core::cmp::Ordering::Equal => remainder += pending,
                core::cmp::Ordering::Less => {
                    remainder += pending / accuracy.ratio(last, from);
                }
                core::cmp::Ordering::Greater => {
                    remainder += pending * accuracy.ratio(from, last);
                }
            }
        }
        let slot = &mut built[last.index()];
        *slot = Some(slot.unwrap_or(0.0) + remainder);
        normalize_values(accuracy, &mut built);
        Duration { values: built, accuracy, invalid: None }
    }

    /// Converts this duration to years, months, weeks, days, hours,
    /// minutes, seconds and milliseconds.
    pub fn shift_to_all(&self) -> Duration {
        self.shift_to(&SHIFT_ALL)
    }

    /// Rolls the amounts of smaller units into the present bigger units.
    ///
    /// Units are never added. An amount is only carried into a bigger unit
    /// when that unit is present. Fractional amounts of bigger units are
    /// pushed down into the next smaller present unit.
    ///
    /// When the total of the duration is negative, every present unit ends
    /// up negative or zero.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::Duration;
    ///
    /// let dur = Duration::new().years(2).days(5000);
    /// assert_eq!(dur.normalize(), Duration::new().years(15).days(255));
    ///
    /// let dur = Duration::new().hours(12).minutes(-45);
    /// assert_eq!(dur.normalize(), Duration::new().hours(11).minutes(15));
    ///
    /// let dur = Duration::new().days(5000);
    /// assert_eq!(dur.normalize(), dur);
    /// ```
    pub fn normalize(&self) -> Duration {
        if self.invalid.is_some() {
            return self.clone();
        }
        let mut values = self.values;
        normalize_values(self.accuracy, &mut values);
        Duration { values, ..self.clone() }
    }

    /// Converts this duration to the biggest units possible and drops units
    /// that are zero.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::Duration;
    ///
    /// let dur = Duration::new().milliseconds(90_000);
    /// assert_eq!(dur.rescale(), Duration::new().minutes(1).seconds(30));
    /// assert_eq!(dur.rescale().to_string(), "PT1M30S");
    /// ```
    pub fn rescale(&self) -> Duration {
        self.normalize().shift_to_all().remove_zeros()
    }

    /// Drops every unit whose amount is zero.
    pub fn remove_zeros(&self) -> Duration {
        let mut dur = self.clone();
        for slot in dur.values.iter_mut() {
            if *slot == Some(0.0) {
                *slot = None;
            }
        }
        dur
    }

    /// Applies a function to the amount of every present unit.
    ///
    /// Producing a value that is not finite results in an invalid duration.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{Duration, Unit};
    ///
    /// let dur = Duration::new().hours(1).minutes(30);
    /// let doubled = dur.map_units(|value, _| value * 2.0);
    /// assert_eq!(doubled, Duration::new().hours(2).minutes(60));
    /// assert!(!doubled.has(Unit::Second));
    /// ```
    pub fn map_units<F>(&self, mut map: F) -> Duration
    where
        F: FnMut(f64, Unit) -> f64,
    {
        if self.invalid.is_some() {
            return self.clone();
        }
        let mut dur = self.clone();
        for (unit, value) in self.units() {
            let mapped = map(value, unit);
            if !mapped.is_finite() {
                return Duration::from_invalid(not_finite(unit, mapped));
            }
            dur.values[unit.index()] = Some(mapped);
        }
        dur
    }

    /// Adds two durations unit by unit, without normalizing.
    ///
    /// A unit is present in the result when it is present in either
    /// operand. Adding an invalid duration produces an invalid duration.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::Duration;
    ///
    /// let a = Duration::new().hours(1).minutes(50);
    /// let b = Duration::new().minutes(20);
    /// assert_eq!(a.plus(&b), Duration::new().hours(1).minutes(70));
    /// ```
    pub fn plus(&self, other: &Duration) -> Duration {
        if self.invalid.is_some() {
            return self.clone();
        }
        if other.invalid.is_some() {
            return Duration { accuracy: self.accuracy, ..other.clone() };
        }
        let mut dur = self.clone();
        for unit in Unit::ALL {
            if self.has(unit) || other.has(unit) {
                dur.values[unit.index()] = Some(self.get(unit) + other.get(unit));
            }
        }
        dur
    }

    /// Subtracts a duration unit by unit, without normalizing.
    pub fn minus(&self, other: &Duration) -> Duration {
        self.plus(&other.negate())
    }

    /// Flips the sign of every present unit.
    pub fn negate(&self) -> Duration {
        let mut dur = self.clone();
        for slot in dur.values.iter_mut() {
            if let Some(ref mut value) = *slot {
                if *value != 0.0 {
                    *value = -*value;
                }
            }
        }
        dur
    }
}

impl Default for Duration {
    fn default() -> Duration {
        Duration::new()
    }
}

impl PartialEq for Duration {
    fn eq(&self, rhs: &Duration) -> bool {
        if self.invalid.is_some() || rhs.invalid.is_some() {
            return false;
        }
        Unit::ALL.into_iter().all(|unit| self.get(unit) == rhs.get(unit))
    }
}

impl core::fmt::Debug for Duration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if let Some(ref invalid) = self.invalid {
            return f.debug_tuple("Duration").field(invalid).finish();
        }
        let mut s = f.debug_struct("Duration");
        for (unit, value) in self.units() {
            s.field(unit.plural(), &value);
        }
        if self.accuracy != ConversionAccuracy::Casual {
            s.field("accuracy", &self.accuracy);
        }
        s.finish()
    }
}

/// Renders the duration as an ISO 8601 duration, like `P1Y2M3DT4H5M6.007S`.
///
/// Quarters are rendered as months. Invalid durations render as
/// `Invalid Duration`.
impl core::fmt::Display for Duration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.invalid.is_some() {
            return f.write_str("Invalid Duration");
        }
        let get = |unit| self.get(unit);
        f.write_str("P")?;
        let mut empty = true;
        if get(Unit::Year) != 0.0 {
            write!(f, "{}Y", get(Unit::Year))?;
            empty = false;
        }
        if get(Unit::Month) != 0.0 || get(Unit::Quarter) != 0.0 {
            write!(f, "{}M", get(Unit::Month) + get(Unit::Quarter) * 3.0)?;
            empty = false;
        }
        if get(Unit::Week) != 0.0 {
            write!(f, "{}W", get(Unit::Week))?;
            empty = false;
        }
        if get(Unit::Day) != 0.0 {
            write!(f, "{}D", get(Unit::Day))?;
            empty = false;
        }
        let (hours, minutes) = (get(Unit::Hour), get(Unit::Minute));
        let (seconds, millis) = (get(Unit::Second), get(Unit::Millisecond));
        if hours != 0.0 || minutes != 0.0 || seconds != 0.0 || millis != 0.0 {
            f.write_str("T")?;
            empty = false;
        }
        if hours != 0.0 {
            write!(f, "{hours}H")?;
        }
        if minutes != 0.0 {
            write!(f, "{minutes}M")?;
        }
        if seconds != 0.0 || millis != 0.0 {
            let seconds = ((seconds + millis / 1000.0) * 1000.0).round() / 1000.0;
            write!(f, "{seconds}S")?;
        }
        if empty {
            f.write_str("T0S")?;
        }
        Ok(())
    }
}

impl core::ops::Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.negate()
    }
}

impl<'a> core::ops::Neg for &'a Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.negate()
    }
}

impl core::ops::Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        self.plus(&rhs)
    }
}

impl<'a> core::ops::Add<&'a Duration> for &'a Duration {
    type Output = Duration;

    fn add(self, rhs: &'a Duration) -> Duration {
        self.plus(rhs)
    }
}

impl core::ops::Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        self.minus(&rhs)
    }
}

impl<'a> core::ops::Sub<&'a Duration> for &'a Duration {
    type Output = Duration;

    fn sub(self, rhs: &'a Duration) -> Duration {
        self.minus(rhs)
    }
}

impl From<std::time::Duration> for Duration {
    fn from(dur: std::time::Duration) -> Duration {
        Duration::from_millis(dur.as_secs_f64() * 1000.0)
    }
}

/// Converts a duration to a standard library duration by its total
/// length in milliseconds.
///
/// # Errors
///
/// This fails when the duration is invalid, negative or too big.
impl TryFrom<Duration> for std::time::Duration {
    type Error = Error;

    fn try_from(dur: Duration) -> Result<std::time::Duration, Error> {
        let millis = dur.to_millis();
        if !millis.is_finite() {
            return Err(E::ConvertNonFinite.into());
        }
        if millis < 0.0 {
            return Err(E::ConvertNegative { millis }.into());
        }
        std::time::Duration::try_from_secs_f64(millis / 1000.0)
            .map_err(|_| E::ConvertOverflow { millis }.into())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Duration {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::{Error as _, SerializeMap};

        if let Some(ref invalid) = self.invalid {
            return Err(S::Error::custom(invalid));
        }
        let mut map = serializer.serialize_map(None)?;
        for (unit, value) in self.units() {
            map.serialize_entry(unit.plural(), &value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Duration {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        use serde::de;

        struct DurationVisitor;

        impl<'de> de::Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a map from unit names to amounts")
            }

            fn visit_map<A: de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<Duration, A::Error> {
                let mut dur = Duration::new();
                while let Some(key) = map.next_key::<String>()? {
                    let unit: Unit = key.parse().map_err(de::Error::custom)?;
                    let value: f64 = map.next_value()?;
                    dur = dur.set(unit, value);
                }
                dur.validate().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(DurationVisitor)
    }
}

/// Sums every present unit in milliseconds.
fn to_millis(accuracy: ConversionAccuracy, values: &Values) -> f64 {
    let mut sum = values[Unit::Millisecond.index()].unwrap_or(0.0);
    for unit in Unit::ALL {
        if unit == Unit::Millisecond {
            continue;
        }
        if let Some(value) = values[unit.index()] {
            if value != 0.0 {
                sum += value * accuracy.ratio(unit, Unit::Millisecond);
            }
        }
    }
    sum
}

/// Rolls smaller present units up into bigger present units, then pushes
/// fractions of bigger units down into smaller present units.
fn normalize_values(accuracy: ConversionAccuracy, values: &mut Values) {
    // The roll up assumes a positive total, so negative durations are
    // flipped while rolling up.
    let factor = if to_millis(accuracy, values) < 0.0 { -1.0 } else { 1.0 };
    let mut smaller: Option<Unit> = None;
    for unit in Unit::ALL.into_iter().rev() {
        let Some(value) = values[unit.index()] else { continue };
        if let Some(smaller) = smaller {
            let smaller_value = values[smaller.index()].unwrap_or(0.0);
            let conversion = accuracy.ratio(unit, smaller);
            // Flooring rounds away from zero for a negative smaller unit,
            // which borrows from this unit, and toward zero otherwise.
            let roll_up = (smaller_value * factor / conversion).floor();
            values[unit.index()] = Some(value + roll_up * factor);
            values[smaller.index()] =
                Some(smaller_value - roll_up * conversion * factor);
        }
        smaller = Some(unit);
    }

    let mut bigger: Option<Unit> = None;
    for unit in Unit::ALL {
        let Some(value) = values[unit.index()] else { continue };
        if let Some(bigger) = bigger {
            let bigger_value = values[bigger.index()].unwrap_or(0.0);
            let fraction = bigger_value % 1.0;
            values[bigger.index()] = Some(bigger_value - fraction);
            values[unit.index()] =
                Some(value + fraction * accuracy.ratio(bigger, unit));
        }
        bigger = Some(unit);
    }
}

fn not_finite(unit: Unit, value: f64) -> Invalid {
    Invalid::explain(
        Reason::InvalidInput,
        format_args!(
            "you specified {value} as {}, which is not a finite number",
            unit.plural(),
        ),
    )
}

/// A trait for creating durations from plain numbers.
///
/// # Example
///
/// ```
/// use calends::{Duration, ToDuration};
///
/// assert_eq!(5.days(), Duration::new().days(5));
/// assert_eq!(1.5.hours(), Duration::new().hours(1.5));
/// assert_eq!(1.year() + 2.months(), Duration::new().years(1).months(2));
/// ```
pub trait ToDuration: Sized {
    /// Creates a duration of this many years.
    fn years(self) -> Duration;
    /// Creates a duration of this many quarters.
    fn quarters(self) -> Duration;
    /// Creates a duration of this many months.
    fn months(self) -> Duration;
    /// Creates a duration of this many weeks.
    fn weeks(self) -> Duration;
    /// Creates a duration of this many days.
    fn days(self) -> Duration;
    /// Creates a duration of this many hours.
    fn hours(self) -> Duration;
    /// Creates a duration of this many minutes.
    fn minutes(self) -> Duration;
    /// Creates a duration of this many seconds.
    fn seconds(self) -> Duration;
    /// Creates a duration of this many milliseconds.
    fn milliseconds(self) -> Duration;

    /// Singular alias for [`ToDuration::years`].
    fn year(self) -> Duration {
        self.years()
    }
    /// Singular alias for [`ToDuration::quarters`].
    fn quarter(self) -> Duration {
        self.quarters()
    }
    /// Singular alias for [`ToDuration::months`].
    fn month(self) -> Duration {
        self.months()
    }
    /// Singular alias for [`ToDuration::weeks`].
    fn week(self) -> Duration {
        self.weeks()
    }
    /// Singular alias for [`ToDuration::days`].
    fn day(self) -> Duration {
        self.days()
    }
    /// Singular alias for [`ToDuration::hours`].
    fn hour(self) -> Duration {
        self.hours()
    }
    /// Singular alias for [`ToDuration::minutes`].
    fn minute(self) -> Duration {
        self.minutes()
    }
    /// Singular alias for [`ToDuration::seconds`].
    fn second(self) -> Duration {
        self.seconds()
    }
    /// Singular alias for [`ToDuration::milliseconds`].
    fn millisecond(self) -> Duration {
        self.milliseconds()
    }
}

macro_rules! impl_to_duration {
    ($($ty:ty),+ $(,)?) => {$(
        impl ToDuration for $ty {
            fn years(self) -> Duration {
                Duration::new().years(self as f64)
            }
            fn quarters(self) -> Duration {
                Duration::new().quarters(self as f64)
            }
            fn months(self) -> Duration {
                Duration::new().months(self as f64)
            }
            fn weeks(self) -> Duration {
                Duration::new().weeks(self as f64)
            }
            fn days(self) -> Duration {
                Duration::new().days(self as f64)
            }
            fn hours(self) -> Duration {
                Duration::new().hours(self as f64)
            }
            fn minutes(self) -> Duration {
                Duration::new().minutes(self as f64)
            }
            fn seconds(self) -> Duration {
                Duration::new().seconds(self as f64)
            }
            fn milliseconds(self) -> Duration {
                Duration::new().milliseconds(self as f64)
            }
        }
    )+};
}

impl_to_duration!(i8, i16, i32, i64, u8, u16, u32, f32, f64);
