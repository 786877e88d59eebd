/*!
The calendar difference between two instants.

Calendar units have no fixed length, so a difference in months is not a
division of elapsed milliseconds. Instead, each calendar unit requested, from
biggest to smallest, is counted by repeatedly adding to the earlier instant:
the count is the most that can be added without passing the later instant.
Whatever time remains after the smallest calendar unit is either given to the
requested clock units or, when none were requested, expressed as a fraction
of one more of the smallest calendar unit.
*/

use crate::{
    civil::{itime::MILLIS_PER_DAY, CalendarFields},
    duration::Duration,
    instant::Instant,
    invalid::Invalid,
    unit::Unit,
};

/// The units counted by adding to the calendar, biggest first.
const CALENDAR_UNITS: [Unit; 5] =
    [Unit::Year, Unit::Quarter, Unit::Month, Unit::Week, Unit::Day];

/// Returns `later - earlier` in the given units.
///
/// Both instants must be valid and `earlier` must not come after `later`.
/// The result is only invalid when an intermediate instant is out of range.
pub(crate) fn calendar_diff(
    earlier: &Instant,
    later: &Instant,
    units: &[Unit],
) -> Duration {
    match try_calendar_diff(earlier, later, units) {
        Ok(dur) => dur,
        Err(invalid) => Duration::from_invalid(invalid),
    }
}

fn try_calendar_diff(
    earlier: &Instant,
    later: &Instant,
    units: &[Unit],
) -> Result<Duration, Invalid> {
    let later_millis = millis(later)?;
    let mut results = Duration::new();
    let mut cursor = earlier.clone();
    let mut cursor_millis = millis(earlier)?;
    let mut high_water = cursor_millis;
    let mut lowest = None;
    for unit in CALENDAR_UNITS {
        if !units.contains(&unit) {
            continue;
        }
        lowest = Some(unit);
        results = results.set(unit, count(unit, &cursor, later)? as f64);
        let candidate = earlier.plus(&results);
        high_water = millis(&candidate)?;
        if high_water <= later_millis {
            cursor = candidate;
            cursor_millis = high_water;
            continue;
        }
        // Overshot. Adding to the end of a month clamps the day, so this
        // can need backing off twice.
        let backed_off = results.get(unit) - 1.0;
        results = results.set(unit, backed_off);
        cursor = earlier.plus(&results);
        cursor_millis = millis(&cursor)?;
        if cursor_millis > later_millis {
            high_water = cursor_millis;
            let backed_off = results.get(unit) - 1.0;
            results = results.set(unit, backed_off);
            cursor = earlier.plus(&results);
            cursor_millis = millis(&cursor)?;
        }
    }
    trace!(
        "calendar units of diff are {results:?}, \
         leaving {} milliseconds",
        later_millis - cursor_millis,
    );

    let remaining = (later_millis - cursor_millis) as f64;
    let clock_units: Vec<Unit> =
        units.iter().copied().filter(|unit| !unit.is_calendar()).collect();
    if !clock_units.is_empty() {
        return Ok(Duration::from_millis(remaining)
            .shift_to(&clock_units)
            .plus(&results));
    }
    let Some(lowest) = lowest else { return Ok(results) };
    if high_water < later_millis {
        high_water = millis(&cursor.plus(&Duration::new().set(lowest, 1)))?;
    }
    if high_water != cursor_millis {
        let fraction = remaining / (high_water - cursor_millis) as f64;
        let total = results.get(lowest) + fraction;
        results = results.set(lowest, total);
    }
    Ok(results)
}

/// Returns how many of a calendar unit separate the calendar fields of two
/// instants, ignoring the time of day.
fn count(unit: Unit, from: &Instant, to: &Instant) -> Result<i64, Invalid> {
    let (a, b) = (fields(from)?, fields(to)?);
    let years = i64::from(b.year - a.year);
    Ok(match unit {
        Unit::Year => years,
        Unit::Quarter => i64::from(b.quarter() - a.quarter()) + years * 4,
        Unit::Month => i64::from(b.month - a.month) + years * 12,
        Unit::Week => day_count(&a, &b) / 7,
        Unit::Day => day_count(&a, &b),
        _ => unreachable!("{unit:?} is not counted on the calendar"),
    })
}

/// Returns the number of calendar days between the dates of two records.
fn day_count(a: &CalendarFields, b: &CalendarFields) -> i64 {
    let epoch_day = |f: &CalendarFields| {
        CalendarFields::date(f.year, f.month, f.day)
            .to_local_millis()
            .div_euclid(MILLIS_PER_DAY)
    };
    epoch_day(b) - epoch_day(a)
}

fn millis(instant: &Instant) -> Result<i64, Invalid> {
    match instant.invalid() {
        Some(invalid) => Err(invalid.clone()),
        None => Ok(instant.to_millis().unwrap_or_default()),
    }
}

fn fields(instant: &Instant) -> Result<CalendarFields, Invalid> {
    match instant.invalid() {
        Some(invalid) => Err(invalid.clone()),
        None => Ok(instant.fields().unwrap_or_default()),
    }
}
