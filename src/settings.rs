/*!
Process wide settings.

These are global and apply to every thread. They exist for the small set of
behaviors that callers need to configure once for a whole program:

* [`set_now`] overrides the clock used by [`Instant::now`](crate::Instant::now)
and by the defaulting of missing calendar fields.
* [`set_default_zone`] overrides the zone used when none is given.
* [`set_throw_on_invalid`] enables strict mode, in which creating an invalid
value panics.
* [`set_default_week_rules`] changes the rules used by the local week
accessors.
* [`reset_caches`] forgets the resolved time zones.
*/

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{civil::WeekRules, tz::Zone};

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

static NOW: RwLock<Option<Clock>> = RwLock::new(None);
static DEFAULT_ZONE: RwLock<Option<Zone>> = RwLock::new(None);
#[cfg(not(test))]
static THROW_ON_INVALID: AtomicBool = AtomicBool::new(false);
static WEEK_RULES: RwLock<WeekRules> = RwLock::new(WeekRules::ISO);

// Unit tests run in parallel, so strict mode only applies to the thread
// that enables it.
#[cfg(test)]
thread_local! {
    static THROW_ON_INVALID: AtomicBool = const { AtomicBool::new(false) };
}

/// Returns the current time as milliseconds since the Unix epoch.
///
/// This uses the clock installed with [`set_now`], or the system clock
/// otherwise.
pub fn now() -> i64 {
    if let Some(ref clock) = *NOW.read().unwrap() {
        return clock();
    }
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(dur) => i64::try_from(dur.as_millis()).unwrap_or(i64::MAX),
        Err(err) => {
            i64::try_from(err.duration().as_millis()).map_or(i64::MIN, |ms| -ms)
        }
    }
}

/// Installs a clock returning milliseconds since the Unix epoch.
///
/// Passing `None` restores the system clock.
///
/// # Example
///
/// ```
/// use calends::{settings, Instant};
///
/// settings::set_now(Some(|| 1_000));
/// assert_eq!(Instant::now().to_millis(), Some(1_000));
/// settings::set_now(None::<fn() -> i64>);
/// ```
pub fn set_now<F>(clock: Option<F>)
where
    F: Fn() -> i64 + Send + Sync + 'static,
{
    let clock = clock.map(|f| Arc::new(f) as Clock);
    debug!("clock override {}", if clock.is_some() { "set" } else { "cleared" });
    *NOW.write().unwrap() = clock;
}

/// Returns the zone used when no zone is given explicitly.
///
/// This is the zone installed with [`set_default_zone`], or the host's
/// local zone otherwise.
pub fn default_zone() -> Zone {
    match *DEFAULT_ZONE.read().unwrap() {
        Some(ref zone) => zone.clone(),
        None => Zone::local(),
    }
}

/// Overrides the zone used when no zone is given explicitly.
///
/// Passing `None` restores the host's local zone.
///
/// # Example
///
/// ```
/// use calends::{settings, tz::Zone};
///
/// settings::set_default_zone(Some(Zone::named("Asia/Tokyo")));
/// assert_eq!(settings::default_zone().name(), "Asia/Tokyo");
/// assert_eq!(Zone::parse("default").name(), "Asia/Tokyo");
/// settings::set_default_zone(None);
/// assert_eq!(settings::default_zone(), Zone::local());
/// ```
pub fn set_default_zone(zone: Option<Zone>) {
    *DEFAULT_ZONE.write().unwrap() = zone;
}

/// Returns true when strict mode is enabled.
pub fn throw_on_invalid() -> bool {
    #[cfg(not(test))]
    {
        THROW_ON_INVALID.load(Ordering::Relaxed)
    }
    #[cfg(test)]
    {
        THROW_ON_INVALID.with(|yes| yes.load(Ordering::Relaxed))
    }
}

/// Enables or disables strict mode.
///
/// In strict mode, creating a new invalid value panics with the rendered
/// [`Error`](crate::Error) instead of returning an invalid sentinel.
/// Operations that merely carry an existing invalid value along do not
/// panic.
///
/// # Example
///
/// ```
/// use calends::{civil::CalendarFields, settings, tz::Zone, Instant};
///
/// settings::set_throw_on_invalid(true);
/// let result = std::panic::catch_unwind(|| {
///     Instant::from_calendar(
///         CalendarFields::new(2024, 13, 1, 0, 0, 0, 0),
///         Zone::UTC,
///     )
/// });
/// settings::set_throw_on_invalid(false);
/// assert!(result.is_err());
/// ```
pub fn set_throw_on_invalid(yes: bool) {
    info!("strict mode {}", if yes { "enabled" } else { "disabled" });
    #[cfg(not(test))]
    THROW_ON_INVALID.store(yes, Ordering::Relaxed);
    #[cfg(test)]
    THROW_ON_INVALID.with(|flag| flag.store(yes, Ordering::Relaxed));
}

/// Returns the week rules used by the local week accessors.
pub fn default_week_rules() -> WeekRules {
    *WEEK_RULES.read().unwrap()
}

/// Changes the week rules used by the local week accessors.
///
/// # Example
///
/// ```
/// use calends::{civil::WeekRules, settings};
///
/// let us = WeekRules::new(7, 1)?;
/// settings::set_default_week_rules(us);
/// assert_eq!(settings::default_week_rules(), us);
/// settings::set_default_week_rules(WeekRules::ISO);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn set_default_week_rules(rules: WeekRules) {
    *WEEK_RULES.write().unwrap() = rules;
}

/// Forgets every resolved time zone, including the detected local zone.
///
/// Zones registered with
/// [`ZoneDatabase::register`](crate::tz::ZoneDatabase::register) are kept.
pub fn reset_caches() {
    info!("resetting time zone caches");
    crate::tz::db().reset();
    crate::tz::system::reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_sane() {
        // 2020-01-01T00:00:00Z
        assert!(now() > 1_577_836_800_000);
    }

    #[test]
    fn strict_mode_panics_on_new_invalid_values() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        use crate::{
            civil::CalendarFields,
            invalid::{Invalid, Reason},
            Duration, Instant,
        };

        let bad = CalendarFields::new(2024, 13, 1, 0, 0, 0, 0);
        let lenient = Instant::from_calendar(bad, Zone::UTC);
        let reason = lenient.invalid().unwrap().reason();
        assert_eq!(reason, Reason::UnitOutOfRange);

        set_throw_on_invalid(true);
        assert!(throw_on_invalid());
        let created = catch_unwind(|| Instant::from_calendar(bad, Zone::UTC));
        let user = catch_unwind(|| {
            Duration::from_invalid(Invalid::user_defined("no data"))
        });
        // Carrying an existing invalid value along does not panic.
        let carried = catch_unwind(AssertUnwindSafe(|| lenient.to_utc()));
        let valid = catch_unwind(|| {
            let leap_day = CalendarFields::date(2024, 2, 29);
            Instant::from_calendar(leap_day, Zone::UTC)
        });
        set_throw_on_invalid(false);
        assert!(!throw_on_invalid());

        let payload = created.unwrap_err();
        let message = payload.downcast_ref::<String>().unwrap();
        assert!(message.contains("13 as a month"), "{message}");
        assert!(user.is_err());
        assert!(!carried.unwrap().is_valid());
        assert!(valid.unwrap().is_valid());

        // Strict mode is off again.
        assert!(!Instant::from_calendar(bad, Zone::UTC).is_valid());
    }

    #[test]
    fn reset_keeps_working() {
        reset_caches();
        assert!(crate::tz::db().get("Europe/London").is_ok());
        assert!(Zone::local().is_valid());
    }
}
