/*!
Calends is a calendar and time arithmetic engine.

It resolves points on the time line to calendar fields through time zone
rules, adds and subtracts calendar-aware durations, and computes with
half-open intervals of time.

# Overview

The primary type in this crate is [`Instant`]. An instant is a number of
milliseconds since the Unix epoch paired with a time zone. Every valid
instant carries its calendar fields as seen in its zone, so reading the
year or the ISO week number of an instant is cheap.

The other primary types are:

* [`Duration`] is an amount of time in any mix of units, from years down to
milliseconds. Units are kept as given: one month and thirty days are
different durations. Converting between calendar units and units of fixed
length uses a [`ConversionAccuracy`].
* [`Interval`] is a half-open span of time between two instants, with
set operations like merging, intersection and difference.
* [`tz::Zone`] is a time zone: UTC, a fixed offset, the system's local zone
or a zone from the IANA time zone database.
* [`civil::CalendarFields`] is a calendar date and wall clock time with no
time zone.

Values in this crate do not fail to construct. Instead, each of them is
either valid or carries an [`invalid::Invalid`] explaining why it is not,
and operations on invalid values propagate their invalidity. Use
`validate` on any value to turn an invalid value into an [`Error`], or
enable strict mode with [`settings::set_throw_on_invalid`] to panic as soon
as an invalid value is created.

# Example

This shows how adding a calendar day differs from adding 24 hours across a
daylight saving time transition, and how the calendar difference between
two instants is computed:

```
use calends::{civil::CalendarFields, tz::Zone, Instant, ToDuration, Unit};

let zone = Zone::named("America/New_York");
let start = Instant::from_calendar(CalendarFields::new(2024, 3, 9, 12, 0, 0, 0), zone);

let next_day = start.plus(&1.day());
assert_eq!(next_day.to_string(), "2024-03-10T12:00:00.000-04:00");
assert_eq!(next_day.diff(&start, &[Unit::Hour]).get(Unit::Hour), 23.0);

let later = start.plus(&1.month().days(5));
let dur = later.diff(&start, &[Unit::Month, Unit::Day]);
assert_eq!(dur.to_string(), "P1M5D");
```

# Crate features

* **logging** - When enabled, the `log` crate is used to emit messages about
time zone lookups and the creation of invalid values. Messages are emitted
with the `calends` target.
* **tzdb-bundle-always** (enabled by default) - When enabled, a copy of the
IANA time zone database is compiled into this crate. It is used for names
the host's zoneinfo directory does not have.
* **tzdb-zoneinfo** (enabled by default) - When enabled, named zones are
first looked up in the host's zoneinfo directory, usually
`/usr/share/zoneinfo` or wherever `TZDIR` points.
* **serde** - When enabled, [`Instant`], [`Duration`] and
[`civil::CalendarFields`] implement `serde`'s `Serialize` and `Deserialize`
traits.
*/

#![deny(rustdoc::broken_intra_doc_links)]
// This adds Cargo feature annotations to items in the rustdoc output.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

pub use crate::{
    duration::{ConversionAccuracy, Duration, ToDuration},
    error::Error,
    instant::Instant,
    interval::Interval,
    unit::Unit,
};

#[macro_use]
mod logging;

pub mod civil;
mod diff;
mod duration;
mod error;
mod instant;
mod interval;
pub mod invalid;
pub mod settings;
pub mod tz;
mod unit;
