use calends::{
    civil::CalendarFields, invalid::Reason, tz::Zone, Duration, Instant,
    ToDuration, Unit,
};

fn at(zone: &Zone, y: i32, mo: i32, d: i32, h: i32, mi: i32) -> Instant {
    Instant::from_calendar(CalendarFields::new(y, mo, d, h, mi, 0, 0), zone.clone())
}

#[test]
fn diff_is_antisymmetric() {
    let start = at(&Zone::UTC, 2020, 1, 15, 0, 0);
    let end = at(&Zone::UTC, 2021, 3, 20, 6, 0);
    let units = [Unit::Year, Unit::Month, Unit::Day, Unit::Hour];
    let forward = end.diff(&start, &units);
    assert_eq!(forward, 1.year().months(2).days(5).hours(6));
    let backward = start.diff(&end, &units);
    assert_eq!(backward, -forward);
}

#[test]
fn diff_without_units_is_milliseconds() {
    let start = Instant::from_millis(1_000, Zone::UTC);
    let end = Instant::from_millis(3_500, Zone::UTC);
    assert_eq!(end.diff(&start, &[]), 2_500.milliseconds());
}

#[test]
fn diff_with_fractional_month() {
    let start = at(&Zone::UTC, 2024, 2, 1, 0, 0);
    let end = at(&Zone::UTC, 2024, 3, 15, 12, 0);
    // February 2024 is 29 days long, March 2024 is 31.
    let dur = end.diff(&start, &[Unit::Month]);
    assert_eq!(dur.get(Unit::Month), 1.0 + 14.5 / 31.0);
}

#[test]
fn diff_across_dst() {
    let zone = Zone::named("Europe/London");
    let start = at(&zone, 2024, 3, 30, 12, 0);
    let end = at(&zone, 2024, 4, 1, 12, 0);
    assert_eq!(end.diff(&start, &[Unit::Day]), 2.days());
    assert_eq!(end.diff(&start, &[Unit::Hour]), 47.hours());
}

#[test]
fn diff_with_invalid_operand() {
    let bad = Instant::from_calendar(
        CalendarFields::new(2024, 2, 30, 0, 0, 0, 0),
        Zone::UTC,
    );
    let good = Instant::from_millis(0, Zone::UTC);
    let dur = good.diff(&bad, &[Unit::Day]);
    assert!(!dur.is_valid());
    assert_eq!(dur.invalid().map(|inv| inv.reason()), Some(Reason::UnitOutOfRange));
    assert!(!dur.plus(&Duration::new()).is_valid());
}

#[test]
fn until_builds_intervals() {
    let start = at(&Zone::UTC, 2024, 1, 1, 0, 0);
    let end = at(&Zone::UTC, 2024, 1, 2, 0, 0);
    let interval = start.until(&end);
    assert_eq!(interval.length(Unit::Hour), 24.0);
    assert!(!end.until(&start).is_valid());
}

#[test]
fn min_and_max() {
    let a = Instant::from_millis(5, Zone::UTC);
    let b = Instant::from_millis(1, Zone::UTC);
    let c = Instant::from_millis(9, Zone::UTC);
    let all = || vec![a.clone(), b.clone(), c.clone()];
    assert_eq!(Instant::min(all()), Some(b.clone()));
    assert_eq!(Instant::max(all()), Some(c.clone()));
    assert_eq!(Instant::min(Vec::new()), None);
}
