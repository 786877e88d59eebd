use calends::{
    civil::CalendarFields, invalid::Reason, tz::Zone, Instant, Interval,
    ToDuration, Unit,
};

fn day(month: i32, day: i32) -> Instant {
    Instant::from_calendar(CalendarFields::date(2020, month, day), Zone::UTC)
}

fn span(start: (i32, i32), end: (i32, i32)) -> Interval {
    Interval::new(day(start.0, start.1), day(end.0, end.1))
}

#[test]
fn set_algebra() {
    let a = span((1, 1), (1, 10));
    let b = span((1, 5), (1, 15));

    assert_eq!(a.intersection(&b), Some(span((1, 5), (1, 10))));
    assert_eq!(a.union(&b), span((1, 1), (1, 15)));
    assert_eq!(
        Interval::xor([a.clone(), b.clone()]),
        vec![span((1, 1), (1, 5)), span((1, 10), (1, 15))],
    );
    assert_eq!(a.difference([b.clone()]), vec![span((1, 1), (1, 5))]);
    assert_eq!(
        Interval::merge([b.clone(), span((1, 20), (1, 25)), a.clone()]),
        vec![span((1, 1), (1, 15)), span((1, 20), (1, 25))],
    );
}

#[test]
fn relations() {
    let a = span((1, 1), (1, 10));
    assert!(a.abuts_start(&span((1, 10), (1, 12))));
    let before = Interval::before(day(1, 1), &1.week());
    assert!(a.abuts_end(&before));
    assert!(!a.overlaps(&before));
    assert!(a.engulfs(&span((1, 2), (1, 3))));
    assert!(!a.overlaps(&span((1, 10), (1, 12))));
    assert!(a.contains(&day(1, 1)));
    assert!(!a.contains(&day(1, 10)));
    assert!(a.is_before(&day(1, 10)));
    assert!(a.is_after(&day(1, 1).minus(&1.millisecond())));
}

#[test]
fn measurement() {
    let a = span((1, 1), (3, 1));
    assert_eq!(a.length(Unit::Month), 2.0);
    assert_eq!(a.length(Unit::Day), 60.0);
    assert_eq!(a.count(Unit::Month), Some(2));
    assert_eq!(a.to_duration(&[Unit::Month, Unit::Day]), 2.months().days(0));
    assert!(span((1, 1), (1, 31)).has_same(Unit::Month));
    assert!(!a.has_same(Unit::Month));
}

#[test]
fn splitting() {
    let a = span((1, 1), (1, 10));
    let pieces = a.split_by(&4.days());
    assert_eq!(
        pieces,
        vec![
            span((1, 1), (1, 5)),
            span((1, 5), (1, 9)),
            span((1, 9), (1, 10)),
        ],
    );
    let pieces = a.split_at([day(1, 4), day(2, 1)]);
    assert_eq!(pieces, vec![span((1, 1), (1, 4)), span((1, 4), (1, 10))]);
    let pieces = a.divide_equally(3);
    assert_eq!(
        pieces,
        vec![
            span((1, 1), (1, 4)),
            span((1, 4), (1, 7)),
            span((1, 7), (1, 10)),
        ],
    );
}

#[test]
fn invalid_intervals() {
    let interval = span((1, 10), (1, 1));
    assert!(!interval.is_valid());
    let invalid = interval.invalid().unwrap();
    assert_eq!(invalid.reason(), Reason::EndBeforeStart);
    insta::assert_snapshot!(
        invalid,
        @"end before start: the end of an interval must be after its start, but you had start=2020-01-10T00:00:00.000Z and end=2020-01-01T00:00:00.000Z",
    );
    assert!(interval.length(Unit::Day).is_nan());
    assert!(interval.split_by(&1.day()).is_empty());
    assert_eq!(interval.to_string(), "Invalid Interval");
    assert!(!interval.to_duration(&[Unit::Day]).is_valid());
}

#[test]
fn display() {
    let zone = Zone::fixed(-300);
    let start = Instant::from_calendar(CalendarFields::date(2020, 1, 1), zone);
    let interval = Interval::after(start, &90.minutes());
    assert_eq!(
        interval.to_string(),
        "2020-01-01T00:00:00.000-05:00/2020-01-01T01:30:00.000-05:00",
    );
}
