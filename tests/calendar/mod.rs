use calends::{
    civil::{
        self, CalendarFields, FieldSpec, OrdinalDate, WeekDate, WeekRules,
    },
    invalid::Reason,
    tz::Zone,
    Instant, Unit,
};

fn utc(fields: CalendarFields) -> Instant {
    Instant::from_calendar(fields, Zone::UTC)
}

#[test]
fn calendar_helpers() {
    assert!(civil::is_leap_year(2000));
    assert!(!civil::is_leap_year(1900));
    assert!(civil::is_leap_year(-4));
    assert_eq!(civil::days_in_month(2024, 2), 29);
    assert_eq!(civil::days_in_month(2023, 2), 28);
    assert_eq!(civil::days_in_month(2023, 4), 30);
    assert_eq!(civil::days_in_year(2024), 366);
    assert_eq!(civil::weeks_in_week_year(2020, WeekRules::ISO), 53);
    assert_eq!(civil::weeks_in_week_year(2021, WeekRules::ISO), 52);
}

#[test]
fn week_rules_validate() {
    assert!(WeekRules::new(0, 4).is_err());
    assert!(WeekRules::new(1, 8).is_err());
    let rules = WeekRules::new(7, 1).unwrap();
    assert_eq!(rules.start_of_week(), 7);
    assert_eq!(rules.min_days_in_first_week(), 1);
}

#[test]
fn week_dates_at_year_boundaries() {
    let sunday = utc(CalendarFields::date(2021, 1, 3));
    assert_eq!(sunday.week_date(), Some(WeekDate::new(2020, 53, 7)));
    assert_eq!(sunday.week_year(), Some(2020));
    assert_eq!(sunday.week_number(), Some(53));
    assert_eq!(sunday.weekday(), Some(7));

    let us = WeekRules::new(7, 1).unwrap();
    assert_eq!(sunday.local_week_date_with(us), Some(WeekDate::new(2021, 2, 1)));

    let monday = utc(CalendarFields::date(2019, 12, 30));
    assert_eq!(monday.week_date(), Some(WeekDate::new(2020, 1, 1)));
}

#[test]
fn ordinal_dates() {
    let instant = utc(CalendarFields::date(2024, 12, 31));
    assert_eq!(instant.ordinal(), Some(366));
    assert_eq!(
        instant.ordinal_date(),
        Some(OrdinalDate { year: 2024, ordinal: 366 }),
    );
    let instant = utc(CalendarFields::date(2023, 3, 1));
    assert_eq!(instant.ordinal(), Some(60));
}

#[test]
fn from_fields_styles() {
    let spec = FieldSpec::new().week_year(2020).week_number(1).weekday(1);
    let instant = Instant::from_fields(spec, Zone::UTC);
    assert_eq!(instant.fields(), Some(CalendarFields::date(2019, 12, 30)));

    let spec = FieldSpec::new().year(2023).ordinal(365).hour(6);
    let instant = Instant::from_fields(spec, Zone::UTC);
    assert_eq!(instant.to_string(), "2023-12-31T06:00:00.000Z");

    let spec = FieldSpec::new().year(2024).month(7);
    let instant = Instant::from_fields(spec, Zone::UTC);
    assert_eq!(instant.to_string(), "2024-07-01T00:00:00.000Z");
}

#[test]
fn from_fields_rejects_bad_combinations() {
    let spec = FieldSpec::new().week_number(3).month(2);
    let instant = Instant::from_fields(spec, Zone::UTC);
    let reason = instant.invalid().map(|inv| inv.reason());
    assert_eq!(reason, Some(Reason::ConflictingFields));

    // 2024-01-01 is a Monday.
    let spec = FieldSpec::new().year(2024).month(1).day(1).weekday(2);
    let instant = Instant::from_fields(spec, Zone::UTC);
    let reason = instant.invalid().map(|inv| inv.reason());
    assert_eq!(reason, Some(Reason::MismatchedWeekday));

    let spec = FieldSpec::new().year(2023).ordinal(366);
    assert!(!Instant::from_fields(spec, Zone::UTC).is_valid());

    let spec = FieldSpec::new().week_year(2021).week_number(53);
    assert!(!Instant::from_fields(spec, Zone::UTC).is_valid());
}

#[test]
fn out_of_range_calendar_fields() {
    let instant = utc(CalendarFields::new(2023, 2, 29, 0, 0, 0, 0));
    let invalid = instant.invalid().unwrap();
    assert_eq!(invalid.reason(), Reason::UnitOutOfRange);
    insta::assert_snapshot!(
        instant.clone().validate().unwrap_err(),
        @"unit out of range: you specified 29 as a day, which is invalid",
    );
    assert_eq!(instant.to_string(), "Invalid DateTime");
    assert_eq!(instant.year(), None);
    assert!(!instant.is_in_leap_year());
}

#[test]
fn set_keeps_unspecified_fields() {
    let instant = utc(CalendarFields::new(2024, 1, 31, 10, 30, 0, 0));
    let later = instant.set(FieldSpec::new().hour(23).minute(59));
    assert_eq!(later.to_string(), "2024-01-31T23:59:00.000Z");
    let monday = instant.set(FieldSpec::new().weekday(1));
    assert_eq!(monday.to_string(), "2024-01-29T10:30:00.000Z");
}

#[test]
fn start_and_end_of_units() {
    let instant = utc(CalendarFields::new(2024, 2, 29, 13, 14, 15, 16));
    let cases = [
        (Unit::Year, "2024-01-01T00:00:00.000Z", "2024-12-31T23:59:59.999Z"),
        (Unit::Quarter, "2024-01-01T00:00:00.000Z", "2024-03-31T23:59:59.999Z"),
        (Unit::Month, "2024-02-01T00:00:00.000Z", "2024-02-29T23:59:59.999Z"),
        (Unit::Week, "2024-02-26T00:00:00.000Z", "2024-03-03T23:59:59.999Z"),
        (Unit::Day, "2024-02-29T00:00:00.000Z", "2024-02-29T23:59:59.999Z"),
        (Unit::Hour, "2024-02-29T13:00:00.000Z", "2024-02-29T13:59:59.999Z"),
        (Unit::Minute, "2024-02-29T13:14:00.000Z", "2024-02-29T13:14:59.999Z"),
        (Unit::Second, "2024-02-29T13:14:15.000Z", "2024-02-29T13:14:15.999Z"),
    ];
    for (unit, start, end) in cases {
        assert_eq!(instant.start_of(unit).to_string(), start, "{unit:?}");
        assert_eq!(instant.end_of(unit).to_string(), end, "{unit:?}");
    }
    let us = WeekRules::new(7, 1).unwrap();
    assert_eq!(
        instant.start_of_with(Unit::Week, us).to_string(),
        "2024-02-25T00:00:00.000Z",
    );
}

/// Zones with DST transitions on both hemispheres, one at midnight, plus a
/// zone with a half hour offset and no DST.
const ROUNDTRIP_ZONES: &[&str] = &[
    "America/New_York",
    "Europe/London",
    "Europe/Berlin",
    "Australia/Sydney",
    "America/Santiago",
    "Asia/Kolkata",
];

fn local_millis(fields: CalendarFields) -> i64 {
    utc(fields).to_millis().unwrap()
}

quickcheck::quickcheck! {
    fn named_zone_millis_roundtrip(zone: u8, millis: i64) -> bool {
        let name = ROUNDTRIP_ZONES[usize::from(zone) % ROUNDTRIP_ZONES.len()];
        let zone = Zone::named(name);
        // 1900 to 2100.
        let millis = -2_208_988_800_000 + millis.rem_euclid(6_311_433_600_000);
        let instant = Instant::from_millis(millis, zone.clone());
        let Some(fields) = instant.fields() else { return false };
        let back = Instant::from_calendar(fields, zone.clone());
        if back.fields() != Some(fields) {
            return false;
        }
        // An hour repeated by a transition may resolve to the other offset.
        back.to_millis() == Some(millis) || back.offset() != instant.offset()
    }

    // Transitions happen on Sundays in these months, between midnight and
    // 03:00 local time.
    fn named_zone_transition_hours(
        zone: u8,
        year: u8,
        month: u8,
        sunday: u8,
        hour: u8,
        minute: u8
    ) -> bool {
        let name = ROUNDTRIP_ZONES[usize::from(zone) % ROUNDTRIP_ZONES.len()];
        let zone = Zone::named(name);
        let year = 1995 + i32::from(year % 40);
        let month = [3, 4, 9, 10, 11][usize::from(month % 5)];
        let first = CalendarFields::date(year, month, 1).weekday();
        let day = 1 + (7 - first) % 7 + 7 * i32::from(sunday % 4);
        let (hour, minute) = (i32::from(hour % 4), i32::from(minute % 60));
        let requested =
            CalendarFields::new(year, month, day, hour, minute, 0, 0);

        let instant = Instant::from_calendar(requested, zone.clone());
        let (Some(got), Some(millis), Some(offset)) =
            (instant.fields(), instant.to_millis(), instant.offset())
        else {
            return false;
        };
        if zone.offset(millis) != Some(offset) {
            return false;
        }
        if got == requested {
            let again = Instant::from_calendar(got, zone);
            return again.to_millis() == Some(millis);
        }
        // The wall clock time was skipped, so it moves forward by the size
        // of the gap.
        let Some(before) = zone.offset(millis - 3 * 3_600_000) else {
            return false;
        };
        let shift = local_millis(got) - local_millis(requested);
        shift > 0 && shift == i64::from(offset - before) * 60_000
    }

    fn fields_roundtrip_with_resolved_offset(millis: i64) -> bool {
        let millis = millis % 8_640_000_000_000_000;
        let instant = Instant::from_millis(millis, Zone::named("America/New_York"));
        let (Some(fields), Some(offset)) = (instant.fields(), instant.offset())
        else {
            return false;
        };
        let fixed = Instant::from_calendar(fields, Zone::fixed(offset));
        fixed.to_millis() == Some(millis)
    }

    fn week_date_roundtrip(days: i32) -> bool {
        let millis = i64::from(days % 3_000_000) * 86_400_000;
        let instant = Instant::from_millis(millis, Zone::UTC);
        let Some(week) = instant.week_date() else { return false };
        let Ok(back) = week.to_calendar(WeekRules::ISO) else { return false };
        back == instant.start_of(Unit::Day).fields().unwrap()
    }
}
