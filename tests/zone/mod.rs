use std::time::{Duration, SystemTime, UNIX_EPOCH};

use calends::{
    civil::CalendarFields,
    invalid::Reason,
    tz::{self, NameStyle, OffsetFormat, Zone, ZoneType},
    Instant, ToDuration,
};

// 2024-07-01T00:00:00Z
const SUMMER: i64 = 1_719_792_000_000;
// 2024-01-01T00:00:00Z
const WINTER: i64 = 1_704_067_200_000;

#[test]
fn fixed_zones() -> crate::Result {
    let zone = Zone::try_fixed(330)?;
    assert_eq!(zone.name(), "UTC+5:30");
    assert_eq!(zone.kind(), ZoneType::Fixed);
    assert!(zone.is_universal());
    assert!(zone.is_offset_fixed());
    assert_eq!(zone.format_offset(0, OffsetFormat::Short).unwrap(), "+05:30");
    assert_eq!(zone.format_offset(0, OffsetFormat::Techie).unwrap(), "+0530");
    assert!(Zone::try_fixed(-1560).is_err());
    assert_eq!(Zone::parse("GMT+3"), Zone::fixed(180));
    Ok(())
}

#[test]
fn named_zones() {
    let zone = Zone::named("America/New_York");
    assert_eq!(zone.kind(), ZoneType::Named);
    assert!(!zone.is_universal());
    assert!(!zone.is_offset_fixed());
    assert_eq!(zone.offset(SUMMER), Some(-240));
    assert_eq!(zone.offset(WINTER), Some(-300));
    assert_eq!(zone.offset_name(SUMMER, NameStyle::Short).unwrap(), "EDT");
    assert_eq!(zone.offset_name(WINTER, NameStyle::Short).unwrap(), "EST");
    assert_eq!(
        zone.offset_name(WINTER, NameStyle::Long).unwrap(),
        "America/New_York",
    );
    // Japan observed DST from 1948 to 1951.
    assert!(!Zone::named("Asia/Tokyo").is_offset_fixed());
    assert!(Zone::named("Etc/GMT-9").is_offset_fixed());
}

#[test]
fn offsets_follow_zone_history() {
    let new_york = Zone::named("America/New_York");
    // Before 2007, DST started on the first Sunday of April.
    // 2006-03-20T12:00Z
    assert_eq!(new_york.offset(1_142_856_000_000), Some(-300));
    // 2006-04-03T12:00Z
    assert_eq!(new_york.offset(1_144_065_600_000), Some(-240));
    // 2007-03-20T12:00Z
    assert_eq!(new_york.offset(1_174_392_000_000), Some(-240));

    let moscow = Zone::named("Europe/Moscow");
    // 2012-07-01T00:00Z, during permanent summer time.
    assert_eq!(moscow.offset(1_341_100_800_000), Some(240));
    // 2024-07-01T00:00Z
    assert_eq!(moscow.offset(1_719_792_000_000), Some(180));

    for name in [
        "America/Detroit",
        "Europe/Warsaw",
        "Asia/Taipei",
        "UTC",
        "America/Indiana/Indianapolis",
    ] {
        assert!(Zone::named(name).is_valid(), "{name} should be valid");
    }
}

#[test]
fn registered_zones() -> anyhow::Result<()> {
    tz::db().register("Test/Quarter_Past", "<+0115>-1:15")?;
    let zone = Zone::parse("test/quarter_past");
    assert_eq!(zone.name(), "Test/Quarter_Past");
    assert_eq!(zone.offset(0), Some(75));
    assert!(tz::db().available().iter().any(|n| n == "Test/Quarter_Past"));
    assert!(tz::db().register("local", "EST5").is_err());
    assert!(tz::db().register("Test/Broken", "not a rule").is_err());
    Ok(())
}

#[test]
fn unsupported_zone_makes_invalid_instants() {
    let zone = Zone::named("Mars/Olympus_Mons");
    assert!(!zone.is_valid());
    assert_eq!(zone.name(), "Mars/Olympus_Mons");
    let instant = Instant::from_millis(0, zone);
    let invalid = instant.invalid().unwrap();
    assert_eq!(invalid.reason(), Reason::UnsupportedZone);
    assert!(!instant.plus(&1.day()).is_valid());
}

#[test]
fn dst_gap_and_overlap() {
    let zone = Zone::named("America/New_York");
    let gap = Instant::from_calendar(
        CalendarFields::new(2024, 3, 10, 2, 30, 0, 0),
        zone.clone(),
    );
    assert_eq!(gap.to_string(), "2024-03-10T03:30:00.000-04:00");

    // The earlier of the two 01:30s is chosen.
    let overlap = Instant::from_calendar(
        CalendarFields::new(2024, 11, 3, 1, 30, 0, 0),
        zone.clone(),
    );
    assert_eq!(overlap.to_string(), "2024-11-03T01:30:00.000-04:00");
    let later = overlap.plus(&1.hour());
    assert_eq!(later.to_string(), "2024-11-03T01:30:00.000-05:00");
}

#[test]
fn dst_detection() {
    let zone = Zone::named("America/New_York");
    assert!(Instant::from_millis(SUMMER, zone.clone()).is_in_dst());
    assert!(!Instant::from_millis(WINTER, zone).is_in_dst());
    assert!(!Instant::from_millis(SUMMER, Zone::UTC).is_in_dst());
}

#[test]
fn changing_zones() {
    let utc = Instant::from_millis(SUMMER, Zone::UTC);
    let tokyo = utc.set_zone(Zone::named("Asia/Tokyo"));
    assert_eq!(tokyo.to_millis(), utc.to_millis());
    assert_eq!(tokyo.to_string(), "2024-07-01T09:00:00.000+09:00");
    assert_ne!(tokyo, utc);

    let kept = utc.set_zone_keeping_local_time(Zone::named("Asia/Tokyo"));
    assert_eq!(kept.to_string(), "2024-07-01T00:00:00.000+09:00");
    assert_eq!(kept.to_millis(), Some(SUMMER - 9 * 3_600_000));
    assert_eq!(kept.to_utc().to_string(), "2024-06-30T15:00:00.000Z");
}

#[test]
fn system_time_conversions() -> crate::Result {
    let time = UNIX_EPOCH + Duration::from_millis(SUMMER as u64);
    let instant = Instant::try_from(time)?;
    assert_eq!(instant.to_millis(), Some(SUMMER));
    assert_eq!(instant.zone(), &Zone::UTC);
    let back = SystemTime::try_from(instant)?;
    assert_eq!(back, time);

    let before = UNIX_EPOCH - Duration::from_millis(1_000);
    assert_eq!(Instant::try_from(before)?.to_millis(), Some(-1_000));
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serde_instants() -> anyhow::Result<()> {
    let instant = Instant::from_millis(SUMMER, Zone::named("Asia/Tokyo"));
    let json = serde_json::to_string(&instant)?;
    assert_eq!(json, SUMMER.to_string());
    let back: Instant = serde_json::from_str(&json)?;
    assert_eq!(back, instant.to_utc());

    let fields: CalendarFields = serde_json::from_str(
        r#"{"year":2024,"month":2,"day":29,"hour":12,"minute":0,"second":0,"millisecond":0}"#,
    )?;
    assert_eq!(fields, CalendarFields::new(2024, 2, 29, 12, 0, 0, 0));
    Ok(())
}
