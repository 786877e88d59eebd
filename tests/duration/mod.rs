use calends::{ConversionAccuracy, Duration, ToDuration, Unit};

#[test]
fn builders_and_accessors() {
    let dur = 1.year().months(2).hours(3.5);
    assert_eq!(dur.get(Unit::Year), 1.0);
    assert_eq!(dur.get(Unit::Month), 2.0);
    assert_eq!(dur.get(Unit::Hour), 3.5);
    assert_eq!(dur.get(Unit::Day), 0.0);
    assert!(dur.has(Unit::Hour));
    assert!(!dur.has(Unit::Day));
    let units: Vec<Unit> = dur.units().map(|(unit, _)| unit).collect();
    assert_eq!(units, [Unit::Year, Unit::Month, Unit::Hour]);
}

#[test]
fn iso_display() {
    assert_eq!(Duration::new().to_string(), "PT0S");
    assert_eq!(1.year().months(2).days(3).to_string(), "P1Y2M3D");
    assert_eq!(2.quarters().months(1).to_string(), "P7M");
    assert_eq!(2.weeks().to_string(), "P2W");
    assert_eq!(4.hours().minutes(5).seconds(6).to_string(), "PT4H5M6S");
    assert_eq!(1.second().milliseconds(500).to_string(), "PT1.5S");
    assert_eq!((-3).days().to_string(), "P-3D");
}

#[test]
fn shifting() {
    let dur = 2.hours().shift_to(&[Unit::Minute]);
    assert_eq!(dur, 120.minutes());

    let dur = 1.day().hours(3).minutes(90).shift_to(&[Unit::Hour, Unit::Minute]);
    assert_eq!(dur, 28.hours().minutes(30));

    let dur = 1.year().shift_to(&[Unit::Month, Unit::Day]);
    assert_eq!(dur, 12.months().days(0));

    let dur = 90_061_001.milliseconds().shift_to_all();
    assert!(dur.has(Unit::Year));
    assert_eq!(
        dur.remove_zeros(),
        Duration::new().days(1).hours(1).minutes(1).seconds(1).milliseconds(1),
    );
}

#[test]
fn normalizing() {
    let dur = 1.hour().minutes(-30).normalize();
    assert_eq!(dur, 30.minutes());
    assert!(dur.has(Unit::Hour));
    assert_eq!(dur.get(Unit::Hour), 0.0);

    let dur = 2.days().hours(25).normalize();
    assert_eq!(dur, 3.days().hours(1));

    let dur = 3_600_000.milliseconds().rescale();
    assert_eq!(dur, 1.hour());
    assert!(!dur.has(Unit::Minute));
}

#[test]
fn conversion_accuracy() {
    let dur = 1.year();
    assert_eq!(dur.total(Unit::Day), 365.0);
    assert_eq!(dur.total(Unit::Month), 12.0);
    let dur = dur.with_accuracy(ConversionAccuracy::Longterm);
    assert_eq!(dur.accuracy(), ConversionAccuracy::Longterm);
    assert_eq!(dur.total(Unit::Day), 365.2425);
    assert_eq!(1.month().total(Unit::Day), 30.0);
    assert_eq!(1.week().total(Unit::Hour), 168.0);
}

#[test]
fn arithmetic() {
    let a = 1.hour().minutes(30);
    let b = 45.minutes();
    assert_eq!(&a + &b, 1.hour().minutes(75));
    assert_eq!(a.clone() - b.clone(), 1.hour().minutes(-15));
    assert_eq!(-a.clone(), (-1).hour().minutes(-30));
    assert_eq!(a.map_units(|v, _| v * 2.0), 2.hours().minutes(60));
    assert_eq!(a.to_millis(), 5_400_000.0);
}

#[test]
fn invalid_input() {
    let dur = Duration::new().hours(f64::NAN);
    assert!(!dur.is_valid());
    assert!(dur.get(Unit::Hour).is_nan());
    assert!(dur.to_millis().is_nan());
    assert_eq!(dur.to_string(), "Invalid Duration");
    assert!(dur.clone().validate().is_err());
    // Invalid durations are never equal, even to themselves.
    assert_ne!(dur, dur.clone());
    // Invalidity propagates through arithmetic.
    assert!(!1.hour().plus(&dur).is_valid());
}

#[test]
fn std_conversions() -> anyhow::Result<()> {
    let dur = Duration::from(std::time::Duration::from_millis(1_500));
    assert_eq!(dur.to_millis(), 1_500.0);

    let std = std::time::Duration::try_from(2.minutes())?;
    assert_eq!(std, std::time::Duration::from_secs(120));
    assert!(std::time::Duration::try_from((-1).minute()).is_err());
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serde_roundtrip() -> anyhow::Result<()> {
    let dur = 1.year().hours(2.5);
    let json = serde_json::to_string(&dur)?;
    assert_eq!(json, r#"{"years":1.0,"hours":2.5}"#);
    let back: Duration = serde_json::from_str(&json)?;
    assert_eq!(back, dur);
    Ok(())
}
