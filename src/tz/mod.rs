/*!
Routines for interacting with time zones.

A [`Zone`] answers one question: what is the offset from UTC, in minutes, at
a given instant? Every other calendar computation in this crate is built on
that answer.

A zone is one of four things:

* A fixed offset, like `UTC` or `UTC+5:30`.
* The host's local zone, detected from the `TZ` environment variable or
`/etc/localtime`.
* A named zone, like `America/New_York`, backed by the offset history of
the [time zone database](db), or by a POSIX `TZ` rule.
* An invalid zone, remembering the input that failed to resolve. An invalid
zone reports no offset, and every instant created with it is invalid.
*/

use std::sync::Arc;

use crate::{
    error::{tz::Error as E, Error},
    settings,
};

use self::{
    posix::{OffsetInfo, PosixTimeZone},
    tzif::Tzif,
};

pub use self::{
    db::{db, ZoneDatabase},
    offset::{NameStyle, OffsetFormat},
};

mod db;
mod offset;
pub(crate) mod posix;
pub(crate) mod system;
mod tzif;

/// The largest supported fixed offset, in minutes.
const MAX_FIXED_MINUTES: i32 = 25 * 60 + 59;

/// A time zone.
///
/// A `Zone` is cheap to clone and is immutable. See the
/// [module documentation](self) for the kinds of zones that exist.
///
/// # Equality
///
/// Two zones are equal when they are the same kind of zone with the same
/// identity: the same offset for fixed zones, the same name for named zones
/// and the same original input for invalid zones. All local zones are equal
/// to one another.
///
/// # Example
///
/// ```
/// use calends::tz::Zone;
///
/// let zone = Zone::named("America/New_York");
/// // 2024-07-01T00:00:00Z
/// assert_eq!(zone.offset(1_719_792_000_000), Some(-240));
/// // 2024-01-01T00:00:00Z
/// assert_eq!(zone.offset(1_704_067_200_000), Some(-300));
///
/// let zone = Zone::named("Mars/Olympus_Mons");
/// assert!(!zone.is_valid());
/// assert_eq!(zone.offset(0), None);
/// ```
#[derive(Clone)]
pub struct Zone {
    kind: ZoneKind,
}

#[derive(Clone)]
enum ZoneKind {
    /// Minutes east of UTC.
    Fixed(i32),
    Local,
    Named(Arc<NamedZone>),
    Invalid(Arc<str>),
}

struct NamedZone {
    name: Box<str>,
    rules: Rules,
}

/// Where a named zone gets its offsets from.
enum Rules {
    /// A single rule applied to every year.
    Posix(Arc<PosixTimeZone>),
    /// Historical transitions, usually with a rule for the years after.
    Tzif(Tzif),
}

impl Rules {
    fn to_offset_info(&self, millis: i64) -> OffsetInfo<'_> {
        match *self {
            Rules::Posix(ref posix) => posix.to_offset_info(millis),
            Rules::Tzif(ref tzif) => tzif.to_offset_info(millis),
        }
    }

    fn is_fixed(&self) -> bool {
        match *self {
            Rules::Posix(ref posix) => posix.is_fixed(),
            Rules::Tzif(ref tzif) => tzif.is_fixed(),
        }
    }
}

/// The kind of a [`Zone`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ZoneType {
    Fixed,
    Local,
    Named,
    Invalid,
}

impl Zone {
    /// The UTC zone. Its offset is always zero.
    pub const UTC: Zone = Zone { kind: ZoneKind::Fixed(0) };

    /// Returns a zone with a fixed offset, in minutes east of UTC.
    ///
    /// Offsets outside `-1559..=1559` minutes produce an invalid zone.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::tz::Zone;
    ///
    /// assert_eq!(Zone::fixed(330).name(), "UTC+5:30");
    /// assert_eq!(Zone::fixed(0), Zone::UTC);
    /// assert!(!Zone::fixed(2000).is_valid());
    /// ```
    pub fn fixed(minutes: i32) -> Zone {
        match Zone::try_fixed(minutes) {
            Ok(zone) => zone,
            Err(_err) => {
                debug!("invalid fixed offset zone: {_err}");
                Zone::invalid(&format!("UTC{minutes:+} minutes"))
            }
        }
    }

    /// Like [`Zone::fixed`], but returns an error for offsets out of range.
    pub fn try_fixed(minutes: i32) -> Result<Zone, Error> {
        if !(-MAX_FIXED_MINUTES..=MAX_FIXED_MINUTES).contains(&minutes) {
            return Err(Error::range(
                "minutes",
                minutes,
                -MAX_FIXED_MINUTES,
                MAX_FIXED_MINUTES,
            ));
        }
        Ok(Zone { kind: ZoneKind::Fixed(minutes) })
    }

    /// Returns the host's local zone.
    ///
    /// The rules of the local zone are looked up lazily, so a `Zone` returned
    /// here tracks changes picked up by
    /// [`settings::reset_caches`](crate::settings::reset_caches).
    pub fn local() -> Zone {
        Zone { kind: ZoneKind::Local }
    }

    /// Returns the zone with the given name from the
    /// [time zone database](db).
    ///
    /// When no such zone exists, an invalid zone is returned.
    pub fn named(name: &str) -> Zone {
        match db().get(name) {
            Ok(zone) => zone,
            Err(_err) => {
                debug!("unresolvable zone name: {_err}");
                Zone::invalid(name)
            }
        }
    }

    /// Returns an invalid zone that remembers the given input.
    pub fn invalid(input: &str) -> Zone {
        Zone { kind: ZoneKind::Invalid(Arc::from(input)) }
    }

    /// Interprets a string as a zone.
    ///
    /// This accepts, case insensitively:
    ///
    /// * `local` or `system` for the host zone.
    /// * `default` for the [default zone](crate::settings::default_zone).
    /// * `UTC` or `GMT`, optionally followed by an offset like `+3`,
    /// `-05:30` or `+14`.
    /// * A name in the [time zone database](db).
    /// * A POSIX `TZ` rule, like `EST5EDT,M3.2.0,M11.1.0`.
    ///
    /// Anything else produces an invalid zone.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::tz::{Zone, ZoneType};
    ///
    /// assert_eq!(Zone::parse("utc"), Zone::UTC);
    /// assert_eq!(Zone::parse("UTC-05:30"), Zone::fixed(-330));
    /// assert_eq!(Zone::parse("local"), Zone::local());
    /// assert_eq!(Zone::parse("europe/paris").name(), "Europe/Paris");
    /// assert_eq!(Zone::parse("JST-9").kind(), ZoneType::Named);
    /// assert_eq!(Zone::parse("nonsense").kind(), ZoneType::Invalid);
    /// ```
    pub fn parse(input: &str) -> Zone {
        match Zone::try_parse(input) {
            Ok(zone) => zone,
            Err(_err) => {
                debug!("unresolvable zone: {_err}");
                Zone::invalid(input)
            }
        }
    }

    /// Like [`Zone::parse`], but returns an error for unrecognized input.
    pub fn try_parse(input: &str) -> Result<Zone, Error> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("local")
            || trimmed.eq_ignore_ascii_case("system")
        {
            return Ok(Zone::local());
        }
        if trimmed.eq_ignore_ascii_case("default") {
            return Ok(settings::default_zone());
        }
        if let Some(minutes) = parse_fixed_specifier(trimmed) {
            return Zone::try_fixed(minutes);
        }
        if let Ok(zone) = db().get(trimmed) {
            return Ok(zone);
        }
        match PosixTimeZone::parse(trimmed) {
            Ok(posix) => Ok(Zone::from_rule(trimmed, Arc::new(posix))),
            Err(_) => Err(E::UnrecognizedZone { input: input.into() }.into()),
        }
    }

    /// Creates a named zone from a parsed rule.
    pub(crate) fn from_rule(name: &str, posix: Arc<PosixTimeZone>) -> Zone {
        Zone::from_rules(name, Rules::Posix(posix))
    }

    /// Creates a named zone from parsed TZif data.
    pub(crate) fn from_tzif(name: &str, tzif: Tzif) -> Zone {
        Zone::from_rules(name, Rules::Tzif(tzif))
    }

    fn from_rules(name: &str, rules: Rules) -> Zone {
        let named = NamedZone { name: name.into(), rules };
        Zone { kind: ZoneKind::Named(Arc::new(named)) }
    }

    /// Returns the offset from UTC, in minutes, in effect at the given Unix
    /// millisecond timestamp.
    ///
    /// This returns `None` only for invalid zones.
    pub fn offset(&self, millis: i64) -> Option<i32> {
        match self.kind {
            ZoneKind::Fixed(minutes) => Some(minutes),
            ZoneKind::Local => system::get().offset(millis),
            ZoneKind::Named(ref named) => {
                Some(named.rules.to_offset_info(millis).seconds.div_euclid(60))
            }
            ZoneKind::Invalid(_) => None,
        }
    }

    /// Returns the name of the offset in effect at the given instant.
    ///
    /// For [`NameStyle::Short`], this is an abbreviation like `EST`. For
    /// [`NameStyle::Long`], this is the zone's identifier.
    ///
    /// This returns `None` only for invalid zones.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::tz::{NameStyle, Zone};
    ///
    /// let zone = Zone::named("Europe/Berlin");
    /// // 2024-07-01T00:00:00Z
    /// let summer = 1_719_792_000_000;
    /// assert_eq!(zone.offset_name(summer, NameStyle::Short).unwrap(), "CEST");
    /// assert_eq!(zone.offset_name(0, NameStyle::Short).unwrap(), "CET");
    /// assert_eq!(zone.offset_name(0, NameStyle::Long).unwrap(), "Europe/Berlin");
    /// ```
    pub fn offset_name(&self, millis: i64, style: NameStyle) -> Option<String> {
        match self.kind {
            ZoneKind::Fixed(_) => Some(self.name()),
            ZoneKind::Local => system::get().offset_name(millis, style),
            ZoneKind::Named(ref named) => Some(match style {
                NameStyle::Short => {
                    named.rules.to_offset_info(millis).abbrev.to_string()
                }
                NameStyle::Long => named.name.to_string(),
            }),
            ZoneKind::Invalid(_) => None,
        }
    }

    /// Formats the offset in effect at the given instant.
    ///
    /// This returns `None` only for invalid zones.
    pub fn format_offset(
        &self,
        millis: i64,
        format: OffsetFormat,
    ) -> Option<String> {
        self.offset(millis).map(|minutes| offset::format(minutes, format))
    }

    /// Returns the name of this zone.
    ///
    /// Fixed zones are named `UTC` or `UTC` followed by a narrow offset, like
    /// `UTC+5:30`. The local zone reports the name of the zone it resolved
    /// to. Invalid zones report the input they were created from.
    pub fn name(&self) -> String {
        match self.kind {
            ZoneKind::Fixed(0) => String::from("UTC"),
            ZoneKind::Fixed(minutes) => {
                format!("UTC{}", offset::format(minutes, OffsetFormat::Narrow))
            }
            ZoneKind::Local => system::get().name(),
            ZoneKind::Named(ref named) => named.name.to_string(),
            ZoneKind::Invalid(ref input) => input.to_string(),
        }
    }

    /// Returns the kind of this zone.
    pub fn kind(&self) -> ZoneType {
        match self.kind {
            ZoneKind::Fixed(_) => ZoneType::Fixed,
            ZoneKind::Local => ZoneType::Local,
            ZoneKind::Named(_) => ZoneType::Named,
            ZoneKind::Invalid(_) => ZoneType::Invalid,
        }
    }

    /// Returns true for every zone except invalid zones.
    pub fn is_valid(&self) -> bool {
        !matches!(self.kind, ZoneKind::Invalid(_))
    }

    /// Returns true when this zone's offset is the same for all of time
    /// by construction. Only fixed offset zones are universal.
    pub fn is_universal(&self) -> bool {
        matches!(self.kind, ZoneKind::Fixed(_))
    }

    /// Returns true when this zone's offset never changes, including named
    /// zones that have only ever had one offset.
    pub fn is_offset_fixed(&self) -> bool {
        match self.kind {
            ZoneKind::Fixed(_) => true,
            ZoneKind::Local => system::get().is_offset_fixed(),
            ZoneKind::Named(ref named) => named.rules.is_fixed(),
            ZoneKind::Invalid(_) => false,
        }
    }
}

impl Eq for Zone {}

impl PartialEq for Zone {
    fn eq(&self, rhs: &Zone) -> bool {
        match (&self.kind, &rhs.kind) {
            (ZoneKind::Fixed(m1), ZoneKind::Fixed(m2)) => m1 == m2,
            (ZoneKind::Local, ZoneKind::Local) => true,
            (ZoneKind::Named(n1), ZoneKind::Named(n2)) => {
                Arc::ptr_eq(n1, n2) || n1.name == n2.name
            }
            (ZoneKind::Invalid(i1), ZoneKind::Invalid(i2)) => i1 == i2,
            _ => false,
        }
    }
}

impl core::fmt::Debug for Zone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut t = f.debug_tuple("Zone");
        match self.kind {
            ZoneKind::Fixed(minutes) => {
                t.field(&format_args!(
                    "Fixed({})",
                    offset::format(minutes, OffsetFormat::Short),
                ));
            }
            ZoneKind::Local => {
                t.field(&format_args!("Local"));
            }
            ZoneKind::Named(ref named) => match named.rules {
                Rules::Posix(ref posix) => {
                    t.field(&format_args!(
                        "Named({:?}, {:?})",
                        named.name,
                        posix.to_string(),
                    ));
                }
                Rules::Tzif(_) => {
                    t.field(&format_args!("Named({:?})", named.name));
                }
            },
            ZoneKind::Invalid(ref input) => {
                t.field(&format_args!("Invalid({input:?})"));
            }
        }
        t.finish()
    }
}

impl core::fmt::Display for Zone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.name())
    }
}

impl Default for Zone {
    fn default() -> Zone {
        Zone::UTC
    }
}

/// Returns true for names that `Zone::parse` interprets before consulting
/// the time zone database.
pub(crate) fn is_reserved_name(name: &str) -> bool {
    ["local", "system", "default"]
        .iter()
        .any(|reserved| name.eq_ignore_ascii_case(reserved))
        || parse_fixed_specifier(name).is_some()
}

/// Parses `UTC` or `GMT` with an optional offset suffix into minutes.
///
/// The suffix is a sign, one or two hour digits and optionally a colon
/// followed by two minute digits.
fn parse_fixed_specifier(input: &str) -> Option<i32> {
    let prefix = input.get(..3)?;
    if !prefix.eq_ignore_ascii_case("utc") && !prefix.eq_ignore_ascii_case("gmt")
    {
        return None;
    }
    let rest = &input[3..];
    if rest.is_empty() {
        return Some(0);
    }
    let sign = match rest.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &rest[1..];
    let (hours, minutes) = match rest.split_once(':') {
        None => (rest, None),
        Some((hours, minutes)) => (hours, Some(minutes)),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if hours.is_empty() || hours.len() > 2 || !all_digits(hours) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = match minutes {
        None => 0,
        Some(m) if m.len() == 2 && all_digits(m) => m.parse().ok()?,
        Some(_) => return None,
    };
    Some(sign * (hours * 60 + minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_specifiers() {
        assert_eq!(parse_fixed_specifier("UTC"), Some(0));
        assert_eq!(parse_fixed_specifier("gmt"), Some(0));
        assert_eq!(parse_fixed_specifier("utc+3"), Some(180));
        assert_eq!(parse_fixed_specifier("UTC-05:30"), Some(-330));
        assert_eq!(parse_fixed_specifier("UTC+14"), Some(840));
        assert_eq!(parse_fixed_specifier("UTC+123"), None);
        assert_eq!(parse_fixed_specifier("UTC+5:3"), None);
        assert_eq!(parse_fixed_specifier("UTC5"), None);
        assert_eq!(parse_fixed_specifier("Etc/UTC"), None);
        assert_eq!(parse_fixed_specifier("U"), None);
    }

    #[test]
    fn fixed_names() {
        assert_eq!(Zone::UTC.name(), "UTC");
        assert_eq!(Zone::fixed(300).name(), "UTC+5");
        assert_eq!(Zone::fixed(-570).name(), "UTC-9:30");
        assert_eq!(Zone::fixed(-570).kind(), ZoneType::Fixed);
        assert!(Zone::fixed(-570).is_universal());
        assert!(Zone::fixed(-570).is_offset_fixed());
    }

    #[test]
    fn fixed_out_of_range() {
        let err = Zone::try_fixed(1560).unwrap_err();
        assert!(err.is_range());
        let zone = Zone::fixed(-1560);
        assert_eq!(zone.kind(), ZoneType::Invalid);
        assert_eq!(zone.offset(0), None);
        assert_eq!(zone.format_offset(0, OffsetFormat::Short), None);
    }

    #[test]
    fn named_zone() {
        let zone = Zone::named("America/New_York");
        assert_eq!(zone.kind(), ZoneType::Named);
        assert!(zone.is_valid());
        assert!(!zone.is_universal());
        assert!(!zone.is_offset_fixed());
        assert_eq!(
            zone.format_offset(0, OffsetFormat::Techie).unwrap(),
            "-0500",
        );
        assert_eq!(zone.offset_name(0, NameStyle::Short).unwrap(), "EST");
        // Japan observed daylight saving time from 1948 to 1951.
        assert!(!Zone::named("Asia/Tokyo").is_offset_fixed());
        assert!(Zone::named("Etc/GMT-9").is_offset_fixed());
        assert!(Zone::parse("JST-9").is_offset_fixed());
    }

    #[test]
    fn historical_offsets() {
        // 1982-04-15T12:00:00Z, before DST began on April 25 that year.
        let zone = Zone::named("America/New_York");
        assert_eq!(zone.offset(387_720_000_000), Some(-300));
        // 1982-05-15T12:00:00Z
        assert_eq!(zone.offset(390_312_000_000), Some(-240));
        // 2006-03-20T12:00:00Z, before DST moved to March in 2007.
        assert_eq!(zone.offset(1_142_856_000_000), Some(-300));
        // 2012-07-01T00:00:00Z, when Moscow kept UTC+4 all year.
        let zone = Zone::named("Europe/Moscow");
        assert_eq!(zone.offset(1_341_100_800_000), Some(240));
        assert_eq!(zone.offset(1_719_792_000_000), Some(180));
        // 1970-01-01T00:00:00Z, when Kolkata was already at UTC+5:30.
        assert_eq!(Zone::named("Asia/Kolkata").offset(0), Some(330));
    }

    #[test]
    fn database_names_resolve() {
        for name in [
            "America/Detroit",
            "Europe/Warsaw",
            "Asia/Taipei",
            "UTC",
            "Etc/UTC",
            "America/Indiana/Indianapolis",
            "US/Eastern",
        ] {
            let zone = Zone::named(name);
            assert!(zone.is_valid(), "{name} should be a valid zone");
            assert_eq!(zone.kind(), ZoneType::Named);
        }
        assert_eq!(Zone::named("UTC").offset(0), Some(0));
    }

    #[test]
    fn invalid_zone() {
        let zone = Zone::parse("Not/A_Zone");
        assert_eq!(zone.kind(), ZoneType::Invalid);
        assert_eq!(zone.name(), "Not/A_Zone");
        assert_eq!(zone.offset_name(0, NameStyle::Short), None);
        assert!(!zone.is_offset_fixed());
        insta::assert_snapshot!(
            Zone::try_parse("Not/A_Zone").unwrap_err(),
            @"`Not/A_Zone` is not a fixed offset, a time zone database name or a POSIX time zone rule",
        );
    }

    #[test]
    fn equality() {
        assert_eq!(Zone::fixed(60), Zone::parse("UTC+1"));
        assert_ne!(Zone::fixed(60), Zone::fixed(120));
        assert_eq!(Zone::named("Europe/Paris"), Zone::parse("europe/paris"));
        assert_ne!(Zone::named("Europe/Paris"), Zone::named("Europe/Berlin"));
        assert_ne!(Zone::named("Etc/UTC"), Zone::UTC);
        assert_eq!(Zone::local(), Zone::local());
        assert_eq!(Zone::invalid("x"), Zone::invalid("x"));
        assert_ne!(Zone::invalid("x"), Zone::invalid("y"));
    }

    #[test]
    fn debug() {
        insta::assert_snapshot!(
            format!("{:?}", Zone::fixed(-330)),
            @"Zone(Fixed(-05:30))",
        );
        insta::assert_snapshot!(
            format!("{:?}", Zone::named("Asia/Kolkata")),
            @r###"Zone(Named("Asia/Kolkata"))"###,
        );
        insta::assert_snapshot!(
            format!("{:?}", Zone::parse("IST-5:30")),
            @r###"Zone(Named("IST-5:30", "IST-5:30"))"###,
        );
    }
}
