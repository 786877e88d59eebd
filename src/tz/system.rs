/*!
Detection of the host's local time zone.

The `TZ` environment variable is consulted first. It may hold a zone name
(optionally prefixed with a `:`), an absolute path to a TZif file or a POSIX
rule string. When it is unset, the target of the `/etc/localtime` symlink is
used, taking everything after the last `zoneinfo/` path component as the
zone name. When that is not a known zone, `/etc/localtime` is read as TZif
data instead. When no source yields a zone, UTC is used.

The detected zone is cached until [`reset`] is called.
*/

use std::{path::Path, sync::RwLock};

use crate::{
    error::{err, Error, ErrorContext},
    tz::{db, posix::PosixTimeZone, tzif::Tzif, Zone},
};

static CACHED: RwLock<Option<Zone>> = RwLock::new(None);

/// Returns the host's local zone.
///
/// The zone returned is never `Zone::local()` itself. It is always a fixed
/// offset or a rule based zone.
pub(crate) fn get() -> Zone {
    if let Some(ref zone) = *CACHED.read().unwrap() {
        return zone.clone();
    }
    let zone = detect();
    *CACHED.write().unwrap() = Some(zone.clone());
    zone
}

/// Forgets the cached local zone so that the next call to `get` detects it
/// again.
pub(crate) fn reset() {
    debug!("resetting cached local time zone");
    *CACHED.write().unwrap() = None;
}

fn detect() -> Zone {
    if let Some(tz) = std::env::var_os("TZ") {
        let Some(tz) = tz.to_str() else {
            warn!("TZ environment variable is not valid UTF-8, ignoring it");
            return fallback();
        };
        if let Some(zone) = from_tz_env(tz) {
            debug!("detected local time zone `{}` from TZ", zone.name());
            return zone;
        }
        warn!("could not interpret TZ={tz:?} as a time zone");
    }
    if let Some(zone) = from_localtime(Path::new("/etc/localtime")) {
        debug!(
            "detected local time zone `{}` from /etc/localtime",
            zone.name(),
        );
        return zone;
    }
    fallback()
}

fn fallback() -> Zone {
    warn!("failed to detect local time zone, falling back to UTC");
    Zone::UTC
}

/// Interprets the value of the `TZ` environment variable.
fn from_tz_env(tz: &str) -> Option<Zone> {
    let tz = tz.strip_prefix(':').unwrap_or(tz);
    if tz.is_empty() {
        return Some(Zone::UTC);
    }
    if tz.eq_ignore_ascii_case("UTC") || tz.eq_ignore_ascii_case("GMT") {
        return Some(Zone::UTC);
    }
    if tz.starts_with('/') {
        return match read_tzif(Path::new(tz)) {
            Ok(tzif) => Some(Zone::from_tzif(local_name(tz), tzif)),
            Err(_err) => {
                warn!("failed to read TZ={tz:?}: {_err}");
                None
            }
        };
    }
    if let Ok(zone) = db().get(tz) {
        return Some(zone);
    }
    match PosixTimeZone::parse(tz) {
        Ok(posix) => Some(Zone::from_rule(tz, std::sync::Arc::new(posix))),
        Err(_err) => {
            trace!("TZ={tz:?} is not a POSIX time zone: {_err}");
            None
        }
    }
}

/// Resolves the zone named by the target of a `/etc/localtime` symlink,
/// or else reads the file itself as TZif data.
fn from_localtime(path: &Path) -> Option<Zone> {
    let name = match std::fs::read_link(path) {
        Ok(target) => target
            .to_str()
            .and_then(zone_name_from_path)
            .map(String::from),
        Err(_err) => {
            trace!("failed to read link {}: {_err}", path.display());
            None
        }
    };
    if let Some(ref name) = name {
        match db().get(name) {
            Ok(zone) => return Some(zone),
            Err(_err) => {
                warn!(
                    "{} points to `{name}`, which is not a known zone: {_err}",
                    path.display(),
                );
            }
        }
    }
    match read_tzif(path) {
        Ok(tzif) => {
            let name = name.as_deref().unwrap_or("Local");
            Some(Zone::from_tzif(name, tzif))
        }
        Err(_err) => {
            trace!("{_err}");
            None
        }
    }
}

fn read_tzif(path: &Path) -> Result<Tzif, Error> {
    let data = std::fs::read(path)
        .map_err(|e| err!("failed to read {}: {e}", path.display()))?;
    Tzif::parse(&data)
        .with_context(|| err!("invalid TZif data in {}", path.display()))
}

/// The name of a zone read from a TZif file outside the database.
fn local_name(path: &str) -> &str {
    zone_name_from_path(path).unwrap_or("Local")
}

/// Extracts `Area/Location` from a path like
/// `/usr/share/zoneinfo/Area/Location`. The `posix/` and `right/`
/// subdirectories some systems use are skipped.
fn zone_name_from_path(path: &str) -> Option<&str> {
    let (_, name) = path.rsplit_once("zoneinfo/")?;
    let name = name
        .strip_prefix("posix/")
        .or_else(|| name.strip_prefix("right/"))
        .unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tz_env_values() {
        assert_eq!(from_tz_env(""), Some(Zone::UTC));
        assert_eq!(from_tz_env(":UTC"), Some(Zone::UTC));
        let zone = from_tz_env(":America/New_York").unwrap();
        assert_eq!(zone.name(), "America/New_York");
        let zone = from_tz_env("Europe/Berlin").unwrap();
        assert_eq!(zone.name(), "Europe/Berlin");
        let zone = from_tz_env("EST5EDT,M3.2.0,M11.1.0").unwrap();
        assert_eq!(zone.offset(0), Some(-300));
        assert_eq!(from_tz_env("Not/A_Zone"), None);
        assert_eq!(from_tz_env("/no/such/zoneinfo/file"), None);
    }

    #[cfg(feature = "tzdb-bundle-always")]
    #[test]
    fn tzif_files() -> anyhow::Result<()> {
        let Some((_, data)) = jiff_tzdb::get("Europe/Warsaw") else {
            return Ok(());
        };
        let dir = std::env::temp_dir()
            .join(format!("calends-localtime-{}", std::process::id()));
        let path = dir.join("zoneinfo").join("Europe").join("Warsaw");
        std::fs::create_dir_all(path.parent().unwrap())?;
        std::fs::write(&path, data)?;

        let zone = from_tz_env(path.to_str().unwrap()).unwrap();
        assert_eq!(zone.name(), "Europe/Warsaw");
        // 2024-07-01T00:00Z, in CEST.
        assert_eq!(zone.offset(1_719_792_000_000), Some(120));

        // Not a symlink, so the file is read directly.
        let zone = from_localtime(&path).unwrap();
        assert_eq!(zone.name(), "Local");
        assert_eq!(zone.offset(1_719_792_000_000), Some(120));
        assert!(!zone.is_offset_fixed());

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn zoneinfo_paths() {
        assert_eq!(
            zone_name_from_path("/usr/share/zoneinfo/America/New_York"),
            Some("America/New_York"),
        );
        assert_eq!(
            zone_name_from_path("../usr/share/zoneinfo/posix/Europe/Paris"),
            Some("Europe/Paris"),
        );
        assert_eq!(zone_name_from_path("/usr/share/zoneinfo/"), None);
        assert_eq!(zone_name_from_path("/etc/timezone"), None);
    }

    #[test]
    fn local_is_never_local_kind() {
        let zone = get();
        assert!(zone.is_valid());
        assert_ne!(zone, Zone::local());
    }
}
