use std::sync::{Arc, OnceLock, RwLock};

use crate::{
    error::{err, tz::Error as E, Error, ErrorContext},
    tz::{posix::PosixTimeZone, Zone},
};

use self::{bundled::BundledZoneInfo, zoneinfo::ZoneInfo};

mod bundled;
mod zoneinfo;

/// Returns a handle to the global time zone database.
///
/// The database is created on first use and is shared by the entire process.
/// Lookups are cached. The cache can be cleared with
/// [`ZoneDatabase::reset`] or [`settings::reset_caches`](crate::settings::reset_caches).
///
/// # Example
///
/// ```
/// let tz = calends::tz::db().get("america/new_york")?;
/// assert_eq!(tz.name(), "America/New_York");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn db() -> &'static ZoneDatabase {
    static DB: OnceLock<ZoneDatabase> = OnceLock::new();
    DB.get_or_init(ZoneDatabase::from_env)
}

/// A database of named time zones.
///
/// A name is resolved from, in order:
///
/// * Rules added at runtime with [`ZoneDatabase::register`].
/// * The host's IANA time zone database, usually at `/usr/share/zoneinfo`
/// or wherever `TZDIR` points. This requires the `tzdb-zoneinfo` feature.
/// * A copy of the IANA time zone database compiled into this crate. This
/// requires the `tzdb-bundle-always` feature.
///
/// Zones from the IANA database carry their full offset history. Names are
/// matched case insensitively. The zone returned always reports the name as
/// it was registered or found in the database.
#[derive(Debug)]
pub struct ZoneDatabase {
    registered: RwLock<Vec<Registered>>,
    zones: RwLock<CachedZones>,
    zoneinfo: ZoneInfo,
    bundled: BundledZoneInfo,
}

#[derive(Clone, Debug)]
struct Registered {
    name: Box<str>,
    posix: Arc<PosixTimeZone>,
}

impl ZoneDatabase {
    fn from_env() -> ZoneDatabase {
        debug!("initializing time zone database");
        ZoneDatabase {
            registered: RwLock::new(vec![]),
            zones: RwLock::new(CachedZones::new()),
            zoneinfo: ZoneInfo::new(),
            bundled: BundledZoneInfo::new(),
        }
    }

    /// Returns the time zone with the given name.
    ///
    /// # Errors
    ///
    /// This returns an error when no zone with the given name exists.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::tz;
    ///
    /// assert!(tz::db().get("Europe/Paris").is_ok());
    /// assert!(tz::db().get("Europe/Atlantis").is_err());
    /// ```
    pub fn get(&self, name: &str) -> Result<Zone, Error> {
        {
            let zones = self.zones.read().unwrap();
            if let Some(zone) = zones.get(name) {
                trace!("found time zone `{name}` in cache");
                return Ok(zone.clone());
            }
        }
        let zone = self.find(name).ok_or_else(|| E::not_found(name))?;
        let mut zones = self.zones.write().unwrap();
        match zones.get_zone_index(&zone.name()) {
            // Another thread beat us to it.
            Ok(i) => Ok(zones.zones[i].clone()),
            Err(i) => {
                debug!("caching time zone `{}`", zone.name());
                zones.zones.insert(i, zone.clone());
                Ok(zone)
            }
        }
    }

    /// Returns true when a zone with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find_registered(name).is_some()
            || self.zoneinfo.contains(name)
            || self.bundled.contains(name)
    }

    /// Registers a named zone defined by a POSIX `TZ` rule, e.g.,
    /// `EST5EDT,M3.2.0,M11.1.0`.
    ///
    /// Registering a name that already exists replaces it, including zones
    /// from the IANA database.
    ///
    /// # Errors
    ///
    /// This returns an error when the rule is not a valid POSIX time zone
    /// string, or when the name is empty or reserved (`local`, `system`,
    /// `default` and names starting with `UTC` or `GMT` followed by an
    /// offset are handled by [`Zone::parse`] and cannot be shadowed).
    ///
    /// # Example
    ///
    /// ```
    /// use calends::tz;
    ///
    /// tz::db().register("Custom/Half_Hour", "<+0030>-0:30")?;
    /// let zone = tz::db().get("custom/half_hour")?;
    /// assert_eq!(zone.offset(0), Some(30));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn register(&self, name: &str, rule: &str) -> Result<(), Error> {
        if name.is_empty() || super::is_reserved_name(name) {
            return Err(E::InvalidRegistrationName { name: name.into() }.into());
        }
        let posix = PosixTimeZone::parse(rule).with_context(|| {
            err!("failed to register time zone `{name}`")
        })?;
        {
            let mut registered = self.registered.write().unwrap();
            let posix = Arc::new(posix);
            let entry = Registered { name: name.into(), posix };
            match registered
                .iter_mut()
                .find(|r| r.name.eq_ignore_ascii_case(name))
            {
                Some(existing) => *existing = entry,
                None => registered.push(entry),
            }
        }
        // Any cached zone of the same name is now stale.
        let mut zones = self.zones.write().unwrap();
        if let Ok(i) = zones.get_zone_index(name) {
            zones.zones.remove(i);
        }
        info!("registered time zone `{name}` with rule `{rule}`");
        Ok(())
    }

    /// Returns every zone name known to this database, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registered
            .read()
            .unwrap()
            .iter()
            .map(|r| r.name.to_string())
            .collect();
        names.extend(self.zoneinfo.available());
        names.extend(self.bundled.available());
        names.sort_by(|a, b| cmp_ignore_ascii_case(a, b));
        names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        names
    }

    /// Clears the cache of resolved zones, and rereads the host's time zone
    /// directory on the next lookup.
    ///
    /// Registered rules are kept.
    pub fn reset(&self) {
        debug!("resetting time zone database cache");
        self.zones.write().unwrap().reset();
        self.zoneinfo.reset();
    }

    fn find(&self, name: &str) -> Option<Zone> {
        if let Some(r) = self.find_registered(name) {
            return Some(Zone::from_rule(&r.name, r.posix));
        }
        if let Some((canonical, tzif)) = self.zoneinfo.get(name) {
            return Some(Zone::from_tzif(&canonical, tzif));
        }
        let (canonical, tzif) = self.bundled.get(name)?;
        Some(Zone::from_tzif(canonical, tzif))
    }

    fn find_registered(&self, name: &str) -> Option<Registered> {
        let registered = self.registered.read().unwrap();
        registered.iter().find(|r| r.name.eq_ignore_ascii_case(name)).cloned()
    }
}

#[derive(Debug)]
struct CachedZones {
    zones: Vec<Zone>,
}

impl CachedZones {
    fn new() -> CachedZones {
        CachedZones { zones: vec![] }
    }

    fn get(&self, query: &str) -> Option<&Zone> {
        self.get_zone_index(query).ok().map(|i| &self.zones[i])
    }

    fn get_zone_index(&self, query: &str) -> Result<usize, usize> {
        self.zones
            .binary_search_by(|zone| cmp_ignore_ascii_case(&zone.name(), query))
    }

    fn reset(&mut self) {
        self.zones.clear();
    }
}

/// Like std's `eq_ignore_ascii_case`, but returns a full `Ordering`.
fn cmp_ignore_ascii_case(s1: &str, s2: &str) -> core::cmp::Ordering {
    let it1 = s1.as_bytes().iter().map(|&b| b.to_ascii_lowercase());
    let it2 = s2.as_bytes().iter().map(|&b| b.to_ascii_lowercase());
    it1.cmp(it2)
}
