use crate::tz::tzif::Tzif;

/// The copy of the IANA time zone database compiled into this crate.
#[derive(Debug)]
pub(crate) struct BundledZoneInfo;

impl BundledZoneInfo {
    pub(crate) fn new() -> BundledZoneInfo {
        BundledZoneInfo
    }

    /// Returns the canonical name and parsed data of the zone matching the
    /// query case insensitively.
    pub(crate) fn get(&self, query: &str) -> Option<(&'static str, Tzif)> {
        let (name, data) = jiff_tzdb::get(query)?;
        match Tzif::parse(data) {
            Ok(tzif) => {
                trace!("found time zone `{name}` in bundled database");
                Some((name, tzif))
            }
            Err(_err) => {
                warn!("failed to parse bundled data for `{name}`: {_err}");
                None
            }
        }
    }

    pub(crate) fn contains(&self, query: &str) -> bool {
        jiff_tzdb::get(query).is_some()
    }

    pub(crate) fn available(&self) -> Vec<String> {
        jiff_tzdb::available().map(String::from).collect()
    }
}
