use crate::tz::tzif::Tzif;

#[derive(Debug)]
pub(crate) struct ZoneInfo;

impl ZoneInfo {
    pub(crate) fn new() -> ZoneInfo {
        ZoneInfo
    }

    pub(crate) fn get(&self, _query: &str) -> Option<(String, Tzif)> {
        None
    }

    pub(crate) fn contains(&self, _query: &str) -> bool {
        false
    }

    pub(crate) fn available(&self) -> Vec<String> {
        Vec::new()
    }

    pub(crate) fn reset(&self) {}
}
