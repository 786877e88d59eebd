/// The style used by [`Zone::format_offset`](crate::tz::Zone::format_offset).
///
/// # Example
///
/// ```
/// use calends::tz::{OffsetFormat, Zone};
///
/// let zone = Zone::fixed(-330);
/// assert_eq!(zone.format_offset(0, OffsetFormat::Narrow).unwrap(), "-5:30");
/// assert_eq!(zone.format_offset(0, OffsetFormat::Short).unwrap(), "-05:30");
/// assert_eq!(zone.format_offset(0, OffsetFormat::Techie).unwrap(), "-0530");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OffsetFormat {
    /// Hours without padding, with minutes only when non-zero. e.g., `+5`.
    Narrow,
    /// Padded hours and minutes separated by a colon. e.g., `+05:00`.
    #[default]
    Short,
    /// Padded hours and minutes without a separator. e.g., `+0500`.
    Techie,
}

/// The style used by [`Zone::offset_name`](crate::tz::Zone::offset_name).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum NameStyle {
    /// The abbreviation in effect, like `EST` or `CEST`. Fixed offset zones
    /// use their name, like `UTC` or `UTC+5`.
    #[default]
    Short,
    /// The zone's identifier, like `America/New_York`.
    Long,
}

/// Formats an offset in minutes east of UTC.
pub(crate) fn format(minutes: i32, format: OffsetFormat) -> String {
    let sign = if minutes >= 0 { '+' } else { '-' };
    let abs = minutes.unsigned_abs();
    let (hours, minutes) = (abs / 60, abs % 60);
    match format {
        OffsetFormat::Narrow if minutes == 0 => format!("{sign}{hours}"),
        OffsetFormat::Narrow => format!("{sign}{hours}:{minutes:02}"),
        OffsetFormat::Short => format!("{sign}{hours:02}:{minutes:02}"),
        OffsetFormat::Techie => format!("{sign}{hours:02}{minutes:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        assert_eq!(format(0, OffsetFormat::Narrow), "+0");
        assert_eq!(format(0, OffsetFormat::Short), "+00:00");
        assert_eq!(format(0, OffsetFormat::Techie), "+0000");
        assert_eq!(format(300, OffsetFormat::Narrow), "+5");
        assert_eq!(format(-300, OffsetFormat::Short), "-05:00");
        assert_eq!(format(345, OffsetFormat::Narrow), "+5:45");
        assert_eq!(format(345, OffsetFormat::Techie), "+0545");
        assert_eq!(format(-570, OffsetFormat::Narrow), "-9:30");
        assert_eq!(format(-1439, OffsetFormat::Short), "-23:59");
    }
}
