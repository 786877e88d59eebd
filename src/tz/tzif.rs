/*!
A parser and evaluator for the binary [TZif] format.

TZif data is what the IANA time zone database compiles to, both in the
`zoneinfo` directory most Unix systems carry and in the copy bundled with
this crate. A TZif file lists every historical offset change of a zone
along with an optional POSIX `TZ` rule, the footer, that describes every
change after the last one listed.

Only the parts needed to answer "what offset applies at this instant" are
kept. Leap second records and the standard/wall and UT/local indicators are
checked for length and then skipped.

[TZif]: https://datatracker.ietf.org/doc/html/rfc8536
*/

use crate::{
    error::{err, Error, ErrorContext},
    tz::posix::{OffsetInfo, PosixTimeZone},
};

/// The largest offset, in seconds, that a local time type may have.
const OFFSET_LIMIT: i32 = 25 * 3600 + 59 * 60 + 59;

/// The offset history of a single zone.
#[derive(Debug)]
pub(crate) struct Tzif {
    /// Sorted by time. The first entry is always at `i64::MIN` and refers
    /// to the first local time type, which applies before any real
    /// transition.
    transitions: Vec<Transition>,
    types: Vec<LocalType>,
    /// Applies at and after the last transition.
    footer: Option<PosixTimeZone>,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    /// Unix seconds.
    at: i64,
    type_index: u8,
}

#[derive(Debug)]
struct LocalType {
    /// Seconds east of UTC.
    offset: i32,
    is_dst: bool,
    abbrev: Box<str>,
}

impl Tzif {
    /// Parses TZif data.
    ///
    /// Arbitrary input never panics. An unparseable footer is dropped with
    /// a warning, in which case the last local time type applies after the
    /// last transition.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Tzif, Error> {
        let (header32, rest) = Header::parse(4, bytes)
            .with_context(|| err!("invalid TZif v1 header"))?;
        if header32.version == 0 {
            let (tzif, _) = Tzif::parse_block(&header32, rest)?;
            return Ok(tzif);
        }
        let (_, rest) =
            try_split_at("v1 data block", rest, header32.data_block_len()?)?;
        let (header64, rest) = Header::parse(8, rest)
            .with_context(|| err!("invalid TZif v2+ header"))?;
        let (mut tzif, rest) = Tzif::parse_block(&header64, rest)?;
        match parse_footer(rest) {
            Ok(footer) => tzif.footer = footer,
            Err(_err) => {
                warn!("ignoring TZif footer: {_err}");
            }
        }
        Ok(tzif)
    }

    fn parse_block<'b>(
        header: &Header,
        bytes: &'b [u8],
    ) -> Result<(Tzif, &'b [u8]), Error> {
        let (times, rest) = try_split_at(
            "transition times",
            bytes,
            header.transition_times_len()?,
        )?;
        let (type_indices, rest) =
            try_split_at("transition types", rest, header.timecnt)?;
        let (types, rest) = try_split_at(
            "local time types",
            rest,
            header.local_time_types_len()?,
        )?;
        let (designations, rest) =
            try_split_at("time zone designations", rest, header.charcnt)?;
        let (_, rest) =
            try_split_at("leap seconds", rest, header.leap_second_len()?)?;
        let (_, rest) =
            try_split_at("standard/wall indicators", rest, header.isstdcnt)?;
        let (_, rest) =
            try_split_at("UT/local indicators", rest, header.isutcnt)?;

        let mut transitions = Vec::with_capacity(header.timecnt + 1);
        transitions.push(Transition { at: i64::MIN, type_index: 0 });
        let it = times.chunks_exact(header.time_size).zip(type_indices);
        for (time, &type_index) in it {
            if usize::from(type_index) >= header.typecnt {
                return Err(err!(
                    "transition refers to local time type {type_index}, \
                     but there are only {} types",
                    header.typecnt,
                ));
            }
            let at = if header.time_size == 4 {
                i64::from(from_be_bytes_i32(time))
            } else {
                from_be_bytes_i64(time)
            };
            let last = transitions.last().map_or(i64::MIN, |t| t.at);
            if at < last {
                return Err(err!(
                    "transition at {at} comes before transition at {last}",
                ));
            }
            transitions.push(Transition { at, type_index });
        }

        let mut local_types = Vec::with_capacity(header.typecnt);
        for record in types.chunks_exact(6) {
            let offset = from_be_bytes_i32(&record[..4]);
            if !(-OFFSET_LIMIT..=OFFSET_LIMIT).contains(&offset) {
                return Err(err!(
                    "local time type offset {offset} is out of range",
                ));
            }
            let abbrev = designation(designations, record[5])?;
            local_types.push(LocalType {
                offset,
                is_dst: record[4] == 1,
                abbrev: abbrev.into(),
            });
        }
        let tzif = Tzif { transitions, types: local_types, footer: None };
        Ok((tzif, rest))
    }

    /// Returns the offset, abbreviation and DST status in effect at the
    /// given Unix millisecond timestamp.
    pub(crate) fn to_offset_info(&self, millis: i64) -> OffsetInfo<'_> {
        let seconds = millis.div_euclid(1_000);
        let i = self
            .transitions
            .partition_point(|t| t.at <= seconds)
            .saturating_sub(1);
        if i + 1 == self.transitions.len() {
            if let Some(ref footer) = self.footer {
                return footer.to_offset_info(millis);
            }
        }
        let typ = self.local_type(self.transitions[i]);
        OffsetInfo {
            seconds: typ.offset,
            abbrev: &typ.abbrev,
            is_dst: typ.is_dst,
        }
    }

    /// Returns true when every transition, and the footer, agree on a
    /// single offset.
    pub(crate) fn is_fixed(&self) -> bool {
        let mut offsets =
            self.transitions.iter().map(|&t| self.local_type(t).offset);
        let Some(first) = offsets.next() else { return true };
        offsets.all(|offset| offset == first)
            && self.footer.as_ref().map_or(true, |footer| {
                footer.is_fixed() && footer.std_offset_seconds() == first
            })
    }

    fn local_type(&self, transition: Transition) -> &LocalType {
        &self.types[usize::from(transition.type_index)]
    }
}

/// Returns true when the given leading bytes could begin TZif data.
#[cfg_attr(not(feature = "tzdb-zoneinfo"), allow(dead_code))]
pub(crate) fn is_possibly_tzif(bytes: &[u8]) -> bool {
    bytes.starts_with(b"TZif")
}

/// The fixed size header before each data block.
#[derive(Debug)]
struct Header {
    /// `4` for the v1 block and `8` for the v2+ block.
    time_size: usize,
    /// `0` for version 1, otherwise an ASCII digit.
    version: u8,
    isutcnt: usize,
    isstdcnt: usize,
    leapcnt: usize,
    timecnt: usize,
    typecnt: usize,
    charcnt: usize,
}

impl Header {
    fn parse(
        time_size: usize,
        bytes: &[u8],
    ) -> Result<(Header, &[u8]), Error> {
        let (header, rest) = try_split_at("header", bytes, 44)?;
        if &header[..4] != b"TZif" {
            return Err(err!("expected `TZif` magic bytes"));
        }
        let count = |i: usize| -> Result<usize, Error> {
            let start = 20 + i * 4;
            let n = from_be_bytes_u32(&header[start..start + 4]);
            usize::try_from(n)
                .map_err(|_| err!("count {n} does not fit in memory"))
        };
        let header = Header {
            time_size,
            version: header[4],
            isutcnt: count(0)?,
            isstdcnt: count(1)?,
            leapcnt: count(2)?,
            timecnt: count(3)?,
            typecnt: count(4)?,
            charcnt: count(5)?,
        };
        if header.isutcnt != 0 && header.isutcnt != header.typecnt {
            return Err(err!(
                "UT/local indicator count must be zero or equal to the \
                 local time type count",
            ));
        }
        if header.isstdcnt != 0 && header.isstdcnt != header.typecnt {
            return Err(err!(
                "standard/wall indicator count must be zero or equal to \
                 the local time type count",
            ));
        }
        if header.typecnt < 1 || header.typecnt > 256 {
            return Err(err!(
                "local time type count {} is not in 1..=256",
                header.typecnt,
            ));
        }
        if header.charcnt < 1 {
            return Err(err!("time zone designations are missing"));
        }
        Ok((header, rest))
    }

    fn data_block_len(&self) -> Result<usize, Error> {
        [
            self.transition_times_len()?,
            self.timecnt,
            self.local_time_types_len()?,
            self.charcnt,
            self.leap_second_len()?,
            self.isstdcnt,
            self.isutcnt,
        ]
        .into_iter()
        .try_fold(0usize, |total, len| total.checked_add(len))
        .ok_or_else(|| err!("TZif data block length overflows"))
    }

    fn transition_times_len(&self) -> Result<usize, Error> {
        self.timecnt
            .checked_mul(self.time_size)
            .ok_or_else(|| err!("transition time count is too big"))
    }

    fn local_time_types_len(&self) -> Result<usize, Error> {
        self.typecnt
            .checked_mul(6)
            .ok_or_else(|| err!("local time type count is too big"))
    }

    fn leap_second_len(&self) -> Result<usize, Error> {
        self.leapcnt
            .checked_mul(self.time_size + 4)
            .ok_or_else(|| err!("leap second count is too big"))
    }
}

/// Parses the POSIX rule between the two newlines after the v2+ block.
///
/// An empty rule means there is no footer.
fn parse_footer(bytes: &[u8]) -> Result<Option<PosixTimeZone>, Error> {
    let Some(bytes) = bytes.strip_prefix(b"\n") else {
        return Err(err!("expected newline before TZif footer"));
    };
    // Rules are short, so a missing terminator is an error rather than a
    // reason to scan everything that follows.
    let scan = &bytes[..bytes.len().min(1024)];
    let end = scan
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| err!("expected newline after TZif footer"))?;
    if end == 0 {
        return Ok(None);
    }
    let rule = core::str::from_utf8(&bytes[..end])
        .map_err(|_| err!("TZif footer is not valid UTF-8"))?;
    PosixTimeZone::parse(rule).map(Some)
}

/// Returns the NUL terminated abbreviation starting at `start`.
fn designation(designations: &[u8], start: u8) -> Result<&str, Error> {
    let suffix = designations.get(usize::from(start)..).ok_or_else(|| {
        err!("time zone designation index {start} is out of bounds")
    })?;
    let len = suffix
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| err!("time zone designation is missing its NUL"))?;
    core::str::from_utf8(&suffix[..len])
        .map_err(|_| err!("time zone designation is not valid UTF-8"))
}

/// Splits the given bytes at `at`, or returns an error naming `what` when
/// there are too few bytes.
fn try_split_at<'b>(
    what: &str,
    bytes: &'b [u8],
    at: usize,
) -> Result<(&'b [u8], &'b [u8]), Error> {
    if at > bytes.len() {
        Err(err!(
            "expected {at} bytes for TZif {what}, but found only {}",
            bytes.len(),
        ))
    } else {
        Ok(bytes.split_at(at))
    }
}

/// # Panics
///
/// When `bytes.len() != 4`.
fn from_be_bytes_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes(bytes.try_into().unwrap())
}

/// # Panics
///
/// When `bytes.len() != 4`.
fn from_be_bytes_i32(bytes: &[u8]) -> i32 {
    i32::from_be_bytes(bytes.try_into().unwrap())
}

/// # Panics
///
/// When `bytes.len() != 8`.
fn from_be_bytes_i64(bytes: &[u8]) -> i64 {
    i64::from_be_bytes(bytes.try_into().unwrap())
}
