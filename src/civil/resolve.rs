/*!
Resolution of local wall clock time to an instant.

The offset of a zone is a function of the instant, not of the local time, so
the mapping from local time to an instant has no direct inverse. This module
finds it with a fixed-point search: guess an offset, compute the instant it
implies, look up the offset actually in effect at that instant and adjust
once if they disagree.

Two local times need special handling:

* A local time in a *gap* (e.g., 02:30 on the day clocks spring forward in
New York) never happened. It is moved forward by the size of the offset jump,
so 02:30 becomes 03:30.
* A local time in an *overlap* (e.g., 01:30 on the day clocks fall back in
New York) happened twice. The earlier instant is chosen, unless the caller's
prior offset equals the offset of the later instant. This keeps values like
"01:30 EST" stable when they are adjusted with `Instant::set`.
*/

use crate::tz::Zone;

/// Transitions closer together than this are not detected as overlaps.
const NEIGHBOR_MILLIS: i64 = 86_400_000;

/// A local time resolved to an instant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Resolved {
    /// Milliseconds since the Unix epoch.
    pub(crate) millis: i64,
    /// Minutes east of UTC in effect at `millis`.
    pub(crate) offset: i32,
}

/// Resolves a local timestamp, which is a count of milliseconds since the
/// Unix epoch as if the local wall clock time were in UTC.
///
/// `hint` is a prior offset to start the search from. When absent, the
/// zone's offset at the local timestamp itself is used.
///
/// This returns `None` only when the zone is invalid.
pub(crate) fn resolve(
    local: i64,
    zone: &Zone,
    hint: Option<i32>,
) -> Option<Resolved> {
    let guess = match hint {
        Some(offset) => offset,
        None => zone.offset(local)?,
    };
    let candidate = local - minutes(guess);
    let found = zone.offset(candidate)?;
    if found == guess {
        return Some(disambiguate(local, zone, hint, guess));
    }
    let candidate = candidate - minutes(found - guess);
    let refound = zone.offset(candidate)?;
    if refound == found {
        return Some(disambiguate(local, zone, hint, found));
    }
    // Neither offset produces this local time, so it is in a gap. Use the
    // offset from before the transition, which lands after it.
    let millis = local - minutes(found.min(refound));
    let offset = zone.offset(millis)?;
    trace!(
        "local time {local} is in a gap in zone {zone}, \
         resolved to {millis} with offset {offset}",
    );
    Some(Resolved { millis, offset })
}

/// Checks whether a local time that maps cleanly with `offset` also maps
/// cleanly with a neighboring offset, and picks one if so.
fn disambiguate(
    local: i64,
    zone: &Zone,
    hint: Option<i32>,
    offset: i32,
) -> Resolved {
    let millis = local - minutes(offset);
    if zone.is_offset_fixed() {
        return Resolved { millis, offset };
    }
    let other = [millis - NEIGHBOR_MILLIS, millis + NEIGHBOR_MILLIS]
        .into_iter()
        .filter_map(|nearby| zone.offset(nearby))
        .find(|&other| {
            other != offset && zone.offset(local - minutes(other)) == Some(other)
        });
    let Some(other) = other else { return Resolved { millis, offset } };
    // A bigger offset means an earlier instant for the same local time.
    let (earlier, later) = (offset.max(other), offset.min(other));
    let chosen = if hint == Some(later) { later } else { earlier };
    trace!(
        "local time {local} is ambiguous in zone {zone} \
         (offsets {earlier} and {later}), chose {chosen}",
    );
    Resolved { millis: local - minutes(chosen), offset: chosen }
}

fn minutes(offset: i32) -> i64 {
    i64::from(offset) * 60_000
}
