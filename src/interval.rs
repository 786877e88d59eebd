use crate::{
    duration::Duration,
    error::Error,
    instant::Instant,
    invalid::{Invalid, Reason},
    unit::Unit,
};

/// A half-open span of time between two instants.
///
/// An interval includes its start and excludes its end. An interval whose
/// start equals its end is valid and empty.
///
/// Like an [`Instant`], an interval is either valid or carries an
/// [`Invalid`]. Creating an interval from an invalid instant, or with an end
/// before its start, produces an invalid interval. Predicates on invalid
/// intervals return `false` and measurements return NaN or `None`.
///
/// # Example
///
/// ```
/// use calends::{civil::CalendarFields, tz::Zone, Instant, Interval, Unit};
///
/// let day = |d| Instant::from_calendar(CalendarFields::date(2020, 1, d), Zone::UTC);
///
/// let a = Interval::new(day(1), day(10));
/// let b = Interval::new(day(5), day(15));
/// assert!(a.overlaps(&b));
/// assert_eq!(a.length(Unit::Day), 9.0);
///
/// let diff = a.difference([b.clone()]);
/// assert_eq!(diff, vec![Interval::new(day(1), day(5))]);
///
/// let xor = Interval::xor([a, b]);
/// assert_eq!(xor, vec![Interval::new(day(1), day(5)), Interval::new(day(10), day(15))]);
/// ```
#[derive(Clone)]
pub struct Interval {
    state: State,
}

#[derive(Clone)]
enum State {
    Valid(Endpoints),
    Invalid(Invalid),
}

#[derive(Clone)]
struct Endpoints {
    start: Instant,
    end: Instant,
    start_millis: i64,
    end_millis: i64,
}

impl Interval {
    /// Creates the interval from `start` up to, but excluding, `end`.
    ///
    /// The interval is invalid when either instant is invalid or when `end`
    /// comes before `start`.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{invalid::Reason, tz::Zone, Instant, Interval};
    ///
    /// let start = Instant::from_millis(1_000, Zone::UTC);
    /// let end = Instant::from_millis(0, Zone::UTC);
    /// let interval = Interval::new(start, end);
    /// assert_eq!(interval.invalid().unwrap().reason(), Reason::EndBeforeStart);
    /// ```
    pub fn new(start: Instant, end: Instant) -> Interval {
        let Some(start_millis) = start.to_millis() else {
            let explanation = start.invalid().map(|inv| inv.to_string());
            return Interval::from_invalid(Invalid::new(
                Reason::MissingOrInvalidStart,
                explanation,
            ));
        };
        let Some(end_millis) = end.to_millis() else {
            let explanation = end.invalid().map(|inv| inv.to_string());
            return Interval::from_invalid(Invalid::new(
                Reason::MissingOrInvalidEnd,
                explanation,
            ));
        };
        if end_millis < start_millis {
            return Interval::from_invalid(Invalid::explain(
                Reason::EndBeforeStart,
                format_args!(
                    "the end of an interval must be after its start, \
                     but you had start={start} and end={end}",
                ),
            ));
        }
        let endpoints = Endpoints { start, end, start_millis, end_millis };
        Interval { state: State::Valid(endpoints) }
    }

    /// Creates the interval of the given length starting at `start`.
    pub fn after(start: Instant, duration: &Duration) -> Interval {
        let end = start.plus(duration);
        Interval::new(start, end)
    }

    /// Creates the interval of the given length ending at `end`.
    pub fn before(end: Instant, duration: &Duration) -> Interval {
        let start = end.minus(duration);
        Interval::new(start, end)
    }

    /// Creates an invalid interval.
    pub fn from_invalid(invalid: Invalid) -> Interval {
        Interval { state: State::Invalid(invalid) }
    }

    /// Returns the start, or `None` when this interval is invalid.
    pub fn start(&self) -> Option<&Instant> {
        self.endpoints().map(|e| &e.start)
    }

    /// Returns the end, or `None` when this interval is invalid.
    pub fn end(&self) -> Option<&Instant> {
        self.endpoints().map(|e| &e.end)
    }

    /// Returns true when this interval is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, State::Valid(_))
    }

    /// Returns why this interval is invalid, if it is.
    pub fn invalid(&self) -> Option<&Invalid> {
        match self.state {
            State::Valid(_) => None,
            State::Invalid(ref invalid) => Some(invalid),
        }
    }

    /// Returns this interval when it is valid, or an error otherwise.
    pub fn validate(self) -> Result<Interval, Error> {
        match self.state {
            State::Valid(_) => Ok(self),
            State::Invalid(invalid) => Err(Error::from(invalid)),
        }
    }

    /// Returns the length of this interval in the given unit.
    ///
    /// Calendar units are measured on the calendar of the start's zone, so
    /// a day across a daylight saving time transition is still one day.
    /// This is NaN for invalid intervals.
    pub fn length(&self, unit: Unit) -> f64 {
        self.to_duration(&[unit]).get(unit)
    }

    /// Returns the number of calendar units this interval touches.
    ///
    /// For example, an interval from noon on one day to noon the next
    /// touches 2 days.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Instant, Interval, Unit};
    ///
    /// let at = |d, h| {
    ///     let fields = CalendarFields::new(2024, 5, d, h, 0, 0, 0);
    ///     Instant::from_calendar(fields, Zone::UTC)
    /// };
    /// assert_eq!(Interval::new(at(1, 12), at(2, 12)).count(Unit::Day), Some(2));
    /// assert_eq!(Interval::new(at(1, 12), at(2, 0)).count(Unit::Day), Some(1));
    /// assert_eq!(Interval::new(at(1, 12), at(1, 12)).count(Unit::Hour), Some(0));
    /// ```
    pub fn count(&self, unit: Unit) -> Option<i64> {
        let ep = self.endpoints()?;
        let start = ep.start.start_of(unit);
        let end = ep.end.start_of(unit);
        let whole = end.diff(&start, &[unit]).get(unit).floor();
        if !whole.is_finite() {
            return None;
        }
        let partial = end.to_millis() != Some(ep.end_millis);
        Some(whole as i64 + i64::from(partial))
    }

    /// Returns true when this interval is empty or lies within a single
    /// unit of time.
    pub fn has_same(&self, unit: Unit) -> bool {
        let Some(ep) = self.endpoints() else { return false };
        self.is_empty()
            || ep.end.minus(&Duration::from_millis(1.0)).has_same(&ep.start, unit)
    }

    /// Returns true when the start equals the end.
    pub fn is_empty(&self) -> bool {
        self.endpoints().map_or(false, |ep| ep.start_millis == ep.end_millis)
    }

    /// Returns true when this interval starts after the given instant.
    pub fn is_after(&self, instant: &Instant) -> bool {
        self.compare(instant, |ep, ms| ep.start_millis > ms)
    }

    /// Returns true when this interval ends before, or at, the given
    /// instant.
    pub fn is_before(&self, instant: &Instant) -> bool {
        self.compare(instant, |ep, ms| ep.end_millis <= ms)
    }

    /// Returns true when the given instant is within this interval.
    pub fn contains(&self, instant: &Instant) -> bool {
        self.compare(instant, |ep, ms| {
            ep.start_millis <= ms && ms < ep.end_millis
        })
    }

    /// Returns true when the two intervals share any instant.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.relate(other, |a, b| {
            a.end_millis > b.start_millis && a.start_millis < b.end_millis
        })
    }

    /// Returns true when this interval ends exactly where `other` starts.
    pub fn abuts_start(&self, other: &Interval) -> bool {
        self.relate(other, |a, b| a.end_millis == b.start_millis)
    }

    /// Returns true when this interval starts exactly where `other` ends.
    pub fn abuts_end(&self, other: &Interval) -> bool {
        self.relate(other, |a, b| b.end_millis == a.start_millis)
    }

    /// Returns true when `other` lies entirely within this interval.
    pub fn engulfs(&self, other: &Interval) -> bool {
        self.relate(other, |a, b| {
            a.start_millis <= b.start_millis && a.end_millis >= b.end_millis
        })
    }

    /// Returns true when both intervals are valid and have equal endpoints.
    ///
    /// Unlike `==`, this is `false` for two invalid intervals.
    pub fn equals(&self, other: &Interval) -> bool {
        match (self.endpoints(), other.endpoints()) {
            (Some(a), Some(b)) => a.start == b.start && a.end == b.end,
            _ => false,
        }
    }

    /// Returns an interval with the same end and a different start.
    pub fn with_start(&self, start: Instant) -> Interval {
        match self.endpoints() {
            Some(ep) => Interval::new(start, ep.end.clone()),
            None => self.clone(),
        }
    }

    /// Returns an interval with the same start and a different end.
    pub fn with_end(&self, end: Instant) -> Interval {
        match self.endpoints() {
            Some(ep) => Interval::new(ep.start.clone(), end),
            None => self.clone(),
        }
    }

    /// Returns the interval between the images of both endpoints.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{tz::Zone, Instant, Interval, ToDuration};
    ///
    /// let interval = Interval::new(
    ///     Instant::from_millis(0, Zone::UTC),
    ///     Instant::from_millis(3_600_000, Zone::UTC),
    /// );
    /// let later = interval.map_endpoints(|i| i.plus(&1.day()));
    /// assert_eq!(later.start().unwrap().to_millis(), Some(86_400_000));
    /// ```
    pub fn map_endpoints<F>(&self, mut map: F) -> Interval
    where
        F: FnMut(&Instant) -> Instant,
    {
        match self.endpoints() {
            Some(ep) => Interval::new(map(&ep.start), map(&ep.end)),
            None => self.clone(),
        }
    }

    /// Returns the length of this interval as a duration in the given
    /// units. See [`Instant::diff`].
    pub fn to_duration(&self, units: &[Unit]) -> Duration {
        match self.state {
            State::Valid(ref ep) => ep.end.diff(&ep.start, units),
            State::Invalid(ref invalid) => {
                Duration::from_invalid(invalid.clone())
            }
        }
    }

    /// Splits this interval at each of the given instants.
    ///
    /// Instants outside the interval, or on one of its endpoints, are
    /// ignored. The pieces are returned in order and together cover this
    /// interval. An invalid interval produces no pieces.
    pub fn split_at<I>(&self, instants: I) -> Vec<Interval>
    where
        I: IntoIterator<Item = Instant>,
    {
        let Some(ep) = self.endpoints() else { return vec![] };
        let mut cuts: Vec<(i64, Instant)> = instants
            .into_iter()
            .filter_map(|instant| Some((instant.to_millis()?, instant)))
            .filter(|&(ms, _)| ep.start_millis < ms && ms < ep.end_millis)
            .collect();
        cuts.sort_by_key(|&(ms, _)| ms);
        cuts.dedup_by_key(|&mut (ms, _)| ms);

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut start = ep.start.clone();
        for (_, cut) in cuts {
            pieces.push(Interval::new(start, cut.clone()));
            start = cut;
        }
        pieces.push(Interval::new(start, ep.end.clone()));
        pieces
    }

    /// Splits this interval into pieces of the given duration.
    ///
    /// Each piece ends at the start plus a multiple of the duration, so
    /// calendar units stay aligned to the calendar. The last piece may be
    /// shorter. A duration that is invalid or not positive produces no
    /// pieces.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{civil::CalendarFields, tz::Zone, Instant, Interval, ToDuration};
    ///
    /// let start = Instant::from_calendar(CalendarFields::date(2024, 1, 31), Zone::UTC);
    /// let end = Instant::from_calendar(CalendarFields::date(2024, 4, 15), Zone::UTC);
    /// let pieces = Interval::new(start, end).split_by(&1.month());
    /// let ends: Vec<String> = pieces
    ///     .iter()
    ///     .map(|piece| piece.end().unwrap().to_string())
    ///     .collect();
    /// assert_eq!(ends, [
    ///     "2024-02-29T00:00:00.000Z",
    ///     "2024-03-31T00:00:00.000Z",
    ///     "2024-04-15T00:00:00.000Z",
    /// ]);
    /// ```
    pub fn split_by(&self, duration: &Duration) -> Vec<Interval> {
        let Some(ep) = self.endpoints() else { return vec![] };
        if !(duration.to_millis() > 0.0) {
            return vec![];
        }
        let mut pieces = vec![];
        let mut start = ep.start.clone();
        let mut start_millis = ep.start_millis;
        let mut multiple = 1.0;
        while start_millis < ep.end_millis {
            let step = duration.map_units(|value, _| value * multiple);
            let added = ep.start.plus(&step);
            let next = match added.to_millis() {
                Some(ms) if ms < ep.end_millis => added,
                _ => ep.end.clone(),
            };
            let next_millis = next.to_millis().unwrap_or(ep.end_millis);
            if next_millis <= start_millis {
                break;
            }
            pieces.push(Interval::new(start, next.clone()));
            start = next;
            start_millis = next_millis;
            multiple += 1.0;
        }
        pieces
    }

    /// Splits this interval into the given number of pieces of equal
    /// elapsed time.
    ///
    /// Asking for zero pieces, or splitting an invalid interval, produces
    /// no pieces.
    pub fn divide_equally(&self, parts: usize) -> Vec<Interval> {
        let Some(ep) = self.endpoints() else { return vec![] };
        if parts == 0 {
            return vec![];
        }
        let length = (ep.end_millis - ep.start_millis) as f64;
        let piece = Duration::from_millis(length / parts as f64);
        let mut pieces = self.split_by(&piece);
        if pieces.len() > parts {
            // Rounding can leave a sliver at the end. Fold it into the last
            // requested piece.
            pieces.truncate(parts);
            if let Some(last) = pieces.last_mut() {
                *last = last.with_end(ep.end.clone());
            }
        }
        pieces
    }

    /// Returns the part shared by both intervals.
    ///
    /// This is `None` only when the intervals are disjoint. Intervals that
    /// abut produce an empty interval.
    ///
    /// An invalid operand is returned as is.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        let (a, b) = match (&self.state, &other.state) {
            (State::Valid(a), State::Valid(b)) => (a, b),
            (State::Invalid(_), _) => return Some(self.clone()),
            (_, State::Invalid(_)) => return Some(other.clone()),
        };
        let start = if a.start_millis > b.start_millis { a } else { b };
        let end = if a.end_millis < b.end_millis { a } else { b };
        if start.start_millis > end.end_millis {
            return None;
        }
        Some(Interval::new(start.start.clone(), end.end.clone()))
    }

    /// Returns the smallest interval covering both intervals.
    ///
    /// An invalid operand is returned as is.
    pub fn union(&self, other: &Interval) -> Interval {
        let (a, b) = match (&self.state, &other.state) {
            (State::Valid(a), State::Valid(b)) => (a, b),
            (State::Invalid(_), _) => return self.clone(),
            (_, State::Invalid(_)) => return other.clone(),
        };
        let start = if a.start_millis < b.start_millis { a } else { b };
        let end = if a.end_millis > b.end_millis { a } else { b };
        Interval::new(start.start.clone(), end.end.clone())
    }

    /// Combines overlapping and abutting intervals.
    ///
    /// The result is sorted by start and no two intervals in it overlap or
    /// abut. Invalid intervals are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use calends::{tz::Zone, Instant, Interval};
    ///
    /// let iv = |s, e| Interval::new(
    ///     Instant::from_millis(s, Zone::UTC),
    ///     Instant::from_millis(e, Zone::UTC),
    /// );
    /// let merged = Interval::merge([iv(5, 8), iv(0, 3), iv(3, 4), iv(7, 9)]);
    /// assert_eq!(merged, vec![iv(0, 4), iv(5, 9)]);
    /// ```
    pub fn merge<I>(intervals: I) -> Vec<Interval>
    where
        I: IntoIterator<Item = Interval>,
    {
        let mut sorted: Vec<Interval> =
            intervals.into_iter().filter(|iv| iv.is_valid()).collect();
        sorted.sort_by_key(|iv| iv.endpoints().map(|ep| ep.start_millis));

        let mut merged: Vec<Interval> = vec![];
        let mut current: Option<Interval> = None;
        for interval in sorted {
            current = Some(match current {
                None => interval,
                Some(cur)
                    if cur.overlaps(&interval) || cur.abuts_start(&interval) =>
                {
                    cur.union(&interval)
                }
                Some(cur) => {
                    merged.push(cur);
                    interval
                }
            });
        }
        merged.extend(current);
        merged
    }

    /// Returns the parts of time covered by exactly one of the given
    /// intervals, merged.
    ///
    /// Invalid intervals are dropped.
    pub fn xor<I>(intervals: I) -> Vec<Interval>
    where
        I: IntoIterator<Item = Interval>,
    {
        // Each boundary, in input order, and whether it is a start.
        let mut boundaries: Vec<(i64, bool, Instant)> = vec![];
        for interval in intervals {
            if let State::Valid(ep) = interval.state {
                boundaries.push((ep.start_millis, true, ep.start));
                boundaries.push((ep.end_millis, false, ep.end));
            }
        }
        boundaries.sort_by_key(|&(ms, _, _)| ms);

        let mut pieces = vec![];
        let mut covering = 0i64;
        let mut start: Option<(i64, Instant)> = None;
        for (ms, is_start, instant) in boundaries {
            covering += if is_start { 1 } else { -1 };
            if covering == 1 {
                start = Some((ms, instant));
            } else if let Some((start_ms, start)) = start.take() {
                if start_ms != ms {
                    pieces.push(Interval::new(start, instant));
                }
            }
        }
        Interval::merge(pieces)
    }

    /// Returns the parts of this interval not covered by any of the given
    /// intervals.
    pub fn difference<I>(&self, others: I) -> Vec<Interval>
    where
        I: IntoIterator<Item = Interval>,
    {
        let all = core::iter::once(self.clone()).chain(others);
        Interval::xor(all)
            .iter()
            .filter_map(|piece| self.intersection(piece))
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    fn endpoints(&self) -> Option<&Endpoints> {
        match self.state {
            State::Valid(ref ep) => Some(ep),
            State::Invalid(_) => None,
        }
    }

    fn compare(
        &self,
        instant: &Instant,
        test: impl FnOnce(&Endpoints, i64) -> bool,
    ) -> bool {
        match (self.endpoints(), instant.to_millis()) {
            (Some(ep), Some(ms)) => test(ep, ms),
            _ => false,
        }
    }

    fn relate(
        &self,
        other: &Interval,
        test: impl FnOnce(&Endpoints, &Endpoints) -> bool,
    ) -> bool {
        match (self.endpoints(), other.endpoints()) {
            (Some(a), Some(b)) => test(a, b),
            _ => false,
        }
    }
}

impl Eq for Interval {}

/// Valid intervals are equal when their endpoints are equal. Invalid
/// intervals are equal when their invalid values are.
impl PartialEq for Interval {
    fn eq(&self, rhs: &Interval) -> bool {
        match (&self.state, &rhs.state) {
            (State::Valid(a), State::Valid(b)) => {
                a.start == b.start && a.end == b.end
            }
            (State::Invalid(a), State::Invalid(b)) => a == b,
            _ => false,
        }
    }
}

impl core::fmt::Debug for Interval {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.state {
            State::Valid(ref ep) => f
                .debug_struct("Interval")
                .field("start", &ep.start)
                .field("end", &ep.end)
                .finish(),
            State::Invalid(ref invalid) => {
                f.debug_tuple("Interval").field(invalid).finish()
            }
        }
    }
}

/// Renders the interval as an ISO 8601 interval, `start/end`. Invalid
/// intervals render as `Invalid Interval`.
impl core::fmt::Display for Interval {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.state {
            State::Valid(ref ep) => write!(f, "{}/{}", ep.start, ep.end),
            State::Invalid(_) => f.write_str("Invalid Interval"),
        }
    }
}
