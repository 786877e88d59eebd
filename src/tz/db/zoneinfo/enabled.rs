use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::RwLock,
    time::{Duration, Instant as MonotonicInstant},
};

use crate::{
    error::{err, Error, ErrorContext},
    tz::{
        db::cmp_ignore_ascii_case,
        tzif::{is_possibly_tzif, Tzif},
    },
};

/// How long the collected names stay fresh. A failed lookup only walks the
/// directory again once they are stale.
const NAMES_TTL: Duration = Duration::new(5 * 60, 0);

const ZONEINFO_DIRECTORIES: &[&str] =
    &["/usr/share/zoneinfo", "/etc/zoneinfo"];

/// The TZif files in the host's `zoneinfo` directory.
///
/// The directory is `TZDIR` when set, or else the first of the usual
/// locations holding TZif files. It is found and walked on first use.
#[derive(Debug)]
pub(crate) struct ZoneInfo {
    /// `None` before the first lookup and after a reset.
    names: RwLock<Option<ZoneInfoNames>>,
}

impl ZoneInfo {
    pub(crate) fn new() -> ZoneInfo {
        ZoneInfo { names: RwLock::new(None) }
    }

    /// Returns the name, as found on disk, and the parsed data of the zone
    /// matching the query case insensitively.
    pub(crate) fn get(&self, query: &str) -> Option<(String, Tzif)> {
        let name = self.find(query)?;
        match read(&name.full) {
            Ok(tzif) => {
                trace!("read time zone from {}", name.full.display());
                Some((name.original, tzif))
            }
            Err(_err) => {
                warn!("failed to read time zone `{query}`: {_err}");
                None
            }
        }
    }

    pub(crate) fn contains(&self, query: &str) -> bool {
        self.find(query).is_some()
    }

    pub(crate) fn available(&self) -> Vec<String> {
        let mut names = self.names.write().unwrap();
        let names = names.get_or_insert_with(ZoneInfoNames::from_env);
        names.names.iter().map(|n| n.original.clone()).collect()
    }

    pub(crate) fn reset(&self) {
        *self.names.write().unwrap() = None;
    }

    fn find(&self, query: &str) -> Option<ZoneInfoName> {
        {
            let names = self.names.read().unwrap();
            if let Some(ref names) = *names {
                if let Some(name) = names.get(query) {
                    return Some(name);
                }
                if !names.expiration.is_expired() {
                    return None;
                }
            }
        }
        let mut names = self.names.write().unwrap();
        let names = names.get_or_insert_with(ZoneInfoNames::from_env);
        names.attempt_refresh();
        names.get(query)
    }
}

#[derive(Debug)]
struct ZoneInfoNames {
    /// `None` when no directory with TZif files was found.
    dir: Option<PathBuf>,
    /// Sorted by `lower`.
    names: Vec<ZoneInfoName>,
    expiration: Expiration,
}

impl ZoneInfoNames {
    fn from_env() -> ZoneInfoNames {
        let expiration = Expiration::after(NAMES_TTL);
        if let Some(tzdir) = std::env::var_os("TZDIR") {
            let tzdir = PathBuf::from(tzdir);
            debug!(
                "opening zoneinfo database at TZDIR={}",
                tzdir.display(),
            );
            match walk(&tzdir) {
                Ok(names) => {
                    return ZoneInfoNames {
                        dir: Some(tzdir),
                        names,
                        expiration,
                    };
                }
                Err(_err) => {
                    warn!("failed opening TZDIR={}: {_err}", tzdir.display());
                }
            }
        }
        for dir in ZONEINFO_DIRECTORIES {
            let dir = Path::new(dir);
            match walk(dir) {
                Ok(names) => {
                    debug!(
                        "found {} time zones in {}",
                        names.len(),
                        dir.display(),
                    );
                    let dir = Some(dir.to_path_buf());
                    return ZoneInfoNames { dir, names, expiration };
                }
                Err(_err) => {
                    debug!("failed opening {}: {_err}", dir.display());
                }
            }
        }
        warn!(
            "could not find zoneinfo database at any of the following \
             paths: {}",
            ZONEINFO_DIRECTORIES.join(", "),
        );
        ZoneInfoNames { dir: None, names: vec![], expiration }
    }

    fn get(&self, query: &str) -> Option<ZoneInfoName> {
        self.names
            .binary_search_by(|n| cmp_ignore_ascii_case(&n.lower, query))
            .ok()
            .map(|i| self.names[i].clone())
    }

    /// Walks the directory again, but only once the names are stale.
    fn attempt_refresh(&mut self) {
        if !self.expiration.is_expired() {
            return;
        }
        match self.dir {
            None => *self = ZoneInfoNames::from_env(),
            Some(ref dir) => {
                match walk(dir) {
                    Ok(names) => self.names = names,
                    Err(_err) => {
                        warn!(
                            "failed to refresh zoneinfo time zone names \
                             for {}: {_err}",
                            dir.display(),
                        );
                    }
                }
                self.expiration = Expiration::after(NAMES_TTL);
            }
        }
    }
}

/// A single TZif file in a zoneinfo directory.
#[derive(Clone, Debug)]
struct ZoneInfoName {
    full: PathBuf,
    /// The path relative to the zoneinfo directory, e.g.,
    /// `America/New_York`.
    original: String,
    /// The lowercase form of `original`, used for lookups.
    lower: String,
}

/// An expiration time that is always expired when it overflows.
#[derive(Clone, Copy, Debug)]
struct Expiration(Option<MonotonicInstant>);

impl Expiration {
    fn after(ttl: Duration) -> Expiration {
        Expiration(MonotonicInstant::now().checked_add(ttl))
    }

    fn is_expired(self) -> bool {
        self.0.map_or(true, |t| MonotonicInstant::now() > t)
    }
}

fn read(path: &Path) -> Result<Tzif, Error> {
    let data = std::fs::read(path)
        .map_err(|e| err!("failed to read {}: {e}", path.display()))?;
    Tzif::parse(&data)
        .with_context(|| err!("invalid TZif data in {}", path.display()))
}

/// Recursively walks the given directory and returns the TZif files found,
/// sorted by their lowercase names.
///
/// This collects as many names as possible. It fails only when no TZif
/// file was found at all.
fn walk(start: &Path) -> Result<Vec<ZoneInfoName>, Error> {
    let mut first_err: Option<Error> = None;
    let mut seterr = |err: Error| {
        if first_err.is_none() {
            first_err = Some(err);
        }
    };

    let mut names = vec![];
    let mut stack = vec![start.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let readdir = match dir.read_dir() {
            Ok(readdir) => readdir,
            Err(err) => {
                info!(
                    "error when reading {} as a directory: {err}",
                    dir.display(),
                );
                seterr(err!("failed to read {}: {err}", dir.display()));
                continue;
            }
        };
        for result in readdir {
            let dent = match result {
                Ok(dent) => dent,
                Err(err) => {
                    info!(
                        "error when reading directory entry from {}: {err}",
                        dir.display(),
                    );
                    seterr(err!("failed to read {}: {err}", dir.display()));
                    continue;
                }
            };
            let path = dent.path();
            let file_type = match dent.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    info!(
                        "error when reading file type from {}: {err}",
                        path.display(),
                    );
                    seterr(err!("failed to read {}: {err}", path.display()));
                    continue;
                }
            };
            if file_type.is_dir() {
                stack.push(path);
                continue;
            }
            // Symlinks are treated as files. Peeking at the first bytes
            // rules out the non-TZif files every zoneinfo directory has.
            let mut buf = [0; 4];
            if let Err(err) =
                File::open(&path).and_then(|mut f| f.read_exact(&mut buf))
            {
                info!(
                    "failed to read first 4 bytes of {}: {err}",
                    path.display(),
                );
                seterr(err!("failed to read {}: {err}", path.display()));
                continue;
            }
            if !is_possibly_tzif(&buf) {
                trace!("skipping {}, which is not TZif", path.display());
                continue;
            }
            let Some(original) = path
                .strip_prefix(start)
                .ok()
                .and_then(|name| name.to_str())
                .map(|name| name.replace('\\', "/"))
            else {
                info!("skipping {}, which has no usable name", path.display());
                continue;
            };
            let lower = original.to_ascii_lowercase();
            names.push(ZoneInfoName { full: path, original, lower });
        }
    }
    if names.is_empty() {
        return Err(first_err
            .take()
            .unwrap_or_else(|| err!("{}: no TZif files", start.display())));
    }
    names.sort_by(|n1, n2| n1.lower.cmp(&n2.lower));
    Ok(names)
}
