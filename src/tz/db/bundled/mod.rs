pub(crate) use self::inner::*;

#[cfg(not(feature = "tzdb-bundle-always"))]
#[path = "disabled.rs"]
mod inner;
#[cfg(feature = "tzdb-bundle-always")]
#[path = "enabled.rs"]
mod inner;
