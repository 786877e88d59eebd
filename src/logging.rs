// Logging is compiled out entirely unless the `logging` feature is enabled.
// Some levels are not used by every module, so squash the warnings.
#![allow(unused_macros)]

macro_rules! log {
    ($level:ident, $($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            log::$level!(target: "calends", $($tt)*)
        }
    }
}

macro_rules! error {
    ($($tt:tt)*) => { log!(error, $($tt)*) }
}

macro_rules! warn {
    ($($tt:tt)*) => { log!(warn, $($tt)*) }
}

macro_rules! info {
    ($($tt:tt)*) => { log!(info, $($tt)*) }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(debug, $($tt)*) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(trace, $($tt)*) }
}
