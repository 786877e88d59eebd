use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    SystemTimeBeforeEpochOverflow,
    SystemTimeAfterEpochOverflow,
    InvalidInstantToSystemTime,
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Civil(err).into()
    }
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            SystemTimeBeforeEpochOverflow => f.write_str(
                "system time before the Unix epoch does not fit \
                 into the supported millisecond range",
            ),
            SystemTimeAfterEpochOverflow => f.write_str(
                "system time after the Unix epoch does not fit \
                 into the supported millisecond range",
            ),
            InvalidInstantToSystemTime => f.write_str(
                "cannot convert an invalid instant to a system time",
            ),
        }
    }
}
