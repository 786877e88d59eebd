use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    NotFound { name: Box<str> },
    InvalidPosix { input: Box<str> },
    InvalidRegistrationName { name: Box<str> },
    UnrecognizedZone { input: Box<str> },
}

impl Error {
    pub(crate) fn not_found(name: &str) -> Error {
        Error::NotFound { name: name.into() }
    }

    pub(crate) fn invalid_posix(input: &str) -> Error {
        Error::InvalidPosix { input: input.into() }
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Tz(err).into()
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
            NotFound { ref name } => write!(
                f,
                "failed to find time zone `{name}` in time zone database",
            ),
            InvalidPosix { ref input } => write!(
                f,
                "failed to parse `{input}` as a POSIX time zone rule",
            ),
            InvalidRegistrationName { ref name } => write!(
                f,
                "time zone name {name:?} cannot be registered, names must \
                 be non-empty and must not be a reserved zone name",
            ),
            UnrecognizedZone { ref input } => write!(
                f,
                "`{input}` is not a fixed offset, a time zone database \
                 name or a POSIX time zone rule",
            ),
        }
    }
}
