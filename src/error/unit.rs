use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    Unknown { name: Box<str> },
}

impl Error {
    pub(crate) fn unknown(name: &str) -> Error {
        Error::Unknown { name: name.into() }
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Unit(err).into()
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
            Unknown { ref name } => write!(
                f,
                "unrecognized unit {name:?}, expected a singular or plural \
                 unit name like 'year', 'months' or 'milliseconds'",
            ),
        }
    }
}
