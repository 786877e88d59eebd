use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    ConvertNegative { millis: f64 },
    ConvertNonFinite,
    ConvertOverflow { millis: f64 },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Duration(err).into()
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
            ConvertNegative { millis } => write!(
                f,
                "cannot convert negative duration of {millis} milliseconds \
                 to an unsigned `std::time::Duration`",
            ),
            ConvertNonFinite => f.write_str(
                "cannot convert a duration without a finite \
                 millisecond total to `std::time::Duration`",
            ),
            ConvertOverflow { millis } => write!(
                f,
                "duration of {millis} milliseconds overflows \
                 `std::time::Duration`",
            ),
        }
    }
}
