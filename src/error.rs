use std::error;
use std::fmt;
use std::io;

/// Errors that can be returned from tape and word packing operations.  These
/// are generally converted into `io::Error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TapeError {
    /// Unknown error
    Unknown,
    /// Malformed tape container (bad length word, reserved bits, mismatched
    /// trailer, or truncated record)
    Format,
    /// Record length is not a multiple of the packing mode's frame size
    InvalidFrameLength,
    /// A record exceeded the maximum size
    RecordTooLarge,
    /// Unparseable reel length
    InvalidLength,
    /// Unparseable or zero tape density
    InvalidDensity,
    /// Reel too short to hold leader and trailer
    ReelTooShort,
}

impl error::Error for TapeError {
    /// Provide terse descriptions of the errors.
    fn description(&self) -> &str {
        self.message()
    }
}

impl fmt::Display for TapeError {
    /// Provide human-readable descriptions of the errors
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.message())
    }
}

impl From<TapeError> for io::Error {
    fn from(error: TapeError) -> io::Error {
        use self::TapeError::*;
        use std::io::ErrorKind::*;
        match error {
            Unknown => io::Error::new(Other, error),
            Format => io::Error::new(InvalidData, error),
            InvalidFrameLength => io::Error::new(InvalidData, error),
            RecordTooLarge => io::Error::new(InvalidData, error),
            InvalidLength => io::Error::new(InvalidInput, error),
            InvalidDensity => io::Error::new(InvalidInput, error),
            ReelTooShort => io::Error::new(InvalidInput, error),
        }
    }
}

impl From<io::Error> for TapeError {
    fn from(error: io::Error) -> TapeError {
        match error.into_inner() {
            Some(e) => match e.downcast_ref::<TapeError>() {
                Some(tape_error) => tape_error.clone(),
                None => TapeError::Unknown,
            },
            None => TapeError::Unknown,
        }
    }
}

impl TapeError {
    /// If the provided `io::Error` contains a `TapeError`, return the
    /// underlying `TapeError`.  If not, return None.  A `None` here means the
    /// error came from the underlying file or stream.
    pub fn from_io_error(error: &io::Error) -> Option<TapeError> {
        error
            .get_ref()
            .and_then(|e| e.downcast_ref::<TapeError>())
            .cloned()
    }

    /// This is sometimes useful instead of .into() when the compiler doesn't
    /// have enough information to perform type inference.
    pub fn to_io_error(&self) -> io::Error {
        self.clone().into()
    }

    /// Provide terse descriptions of the errors.
    fn message(&self) -> &str {
        use self::TapeError::*;
        match *self {
            Unknown => "unknown error",
            Format => "tape file format error",
            InvalidFrameLength => "record size is not a multiple of the frame size",
            RecordTooLarge => "a record exceeded the maximum size",
            InvalidLength => "invalid tape length",
            InvalidDensity => "invalid tape density",
            ReelTooShort => "tape is too short for leader and trailer",
        }
    }
}

impl PartialEq<io::Error> for TapeError {
    fn eq(&self, other: &io::Error) -> bool {
        matches!(TapeError::from_io_error(other), Some(ref e) if e == self)
    }
}

impl PartialEq<TapeError> for io::Error {
    fn eq(&self, other: &TapeError) -> bool {
        matches!(TapeError::from_io_error(self), Some(ref e) if e == other)
    }
}
