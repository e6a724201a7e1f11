use std::{error::Error, fmt::Display, io};

/// Errors that may occur when reading a reply from an instrument stream.
#[derive(Debug)]
pub enum ReadError {
    /// The transport failed, or the stream ended before the read was satisfied.
    Io(io::Error),
    /// The first byte of a block response was not the `#` marker.
    MissingBlockMarker { got: u8 },
    /// The byte after the marker was not an ASCII decimal digit.
    InvalidDigitCount { got: u8 },
    /// The length field did not parse as a non-negative decimal integer.
    InvalidLengthField(String),
}

impl From<io::Error> for ReadError {
    fn from(value: io::Error) -> Self {
        ReadError::Io(value)
    }
}

impl Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Io(error) => write!(f, "{}", error),
            ReadError::MissingBlockMarker { got } => {
                write!(f, "missing block marker: expected '#', got 0x{:02x}", got)
            }
            ReadError::InvalidDigitCount { got } => {
                write!(f, "invalid digit-count 0x{:02x} in block header", got)
            }
            ReadError::InvalidLengthField(field) => {
                write!(f, "invalid length field {:?} in block header", field)
            }
        }
    }
}

impl Error for ReadError {}
