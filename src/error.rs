use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::io;

/// Error code returned by the encoder. Use [`Error::as_str`] for an English description.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Error(u32);

impl Error {
    /// Pixel buffer length is not `width * height * channels`
    pub const SHAPE_MISMATCH: Error = Error(1);
    /// Chunk declares more data than the buffer holds
    pub const TRUNCATED_CHUNK: Error = Error(64);
    /// File could not be created
    pub const FILE_NOT_FOUND: Error = Error(78);
    /// Writing the file or the compressed stream failed
    pub const IO: Error = Error(79);
    /// A pixel's color is missing from the palette it is indexed with
    pub const NOT_IN_PALETTE: Error = Error(82);
    /// Allocation of an output buffer failed
    pub const OUT_OF_MEMORY: Error = Error(83);

    /// Custom compressors may report their own codes
    #[inline]
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Numeric error code
    #[inline]
    #[must_use]
    pub fn code(&self) -> u32 {
        self.0
    }

    /// Returns an English description of the numerical error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self.0 {
            1 => "pixel buffer size doesn't match width * height * channels",
            64 => "chunk length is larger than the remaining data",
            78 => "failed to open file for writing",
            79 => "failed to write file or compressed stream",
            82 => "color isn't in the palette",
            83 => "memory allocation failed",
            _ => "unknown error code",
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.0)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl error::Error for Error {}

#[doc(hidden)]
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => Error::FILE_NOT_FOUND,
            _ => Error::IO,
        }
    }
}

impl From<TryReserveError> for Error {
    #[cold]
    fn from(_: TryReserveError) -> Error {
        Error::OUT_OF_MEMORY
    }
}

#[test]
fn io_errors_map_to_codes() {
    let e = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
    assert_eq!(e, Error::FILE_NOT_FOUND);
    let e = Error::from(io::Error::new(io::ErrorKind::WriteZero, "full"));
    assert_eq!(e, Error::IO);
    assert_eq!(79, e.code());
}

#[test]
fn describes_shape_mismatch() {
    assert_eq!("pixel buffer size doesn't match width * height * channels (1)", format!("{:?}", Error::SHAPE_MISMATCH));
    assert_eq!(Error::SHAPE_MISMATCH.as_str(), Error::SHAPE_MISMATCH.to_string());
}
