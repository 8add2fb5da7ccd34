use std::io::{self, Read, Write};

use super::{DecodeErrorKind, EncodeError};
use crate::codec::{FixedWidth, SizeMismatch};

/// The width of the widest [`FixedWidth`] value.
const MAX_WIDTH: usize = 8;

/// Reads [`FixedWidth`] values from a reader.
pub trait ValueReaderExt: Read {
    /// Reads a value and advances the reader by its width.
    /// # Errors
    /// - [`DecodeErrorKind::Truncated`] if the reader ends before the value does.
    fn read_value<T: FixedWidth>(&mut self) -> Result<T, DecodeErrorKind>;
}

impl<R: Read + ?Sized> ValueReaderExt for R {
    fn read_value<T: FixedWidth>(&mut self) -> Result<T, DecodeErrorKind> {
        let mut storage = [0u8; MAX_WIDTH];
        let buf = storage
            .get_mut(..T::WIDTH)
            .ok_or(SizeMismatch::TooSmall {
                expected: T::WIDTH,
                actual: MAX_WIDTH,
            })?;
        self.read_exact(buf)?;
        Ok(T::extract(buf)?)
    }
}

/// Writes [`FixedWidth`] values to a writer.
pub trait ValueWriterExt: Write {
    /// Writes a value in big-endian order.
    /// # Errors
    /// - [`EncodeError::WriteFail`] if the underlying writer fails.
    fn write_value<T: FixedWidth>(&mut self, value: T) -> Result<(), EncodeError>;
}

impl<W: Write + ?Sized> ValueWriterExt for W {
    fn write_value<T: FixedWidth>(&mut self, value: T) -> Result<(), EncodeError> {
        let mut storage = [0u8; MAX_WIDTH];
        let buf = storage
            .get_mut(..T::WIDTH)
            .ok_or(SizeMismatch::TooSmall {
                expected: T::WIDTH,
                actual: MAX_WIDTH,
            })?;
        value.deposit(buf)?;
        self.write_all(buf)?;
        Ok(())
    }
}

/// Reads `len` bytes and advances the reader by `len` bytes.
///
/// The buffer grows with the data actually read, so a bogus length in a corrupt file
/// cannot trigger a huge allocation.
pub(super) fn read_byte_chunk<R>(reader: &mut R, len: u64) -> Result<Vec<u8>, DecodeErrorKind>
where
    R: Read + ?Sized,
{
    let mut buf = Vec::new();
    (&mut *reader).take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 == len {
        Ok(buf)
    } else {
        Err(DecodeErrorKind::Truncated)
    }
}

/// A reader that counts the bytes read through it.
#[derive(Debug)]
pub(super) struct TrackingReader<R> {
    inner: R,
    position: usize,
}

impl<R: Read> TrackingReader<R> {
    pub(super) const fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub(super) const fn position(&self) -> usize {
        self.position
    }
}

impl<R: Read> Read for TrackingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.position += read;
        Ok(read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_bytes_success() {
        let mut reader = [0x01u8, 0x02, 0x03, 0x04].as_slice();
        let buf = read_byte_chunk(&mut reader, 3).unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03]);
        assert_eq!(reader, [0x04u8]);
    }

    #[test]
    fn read_bytes_failed() {
        let mut reader = [0x01u8, 0x02].as_slice();
        let err = read_byte_chunk(&mut reader, 3).unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Truncated));
    }

    #[test]
    fn read_u32_success() {
        let mut reader = [0x01u8, 0x02, 0x03, 0x04].as_slice();
        let value: u32 = reader.read_value().unwrap();
        assert_eq!(value, 0x0102_0304);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_u32_failed() {
        let mut reader = [0x01u8, 0x02, 0x03].as_slice();
        let err = reader.read_value::<u32>().unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Truncated));
    }

    #[test]
    fn read_i16_success() {
        let mut reader = [0xFFu8, 0xFE].as_slice();
        let value: i16 = reader.read_value().unwrap();
        assert_eq!(value, -2);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_u8_failed() {
        let mut reader = [].as_slice();
        let err = reader.read_value::<u8>().unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Truncated));
    }

    #[test]
    fn read_f64_success() {
        let bytes = 1.25f64.to_bits().to_be_bytes();
        let mut reader = bytes.as_slice();
        let value: f64 = reader.read_value().unwrap();
        assert_eq!(value.to_bits(), 1.25f64.to_bits());
    }

    #[test]
    fn write_values() {
        let mut buf = Vec::new();
        buf.write_value(0xCAFE_BABEu32).unwrap();
        buf.write_value(-1i16).unwrap();
        buf.write_value(7u8).unwrap();
        assert_eq!(buf, [0xCA, 0xFE, 0xBA, 0xBE, 0xFF, 0xFF, 0x07]);
    }

    #[test]
    fn tracking_reader_counts_bytes() {
        let bytes = [0u8; 10];
        let mut reader = TrackingReader::new(bytes.as_slice());
        let _: u32 = reader.read_value().unwrap();
        let _: u16 = reader.read_value().unwrap();
        assert_eq!(reader.position(), 6);
        assert!(reader.read_value::<u64>().is_err());
        assert_eq!(reader.position(), 10);
    }
}
