//! The binary format of class files.
//!
//! [`decode`] turns bytes into a [`ClassFile`] and [`encode`] turns it back. Decoding only
//! checks that the bytes are well-formed; use [`ClassFile::validate`] to check the rest.
mod attribute;
mod class_file;
mod constant_pool;
mod errors;
mod field_info;
mod method_info;
mod reader_utils;

use std::{
    io::{Read, Write},
    num::TryFromIntError,
};

pub use errors::{DecodeError, DecodeErrorKind, EncodeError};
pub use reader_utils::{ValueReaderExt, ValueWriterExt};

use crate::{codec::FixedWidth, jvm::class::ClassFile};

trait FromReader {
    fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeErrorKind>
    where
        Self: Sized;
}

/// Trait for writing a JVM element in its class file representation.
pub trait ToWriter {
    /// Writes the element to the given writer.
    ///
    /// # Errors
    /// - [`EncodeError::OutOfRange`] if a table is too long for its length prefix.
    /// - [`EncodeError::WriteFail`] if the underlying writer fails.
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError>;
}

fn write_length<Len>(writer: &mut (impl Write + ?Sized), length: usize) -> Result<(), EncodeError>
where
    usize: TryInto<Len, Error = TryFromIntError>,
    Len: FixedWidth,
{
    let length: Len = length.try_into()?;
    writer.write_value(length)
}

/// Decodes a class file from bytes.
/// # Errors
/// See [`ClassFile::from_bytes`].
pub fn decode(bytes: &[u8]) -> Result<ClassFile, DecodeError> {
    ClassFile::from_bytes(bytes)
}

/// Encodes a class file into bytes.
/// # Errors
/// See [`ClassFile::to_bytes`].
pub fn encode(class_file: &ClassFile) -> Result<Vec<u8>, EncodeError> {
    class_file.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_prefix_overflow() {
        let mut buf = Vec::new();
        let err = write_length::<u16>(&mut buf, 0x1_0000).unwrap_err();
        assert!(matches!(err, EncodeError::OutOfRange(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn length_prefix_width() {
        let mut buf = Vec::new();
        write_length::<u16>(&mut buf, 3).unwrap();
        write_length::<u32>(&mut buf, 258).unwrap();
        assert_eq!(buf, [0x00, 0x03, 0x00, 0x00, 0x01, 0x02]);
    }
}
