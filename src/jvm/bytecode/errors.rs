use std::{io, num::TryFromIntError};

use crate::{codec::SizeMismatch, jvm::constant_pool::InvalidReferenceKind};

/// An error that occurs when decoding a class file.
#[derive(Debug, thiserror::Error)]
#[error("Malformed class file at byte offset {offset}: {kind}")]
pub struct DecodeError {
    /// The number of bytes consumed when the failure was detected.
    pub offset: usize,
    /// What went wrong.
    #[source]
    pub kind: DecodeErrorKind,
}

/// The kind of a [`DecodeError`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// The buffer does not start with the class file magic number.
    #[error("The buffer does not contain a Java class file, magic number is {magic:#010X}")]
    NotAClassFile {
        /// The first four bytes of the buffer.
        magic: u32,
    },
    /// The input ended in the middle of a structure.
    #[error("Unexpected end of input")]
    Truncated,
    /// The underlying reader failed.
    #[error("Failed to read from buffer: {0}")]
    ReadFail(io::Error),
    /// The constant pool count is zero.
    #[error("The constant pool count must be at least 1")]
    EmptyConstantPool,
    /// An eight-byte constant occupies the last slot of the constant pool, so the slot it
    /// reserves lies outside of the pool.
    #[error("An eight-byte constant overruns the constant pool count")]
    ConstantPoolOverrun,
    /// The tag of a constant pool entry is unknown.
    #[error("Unexpected constant pool tag {0}")]
    UnexpectedConstantPoolTag(u8),
    /// A method handle has an unknown reference kind.
    #[error(transparent)]
    InvalidReferenceKind(#[from] InvalidReferenceKind),
    /// A fixed-width value could not be extracted.
    #[error(transparent)]
    SizeMismatch(#[from] SizeMismatch),
    /// There are unread bytes after the end of the class file.
    #[error("Unexpected data at the end of the file")]
    UnexpectedData,
}

impl From<io::Error> for DecodeErrorKind {
    fn from(value: io::Error) -> Self {
        if value.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::ReadFail(value)
        }
    }
}

/// An error that occurs when encoding a class file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The underlying writer failed.
    #[error("Failed to write to buffer: {0}")]
    WriteFail(#[from] io::Error),
    /// A table or string is too long for its length prefix.
    #[error("Length out of range: {0}")]
    OutOfRange(#[from] TryFromIntError),
    /// A fixed-width value could not be deposited.
    #[error(transparent)]
    SizeMismatch(#[from] SizeMismatch),
}
