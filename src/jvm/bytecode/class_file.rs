use std::io::{Read, Write};

use super::{
    DecodeError, DecodeErrorKind, EncodeError, FromReader, ToWriter,
    reader_utils::{TrackingReader, ValueReaderExt, ValueWriterExt},
    write_length,
};
use crate::{
    jvm::{
        class::{ClassAccessFlags, ClassFile},
        constant_pool::ConstantPool,
        field::Field,
        method::Method,
        version::ClassVersion,
    },
    macros::debug_event,
};

const JAVA_CLASS_MAGIC: u32 = 0xCAFE_BABE;

impl ClassFile {
    /// Parses a class file from the given bytes.
    /// The bytes must hold exactly one class file.
    /// # Errors
    /// - [`DecodeErrorKind::UnexpectedData`] if there are bytes after the end of the class file.
    /// - See [`DecodeError`] for the other failures.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = TrackingReader::new(bytes);
        let class_file = Self::from_reader(&mut reader)?;
        let offset = reader.position();
        let mut rest = [0u8; 1];
        match reader.read(&mut rest) {
            Ok(0) => Ok(class_file),
            Ok(_) => Err(DecodeError {
                offset,
                kind: DecodeErrorKind::UnexpectedData,
            }),
            Err(err) => Err(DecodeError {
                offset,
                kind: err.into(),
            }),
        }
    }

    /// Parses a class file from the given reader.
    /// The reader is left positioned right after the class file.
    /// # Errors
    /// See [`DecodeError`] for more information.
    pub fn from_reader<R>(reader: &mut R) -> Result<Self, DecodeError>
    where
        R: Read + ?Sized,
    {
        let mut reader = TrackingReader::new(reader);
        <Self as FromReader>::from_reader(&mut reader).map_err(|kind| {
            debug_event!(offset = reader.position(), error = %kind, "failed to decode class file");
            DecodeError {
                offset: reader.position(),
                kind,
            }
        })
    }

    /// Writes the class file to the given writer.
    /// # Errors
    /// See [`EncodeError`] for more information.
    pub fn to_writer<W>(&self, writer: &mut W) -> Result<(), EncodeError>
    where
        W: Write + ?Sized,
    {
        <Self as ToWriter>::to_writer(self, writer)
    }

    /// Encodes the class file into bytes.
    /// # Errors
    /// See [`EncodeError`] for more information.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::new();
        self.to_writer(&mut bytes)?;
        debug_event!(version = %self.version, length = bytes.len(), "encoded class file");
        Ok(bytes)
    }
}

impl FromReader for ClassFile {
    fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeErrorKind> {
        let magic: u32 = reader.read_value()?;
        if magic != JAVA_CLASS_MAGIC {
            return Err(DecodeErrorKind::NotAClassFile { magic });
        }
        let minor_version = reader.read_value()?;
        let major_version = reader.read_value()?;
        let version = ClassVersion::new(major_version, minor_version);
        let constant_pool_count = reader.read_value()?;
        let constant_pool = ConstantPool::from_reader(reader, constant_pool_count)?;
        let access_flags = ClassAccessFlags::from_bits_retain(reader.read_value()?);
        let this_class = reader.read_value()?;
        let super_class = reader.read_value()?;
        let interfaces_count: u16 = reader.read_value()?;
        let interfaces = (0..interfaces_count)
            .map(|_| reader.read_value())
            .collect::<Result<_, _>>()?;
        let fields_count: u16 = reader.read_value()?;
        let fields = (0..fields_count)
            .map(|_| Field::from_reader(reader))
            .collect::<Result<_, _>>()?;
        let methods_count: u16 = reader.read_value()?;
        let methods = (0..methods_count)
            .map(|_| Method::from_reader(reader))
            .collect::<Result<_, _>>()?;
        let attributes = Vec::from_reader(reader)?;

        debug_event!(
            %version,
            constant_pool_count,
            fields_count,
            methods_count,
            "decoded class file"
        );
        Ok(Self {
            version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }
}

impl ToWriter for ClassFile {
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_value(JAVA_CLASS_MAGIC)?;
        writer.write_value(self.version.minor)?;
        writer.write_value(self.version.major)?;
        self.constant_pool.to_writer(writer)?;
        writer.write_value(self.access_flags.bits())?;
        writer.write_value(self.this_class)?;
        writer.write_value(self.super_class)?;
        write_length::<u16>(writer, self.interfaces.len())?;
        for &interface_index in &self.interfaces {
            writer.write_value(interface_index)?;
        }
        write_length::<u16>(writer, self.fields.len())?;
        for field in &self.fields {
            field.to_writer(writer)?;
        }
        write_length::<u16>(writer, self.methods.len())?;
        for method in &self.methods {
            method.to_writer(writer)?;
        }
        self.attributes.to_writer(writer)?;
        Ok(())
    }
}
