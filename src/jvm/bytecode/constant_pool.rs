use std::io::{Read, Write};

use super::{
    DecodeErrorKind, EncodeError, FromReader, ToWriter,
    reader_utils::{ValueReaderExt, ValueWriterExt, read_byte_chunk},
    write_length,
};
use crate::{
    jvm::constant_pool::{Constant, ConstantPool, JavaString, ReferenceKind},
    macros::{see_jvm_spec, trace_event},
};

impl ConstantPool {
    /// Parses a constant pool from the given reader.
    /// - `constant_pool_count` is the maximum index of entries in the constant pool plus one.
    #[doc = see_jvm_spec!(4, 1)]
    /// # Errors
    /// - [`DecodeErrorKind::EmptyConstantPool`] if `constant_pool_count` is zero.
    /// - [`DecodeErrorKind::ConstantPoolOverrun`] if an eight-byte constant takes the last slot.
    /// - Any error from decoding the entries.
    pub fn from_reader<R>(reader: &mut R, constant_pool_count: u16) -> Result<Self, DecodeErrorKind>
    where
        R: Read + ?Sized,
    {
        if constant_pool_count == 0 {
            return Err(DecodeErrorKind::EmptyConstantPool);
        }
        let mut constant_pool = Self::with_capacity(constant_pool_count);
        while constant_pool.count() < constant_pool_count {
            let constant = Constant::from_reader(reader)?;
            // `insert` keeps duplicates, which preserves the indices of the class file.
            constant_pool
                .insert(constant)
                .map_err(|_| DecodeErrorKind::ConstantPoolOverrun)?;
        }
        if constant_pool.count() != constant_pool_count {
            return Err(DecodeErrorKind::ConstantPoolOverrun);
        }
        Ok(constant_pool)
    }
}

impl ToWriter for ConstantPool {
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_value(self.count())?;
        for (_, constant) in self.iter() {
            constant.to_writer(writer)?;
        }
        Ok(())
    }
}

impl FromReader for Constant {
    fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeErrorKind> {
        let tag: u8 = reader.read_value()?;
        let constant = match tag {
            1 => {
                let length: u16 = reader.read_value()?;
                let bytes = read_byte_chunk(reader, length.into())?;
                Self::Utf8(JavaString::from_java_cesu8(&bytes))
            }
            3 => Self::Integer(reader.read_value()?),
            4 => Self::Float(reader.read_value()?),
            5 => Self::Long(reader.read_value()?),
            6 => Self::Double(reader.read_value()?),
            7 => Self::Class {
                name_index: reader.read_value()?,
            },
            8 => Self::String {
                string_index: reader.read_value()?,
            },
            9 => Self::FieldRef {
                class_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            },
            10 => Self::MethodRef {
                class_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            },
            11 => Self::InterfaceMethodRef {
                class_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            },
            12 => Self::NameAndType {
                name_index: reader.read_value()?,
                descriptor_index: reader.read_value()?,
            },
            15 => {
                let reference_kind: u8 = reader.read_value()?;
                Self::MethodHandle {
                    reference_kind: ReferenceKind::try_from(reference_kind)?,
                    reference_index: reader.read_value()?,
                }
            }
            16 => Self::MethodType {
                descriptor_index: reader.read_value()?,
            },
            17 => Self::Dynamic {
                bootstrap_method_attr_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            },
            18 => Self::InvokeDynamic {
                bootstrap_method_attr_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            },
            19 => Self::Module {
                name_index: reader.read_value()?,
            },
            20 => Self::Package {
                name_index: reader.read_value()?,
            },
            unexpected => return Err(DecodeErrorKind::UnexpectedConstantPoolTag(unexpected)),
        };
        trace_event!(kind = %constant.kind(), "decoded constant pool entry");
        Ok(constant)
    }
}

impl ToWriter for Constant {
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_value(self.tag())?;
        match self {
            Self::Utf8(value) => {
                let bytes = value.to_java_cesu8();
                write_length::<u16>(writer, bytes.len())?;
                writer.write_all(&bytes)?;
            }
            &Self::Integer(value) => writer.write_value(value)?,
            &Self::Float(value) => writer.write_value(value)?,
            &Self::Long(value) => writer.write_value(value)?,
            &Self::Double(value) => writer.write_value(value)?,
            &Self::Class { name_index }
            | &Self::Module { name_index }
            | &Self::Package { name_index } => writer.write_value(name_index)?,
            &Self::String { string_index } => writer.write_value(string_index)?,
            &Self::FieldRef {
                class_index,
                name_and_type_index,
            }
            | &Self::MethodRef {
                class_index,
                name_and_type_index,
            }
            | &Self::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => {
                writer.write_value(class_index)?;
                writer.write_value(name_and_type_index)?;
            }
            &Self::NameAndType {
                name_index,
                descriptor_index,
            } => {
                writer.write_value(name_index)?;
                writer.write_value(descriptor_index)?;
            }
            &Self::MethodHandle {
                reference_kind,
                reference_index,
            } => {
                writer.write_value(u8::from(reference_kind))?;
                writer.write_value(reference_index)?;
            }
            &Self::MethodType { descriptor_index } => writer.write_value(descriptor_index)?,
            &Self::Dynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            }
            | &Self::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => {
                writer.write_value(bootstrap_method_attr_index)?;
                writer.write_value(name_and_type_index)?;
            }
        }
        Ok(())
    }
}
