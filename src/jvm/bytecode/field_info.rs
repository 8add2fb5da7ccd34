use std::io::{Read, Write};

use super::{
    DecodeErrorKind, EncodeError, FromReader, ToWriter,
    reader_utils::{ValueReaderExt, ValueWriterExt},
};
use crate::{
    jvm::field::{Field, FieldAccessFlags},
    macros::trace_event,
};

impl FromReader for Field {
    fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeErrorKind> {
        let access_flags = FieldAccessFlags::from_bits_retain(reader.read_value()?);
        let name_index: u16 = reader.read_value()?;
        let descriptor_index: u16 = reader.read_value()?;
        let attributes = Vec::from_reader(reader)?;
        trace_event!(
            access_flags = access_flags.bits(),
            name_index,
            descriptor_index,
            "decoded field"
        );
        Ok(Self {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}

impl ToWriter for Field {
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_value(self.access_flags.bits())?;
        writer.write_value(self.name_index)?;
        writer.write_value(self.descriptor_index)?;
        self.attributes.to_writer(writer)?;
        Ok(())
    }
}
