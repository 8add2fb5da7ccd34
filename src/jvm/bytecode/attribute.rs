use std::io::{Read, Write};

use super::{
    DecodeErrorKind, EncodeError, FromReader, ToWriter,
    reader_utils::{ValueReaderExt, ValueWriterExt, read_byte_chunk},
    write_length,
};
use crate::{jvm::attribute::Attribute, macros::trace_event};

impl FromReader for Attribute {
    fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeErrorKind> {
        let name_index: u16 = reader.read_value()?;
        let attribute_length: u32 = reader.read_value()?;
        let info = read_byte_chunk(reader, attribute_length.into())?;
        trace_event!(name_index, attribute_length, "decoded attribute");
        Ok(Self { name_index, info })
    }
}

impl ToWriter for Attribute {
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_value(self.name_index)?;
        write_length::<u32>(writer, self.info.len())?;
        writer.write_all(&self.info)?;
        Ok(())
    }
}

impl FromReader for Vec<Attribute> {
    fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeErrorKind> {
        let attributes_count: u16 = reader.read_value()?;
        (0..attributes_count)
            .map(|_| Attribute::from_reader(reader))
            .collect()
    }
}

impl ToWriter for Vec<Attribute> {
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError> {
        write_length::<u16>(writer, self.len())?;
        for attribute in self {
            attribute.to_writer(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_body_is_opaque() {
        let bytes = [0x00, 0x05, 0x00, 0x00, 0x00, 0x03, 0xAA, 0xBB, 0xCC];
        let attribute = Attribute::from_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(attribute.name_index, 5);
        assert_eq!(attribute.info, [0xAA, 0xBB, 0xCC]);

        let mut written = Vec::new();
        attribute.to_writer(&mut written).unwrap();
        assert_eq!(written, bytes);
    }

    #[test]
    fn truncated_attribute_body() {
        let bytes = [0x00, 0x05, 0x00, 0x00, 0x00, 0x04, 0xAA];
        let err = Attribute::from_reader(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Truncated));
    }

    #[test]
    fn huge_length_does_not_allocate_up_front() {
        let bytes = [0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
        let err = Attribute::from_reader(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Truncated));
    }

    #[test]
    fn attribute_table() {
        let bytes = [0x00, 0x02, 0x00, 0x01, 0, 0, 0, 0, 0x00, 0x02, 0, 0, 0, 1, 0x7F];
        let attributes = Vec::<Attribute>::from_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(attributes.len(), 2);
        assert!(attributes[0].info.is_empty());
        assert_eq!(attributes[1].info, [0x7F]);
    }
}
