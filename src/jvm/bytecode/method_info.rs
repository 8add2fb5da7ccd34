use std::io::{Read, Write};

use super::{
    DecodeErrorKind, EncodeError, FromReader, ToWriter,
    reader_utils::{ValueReaderExt, ValueWriterExt},
};
use crate::{
    jvm::method::{Method, MethodAccessFlags},
    macros::trace_event,
};

impl FromReader for Method {
    fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeErrorKind> {
        let access_flags = MethodAccessFlags::from_bits_retain(reader.read_value()?);
        let name_index: u16 = reader.read_value()?;
        let descriptor_index: u16 = reader.read_value()?;
        let attributes = Vec::from_reader(reader)?;
        trace_event!(
            access_flags = access_flags.bits(),
            name_index,
            descriptor_index,
            "decoded method"
        );
        Ok(Self {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}

impl ToWriter for Method {
    fn to_writer<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_value(self.access_flags.bits())?;
        writer.write_value(self.name_index)?;
        writer.write_value(self.descriptor_index)?;
        self.attributes.to_writer(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_with_code_attribute() {
        let bytes = [
            0x00, 0x09, // public static
            0x00, 0x04, 0x00, 0x05, // name and descriptor
            0x00, 0x01, // one attribute
            0x00, 0x06, 0x00, 0x00, 0x00, 0x02, 0xB1, 0x00,
        ];
        let method = Method::from_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(
            method.access_flags,
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC
        );
        assert_eq!(method.attributes.len(), 1);
        assert_eq!(method.attributes[0].name_index, 6);

        let mut written = Vec::new();
        method.to_writer(&mut written).unwrap();
        assert_eq!(written, bytes);
    }

    #[test]
    fn truncated_method() {
        let bytes = [0x00, 0x09, 0x00, 0x04];
        let err = Method::from_reader(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Truncated));
    }
}
