use proptest::prelude::*;

use crate::jvm::{ClassAccessFlags, ClassFile, ClassVersion, Constant, ConstantPool};

#[rustfmt::skip]
#[must_use]
pub const fn empty_class_bytes(major: u16, minor: u16) -> [u8; 62] {
    [
        0xCA, 0xFE, 0xBA, 0xBE, // Magic
        minor.to_be_bytes()[0], minor.to_be_bytes()[1], // Minor version
        major.to_be_bytes()[0], major.to_be_bytes()[1], // Major version
        // Constant pool
        0x00, 0x05, // Constant pool count 4+1
        0x07, // Tag: Class
        0x00, 0x02, // Name index: 2
        0x01, // Tag: Utf8
        0x00, 0x0A, // Length of string: 10
        0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x57, 0x6F, 0x72, 0x6C, 0x64, // "HelloWorld"
        0x07, // Tag: Class
        0x00, 0x04, // Name index: 4
        0x01, // Tag: Utf8
        0x00, 0x10, // Length of string: 16
        0x6A, 0x61, 0x76, 0x61, 0x2F, 0x6C, 0x61, 0x6E, // "java/lan"
        0x67, 0x2F, 0x4F, 0x62, 0x6A, 0x65, 0x63, 0x74, // "g/Object"
        0x00, 0x21, // Access flags: public super
        0x00, 0x01, // This class index
        0x00, 0x03, // Super class index
        0x00, 0x00, // Interfaces count
        0x00, 0x00, // Fields count
        0x00, 0x00, // Methods count
        0x00, 0x00, // Attributes count
    ]
}

/// The class described by [`empty_class_bytes`].
pub(crate) fn empty_class_with_version(version: ClassVersion) -> ClassFile {
    let mut constant_pool = ConstantPool::new();
    for constant in [
        Constant::Class { name_index: 2 },
        Constant::Utf8("HelloWorld".into()),
        Constant::Class { name_index: 4 },
        Constant::Utf8(ClassFile::JAVA_LANG_OBJECT.into()),
    ] {
        constant_pool.insert(constant).unwrap();
    }
    ClassFile {
        version,
        constant_pool,
        access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        this_class: 1,
        super_class: 3,
        interfaces: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        attributes: Vec::new(),
    }
}

pub(crate) fn arb_class_name() -> impl Strategy<Value = String> {
    let arb_ident = prop::string::string_regex(r"[a-zA-Z][\w\$_]*").expect("The regex is invalid");
    prop::collection::vec(arb_ident, 1..10).prop_map(|v| v.join("/"))
}

#[test]
fn empty_class_bytes_decode_to_empty_class() {
    let bytes = empty_class_bytes(61, 0);
    let class_file = ClassFile::from_bytes(&bytes).unwrap();
    assert_eq!(class_file, empty_class_with_version(ClassVersion::JDK_17));
    assert_eq!(class_file.this_class_name().unwrap().as_str(), Some("HelloWorld"));
}

proptest! {
    #[test]
    fn any_class_name_survives_encoding(name in arb_class_name()) {
        let mut class_file = empty_class_with_version(ClassVersion::JDK_17);
        let name_index = class_file
            .constant_pool
            .insert(Constant::Utf8(name.clone().into()))
            .unwrap();
        class_file.this_class = class_file
            .constant_pool
            .insert(Constant::Class { name_index })
            .unwrap();
        let bytes = class_file.to_bytes().unwrap();
        let decoded = ClassFile::from_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded.this_class_name().unwrap().as_str(), Some(name.as_str()));
        prop_assert!(decoded.validate().is_empty());
    }
}
