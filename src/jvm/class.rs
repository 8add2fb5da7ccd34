//! JVM class files.

use bitflags::bitflags;

use super::{
    attribute::Attribute,
    constant_pool::{ConstantPool, ConstantPoolError, ConstantPoolIndex, JavaString},
    field::Field,
    method::Method,
    version::ClassVersion,
};
use crate::{
    macros::see_jvm_spec,
    validation::{self, Violation},
};

/// A class file.
///
/// Constructed by decoding bytes with [`ClassFile::from_bytes`] or by assembling the parts
/// directly. Nothing is checked on construction; call [`ClassFile::validate`] to find out
/// whether the structure is legal for its version.
#[doc = see_jvm_spec!(4, 1)]
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    /// The version of the class file.
    pub version: ClassVersion,
    /// The constant pool.
    pub constant_pool: ConstantPool,
    /// The access flags of the class.
    pub access_flags: ClassAccessFlags,
    /// The index in the constant pool of the class itself.
    /// The entry at that index must be a [`Constant::Class`](super::constant_pool::Constant::Class).
    pub this_class: ConstantPoolIndex,
    /// The index in the constant pool of the super class, or `0` for `java/lang/Object`
    /// and module descriptors.
    pub super_class: ConstantPoolIndex,
    /// The indices in the constant pool of the direct super interfaces.
    pub interfaces: Vec<ConstantPoolIndex>,
    /// The fields declared by the class.
    pub fields: Vec<Field>,
    /// The methods declared by the class.
    pub methods: Vec<Method>,
    /// The attributes of the class.
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// The binary name of the root of the class hierarchy.
    pub const JAVA_LANG_OBJECT: &'static str = "java/lang/Object";

    /// Checks the class file against the structural constraints of its version.
    /// Returns an empty list if the class file is legal.
    #[must_use]
    pub fn validate(&self) -> Vec<Violation> {
        validation::validate(self)
    }

    /// Checks if the class is an interface.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }

    /// Checks if the class file describes a module.
    #[must_use]
    pub const fn is_module(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::MODULE)
    }

    /// Gets the binary name of the class.
    /// # Errors
    /// See [`ConstantPool::get_class_name`].
    pub fn this_class_name(&self) -> Result<&JavaString, ConstantPoolError> {
        self.constant_pool.get_class_name(self.this_class)
    }

    /// Gets the binary name of the super class, or [`None`] if there is no super class.
    /// # Errors
    /// See [`ConstantPool::get_class_name`].
    pub fn super_class_name(&self) -> Result<Option<&JavaString>, ConstantPoolError> {
        match self.super_class {
            0 => Ok(None),
            index => self.constant_pool.get_class_name(index).map(Some),
        }
    }
}

bitflags! {
    /// The access flags of a [`ClassFile`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct ClassAccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `final`; no subclasses allowed.
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by the invokespecial instruction.
        const SUPER = 0x0020;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared `abstract`; must not be instantiated.
        const ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface.
        const ANNOTATION = 0x2000;
        /// Declared as an enum class.
        const ENUM = 0x4000;
        /// Is a module, not a class or interface.
        const MODULE = 0x8000;
    }
}
