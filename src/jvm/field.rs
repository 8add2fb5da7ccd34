//! JVM fields.

use bitflags::bitflags;

use super::{
    attribute::Attribute,
    constant_pool::{ConstantPool, ConstantPoolError, ConstantPoolIndex, JavaString},
};
use crate::macros::see_jvm_spec;

/// A `field_info` structure of a class file.
#[doc = see_jvm_spec!(4, 5)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The access flags of the field.
    pub access_flags: FieldAccessFlags,
    /// The index in the constant pool of the name of the field.
    pub name_index: ConstantPoolIndex,
    /// The index in the constant pool of the field descriptor.
    pub descriptor_index: ConstantPoolIndex,
    /// The attributes of the field.
    pub attributes: Vec<Attribute>,
}

impl Field {
    /// Gets the name of the field.
    /// # Errors
    /// See [`ConstantPool::get_str`].
    pub fn name<'a>(
        &self,
        constant_pool: &'a ConstantPool,
    ) -> Result<&'a JavaString, ConstantPoolError> {
        constant_pool.get_str(self.name_index)
    }

    /// Gets the descriptor of the field.
    /// # Errors
    /// See [`ConstantPool::get_str`].
    pub fn descriptor<'a>(
        &self,
        constant_pool: &'a ConstantPool,
    ) -> Result<&'a JavaString, ConstantPoolError> {
        constant_pool.get_str(self.descriptor_index)
    }
}

bitflags! {
    /// The access flags of a [`Field`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct FieldAccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `private`; accessible only within the defining class and other classes belonging to the same nest.
        const PRIVATE = 0x0002;
        /// Declared `protected`; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`; never directly assigned to after object construction.
        const FINAL = 0x0010;
        /// Declared `volatile`; cannot be cached.
        const VOLATILE = 0x0040;
        /// Declared `transient`; not written or read by a persistent object manager.
        const TRANSIENT = 0x0080;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an element of an `enum` class.
        const ENUM = 0x4000;
    }
}
