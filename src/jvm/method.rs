//! JVM methods.

use bitflags::bitflags;

use super::{
    attribute::Attribute,
    constant_pool::{ConstantPool, ConstantPoolError, ConstantPoolIndex, JavaString},
};
use crate::macros::see_jvm_spec;

/// A `method_info` structure of a class file.
#[doc = see_jvm_spec!(4, 6)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// The access flags of the method.
    pub access_flags: MethodAccessFlags,
    /// The index in the constant pool of the name of the method.
    pub name_index: ConstantPoolIndex,
    /// The index in the constant pool of the method descriptor.
    pub descriptor_index: ConstantPoolIndex,
    /// The attributes of the method.
    pub attributes: Vec<Attribute>,
}

impl Method {
    /// The name of the constructor of a class.
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    /// The name of the static initializer of a class.
    pub const CLASS_INITIALIZER_NAME: &'static str = "<clinit>";

    /// Gets the name of the method.
    /// # Errors
    /// See [`ConstantPool::get_str`].
    pub fn name<'a>(
        &self,
        constant_pool: &'a ConstantPool,
    ) -> Result<&'a JavaString, ConstantPoolError> {
        constant_pool.get_str(self.name_index)
    }

    /// Gets the descriptor of the method.
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
    /// The access flags of a [`Method`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct MethodAccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `private`; accessible only within the defining class and other classes belonging to the same nest.
        const PRIVATE = 0x0002;
        /// Declared `protected`; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`; must not be overridden.
        const FINAL = 0x0010;
        /// Declared `synchronized`; invocation is wrapped by a monitor use.
        const SYNCHRONIZED = 0x0020;
        /// A bridge method, generated by the compiler.
        const BRIDGE = 0x0040;
        /// Declared with variable number of arguments.
        const VARARGS = 0x0080;
        /// Declared `native`; implemented in a language other than Java.
        const NATIVE = 0x0100;
        /// Declared `abstract`; no implementation is provided.
        const ABSTRACT = 0x0400;
        /// In a `class` file whose major version is at least 46 and at most 60; Declared `strictfp`.
        const STRICT = 0x0800;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
    }
}
