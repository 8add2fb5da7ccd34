//! Attributes of classes, fields and methods.

use super::constant_pool::{ConstantPool, ConstantPoolError, ConstantPoolIndex, JavaString};
use crate::macros::see_jvm_spec;

/// An attribute of a class file, field, or method.
///
/// The body of the attribute is kept as raw bytes and written back verbatim.
#[doc = see_jvm_spec!(4, 7)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The index in the constant pool of the name of the attribute.
    /// The entry at that index must be a [`Constant::Utf8`](super::constant_pool::Constant::Utf8).
    pub name_index: ConstantPoolIndex,
    /// The body of the attribute.
    pub info: Vec<u8>,
}

impl Attribute {
    /// Gets the name of the attribute.
    /// # Errors
    /// See [`ConstantPool::get_str`].
    pub fn name<'a>(
        &self,
        constant_pool: &'a ConstantPool,
    ) -> Result<&'a JavaString, ConstantPoolError> {
        constant_pool.get_str(self.name_index)
    }
}
