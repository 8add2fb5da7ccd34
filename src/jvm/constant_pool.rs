//! The constant pool of a class file.

use std::fmt::{self, Display};

use itertools::Itertools;

use crate::macros::see_jvm_spec;

/// An index into a [`ConstantPool`]. Valid indices start from `1`.
pub type ConstantPoolIndex = u16;

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Entry(Constant),
    Padding,
}

impl Slot {
    const fn entry(&self) -> Option<&Constant> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Padding => None,
        }
    }

    const fn entry_mut(&mut self) -> Option<&mut Constant> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Padding => None,
        }
    }
}

/// A JVM constant pool.
///
/// Entries are numbered from `1`. A [`Constant::Long`] or [`Constant::Double`] takes
/// two slots, and the slot right after it can never be referenced.
#[doc = see_jvm_spec!(4, 4)]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool {
    inner: Vec<Slot>,
}

impl ConstantPool {
    /// Creates a new empty constant pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: vec![Slot::Padding],
        }
    }

    /// Creates a new constant pool with the given capacity.
    /// # Parameters
    /// - `count`: the maximum index of entries in the constant pool plus one.
    #[must_use]
    pub fn with_capacity(count: u16) -> Self {
        // The `constant_pool` table is indexed from `1` to `constant_pool_count - 1`.
        let mut inner = Vec::with_capacity(usize::from(count));
        inner.push(Slot::Padding);
        Self { inner }
    }

    /// Gets the constant at the given index.
    /// # Errors
    /// - [`ConstantPoolError::InvalidIndex`] if `index` is `0`, out of range, or points to
    ///   the slot after a [`Constant::Long`] or [`Constant::Double`].
    pub fn get(&self, index: ConstantPoolIndex) -> Result<&Constant, ConstantPoolError> {
        self.inner
            .get(usize::from(index))
            .and_then(Slot::entry)
            .ok_or(ConstantPoolError::InvalidIndex(index))
    }

    /// Replaces the constant at the given index and returns the previous one.
    /// The replacement must take as many slots as the constant it replaces, so that the
    /// indices of the entries after it stay the same.
    /// # Errors
    /// - [`ConstantPoolError::InvalidIndex`] if `index` does not point to a constant.
    /// - [`ConstantPoolError::WidthMismatch`] if exactly one of the two constants is a
    ///   [`Constant::Long`] or [`Constant::Double`].
    pub fn replace(
        &mut self,
        index: ConstantPoolIndex,
        constant: Constant,
    ) -> Result<Constant, ConstantPoolError> {
        let entry = self
            .inner
            .get_mut(usize::from(index))
            .and_then(Slot::entry_mut)
            .ok_or(ConstantPoolError::InvalidIndex(index))?;
        if entry.is_wide() != constant.is_wide() {
            return Err(ConstantPoolError::WidthMismatch {
                index,
                current: entry.kind(),
                replacement: constant.kind(),
            });
        }
        Ok(std::mem::replace(entry, constant))
    }

    /// Gets the constant at the given index and checks that it is of the `expected` kind.
    /// # Errors
    /// - [`ConstantPoolError::InvalidIndex`] if `index` does not point to a constant.
    /// - [`ConstantPoolError::KindMismatch`] if the constant is of another kind.
    pub fn resolve_typed(
        &self,
        index: ConstantPoolIndex,
        expected: ConstantKind,
    ) -> Result<&Constant, ConstantPoolError> {
        let entry = self.get(index)?;
        if entry.kind() == expected {
            Ok(entry)
        } else {
            Err(ConstantPoolError::KindMismatch {
                index,
                expected,
                found: entry.kind(),
            })
        }
    }

    /// Gets the string of the [`Constant::Utf8`] at the given index.
    /// # Errors
    /// See [`ConstantPool::resolve_typed`].
    pub fn get_str(&self, index: ConstantPoolIndex) -> Result<&JavaString, ConstantPoolError> {
        match self.resolve_typed(index, ConstantKind::Utf8)? {
            Constant::Utf8(string) => Ok(string),
            other => Err(ConstantPoolError::KindMismatch {
                index,
                expected: ConstantKind::Utf8,
                found: other.kind(),
            }),
        }
    }

    /// Gets the binary name of the [`Constant::Class`] at the given index.
    /// # Errors
    /// See [`ConstantPool::resolve_typed`].
    pub fn get_class_name(
        &self,
        index: ConstantPoolIndex,
    ) -> Result<&JavaString, ConstantPoolError> {
        match self.resolve_typed(index, ConstantKind::Class)? {
            &Constant::Class { name_index } => self.get_str(name_index),
            other => Err(ConstantPoolError::KindMismatch {
                index,
                expected: ConstantKind::Class,
                found: other.kind(),
            }),
        }
    }

    /// Appends a constant to the end of the constant pool and returns its index.
    /// Inserting a [`Constant::Long`] or [`Constant::Double`] also reserves the next index.
    /// # Errors
    /// - [`ConstantPoolError::Overflow`] if the constant pool is full.
    pub fn insert(&mut self, constant: Constant) -> Result<ConstantPoolIndex, ConstantPoolError> {
        let index = self.count();
        let required = if constant.is_wide() { 2 } else { 1 };
        if self.inner.len() + required > usize::from(u16::MAX) {
            return Err(ConstantPoolError::Overflow);
        }
        if constant.is_wide() {
            self.inner.push(Slot::Entry(constant));
            self.inner.push(Slot::Padding);
        } else {
            self.inner.push(Slot::Entry(constant));
        }
        Ok(index)
    }

    /// Returns the index of an existing constant equal to `constant`, inserting it if absent.
    /// # Errors
    /// - [`ConstantPoolError::Overflow`] if the constant pool is full.
    pub fn find_or_insert(
        &mut self,
        constant: Constant,
    ) -> Result<ConstantPoolIndex, ConstantPoolError> {
        if let Some((index, _)) = self.find(|it| it == &constant) {
            return Ok(index);
        }
        self.insert(constant)
    }

    /// Finds the first constant that satisfies the given predicate.
    pub fn find<P>(&self, predicate: P) -> Option<(ConstantPoolIndex, &Constant)>
    where
        P: Fn(&Constant) -> bool,
    {
        self.iter().find(|(_, entry)| predicate(entry))
    }

    /// Iterates over the constants together with their indices, skipping unusable slots.
    pub fn iter(&self) -> impl Iterator<Item = (ConstantPoolIndex, &Constant)> {
        self.inner
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Insertion keeps the number of slots within the bounds of u16."
                )]
                Slot::Entry(entry) => Some((idx as u16, entry)),
                Slot::Padding => None,
            })
    }

    /// Gets the count of the constant pool. Note that this is NOT the number of entries.
    #[doc = see_jvm_spec!(4, 1)]
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Insertion keeps the number of slots within the bounds of u16."
    )]
    pub fn count(&self) -> u16 {
        self.inner.len() as u16
    }

    /// Gets the number of constants in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Checks if the pool holds no constants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.len() <= 1
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

/// An error when accessing the constant pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstantPoolError {
    /// The index does not point to a usable entry.
    #[error("Bad constant pool index: {0}")]
    InvalidIndex(ConstantPoolIndex),
    /// The entry at the index is not of the kind required by the context.
    #[error("Mismatched constant pool entry at #{index}, expected {expected}, but found {found}")]
    KindMismatch {
        /// The index being resolved.
        index: ConstantPoolIndex,
        /// The kind required by the context.
        expected: ConstantKind,
        /// The kind actually found.
        found: ConstantKind,
    },
    /// The constant pool is full.
    #[error("The constant pool is full")]
    Overflow,
    /// A replacement would change the number of slots taken at the index.
    #[error("Cannot replace {current} at #{index} with {replacement} of a different width")]
    WidthMismatch {
        /// The index being replaced.
        index: ConstantPoolIndex,
        /// The kind of the constant at the index.
        current: ConstantKind,
        /// The kind of the replacement.
        replacement: ConstantKind,
    },
}

/// A string in the constant pool, stored in modified UTF-8 in the class file.
#[doc = see_jvm_spec!(4, 4, 7)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum JavaString {
    /// A string that can be represented in Rust.
    Valid(String),
    /// Bytes that are not in canonical modified UTF-8. They are kept as-is.
    Invalid(Vec<u8>),
}

impl JavaString {
    /// Gets the string if it is valid.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Valid(string) => Some(string),
            Self::Invalid(_) => None,
        }
    }

    /// Decodes a string from the modified UTF-8 bytes in a class file.
    #[must_use]
    pub fn from_java_cesu8(bytes: &[u8]) -> Self {
        match cesu8::from_java_cesu8(bytes) {
            // Non-canonical encodings are kept as bytes so that they are written back unchanged.
            Ok(string) if cesu8::to_java_cesu8(&string) == bytes => {
                Self::Valid(string.into_owned())
            }
            _ => Self::Invalid(bytes.to_vec()),
        }
    }

    /// Encodes the string as modified UTF-8.
    #[must_use]
    pub fn to_java_cesu8(&self) -> Vec<u8> {
        match self {
            Self::Valid(string) => cesu8::to_java_cesu8(string).into_owned(),
            Self::Invalid(bytes) => bytes.clone(),
        }
    }
}

impl PartialEq<str> for JavaString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl From<&str> for JavaString {
    fn from(value: &str) -> Self {
        Self::Valid(value.to_owned())
    }
}

impl From<String> for JavaString {
    fn from(value: String) -> Self {
        Self::Valid(value)
    }
}

impl Display for JavaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(value) => write!(f, "{value}"),
            Self::Invalid(value) => write!(
                f,
                "{} // Invalid modified UTF-8",
                value.iter().map(|it| format!("0x{it:02X}")).join(" ")
            ),
        }
    }
}

/// The kind of a method handle.
#[doc = see_jvm_spec!(5, 4, 3, 5)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[repr(u8)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ReferenceKind {
    /// `REF_getField`
    #[display("REF_getField")]
    GetField = 1,
    /// `REF_getStatic`
    #[display("REF_getStatic")]
    GetStatic = 2,
    /// `REF_putField`
    #[display("REF_putField")]
    PutField = 3,
    /// `REF_putStatic`
    #[display("REF_putStatic")]
    PutStatic = 4,
    /// `REF_invokeVirtual`
    #[display("REF_invokeVirtual")]
    InvokeVirtual = 5,
    /// `REF_invokeStatic`
    #[display("REF_invokeStatic")]
    InvokeStatic = 6,
    /// `REF_invokeSpecial`
    #[display("REF_invokeSpecial")]
    InvokeSpecial = 7,
    /// `REF_newInvokeSpecial`
    #[display("REF_newInvokeSpecial")]
    NewInvokeSpecial = 8,
    /// `REF_invokeInterface`
    #[display("REF_invokeInterface")]
    InvokeInterface = 9,
}

impl ReferenceKind {
    /// All the reference kinds, in the order of their numeric values.
    pub const ALL: [Self; 9] = [
        Self::GetField,
        Self::GetStatic,
        Self::PutField,
        Self::PutStatic,
        Self::InvokeVirtual,
        Self::InvokeStatic,
        Self::InvokeSpecial,
        Self::NewInvokeSpecial,
        Self::InvokeInterface,
    ];

    /// Checks if the reference kind accesses a field.
    #[must_use]
    pub const fn is_field_access(self) -> bool {
        matches!(
            self,
            Self::GetField | Self::GetStatic | Self::PutField | Self::PutStatic
        )
    }
}

impl From<ReferenceKind> for u8 {
    fn from(value: ReferenceKind) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for ReferenceKind {
    type Error = InvalidReferenceKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        value
            .checked_sub(1)
            .and_then(|it| Self::ALL.get(usize::from(it)))
            .copied()
            .ok_or(InvalidReferenceKind(value))
    }
}

/// The byte does not denote a [`ReferenceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid method handle reference kind {0}")]
pub struct InvalidReferenceKind(pub u8);

/// The kind of a [`Constant`], carrying its tag in the class file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[repr(u8)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ConstantKind {
    /// `CONSTANT_Utf8`
    #[display("CONSTANT_Utf8")]
    Utf8 = 1,
    /// `CONSTANT_Integer`
    #[display("CONSTANT_Integer")]
    Integer = 3,
    /// `CONSTANT_Float`
    #[display("CONSTANT_Float")]
    Float = 4,
    /// `CONSTANT_Long`
    #[display("CONSTANT_Long")]
    Long = 5,
    /// `CONSTANT_Double`
    #[display("CONSTANT_Double")]
    Double = 6,
    /// `CONSTANT_Class`
    #[display("CONSTANT_Class")]
    Class = 7,
    /// `CONSTANT_String`
    #[display("CONSTANT_String")]
    String = 8,
    /// `CONSTANT_Fieldref`
    #[display("CONSTANT_Fieldref")]
    FieldRef = 9,
    /// `CONSTANT_Methodref`
    #[display("CONSTANT_Methodref")]
    MethodRef = 10,
    /// `CONSTANT_InterfaceMethodref`
    #[display("CONSTANT_InterfaceMethodref")]
    InterfaceMethodRef = 11,
    /// `CONSTANT_NameAndType`
    #[display("CONSTANT_NameAndType")]
    NameAndType = 12,
    /// `CONSTANT_MethodHandle`
    #[display("CONSTANT_MethodHandle")]
    MethodHandle = 15,
    /// `CONSTANT_MethodType`
    #[display("CONSTANT_MethodType")]
    MethodType = 16,
    /// `CONSTANT_Dynamic`
    #[display("CONSTANT_Dynamic")]
    Dynamic = 17,
    /// `CONSTANT_InvokeDynamic`
    #[display("CONSTANT_InvokeDynamic")]
    InvokeDynamic = 18,
    /// `CONSTANT_Module`
    #[display("CONSTANT_Module")]
    Module = 19,
    /// `CONSTANT_Package`
    #[display("CONSTANT_Package")]
    Package = 20,
}

impl ConstantKind {
    /// Gets the tag of the kind in the class file.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

/// An entry in the [`ConstantPool`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Constant {
    /// A UTF-8 string.
    #[doc = see_jvm_spec!(4, 4, 7)]
    Utf8(JavaString),
    /// An integer.
    #[doc = see_jvm_spec!(4, 4, 4)]
    Integer(i32),
    /// A float.
    #[doc = see_jvm_spec!(4, 4, 4)]
    Float(f32),
    /// A long. Takes two slots in the constant pool.
    #[doc = see_jvm_spec!(4, 4, 5)]
    Long(i64),
    /// A double. Takes two slots in the constant pool.
    #[doc = see_jvm_spec!(4, 4, 5)]
    Double(f64),
    /// A class.
    #[doc = see_jvm_spec!(4, 4, 1)]
    Class {
        /// The index in the constant pool of its binary name.
        /// The entry at that index must be a [`Constant::Utf8`].
        name_index: ConstantPoolIndex,
    },
    /// A string.
    #[doc = see_jvm_spec!(4, 4, 3)]
    String {
        /// The index in the constant pool of its UTF-8 value.
        /// The entry at that index must be a [`Constant::Utf8`].
        string_index: ConstantPoolIndex,
    },
    /// A field reference.
    #[doc = see_jvm_spec!(4, 4, 2)]
    FieldRef {
        /// The index in the constant pool of the class containing the field.
        /// The entry at that index must be a [`Constant::Class`].
        class_index: ConstantPoolIndex,
        /// The index in the constant pool of the name and type of the field.
        /// The entry at that index must be a [`Constant::NameAndType`].
        name_and_type_index: ConstantPoolIndex,
    },
    /// A method reference.
    #[doc = see_jvm_spec!(4, 4, 2)]
    MethodRef {
        /// The index in the constant pool of the class containing the method.
        /// The entry at that index must be a [`Constant::Class`].
        class_index: ConstantPoolIndex,
        /// The index in the constant pool of the name and type of the method.
        /// The entry at that index must be a [`Constant::NameAndType`].
        name_and_type_index: ConstantPoolIndex,
    },
    /// An interface method reference.
    #[doc = see_jvm_spec!(4, 4, 2)]
    InterfaceMethodRef {
        /// The index in the constant pool of the interface containing the method.
        /// The entry at that index must be a [`Constant::Class`].
        class_index: ConstantPoolIndex,
        /// The index in the constant pool of the name and type of the method.
        /// The entry at that index must be a [`Constant::NameAndType`].
        name_and_type_index: ConstantPoolIndex,
    },
    /// A name and type.
    #[doc = see_jvm_spec!(4, 4, 6)]
    NameAndType {
        /// The index in the constant pool of the UTF-8 string containing the name.
        /// The entry at that index must be a [`Constant::Utf8`].
        name_index: ConstantPoolIndex,
        /// The index in the constant pool of the UTF-8 string containing the descriptor.
        /// The entry at that index must be a [`Constant::Utf8`].
        descriptor_index: ConstantPoolIndex,
    },
    /// A method handle.
    #[doc = see_jvm_spec!(4, 4, 8)]
    MethodHandle {
        /// The kind of method handle.
        reference_kind: ReferenceKind,
        /// The index in the constant pool of the referenced field or method.
        /// Which kinds of entries are allowed depends on `reference_kind` and the class version.
        reference_index: ConstantPoolIndex,
    },
    /// A method type.
    #[doc = see_jvm_spec!(4, 4, 9)]
    MethodType {
        /// The index in the constant pool of the UTF-8 string containing the descriptor.
        /// The entry at that index must be a [`Constant::Utf8`].
        descriptor_index: ConstantPoolIndex,
    },
    /// A dynamically computed constant.
    #[doc = see_jvm_spec!(4, 4, 10)]
    Dynamic {
        /// The index of the bootstrap method in the bootstrap method table.
        bootstrap_method_attr_index: u16,
        /// The index in the constant pool of the name and type of the constant.
        /// The entry at that index must be a [`Constant::NameAndType`].
        name_and_type_index: ConstantPoolIndex,
    },
    /// An invokedynamic call site.
    #[doc = see_jvm_spec!(4, 4, 10)]
    InvokeDynamic {
        /// The index of the bootstrap method in the bootstrap method table.
        bootstrap_method_attr_index: u16,
        /// The index in the constant pool of the name and type of the call site.
        /// The entry at that index must be a [`Constant::NameAndType`].
        name_and_type_index: ConstantPoolIndex,
    },
    /// A module.
    #[doc = see_jvm_spec!(4, 4, 11)]
    Module {
        /// The index in the constant pool of the UTF-8 string containing the name.
        /// The entry at that index must be a [`Constant::Utf8`].
        name_index: ConstantPoolIndex,
    },
    /// A package.
    #[doc = see_jvm_spec!(4, 4, 12)]
    Package {
        /// The index in the constant pool of the UTF-8 string containing the name.
        /// The entry at that index must be a [`Constant::Utf8`].
        name_index: ConstantPoolIndex,
    },
}

impl Constant {
    /// Gets the kind of this constant.
    #[must_use]
    pub const fn kind(&self) -> ConstantKind {
        match self {
            Self::Utf8(_) => ConstantKind::Utf8,
            Self::Integer(_) => ConstantKind::Integer,
            Self::Float(_) => ConstantKind::Float,
            Self::Long(_) => ConstantKind::Long,
            Self::Double(_) => ConstantKind::Double,
            Self::Class { .. } => ConstantKind::Class,
            Self::String { .. } => ConstantKind::String,
            Self::FieldRef { .. } => ConstantKind::FieldRef,
            Self::MethodRef { .. } => ConstantKind::MethodRef,
            Self::InterfaceMethodRef { .. } => ConstantKind::InterfaceMethodRef,
            Self::NameAndType { .. } => ConstantKind::NameAndType,
            Self::MethodHandle { .. } => ConstantKind::MethodHandle,
            Self::MethodType { .. } => ConstantKind::MethodType,
            Self::Dynamic { .. } => ConstantKind::Dynamic,
            Self::InvokeDynamic { .. } => ConstantKind::InvokeDynamic,
            Self::Module { .. } => ConstantKind::Module,
            Self::Package { .. } => ConstantKind::Package,
        }
    }

    /// Returns the tag of this constant in the class file.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        self.kind().tag()
    }

    /// Checks if the constant takes two slots in the constant pool.
    #[must_use]
    pub const fn is_wide(&self) -> bool {
        matches!(self, Self::Long(_) | Self::Double(_))
    }
}
