pub mod attribute;
pub mod bytecode;
pub mod class;
pub mod constant_pool;
pub mod field;
pub mod method;
pub mod version;

pub use attribute::Attribute;
pub use class::{ClassAccessFlags, ClassFile};
pub use constant_pool::{Constant, ConstantKind, ConstantPool, JavaString, ReferenceKind};
pub use field::{Field, FieldAccessFlags};
pub use method::{Method, MethodAccessFlags};
pub use version::ClassVersion;
