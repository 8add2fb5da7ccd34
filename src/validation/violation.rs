use std::fmt::{self, Display};

use itertools::Itertools;

use crate::jvm::{
    ClassAccessFlags, ClassVersion, ConstantKind, FieldAccessFlags, MethodAccessFlags,
    ReferenceKind,
    constant_pool::{ConstantPoolError, ConstantPoolIndex},
};

/// A structural constraint that a class file does not meet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {kind}")]
pub struct Violation {
    /// Where the problem is.
    pub location: Location,
    /// Which rule failed.
    pub kind: ViolationKind,
}

/// The part of a class file a [`Violation`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Location {
    /// The class file as a whole, including its header.
    #[display("class file")]
    ClassFile,
    /// An entry in the constant pool.
    #[display("constant pool entry #{_0}")]
    ConstantPool(ConstantPoolIndex),
    /// A field, by its position in the field table.
    #[display("field #{_0}")]
    Field(usize),
    /// A method, by its position in the method table.
    #[display("method #{_0}")]
    Method(usize),
}

/// The rule a [`Violation`] breaks.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ViolationKind {
    /// Something is used outside of the class file versions that allow it.
    #[display("version constraint violated: {_0}")]
    VersionConstraint(VersionConstraint),
    /// A method handle refers to something its reference kind does not allow.
    #[display("reference kind restriction violated: {_0}")]
    ReferenceKindRestriction(ReferenceKindRule),
    /// A combination of access flags is illegal.
    #[display("access flag constraint violated: {_0}")]
    AccessFlagConstraint(AccessFlagRule),
    /// A constant pool index does not resolve to an entry of the required kind.
    #[display("bad {role} reference: {error}")]
    BadReference {
        /// What the index is used for.
        role: ReferenceRole,
        /// Why it does not resolve.
        error: ConstantPoolError,
    },
}

/// What a constant pool index is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReferenceRole {
    /// The name of a class, member, module or package.
    #[display("name")]
    Name,
    /// A field or method descriptor.
    #[display("descriptor")]
    Descriptor,
    /// The class of a field or method reference.
    #[display("class")]
    Class,
    /// The name and type of a reference or dynamic constant.
    #[display("name and type")]
    NameAndType,
    /// The value of a string constant.
    #[display("string")]
    String,
    /// The target of a method handle.
    #[display("reference")]
    Reference,
    /// The class the class file defines.
    #[display("this class")]
    ThisClass,
    /// The direct super class.
    #[display("super class")]
    SuperClass,
    /// A direct super interface.
    #[display("interface")]
    Interface,
}

impl From<VersionConstraint> for ViolationKind {
    fn from(value: VersionConstraint) -> Self {
        Self::VersionConstraint(value)
    }
}

impl From<ReferenceKindRule> for ViolationKind {
    fn from(value: ReferenceKindRule) -> Self {
        Self::ReferenceKindRestriction(value)
    }
}

impl From<AccessFlagRule> for ViolationKind {
    fn from(value: AccessFlagRule) -> Self {
        Self::AccessFlagConstraint(value)
    }
}

/// Version rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum VersionConstraint {
    /// The class file version is not one the JVM accepts.
    #[display("class file version {_0} is not supported")]
    UnsupportedClassVersion(ClassVersion),
    /// The constant kind was introduced in a later version.
    #[display("{kind} requires class file version {since} or later")]
    ConstantKindUnavailable {
        /// The kind of the constant.
        kind: ConstantKind,
        /// The version that introduced it.
        since: ClassVersion,
    },
    /// The access flag was introduced in a later version.
    #[display("{flag} requires class file version {since} or later")]
    FlagNotYetIntroduced {
        /// The flag.
        flag: AccessFlagSet,
        /// The version that introduced it.
        since: ClassVersion,
    },
    /// The access flag is no longer allowed.
    #[display("{flag} is not allowed since class file version {removed}")]
    FlagRemoved {
        /// The flag.
        flag: AccessFlagSet,
        /// The version that removed it.
        removed: ClassVersion,
    },
}

/// Method handle rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ReferenceKindRule {
    /// The referenced constant is of a kind the reference kind does not permit.
    #[display("{reference_kind} cannot refer to {found}")]
    ReferentKind {
        /// The kind of the method handle.
        reference_kind: ReferenceKind,
        /// The kind of the referenced constant.
        found: ConstantKind,
    },
    /// The handle invokes an instance or class initialization method.
    #[display("{reference_kind} cannot refer to a method named {name}")]
    ReservedTargetName {
        /// The kind of the method handle.
        reference_kind: ReferenceKind,
        /// The name of the referenced method.
        name: String,
    },
    /// A `REF_newInvokeSpecial` handle refers to something other than a constructor.
    #[display("REF_newInvokeSpecial must refer to <init>, found {name}")]
    ConstructorRequired {
        /// The name of the referenced method.
        name: String,
    },
}

/// Access flag rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum AccessFlagRule {
    /// At most one of the flags may be set.
    #[display("at most one of {present} may be set")]
    MutuallyExclusive {
        /// The flags of the exclusive set that are present.
        present: AccessFlagSet,
    },
    /// The flags are not allowed in a class of this kind.
    #[display("{present} not allowed in a class with {class_kind:?}")]
    ExcludedByClassKind {
        /// The class flag that makes them illegal.
        class_kind: ClassAccessFlags,
        /// The offending flags.
        present: AccessFlagSet,
    },
    /// None of the required flag combinations is present.
    #[display("a class with {class_kind:?} requires {alternatives}")]
    RequiredByClassKind {
        /// The class flag that imposes the requirement.
        class_kind: ClassAccessFlags,
        /// The flag combinations of which one must be present.
        alternatives: FlagAlternatives,
    },
    /// A reserved method name requires flags that are missing.
    #[display("a method named {name} requires {missing}")]
    RequiredByName {
        /// The name of the method.
        name: String,
        /// The flags that are missing.
        missing: AccessFlagSet,
    },
    /// A reserved method name does not permit some of the flags that are set.
    #[display("a method named {name} cannot have {present}")]
    NotPermittedByName {
        /// The name of the method.
        name: String,
        /// The flags that are not permitted.
        present: AccessFlagSet,
    },
}

/// Access flags of a class, a field or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::From)]
pub enum AccessFlagSet {
    /// Flags of a class.
    Class(ClassAccessFlags),
    /// Flags of a field.
    Field(FieldAccessFlags),
    /// Flags of a method.
    Method(MethodAccessFlags),
}

impl Display for AccessFlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(flags) => bitflags::parser::to_writer(flags, f),
            Self::Field(flags) => bitflags::parser::to_writer(flags, f),
            Self::Method(flags) => bitflags::parser::to_writer(flags, f),
        }
    }
}

/// Flag combinations of which at least one must be present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagAlternatives(pub Vec<AccessFlagSet>);

impl Display for FlagAlternatives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|it| format!("[{it}]")).join(" or ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_set_display() {
        let flags = AccessFlagSet::from(MethodAccessFlags::PRIVATE | MethodAccessFlags::PROTECTED);
        assert_eq!(flags.to_string(), "PRIVATE | PROTECTED");
    }

    #[test]
    fn alternatives_display() {
        let alternatives = FlagAlternatives(vec![
            MethodAccessFlags::PUBLIC.into(),
            MethodAccessFlags::PRIVATE.into(),
        ]);
        assert_eq!(alternatives.to_string(), "[PUBLIC] or [PRIVATE]");
    }

    #[test]
    fn violation_display() {
        let violation = Violation {
            location: Location::ConstantPool(3),
            kind: VersionConstraint::ConstantKindUnavailable {
                kind: ConstantKind::Dynamic,
                since: ClassVersion::JDK_11,
            }
            .into(),
        };
        assert_eq!(
            violation.to_string(),
            "constant pool entry #3: version constraint violated: \
             CONSTANT_Dynamic requires class file version 55.0 or later"
        );
    }

    #[test]
    fn reference_role_display() {
        assert_eq!(ReferenceRole::NameAndType.to_string(), "name and type");
        assert_eq!(ReferenceRole::SuperClass.to_string(), "super class");
        assert_eq!(ReferenceRole::Interface.to_string(), "interface");
    }

    #[test]
    fn bad_reference_display() {
        let violation = Violation {
            location: Location::Method(0),
            kind: ViolationKind::BadReference {
                role: ReferenceRole::Name,
                error: ConstantPoolError::InvalidIndex(0),
            },
        };
        assert!(violation.to_string().starts_with("method #0: bad name reference: "));
    }
}
