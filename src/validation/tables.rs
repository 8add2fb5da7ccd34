//! Static relations between class file versions, constant kinds and access flags.
//!
//! Layered tables hold `(since, value)` pairs in ascending order of `since`. A lookup picks
//! the last layer whose `since` is not above the class file version.

use crate::jvm::{
    ClassAccessFlags, ClassVersion, ConstantKind, FieldAccessFlags, Method, MethodAccessFlags,
    ReferenceKind,
};

/// The range of class file versions in which an access flag may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagWindow {
    /// The first version that allows the flag.
    pub added: ClassVersion,
    /// The first version that no longer allows the flag, if any.
    pub removed: Option<ClassVersion>,
}

impl FlagWindow {
    /// A flag that has always been allowed.
    pub const ALWAYS: Self = Self::since(ClassVersion::ORIGIN);

    /// A flag allowed from `added` on.
    #[must_use]
    pub const fn since(added: ClassVersion) -> Self {
        Self {
            added,
            removed: None,
        }
    }

    /// A flag allowed from `added` until right before `removed`.
    #[must_use]
    pub const fn between(added: ClassVersion, removed: ClassVersion) -> Self {
        Self {
            added,
            removed: Some(removed),
        }
    }

    /// Checks if the flag may be set in a class file of the given version.
    #[must_use]
    pub fn contains(&self, version: ClassVersion) -> bool {
        self.added <= version && self.removed.is_none_or(|removed| version < removed)
    }
}

/// The class flags that change the rules for the class, its fields, and its methods.
pub const CLASS_KINDS: [ClassAccessFlags; 3] = [
    ClassAccessFlags::INTERFACE,
    ClassAccessFlags::ANNOTATION,
    ClassAccessFlags::MODULE,
];

fn layer<T: Copy>(layers: &[(ClassVersion, T)], version: ClassVersion) -> Option<T> {
    layers
        .iter()
        .rev()
        .find(|(since, _)| *since <= version)
        .map(|&(_, value)| value)
}

fn applicable<T: Copy>(
    layers: &'static [(ClassVersion, T)],
    version: ClassVersion,
) -> impl Iterator<Item = T> {
    layers
        .iter()
        .filter(move |(since, _)| *since <= version)
        .map(|&(_, value)| value)
}

fn window_of<F: PartialEq + Copy>(windows: &[(F, FlagWindow)], flag: F) -> FlagWindow {
    windows
        .iter()
        .find(|(it, _)| *it == flag)
        .map_or(FlagWindow::ALWAYS, |&(_, window)| window)
}

/// Gets the first class file version in which a constant of the given kind may appear.
#[must_use]
pub const fn minimum_version(kind: ConstantKind) -> ClassVersion {
    match kind {
        ConstantKind::Utf8
        | ConstantKind::Integer
        | ConstantKind::Float
        | ConstantKind::Long
        | ConstantKind::Double
        | ConstantKind::Class
        | ConstantKind::String
        | ConstantKind::FieldRef
        | ConstantKind::MethodRef
        | ConstantKind::InterfaceMethodRef
        | ConstantKind::NameAndType => ClassVersion::ORIGIN,
        ConstantKind::MethodHandle | ConstantKind::MethodType | ConstantKind::InvokeDynamic => {
            ClassVersion::JDK_7
        }
        ConstantKind::Module | ConstantKind::Package => ClassVersion::JDK_9,
        ConstantKind::Dynamic => ClassVersion::JDK_11,
    }
}

type ReferentLayers = &'static [(ClassVersion, &'static [ConstantKind])];

const FIELD_REFERENTS: ReferentLayers = &[(ClassVersion::ORIGIN, &[ConstantKind::FieldRef])];
const METHOD_REFERENTS: ReferentLayers = &[(ClassVersion::ORIGIN, &[ConstantKind::MethodRef])];
const STATIC_OR_SPECIAL_REFERENTS: ReferentLayers = &[
    (ClassVersion::ORIGIN, &[ConstantKind::MethodRef]),
    (
        ClassVersion::JDK_8,
        &[ConstantKind::MethodRef, ConstantKind::InterfaceMethodRef],
    ),
];
const INTERFACE_METHOD_REFERENTS: ReferentLayers =
    &[(ClassVersion::ORIGIN, &[ConstantKind::InterfaceMethodRef])];

/// Gets the kinds of constants a method handle of the given kind may refer to in a class
/// file of the given version.
#[must_use]
pub fn permitted_referents(
    reference_kind: ReferenceKind,
    version: ClassVersion,
) -> &'static [ConstantKind] {
    let layers = match reference_kind {
        ReferenceKind::GetField
        | ReferenceKind::GetStatic
        | ReferenceKind::PutField
        | ReferenceKind::PutStatic => FIELD_REFERENTS,
        ReferenceKind::InvokeVirtual | ReferenceKind::NewInvokeSpecial => METHOD_REFERENTS,
        ReferenceKind::InvokeStatic | ReferenceKind::InvokeSpecial => STATIC_OR_SPECIAL_REFERENTS,
        ReferenceKind::InvokeInterface => INTERFACE_METHOD_REFERENTS,
    };
    layer(layers, version).unwrap_or_default()
}

/// Class flags with a limited [`FlagWindow`].
pub const CLASS_FLAG_WINDOWS: &[(ClassAccessFlags, FlagWindow)] = &[
    (ClassAccessFlags::SYNTHETIC, FlagWindow::since(ClassVersion::JDK_5)),
    (ClassAccessFlags::ANNOTATION, FlagWindow::since(ClassVersion::JDK_5)),
    (ClassAccessFlags::ENUM, FlagWindow::since(ClassVersion::JDK_5)),
    (ClassAccessFlags::MODULE, FlagWindow::since(ClassVersion::JDK_9)),
];

/// Field flags with a limited [`FlagWindow`].
pub const FIELD_FLAG_WINDOWS: &[(FieldAccessFlags, FlagWindow)] = &[
    (FieldAccessFlags::SYNTHETIC, FlagWindow::since(ClassVersion::JDK_5)),
    (FieldAccessFlags::ENUM, FlagWindow::since(ClassVersion::JDK_5)),
];

/// Method flags with a limited [`FlagWindow`].
pub const METHOD_FLAG_WINDOWS: &[(MethodAccessFlags, FlagWindow)] = &[
    (
        MethodAccessFlags::STRICT,
        FlagWindow::between(ClassVersion::JDK_1_2, ClassVersion::JDK_17),
    ),
    (MethodAccessFlags::BRIDGE, FlagWindow::since(ClassVersion::JDK_5)),
    (MethodAccessFlags::VARARGS, FlagWindow::since(ClassVersion::JDK_5)),
    (MethodAccessFlags::SYNTHETIC, FlagWindow::since(ClassVersion::JDK_5)),
];

/// Gets the versions in which a single class flag may be set.
#[must_use]
pub fn class_flag_window(flag: ClassAccessFlags) -> FlagWindow {
    window_of(CLASS_FLAG_WINDOWS, flag)
}

/// Gets the versions in which a single field flag may be set.
#[must_use]
pub fn field_flag_window(flag: FieldAccessFlags) -> FlagWindow {
    window_of(FIELD_FLAG_WINDOWS, flag)
}

/// Gets the versions in which a single method flag may be set.
#[must_use]
pub fn method_flag_window(flag: MethodAccessFlags) -> FlagWindow {
    window_of(METHOD_FLAG_WINDOWS, flag)
}

const ACCESS_MODIFIERS: MethodAccessFlags = MethodAccessFlags::PUBLIC
    .union(MethodAccessFlags::PRIVATE)
    .union(MethodAccessFlags::PROTECTED);

const fn with_abstract(flag: MethodAccessFlags) -> MethodAccessFlags {
    MethodAccessFlags::ABSTRACT.union(flag)
}

const CLASS_MUTUALLY_EXCLUSIVE: &[(ClassVersion, ClassAccessFlags)] = &[(
    ClassVersion::ORIGIN,
    ClassAccessFlags::FINAL.union(ClassAccessFlags::ABSTRACT),
)];

const FIELD_MUTUALLY_EXCLUSIVE: &[(ClassVersion, FieldAccessFlags)] = &[
    (
        ClassVersion::ORIGIN,
        FieldAccessFlags::PUBLIC
            .union(FieldAccessFlags::PRIVATE)
            .union(FieldAccessFlags::PROTECTED),
    ),
    (
        ClassVersion::ORIGIN,
        FieldAccessFlags::FINAL.union(FieldAccessFlags::VOLATILE),
    ),
];

const METHOD_MUTUALLY_EXCLUSIVE: &[(ClassVersion, MethodAccessFlags)] = &[
    (ClassVersion::ORIGIN, ACCESS_MODIFIERS),
    (ClassVersion::ORIGIN, with_abstract(MethodAccessFlags::PRIVATE)),
    (ClassVersion::ORIGIN, with_abstract(MethodAccessFlags::STATIC)),
    (ClassVersion::ORIGIN, with_abstract(MethodAccessFlags::FINAL)),
    (ClassVersion::ORIGIN, with_abstract(MethodAccessFlags::SYNCHRONIZED)),
    (ClassVersion::ORIGIN, with_abstract(MethodAccessFlags::NATIVE)),
    (ClassVersion::ORIGIN, with_abstract(MethodAccessFlags::STRICT)),
];

/// Gets the sets of class flags of which at most one may be set.
pub fn class_mutually_exclusive(version: ClassVersion) -> impl Iterator<Item = ClassAccessFlags> {
    applicable(CLASS_MUTUALLY_EXCLUSIVE, version)
}

/// Gets the sets of field flags of which at most one may be set.
pub fn field_mutually_exclusive(version: ClassVersion) -> impl Iterator<Item = FieldAccessFlags> {
    applicable(FIELD_MUTUALLY_EXCLUSIVE, version)
}

/// Gets the sets of method flags of which at most one may be set.
pub fn method_mutually_exclusive(
    version: ClassVersion,
) -> impl Iterator<Item = MethodAccessFlags> {
    applicable(METHOD_MUTUALLY_EXCLUSIVE, version)
}

/// Gets the class flags that may not accompany the given class kind.
#[must_use]
pub fn class_flags_excluded_by_class_kind(class_kind: ClassAccessFlags) -> ClassAccessFlags {
    if class_kind == ClassAccessFlags::INTERFACE {
        ClassAccessFlags::FINAL
            | ClassAccessFlags::SUPER
            | ClassAccessFlags::ENUM
            | ClassAccessFlags::MODULE
    } else if class_kind == ClassAccessFlags::MODULE {
        ClassAccessFlags::all().difference(ClassAccessFlags::MODULE)
    } else {
        ClassAccessFlags::empty()
    }
}

/// Gets the field flags that are not allowed in a class of the given kind.
#[must_use]
pub fn field_flags_excluded_by_class_kind(class_kind: ClassAccessFlags) -> FieldAccessFlags {
    if class_kind == ClassAccessFlags::INTERFACE {
        FieldAccessFlags::PRIVATE
            | FieldAccessFlags::PROTECTED
            | FieldAccessFlags::VOLATILE
            | FieldAccessFlags::TRANSIENT
            | FieldAccessFlags::ENUM
    } else {
        FieldAccessFlags::empty()
    }
}

/// Gets the method flags that are not allowed in a class of the given kind.
#[must_use]
pub fn method_flags_excluded_by_class_kind(class_kind: ClassAccessFlags) -> MethodAccessFlags {
    if class_kind == ClassAccessFlags::INTERFACE {
        MethodAccessFlags::PROTECTED
            | MethodAccessFlags::FINAL
            | MethodAccessFlags::SYNCHRONIZED
            | MethodAccessFlags::NATIVE
    } else {
        MethodAccessFlags::empty()
    }
}

/// Gets the class flag combinations of which one must accompany the given class kind.
/// An empty slice means there is no requirement.
#[must_use]
pub fn class_flags_required_by_class_kind(
    class_kind: ClassAccessFlags,
) -> &'static [ClassAccessFlags] {
    if class_kind == ClassAccessFlags::INTERFACE {
        &[ClassAccessFlags::ABSTRACT]
    } else if class_kind == ClassAccessFlags::ANNOTATION {
        &[ClassAccessFlags::INTERFACE]
    } else {
        &[]
    }
}

const INTERFACE_FIELD_FLAGS: FieldAccessFlags = FieldAccessFlags::PUBLIC
    .union(FieldAccessFlags::STATIC)
    .union(FieldAccessFlags::FINAL);

/// Gets the field flag combinations of which one must be present in a class of the given
/// kind. An empty slice means there is no requirement.
#[must_use]
pub fn field_flags_required_by_class_kind(
    class_kind: ClassAccessFlags,
) -> &'static [FieldAccessFlags] {
    if class_kind == ClassAccessFlags::INTERFACE {
        &[INTERFACE_FIELD_FLAGS]
    } else {
        &[]
    }
}

const INTERFACE_METHOD_FLAGS: &[(ClassVersion, &[MethodAccessFlags])] = &[
    (
        ClassVersion::ORIGIN,
        &[MethodAccessFlags::ABSTRACT.union(MethodAccessFlags::PUBLIC)],
    ),
    (
        ClassVersion::JDK_8,
        &[MethodAccessFlags::PUBLIC, MethodAccessFlags::PRIVATE],
    ),
];

/// Gets the method flag combinations of which one must be present in a class of the given
/// kind and version. An empty slice means there is no requirement.
#[must_use]
pub fn method_flags_required_by_class_kind(
    class_kind: ClassAccessFlags,
    version: ClassVersion,
) -> &'static [MethodAccessFlags] {
    if class_kind == ClassAccessFlags::INTERFACE {
        layer(INTERFACE_METHOD_FLAGS, version).unwrap_or_default()
    } else {
        &[]
    }
}

/// Gets the flags a method with the given name must have in a class file of the given
/// version.
#[must_use]
pub fn method_flags_required_by_name(name: &str, version: ClassVersion) -> MethodAccessFlags {
    if name == Method::CLASS_INITIALIZER_NAME && version >= ClassVersion::JDK_7 {
        MethodAccessFlags::STATIC
    } else {
        MethodAccessFlags::empty()
    }
}

/// Gets the flags a method with the given name may have.
#[must_use]
pub fn method_flags_permitted_by_name(name: &str) -> MethodAccessFlags {
    if name == Method::CONSTRUCTOR_NAME {
        ACCESS_MODIFIERS
            | MethodAccessFlags::VARARGS
            | MethodAccessFlags::STRICT
            | MethodAccessFlags::SYNTHETIC
    } else {
        MethodAccessFlags::all()
    }
}

/// Checks if class kind rules do not apply to a method with the given name.
#[must_use]
pub fn is_exempt_from_class_kind(name: &str) -> bool {
    name == Method::CLASS_INITIALIZER_NAME
}
