//! Structural validation of class files.
//!
//! [`validate`] checks a [`ClassFile`] against the rules in [`tables`] and reports every
//! problem it finds. It never fails and never modifies its input.

pub mod tables;
mod violation;

use bitflags::Flags;

pub use violation::{
    AccessFlagRule, AccessFlagSet, FlagAlternatives, Location, ReferenceKindRule, ReferenceRole,
    VersionConstraint, Violation, ViolationKind,
};

use self::tables::FlagWindow;
use crate::{
    jvm::{
        ClassAccessFlags, ClassFile, ClassVersion, Constant, ConstantKind, Method, ReferenceKind,
        constant_pool::ConstantPoolIndex,
    },
    macros::debug_event,
};

/// Checks a class file against the structural constraints of its version.
///
/// Violations are reported in this order: the class file version, the constant pool
/// entries by index, the class header, the fields, and the methods.
#[must_use]
pub fn validate(class_file: &ClassFile) -> Vec<Violation> {
    let mut validator = Validator {
        class_file,
        version: class_file.version,
        violations: Vec::new(),
    };
    validator.check_version();
    validator.check_constant_pool();
    validator.check_class_header();
    validator.check_fields();
    validator.check_methods();
    debug_event!(
        version = %class_file.version,
        violations = validator.violations.len(),
        "validated class file"
    );
    validator.violations
}

struct Validator<'a> {
    class_file: &'a ClassFile,
    version: ClassVersion,
    violations: Vec<Violation>,
}

impl<'a> Validator<'a> {
    fn report(&mut self, location: Location, kind: impl Into<ViolationKind>) {
        self.violations.push(Violation {
            location,
            kind: kind.into(),
        });
    }

    /// Resolves `index` to a constant of the `expected` kind, or reports why it does not.
    fn require(
        &mut self,
        location: Location,
        role: ReferenceRole,
        index: ConstantPoolIndex,
        expected: ConstantKind,
    ) -> Option<&'a Constant> {
        let class_file = self.class_file;
        match class_file.constant_pool.resolve_typed(index, expected) {
            Ok(constant) => Some(constant),
            Err(error) => {
                self.report(location, ViolationKind::BadReference { role, error });
                None
            }
        }
    }

    fn check_version(&mut self) {
        if !self.version.is_supported() {
            self.report(
                Location::ClassFile,
                VersionConstraint::UnsupportedClassVersion(self.version),
            );
        }
    }

    fn check_constant_pool(&mut self) {
        let class_file = self.class_file;
        for (index, constant) in class_file.constant_pool.iter() {
            let location = Location::ConstantPool(index);
            let since = tables::minimum_version(constant.kind());
            if self.version < since {
                self.report(
                    location,
                    VersionConstraint::ConstantKindUnavailable {
                        kind: constant.kind(),
                        since,
                    },
                );
            }
            self.check_constant_references(location, constant);
        }
    }

    fn check_constant_references(&mut self, location: Location, constant: &Constant) {
        match *constant {
            Constant::Utf8(_)
            | Constant::Integer(_)
            | Constant::Float(_)
            | Constant::Long(_)
            | Constant::Double(_) => {}
            Constant::Class { name_index }
            | Constant::Module { name_index }
            | Constant::Package { name_index } => {
                self.require(
                    location,
                    ReferenceRole::Name,
                    name_index,
                    ConstantKind::Utf8,
                );
            }
            Constant::String { string_index } => {
                self.require(
                    location,
                    ReferenceRole::String,
                    string_index,
                    ConstantKind::Utf8,
                );
            }
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            }
            | Constant::MethodRef {
                class_index,
                name_and_type_index,
            }
            | Constant::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => {
                self.require(
                    location,
                    ReferenceRole::Class,
                    class_index,
                    ConstantKind::Class,
                );
                self.require(
                    location,
                    ReferenceRole::NameAndType,
                    name_and_type_index,
                    ConstantKind::NameAndType,
                );
            }
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => {
                self.require(
                    location,
                    ReferenceRole::Name,
                    name_index,
                    ConstantKind::Utf8,
                );
                self.require(
                    location,
                    ReferenceRole::Descriptor,
                    descriptor_index,
                    ConstantKind::Utf8,
                );
            }
            Constant::MethodHandle {
                reference_kind,
                reference_index,
            } => self.check_method_handle(location, reference_kind, reference_index),
            Constant::MethodType { descriptor_index } => {
                self.require(
                    location,
                    ReferenceRole::Descriptor,
                    descriptor_index,
                    ConstantKind::Utf8,
                );
            }
            Constant::Dynamic {
                name_and_type_index,
                ..
            }
            | Constant::InvokeDynamic {
                name_and_type_index,
                ..
            } => {
                self.require(
                    location,
                    ReferenceRole::NameAndType,
                    name_and_type_index,
                    ConstantKind::NameAndType,
                );
            }
        }
    }

    fn check_method_handle(
        &mut self,
        location: Location,
        reference_kind: ReferenceKind,
        reference_index: ConstantPoolIndex,
    ) {
        let class_file = self.class_file;
        let referent = match class_file.constant_pool.get(reference_index) {
            Ok(referent) => referent,
            Err(error) => {
                self.report(
                    location,
                    ViolationKind::BadReference {
                        role: ReferenceRole::Reference,
                        error,
                    },
                );
                return;
            }
        };
        let found = referent.kind();
        if !tables::permitted_referents(reference_kind, self.version).contains(&found) {
            self.report(
                location,
                ReferenceKindRule::ReferentKind {
                    reference_kind,
                    found,
                },
            );
            return;
        }
        if reference_kind.is_field_access() {
            return;
        }
        // A broken name is reported at the entries it belongs to.
        let Some(name) = self.referent_name(referent) else {
            return;
        };
        let is_constructor = name == Method::CONSTRUCTOR_NAME;
        if reference_kind == ReferenceKind::NewInvokeSpecial {
            if !is_constructor {
                self.report(
                    location,
                    ReferenceKindRule::ConstructorRequired {
                        name: name.to_owned(),
                    },
                );
            }
        } else if is_constructor || name == Method::CLASS_INITIALIZER_NAME {
            self.report(
                location,
                ReferenceKindRule::ReservedTargetName {
                    reference_kind,
                    name: name.to_owned(),
                },
            );
        }
    }

    fn referent_name(&self, referent: &Constant) -> Option<&'a str> {
        let class_file = self.class_file;
        let constant_pool = &class_file.constant_pool;
        let (Constant::FieldRef {
            name_and_type_index,
            ..
        }
        | Constant::MethodRef {
            name_and_type_index,
            ..
        }
        | Constant::InterfaceMethodRef {
            name_and_type_index,
            ..
        }) = *referent
        else {
            return None;
        };
        let Ok(&Constant::NameAndType { name_index, .. }) =
            constant_pool.resolve_typed(name_and_type_index, ConstantKind::NameAndType)
        else {
            return None;
        };
        constant_pool.get_str(name_index).ok()?.as_str()
    }

    fn check_class_header(&mut self) {
        let class_file = self.class_file;
        let location = Location::ClassFile;
        self.require(
            location,
            ReferenceRole::ThisClass,
            class_file.this_class,
            ConstantKind::Class,
        );
        if class_file.super_class == 0 {
            let is_object = class_file
                .this_class_name()
                .is_ok_and(|name| name == ClassFile::JAVA_LANG_OBJECT);
            if !is_object && !class_file.is_module() {
                self.require(location, ReferenceRole::SuperClass, 0, ConstantKind::Class);
            }
        } else {
            self.require(
                location,
                ReferenceRole::SuperClass,
                class_file.super_class,
                ConstantKind::Class,
            );
        }
        for &interface in &class_file.interfaces {
            self.require(
                location,
                ReferenceRole::Interface,
                interface,
                ConstantKind::Class,
            );
        }

        let flags = class_file.access_flags;
        self.check_flag_windows(location, flags, tables::CLASS_FLAG_WINDOWS);
        self.check_mutual_exclusion(
            location,
            flags,
            tables::class_mutually_exclusive(self.version),
        );
        for class_kind in self.class_kinds() {
            self.check_class_kind(
                location,
                class_kind,
                flags,
                tables::class_flags_excluded_by_class_kind(class_kind),
                tables::class_flags_required_by_class_kind(class_kind),
            );
        }
    }

    fn check_fields(&mut self) {
        let class_file = self.class_file;
        for (position, field) in class_file.fields.iter().enumerate() {
            let location = Location::Field(position);
            self.require(
                location,
                ReferenceRole::Name,
                field.name_index,
                ConstantKind::Utf8,
            );
            self.require(
                location,
                ReferenceRole::Descriptor,
                field.descriptor_index,
                ConstantKind::Utf8,
            );

            let flags = field.access_flags;
            self.check_flag_windows(location, flags, tables::FIELD_FLAG_WINDOWS);
            self.check_mutual_exclusion(
                location,
                flags,
                tables::field_mutually_exclusive(self.version),
            );
            for class_kind in self.class_kinds() {
                self.check_class_kind(
                    location,
                    class_kind,
                    flags,
                    tables::field_flags_excluded_by_class_kind(class_kind),
                    tables::field_flags_required_by_class_kind(class_kind),
                );
            }
        }
    }

    fn check_methods(&mut self) {
        let class_file = self.class_file;
        for (position, method) in class_file.methods.iter().enumerate() {
            let location = Location::Method(position);
            let name = self
                .require(
                    location,
                    ReferenceRole::Name,
                    method.name_index,
                    ConstantKind::Utf8,
                )
                .and_then(|_| class_file.constant_pool.get_str(method.name_index).ok())
                .and_then(|name| name.as_str());
            self.require(
                location,
                ReferenceRole::Descriptor,
                method.descriptor_index,
                ConstantKind::Utf8,
            );

            let flags = method.access_flags;
            self.check_flag_windows(location, flags, tables::METHOD_FLAG_WINDOWS);
            self.check_mutual_exclusion(
                location,
                flags,
                tables::method_mutually_exclusive(self.version),
            );
            if !name.is_some_and(tables::is_exempt_from_class_kind) {
                for class_kind in self.class_kinds() {
                    self.check_class_kind(
                        location,
                        class_kind,
                        flags,
                        tables::method_flags_excluded_by_class_kind(class_kind),
                        tables::method_flags_required_by_class_kind(class_kind, self.version),
                    );
                }
            }
            let Some(name) = name else {
                continue;
            };
            let missing = tables::method_flags_required_by_name(name, self.version)
                .difference(flags);
            if !missing.is_empty() {
                self.report(
                    location,
                    AccessFlagRule::RequiredByName {
                        name: name.to_owned(),
                        missing: missing.into(),
                    },
                );
            }
            let present = flags & tables::method_flags_permitted_by_name(name).complement();
            if !present.is_empty() {
                self.report(
                    location,
                    AccessFlagRule::NotPermittedByName {
                        name: name.to_owned(),
                        present: present.into(),
                    },
                );
            }
        }
    }

    /// The class kinds of the class being validated.
    fn class_kinds(&self) -> impl Iterator<Item = ClassAccessFlags> + use<> {
        let flags = self.class_file.access_flags;
        tables::CLASS_KINDS
            .into_iter()
            .filter(move |&it| flags.contains(it))
    }

    fn check_flag_windows<F>(&mut self, location: Location, flags: F, windows: &[(F, FlagWindow)])
    where
        F: Flags + Copy + Into<AccessFlagSet>,
    {
        for &(flag, window) in windows {
            if !flags.contains(flag) {
                continue;
            }
            if self.version < window.added {
                self.report(
                    location,
                    VersionConstraint::FlagNotYetIntroduced {
                        flag: flag.into(),
                        since: window.added,
                    },
                );
            } else if let Some(removed) = window.removed.filter(|&it| self.version >= it) {
                self.report(
                    location,
                    VersionConstraint::FlagRemoved {
                        flag: flag.into(),
                        removed,
                    },
                );
            }
        }
    }

    fn check_mutual_exclusion<F>(
        &mut self,
        location: Location,
        flags: F,
        exclusive_sets: impl IntoIterator<Item = F>,
    ) where
        F: Flags<Bits = u16> + Copy + Into<AccessFlagSet>,
    {
        for exclusive in exclusive_sets {
            let present = flags.intersection(exclusive);
            if present.bits().count_ones() > 1 {
                self.report(
                    location,
                    AccessFlagRule::MutuallyExclusive {
                        present: present.into(),
                    },
                );
            }
        }
    }

    fn check_class_kind<F>(
        &mut self,
        location: Location,
        class_kind: ClassAccessFlags,
        flags: F,
        excluded: F,
        required: &[F],
    ) where
        F: Flags + Copy + Into<AccessFlagSet>,
    {
        let present = flags.intersection(excluded);
        if !present.is_empty() {
            self.report(
                location,
                AccessFlagRule::ExcludedByClassKind {
                    class_kind,
                    present: present.into(),
                },
            );
        }
        if !required.is_empty() && !required.iter().any(|&it| flags.contains(it)) {
            self.report(
                location,
                AccessFlagRule::RequiredByClassKind {
                    class_kind,
                    alternatives: FlagAlternatives(
                        required.iter().map(|&it| it.into()).collect(),
                    ),
                },
            );
        }
    }
}
