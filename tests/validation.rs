use beanpool::{
    jvm::{
        ClassAccessFlags, ClassFile, ClassVersion, Constant, ConstantKind, ConstantPool,
        Method, MethodAccessFlags, ReferenceKind,
        constant_pool::ConstantPoolIndex,
    },
    validation::{
        AccessFlagRule, Location, ReferenceKindRule, ViolationKind, tables::permitted_referents,
        validate,
    },
};
use proptest::prelude::*;

struct ClassBuilder {
    version: ClassVersion,
    access_flags: ClassAccessFlags,
    constant_pool: ConstantPool,
    methods: Vec<Method>,
}

impl ClassBuilder {
    fn new(version: ClassVersion) -> Self {
        Self {
            version,
            access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
            constant_pool: ConstantPool::new(),
            methods: Vec::new(),
        }
    }

    fn utf8(&mut self, value: &str) -> ConstantPoolIndex {
        self.constant_pool
            .find_or_insert(Constant::Utf8(value.into()))
            .unwrap()
    }

    fn class(&mut self, name: &str) -> ConstantPoolIndex {
        let name_index = self.utf8(name);
        self.constant_pool
            .find_or_insert(Constant::Class { name_index })
            .unwrap()
    }

    fn method(mut self, access_flags: MethodAccessFlags, name: &str) -> Self {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8("()V");
        self.methods.push(Method {
            access_flags,
            name_index,
            descriptor_index,
            attributes: Vec::new(),
        });
        self
    }

    fn build(mut self) -> ClassFile {
        let this_class = self.class("Sample");
        let super_class = self.class(ClassFile::JAVA_LANG_OBJECT);
        ClassFile {
            version: self.version,
            constant_pool: self.constant_pool,
            access_flags: self.access_flags,
            this_class,
            super_class,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: self.methods,
            attributes: Vec::new(),
        }
    }
}

fn method_rules(class_file: &ClassFile, index: usize) -> Vec<AccessFlagRule> {
    validate(class_file)
        .into_iter()
        .filter(|it| it.location == Location::Method(index))
        .filter_map(|it| match it.kind {
            ViolationKind::AccessFlagConstraint(rule) => Some(rule),
            _ => None,
        })
        .collect()
}

fn arb_version() -> impl Strategy<Value = ClassVersion> {
    (45u16..=70).prop_map(|major| ClassVersion::new(major, 0))
}

proptest! {
    #[test]
    fn private_and_protected_are_exclusive(
        version in arb_version(),
        is_interface in any::<bool>(),
    ) {
        let mut builder = ClassBuilder::new(version)
            .method(MethodAccessFlags::PRIVATE | MethodAccessFlags::PROTECTED, "run");
        if is_interface {
            builder.access_flags = ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT;
        }
        let rules = method_rules(&builder.build(), 0);
        prop_assert!(rules.iter().any(|it| matches!(
            it,
            AccessFlagRule::MutuallyExclusive { .. }
        )), "expected a MutuallyExclusive rule");
    }

    #[test]
    fn validation_is_deterministic(version in arb_version()) {
        let class_file = ClassBuilder::new(version)
            .method(MethodAccessFlags::ABSTRACT | MethodAccessFlags::FINAL, "run")
            .method(MethodAccessFlags::empty(), Method::CLASS_INITIALIZER_NAME)
            .build();
        prop_assert_eq!(validate(&class_file), validate(&class_file));
    }
}

#[test]
fn class_initializer_must_be_static_since_51() {
    let class_file = ClassBuilder::new(ClassVersion::JDK_7)
        .method(MethodAccessFlags::empty(), Method::CLASS_INITIALIZER_NAME)
        .build();
    let rules = method_rules(&class_file, 0);
    assert!(rules.iter().any(|it| matches!(
        it,
        AccessFlagRule::RequiredByName { name, .. } if name == Method::CLASS_INITIALIZER_NAME
    )));
}

#[test]
fn class_initializer_may_be_non_static_before_51() {
    let class_file = ClassBuilder::new(ClassVersion::JDK_6)
        .method(MethodAccessFlags::empty(), Method::CLASS_INITIALIZER_NAME)
        .build();
    let rules = method_rules(&class_file, 0);
    assert!(
        !rules
            .iter()
            .any(|it| matches!(it, AccessFlagRule::RequiredByName { .. }))
    );
}

#[test]
fn well_formed_class_is_valid() {
    let class_file = ClassBuilder::new(ClassVersion::JDK_21)
        .method(MethodAccessFlags::PUBLIC, Method::CONSTRUCTOR_NAME)
        .method(MethodAccessFlags::STATIC, Method::CLASS_INITIALIZER_NAME)
        .method(MethodAccessFlags::PUBLIC | MethodAccessFlags::FINAL, "run")
        .build();
    assert_eq!(validate(&class_file), Vec::new());
}

#[test]
fn referents_widen_at_52() {
    assert_eq!(
        permitted_referents(ReferenceKind::InvokeStatic, ClassVersion::JDK_7),
        [ConstantKind::MethodRef]
    );
    assert_eq!(
        permitted_referents(ReferenceKind::InvokeStatic, ClassVersion::JDK_8),
        [ConstantKind::MethodRef, ConstantKind::InterfaceMethodRef]
    );
    assert_eq!(
        permitted_referents(ReferenceKind::GetField, ClassVersion::JDK_8),
        [ConstantKind::FieldRef]
    );
}

#[test]
fn interface_method_handle_before_52() {
    let mut builder = ClassBuilder::new(ClassVersion::JDK_7);
    let class_index = builder.class("Sample");
    let name_index = builder.utf8("run");
    let descriptor_index = builder.utf8("()V");
    let name_and_type_index = builder
        .constant_pool
        .insert(Constant::NameAndType {
            name_index,
            descriptor_index,
        })
        .unwrap();
    let reference_index = builder
        .constant_pool
        .insert(Constant::InterfaceMethodRef {
            class_index,
            name_and_type_index,
        })
        .unwrap();
    let handle_index = builder
        .constant_pool
        .insert(Constant::MethodHandle {
            reference_kind: ReferenceKind::InvokeStatic,
            reference_index,
        })
        .unwrap();

    let violations = validate(&builder.build());
    let [violation] = violations.as_slice() else {
        panic!("Expected a single violation, got {violations:?}");
    };
    assert_eq!(violation.location, Location::ConstantPool(handle_index));
    assert_eq!(
        violation.kind,
        ViolationKind::ReferenceKindRestriction(ReferenceKindRule::ReferentKind {
            reference_kind: ReferenceKind::InvokeStatic,
            found: ConstantKind::InterfaceMethodRef,
        })
    );
}
