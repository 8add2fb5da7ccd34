//! Class file versions.

use crate::macros::see_jvm_spec;

/// The maximum supported major version of a class file.
pub const MAX_MAJOR_VERSION: u16 = 70;

/// The minor version of a class file compiled with `--enable-preview`.
pub const PREVIEW_MINOR: u16 = 0xFFFF;

/// The version of a class file.
///
/// Versions are ordered by `major`, then by `minor`. Since [`PREVIEW_MINOR`] is the
/// largest minor version, a preview class sorts after every release class of the same
/// major version and compares like "any minor" against thresholds with a zero minor.
#[doc = see_jvm_spec!(4, 1)]
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
)]
#[display("{major}.{minor}")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct ClassVersion {
    /// The major version number.
    pub major: u16,
    /// The minor version number.
    pub minor: u16,
}

impl ClassVersion {
    /// The beginning of time. Used as a threshold for things that have always been allowed.
    pub const ORIGIN: Self = Self::new(0, 0);
    /// JDK 1.1
    pub const JDK_1_1: Self = Self::new(45, 3);
    /// JDK 1.2
    pub const JDK_1_2: Self = Self::new(46, 0);
    /// JDK 1.3
    pub const JDK_1_3: Self = Self::new(47, 0);
    /// JDK 1.4
    pub const JDK_1_4: Self = Self::new(48, 0);
    /// JDK 5
    pub const JDK_5: Self = Self::new(49, 0);
    /// JDK 6
    pub const JDK_6: Self = Self::new(50, 0);
    /// JDK 7
    pub const JDK_7: Self = Self::new(51, 0);
    /// JDK 8
    pub const JDK_8: Self = Self::new(52, 0);
    /// JDK 9
    pub const JDK_9: Self = Self::new(53, 0);
    /// JDK 10
    pub const JDK_10: Self = Self::new(54, 0);
    /// JDK 11
    pub const JDK_11: Self = Self::new(55, 0);
    /// JDK 12
    pub const JDK_12: Self = Self::new(56, 0);
    /// JDK 13
    pub const JDK_13: Self = Self::new(57, 0);
    /// JDK 14
    pub const JDK_14: Self = Self::new(58, 0);
    /// JDK 15
    pub const JDK_15: Self = Self::new(59, 0);
    /// JDK 16
    pub const JDK_16: Self = Self::new(60, 0);
    /// JDK 17
    pub const JDK_17: Self = Self::new(61, 0);
    /// JDK 18
    pub const JDK_18: Self = Self::new(62, 0);
    /// JDK 19
    pub const JDK_19: Self = Self::new(63, 0);
    /// JDK 20
    pub const JDK_20: Self = Self::new(64, 0);
    /// JDK 21
    pub const JDK_21: Self = Self::new(65, 0);
    /// JDK 22
    pub const JDK_22: Self = Self::new(66, 0);
    /// JDK 23
    pub const JDK_23: Self = Self::new(67, 0);
    /// JDK 24
    pub const JDK_24: Self = Self::new(68, 0);
    /// JDK 25
    pub const JDK_25: Self = Self::new(69, 0);
    /// JDK 26
    pub const JDK_26: Self = Self::new(70, 0);

    /// Creates a new class version.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Returns `true` if this class file is compiled with `--enable-preview`.
    #[must_use]
    pub const fn is_preview(&self) -> bool {
        self.major >= 56 && self.minor == PREVIEW_MINOR
    }

    /// Checks whether a JVM may load a class file of this version.
    /// - `45.x` accepts any minor version.
    /// - `46.0` to `55.0` require a zero minor version.
    /// - From `56` on, the minor version is either `0` or [`PREVIEW_MINOR`].
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        match (self.major, self.minor) {
            (45, _) => true,
            (46..=55, 0) => true,
            (56..=MAX_MAJOR_VERSION, 0 | PREVIEW_MINOR) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {

        #[test]
        fn jdk_1_1(minor in any::<u16>()) {
            assert!(ClassVersion::new(45, minor).is_supported());
        }

        #[test]
        fn jdk_1_x(major in 46u16..56) {
            let version = ClassVersion::new(major, 0);
            assert!(version.is_supported());
            assert!(!version.is_preview());
        }

        #[test]
        fn jdk_1_x_invalid(major in 46u16..56, minor in 1u16..) {
            assert!(!ClassVersion::new(major, minor).is_supported());
        }

        #[test]
        fn newer_class_versions(
            major in 56..=MAX_MAJOR_VERSION,
            minor in prop_oneof![Just(0u16), Just(PREVIEW_MINOR)]
        ) {
            let version = ClassVersion::new(major, minor);
            assert!(version.is_supported());
            assert_eq!(version.is_preview(), minor == PREVIEW_MINOR);
        }

        #[test]
        fn too_low_class_version(major in 0u16..45, minor in any::<u16>()) {
            assert!(!ClassVersion::new(major, minor).is_supported());
        }

        #[test]
        fn too_high_class_version(major in (MAX_MAJOR_VERSION + 1)..=u16::MAX) {
            assert!(!ClassVersion::new(major, 0).is_supported());
        }

        #[test]
        fn invalid_minor_for_modern_major(
            major in 56..=MAX_MAJOR_VERSION,
            minor in 1..PREVIEW_MINOR,
        ) {
            assert!(!ClassVersion::new(major, minor).is_supported());
        }

        #[test]
        fn ordered_by_major_first(lhs in any::<ClassVersion>(), rhs in any::<ClassVersion>()) {
            prop_assume!(lhs.major != rhs.major);
            assert_eq!(lhs < rhs, lhs.major < rhs.major);
        }

        #[test]
        fn origin_is_the_bottom(version in any::<ClassVersion>()) {
            assert!(version >= ClassVersion::ORIGIN);
        }
    }

    #[test]
    fn minor_breaks_ties() {
        assert!(ClassVersion::new(45, 3) > ClassVersion::new(45, 0));
        assert!(ClassVersion::new(52, PREVIEW_MINOR) > ClassVersion::JDK_8);
        assert!(ClassVersion::new(51, PREVIEW_MINOR) < ClassVersion::JDK_8);
    }

    #[test]
    fn display() {
        assert_eq!(ClassVersion::JDK_1_1.to_string(), "45.3");
        assert_eq!(ClassVersion::JDK_21.to_string(), "65.0");
    }
}
