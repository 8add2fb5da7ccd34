//! Exact-width, big-endian encoding of the primitive values stored in a class file.
//!
//! Every operation requires the buffer to be exactly as long as the value it holds.
//! A shorter or longer buffer is rejected with a [`SizeMismatch`] instead of being
//! truncated or padded.

use std::mem::size_of;

use trait_gen::trait_gen;

/// A value with a fixed big-endian representation.
pub trait FixedWidth: Sized + Copy {
    /// The number of bytes of the encoded value.
    const WIDTH: usize;

    /// Decodes a value from `buf`.
    /// # Errors
    /// - [`SizeMismatch`] if `buf.len()` is not [`Self::WIDTH`].
    fn extract(buf: &[u8]) -> Result<Self, SizeMismatch>;

    /// Encodes the value into `buf` in place.
    /// # Errors
    /// - [`SizeMismatch`] if `buf.len()` is not [`Self::WIDTH`]. `buf` is left untouched.
    fn deposit(self, buf: &mut [u8]) -> Result<(), SizeMismatch>;
}

/// The buffer passed to [`FixedWidth::extract`] or [`FixedWidth::deposit`] has the wrong length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SizeMismatch {
    /// The buffer is shorter than the value.
    #[error("Buffer too small: expected {expected} bytes, got {actual}")]
    TooSmall {
        /// The width of the value.
        expected: usize,
        /// The length of the buffer.
        actual: usize,
    },
    /// The buffer is longer than the value.
    #[error("Buffer too large: expected {expected} bytes, got {actual}")]
    TooLarge {
        /// The width of the value.
        expected: usize,
        /// The length of the buffer.
        actual: usize,
    },
}

impl SizeMismatch {
    /// Checks that a buffer of `actual` bytes can hold exactly `expected` bytes.
    /// # Errors
    /// - [`SizeMismatch`] if the lengths differ.
    pub const fn check(expected: usize, actual: usize) -> Result<(), Self> {
        if actual < expected {
            Err(Self::TooSmall { expected, actual })
        } else if actual > expected {
            Err(Self::TooLarge { expected, actual })
        } else {
            Ok(())
        }
    }
}

#[trait_gen(T -> u8, i8, u16, i16, u32, i32, u64, i64)]
impl FixedWidth for T {
    const WIDTH: usize = size_of::<T>();

    fn extract(buf: &[u8]) -> Result<Self, SizeMismatch> {
        SizeMismatch::check(Self::WIDTH, buf.len())?;
        let mut bytes = [0u8; size_of::<T>()];
        bytes.copy_from_slice(buf);
        Ok(Self::from_be_bytes(bytes))
    }

    fn deposit(self, buf: &mut [u8]) -> Result<(), SizeMismatch> {
        SizeMismatch::check(Self::WIDTH, buf.len())?;
        buf.copy_from_slice(&self.to_be_bytes());
        Ok(())
    }
}

impl FixedWidth for f32 {
    const WIDTH: usize = u32::WIDTH;

    fn extract(buf: &[u8]) -> Result<Self, SizeMismatch> {
        u32::extract(buf).map(Self::from_bits)
    }

    fn deposit(self, buf: &mut [u8]) -> Result<(), SizeMismatch> {
        self.to_bits().deposit(buf)
    }
}

impl FixedWidth for f64 {
    const WIDTH: usize = u64::WIDTH;

    fn extract(buf: &[u8]) -> Result<Self, SizeMismatch> {
        u64::extract(buf).map(Self::from_bits)
    }

    fn deposit(self, buf: &mut [u8]) -> Result<(), SizeMismatch> {
        self.to_bits().deposit(buf)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn round_trip<T: FixedWidth + PartialEq + std::fmt::Debug>(value: T) {
        let mut buf = vec![0u8; T::WIDTH];
        value.deposit(&mut buf).unwrap();
        assert_eq!(T::extract(&buf).unwrap(), value);
    }

    proptest! {
        #[test]
        fn round_trip_u8(value in any::<u8>()) { round_trip(value); }

        #[test]
        fn round_trip_i8(value in any::<i8>()) { round_trip(value); }

        #[test]
        fn round_trip_u16(value in any::<u16>()) { round_trip(value); }

        #[test]
        fn round_trip_i16(value in any::<i16>()) { round_trip(value); }

        #[test]
        fn round_trip_u32(value in any::<u32>()) { round_trip(value); }

        #[test]
        fn round_trip_i32(value in any::<i32>()) { round_trip(value); }

        #[test]
        fn round_trip_u64(value in any::<u64>()) { round_trip(value); }

        #[test]
        fn round_trip_i64(value in any::<i64>()) { round_trip(value); }

        #[test]
        fn float_bits_survive(bits in any::<u32>()) {
            let mut buf = [0u8; 4];
            f32::from_bits(bits).deposit(&mut buf).unwrap();
            assert_eq!(f32::extract(&buf).unwrap().to_bits(), bits);
        }

        #[test]
        fn double_bits_survive(bits in any::<u64>()) {
            let mut buf = [0u8; 8];
            f64::from_bits(bits).deposit(&mut buf).unwrap();
            assert_eq!(f64::extract(&buf).unwrap().to_bits(), bits);
        }

        #[test]
        fn extract_rejects_wrong_length(len in 0usize..16) {
            prop_assume!(len != 4);
            let buf = vec![0u8; len];
            assert!(u32::extract(&buf).is_err());
        }
    }

    #[test]
    fn extremes() {
        round_trip(0u8);
        round_trip(u8::MAX);
        round_trip(i8::MIN);
        round_trip(i8::MAX);
        round_trip(u16::MAX);
        round_trip(i16::MIN);
        round_trip(u32::MAX);
        round_trip(i32::MIN);
        round_trip(i32::MAX);
        round_trip(u64::MAX);
        round_trip(i64::MIN);
        round_trip(i64::MAX);
        round_trip(f32::INFINITY);
        round_trip(f32::NEG_INFINITY);
        round_trip(f64::INFINITY);
        round_trip(f64::MIN_POSITIVE);
    }

    #[test]
    fn nan_bit_patterns() {
        let mut buf = [0u8; 4];
        f32::NAN.deposit(&mut buf).unwrap();
        assert!(f32::extract(&buf).unwrap().is_nan());
        let mut buf = [0u8; 8];
        f64::NAN.deposit(&mut buf).unwrap();
        assert_eq!(f64::extract(&buf).unwrap().to_bits(), f64::NAN.to_bits());
    }

    #[test]
    fn big_endian() {
        let mut buf = [0u8; 4];
        0x0102_0304u32.deposit(&mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(i16::extract(&[0xFF, 0xFE]).unwrap(), -2);
    }

    #[test]
    fn extract_too_small() {
        assert_eq!(
            u16::extract(&[0x01]),
            Err(SizeMismatch::TooSmall {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            f64::extract(&[0u8; 7]),
            Err(SizeMismatch::TooSmall { .. })
        ));
    }

    #[test]
    fn extract_too_large() {
        assert_eq!(
            u16::extract(&[0x01, 0x02, 0x03]),
            Err(SizeMismatch::TooLarge {
                expected: 2,
                actual: 3
            })
        );
        assert!(matches!(
            u8::extract(&[0u8; 2]),
            Err(SizeMismatch::TooLarge { .. })
        ));
    }

    #[test]
    fn deposit_size_mismatch_leaves_buffer_untouched() {
        let mut small = [0xAAu8; 3];
        assert_eq!(
            0x0102_0304i32.deposit(&mut small),
            Err(SizeMismatch::TooSmall {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(small, [0xAA; 3]);

        let mut large = [0xAAu8; 9];
        assert_eq!(
            1.0f64.deposit(&mut large),
            Err(SizeMismatch::TooLarge {
                expected: 8,
                actual: 9
            })
        );
        assert_eq!(large, [0xAA; 9]);
    }
}
