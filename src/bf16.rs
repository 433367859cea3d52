//! bfloat16 storage type and its codec.
//!
//! bfloat16 is the upper half of an IEEE 754 binary32:
//!
//! ```text
//! f32:  SEEEEEEE EMMMMMMM MMMMMMMM MMMMMMMM
//! bf16: SEEEEEEE EMMMMMMM
//! ```
//!
//! Decoding zero-fills the low half and is exact. Encoding adds a rounding bias
//! of `0x8000` before dropping the low half (ties away from zero, the same
//! policy as [`F16`](crate::F16)). [`Bf16::from_f32_truncate`] keeps plain
//! truncation for data that must match truncating encoders bit-for-bit.

use core::fmt;

use bytemuck::{Pod, Zeroable};

const SIGN_MASK: u16 = 0x8000;
const EXP_MASK: u16 = 0x7F80;
const MANT_MASK: u16 = 0x007F;
const QUIET_BIT: u16 = 0x0040;

/// Rounding bias added to the f32 pattern (half of the 16 dropped bits).
pub(crate) const ROUND_BIAS: u32 = 0x8000;

/// A 16-bit brain float, stored as raw bits.
///
/// Equality and hashing are bitwise, as for [`F16`](crate::F16).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Bf16(u16);

impl Bf16 {
    /// `+0.0`
    pub const ZERO: Self = Self(0x0000);
    /// `-0.0`
    pub const NEG_ZERO: Self = Self(0x8000);
    /// `1.0`
    pub const ONE: Self = Self(0x3F80);
    /// `-1.0`
    pub const NEG_ONE: Self = Self(0xBF80);
    /// Smallest positive normal value, 2⁻¹²⁶.
    pub const MIN_POSITIVE: Self = Self(0x0080);
    /// Smallest positive subnormal value, 2⁻¹³³.
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x0001);
    /// Largest finite value, about 3.39e38.
    pub const MAX: Self = Self(0x7F7F);
    /// Most negative finite value.
    pub const MIN: Self = Self(0xFF7F);
    /// Difference between 1.0 and the next representable value, 2⁻⁷.
    pub const EPSILON: Self = Self(0x3C00);
    /// Positive Infinity.
    pub const INFINITY: Self = Self(0x7F80);
    /// Negative Infinity.
    pub const NEG_INFINITY: Self = Self(0xFF80);
    /// Canonical quiet NaN.
    pub const NAN: Self = Self(0x7FC0);
    /// A signaling NaN (quiet bit clear, nonzero payload).
    pub const SIGNALING_NAN: Self = Self(0x7FA0);

    /// Construct from raw bits.
    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[inline(always)]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Encode an f32, rounding ties away from zero.
    #[inline]
    pub const fn from_f32(value: f32) -> Self {
        Self(f32_to_bf16_bits(value))
    }

    /// Encode an f32 by dropping the low 16 bits (round toward zero).
    ///
    /// NaN stays NaN: a payload living only in the dropped bits gets the
    /// quiet bit.
    #[inline]
    pub const fn from_f32_truncate(value: f32) -> Self {
        let bits = value.to_bits();
        let high = (bits >> 16) as u16;
        if bits & 0x7FFF_FFFF > 0x7F80_0000 {
            return Self(high | QUIET_BIT);
        }
        Self(high)
    }

    /// Encode an f64 by way of f32.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self::from_f32(value as f32)
    }

    /// Decode to f32 (exact).
    #[inline(always)]
    pub const fn to_f32(self) -> f32 {
        bf16_bits_to_f32(self.0)
    }

    /// Decode to f64 (exact).
    #[inline]
    pub const fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }

    /// `true` for every NaN pattern.
    #[inline]
    pub const fn is_nan(self) -> bool {
        self.0 & EXP_MASK == EXP_MASK && self.0 & MANT_MASK != 0
    }

    /// `true` for ±Infinity.
    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0 & !SIGN_MASK == EXP_MASK
    }

    /// `true` unless the value is NaN or ±Infinity.
    #[inline]
    pub const fn is_finite(self) -> bool {
        self.0 & EXP_MASK != EXP_MASK
    }

    /// `true` for nonzero values with a zero exponent field.
    #[inline]
    pub const fn is_subnormal(self) -> bool {
        self.0 & EXP_MASK == 0 && self.0 & MANT_MASK != 0
    }

    /// `true` if the sign bit is set.
    #[inline]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & SIGN_MASK != 0
    }

    /// Absolute value by clearing the sign bit.
    #[inline(always)]
    pub const fn abs(self) -> Self {
        Self(self.0 & !SIGN_MASK)
    }

    /// Negation by flipping the sign bit.
    #[inline(always)]
    pub const fn neg(self) -> Self {
        Self(self.0 ^ SIGN_MASK)
    }
}

/// Convert an f32 to bfloat16 bits with bias rounding.
#[inline]
pub const fn f32_to_bf16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    if bits & 0x7FFF_FFFF > 0x7F80_0000 {
        return (bits >> 16) as u16 | QUIET_BIT;
    }
    // Non-NaN patterns are at most 0xFF80_0000, so the add cannot wrap.
    ((bits + ROUND_BIAS) >> 16) as u16
}

/// Convert bfloat16 bits to an f32.
#[inline(always)]
pub const fn bf16_bits_to_f32(bits: u16) -> f32 {
    f32::from_bits((bits as u32) << 16)
}

impl From<f32> for Bf16 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<Bf16> for f32 {
    #[inline]
    fn from(value: Bf16) -> Self {
        value.to_f32()
    }
}

impl From<Bf16> for f64 {
    #[inline]
    fn from(value: Bf16) -> Self {
        value.to_f64()
    }
}

impl fmt::Debug for Bf16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}bf16", self.to_f32())
    }
}

impl fmt::Display for Bf16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}
