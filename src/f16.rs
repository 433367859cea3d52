//! IEEE 754 binary16 ("float16") storage type and its bit-exact software codec.
//!
//! Layout: 1 sign bit, 5 exponent bits (bias 15), 10 mantissa bits.
//!
//! ```text
//! f32: SEEEEEEE EMMMMMMM MMMMMMMM MMMMMMMM
//! f16:          SEEEEEMM MMMMMMMM
//! ```
//!
//! Encoding rounds by adding a fixed bias (`0x1000`) to the binary32 pattern
//! before truncation, which rounds ties away from zero in magnitude. Every
//! special case (NaN, Infinity, subnormal, overflow, underflow) is resolved
//! explicitly and always gives a defined bit pattern.

use core::fmt;

use bytemuck::{Pod, Zeroable};

const SIGN_MASK: u16 = 0x8000;
const EXP_MASK: u16 = 0x7C00;
const MANT_MASK: u16 = 0x03FF;
const QUIET_BIT: u16 = 0x0200;

/// Rounding bias added to the f32 pattern (half of the 13 dropped bits).
pub(crate) const ROUND_BIAS: u32 = 0x1000;
/// f32 biased exponent at and below which the result flushes to signed zero.
pub(crate) const ZERO_EXP: u32 = 101;
/// Smallest f32 biased exponent that encodes as a normal f16.
pub(crate) const NORMAL_EXP: u32 = 113;
/// Smallest rounded f32 biased exponent that overflows to Infinity.
pub(crate) const OVERFLOW_EXP: u32 = 143;
/// Exponent rebias between the two formats (127 - 15).
pub(crate) const REBIAS: u32 = 112;

/// A 16-bit IEEE 754 half-precision float, stored as raw bits.
///
/// Equality and hashing are bitwise: two NaNs with the same payload compare
/// equal and `+0.0 != -0.0`. Compare numerically through [`F16::to_f32`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct F16(u16);

impl F16 {
    /// `+0.0`
    pub const ZERO: Self = Self(0x0000);
    /// `-0.0`
    pub const NEG_ZERO: Self = Self(0x8000);
    /// `1.0`
    pub const ONE: Self = Self(0x3C00);
    /// `-1.0`
    pub const NEG_ONE: Self = Self(0xBC00);
    /// Smallest positive normal value, 2⁻¹⁴.
    pub const MIN_POSITIVE: Self = Self(0x0400);
    /// Smallest positive subnormal value, 2⁻²⁴.
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x0001);
    /// Largest finite value, 65504.
    pub const MAX: Self = Self(0x7BFF);
    /// Most negative finite value, -65504.
    pub const MIN: Self = Self(0xFBFF);
    /// Difference between 1.0 and the next representable value, 2⁻¹⁰.
    pub const EPSILON: Self = Self(0x1400);
    /// Positive Infinity.
    pub const INFINITY: Self = Self(0x7C00);
    /// Negative Infinity.
    pub const NEG_INFINITY: Self = Self(0xFC00);
    /// Canonical quiet NaN.
    pub const NAN: Self = Self(0x7E00);
    /// A signaling NaN (quiet bit clear, nonzero payload).
    pub const SIGNALING_NAN: Self = Self(0x7D00);

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
        Self(f32_to_f16_bits(value))
    }

    /// Encode an f64 by way of f32.
    ///
    /// The intermediate f32 rounding can, in rare tie cases, differ from a
    /// direct single-rounding conversion.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self::from_f32(value as f32)
    }

    /// Decode to f32. Exact for every non-NaN pattern.
    #[inline]
    pub const fn to_f32(self) -> f32 {
        f16_bits_to_f32(self.0)
    }

    /// Decode to f64. Exact for every non-NaN pattern.
    #[inline]
    pub const fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }

    /// `true` for every NaN pattern, quiet or signaling.
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

    /// `true` if the sign bit is set (including `-0.0` and negative NaNs).
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

/// Convert an f32 to float16 bits.
#[inline]
pub const fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) as u16) & SIGN_MASK;
    let abs = bits & 0x7FFF_FFFF;

    if abs > 0x7F80_0000 {
        // NaN: keep the top payload bits, force quiet so it cannot collapse to Infinity.
        return sign | EXP_MASK | QUIET_BIT | ((abs >> 13) as u16 & MANT_MASK);
    }
    if abs == 0x7F80_0000 {
        return sign | EXP_MASK;
    }

    let exp = abs >> 23;
    if exp <= ZERO_EXP {
        return sign;
    }
    if exp < NORMAL_EXP {
        let mant = (abs & 0x007F_FFFF) | 0x0080_0000;
        let shift = 126 - exp;
        let half = (mant >> (shift - 1)) & 1;
        return sign | ((mant >> shift) + half) as u16;
    }

    let rounded = abs + ROUND_BIAS;
    if rounded >> 23 >= OVERFLOW_EXP {
        return sign | EXP_MASK;
    }
    sign | ((rounded >> 13) - (REBIAS << 10)) as u16
}

/// Convert float16 bits to an f32.
///
/// NaN payloads are kept with the quiet bit forced, which matches what F16C
/// hardware produces.
#[inline]
pub const fn f16_bits_to_f32(bits: u16) -> f32 {
    let sign = ((bits & SIGN_MASK) as u32) << 16;
    let exp = bits & EXP_MASK;
    let mant = bits & MANT_MASK;

    let magnitude = if exp == EXP_MASK {
        if mant == 0 {
            0x7F80_0000
        } else {
            0x7FC0_0000 | ((mant as u32) << 13)
        }
    } else if exp == 0 {
        if mant == 0 {
            0
        } else {
            // Highest set bit becomes the implicit bit.
            let top = 15 - mant.leading_zeros();
            let exp32 = top + (127 - 24);
            let frac = ((mant as u32) << (23 - top)) & 0x007F_FFFF;
            (exp32 << 23) | frac
        }
    } else {
        (((bits & !SIGN_MASK) as u32) << 13) + (REBIAS << 23)
    };

    f32::from_bits(sign | magnitude)
}

impl From<f32> for F16 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<F16> for f32 {
    #[inline]
    fn from(value: F16) -> Self {
        value.to_f32()
    }
}

impl From<F16> for f64 {
    #[inline]
    fn from(value: F16) -> Self {
        value.to_f64()
    }
}

impl fmt::Debug for F16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}f16", self.to_f32())
    }
}

impl fmt::Display for F16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(F16::ZERO.to_f32(), 0.0);
        assert!(F16::NEG_ZERO.to_f32().is_sign_negative());
        assert_eq!(F16::ONE.to_f32(), 1.0);
        assert_eq!(F16::NEG_ONE.to_f32(), -1.0);
        assert_eq!(F16::MAX.to_f32(), 65504.0);
        assert_eq!(F16::MIN.to_f32(), -65504.0);
        assert_eq!(F16::MIN_POSITIVE.to_f32(), 2.0f32.powi(-14));
        assert_eq!(F16::MIN_POSITIVE_SUBNORMAL.to_f32(), 2.0f32.powi(-24));
        assert_eq!(F16::EPSILON.to_f32(), 2.0f32.powi(-10));
        assert_eq!(F16::INFINITY.to_f32(), f32::INFINITY);
        assert_eq!(F16::NEG_INFINITY.to_f32(), f32::NEG_INFINITY);
        assert!(F16::NAN.is_nan());
        assert!(F16::SIGNALING_NAN.is_nan());
        assert!(F16::NAN.to_f32().is_nan());
        assert!(F16::SIGNALING_NAN.to_f32().is_nan());
    }

    #[test]
    fn test_max_finite_roundtrip_and_saturation() {
        assert_eq!(F16::from_f32(65504.0), F16::MAX);
        assert_eq!(F16::from_f32(65504.0).to_f32(), 65504.0);
        assert_eq!(F16::from_f32(65519.0), F16::MAX);
        assert_eq!(F16::from_f32(65520.0), F16::INFINITY);
        assert_eq!(F16::from_f32(-65520.0), F16::NEG_INFINITY);
        assert_eq!(F16::from_f32(1.0e10), F16::INFINITY);
        assert_eq!(F16::from_f32(f32::MAX), F16::INFINITY);
        assert_eq!(F16::from_f32(f32::MIN), F16::NEG_INFINITY);
    }

    #[test]
    fn test_infinity_roundtrip() {
        assert_eq!(F16::from_f32(f32::INFINITY), F16::INFINITY);
        assert_eq!(F16::from_f32(f32::NEG_INFINITY), F16::NEG_INFINITY);
        assert_eq!(F16::INFINITY.to_f32(), f32::INFINITY);
        assert_eq!(F16::NEG_INFINITY.to_f32(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_nan_survives_encode() {
        let quiet = f32::NAN;
        let signaling = f32::from_bits(0x7F80_0001);
        let signaling_high = f32::from_bits(0x7FA0_0000);
        let negative = f32::from_bits(0xFFC0_0000);

        for x in [quiet, signaling, signaling_high, negative] {
            let h = F16::from_f32(x);
            assert!(h.is_nan(), "{:#010x} encoded to {:#06x}", x.to_bits(), h.to_bits());
            assert!(h.to_f32().is_nan());
        }
        assert!(F16::from_f32(negative).is_sign_negative());
    }

    #[test]
    fn test_signed_zero() {
        assert_eq!(F16::from_f32(0.0), F16::ZERO);
        assert_eq!(F16::from_f32(-0.0), F16::NEG_ZERO);
        // Below half the smallest subnormal flushes to zero
        assert_eq!(F16::from_f32(2.0f32.powi(-26)), F16::ZERO);
        assert_eq!(F16::from_f32(-(2.0f32.powi(-26))), F16::NEG_ZERO);
        assert_eq!(F16::from_f32(f32::MIN_POSITIVE), F16::ZERO);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        // 1 + 2^-11 sits exactly between 1.0 and 1.0 + 2^-10
        let tie = 1.0f32 + 2.0f32.powi(-11);
        assert_eq!(F16::from_f32(tie).to_bits(), 0x3C01);
        assert_eq!(F16::from_f32(-tie).to_bits(), 0xBC01);
        // Just below the tie rounds down
        let below = f32::from_bits(tie.to_bits() - 1);
        assert_eq!(F16::from_f32(below).to_bits(), 0x3C00);
    }

    #[test]
    fn test_exact_values_roundtrip() {
        for bits in 0..=u16::MAX {
            let h = F16::from_bits(bits);
            if h.is_nan() {
                continue;
            }
            let x = h.to_f32();
            assert_eq!(
                F16::from_f32(x).to_bits(),
                bits,
                "roundtrip failed for {:#06x} ({})",
                bits,
                x
            );
        }
    }

    #[test]
    fn test_all_nan_patterns_decode_to_nan() {
        for mant in 1..=0x3FFu16 {
            for sign in [0u16, 0x8000] {
                let h = F16::from_bits(sign | 0x7C00 | mant);
                assert!(h.is_nan());
                let x = h.to_f32();
                assert!(x.is_nan());
                assert_eq!(x.is_sign_negative(), sign != 0);
                assert!(F16::from_f32(x).is_nan());
            }
        }
    }

    #[test]
    fn test_decode_matches_half_crate() {
        for bits in 0..=u16::MAX {
            let ours = F16::from_bits(bits).to_f32();
            let reference = half::f16::from_bits(bits).to_f32();
            if reference.is_nan() {
                assert!(ours.is_nan(), "{:#06x} should decode to NaN", bits);
            } else {
                assert_eq!(ours.to_bits(), reference.to_bits(), "decode mismatch at {:#06x}", bits);
            }
        }
    }

    #[test]
    fn test_subnormal_range_encodes_within_one_ulp() {
        let lo = 2.0f32.powi(-24);
        let hi = 2.0f32.powi(-14);
        let ulp = lo;

        for k in 0..2000 {
            let x = lo * (1.0 + k as f32 * 0.511);
            assert!(x >= lo && x < hi);
            let h = F16::from_f32(x);
            assert!(h.to_bits() != 0, "{} flushed to zero", x);
            assert!(h.is_subnormal(), "{} encoded to {:#06x}", x, h.to_bits());
            let back = h.to_f32();
            assert!((back - x).abs() <= ulp, "{} -> {} exceeds one ulp", x, back);
        }
    }

    #[test]
    fn test_subnormal_carry_reaches_min_normal() {
        // Just under 2^-14 rounds up into the first normal binade
        let x = 2.0f32.powi(-14) * (1.0 - 2.0f32.powi(-12));
        assert_eq!(F16::from_f32(x), F16::MIN_POSITIVE);
    }

    #[test]
    fn test_classification() {
        assert!(F16::MAX.is_finite());
        assert!(!F16::INFINITY.is_finite());
        assert!(F16::INFINITY.is_infinite());
        assert!(!F16::NAN.is_infinite());
        assert!(F16::MIN_POSITIVE_SUBNORMAL.is_subnormal());
        assert!(!F16::MIN_POSITIVE.is_subnormal());
        assert!(F16::NEG_ZERO.is_sign_negative());
        assert_eq!(F16::NEG_ONE.abs(), F16::ONE);
        assert_eq!(F16::ONE.neg(), F16::NEG_ONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", F16::from_f32(1.5)), "1.5");
        assert_eq!(format!("{:?}", F16::ONE), "1.0f16");
    }
}
