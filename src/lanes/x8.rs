//! 8-wide lane codecs (one 256-bit register of f32).
//!
//! All functions take and return plain arrays at the boundary and work on
//! `wide::i32x8` internally. Results are bit-identical to the scalar codecs
//! in [`crate::f16`] and [`crate::bf16`]; every special case is selected with
//! a lane mask instead of a branch.

use bytemuck::cast;
use wide::{CmpEq, CmpGt, CmpLt, f32x8, i32x8};

use crate::f16::{NORMAL_EXP, OVERFLOW_EXP, REBIAS, ROUND_BIAS, ZERO_EXP};
use crate::{Bf16, F16};

/// 2⁻²⁴, the float16 subnormal unit.
const F16_SUBNORMAL_UNIT: f32 = f32::from_bits(0x3380_0000);
const F32_EXP_MASK: i32 = 0x7F80_0000;

#[inline(always)]
fn widen(bits: [u16; 8]) -> i32x8 {
    i32x8::from(bits.map(i32::from))
}

#[inline(always)]
fn narrow(v: i32x8) -> [u16; 8] {
    let arr: [i32; 8] = v.into();
    arr.map(|x| x as u16)
}

// ============================================================================
// float16
// ============================================================================

/// Decode 8 float16 values.
#[inline]
pub fn decode_f16(src: &[F16; 8]) -> [f32; 8] {
    let h = widen(cast(*src));
    let zero = i32x8::splat(0);
    let sign = (h & i32x8::splat(0x8000)) << 16;
    let exp = h & i32x8::splat(0x7C00);
    let mant = h & i32x8::splat(0x03FF);

    let normal = ((h & i32x8::splat(0x7FFF)) << 13) + i32x8::splat((REBIAS << 23) as i32);

    // Infinity keeps a zero mantissa, NaN gets the quiet bit
    let quiet = mant.simd_eq(zero).blend(zero, i32x8::splat(0x0040_0000));
    let special = i32x8::splat(F32_EXP_MASK) | (mant << 13) | quiet;

    // mant * 2^-24 is exact, and covers zero as well
    let subnormal: i32x8 = cast(f32x8::from_i32x8(mant) * f32x8::splat(F16_SUBNORMAL_UNIT));

    let magnitude = exp.simd_eq(zero).blend(subnormal, normal);
    let magnitude = exp.simd_eq(i32x8::splat(0x7C00)).blend(special, magnitude);

    let out: f32x8 = cast(magnitude | sign);
    out.into()
}

/// Encode 8 f32 values as float16.
#[inline]
pub fn encode_f16(src: &[f32; 8]) -> [F16; 8] {
    let bits: i32x8 = cast(f32x8::from(*src));
    let zero = i32x8::splat(0);
    let exp_mask = i32x8::splat(F32_EXP_MASK);
    let infinity = i32x8::splat(0x7C00);

    let sign = (bits >> 16) & i32x8::splat(0x8000);
    let abs = bits & i32x8::splat(0x7FFF_FFFF);
    let is_nan = abs.simd_gt(exp_mask);
    let is_inf = abs.simd_eq(exp_mask);
    // NaN lanes are replaced below; zero them so the bias add cannot wrap
    let finite = is_nan.blend(zero, abs);
    let exp: i32x8 = finite >> 23;

    let rounded = finite + i32x8::splat(ROUND_BIAS as i32);
    let normal = (rounded >> 13) - i32x8::splat((REBIAS << 10) as i32);
    let rounded_exp: i32x8 = rounded >> 23;
    let overflow = rounded_exp.simd_gt(i32x8::splat(OVERFLOW_EXP as i32 - 1));

    // Subnormal: (m >> s) + ((m >> (s - 1)) & 1), s = 126 - exp, as exact power-of-two scaling
    let sub_exp = exp
        .max(i32x8::splat(ZERO_EXP as i32 + 1))
        .min(i32x8::splat(NORMAL_EXP as i32 - 1));
    let mant = f32x8::from_i32x8((finite & i32x8::splat(0x007F_FFFF)) | i32x8::splat(0x0080_0000));
    let scale: f32x8 = cast((sub_exp + i32x8::splat(1)) << 23);
    let half_scale: f32x8 = cast((sub_exp + i32x8::splat(2)) << 23);
    let subnormal =
        (mant * scale).trunc_int() + ((mant * half_scale).trunc_int() & i32x8::splat(1));

    let nan = infinity | i32x8::splat(0x0200) | ((abs >> 13) & i32x8::splat(0x03FF));

    let mut out = overflow.blend(infinity, normal);
    out = exp.simd_lt(i32x8::splat(NORMAL_EXP as i32)).blend(subnormal, out);
    out = exp.simd_lt(i32x8::splat(ZERO_EXP as i32 + 1)).blend(zero, out);
    out = is_inf.blend(infinity, out);
    out = is_nan.blend(nan, out);

    cast(narrow(out | sign))
}

// ============================================================================
// bfloat16
// ============================================================================

/// Decode 8 bfloat16 values.
#[inline]
pub fn decode_bf16(src: &[Bf16; 8]) -> [f32; 8] {
    let out: f32x8 = cast(widen(cast(*src)) << 16);
    out.into()
}

/// Encode 8 f32 values as bfloat16 with bias rounding.
#[inline]
pub fn encode_bf16(src: &[f32; 8]) -> [Bf16; 8] {
    let bits: i32x8 = cast(f32x8::from(*src));
    let is_nan = (bits & i32x8::splat(0x7FFF_FFFF)).simd_gt(i32x8::splat(F32_EXP_MASK));
    let finite = is_nan.blend(i32x8::splat(0), bits);

    let rounded = (finite + i32x8::splat(crate::bf16::ROUND_BIAS as i32)) >> 16;
    let nan = (bits >> 16) | i32x8::splat(0x0040);

    cast(narrow(is_nan.blend(nan, rounded)))
}
