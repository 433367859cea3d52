//! 16-wide lane codecs (one 512-bit register of f32).
//!
//! Each lane is handled as two 8-wide halves through [`super::x8`], so the
//! results are bit-identical to both the 8-wide and scalar codecs.

use super::x8;
use crate::{Bf16, F16};

/// Decode 16 float16 values.
#[inline]
pub fn decode_f16(src: &[F16; 16]) -> [f32; 16] {
    let mut out = [0.0f32; 16];
    for (dst, half) in out.as_chunks_mut::<8>().0.iter_mut().zip(src.as_chunks::<8>().0) {
        *dst = x8::decode_f16(half);
    }
    out
}

/// Encode 16 f32 values as float16.
#[inline]
pub fn encode_f16(src: &[f32; 16]) -> [F16; 16] {
    let mut out = [F16::ZERO; 16];
    for (dst, half) in out.as_chunks_mut::<8>().0.iter_mut().zip(src.as_chunks::<8>().0) {
        *dst = x8::encode_f16(half);
    }
    out
}

/// Decode 16 bfloat16 values.
#[inline]
pub fn decode_bf16(src: &[Bf16; 16]) -> [f32; 16] {
    let mut out = [0.0f32; 16];
    for (dst, half) in out.as_chunks_mut::<8>().0.iter_mut().zip(src.as_chunks::<8>().0) {
        *dst = x8::decode_bf16(half);
    }
    out
}

/// Encode 16 f32 values as bfloat16.
#[inline]
pub fn encode_bf16(src: &[f32; 16]) -> [Bf16; 16] {
    let mut out = [Bf16::ZERO; 16];
    for (dst, half) in out.as_chunks_mut::<8>().0.iter_mut().zip(src.as_chunks::<8>().0) {
        *dst = x8::encode_bf16(half);
    }
    out
}
