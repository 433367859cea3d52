//! Lane-batched 16-bit float codecs.
//!
//! Organized by lane width, matching the capability tiers:
//!
//! - [`x8`]: 8 elements per step ([`Tier::X8`](crate::Tier::X8))
//! - [`x16`]: 16 elements per step ([`Tier::X16`](crate::Tier::X16))
//!
//! Both are numerically identical to the scalar codecs, so the engine may mix
//! lane and scalar steps freely inside one buffer.

pub mod x16;
pub mod x8;

#[cfg(all(feature = "unsafe_simd", target_arch = "x86_64"))]
pub(crate) mod f16c;

use crate::{Bf16, F16};

/// A 16-bit storage format with scalar and `N`-wide codecs.
pub(crate) trait LaneCodec<const N: usize>: Copy {
    fn decode_lane(src: &[Self; N]) -> [f32; N];
    fn encode_lane(src: &[f32; N]) -> [Self; N];
}

impl LaneCodec<8> for F16 {
    #[inline(always)]
    fn decode_lane(src: &[Self; 8]) -> [f32; 8] {
        x8::decode_f16(src)
    }

    #[inline(always)]
    fn encode_lane(src: &[f32; 8]) -> [Self; 8] {
        x8::encode_f16(src)
    }
}

impl LaneCodec<16> for F16 {
    #[inline(always)]
    fn decode_lane(src: &[Self; 16]) -> [f32; 16] {
        x16::decode_f16(src)
    }

    #[inline(always)]
    fn encode_lane(src: &[f32; 16]) -> [Self; 16] {
        x16::encode_f16(src)
    }
}

impl LaneCodec<8> for Bf16 {
    #[inline(always)]
    fn decode_lane(src: &[Self; 8]) -> [f32; 8] {
        x8::decode_bf16(src)
    }

    #[inline(always)]
    fn encode_lane(src: &[f32; 8]) -> [Self; 8] {
        x8::encode_bf16(src)
    }
}

impl LaneCodec<16> for Bf16 {
    #[inline(always)]
    fn decode_lane(src: &[Self; 16]) -> [f32; 16] {
        x16::decode_bf16(src)
    }

    #[inline(always)]
    fn encode_lane(src: &[f32; 16]) -> [Self; 16] {
        x16::encode_bf16(src)
    }
}
