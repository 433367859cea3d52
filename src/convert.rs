//! Bulk conversion between f32/f64 and the 16-bit formats.
//!
//! Every function pairs `src` and `dst` the way the engine does (see
//! [`engine`](crate::engine)) and picks its lane width from the given
//! [`Capabilities`]. Results are bit-identical on every tier.
//!
//! ```rust
//! use elemwise::{Capabilities, F16};
//! use elemwise::convert::{f16_to_f32_slice, f32_to_f16_slice};
//!
//! let caps = Capabilities::get();
//! let src = [0.5f32, 1.0, 65504.0, 1e6];
//! let mut halves = [F16::ZERO; 4];
//! f32_to_f16_slice(caps, &src, &mut halves);
//! assert_eq!(halves[3], F16::INFINITY);
//!
//! let mut back = [0.0f32; 4];
//! f16_to_f32_slice(caps, &halves, &mut back);
//! assert_eq!(back[..3], src[..3]);
//! ```
//!
//! The f64 encoders round through f32 first, like [`F16::from_f64`].

use crate::caps::{Capabilities, Tier};
use crate::engine::paired;
use crate::lanes::{x8, x16};
use crate::{Bf16, F16};

/// One chunked loop per (direction, width). The x16 loops get the AVX-512
/// clone as well; the x8 loops only need x86-64-v3.
macro_rules! lane_loops {
    ($($mv:ident $name:ident: $src:ty => $dst:ty, $n:literal, |$x:ident| $lane:expr, $one:expr;)*) => {$(
        $mv! {
            fn $name(src: &[$src], dst: &mut [$dst]) {
                let (src_chunks, src_tail) = src.as_chunks::<$n>();
                let (dst_chunks, dst_tail) = dst.as_chunks_mut::<$n>();
                for ($x, out) in src_chunks.iter().zip(dst_chunks.iter_mut()) {
                    *out = $lane;
                }
                for (x, out) in src_tail.iter().zip(dst_tail.iter_mut()) {
                    *out = $one(*x);
                }
            }
        }
    )*};
}

lane_loops! {
    simd_multiversion f16_decode_x8: F16 => f32, 8, |x| x8::decode_f16(x), F16::to_f32;
    simd_multiversion_extended f16_decode_x16: F16 => f32, 16, |x| x16::decode_f16(x), F16::to_f32;
    simd_multiversion f16_encode_x8: f32 => F16, 8, |x| x8::encode_f16(x), F16::from_f32;
    simd_multiversion_extended f16_encode_x16: f32 => F16, 16, |x| x16::encode_f16(x), F16::from_f32;
    simd_multiversion bf16_decode_x8: Bf16 => f32, 8, |x| x8::decode_bf16(x), Bf16::to_f32;
    simd_multiversion_extended bf16_decode_x16: Bf16 => f32, 16, |x| x16::decode_bf16(x), Bf16::to_f32;
    simd_multiversion bf16_encode_x8: f32 => Bf16, 8, |x| x8::encode_bf16(x), Bf16::from_f32;
    simd_multiversion_extended bf16_encode_x16: f32 => Bf16, 16, |x| x16::encode_bf16(x), Bf16::from_f32;
    simd_multiversion f16_narrow_x8: f64 => F16, 8, |x| x8::encode_f16(&x.map(|v| v as f32)), F16::from_f64;
    simd_multiversion_extended f16_narrow_x16: f64 => F16, 16, |x| x16::encode_f16(&x.map(|v| v as f32)), F16::from_f64;
    simd_multiversion bf16_narrow_x8: f64 => Bf16, 8, |x| x8::encode_bf16(&x.map(|v| v as f32)), Bf16::from_f64;
    simd_multiversion_extended bf16_narrow_x16: f64 => Bf16, 16, |x| x16::encode_bf16(&x.map(|v| v as f32)), Bf16::from_f64;
}

#[inline]
fn scalar_loop<S: Copy, D>(src: &[S], dst: &mut [D], f: impl Fn(S) -> D) {
    for (x, out) in src.iter().zip(dst.iter_mut()) {
        *out = f(*x);
    }
}

/// Decode float16 into f32.
pub fn f16_to_f32_slice(caps: Capabilities, src: &[F16], dst: &mut [f32]) {
    let (src, dst) = paired(src, dst);

    #[cfg(all(feature = "unsafe_simd", target_arch = "x86_64"))]
    let (src, dst) = {
        let done = crate::lanes::f16c::decode_f16(caps, src, dst);
        (&src[done..], &mut dst[done..])
    };

    match caps.tier() {
        Tier::X16 => f16_decode_x16(src, dst),
        Tier::X8 => f16_decode_x8(src, dst),
        Tier::Scalar => scalar_loop(src, dst, F16::to_f32),
    }
}

/// Encode f32 as float16 with bias rounding.
pub fn f32_to_f16_slice(caps: Capabilities, src: &[f32], dst: &mut [F16]) {
    let (src, dst) = paired(src, dst);
    match caps.tier() {
        Tier::X16 => f16_encode_x16(src, dst),
        Tier::X8 => f16_encode_x8(src, dst),
        Tier::Scalar => scalar_loop(src, dst, F16::from_f32),
    }
}

/// Decode bfloat16 into f32.
pub fn bf16_to_f32_slice(caps: Capabilities, src: &[Bf16], dst: &mut [f32]) {
    let (src, dst) = paired(src, dst);
    match caps.tier() {
        Tier::X16 => bf16_decode_x16(src, dst),
        Tier::X8 => bf16_decode_x8(src, dst),
        Tier::Scalar => scalar_loop(src, dst, Bf16::to_f32),
    }
}

/// Encode f32 as bfloat16 with bias rounding.
pub fn f32_to_bf16_slice(caps: Capabilities, src: &[f32], dst: &mut [Bf16]) {
    let (src, dst) = paired(src, dst);
    match caps.tier() {
        Tier::X16 => bf16_encode_x16(src, dst),
        Tier::X8 => bf16_encode_x8(src, dst),
        Tier::Scalar => scalar_loop(src, dst, Bf16::from_f32),
    }
}

/// Encode f64 as float16 by way of f32.
pub fn f64_to_f16_slice(caps: Capabilities, src: &[f64], dst: &mut [F16]) {
    let (src, dst) = paired(src, dst);
    match caps.tier() {
        Tier::X16 => f16_narrow_x16(src, dst),
        Tier::X8 => f16_narrow_x8(src, dst),
        Tier::Scalar => scalar_loop(src, dst, F16::from_f64),
    }
}

/// Encode f64 as bfloat16 by way of f32.
pub fn f64_to_bf16_slice(caps: Capabilities, src: &[f64], dst: &mut [Bf16]) {
    let (src, dst) = paired(src, dst);
    match caps.tier() {
        Tier::X16 => bf16_narrow_x16(src, dst),
        Tier::X8 => bf16_narrow_x8(src, dst),
        Tier::Scalar => scalar_loop(src, dst, Bf16::from_f64),
    }
}
