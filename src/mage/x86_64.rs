//! x86-64-v3 kernels on `magetypes::simd::f32x8`.
//!
//! `#[arcane]` applies `#[target_feature]` per function, so these
//! compile to AVX2 instructions regardless of the crate's compile flags.

use archmage::{Desktop64, SimdToken};
use archmage::arcane;
use magetypes::simd::f32x8;

use super::ConstKernel;
use crate::engine::paired;
use crate::reduce::horizontal;

/// Token type for this platform (x86-64-v3).
pub type Token = Desktop64;

/// Probe for the token.
#[inline]
pub fn token() -> Option<Token> {
    Desktop64::try_new()
}

#[arcane]
fn const_x8(token: Desktop64, kernel: ConstKernel, v: [f32; 8], c: f32) -> [f32; 8] {
    let v = f32x8::from_array(token, v);
    let c = f32x8::splat(token, c);
    let r = match kernel {
        ConstKernel::Add => v + c,
        ConstKernel::Sub => v - c,
        ConstKernel::RSub => c - v,
        ConstKernel::Mul => v * c,
        ConstKernel::Div => v / c,
    };
    r.to_array()
}

/// Apply `kernel` against `c` in place.
#[arcane]
pub fn const_slice(token: Desktop64, values: &mut [f32], kernel: ConstKernel, c: f32) {
    let (chunks, remainder) = values.as_chunks_mut::<8>();

    for chunk in chunks {
        *chunk = const_x8(token, kernel, *chunk, c);
    }

    for v in remainder {
        *v = kernel.apply(*v, c);
    }
}

/// `output[i] = kernel(input[i], c)`, bounded by the shorter buffer.
#[arcane]
pub fn const_slice_into(
    token: Desktop64,
    input: &[f32],
    output: &mut [f32],
    kernel: ConstKernel,
    c: f32,
) {
    let (input, output) = paired(input, output);
    let (in_chunks, in_remainder) = input.as_chunks::<8>();
    let (out_chunks, out_remainder) = output.as_chunks_mut::<8>();

    for (inp, out) in in_chunks.iter().zip(out_chunks.iter_mut()) {
        *out = const_x8(token, kernel, *inp, c);
    }

    for (inp, out) in in_remainder.iter().zip(out_remainder.iter_mut()) {
        *out = kernel.apply(*inp, c);
    }
}

/// Sum with 8 lane accumulators, folded pairwise, then the remainder.
#[arcane]
pub fn sum(token: Desktop64, values: &[f32]) -> f32 {
    let (chunks, remainder) = values.as_chunks::<8>();

    let mut acc = f32x8::zero(token);
    for chunk in chunks {
        acc = acc + f32x8::from_array(token, *chunk);
    }

    remainder.iter().fold(horizontal(acc.to_array()), |total, &v| total + v)
}
