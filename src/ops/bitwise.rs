//! Sign-bit operations on raw representations.
//!
//! These skip the engine: floats and 16-bit formats mask or flip the sign bit
//! without decoding, signed integers use a branchless mask, unsigned integers
//! are left alone by `abs` and wrap under `neg`. NaN payloads survive.

use crate::element::Element;
use crate::engine::paired;

/// Absolute value in place. Signed `MIN` stays `MIN`. Returns the buffer.
#[inline]
pub fn abs<T: Element>(data: &mut [T]) -> &mut [T] {
    for x in data.iter_mut() {
        *x = x.abs_bits();
    }
    data
}

/// Absolute value of `input` into `output`.
#[inline]
pub fn abs_into<T: Element>(input: &[T], output: &mut [T]) {
    let (input, output) = paired(input, output);
    for (inp, out) in input.iter().zip(output.iter_mut()) {
        *out = inp.abs_bits();
    }
}

/// Negation in place (wrapping for integers). Returns the buffer.
#[inline]
pub fn neg<T: Element>(data: &mut [T]) -> &mut [T] {
    for x in data.iter_mut() {
        *x = x.neg_bits();
    }
    data
}

/// Negation of `input` into `output`.
#[inline]
pub fn neg_into<T: Element>(input: &[T], output: &mut [T]) {
    let (input, output) = paired(input, output);
    for (inp, out) in input.iter().zip(output.iter_mut()) {
        *out = inp.neg_bits();
    }
}
