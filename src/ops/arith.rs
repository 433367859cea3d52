//! Arithmetic defined for every element type.
//!
//! Integers wrap. Integer division by a zero constant panics. 16-bit formats
//! compute in f32 and round once on store.

use crate::caps::Capabilities;
use crate::element::{Arith, Element};
use crate::engine::{self, ConstOp};

/// `x * x` in place.
#[inline]
pub fn square<T: Element>(caps: Capabilities, data: &mut [T]) -> &mut [T] {
    engine::map(caps, data, |x: T::Compute| x.times(x))
}

/// `x * x` from `input` into `output`.
#[inline]
pub fn square_into<T: Element>(caps: Capabilities, input: &[T], output: &mut [T]) {
    engine::map_into(caps, input, output, |x: T::Compute| x.times(x));
}

/// `-1`, `0` or `1` in place. Float zeros and NaN are kept as they are.
#[inline]
pub fn sign<T: Element>(caps: Capabilities, data: &mut [T]) -> &mut [T] {
    engine::map(caps, data, <T::Compute as Arith>::sign)
}

/// Sign of `input` into `output`.
#[inline]
pub fn sign_into<T: Element>(caps: Capabilities, input: &[T], output: &mut [T]) {
    engine::map_into(caps, input, output, <T::Compute as Arith>::sign);
}

macro_rules! const_ops {
    ($($(#[$doc:meta])* $name:ident, $into:ident => $op:ident;)*) => {$(
        $(#[$doc])*
        #[inline]
        pub fn $name<T: Element>(caps: Capabilities, data: &mut [T], c: T::Compute) -> &mut [T] {
            engine::map_const(caps, data, ConstOp::$op, c)
        }

        #[doc = concat!("[`", stringify!($name), "`] from `input` into `output`.")]
        #[inline]
        pub fn $into<T: Element>(caps: Capabilities, input: &[T], output: &mut [T], c: T::Compute) {
            engine::map_const_into(caps, input, output, ConstOp::$op, c);
        }
    )*};
}

const_ops! {
    /// `x + c` in place.
    add_scalar, add_scalar_into => Add;
    /// `x - c` in place.
    sub_scalar, sub_scalar_into => Sub;
    /// `c - x` in place.
    rsub_scalar, rsub_scalar_into => RSub;
    /// `x * c` in place.
    mul_scalar, mul_scalar_into => Mul;
    /// `x / c` in place.
    ///
    /// # Panics
    ///
    /// Integer element types panic when `c` is zero.
    div_scalar, div_scalar_into => Div;
    /// `min(x, c)` in place. NaN on either side gives NaN.
    min_scalar, min_scalar_into => Min;
    /// `max(x, c)` in place. NaN on either side gives NaN.
    max_scalar, max_scalar_into => Max;
}

/// Clamp every element to `[lo, hi]` in place. NaN stays NaN.
#[inline]
pub fn clamp<T: Element>(caps: Capabilities, data: &mut [T], lo: T::Compute, hi: T::Compute) -> &mut [T] {
    engine::map(caps, data, |x: T::Compute| x.greater(lo).lesser(hi))
}

/// [`clamp`] from `input` into `output`.
#[inline]
pub fn clamp_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    lo: T::Compute,
    hi: T::Compute,
) {
    engine::map_into(caps, input, output, |x: T::Compute| x.greater(lo).lesser(hi));
}
