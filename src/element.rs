//! Element types and their arithmetic.
//!
//! Every supported element type implements [`Element`], which fixes:
//!
//! - its [`DType`] tag,
//! - the type arithmetic happens in ([`Element::Compute`]),
//! - the type sums accumulate in ([`Element::Acc`]),
//! - which engine path it takes.
//!
//! | Element | Compute | Acc | Engine path |
//! |---------|---------|-----|-------------|
//! | `i8`..`i64` | itself | `i64` (wrapping) | scalar |
//! | `u8`..`u64` | itself | `u64` (wrapping) | scalar |
//! | `f32` | `f32` | `f32` | native lanes |
//! | `f64` | `f64` | `f64` | native lanes |
//! | [`F16`], [`Bf16`] | `f32` | `f32` | decode / apply / encode lanes |
//!
//! The trait is sealed.

use core::fmt;

use bytemuck::Pod;

use crate::caps::{Capabilities, Tier};
use crate::engine::{self, ConstOp};
use crate::reduce;
use crate::{Bf16, F16};

/// Runtime tag for an element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F16,
    Bf16,
    F32,
    F64,
}

impl DType {
    /// Every tag, in declaration order.
    pub const ALL: [DType; 12] = [
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::F16,
        DType::Bf16,
        DType::F32,
        DType::F64,
    ];

    /// Lowercase name (`"f16"`, `"u8"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::U32 => "u32",
            DType::U64 => "u64",
            DType::F16 => "f16",
            DType::Bf16 => "bf16",
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }

    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            DType::I8 | DType::U8 => 1,
            DType::I16 | DType::U16 | DType::F16 | DType::Bf16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 => 8,
        }
    }

    /// `true` for the four floating-point formats.
    pub const fn is_float(self) -> bool {
        matches!(self, DType::F16 | DType::Bf16 | DType::F32 | DType::F64)
    }

    /// `true` for the 16-bit storage formats that compute in f32.
    pub const fn is_half(self) -> bool {
        matches!(self, DType::F16 | DType::Bf16)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arithmetic shared by compute and accumulator types.
///
/// Integers wrap. Integer [`divide`](Arith::divide) panics on a zero divisor.
/// Float [`lesser`](Arith::lesser) and [`greater`](Arith::greater) propagate
/// NaN.
pub trait Arith: Copy + PartialOrd + fmt::Debug + Send + Sync + 'static {
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// `self + rhs`
    fn plus(self, rhs: Self) -> Self;
    /// `self - rhs`
    fn minus(self, rhs: Self) -> Self;
    /// `self * rhs`
    fn times(self, rhs: Self) -> Self;
    /// `self / rhs`
    fn divide(self, rhs: Self) -> Self;
    /// The smaller operand.
    fn lesser(self, rhs: Self) -> Self;
    /// The larger operand.
    fn greater(self, rhs: Self) -> Self;
    /// `-1`, `0` or `1` (floats keep signed zero and NaN).
    fn sign(self) -> Self;
    /// `true` for NaN.
    fn unordered(self) -> bool;
    /// Convert with `as` semantics (saturating, NaN to zero for integers).
    fn from_f64_lossy(value: f64) -> Self;
    /// Convert with `as` semantics.
    fn to_f64_lossy(self) -> f64;
}

macro_rules! impl_arith_signed {
    ($($t:ty),*) => {$(
        impl Arith for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            #[inline(always)]
            fn plus(self, rhs: Self) -> Self { self.wrapping_add(rhs) }
            #[inline(always)]
            fn minus(self, rhs: Self) -> Self { self.wrapping_sub(rhs) }
            #[inline(always)]
            fn times(self, rhs: Self) -> Self { self.wrapping_mul(rhs) }
            #[inline(always)]
            fn divide(self, rhs: Self) -> Self { self.wrapping_div(rhs) }
            #[inline(always)]
            fn lesser(self, rhs: Self) -> Self { Ord::min(self, rhs) }
            #[inline(always)]
            fn greater(self, rhs: Self) -> Self { Ord::max(self, rhs) }
            #[inline(always)]
            fn sign(self) -> Self { self.signum() }
            #[inline(always)]
            fn unordered(self) -> bool { false }
            #[inline(always)]
            fn from_f64_lossy(value: f64) -> Self { value as $t }
            #[inline(always)]
            fn to_f64_lossy(self) -> f64 { self as f64 }
        }
    )*};
}

macro_rules! impl_arith_unsigned {
    ($($t:ty),*) => {$(
        impl Arith for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            #[inline(always)]
            fn plus(self, rhs: Self) -> Self { self.wrapping_add(rhs) }
            #[inline(always)]
            fn minus(self, rhs: Self) -> Self { self.wrapping_sub(rhs) }
            #[inline(always)]
            fn times(self, rhs: Self) -> Self { self.wrapping_mul(rhs) }
            #[inline(always)]
            fn divide(self, rhs: Self) -> Self { self.wrapping_div(rhs) }
            #[inline(always)]
            fn lesser(self, rhs: Self) -> Self { Ord::min(self, rhs) }
            #[inline(always)]
            fn greater(self, rhs: Self) -> Self { Ord::max(self, rhs) }
            #[inline(always)]
            fn sign(self) -> Self { Self::from(self != 0) }
            #[inline(always)]
            fn unordered(self) -> bool { false }
            #[inline(always)]
            fn from_f64_lossy(value: f64) -> Self { value as $t }
            #[inline(always)]
            fn to_f64_lossy(self) -> f64 { self as f64 }
        }
    )*};
}

macro_rules! impl_arith_float {
    ($($t:ty),*) => {$(
        impl Arith for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            #[inline(always)]
            fn plus(self, rhs: Self) -> Self { self + rhs }
            #[inline(always)]
            fn minus(self, rhs: Self) -> Self { self - rhs }
            #[inline(always)]
            fn times(self, rhs: Self) -> Self { self * rhs }
            #[inline(always)]
            fn divide(self, rhs: Self) -> Self { self / rhs }
            #[inline(always)]
            fn lesser(self, rhs: Self) -> Self {
                if self.is_nan() || rhs.is_nan() { self + rhs } else if rhs < self { rhs } else { self }
            }
            #[inline(always)]
            fn greater(self, rhs: Self) -> Self {
                if self.is_nan() || rhs.is_nan() { self + rhs } else if rhs > self { rhs } else { self }
            }
            #[inline(always)]
            fn sign(self) -> Self {
                if self == 0.0 || self.is_nan() { self } else { self.signum() }
            }
            #[inline(always)]
            fn unordered(self) -> bool { self.is_nan() }
            #[inline(always)]
            fn from_f64_lossy(value: f64) -> Self { value as $t }
            #[inline(always)]
            fn to_f64_lossy(self) -> f64 { self as f64 }
        }
    )*};
}

impl_arith_signed!(i8, i16, i32, i64);
impl_arith_unsigned!(u8, u16, u32, u64);
impl_arith_float!(f32, f64);

mod sealed {
    pub trait Sealed {}
}

/// A supported element type.
///
/// The `#[doc(hidden)]` methods are the engine hooks each type routes
/// through; call [`engine`](crate::engine) and [`reduce`](crate::reduce)
/// instead.
pub trait Element: sealed::Sealed + Pod + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag.
    const DTYPE: DType;
    /// Type every operation computes in.
    type Compute: Arith;
    /// Type sums accumulate in.
    type Acc: Arith;

    /// Widen to the compute type.
    fn load(self) -> Self::Compute;
    /// Narrow from the compute type (16-bit formats round here).
    fn store(value: Self::Compute) -> Self;
    /// Widen a compute value to the accumulator type.
    fn accumulate(value: Self::Compute) -> Self::Acc;
    /// Absolute value on the raw representation.
    fn abs_bits(self) -> Self;
    /// Negation on the raw representation.
    fn neg_bits(self) -> Self;

    #[doc(hidden)]
    fn map_slice<F>(caps: Capabilities, data: &mut [Self], f: F)
    where
        F: Fn(Self::Compute) -> Self::Compute;

    #[doc(hidden)]
    fn map_slice_into<F>(caps: Capabilities, input: &[Self], output: &mut [Self], f: F)
    where
        F: Fn(Self::Compute) -> Self::Compute;

    #[doc(hidden)]
    #[inline]
    fn map_const(caps: Capabilities, data: &mut [Self], op: ConstOp, c: Self::Compute) {
        Self::map_slice(caps, data, |x| op.apply(x, c));
    }

    #[doc(hidden)]
    #[inline]
    fn map_const_into(
        caps: Capabilities,
        input: &[Self],
        output: &mut [Self],
        op: ConstOp,
        c: Self::Compute,
    ) {
        Self::map_slice_into(caps, input, output, |x| op.apply(x, c));
    }

    #[doc(hidden)]
    fn sum_slice(caps: Capabilities, data: &[Self]) -> Self::Acc;
}

// ============================================================================
// Integers: scalar path
// ============================================================================

macro_rules! impl_int_element {
    ($t:ty, $dtype:ident, $acc:ty, $abs:expr) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            type Compute = $t;
            type Acc = $acc;

            #[inline(always)]
            fn load(self) -> $t {
                self
            }

            #[inline(always)]
            fn store(value: $t) -> Self {
                value
            }

            #[inline(always)]
            fn accumulate(value: $t) -> $acc {
                value as $acc
            }

            #[inline(always)]
            fn abs_bits(self) -> Self {
                $abs(self)
            }

            #[inline(always)]
            fn neg_bits(self) -> Self {
                self.wrapping_neg()
            }

            #[inline]
            fn map_slice<F: Fn($t) -> $t>(_caps: Capabilities, data: &mut [Self], f: F) {
                engine::scalar_map(data, f);
            }

            #[inline]
            fn map_slice_into<F: Fn($t) -> $t>(
                _caps: Capabilities,
                input: &[Self],
                output: &mut [Self],
                f: F,
            ) {
                engine::scalar_map_into(input, output, f);
            }

            #[inline]
            fn sum_slice(_caps: Capabilities, data: &[Self]) -> $acc {
                reduce::scalar_sum(data)
            }
        }
    };
}

/// Branchless `|x|` for signed integers: `(x ^ m) - m` with `m = x >> (bits - 1)`.
///
/// `MIN` maps to itself.
macro_rules! signed_abs {
    ($t:ty) => {
        |x: $t| {
            let mask = x >> (<$t>::BITS - 1);
            (x ^ mask).wrapping_sub(mask)
        }
    };
}

impl_int_element!(i8, I8, i64, signed_abs!(i8));
impl_int_element!(i16, I16, i64, signed_abs!(i16));
impl_int_element!(i32, I32, i64, signed_abs!(i32));
impl_int_element!(i64, I64, i64, signed_abs!(i64));
impl_int_element!(u8, U8, u64, |x: u8| x);
impl_int_element!(u16, U16, u64, |x: u16| x);
impl_int_element!(u32, U32, u64, |x: u32| x);
impl_int_element!(u64, U64, u64, |x: u64| x);

// ============================================================================
// f32 / f64: native lanes
// ============================================================================

impl sealed::Sealed for f32 {}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
    type Compute = f32;
    type Acc = f32;

    #[inline(always)]
    fn load(self) -> f32 {
        self
    }

    #[inline(always)]
    fn store(value: f32) -> Self {
        value
    }

    #[inline(always)]
    fn accumulate(value: f32) -> f32 {
        value
    }

    #[inline(always)]
    fn abs_bits(self) -> Self {
        f32::from_bits(self.to_bits() & 0x7FFF_FFFF)
    }

    #[inline(always)]
    fn neg_bits(self) -> Self {
        f32::from_bits(self.to_bits() ^ 0x8000_0000)
    }

    #[inline]
    fn map_slice<F: Fn(f32) -> f32>(caps: Capabilities, data: &mut [Self], f: F) {
        engine::native_map(caps, data, f);
    }

    #[inline]
    fn map_slice_into<F: Fn(f32) -> f32>(
        caps: Capabilities,
        input: &[Self],
        output: &mut [Self],
        f: F,
    ) {
        engine::native_map_into(caps, input, output, f);
    }

    fn map_const(caps: Capabilities, data: &mut [Self], op: ConstOp, c: f32) {
        #[cfg(target_arch = "x86_64")]
        if caps.tier() == Tier::X8 {
            if let Some(a) = crate::mage::ConstKernel::of(op) {
                if let Some(token) = crate::mage::token() {
                    crate::mage::const_slice(token, data, a, c);
                    return;
                }
            }
        }
        engine::native_map(caps, data, |x| op.apply(x, c));
    }

    fn map_const_into(caps: Capabilities, input: &[Self], output: &mut [Self], op: ConstOp, c: f32) {
        #[cfg(target_arch = "x86_64")]
        if caps.tier() == Tier::X8 {
            if let Some(a) = crate::mage::ConstKernel::of(op) {
                if let Some(token) = crate::mage::token() {
                    crate::mage::const_slice_into(token, input, output, a, c);
                    return;
                }
            }
        }
        engine::native_map_into(caps, input, output, |x| op.apply(x, c));
    }

    fn sum_slice(caps: Capabilities, data: &[Self]) -> f32 {
        match caps.tier() {
            Tier::X16 => reduce::lane_sum::<f32, 16>(data),
            Tier::X8 => {
                #[cfg(target_arch = "x86_64")]
                if let Some(token) = crate::mage::token() {
                    return crate::mage::sum(token, data);
                }
                reduce::lane_sum::<f32, 8>(data)
            }
            Tier::Scalar => reduce::scalar_sum(data),
        }
    }
}

impl sealed::Sealed for f64 {}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
    type Compute = f64;
    type Acc = f64;

    #[inline(always)]
    fn load(self) -> f64 {
        self
    }

    #[inline(always)]
    fn store(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn accumulate(value: f64) -> f64 {
        value
    }

    #[inline(always)]
    fn abs_bits(self) -> Self {
        f64::from_bits(self.to_bits() & 0x7FFF_FFFF_FFFF_FFFF)
    }

    #[inline(always)]
    fn neg_bits(self) -> Self {
        f64::from_bits(self.to_bits() ^ 0x8000_0000_0000_0000)
    }

    #[inline]
    fn map_slice<F: Fn(f64) -> f64>(caps: Capabilities, data: &mut [Self], f: F) {
        engine::native_map(caps, data, f);
    }

    #[inline]
    fn map_slice_into<F: Fn(f64) -> f64>(
        caps: Capabilities,
        input: &[Self],
        output: &mut [Self],
        f: F,
    ) {
        engine::native_map_into(caps, input, output, f);
    }

    fn sum_slice(caps: Capabilities, data: &[Self]) -> f64 {
        match caps.tier() {
            Tier::X16 => reduce::lane_sum::<f64, 16>(data),
            Tier::X8 => reduce::lane_sum::<f64, 8>(data),
            Tier::Scalar => reduce::scalar_sum(data),
        }
    }
}

// ============================================================================
// float16 / bfloat16: decode, apply in f32, encode
// ============================================================================

macro_rules! impl_half_element {
    ($t:ty, $dtype:ident) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            type Compute = f32;
            type Acc = f32;

            #[inline(always)]
            fn load(self) -> f32 {
                self.to_f32()
            }

            #[inline(always)]
            fn store(value: f32) -> Self {
                <$t>::from_f32(value)
            }

            #[inline(always)]
            fn accumulate(value: f32) -> f32 {
                value
            }

            #[inline(always)]
            fn abs_bits(self) -> Self {
                self.abs()
            }

            #[inline(always)]
            fn neg_bits(self) -> Self {
                self.neg()
            }

            #[inline]
            fn map_slice<F: Fn(f32) -> f32>(caps: Capabilities, data: &mut [Self], f: F) {
                engine::half_map(caps, data, f);
            }

            #[inline]
            fn map_slice_into<F: Fn(f32) -> f32>(
                caps: Capabilities,
                input: &[Self],
                output: &mut [Self],
                f: F,
            ) {
                engine::half_map_into(caps, input, output, f);
            }

            #[inline]
            fn sum_slice(caps: Capabilities, data: &[Self]) -> f32 {
                match caps.tier() {
                    Tier::X16 => reduce::half_sum::<Self, 16>(data),
                    Tier::X8 => reduce::half_sum::<Self, 8>(data),
                    Tier::Scalar => reduce::scalar_sum(data),
                }
            }
        }
    };
}

impl_half_element!(F16, F16);
impl_half_element!(Bf16, Bf16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_table() {
        assert_eq!(<i8 as Element>::DTYPE, DType::I8);
        assert_eq!(<u64 as Element>::DTYPE, DType::U64);
        assert_eq!(<F16 as Element>::DTYPE, DType::F16);
        assert_eq!(<Bf16 as Element>::DTYPE, DType::Bf16);
        for dtype in DType::ALL {
            let expected = match dtype.name() {
                "i8" | "u8" => 1,
                "i16" | "u16" | "f16" | "bf16" => 2,
                "i32" | "u32" | "f32" => 4,
                _ => 8,
            };
            assert_eq!(dtype.size(), expected, "{}", dtype);
        }
        assert!(DType::Bf16.is_float() && DType::Bf16.is_half());
        assert!(!DType::F64.is_half() && !DType::I64.is_float());
    }

    #[test]
    fn test_signed_abs_bits() {
        for x in [0i8, 1, -1, 42, -42, i8::MAX, i8::MIN] {
            assert_eq!(x.abs_bits(), x.wrapping_abs(), "abs mismatch at {}", x);
        }
        for x in [0i64, -7, i64::MIN + 1, i64::MIN] {
            assert_eq!(x.abs_bits(), x.wrapping_abs());
        }
        assert_eq!(200u8.abs_bits(), 200);
        assert_eq!(1u8.neg_bits(), 255);
    }

    #[test]
    fn test_float_abs_neg_bits() {
        assert_eq!((-0.0f32).abs_bits().to_bits(), 0);
        assert_eq!(0.0f64.neg_bits().to_bits(), 0x8000_0000_0000_0000);
        assert!(f32::NAN.neg_bits().is_nan());
        assert_eq!(F16::NEG_ONE.abs_bits(), F16::ONE);
        assert_eq!(Bf16::ONE.neg_bits(), Bf16::NEG_ONE);
    }

    #[test]
    fn test_arith_wraps_and_propagates() {
        assert_eq!(i8::MAX.plus(1), i8::MIN);
        assert_eq!(0u16.minus(1), u16::MAX);
        assert_eq!(i32::MIN.divide(-1), i32::MIN);
        assert!(1.0f32.lesser(f32::NAN).is_nan());
        assert!(f64::NAN.greater(1.0).is_nan());
        assert_eq!(2.0f32.lesser(-3.0), -3.0);
        assert_eq!(0.0f32.sign(), 0.0);
        assert_eq!((-0.0f64).sign().to_bits(), (-0.0f64).to_bits());
        assert_eq!((-5.0f32).sign(), -1.0);
        assert!(f32::NAN.sign().is_nan());
        assert_eq!(0u8.sign(), 0);
        assert_eq!(9u8.sign(), 1);
        assert_eq!((-9i16).sign(), -1);
        assert_eq!(u8::from_f64_lossy(300.0), 255);
        assert_eq!(i32::from_f64_lossy(f64::NAN), 0);
    }

    #[test]
    #[should_panic]
    fn test_integer_divide_by_zero_panics() {
        let zero = core::hint::black_box(0i32);
        let _ = 7i32.divide(zero);
    }

    #[test]
    fn test_half_load_store() {
        assert_eq!(F16::ONE.load(), 1.0);
        assert_eq!(<F16 as Element>::store(65520.0), F16::INFINITY);
        assert_eq!(<Bf16 as Element>::store(1.0), Bf16::ONE);
    }
}
