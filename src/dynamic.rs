//! Runtime-typed entry points.
//!
//! [`SliceRef`] and [`SliceMut`] carry the element type as an enum tag, for
//! callers that only learn the dtype at runtime. Every contract violation
//! comes back as a [`KernelError`]; nothing here panics.
//!
//! ```rust
//! use elemwise::dynamic::{Scalar, SliceMut, SliceRef};
//! use elemwise::ops::UnaryOp;
//! use elemwise::{Capabilities, F16};
//!
//! let caps = Capabilities::get();
//! let mut data = vec![F16::from_f32(-2.0); 17];
//! SliceMut::from(&mut data[..]).apply(caps, UnaryOp::Abs).unwrap();
//! assert_eq!(SliceRef::from(&data[..]).sum(caps), Scalar::F32(34.0));
//! ```

use num_traits::Float;

use crate::caps::Capabilities;
use crate::element::{Arith, DType, Element};
use crate::engine::{self, ConstOp};
use crate::error::KernelError;
use crate::ops::{self, UnaryOp, math};
use crate::reduce;
use crate::{Bf16, F16};

/// Binary operations against a constant, by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarOp {
    /// `x + c`
    Add,
    /// `x - c`
    Sub,
    /// `c - x`
    RSub,
    /// `x * c`
    Mul,
    /// `x / c`
    Div,
    /// `min(x, c)`
    Min,
    /// `max(x, c)`
    Max,
    /// `x ^ c` (floats only)
    Pow,
}

impl ScalarOp {
    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self.as_const() {
            Some(op) => op.name(),
            None => "pow",
        }
    }

    const fn as_const(self) -> Option<ConstOp> {
        match self {
            ScalarOp::Add => Some(ConstOp::Add),
            ScalarOp::Sub => Some(ConstOp::Sub),
            ScalarOp::RSub => Some(ConstOp::RSub),
            ScalarOp::Mul => Some(ConstOp::Mul),
            ScalarOp::Div => Some(ConstOp::Div),
            ScalarOp::Min => Some(ConstOp::Min),
            ScalarOp::Max => Some(ConstOp::Max),
            ScalarOp::Pow => None,
        }
    }
}

/// A reduction result in its accumulator type.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Scalar {
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// Convert with `as` semantics.
    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::I64(v) => v as f64,
            Scalar::U64(v) => v as f64,
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
        }
    }
}

macro_rules! dyn_slices {
    ($($variant:ident($t:ty)),* $(,)?) => {
        /// A borrowed buffer of any element type.
        #[derive(Clone, Copy, Debug)]
        #[allow(missing_docs)]
        pub enum SliceRef<'a> {
            $($variant(&'a [$t]),)*
        }

        /// A mutably borrowed buffer of any element type.
        #[derive(Debug)]
        #[allow(missing_docs)]
        pub enum SliceMut<'a> {
            $($variant(&'a mut [$t]),)*
        }

        $(
            impl<'a> From<&'a [$t]> for SliceRef<'a> {
                fn from(data: &'a [$t]) -> Self {
                    SliceRef::$variant(data)
                }
            }

            impl<'a> From<&'a mut [$t]> for SliceMut<'a> {
                fn from(data: &'a mut [$t]) -> Self {
                    SliceMut::$variant(data)
                }
            }
        )*

        impl SliceRef<'_> {
            /// Element type tag.
            pub fn dtype(&self) -> DType {
                match self {
                    $(SliceRef::$variant(_) => DType::$variant,)*
                }
            }

            /// Number of elements.
            pub fn len(&self) -> usize {
                match self {
                    $(SliceRef::$variant(d) => d.len(),)*
                }
            }
        }

        impl SliceMut<'_> {
            /// Element type tag.
            pub fn dtype(&self) -> DType {
                match self {
                    $(SliceMut::$variant(_) => DType::$variant,)*
                }
            }

            /// Number of elements.
            pub fn len(&self) -> usize {
                match self {
                    $(SliceMut::$variant(d) => d.len(),)*
                }
            }

            /// Reborrow as a shared slice.
            pub fn as_shared(&self) -> SliceRef<'_> {
                match self {
                    $(SliceMut::$variant(d) => SliceRef::$variant(d),)*
                }
            }
        }
    };
}

dyn_slices! {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F16(F16),
    Bf16(Bf16),
    F32(f32),
    F64(f64),
}

/// Match every variant of a `&mut SliceMut`, binding `$d` to the typed slice.
macro_rules! dispatch {
    ($slice:expr, |$d:ident| int => $int:expr, float => $float:expr) => {
        match $slice {
            SliceMut::I8($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::I16($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::I32($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::I64($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::U8($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::U16($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::U32($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::U64($d) => {
                let $d = &mut **$d;
                $int
            }
            SliceMut::F16($d) => {
                let $d = &mut **$d;
                $float
            }
            SliceMut::Bf16($d) => {
                let $d = &mut **$d;
                $float
            }
            SliceMut::F32($d) => {
                let $d = &mut **$d;
                $float
            }
            SliceMut::F64($d) => {
                let $d = &mut **$d;
                $float
            }
        }
    };
}

/// Pair a mutable output with an input of the same variant.
macro_rules! zip_same {
    ($input:expr, $output:expr, |$i:ident, $o:ident| int => $int:expr, float => $float:expr) => {{
        let (expected, found) = ($input.dtype(), $output.dtype());
        match ($input, $output) {
            (SliceRef::I8($i), SliceMut::I8($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::I16($i), SliceMut::I16($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::I32($i), SliceMut::I32($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::I64($i), SliceMut::I64($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::U8($i), SliceMut::U8($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::U16($i), SliceMut::U16($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::U32($i), SliceMut::U32($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::U64($i), SliceMut::U64($o)) => {
                let $o = &mut **$o;
                $int
            }
            (SliceRef::F16($i), SliceMut::F16($o)) => {
                let $o = &mut **$o;
                $float
            }
            (SliceRef::Bf16($i), SliceMut::Bf16($o)) => {
                let $o = &mut **$o;
                $float
            }
            (SliceRef::F32($i), SliceMut::F32($o)) => {
                let $o = &mut **$o;
                $float
            }
            (SliceRef::F64($i), SliceMut::F64($o)) => {
                let $o = &mut **$o;
                $float
            }
            _ => Err(KernelError::DTypeMismatch { expected, found }),
        }
    }};
}

impl SliceRef<'_> {
    /// `true` if the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Naive lane-accumulated sum.
    pub fn sum(&self, caps: Capabilities) -> Scalar {
        match *self {
            SliceRef::I8(d) => Scalar::I64(reduce::sum(caps, d)),
            SliceRef::I16(d) => Scalar::I64(reduce::sum(caps, d)),
            SliceRef::I32(d) => Scalar::I64(reduce::sum(caps, d)),
            SliceRef::I64(d) => Scalar::I64(reduce::sum(caps, d)),
            SliceRef::U8(d) => Scalar::U64(reduce::sum(caps, d)),
            SliceRef::U16(d) => Scalar::U64(reduce::sum(caps, d)),
            SliceRef::U32(d) => Scalar::U64(reduce::sum(caps, d)),
            SliceRef::U64(d) => Scalar::U64(reduce::sum(caps, d)),
            SliceRef::F16(d) => Scalar::F32(reduce::sum(caps, d)),
            SliceRef::Bf16(d) => Scalar::F32(reduce::sum(caps, d)),
            SliceRef::F32(d) => Scalar::F32(reduce::sum(caps, d)),
            SliceRef::F64(d) => Scalar::F64(reduce::sum(caps, d)),
        }
    }

    /// Compensated sum for float types. Integer sums are already exact
    /// (modulo wrapping), so integers return the plain sum.
    pub fn sum_compensated(&self) -> Scalar {
        match *self {
            SliceRef::F16(d) => Scalar::F32(reduce::sum_compensated(d)),
            SliceRef::Bf16(d) => Scalar::F32(reduce::sum_compensated(d)),
            SliceRef::F32(d) => Scalar::F32(reduce::sum_compensated(d)),
            SliceRef::F64(d) => Scalar::F64(reduce::sum_compensated(d)),
            _ => self.sum(Capabilities::scalar()),
        }
    }
}

impl SliceMut<'_> {
    /// `true` if the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a unary operation in place.
    pub fn apply(&mut self, caps: Capabilities, op: UnaryOp) -> Result<(), KernelError> {
        dispatch!(self, |d| int => unary_int(caps, d, op), float => unary_float(caps, d, op))
    }

    /// Apply a unary operation from `input` into this buffer.
    ///
    /// Both buffers must share a dtype and a length.
    pub fn apply_from(
        &mut self,
        caps: Capabilities,
        op: UnaryOp,
        input: SliceRef<'_>,
    ) -> Result<(), KernelError> {
        check_len(input.len(), self.len())?;
        zip_same!(input, self, |i, o| int => unary_int_into(caps, i, o, op),
            float => unary_float_into(caps, i, o, op))
    }

    /// Apply `op` against the constant `c` in place.
    ///
    /// For integer types `c` is converted with `as` semantics first.
    pub fn apply_scalar(&mut self, caps: Capabilities, op: ScalarOp, c: f64) -> Result<(), KernelError> {
        dispatch!(self, |d| int => scalar_int(caps, d, op, c), float => scalar_float(caps, d, op, c))
    }

    /// Apply `op` against `c` from `input` into this buffer.
    pub fn apply_scalar_from(
        &mut self,
        caps: Capabilities,
        op: ScalarOp,
        c: f64,
        input: SliceRef<'_>,
    ) -> Result<(), KernelError> {
        check_len(input.len(), self.len())?;
        zip_same!(input, self, |i, o| int => scalar_int_into(caps, i, o, op, c),
            float => scalar_float_into(caps, i, o, op, c))
    }
}

fn check_len(input: usize, output: usize) -> Result<(), KernelError> {
    if input != output {
        return Err(KernelError::LengthMismatch { input, output });
    }
    Ok(())
}

fn unsupported<T: Element>(op: &'static str) -> KernelError {
    KernelError::Unsupported { op, dtype: T::DTYPE }
}

// ============================================================================
// Unary
// ============================================================================

/// Unary ops every element type has. `None` for float-only ops.
fn unary_common<T: Element>(caps: Capabilities, data: &mut [T], op: UnaryOp) -> Option<()> {
    match op {
        UnaryOp::Abs => ops::abs(data),
        UnaryOp::Neg => ops::neg(data),
        UnaryOp::Square => ops::square(caps, data),
        UnaryOp::Sign => ops::sign(caps, data),
        _ => return None,
    };
    Some(())
}

fn unary_common_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    op: UnaryOp,
) -> Option<()> {
    match op {
        UnaryOp::Abs => ops::abs_into(input, output),
        UnaryOp::Neg => ops::neg_into(input, output),
        UnaryOp::Square => ops::square_into(caps, input, output),
        UnaryOp::Sign => ops::sign_into(caps, input, output),
        _ => return None,
    }
    Some(())
}

fn unary_int<T: Element>(caps: Capabilities, data: &mut [T], op: UnaryOp) -> Result<(), KernelError> {
    unary_common(caps, data, op).ok_or_else(|| unsupported::<T>(op.name()))
}

fn unary_int_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    op: UnaryOp,
) -> Result<(), KernelError> {
    unary_common_into(caps, input, output, op).ok_or_else(|| unsupported::<T>(op.name()))
}

fn unary_float<T: Element>(caps: Capabilities, data: &mut [T], op: UnaryOp) -> Result<(), KernelError>
where
    T::Compute: Float,
{
    if unary_common(caps, data, op).is_some() {
        return Ok(());
    }
    let kernel = math::float_kernel::<T::Compute>(op).ok_or_else(|| unsupported::<T>(op.name()))?;
    engine::map(caps, data, kernel);
    Ok(())
}

fn unary_float_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    op: UnaryOp,
) -> Result<(), KernelError>
where
    T::Compute: Float,
{
    if unary_common_into(caps, input, output, op).is_some() {
        return Ok(());
    }
    let kernel = math::float_kernel::<T::Compute>(op).ok_or_else(|| unsupported::<T>(op.name()))?;
    engine::map_into(caps, input, output, kernel);
    Ok(())
}

// ============================================================================
// Scalar constant
// ============================================================================

/// Resolve the constant for an integer type, rejecting `pow` and zero divisors.
fn int_const<T: Element>(op: ScalarOp, c: f64) -> Result<(ConstOp, T::Compute), KernelError> {
    let Some(const_op) = op.as_const() else {
        return Err(unsupported::<T>(op.name()));
    };
    let c = <T::Compute as Arith>::from_f64_lossy(c);
    if const_op == ConstOp::Div && c == <T::Compute as Arith>::ZERO {
        return Err(KernelError::DivisionByZero);
    }
    Ok((const_op, c))
}

fn scalar_int<T: Element>(caps: Capabilities, data: &mut [T], op: ScalarOp, c: f64) -> Result<(), KernelError> {
    let (op, c) = int_const::<T>(op, c)?;
    engine::map_const(caps, data, op, c);
    Ok(())
}

fn scalar_int_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    op: ScalarOp,
    c: f64,
) -> Result<(), KernelError> {
    let (op, c) = int_const::<T>(op, c)?;
    engine::map_const_into(caps, input, output, op, c);
    Ok(())
}

fn scalar_float<T: Element>(caps: Capabilities, data: &mut [T], op: ScalarOp, c: f64) -> Result<(), KernelError>
where
    T::Compute: Float,
{
    let c = <T::Compute as Arith>::from_f64_lossy(c);
    match op.as_const() {
        Some(op) => engine::map_const(caps, data, op, c),
        None => ops::powf_scalar(caps, data, c),
    };
    Ok(())
}

fn scalar_float_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    op: ScalarOp,
    c: f64,
) -> Result<(), KernelError>
where
    T::Compute: Float,
{
    let c = <T::Compute as Arith>::from_f64_lossy(c);
    match op.as_const() {
        Some(op) => engine::map_const_into(caps, input, output, op, c),
        None => ops::powf_scalar_into(caps, input, output, c),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_and_len() {
        let data = [1u16, 2, 3];
        let s = SliceRef::from(&data[..]);
        assert_eq!(s.dtype(), DType::U16);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());

        let mut halves = [F16::ZERO; 0];
        let m = SliceMut::from(&mut halves[..]);
        assert_eq!(m.dtype(), DType::F16);
        assert!(m.is_empty());
    }

    #[test]
    fn test_apply_abs_every_dtype() {
        let caps = Capabilities::get();
        let mut i = [-3i32, 4];
        SliceMut::from(&mut i[..]).apply(caps, UnaryOp::Abs).unwrap();
        assert_eq!(i, [3, 4]);

        let mut h = [Bf16::from_f32(-1.5); 9];
        SliceMut::from(&mut h[..]).apply(caps, UnaryOp::Abs).unwrap();
        assert!(h.iter().all(|&x| x == Bf16::from_f32(1.5)));
    }

    #[test]
    fn test_float_only_op_on_integers_is_unsupported() {
        let mut data = [4i32, 9];
        let err = SliceMut::from(&mut data[..]).apply(Capabilities::get(), UnaryOp::Sqrt);
        assert_eq!(
            err,
            Err(KernelError::Unsupported {
                op: "sqrt",
                dtype: DType::I32
            })
        );
        assert_eq!(data, [4, 9]);
    }

    #[test]
    fn test_apply_every_float_op_on_f64() {
        let caps = Capabilities::get();
        for op in UnaryOp::ALL {
            let mut data = [0.5f64, 0.25];
            SliceMut::from(&mut data[..]).apply(caps, op).unwrap();
        }
        let mut data = [0.25f64];
        SliceMut::from(&mut data[..]).apply(caps, UnaryOp::Sqrt).unwrap();
        assert_eq!(data, [0.5]);
    }

    #[test]
    fn test_apply_from_checks() {
        let caps = Capabilities::get();
        let input = [1.0f32, 4.0, 9.0];

        let mut short = [0.0f32; 2];
        let err = SliceMut::from(&mut short[..]).apply_from(caps, UnaryOp::Sqrt, SliceRef::from(&input[..]));
        assert_eq!(err, Err(KernelError::LengthMismatch { input: 3, output: 2 }));

        let mut wrong = [0.0f64; 3];
        let err = SliceMut::from(&mut wrong[..]).apply_from(caps, UnaryOp::Sqrt, SliceRef::from(&input[..]));
        assert_eq!(
            err,
            Err(KernelError::DTypeMismatch {
                expected: DType::F32,
                found: DType::F64
            })
        );

        let mut out = [0.0f32; 3];
        SliceMut::from(&mut out[..])
            .apply_from(caps, UnaryOp::Sqrt, SliceRef::from(&input[..]))
            .unwrap();
        assert_eq!(out, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_apply_scalar() {
        let caps = Capabilities::get();
        let mut ints = [10i16, 20, 30];
        SliceMut::from(&mut ints[..]).apply_scalar(caps, ScalarOp::Div, 10.0).unwrap();
        assert_eq!(ints, [1, 2, 3]);

        let err = SliceMut::from(&mut ints[..]).apply_scalar(caps, ScalarOp::Div, 0.4);
        assert_eq!(err, Err(KernelError::DivisionByZero));

        let err = SliceMut::from(&mut ints[..]).apply_scalar(caps, ScalarOp::Pow, 2.0);
        assert_eq!(
            err,
            Err(KernelError::Unsupported {
                op: "pow",
                dtype: DType::I16
            })
        );

        let mut floats = [2.0f32, 3.0];
        SliceMut::from(&mut floats[..]).apply_scalar(caps, ScalarOp::Pow, 2.0).unwrap();
        assert_eq!(floats, [4.0, 9.0]);
        SliceMut::from(&mut floats[..]).apply_scalar(caps, ScalarOp::Div, 0.0).unwrap();
        assert_eq!(floats, [f32::INFINITY; 2]);

        let input = [F16::ONE; 3];
        let mut out = [F16::ZERO; 3];
        SliceMut::from(&mut out[..])
            .apply_scalar_from(caps, ScalarOp::RSub, 3.0, SliceRef::from(&input[..]))
            .unwrap();
        assert_eq!(out, [F16::from_f32(2.0); 3]);
    }

    #[test]
    fn test_sums() {
        let caps = Capabilities::get();
        let bytes = [255u8; 10];
        assert_eq!(SliceRef::from(&bytes[..]).sum(caps), Scalar::U64(2550));
        assert_eq!(SliceRef::from(&bytes[..]).sum_compensated(), Scalar::U64(2550));

        let tenths = vec![0.1f64; 10_000];
        let total = SliceRef::from(&tenths[..]).sum_compensated();
        assert!(matches!(total, Scalar::F64(_)));
        assert!((total.to_f64() - 1000.0).abs() <= 1.2e-13, "got {:?}", total);

        let mut signed = [-5i8; 4];
        assert_eq!(SliceRef::from(&signed[..]).sum(caps), Scalar::I64(-20));
        let m = SliceMut::from(&mut signed[..]);
        assert_eq!(m.as_shared().sum(caps), Scalar::I64(-20));
    }

    #[test]
    fn test_scalar_op_names() {
        assert_eq!(ScalarOp::Pow.name(), "pow");
        assert_eq!(ScalarOp::RSub.name(), "rsub");
        assert_eq!(ScalarOp::Max.name(), "max");
    }
}
