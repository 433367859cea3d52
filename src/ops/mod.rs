//! Named elementwise operations.
//!
//! Every operation comes in two forms: in place (`sqrt`) and from an input
//! buffer into an output buffer (`sqrt_into`). In-place forms return the
//! buffer so calls chain. Paired buffers follow the engine rule: the shorter one bounds the loop, or the call panics with the
//! `checked` feature.
//!
//! | Module | Element types | Operations |
//! |--------|---------------|------------|
//! | [`bitwise`] | all | `abs`, `neg` on raw bits |
//! | [`arith`] | all | `square`, `sign`, scalar arithmetic, `clamp` |
//! | [`math`] | `T::Compute: Float` | roots, trig, exp/log, rounding, `sigmoid`, ... |
//!
//! Reductions are re-exported from [`reduce`](crate::reduce).

pub mod arith;
pub mod bitwise;
pub mod math;

pub use arith::*;
pub use bitwise::*;
pub use math::*;

pub use crate::reduce::{max, mean, min, sum, sum_compensated};

/// Unary operations by name, for runtime dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum UnaryOp {
    Abs,
    Neg,
    Square,
    Sign,
    Sqrt,
    Rsqrt,
    Recip,
    Cbrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Exp2,
    ExpM1,
    Ln,
    Log2,
    Log10,
    Ln1p,
    Floor,
    Ceil,
    Round,
    Trunc,
    Fract,
    Sigmoid,
}

impl UnaryOp {
    /// Every operation, in declaration order.
    pub const ALL: [UnaryOp; 33] = [
        UnaryOp::Abs,
        UnaryOp::Neg,
        UnaryOp::Square,
        UnaryOp::Sign,
        UnaryOp::Sqrt,
        UnaryOp::Rsqrt,
        UnaryOp::Recip,
        UnaryOp::Cbrt,
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Asin,
        UnaryOp::Acos,
        UnaryOp::Atan,
        UnaryOp::Sinh,
        UnaryOp::Cosh,
        UnaryOp::Tanh,
        UnaryOp::Asinh,
        UnaryOp::Acosh,
        UnaryOp::Atanh,
        UnaryOp::Exp,
        UnaryOp::Exp2,
        UnaryOp::ExpM1,
        UnaryOp::Ln,
        UnaryOp::Log2,
        UnaryOp::Log10,
        UnaryOp::Ln1p,
        UnaryOp::Floor,
        UnaryOp::Ceil,
        UnaryOp::Round,
        UnaryOp::Trunc,
        UnaryOp::Fract,
        UnaryOp::Sigmoid,
    ];

    /// Name of the typed function implementing the operation.
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Abs => "abs",
            UnaryOp::Neg => "neg",
            UnaryOp::Square => "square",
            UnaryOp::Sign => "sign",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Rsqrt => "rsqrt",
            UnaryOp::Recip => "recip",
            UnaryOp::Cbrt => "cbrt",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Asin => "asin",
            UnaryOp::Acos => "acos",
            UnaryOp::Atan => "atan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Asinh => "asinh",
            UnaryOp::Acosh => "acosh",
            UnaryOp::Atanh => "atanh",
            UnaryOp::Exp => "exp",
            UnaryOp::Exp2 => "exp2",
            UnaryOp::ExpM1 => "exp_m1",
            UnaryOp::Ln => "ln",
            UnaryOp::Log2 => "log2",
            UnaryOp::Log10 => "log10",
            UnaryOp::Ln1p => "ln_1p",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Round => "round",
            UnaryOp::Trunc => "trunc",
            UnaryOp::Fract => "fract",
            UnaryOp::Sigmoid => "sigmoid",
        }
    }

    /// `true` if the operation needs a floating-point element type.
    pub const fn float_only(self) -> bool {
        !matches!(self, UnaryOp::Abs | UnaryOp::Neg | UnaryOp::Square | UnaryOp::Sign)
    }
}
