//! Token-gated f32 kernels with zero dispatch overhead.
//!
//! For callers that probe once and then run tight loops. A token proves the
//! CPU features, so these functions skip [`Capabilities`](crate::Capabilities)
//! entirely:
//!
//! ```rust,ignore
//! use elemwise::mage::{self, ConstKernel};
//!
//! let token = mage::token().expect("need x86-64-v3");
//! let mut data = vec![0.5f32; 10000];
//! mage::const_slice(token, &mut data, ConstKernel::Mul, 3.0);
//! let total = mage::sum(token, &data);
//! ```
//!
//! The engine takes this path by itself for f32 constant arithmetic and f32
//! sums when the best tier is [`Tier::X8`](crate::Tier::X8) on x86-64.
//! Results equal the generic 8-lane path bit for bit.

#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(target_arch = "x86_64")]
pub use x86_64::*;

use crate::engine::ConstOp;

/// Constant operations with a native 8-lane instruction.
///
/// `min`/`max` are absent: the hardware instructions do not propagate NaN
/// from either operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstKernel {
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
}

impl ConstKernel {
    /// The kernel for `op`, if one exists.
    pub const fn of(op: ConstOp) -> Option<Self> {
        match op {
            ConstOp::Add => Some(ConstKernel::Add),
            ConstOp::Sub => Some(ConstKernel::Sub),
            ConstOp::RSub => Some(ConstKernel::RSub),
            ConstOp::Mul => Some(ConstKernel::Mul),
            ConstOp::Div => Some(ConstKernel::Div),
            ConstOp::Min | ConstOp::Max => None,
        }
    }

    /// Scalar form, used for remainders.
    #[inline(always)]
    pub fn apply(self, x: f32, c: f32) -> f32 {
        match self {
            ConstKernel::Add => x + c,
            ConstKernel::Sub => x - c,
            ConstKernel::RSub => c - x,
            ConstKernel::Mul => x * c,
            ConstKernel::Div => x / c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_selection() {
        assert_eq!(ConstKernel::of(ConstOp::RSub), Some(ConstKernel::RSub));
        assert_eq!(ConstKernel::of(ConstOp::Min), None);
        assert_eq!(ConstKernel::RSub.apply(1.0, 4.0), 3.0);
        assert_eq!(ConstKernel::Div.apply(1.0, 4.0), 0.25);
    }
}
