//! Errors reported by the dynamic API.
//!
//! The typed API never returns these: unsupported element types are rejected
//! by trait bounds at compile time and numeric edge cases are values.

use crate::element::DType;

/// A contract violation detected by [`dynamic`](crate::dynamic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// Paired input and output buffers differ in length.
    #[error("length mismatch: input has {input} elements, output has {output}")]
    LengthMismatch {
        /// Input length.
        input: usize,
        /// Output length.
        output: usize,
    },

    /// Paired buffers hold different element types.
    #[error("dtype mismatch: expected {expected}, found {found}")]
    DTypeMismatch {
        /// Input element type.
        expected: DType,
        /// Output element type.
        found: DType,
    },

    /// The operation has no definition for this element type.
    #[error("operation '{op}' is not supported for {dtype}")]
    Unsupported {
        /// Operation name.
        op: &'static str,
        /// Element type it was applied to.
        dtype: DType,
    },

    /// Integer division by a zero constant.
    #[error("integer division by zero")]
    DivisionByZero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = KernelError::LengthMismatch { input: 3, output: 4 };
        assert_eq!(err.to_string(), "length mismatch: input has 3 elements, output has 4");

        let err = KernelError::Unsupported {
            op: "sqrt",
            dtype: DType::I32,
        };
        assert_eq!(err.to_string(), "operation 'sqrt' is not supported for i32");

        let err = KernelError::DTypeMismatch {
            expected: DType::F16,
            found: DType::Bf16,
        };
        assert_eq!(err.to_string(), "dtype mismatch: expected f16, found bf16");
    }
}
