//! Multiply-add with compile-time hardware selection.
//!
//! With FMA in the build (x86 `+fma` or AArch64 NEON) this is one fused
//! instruction and one rounding. Otherwise it is a multiply then an add.
//! The choice is fixed per build, so every tier agrees.

use num_traits::Float;

/// Computes `acc + a * b`, fused.
#[cfg(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
))]
#[inline(always)]
pub(crate) fn mlaf<T: Float>(acc: T, a: T, b: T) -> T {
    a.mul_add(b, acc)
}

/// Computes `acc + a * b` (no hardware FMA in this build).
#[cfg(not(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
#[inline(always)]
pub(crate) fn mlaf<T: Float>(acc: T, a: T, b: T) -> T {
    acc + a * b
}
