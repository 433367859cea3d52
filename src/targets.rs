//! `multiversion` target lists for the bulk loops.
//!
//! Wrapping a function in one of these macros compiles a clone per listed
//! target plus a baseline, and dispatches to the best clone at runtime.
//! The lists track the capability tiers in [`crate::caps`].

// ============================================================================
// x86/x86_64 macros
// ============================================================================

/// Targets for 8-lane loops (x86_64 version).
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
macro_rules! simd_multiversion {
    ($($item:tt)*) => {
        #[multiversion::multiversion(targets(
            // x86-64-v3 (Haswell 2013+, Zen 2 2019+)
            "x86_64+sse+sse2+sse3+ssse3+sse4.1+sse4.2+popcnt+cmpxchg16b+avx+avx2+bmi1+bmi2+f16c+fma+lzcnt+movbe+xsave+fxsr",
        ))]
        $($item)*
    };
}

/// Targets for 16-lane loops (x86_64 version).
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
macro_rules! simd_multiversion_extended {
    ($($item:tt)*) => {
        #[multiversion::multiversion(targets(
            // x86-64-v4 with AVX-512 (Skylake-X 2017+, Zen 4 2022+)
            "x86_64+sse+sse2+sse3+ssse3+sse4.1+sse4.2+popcnt+cmpxchg16b+avx+avx2+bmi1+bmi2+f16c+fma+lzcnt+movbe+xsave+fxsr+avx512f+avx512bw+avx512dq+avx512vl+avx512cd",
            // x86-64-v3 (Haswell 2013+)
            "x86_64+sse+sse2+sse3+ssse3+sse4.1+sse4.2+popcnt+cmpxchg16b+avx+avx2+bmi1+bmi2+f16c+fma+lzcnt+movbe+xsave+fxsr",
        ))]
        $($item)*
    };
}

// ============================================================================
// aarch64 macros
// ============================================================================

/// Targets for 8-lane loops (aarch64 version).
#[cfg(target_arch = "aarch64")]
macro_rules! simd_multiversion {
    ($($item:tt)*) => {
        #[multiversion::multiversion(targets(
            // aarch64 baseline (all ARM64)
            "aarch64+neon",
        ))]
        $($item)*
    };
}

/// Targets for 16-lane loops (aarch64 version).
///
/// No 16-lane tier exists here, so this matches the 8-lane list.
#[cfg(target_arch = "aarch64")]
macro_rules! simd_multiversion_extended {
    ($($item:tt)*) => {
        simd_multiversion! { $($item)* }
    };
}

// ============================================================================
// Fallback for other architectures (wasm32, etc.)
// ============================================================================

/// No multiversioning on other architectures.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
macro_rules! simd_multiversion {
    ($($item:tt)*) => {
        $($item)*
    };
}

/// No multiversioning on other architectures.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
macro_rules! simd_multiversion_extended {
    ($($item:tt)*) => {
        $($item)*
    };
}
