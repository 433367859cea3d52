//! Runtime-dispatched elementwise kernels over numeric buffers.
//!
//! This crate applies a scalar function to every element of a contiguous
//! buffer, reduces buffers to a sum, mean or extreme, and converts between
//! f32 and the two 16-bit float formats. The same call runs 16, 8 or 1
//! element per step depending on the CPU, and every tier produces the same
//! bits.
//!
//! # Module Organization
//!
//! - [`ops`] - **Recommended API**: ~40 named operations plus reductions
//! - [`engine`] - Generic map over any [`Element`] with your own closure
//! - [`reduce`] - Sums (plain and compensated), mean, min, max
//! - [`convert`] - Bulk f32/f64 to float16/bfloat16 and back
//! - [`dynamic`] - Runtime-typed slices returning [`KernelError`]
//! - [`caps`] - Hardware tier detection
//! - [`f16`] / [`bf16`] - The 16-bit storage types and scalar codecs
//! - [`lanes`] - 8- and 16-wide codecs used by the engine
//! - [`mage`] - Token-gated f32 kernels for tight loops
//!
//! # Quick Start
//!
//! ```rust
//! use elemwise::{Capabilities, F16, ops};
//!
//! let caps = Capabilities::get();
//!
//! let mut data = vec![F16::from_f32(-2.0); 17];
//! ops::abs(&mut data);
//! assert!(data.iter().all(|&h| h == F16::from_f32(2.0)));
//!
//! let mut roots: Vec<f32> = (0..100).map(|i| i as f32).collect();
//! ops::sqrt(caps, &mut roots);
//! assert_eq!(roots[81], 9.0);
//!
//! assert_eq!(ops::sum(caps, &data), 34.0);
//! ```
//!
//! # Custom Kernels
//!
//! ```rust
//! use elemwise::{Bf16, Capabilities, engine};
//!
//! let caps = Capabilities::get();
//! let mut data = vec![Bf16::from_f32(1.5); 40];
//! engine::map(caps, &mut data, |x: f32| x * x - 0.25);
//! assert_eq!(data[39].to_f32(), 2.0);
//! ```
//!
//! 16-bit formats decode to f32, run the closure, and round once on store.
//!
//! # Forcing a Tier
//!
//! ```rust
//! use elemwise::{Capabilities, Tier, ops};
//!
//! let caps = Capabilities::get().limit(Tier::X8);
//! let mut data = vec![1.0f64; 64];
//! ops::mul_scalar(caps, &mut data, 3.0);
//! assert_eq!(ops::sum(Capabilities::scalar(), &data), 192.0);
//! ```
//!
//! # Choosing the Right API
//!
//! | Use Case | Recommended Function |
//! |----------|---------------------|
//! | Named math on a typed slice | [`ops::sqrt`], [`ops::exp`], ... |
//! | Sign-bit ops with no decode | [`ops::abs`], [`ops::neg`] |
//! | Your own closure | [`engine::map`], [`engine::map_into`] |
//! | Accurate long sums | [`reduce::sum_compensated`] |
//! | dtype known only at runtime | [`dynamic::SliceMut::apply`] |
//! | Bulk format conversion | [`convert::f32_to_f16_slice`] |
//! | Inside a tight f32 loop | [`mage`] |
//!
//! # Feature Flags
//!
//! - `checked`: Panic when paired buffers differ in length instead of
//!   processing the shorter prefix
//! - `unsafe_simd`: Allow the F16C intrinsics path for float16 decode

#![cfg_attr(not(feature = "unsafe_simd"), deny(unsafe_code))]
#![warn(missing_docs)]

#[macro_use]
mod targets;

// ============================================================================
// Public modules
// ============================================================================

/// bfloat16 storage type and scalar codec.
pub mod bf16;

/// Hardware capability detection.
pub mod caps;

/// Bulk conversion between f32/f64 and the 16-bit formats.
pub mod convert;

/// Runtime-typed entry points.
pub mod dynamic;

/// Element types and their arithmetic.
pub mod element;

/// The tiered elementwise engine.
///
/// See module documentation for the dispatch rules.
pub mod engine;

/// Errors returned by the runtime-typed API.
pub mod error;

/// IEEE 754 half-precision storage type and scalar codec.
pub mod f16;

/// Lane-batched 16-bit codecs.
pub mod lanes;

/// Token-based f32 kernels using archmage for zero dispatch overhead.
///
/// Obtain a token once at startup, then pass it to every call.
pub mod mage;

/// Named operations.
pub mod ops;

/// Reductions.
pub mod reduce;

// ============================================================================
// Internal modules
// ============================================================================

mod mlaf;

// ============================================================================
// Re-exports
// ============================================================================

pub use bf16::Bf16;
pub use caps::{Capabilities, Tier};
pub use element::{Arith, DType, Element};
pub use error::KernelError;
pub use f16::F16;

// ============================================================================
// Tests
// ============================================================================
