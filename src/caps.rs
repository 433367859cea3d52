//! Hardware capability detection.
//!
//! Capabilities are probed through archmage tokens:
//!
//! | Tier | x86-64 | AArch64 |
//! |------|--------|---------|
//! | [`Tier::X8`] | `Desktop64` (x86-64-v3, AVX2+FMA+F16C) | `Arm64` (NEON) |
//! | [`Tier::X16`] | `Server64` (x86-64-v4, AVX-512) | none |
//!
//! [`Capabilities::get`] probes once per process and caches the result. Every
//! kernel takes a [`Capabilities`] value by copy, so tests and callers can
//! force a narrower tier with [`Capabilities::limit`] or
//! [`Capabilities::scalar`].

use core::fmt;
use std::sync::OnceLock;

#[cfg(target_arch = "x86_64")]
use archmage::{Desktop64, Server64};

#[cfg(target_arch = "aarch64")]
use archmage::Arm64;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use archmage::SimdToken;

/// A vector width the engine can process per step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// One element at a time.
    Scalar,
    /// 8 f32 lanes per step.
    X8,
    /// 16 f32 lanes per step.
    X16,
}

impl Tier {
    /// Elements processed per step.
    #[inline]
    pub const fn lanes(self) -> usize {
        match self {
            Tier::Scalar => 1,
            Tier::X8 => 8,
            Tier::X16 => 16,
        }
    }

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Scalar => "scalar",
            Tier::X8 => "x8",
            Tier::X16 => "x16",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The usable vector tiers of the current machine.
///
/// Immutable once built. The only way to change a record is to derive a
/// narrower one with [`limit`](Self::limit).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    x8: bool,
    x16: bool,
    f16c: bool,
}

static DETECTED: OnceLock<Capabilities> = OnceLock::new();

impl Capabilities {
    /// The process-wide record, probed on first use.
    ///
    /// Safe to call from several threads during warm-up; every probe computes
    /// the same answer and only one is stored.
    #[inline]
    pub fn get() -> Self {
        *DETECTED.get_or_init(|| {
            let caps = Self::detect();
            log::debug!(
                "elemwise: detected tier {} (x8={}, x16={}, f16c={})",
                caps.tier(),
                caps.x8,
                caps.x16,
                caps.f16c
            );
            caps
        })
    }

    /// Probe the hardware without touching the cache.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            let x8 = Desktop64::try_new().is_some();
            // x86-64-v3 includes F16C
            Self {
                x8,
                x16: x8 && Server64::try_new().is_some(),
                f16c: x8,
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            Self {
                x8: Arm64::try_new().is_some(),
                x16: false,
                f16c: false,
            }
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::scalar()
        }
    }

    /// A record with every vector tier disabled.
    #[inline]
    pub const fn scalar() -> Self {
        Self {
            x8: false,
            x16: false,
            f16c: false,
        }
    }

    /// Clamp this record to at most `tier`.
    ///
    /// Never enables anything the hardware lacks.
    pub fn limit(self, tier: Tier) -> Self {
        let limited = Self {
            x8: self.x8 && tier >= Tier::X8,
            x16: self.x16 && tier >= Tier::X16,
            f16c: self.f16c && tier >= Tier::X8,
        };
        if limited != self {
            log::trace!("elemwise: limiting tier {} to {}", self.tier(), limited.tier());
        }
        limited
    }

    /// The widest usable tier.
    #[inline]
    pub const fn tier(self) -> Tier {
        if self.x16 {
            Tier::X16
        } else if self.x8 {
            Tier::X8
        } else {
            Tier::Scalar
        }
    }

    /// Lane width of [`tier`](Self::tier).
    #[inline]
    pub const fn lanes(self) -> usize {
        self.tier().lanes()
    }

    /// 8-lane tier usable.
    #[inline]
    pub const fn x8(self) -> bool {
        self.x8
    }

    /// 16-lane tier usable.
    #[inline]
    pub const fn x16(self) -> bool {
        self.x16
    }

    /// Hardware float16 conversion usable.
    #[inline]
    pub const fn f16c(self) -> bool {
        self.f16c
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::get()
    }
}
