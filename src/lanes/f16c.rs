//! Hardware float16 decode (`vcvtph2ps`).
//!
//! The instruction quiets signaling NaNs and converts subnormals exactly,
//! which is what the software decode does, so the two paths agree bit for
//! bit. Encoding stays in software.

use core::arch::x86_64::{__m128i, _mm_loadu_si128, _mm256_cvtph_ps, _mm256_storeu_ps};

use crate::caps::Capabilities;
use crate::F16;

#[target_feature(enable = "avx,f16c")]
unsafe fn decode_chunks(src: &[F16], dst: &mut [f32]) -> usize {
    let n = src.len().min(dst.len()) / 8 * 8;
    for (s, d) in src[..n].chunks_exact(8).zip(dst[..n].chunks_exact_mut(8)) {
        // SAFETY: both chunks hold exactly 8 elements; loads and stores are unaligned.
        unsafe {
            let h = _mm_loadu_si128(s.as_ptr().cast::<__m128i>());
            _mm256_storeu_ps(d.as_mut_ptr(), _mm256_cvtph_ps(h));
        }
    }
    n
}

/// Decode whole chunks of 8 with F16C.
///
/// Returns how many leading elements were written: zero when `caps` lacks
/// F16C, otherwise the common length rounded down to a multiple of 8.
#[inline]
pub(crate) fn decode_f16(caps: Capabilities, src: &[F16], dst: &mut [f32]) -> usize {
    if !caps.f16c() {
        return 0;
    }
    // SAFETY: `f16c()` is only set after the x86-64-v3 probe succeeded.
    unsafe { decode_chunks(src, dst) }
}
