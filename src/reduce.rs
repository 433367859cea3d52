//! Reductions to a scalar.
//!
//! [`sum`] keeps one partial sum per lane, folds the partials pairwise and
//! then adds the remainder. Its rounding therefore depends on the tier.
//! [`sum_compensated`] is a strictly sequential Neumaier pass and never uses
//! lanes. Neither selects the other.

use num_traits::Float;

use crate::caps::Capabilities;
use crate::element::{Arith, Element};
use crate::lanes::LaneCodec;

/// Sum of all elements in the accumulator type.
///
/// 16-bit floats and f32 accumulate in f32, f64 in f64, signed integers in
/// wrapping i64 and unsigned integers in wrapping u64. Empty input gives zero.
#[inline]
pub fn sum<T: Element>(caps: Capabilities, data: &[T]) -> T::Acc {
    T::sum_slice(caps, data)
}

/// Error-compensated sum (Kahan-Babuška / Neumaier).
///
/// One sequential pass. The running compensation is added back at the end.
pub fn sum_compensated<T: Element>(data: &[T]) -> T::Acc
where
    T::Acc: Float,
{
    let mut total = <T::Acc as Arith>::ZERO;
    let mut compensation = <T::Acc as Arith>::ZERO;
    for x in data {
        let x = T::accumulate(x.load());
        let t = total + x;
        if total.abs() >= x.abs() {
            compensation = compensation + ((total - t) + x);
        } else {
            compensation = compensation + ((x - t) + total);
        }
        total = t;
    }
    total + compensation
}

/// Compensated mean. `None` for an empty buffer.
pub fn mean<T: Element>(data: &[T]) -> Option<T::Acc>
where
    T::Acc: Float,
{
    if data.is_empty() {
        return None;
    }
    let n = <T::Acc as Arith>::from_f64_lossy(data.len() as f64);
    Some(sum_compensated(data) / n)
}

/// Smallest element, or the first NaN. `None` for an empty buffer.
pub fn min<T: Element>(data: &[T]) -> Option<T> {
    extreme(data, |candidate, best| candidate < best)
}

/// Largest element, or the first NaN. `None` for an empty buffer.
pub fn max<T: Element>(data: &[T]) -> Option<T> {
    extreme(data, |candidate, best| candidate > best)
}

#[inline]
fn extreme<T: Element>(data: &[T], better: impl Fn(T::Compute, T::Compute) -> bool) -> Option<T> {
    let (&first, rest) = data.split_first()?;
    let mut best = first;
    let mut best_value = first.load();
    if best_value.unordered() {
        return Some(best);
    }
    for &x in rest {
        let value = x.load();
        if value.unordered() {
            return Some(x);
        }
        if better(value, best_value) {
            best = x;
            best_value = value;
        }
    }
    Some(best)
}

// ============================================================================
// Paths used by `Element::sum_slice`
// ============================================================================

pub(crate) fn scalar_sum<T: Element>(data: &[T]) -> T::Acc {
    data.iter()
        .fold(<T::Acc as Arith>::ZERO, |acc, x| acc.plus(T::accumulate(x.load())))
}

/// Fold `N` partial sums down to one, halving the width each step.
#[inline(always)]
pub(crate) fn horizontal<A: Arith, const N: usize>(mut partials: [A; N]) -> A {
    let mut width = N;
    while width > 1 {
        width /= 2;
        for i in 0..width {
            partials[i] = partials[i].plus(partials[i + width]);
        }
    }
    partials[0]
}

pub(crate) fn lane_sum<T, const N: usize>(data: &[T]) -> T::Acc
where
    T: Element<Compute = T, Acc = T> + Arith,
{
    let (chunks, remainder) = data.as_chunks::<N>();
    let mut partials = [<T as Arith>::ZERO; N];
    for chunk in chunks {
        for (p, &x) in partials.iter_mut().zip(chunk) {
            *p = p.plus(x);
        }
    }
    remainder.iter().fold(horizontal(partials), |acc, &x| acc.plus(x))
}

pub(crate) fn half_sum<T, const N: usize>(data: &[T]) -> f32
where
    T: Element<Compute = f32, Acc = f32> + LaneCodec<N>,
{
    let (chunks, remainder) = data.as_chunks::<N>();
    let mut partials = [0.0f32; N];
    for chunk in chunks {
        for (p, x) in partials.iter_mut().zip(T::decode_lane(chunk)) {
            *p += x;
        }
    }
    remainder.iter().fold(horizontal(partials), |acc, x| acc + x.load())
}
