//! Elementwise transform engine.
//!
//! [`map`] and [`map_into`] apply a scalar function to every element:
//!
//! - **float16 / bfloat16** with a vector tier: whole lanes (8 or 16) are
//!   decoded to f32, `f` runs on each lane element, the lane is re-encoded.
//!   The remainder goes through the scalar codec one element at a time.
//! - **f32 / f64** with a vector tier: fixed-width chunks, no conversion.
//! - **integers**, or no vector tier: a plain scalar loop.
//!
//! Only load, decode, encode and store are batched. `f` always sees one value
//! at a time, so every path produces the same bits as the scalar loop.
//!
//! # Paired buffers
//!
//! `_into` functions bound the loop by the shorter buffer. With the `checked`
//! feature a length mismatch panics instead.

use crate::caps::{Capabilities, Tier};
use crate::element::{Arith, Element};
use crate::lanes::LaneCodec;

/// Binary operations against a broadcast constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstOp {
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
}

impl ConstOp {
    /// Apply to one value.
    #[inline(always)]
    pub fn apply<A: Arith>(self, x: A, c: A) -> A {
        match self {
            ConstOp::Add => x.plus(c),
            ConstOp::Sub => x.minus(c),
            ConstOp::RSub => c.minus(x),
            ConstOp::Mul => x.times(c),
            ConstOp::Div => x.divide(c),
            ConstOp::Min => x.lesser(c),
            ConstOp::Max => x.greater(c),
        }
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            ConstOp::Add => "add",
            ConstOp::Sub => "sub",
            ConstOp::RSub => "rsub",
            ConstOp::Mul => "mul",
            ConstOp::Div => "div",
            ConstOp::Min => "min",
            ConstOp::Max => "max",
        }
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// Apply `f` to every element in place. Returns the buffer.
#[inline]
pub fn map<T, F>(caps: Capabilities, data: &mut [T], f: F) -> &mut [T]
where
    T: Element,
    F: Fn(T::Compute) -> T::Compute,
{
    T::map_slice(caps, data, f);
    data
}

/// `output[i] = f(input[i])`.
#[inline]
pub fn map_into<T, F>(caps: Capabilities, input: &[T], output: &mut [T], f: F)
where
    T: Element,
    F: Fn(T::Compute) -> T::Compute,
{
    let (input, output) = paired(input, output);
    T::map_slice_into(caps, input, output, f);
}

/// Apply `op` against the constant `c` in place. Returns the buffer.
///
/// Integer [`ConstOp::Div`] by zero panics.
#[inline]
pub fn map_const<T: Element>(caps: Capabilities, data: &mut [T], op: ConstOp, c: T::Compute) -> &mut [T] {
    T::map_const(caps, data, op, c);
    data
}

/// `output[i] = op(input[i], c)`.
#[inline]
pub fn map_const_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    op: ConstOp,
    c: T::Compute,
) {
    let (input, output) = paired(input, output);
    T::map_const_into(caps, input, output, op, c);
}

/// Trim a pair of buffers to a common length.
#[inline(always)]
pub(crate) fn paired<'a, 'b, A, B>(input: &'a [A], output: &'b mut [B]) -> (&'a [A], &'b mut [B]) {
    #[cfg(feature = "checked")]
    assert_eq!(
        input.len(),
        output.len(),
        "length mismatch: input has {} elements, output has {}",
        input.len(),
        output.len()
    );
    let n = input.len().min(output.len());
    (&input[..n], &mut output[..n])
}

// ============================================================================
// Scalar loop
// ============================================================================

#[inline]
pub(crate) fn scalar_map<T, F>(data: &mut [T], f: F)
where
    T: Element,
    F: Fn(T::Compute) -> T::Compute,
{
    for x in data {
        *x = T::store(f(x.load()));
    }
}

#[inline]
pub(crate) fn scalar_map_into<T, F>(input: &[T], output: &mut [T], f: F)
where
    T: Element,
    F: Fn(T::Compute) -> T::Compute,
{
    for (inp, out) in input.iter().zip(output.iter_mut()) {
        *out = T::store(f(inp.load()));
    }
}

// ============================================================================
// Native f32 / f64 lanes
// ============================================================================

pub(crate) fn native_map<T, F>(caps: Capabilities, data: &mut [T], f: F)
where
    T: Element<Compute = T>,
    F: Fn(T) -> T,
{
    match caps.tier() {
        Tier::X16 => native_chunks::<T, F, 16>(data, f),
        Tier::X8 => native_chunks::<T, F, 8>(data, f),
        Tier::Scalar => scalar_map(data, f),
    }
}

pub(crate) fn native_map_into<T, F>(caps: Capabilities, input: &[T], output: &mut [T], f: F)
where
    T: Element<Compute = T>,
    F: Fn(T) -> T,
{
    match caps.tier() {
        Tier::X16 => native_chunks_into::<T, F, 16>(input, output, f),
        Tier::X8 => native_chunks_into::<T, F, 8>(input, output, f),
        Tier::Scalar => scalar_map_into(input, output, f),
    }
}

#[inline(always)]
fn native_chunks<T, F, const N: usize>(data: &mut [T], f: F)
where
    T: Element<Compute = T>,
    F: Fn(T) -> T,
{
    let (chunks, remainder) = data.as_chunks_mut::<N>();
    for chunk in chunks {
        *chunk = chunk.map(&f);
    }
    scalar_map(remainder, f);
}

#[inline(always)]
fn native_chunks_into<T, F, const N: usize>(input: &[T], output: &mut [T], f: F)
where
    T: Element<Compute = T>,
    F: Fn(T) -> T,
{
    let (in_chunks, in_remainder) = input.as_chunks::<N>();
    let (out_chunks, out_remainder) = output.as_chunks_mut::<N>();
    for (inp, out) in in_chunks.iter().zip(out_chunks.iter_mut()) {
        *out = inp.map(&f);
    }
    scalar_map_into(in_remainder, out_remainder, f);
}

// ============================================================================
// float16 / bfloat16 lanes
// ============================================================================

pub(crate) fn half_map<T, F>(caps: Capabilities, data: &mut [T], f: F)
where
    T: Element<Compute = f32> + LaneCodec<8> + LaneCodec<16>,
    F: Fn(f32) -> f32,
{
    match caps.tier() {
        Tier::X16 => half_chunks::<T, F, 16>(data, f),
        Tier::X8 => half_chunks::<T, F, 8>(data, f),
        Tier::Scalar => scalar_map(data, f),
    }
}

pub(crate) fn half_map_into<T, F>(caps: Capabilities, input: &[T], output: &mut [T], f: F)
where
    T: Element<Compute = f32> + LaneCodec<8> + LaneCodec<16>,
    F: Fn(f32) -> f32,
{
    match caps.tier() {
        Tier::X16 => half_chunks_into::<T, F, 16>(input, output, f),
        Tier::X8 => half_chunks_into::<T, F, 8>(input, output, f),
        Tier::Scalar => scalar_map_into(input, output, f),
    }
}

#[inline(always)]
fn half_chunks<T, F, const N: usize>(data: &mut [T], f: F)
where
    T: Element<Compute = f32> + LaneCodec<N>,
    F: Fn(f32) -> f32,
{
    let (chunks, remainder) = data.as_chunks_mut::<N>();
    for chunk in chunks {
        let lane = T::decode_lane(chunk).map(&f);
        *chunk = T::encode_lane(&lane);
    }
    scalar_map(remainder, f);
}

#[inline(always)]
fn half_chunks_into<T, F, const N: usize>(input: &[T], output: &mut [T], f: F)
where
    T: Element<Compute = f32> + LaneCodec<N>,
    F: Fn(f32) -> f32,
{
    let (in_chunks, in_remainder) = input.as_chunks::<N>();
    let (out_chunks, out_remainder) = output.as_chunks_mut::<N>();
    for (inp, out) in in_chunks.iter().zip(out_chunks.iter_mut()) {
        let lane = T::decode_lane(inp).map(&f);
        *out = T::encode_lane(&lane);
    }
    scalar_map_into(in_remainder, out_remainder, f);
}
