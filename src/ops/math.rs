//! Floating-point math.
//!
//! Available when the element computes in a float (`f32`, `f64`, [`F16`],
//! [`Bf16`]). 16-bit formats evaluate in f32 and round once on store.
//!
//! [`F16`]: crate::F16
//! [`Bf16`]: crate::Bf16

use num_traits::Float;

use super::UnaryOp;
use crate::caps::Capabilities;
use crate::element::Element;
use crate::engine;
use crate::mlaf::mlaf;

mod scalar {
    use num_traits::Float;

    #[inline(always)]
    pub(super) fn rsqrt<C: Float>(x: C) -> C {
        x.sqrt().recip()
    }

    #[inline(always)]
    pub(super) fn sigmoid<C: Float>(x: C) -> C {
        (C::one() + (-x).exp()).recip()
    }
}

macro_rules! float_unary {
    ($($(#[$doc:meta])* $variant:ident => $name:ident, $into:ident, $kernel:expr;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name<T: Element>(caps: Capabilities, data: &mut [T]) -> &mut [T]
            where
                T::Compute: Float,
            {
                let f: fn(T::Compute) -> T::Compute = $kernel;
                engine::map(caps, data, f)
            }

            #[doc = concat!("[`", stringify!($name), "`] from `input` into `output`.")]
            #[inline]
            pub fn $into<T: Element>(caps: Capabilities, input: &[T], output: &mut [T])
            where
                T::Compute: Float,
            {
                let f: fn(T::Compute) -> T::Compute = $kernel;
                engine::map_into(caps, input, output, f);
            }
        )*

        /// The scalar kernel behind a float-only [`UnaryOp`].
        pub(crate) fn float_kernel<C: Float>(op: UnaryOp) -> Option<fn(C) -> C> {
            match op {
                $(UnaryOp::$variant => {
                    let f: fn(C) -> C = $kernel;
                    Some(f)
                })*
                _ => None,
            }
        }
    };
}

float_unary! {
    /// Square root. Negative inputs give NaN.
    Sqrt => sqrt, sqrt_into, Float::sqrt;
    /// `1 / sqrt(x)`.
    Rsqrt => rsqrt, rsqrt_into, scalar::rsqrt;
    /// `1 / x`.
    Recip => recip, recip_into, Float::recip;
    /// Cube root.
    Cbrt => cbrt, cbrt_into, Float::cbrt;
    /// Sine (radians).
    Sin => sin, sin_into, Float::sin;
    /// Cosine (radians).
    Cos => cos, cos_into, Float::cos;
    /// Tangent (radians).
    Tan => tan, tan_into, Float::tan;
    /// Arcsine. Outside `[-1, 1]` gives NaN.
    Asin => asin, asin_into, Float::asin;
    /// Arccosine. Outside `[-1, 1]` gives NaN.
    Acos => acos, acos_into, Float::acos;
    /// Arctangent.
    Atan => atan, atan_into, Float::atan;
    /// Hyperbolic sine.
    Sinh => sinh, sinh_into, Float::sinh;
    /// Hyperbolic cosine.
    Cosh => cosh, cosh_into, Float::cosh;
    /// Hyperbolic tangent.
    Tanh => tanh, tanh_into, Float::tanh;
    /// Inverse hyperbolic sine.
    Asinh => asinh, asinh_into, Float::asinh;
    /// Inverse hyperbolic cosine.
    Acosh => acosh, acosh_into, Float::acosh;
    /// Inverse hyperbolic tangent.
    Atanh => atanh, atanh_into, Float::atanh;
    /// `e^x`.
    Exp => exp, exp_into, Float::exp;
    /// `2^x`.
    Exp2 => exp2, exp2_into, Float::exp2;
    /// `e^x - 1`, accurate near zero.
    ExpM1 => exp_m1, exp_m1_into, Float::exp_m1;
    /// Natural logarithm.
    Ln => ln, ln_into, Float::ln;
    /// Base-2 logarithm.
    Log2 => log2, log2_into, Float::log2;
    /// Base-10 logarithm.
    Log10 => log10, log10_into, Float::log10;
    /// `ln(1 + x)`, accurate near zero.
    Ln1p => ln_1p, ln_1p_into, Float::ln_1p;
    /// Round toward negative infinity.
    Floor => floor, floor_into, Float::floor;
    /// Round toward positive infinity.
    Ceil => ceil, ceil_into, Float::ceil;
    /// Round to nearest, ties away from zero.
    Round => round, round_into, Float::round;
    /// Round toward zero.
    Trunc => trunc, trunc_into, Float::trunc;
    /// `x - trunc(x)`.
    Fract => fract, fract_into, Float::fract;
    /// Logistic function `1 / (1 + e^-x)`.
    Sigmoid => sigmoid, sigmoid_into, scalar::sigmoid;
}

/// `x^p` in place.
#[inline]
pub fn powf_scalar<T: Element>(caps: Capabilities, data: &mut [T], p: T::Compute) -> &mut [T]
where
    T::Compute: Float,
{
    engine::map(caps, data, |x: T::Compute| x.powf(p))
}

/// [`powf_scalar`] from `input` into `output`.
#[inline]
pub fn powf_scalar_into<T: Element>(caps: Capabilities, input: &[T], output: &mut [T], p: T::Compute)
where
    T::Compute: Float,
{
    engine::map_into(caps, input, output, |x: T::Compute| x.powf(p));
}

/// `x * a + b` in place, fused when the build has FMA.
#[inline]
pub fn mul_add_scalar<T: Element>(
    caps: Capabilities,
    data: &mut [T],
    a: T::Compute,
    b: T::Compute,
) -> &mut [T]
where
    T::Compute: Float,
{
    engine::map(caps, data, |x: T::Compute| mlaf(b, x, a))
}

/// [`mul_add_scalar`] from `input` into `output`.
#[inline]
pub fn mul_add_scalar_into<T: Element>(
    caps: Capabilities,
    input: &[T],
    output: &mut [T],
    a: T::Compute,
    b: T::Compute,
) where
    T::Compute: Float,
{
    engine::map_into(caps, input, output, |x: T::Compute| mlaf(b, x, a));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::Tier;
    use crate::{Bf16, F16};

    fn all_caps() -> [Capabilities; 3] {
        let caps = Capabilities::get();
        [caps, caps.limit(Tier::X8), Capabilities::scalar()]
    }

    #[test]
    fn test_sqrt_f32_matches_std() {
        let input: Vec<f32> = (0..100).map(|i| i as f32 * 0.37).collect();
        for caps in all_caps() {
            let mut out = vec![0.0f32; input.len()];
            sqrt_into(caps, &input, &mut out);
            for (i, (&got, &x)) in out.iter().zip(input.iter()).enumerate() {
                assert_eq!(got, x.sqrt(), "mismatch at {}: got {}, expected {}", i, got, x.sqrt());
            }
        }
    }

    #[test]
    fn test_every_kernel_matches_scalar_tier_on_halves() {
        let input: Vec<F16> = (0..45).map(|i| F16::from_f32(i as f32 / 9.0 - 2.5)).collect();
        for op in UnaryOp::ALL {
            let Some(kernel) = float_kernel::<f32>(op) else {
                continue;
            };
            let mut expected = vec![F16::ZERO; input.len()];
            engine::map_into(Capabilities::scalar(), &input, &mut expected, kernel);
            for caps in all_caps() {
                let mut got = vec![F16::ZERO; input.len()];
                engine::map_into(caps, &input, &mut got, kernel);
                assert_eq!(got, expected, "{} on {}", op.name(), caps.tier());
            }
        }
    }

    #[test]
    fn test_rounding_family() {
        let caps = Capabilities::get();
        let input = [-2.5f64, -0.5, 0.5, 1.5, 2.7];

        let mut out = [0.0f64; 5];
        round_into(caps, &input, &mut out);
        assert_eq!(out, [-3.0, -1.0, 1.0, 2.0, 3.0]);
        floor_into(caps, &input, &mut out);
        assert_eq!(out, [-3.0, -1.0, 0.0, 1.0, 2.0]);
        ceil_into(caps, &input, &mut out);
        assert_eq!(out, [-2.0, -0.0, 1.0, 2.0, 3.0]);
        trunc_into(caps, &input, &mut out);
        assert_eq!(out, [-2.0, -0.0, 0.0, 1.0, 2.0]);
        fract_into(caps, &input, &mut out);
        assert_eq!(out[0], -0.5);
        assert!((out[4] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_exp_log_family() {
        let caps = Capabilities::get();
        let mut data = [1.0f32, 2.0, 8.0];
        log2(caps, &mut data);
        assert_eq!(data, [0.0, 1.0, 3.0]);
        exp2(caps, &mut data);
        assert_eq!(data, [1.0, 2.0, 8.0]);

        let mut tiny = [1e-10f64];
        ln_1p(caps, &mut tiny);
        assert!((tiny[0] - 1e-10).abs() < 1e-20);
        exp_m1(caps, &mut tiny);
        assert!((tiny[0] - 1e-10).abs() < 1e-20);

        let mut neg = [-1.0f32];
        ln(caps, &mut neg);
        assert!(neg[0].is_nan());
    }

    #[test]
    fn test_sigmoid_and_rsqrt() {
        let caps = Capabilities::get();
        let mut data = [0.0f32, 100.0, -100.0];
        sigmoid(caps, &mut data);
        assert_eq!(data[0], 0.5);
        assert!((data[1] - 1.0).abs() < 1e-6);
        assert!(data[2] < 1e-6);

        let mut roots = [4.0f64, 0.25];
        rsqrt(caps, &mut roots);
        assert_eq!(roots, [0.5, 2.0]);
    }

    #[test]
    fn test_trig_bf16() {
        let caps = Capabilities::get();
        let input: Vec<Bf16> = (0..20).map(|i| Bf16::from_f32(i as f32 * 0.1)).collect();
        let mut out = vec![Bf16::ZERO; 20];
        sin_into(caps, &input, &mut out);
        for (x, s) in input.iter().zip(out.iter()) {
            assert_eq!(*s, Bf16::from_f32(x.to_f32().sin()));
        }
    }

    #[test]
    fn test_powf_and_mul_add() {
        let caps = Capabilities::get();
        let mut data: Vec<f32> = (1..=20).map(|i| i as f32).collect();
        powf_scalar(caps, &mut data, 2.0);
        assert_eq!(data[19], 400.0);

        let input = [1.0f64, 2.0, 3.0];
        let mut out = [0.0f64; 3];
        mul_add_scalar_into(caps, &input, &mut out, 2.0, 1.0);
        assert_eq!(out, [3.0, 5.0, 7.0]);

        let mut halves = [F16::ONE; 10];
        mul_add_scalar(caps, &mut halves, 0.5, 0.25);
        assert!(halves.iter().all(|&h| h == F16::from_f32(0.75)));
    }

    #[test]
    fn test_domain_edges_are_values() {
        let caps = Capabilities::get();
        let mut data = [-1.0f32, 2.0, 1.0, -1.0];
        atanh(caps, &mut data);
        assert_eq!(data[0], f32::NEG_INFINITY);
        assert!(data[1].is_nan());
        assert_eq!(data[2], f32::INFINITY);

        let mut half = [F16::from_f32(-4.0)];
        sqrt(caps, &mut half);
        assert!(half[0].is_nan());

        let mut zero = [0.0f64];
        recip(caps, &mut zero);
        assert_eq!(zero[0], f64::INFINITY);
    }
}
