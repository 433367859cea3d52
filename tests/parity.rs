//! Property-based tests across tiers and against the `half` crate.
//!
//! - Vector tiers produce the same bits as the scalar loop
//! - float16/bfloat16 codecs agree with `half` off rounding ties
//! - Compensated sums stay within a tight bound of the exact sum

use proptest::prelude::*;

use elemwise::convert::{f16_to_f32_slice, f32_to_f16_slice};
use elemwise::dynamic::{SliceMut, SliceRef};
use elemwise::ops::{self, UnaryOp};
use elemwise::{Bf16, Capabilities, F16, Tier};

fn all_caps() -> [Capabilities; 3] {
    let caps = Capabilities::get();
    [caps, caps.limit(Tier::X8), Capabilities::scalar()]
}

fn float_ops() -> Vec<UnaryOp> {
    UnaryOp::ALL.into_iter().filter(|op| op.float_only()).collect()
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Codecs against the half crate
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_f16_decode_matches_half(bits in any::<u16>()) {
        let got = F16::from_bits(bits).to_f32();
        let expected = half::f16::from_bits(bits).to_f32();
        prop_assert_eq!(got.to_bits(), expected.to_bits(), "decode of {:#06x}", bits);
    }

    #[test]
    fn prop_f16_encode_matches_half_off_ties(x in -65000.0f32..65000.0) {
        // Bias rounding and round-to-nearest-even only disagree on exact ties
        prop_assume!(x.abs() >= 6.2e-5);
        prop_assume!(x.to_bits() & 0x1FFF != 0x1000);
        let got = F16::from_f32(x).to_bits();
        let expected = half::f16::from_f32(x).to_bits();
        prop_assert_eq!(got, expected, "encode of {}", x);
    }

    #[test]
    fn prop_bf16_decode_matches_half(bits in any::<u16>()) {
        let got = Bf16::from_bits(bits).to_f32();
        let expected = half::bf16::from_bits(bits).to_f32();
        prop_assert_eq!(got.to_bits(), expected.to_bits(), "decode of {:#06x}", bits);
    }

    #[test]
    fn prop_bf16_encode_matches_half_off_ties(x in any::<f32>()) {
        prop_assume!(!x.is_nan());
        prop_assume!(x.to_bits() & 0xFFFF != 0x8000);
        let got = Bf16::from_f32(x).to_bits();
        let expected = half::bf16::from_f32(x).to_bits();
        prop_assert_eq!(got, expected, "encode of {}", x);
    }

    #[test]
    fn prop_f16_round_trip_through_slices(bits in prop::collection::vec(any::<u16>(), 0..80)) {
        let halves: Vec<F16> = bits.iter().copied().map(F16::from_bits).collect();
        for caps in all_caps() {
            let mut wide = vec![0.0f32; halves.len()];
            f16_to_f32_slice(caps, &halves, &mut wide);
            let mut back = vec![F16::ZERO; halves.len()];
            f32_to_f16_slice(caps, &wide, &mut back);
            for (i, (a, b)) in halves.iter().zip(back.iter()).enumerate() {
                // NaN payloads come back quieted
                if a.is_nan() {
                    prop_assert!(b.is_nan(), "NaN lost at {}", i);
                    prop_assert_eq!(b.to_bits(), a.to_bits() | 0x0200);
                } else {
                    prop_assert_eq!(a, b, "mismatch at {}", i);
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Tier parity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_unary_ops_agree_across_tiers(
        values in prop::collection::vec(-50.0f32..50.0, 0..70),
        pick in any::<prop::sample::Index>(),
    ) {
        let ops = float_ops();
        let op = ops[pick.index(ops.len())];
        let halves: Vec<F16> = values.iter().copied().map(F16::from_f32).collect();

        let mut expected = halves.clone();
        SliceMut::from(&mut expected[..]).apply(Capabilities::scalar(), op).unwrap();

        for caps in all_caps() {
            let mut got = halves.clone();
            SliceMut::from(&mut got[..]).apply(caps, op).unwrap();
            prop_assert_eq!(&got, &expected, "{} on {}", op.name(), caps.tier());

            let mut singles = values.clone();
            let mut singles_expected = values.clone();
            SliceMut::from(&mut singles[..]).apply(caps, op).unwrap();
            SliceMut::from(&mut singles_expected[..]).apply(Capabilities::scalar(), op).unwrap();
            let got_bits: Vec<u32> = singles.iter().map(|x| x.to_bits()).collect();
            let expected_bits: Vec<u32> = singles_expected.iter().map(|x| x.to_bits()).collect();
            prop_assert_eq!(got_bits, expected_bits, "f32 {} on {}", op.name(), caps.tier());
        }
    }

    #[test]
    fn prop_constant_ops_agree_across_tiers(
        values in prop::collection::vec(-1.0e4f32..1.0e4, 0..70),
        c in -100.0f32..100.0,
    ) {
        let mut expected = values.clone();
        ops::mul_scalar(Capabilities::scalar(), &mut expected, c);
        ops::add_scalar(Capabilities::scalar(), &mut expected, c);
        ops::rsub_scalar(Capabilities::scalar(), &mut expected, c);

        for caps in all_caps() {
            let mut got = values.clone();
            ops::mul_scalar(caps, &mut got, c);
            ops::add_scalar(caps, &mut got, c);
            ops::rsub_scalar(caps, &mut got, c);
            prop_assert_eq!(&got, &expected, "on {}", caps.tier());
        }
    }

    #[test]
    fn prop_sums_agree_across_tiers_on_exact_data(values in prop::collection::vec(-1000i32..1000, 0..200)) {
        // Small integers in f32 sum exactly in any order
        let floats: Vec<f32> = values.iter().map(|&v| v as f32).collect();
        let exact: i64 = values.iter().map(|&v| i64::from(v)).sum();
        for caps in all_caps() {
            prop_assert_eq!(ops::sum(caps, &floats), exact as f32);
            prop_assert_eq!(ops::sum(caps, &values), exact);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Reductions
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_compensated_sum_is_tight(values in prop::collection::vec(-1.0e3f32..1.0e3, 1..1000)) {
        let exact: f64 = values.iter().map(|&v| f64::from(v)).sum();
        let magnitude: f64 = values.iter().map(|&v| f64::from(v).abs()).sum();
        let got = f64::from(ops::sum_compensated(&values));
        let bound = 2.0 * f64::from(f32::EPSILON) * exact.abs() + 1.0e-8 * magnitude;
        prop_assert!((got - exact).abs() <= bound, "got {}, exact {}, bound {}", got, exact, bound);
    }

    #[test]
    fn prop_min_max_match_iterators(values in prop::collection::vec(-1.0e6f64..1.0e6, 0..100)) {
        let min = values.iter().copied().reduce(f64::min);
        let max = values.iter().copied().reduce(f64::max);
        prop_assert_eq!(ops::min(&values), min);
        prop_assert_eq!(ops::max(&values), max);
    }

    #[test]
    fn prop_dynamic_sum_matches_typed(values in prop::collection::vec(-10.0f32..10.0, 0..100)) {
        let caps = Capabilities::get();
        let halves: Vec<Bf16> = values.iter().copied().map(Bf16::from_f32).collect();
        let typed = ops::sum(caps, &halves);
        let tagged = SliceRef::from(&halves[..]).sum(caps);
        prop_assert_eq!(tagged.to_f64(), f64::from(typed));
    }
}
