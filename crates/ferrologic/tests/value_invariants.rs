//! Property tests for the `LogicValue` algebra invariants.

use ferrologic::{Bit, LogicValue};
use proptest::prelude::*;

fn arb_bit() -> impl Strategy<Value = Bit> {
    prop_oneof![Just(Bit::Zero), Just(Bit::One), Just(Bit::X), Just(Bit::Z)]
}

fn arb_logic_value(max_width: usize) -> impl Strategy<Value = LogicValue> {
    (1..=max_width)
        .prop_flat_map(|w| proptest::collection::vec(arb_bit(), w).prop_map(LogicValue::from_iter))
}

fn arb_valid_logic_value(max_width: usize) -> impl Strategy<Value = LogicValue> {
    (1..=max_width).prop_flat_map(|w| {
        proptest::collection::vec(prop_oneof![Just(Bit::Zero), Just(Bit::One)], w)
            .prop_map(LogicValue::from_iter)
    })
}

proptest! {
    #[test]
    fn reversed_is_involutive(v in arb_logic_value(64)) {
        prop_assert_eq!(v.reversed().reversed(), v);
    }

    #[test]
    fn not_is_involutive(v in arb_logic_value(64)) {
        prop_assert_eq!(v.not().not(), v);
    }

    #[test]
    fn and_with_self_is_identity(v in arb_logic_value(64)) {
        prop_assert_eq!(v.and(&v).unwrap(), v);
    }

    #[test]
    fn or_with_self_is_identity(v in arb_logic_value(64)) {
        prop_assert_eq!(v.or(&v).unwrap(), v);
    }

    #[test]
    fn xor_with_self_is_zero_when_valid(v in arb_valid_logic_value(64)) {
        let width = v.width();
        prop_assert_eq!(v.xor(&v).unwrap(), LogicValue::filled(width, Bit::Zero));
    }

    #[test]
    fn int_round_trips_through_to_int(i in 0u64..(1u64 << 40), width in 40usize..48) {
        let v = LogicValue::from_int(i as i64, width);
        prop_assert_eq!(v.to_int().unwrap(), i);
    }

    #[test]
    fn add_wraps_modulo_width(a in 0u32..=255, b in 0u32..=255) {
        let av = LogicValue::from_int(a as i64, 8);
        let bv = LogicValue::from_int(b as i64, 8);
        let sum = av.add(&bv).unwrap();
        prop_assert_eq!(sum.to_int().unwrap(), ((a + b) % 256) as u64);
    }

    #[test]
    fn shift_left_then_right_masks_top_bits(v in arb_valid_logic_value(32), k in 0usize..8) {
        let width = v.width();
        let shifted = v.shl(k).lshr(k);
        let keep_bits = width.saturating_sub(k);
        if keep_bits > 0 {
            let mask = LogicValue::from_int(((1u64 << keep_bits) - 1) as i64, width);
            let expected = v.and(&mask).unwrap();
            prop_assert_eq!(shifted, expected);
        } else {
            prop_assert_eq!(shifted, LogicValue::filled(width, Bit::Zero));
        }
    }

    #[test]
    fn radix_round_trips(
        i in 0u32..=255,
        radix in prop_oneof![Just(2u32), Just(4u32), Just(8u32), Just(10u32), Just(16u32)],
    ) {
        let v = LogicValue::from_int(i as i64, 8);
        let s = v.to_radix_string(radix, false, None).unwrap();
        let parsed = LogicValue::of_radix_string(&s, radix, 8).unwrap();
        prop_assert_eq!(parsed, v);
    }
}
