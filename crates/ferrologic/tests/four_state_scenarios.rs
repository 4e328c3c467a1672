//! Concrete value-algebra scenarios: four-valued NOT/AND, swizzle+slice,
//! divide-by-zero, and shift-by-huge-shamt.

use ferrologic::{Bit, LogicValue};

fn msb_first(s: &str) -> LogicValue {
    LogicValue::from_str(s).unwrap()
}

#[test]
fn not_with_four_valued_inputs() {
    let a = msb_first("01xz");
    assert_eq!(a.not(), msb_first("10xx"));
}

#[test]
fn and_truth_table_slice() {
    let a = msb_first("00001111xxxxzzzz");
    let b = msb_first("01xz01xz01xz01xz");
    assert_eq!(a.and(&b).unwrap(), msb_first("000001xx0xxx0xxx"));
}

#[test]
fn swizzle_then_slice() {
    let a = LogicValue::from_int(0xAA, 8);
    let b = LogicValue::from_int(0x55, 8);
    let concat = LogicValue::swizzle(&[b.clone(), a.clone()]);
    assert_eq!(concat, LogicValue::from_int(0x55AA, 16));
    let low3 = concat.slice(0, 2).unwrap();
    assert_eq!(low3, LogicValue::from_int(0b010, 3));
}

#[test]
fn divide_by_zero_is_all_x() {
    let a = msb_first("0100");
    let b = msb_first("0000");
    assert_eq!(a.div(&b).unwrap(), LogicValue::filled(4, Bit::X));
}

#[test]
fn shift_by_huge_shamt() {
    // A negative shamt takes the same "past the width" path as an
    // astronomically large one (see `value::shift::Shamt::from<i64>`).
    let v = LogicValue::filled(200, Bit::One);
    assert_eq!(v.lshr(-1i64), LogicValue::filled(200, Bit::Zero));
    assert_eq!(v.ashr(-1i64), LogicValue::filled(200, Bit::One));
}
