//! For a conditional tree without invalid bits on its conditions,
//! evaluating it through `Combinational` and through a `Sequential`
//! with a single posedge trigger produces the same successor mapping:
//! the registered value after one clock edge matches the combinational
//! output computed from the same inputs.

use ferrologic::{Conditional, Edge, Error, Logic, LogicValue, Sequential, SequentialBuilder, Simulator};
use proptest::prelude::*;

fn build_tree(sel: &Logic, a: &Logic, b: &Logic, y: &Logic) -> Result<Conditional, Error> {
    Ok(Conditional::if_else(
        sel,
        vec![Conditional::assign(y, a)?],
        vec![Conditional::assign(y, b)?],
    ))
}

fn run_case(sel_bit: bool, a_val: u32, b_val: u32) -> Result<(LogicValue, LogicValue), Error> {
    Simulator::reset();

    let sel = Logic::new(1);
    let a = Logic::new(8);
    let b = Logic::new(8);
    sel.put(LogicValue::from_bool(sel_bit))?;
    a.put(LogicValue::from_int(a_val as i64, 8))?;
    b.put(LogicValue::from_int(b_val as i64, 8))?;

    let y_comb = Logic::new(8);
    let _comb = ferrologic::Combinational::new(vec![build_tree(&sel, &a, &b, &y_comb)?])?;

    let clk = Logic::new(1);
    clk.put(LogicValue::from_bool(false))?;
    let y_seq = Logic::new(8);
    let _seq: Sequential = SequentialBuilder::new()
        .trigger(&clk, Edge::Posedge)
        .build(vec![build_tree(&sel, &a, &b, &y_seq)?])?;

    let clk_clone = clk.clone();
    Simulator::register_action(5, move || {
        let _ = clk_clone.put(LogicValue::from_bool(true));
    })?;
    Simulator::run()?;

    Ok((y_comb.value(), y_seq.value()))
}

#[test]
fn select_true_matches_across_both_encodings() -> Result<(), Error> {
    let (comb, seq) = run_case(true, 42, 7)?;
    assert_eq!(comb, LogicValue::from_int(42, 8));
    assert_eq!(seq, comb);
    Ok(())
}

#[test]
fn select_false_matches_across_both_encodings() -> Result<(), Error> {
    let (comb, seq) = run_case(false, 42, 7)?;
    assert_eq!(comb, LogicValue::from_int(7, 8));
    assert_eq!(seq, comb);
    Ok(())
}

proptest! {
    #[test]
    fn combinational_and_single_trigger_sequential_agree(
        sel_bit in any::<bool>(),
        a_val in 0u32..256,
        b_val in 0u32..256,
    ) {
        let (comb, seq) = run_case(sel_bit, a_val, b_val).unwrap();
        prop_assert_eq!(seq, comb);
    }
}
