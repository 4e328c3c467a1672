//! Scenarios and properties for `Combinational` blocks: loop-limit
//! detection, same-path signal-redriven detection, mutually exclusive
//! branches, and the glitch-at-different-times functional mapping.

use ferrologic::{Bit, Combinational, Conditional, Error, Logic, LogicValue, Simulator};
use proptest::prelude::*;

#[test]
fn self_feeding_not_settles_to_x_after_loop_limit() -> Result<(), Error> {
    Simulator::reset();
    let a = Logic::new(1);
    a.put(LogicValue::from_bool(false))?;
    let not_a = a.not();
    let _block = Combinational::new(vec![Conditional::assign(&a, &not_a)?])?;

    // Kick the cascade: every further `not_a` glitch re-triggers the
    // block synchronously, toggling `a` until the loop limit forces x.
    a.put(LogicValue::from_bool(false))?;

    assert_eq!(a.value(), LogicValue::filled(1, Bit::X));
    Ok(())
}

#[test]
fn same_path_double_assign_is_signal_redriven() -> Result<(), Error> {
    Simulator::reset();
    let a = Logic::new(4);
    let b = Logic::new(4);
    let y = Logic::new(4);
    a.put(LogicValue::from_int(1, 4))?;
    b.put(LogicValue::from_int(2, 4))?;

    let _block = Combinational::new(vec![
        Conditional::assign(&y, &a)?,
        Conditional::assign(&y, &b)?,
    ])?;

    assert_eq!(y.value(), LogicValue::filled(4, Bit::X));
    Ok(())
}

#[test]
fn mutually_exclusive_branches_are_legal() -> Result<(), Error> {
    Simulator::reset();
    let sel = Logic::new(1);
    let a = Logic::new(4);
    let b = Logic::new(4);
    let y = Logic::new(4);
    sel.put(LogicValue::from_bool(true))?;
    a.put(LogicValue::from_int(7, 4))?;
    b.put(LogicValue::from_int(3, 4))?;

    let _block = Combinational::new(vec![Conditional::if_else(
        &sel,
        vec![Conditional::assign(&y, &a)?],
        vec![Conditional::assign(&y, &b)?],
    )])?;

    assert_eq!(y.value(), LogicValue::from_int(7, 4));
    sel.put(LogicValue::from_bool(false))?;
    assert_eq!(y.value(), LogicValue::from_int(3, 4));
    Ok(())
}

proptest! {
    #[test]
    fn adder_tracks_functional_mapping_at_each_glitch(x in 0u32..256, y in 0u32..256) {
        Simulator::reset();
        let a = Logic::new(8);
        let b = Logic::new(8);
        let sum = Logic::new(8);
        a.put(LogicValue::from_int(0, 8)).unwrap();
        b.put(LogicValue::from_int(0, 8)).unwrap();
        let ab_sum = a.add(&b).unwrap();
        let _block = Combinational::new(vec![Conditional::assign(&sum, &ab_sum).unwrap()]).unwrap();

        a.put(LogicValue::from_int(x as i64, 8)).unwrap();
        prop_assert_eq!(sum.value(), LogicValue::from_int(x as i64, 8));

        b.put(LogicValue::from_int(y as i64, 8)).unwrap();
        prop_assert_eq!(sum.value(), LogicValue::from_int(((x + y) % 256) as i64, 8));
    }
}
