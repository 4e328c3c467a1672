//! `Combinational::ssa` lowering: read-before-write rejection, last-write-wins
//! versioning, and that the lowered block behaves like a hand-built one.

use ferrologic::{Combinational, Error, Logic, LogicValue, Simulator};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn read_before_write_is_uninitialized_signal() -> Result<(), Error> {
    Simulator::reset();
    let a = Logic::new(4);
    let captured: Rc<RefCell<Option<Error>>> = Rc::new(RefCell::new(None));
    let captured_inner = captured.clone();

    let result = Combinational::ssa(move |b| {
        let sig = b.signal(&a);
        if let Err(e) = b.read(&sig) {
            *captured_inner.borrow_mut() = Some(e);
        }
    });

    // Nothing was written, so lowering produces an empty statement list
    // and construction itself succeeds; the error surfaces from `read`.
    assert!(result.is_ok());
    assert!(matches!(
        captured.borrow().as_ref(),
        Some(Error::UninitializedSignal(_))
    ));
    Ok(())
}

#[test]
fn last_write_wins_for_repeated_writes() -> Result<(), Error> {
    Simulator::reset();
    let a = Logic::new(8);
    let y = Logic::new(8);
    a.put(LogicValue::from_int(3, 8))?;

    let first_const = ferrologic::Const::new(LogicValue::from_int(10, 8)).logic();

    let _block = Combinational::ssa(|b| {
        let y_sig = b.signal(&y);
        b.write(&y_sig, &first_const).unwrap();
        b.write(&y_sig, &a).unwrap(); // last write wins, y now tracks `a` directly
    })?;

    // Only the last write (tracking `a`) should have survived lowering.
    assert_eq!(y.value(), LogicValue::from_int(3, 8));
    a.put(LogicValue::from_int(9, 8))?;
    assert_eq!(y.value(), LogicValue::from_int(9, 8));
    Ok(())
}

#[test]
fn ssa_block_reacts_like_a_hand_built_combinational() -> Result<(), Error> {
    Simulator::reset();
    let a = Logic::new(8);
    let b_net = Logic::new(8);
    let sum = Logic::new(8);
    a.put(LogicValue::from_int(0, 8))?;
    b_net.put(LogicValue::from_int(0, 8))?;

    let _block = Combinational::ssa(|b| {
        let sig = b.signal(&sum);
        let ab_sum = a.add(&b_net).unwrap();
        b.write(&sig, &ab_sum).unwrap();
    })?;

    a.put(LogicValue::from_int(12, 8))?;
    b_net.put(LogicValue::from_int(30, 8))?;
    assert_eq!(sum.value(), LogicValue::from_int(42, 8));
    Ok(())
}

#[test]
fn read_reflects_most_recent_write() -> Result<(), Error> {
    Simulator::reset();
    let a = Logic::new(8);
    let y = Logic::new(8);
    let readback: Rc<RefCell<Option<LogicValue>>> = Rc::new(RefCell::new(None));
    let readback_inner = readback.clone();

    let ten = ferrologic::Const::new(LogicValue::from_int(10, 8)).logic();
    let twenty = ferrologic::Const::new(LogicValue::from_int(20, 8)).logic();

    let y_for_closure = y.clone();
    let _block = Combinational::ssa(move |b| {
        let sig = b.signal(&a);
        b.write(&sig, &ten).unwrap();
        b.write(&sig, &twenty).unwrap();
        let latest = b.read(&sig).unwrap();
        *readback_inner.borrow_mut() = Some(latest.value());
        let y_sig = b.signal(&y_for_closure);
        b.write(&y_sig, &latest).unwrap();
    })?;

    assert_eq!(readback.borrow().clone(), Some(LogicValue::from_int(20, 8)));
    assert_eq!(y.value(), LogicValue::from_int(20, 8));
    Ok(())
}
