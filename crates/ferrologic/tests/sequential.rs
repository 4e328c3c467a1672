//! Scenarios and properties for `Sequential` blocks: clocked counting,
//! reset values, invalid-clock handling, and posedge-fires-once.

use ferrologic::{
    Conditional, Const, Edge, Error, Logic, LogicValue, Sequential, SequentialBuilder, Simulator,
};
use std::cell::Cell;
use std::rc::Rc;

fn toggle_at(clk: &Logic, t: u64, high: bool) -> Result<(), Error> {
    let clk = clk.clone();
    Simulator::register_action(t, move || {
        let _ = clk.put(LogicValue::from_bool(high));
    })?;
    Ok(())
}

#[test]
fn counter_one_tick() -> Result<(), Error> {
    Simulator::reset();
    let clk = Logic::new(1);
    clk.put(LogicValue::from_bool(false))?;
    let reset_net = Logic::new(1);
    let en = Logic::new(1);
    let counter = Logic::new(8);

    let one = Const::new(LogicValue::from_int(1, 8)).logic();
    let incremented = counter.add(&one)?;
    let next_counter = Logic::mux(&en, &incremented, &counter)?;

    let _counter_ff: Sequential = SequentialBuilder::new()
        .trigger(&clk, Edge::Posedge)
        .reset(&reset_net, false)
        .reset_value(&counter, LogicValue::from_int(0, 8))?
        .build(vec![Conditional::assign(&counter, &next_counter)?])?;

    reset_net.put(LogicValue::from_bool(true))?;
    en.put(LogicValue::from_bool(true))?;

    toggle_at(&clk, 5, true)?; // posedge, reset still asserted -> counter = 0
    {
        let reset_net = reset_net.clone();
        Simulator::register_action(10, move || {
            let _ = reset_net.put(LogicValue::from_bool(false));
        })?;
    }
    toggle_at(&clk, 10, false)?;
    toggle_at(&clk, 15, true)?; // posedge, reset deasserted -> counter = 1
    toggle_at(&clk, 20, false)?;
    toggle_at(&clk, 25, true)?; // posedge -> counter = 2
    toggle_at(&clk, 30, false)?;

    Simulator::run()?;

    assert_eq!(Simulator::now(), 30);
    assert_eq!(counter.value(), LogicValue::from_int(2, 8));
    Ok(())
}

#[test]
fn sequential_reset_values() -> Result<(), Error> {
    Simulator::reset();
    let clk = Logic::new(1);
    clk.put(LogicValue::from_bool(false))?;
    let reset_net = Logic::new(1);

    let pi_out = Logic::new(8);
    let pd_out = Logic::new(8);
    let ma_out = Logic::new(8);
    let da_out = Logic::new(8);

    let one = Const::new(LogicValue::from_int(1, 8)).logic();
    let two = Const::new(LogicValue::from_int(2, 8)).logic();

    let next_pi = pi_out.add(&one)?;
    let next_pd = pd_out.sub(&one)?;
    let next_ma = ma_out.mul(&two)?;
    let next_da = da_out.div(&two)?;

    let reset_value = LogicValue::from_int(16, 8);
    let _ff: Sequential = SequentialBuilder::new()
        .trigger(&clk, Edge::Posedge)
        .reset(&reset_net, false)
        .reset_value(&pi_out, reset_value.clone())?
        .reset_value(&pd_out, reset_value.clone())?
        .reset_value(&ma_out, reset_value.clone())?
        .reset_value(&da_out, reset_value)?
        .build(vec![
            Conditional::assign(&pi_out, &next_pi)?,
            Conditional::assign(&pd_out, &next_pd)?,
            Conditional::assign(&ma_out, &next_ma)?,
            Conditional::assign(&da_out, &next_da)?,
        ])?;

    reset_net.put(LogicValue::from_bool(true))?;

    toggle_at(&clk, 5, true)?; // posedge under reset
    {
        let reset_net = reset_net.clone();
        Simulator::register_action(10, move || {
            let _ = reset_net.put(LogicValue::from_bool(false));
        })?;
    }
    toggle_at(&clk, 10, false)?;
    toggle_at(&clk, 15, true)?; // posedge after deassertion

    Simulator::run()?;

    assert_eq!(pi_out.value(), LogicValue::from_int(17, 8));
    assert_eq!(pd_out.value(), LogicValue::from_int(15, 8));
    assert_eq!(ma_out.value(), LogicValue::from_int(32, 8));
    assert_eq!(da_out.value(), LogicValue::from_int(8, 8));
    Ok(())
}

#[test]
fn missing_reset_value_is_construction_error() {
    Simulator::reset();
    let clk = Logic::new(1);
    let reset_net = Logic::new(1);
    let q = Logic::new(1);
    let d = Logic::new(1);
    let result = SequentialBuilder::new()
        .trigger(&clk, Edge::Posedge)
        .reset(&reset_net, false)
        .build(vec![Conditional::assign(&q, &d).unwrap()]);
    assert!(matches!(result, Err(Error::IllegalConfiguration(_))));
}

#[test]
fn duplicate_reset_value_is_construction_error() {
    let q = Logic::new(1);
    let result = SequentialBuilder::new()
        .reset_value(&q, LogicValue::from_bool(false))
        .unwrap()
        .reset_value(&q, LogicValue::from_bool(true));
    assert!(matches!(result, Err(Error::IllegalConfiguration(_))));
}

#[test]
fn empty_trigger_list_is_construction_error() {
    let q = Logic::new(1);
    let d = Logic::new(1);
    let result = SequentialBuilder::new().build(vec![Conditional::assign(&q, &d).unwrap()]);
    assert!(matches!(result, Err(Error::IllegalConfiguration(_))));
}

#[test]
fn invalid_clock_drives_all_x() -> Result<(), Error> {
    Simulator::reset();
    let clk = Logic::new(1);
    clk.put(LogicValue::from_bool(false))?;
    let d = Logic::new(4);
    let q = Logic::new(4);
    d.put(LogicValue::from_int(5, 4))?;

    let _ff: Sequential = SequentialBuilder::new()
        .trigger(&clk, Edge::Posedge)
        .build(vec![Conditional::assign(&q, &d)?])?;

    let clk_clone = clk.clone();
    Simulator::register_action(5, move || {
        let _ = clk_clone.put(LogicValue::filled(1, ferrologic::Bit::X));
    })?;
    Simulator::run()?;

    assert_eq!(q.value(), LogicValue::filled(4, ferrologic::Bit::X));
    Ok(())
}

#[test]
fn posedge_fires_exactly_once_per_rising_transition() -> Result<(), Error> {
    Simulator::reset();
    let clk = Logic::new(1);
    clk.put(LogicValue::from_bool(false))?;
    let count = Rc::new(Cell::new(0u32));
    {
        let count = count.clone();
        clk.on_posedge(move |_| count.set(count.get() + 1));
    }

    for step in 1..=9u64 {
        let t = step * 5;
        let want_high = step % 2 == 1;
        toggle_at(&clk, t, want_high)?;
    }
    Simulator::run()?;

    // Rising edges land at t = 5, 15, 25, 35, 45.
    assert_eq!(count.get(), 5);
    Ok(())
}
