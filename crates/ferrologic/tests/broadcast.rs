//! Regression test for `Broadcast`'s defer-and-swap `fire`: a listener
//! that subscribes a new listener from inside its own callback must not
//! panic (double borrow) or have the new listener run during the glitch
//! that spawned it.

use ferrologic::{Error, Logic, LogicValue, Simulator};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn listener_subscribing_a_listener_does_not_fire_it_this_round() -> Result<(), Error> {
    Simulator::reset();
    let a = Logic::new(4);
    a.put(LogicValue::from_int(0, 4))?;

    let late_fires = Rc::new(Cell::new(0u32));
    let spawned = Rc::new(Cell::new(false));

    {
        let a_for_sub = a.clone();
        let late_fires = late_fires.clone();
        let spawned = spawned.clone();
        a.on_glitch(move |_| {
            if !spawned.get() {
                spawned.set(true);
                let late_fires = late_fires.clone();
                // Subscribing from inside a firing listener must not panic.
                a_for_sub.on_glitch(move |_| late_fires.set(late_fires.get() + 1));
            }
        });
    }

    // First glitch: spawns the late listener. Defer-and-swap means it is
    // appended after this round's dispatch loop, so it must not fire yet.
    a.put(LogicValue::from_int(1, 4))?;
    assert_eq!(late_fires.get(), 0);

    // Second glitch: the late listener is now part of the main list.
    a.put(LogicValue::from_int(2, 4))?;
    assert_eq!(late_fires.get(), 1);

    a.put(LogicValue::from_int(3, 4))?;
    assert_eq!(late_fires.get(), 2);

    Ok(())
}
