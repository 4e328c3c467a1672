//! Port-boundary contract: `Logic::drive` across two `Scope`s is
//! rejected unless the crossing net is registered as an input on the
//! destination side or an output on the source side.

use ferrologic::{Error, Logic, LogicValue, Scope, Simulator};

#[test]
fn cross_scope_drive_without_registration_is_rejected() -> Result<(), Error> {
    Simulator::reset();
    let outer = Scope::root();
    let inner = Scope::new();

    let source = Logic::new_in(4, outer);
    let dest = Logic::new_in(4, inner);

    let result = dest.drive(&source);
    assert!(matches!(result, Err(Error::PortRulesViolation(_))));
    Ok(())
}

#[test]
fn cross_scope_drive_allowed_via_registered_output() -> Result<(), Error> {
    Simulator::reset();
    let outer = Scope::root();
    let inner = Scope::new();

    let source = Logic::new_in(4, outer.clone());
    source.put(LogicValue::from_int(5, 4))?;
    let dest = Logic::new_in(4, inner);

    outer.add_output(source.id());
    dest.drive(&source)?;

    assert_eq!(dest.value(), LogicValue::from_int(5, 4));
    Ok(())
}

#[test]
fn cross_scope_drive_allowed_via_registered_input() -> Result<(), Error> {
    Simulator::reset();
    let outer = Scope::root();
    let inner = Scope::new();

    let source = Logic::new_in(4, outer);
    source.put(LogicValue::from_int(9, 4))?;
    let dest = Logic::new_in(4, inner.clone());

    inner.add_input(dest.id());
    dest.drive(&source)?;

    assert_eq!(dest.value(), LogicValue::from_int(9, 4));
    Ok(())
}

#[test]
fn same_scope_drive_never_needs_registration() -> Result<(), Error> {
    Simulator::reset();
    let scope = Scope::new();
    let source = Logic::new_in(4, scope.clone());
    source.put(LogicValue::from_int(7, 4))?;
    let dest = Logic::new_in(4, scope);

    dest.drive(&source)?;
    assert_eq!(dest.value(), LogicValue::from_int(7, 4));
    Ok(())
}
