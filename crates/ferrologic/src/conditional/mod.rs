//! The procedural conditional engine (spec component D): imperative
//! statement trees lowered into trigger-driven execution over the
//! signal graph.
//!
//! A [`Conditional`] is a value, but carries a shared "attached" flag so
//! that reusing the same instance across two blocks is caught at
//! construction (spec §9, "Conditional tree sharing").

mod sequential;
mod ssa;

pub use sequential::{Sequential, SequentialBuilder};
pub use ssa::{SsaBuilder, SsaSignal};

use crate::{Bit, Error, HashMap, Logic, LogicValue, Result};
use std::cell::Cell;
use std::rc::Rc;

/// `none`/`priority` both take the first match; `unique` additionally
/// requires that at most one item matches (multiple matches drive `x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePriority {
    None,
    Priority,
    Unique,
}

#[derive(Clone)]
pub struct CaseItem {
    pub pattern: Logic,
    pub body: Vec<Conditional>,
}

/// Like [`CaseItem`], but `z`/`x` bits in `pattern`'s *value* (sampled at
/// match time) are wildcards rather than requiring an exact match.
#[derive(Clone)]
pub struct CaseZItem {
    pub pattern: Logic,
    pub body: Vec<Conditional>,
}

#[derive(Clone)]
pub struct ElseIfArm {
    pub condition: Logic,
    pub body: Vec<Conditional>,
}

#[derive(Clone)]
pub struct IfBlock {
    pub first_condition: Logic,
    pub first_body: Vec<Conditional>,
    pub else_ifs: Vec<ElseIfArm>,
    pub else_body: Option<Vec<Conditional>>,
}

#[derive(Clone)]
struct CaseSpec {
    expression: Logic,
    items: Vec<CaseItem>,
    default: Option<Vec<Conditional>>,
    priority: CasePriority,
}

#[derive(Clone)]
struct CaseZSpec {
    expression: Logic,
    items: Vec<CaseZItem>,
    default: Option<Vec<Conditional>>,
    priority: CasePriority,
}

#[derive(Clone)]
enum Kind {
    Assign(Logic, Logic),
    If(Logic, Vec<Conditional>, Vec<Conditional>),
    IfBlock(IfBlock),
    Case(CaseSpec),
    CaseZ(CaseZSpec),
}

/// A single statement in a procedural block's body. Constructed through
/// the associated functions below, never matched on directly, since the
/// attachment tag must travel with every clone.
#[derive(Clone)]
pub struct Conditional {
    attached: Rc<Cell<bool>>,
    kind: Kind,
}

impl Conditional {
    pub fn assign(receiver: &Logic, driver: &Logic) -> Result<Conditional> {
        if receiver.width() != driver.width() {
            return Err(Error::WidthMismatch {
                expected: receiver.width(),
                actual: driver.width(),
            });
        }
        Ok(Conditional {
            attached: Rc::new(Cell::new(false)),
            kind: Kind::Assign(receiver.clone(), driver.clone()),
        })
    }

    pub fn if_else(
        condition: &Logic,
        then_body: Vec<Conditional>,
        else_body: Vec<Conditional>,
    ) -> Conditional {
        Conditional {
            attached: Rc::new(Cell::new(false)),
            kind: Kind::If(condition.clone(), then_body, else_body),
        }
    }

    pub fn if_block(block: IfBlock) -> Conditional {
        Conditional {
            attached: Rc::new(Cell::new(false)),
            kind: Kind::IfBlock(block),
        }
    }

    pub fn case(
        expression: &Logic,
        items: Vec<CaseItem>,
        default: Option<Vec<Conditional>>,
        priority: CasePriority,
    ) -> Result<Conditional> {
        for item in &items {
            if item.pattern.width() != expression.width() {
                return Err(Error::WidthMismatch {
                    expected: expression.width(),
                    actual: item.pattern.width(),
                });
            }
        }
        Ok(Conditional {
            attached: Rc::new(Cell::new(false)),
            kind: Kind::Case(CaseSpec {
                expression: expression.clone(),
                items,
                default,
                priority,
            }),
        })
    }

    pub fn casez(
        expression: &Logic,
        items: Vec<CaseZItem>,
        default: Option<Vec<Conditional>>,
        priority: CasePriority,
    ) -> Result<Conditional> {
        for item in &items {
            if item.pattern.width() != expression.width() {
                return Err(Error::WidthMismatch {
                    expected: expression.width(),
                    actual: item.pattern.width(),
                });
            }
        }
        Ok(Conditional {
            attached: Rc::new(Cell::new(false)),
            kind: Kind::CaseZ(CaseZSpec {
                expression: expression.clone(),
                items,
                default,
                priority,
            }),
        })
    }

    fn attach(&self) -> Result<()> {
        if self.attached.replace(true) {
            return Err(Error::MultiBlock(
                "conditional instance already attached to an enclosing block".to_string(),
            ));
        }
        match &self.kind {
            Kind::Assign(..) => {}
            Kind::If(_, then_body, else_body) => {
                attach_all(then_body)?;
                attach_all(else_body)?;
            }
            Kind::IfBlock(block) => {
                attach_all(&block.first_body)?;
                for arm in &block.else_ifs {
                    attach_all(&arm.body)?;
                }
                if let Some(body) = &block.else_body {
                    attach_all(body)?;
                }
            }
            Kind::Case(spec) => {
                for item in &spec.items {
                    attach_all(&item.body)?;
                }
                if let Some(default) = &spec.default {
                    attach_all(default)?;
                }
            }
            Kind::CaseZ(spec) => {
                for item in &spec.items {
                    attach_all(&item.body)?;
                }
                if let Some(default) = &spec.default {
                    attach_all(default)?;
                }
            }
        }
        Ok(())
    }

    fn collect_driven(&self, out: &mut Vec<Logic>) {
        match &self.kind {
            Kind::Assign(r, _) => out.push(r.clone()),
            Kind::If(_, then_body, else_body) => {
                collect_driven_all(then_body, out);
                collect_driven_all(else_body, out);
            }
            Kind::IfBlock(block) => {
                collect_driven_all(&block.first_body, out);
                for arm in &block.else_ifs {
                    collect_driven_all(&arm.body, out);
                }
                if let Some(body) = &block.else_body {
                    collect_driven_all(body, out);
                }
            }
            Kind::Case(spec) => {
                for item in &spec.items {
                    collect_driven_all(&item.body, out);
                }
                if let Some(default) = &spec.default {
                    collect_driven_all(default, out);
                }
            }
            Kind::CaseZ(spec) => {
                for item in &spec.items {
                    collect_driven_all(&item.body, out);
                }
                if let Some(default) = &spec.default {
                    collect_driven_all(default, out);
                }
            }
        }
    }

    fn collect_sensitivity(&self, out: &mut Vec<Logic>) {
        match &self.kind {
            Kind::Assign(_, d) => out.push(d.clone()),
            Kind::If(cond, then_body, else_body) => {
                out.push(cond.clone());
                collect_sensitivity_all(then_body, out);
                collect_sensitivity_all(else_body, out);
            }
            Kind::IfBlock(block) => {
                out.push(block.first_condition.clone());
                collect_sensitivity_all(&block.first_body, out);
                for arm in &block.else_ifs {
                    out.push(arm.condition.clone());
                    collect_sensitivity_all(&arm.body, out);
                }
                if let Some(body) = &block.else_body {
                    collect_sensitivity_all(body, out);
                }
            }
            Kind::Case(spec) => {
                out.push(spec.expression.clone());
                for item in &spec.items {
                    out.push(item.pattern.clone());
                    collect_sensitivity_all(&item.body, out);
                }
                if let Some(default) = &spec.default {
                    collect_sensitivity_all(default, out);
                }
            }
            Kind::CaseZ(spec) => {
                out.push(spec.expression.clone());
                for item in &spec.items {
                    out.push(item.pattern.clone());
                    collect_sensitivity_all(&item.body, out);
                }
                if let Some(default) = &spec.default {
                    collect_sensitivity_all(default, out);
                }
            }
        }
    }

    /// Executes this statement against `pending`, recording the walk's
    /// drives. Returns `Err(SignalRedriven)` if this walk assigns the
    /// same receiver twice.
    fn execute(&self, pending: &mut HashMap<u64, (Logic, LogicValue)>) -> Result<()> {
        match &self.kind {
            Kind::Assign(receiver, driver) => {
                if pending.contains_key(&receiver.id()) {
                    return Err(Error::SignalRedriven(format!(
                        "net {} driven twice along one execution path",
                        receiver.id()
                    )));
                }
                pending.insert(receiver.id(), (receiver.clone(), driver.value()));
                Ok(())
            }
            Kind::If(cond, then_body, else_body) => {
                match cond.value().bit_at_unsigned(0) {
                    Bit::One => execute_all(then_body, pending),
                    Bit::Zero => execute_all(else_body, pending),
                    _ => {
                        let mut touched = Vec::new();
                        collect_driven_all(then_body, &mut touched);
                        collect_driven_all(else_body, &mut touched);
                        mark_invalid(&touched, pending);
                        Ok(())
                    }
                }
            }
            Kind::IfBlock(block) => execute_if_block(block, pending),
            Kind::Case(spec) => execute_case(spec, pending),
            Kind::CaseZ(spec) => execute_casez(spec, pending),
        }
    }
}

fn attach_all(statements: &[Conditional]) -> Result<()> {
    for s in statements {
        s.attach()?;
    }
    Ok(())
}

fn collect_driven_all(statements: &[Conditional], out: &mut Vec<Logic>) {
    for s in statements {
        s.collect_driven(out);
    }
}

fn collect_sensitivity_all(statements: &[Conditional], out: &mut Vec<Logic>) {
    for s in statements {
        s.collect_sensitivity(out);
    }
}

fn execute_all(statements: &[Conditional], pending: &mut HashMap<u64, (Logic, LogicValue)>) -> Result<()> {
    for s in statements {
        s.execute(pending)?;
    }
    Ok(())
}

fn mark_invalid(nets: &[Logic], pending: &mut HashMap<u64, (Logic, LogicValue)>) {
    for net in nets {
        pending
            .entry(net.id())
            .or_insert_with(|| (net.clone(), LogicValue::filled(net.width(), Bit::X)));
    }
}

fn execute_if_block(block: &IfBlock, pending: &mut HashMap<u64, (Logic, LogicValue)>) -> Result<()> {
    match block.first_condition.value().bit_at_unsigned(0) {
        Bit::One => return execute_all(&block.first_body, pending),
        Bit::Zero => {}
        _ => return mark_if_block_invalid(block, pending),
    }
    for arm in &block.else_ifs {
        match arm.condition.value().bit_at_unsigned(0) {
            Bit::One => return execute_all(&arm.body, pending),
            Bit::Zero => continue,
            _ => return mark_if_block_invalid(block, pending),
        }
    }
    if let Some(body) = &block.else_body {
        execute_all(body, pending)
    } else {
        Ok(())
    }
}

fn mark_if_block_invalid(block: &IfBlock, pending: &mut HashMap<u64, (Logic, LogicValue)>) -> Result<()> {
    let mut touched = Vec::new();
    collect_driven_all(&block.first_body, &mut touched);
    for arm in &block.else_ifs {
        collect_driven_all(&arm.body, &mut touched);
    }
    if let Some(body) = &block.else_body {
        collect_driven_all(body, &mut touched);
    }
    mark_invalid(&touched, pending);
    Ok(())
}

fn execute_case(spec: &CaseSpec, pending: &mut HashMap<u64, (Logic, LogicValue)>) -> Result<()> {
    let expr = spec.expression.value();
    if !expr.is_valid() {
        return mark_case_invalid(&spec.items.iter().map(|i| i.body.clone()).collect::<Vec<_>>(), &spec.default, pending);
    }
    let mut matches: Vec<&CaseItem> = Vec::new();
    for item in &spec.items {
        if item.pattern.value() == expr {
            matches.push(item);
            if spec.priority != CasePriority::Unique {
                break;
            }
        }
    }
    if spec.priority == CasePriority::Unique && matches.len() > 1 {
        let mut touched = Vec::new();
        for item in &spec.items {
            collect_driven_all(&item.body, &mut touched);
        }
        mark_invalid(&touched, pending);
        return Ok(());
    }
    match matches.first() {
        Some(item) => execute_all(&item.body, pending),
        None => match &spec.default {
            Some(body) => execute_all(body, pending),
            None => Ok(()),
        },
    }
}

fn execute_casez(spec: &CaseZSpec, pending: &mut HashMap<u64, (Logic, LogicValue)>) -> Result<()> {
    let expr = spec.expression.value();
    let mut matches: Vec<&CaseZItem> = Vec::new();
    for item in &spec.items {
        if expr.equals_with_dont_care(&item.pattern.value()).unwrap_or(false) {
            matches.push(item);
            if spec.priority != CasePriority::Unique {
                break;
            }
        }
    }
    if spec.priority == CasePriority::Unique && matches.len() > 1 {
        let mut touched = Vec::new();
        for item in &spec.items {
            collect_driven_all(&item.body, &mut touched);
        }
        mark_invalid(&touched, pending);
        return Ok(());
    }
    match matches.first() {
        Some(item) => execute_all(&item.body, pending),
        None => match &spec.default {
            Some(body) => execute_all(body, pending),
            None => Ok(()),
        },
    }
}

fn mark_case_invalid(
    item_bodies: &[Vec<Conditional>],
    default: &Option<Vec<Conditional>>,
    pending: &mut HashMap<u64, (Logic, LogicValue)>,
) -> Result<()> {
    let mut touched = Vec::new();
    for body in item_bodies {
        collect_driven_all(body, &mut touched);
    }
    if let Some(body) = default {
        collect_driven_all(body, &mut touched);
    }
    mark_invalid(&touched, pending);
    Ok(())
}

const LOOP_LIMIT: u32 = 6;

struct CombinationalInner {
    statements: Vec<Conditional>,
    driven: Vec<Logic>,
    retrigger_time: Option<u64>,
    retrigger_count: u32,
}

/// An `always_comb`-style block: recomputes its driven nets whenever any
/// net in its sensitivity list glitches, defaulting receivers untouched
/// on a given walk to all-`x` (spec §7's "zero-out on default" choice).
#[derive(Clone)]
pub struct Combinational(Rc<std::cell::RefCell<CombinationalInner>>);

impl Combinational {
    pub fn new(statements: Vec<Conditional>) -> Result<Combinational> {
        attach_all(&statements)?;
        let mut driven = Vec::new();
        let mut sensitivity = Vec::new();
        collect_driven_all(&statements, &mut driven);
        collect_sensitivity_all(&statements, &mut sensitivity);
        dedup_by_id(&mut driven);
        dedup_by_id(&mut sensitivity);

        let block = Combinational(Rc::new(std::cell::RefCell::new(CombinationalInner {
            statements,
            driven,
            retrigger_time: None,
            retrigger_count: 0,
        })));
        block.evaluate();
        for net in &sensitivity {
            let b = block.clone();
            net.on_glitch(move |_| b.evaluate());
        }
        Ok(block)
    }

    fn evaluate(&self) {
        let now = crate::Simulator::now();
        {
            let mut inner = self.0.borrow_mut();
            if inner.retrigger_time == Some(now) {
                inner.retrigger_count += 1;
            } else {
                inner.retrigger_time = Some(now);
                inner.retrigger_count = 1;
            }
            if inner.retrigger_count > LOOP_LIMIT {
                log::warn!("combinational block exceeded loop limit at time {now}, forcing x");
                let driven = inner.driven.clone();
                drop(inner);
                for net in &driven {
                    let _ = net.put(LogicValue::filled(net.width(), Bit::X));
                }
                return;
            }
        }
        let (statements, driven) = {
            let inner = self.0.borrow();
            (inner.statements.clone(), inner.driven.clone())
        };
        let mut pending = HashMap::default();
        if let Err(e) = execute_all(&statements, &mut pending) {
            log::warn!("combinational block signal-redriven: {e}, forcing x");
            for net in &driven {
                let _ = net.put(LogicValue::filled(net.width(), Bit::X));
            }
            return;
        }
        for net in &driven {
            let value = pending
                .get(&net.id())
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| LogicValue::filled(net.width(), Bit::X));
            let _ = net.put(value);
        }
    }
}

fn dedup_by_id(nets: &mut Vec<Logic>) {
    let mut seen = crate::HashSet::default();
    nets.retain(|n| seen.insert(n.id()));
}
