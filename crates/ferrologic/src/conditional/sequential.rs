//! The clocked always-block (spec §4.3, "Sequential block"): a
//! conditional tree that only runs on a tagged clock edge, with an
//! optional synchronous or asynchronous reset.

use super::{attach_all, collect_driven_all, dedup_by_id, execute_all, Conditional};
use crate::net::EdgeEvent;
use crate::{Bit, Edge, Error, HashMap, Logic, LogicValue, Result, Simulator};
use std::cell::RefCell;
use std::rc::Rc;

/// Accumulates a [`Sequential`] block's triggers and reset configuration
/// before the conditional tree is known.
pub struct SequentialBuilder {
    triggers: Vec<(Logic, Edge)>,
    reset: Option<Logic>,
    async_reset: bool,
    reset_values: Vec<(Logic, LogicValue)>,
}

impl SequentialBuilder {
    pub fn new() -> SequentialBuilder {
        SequentialBuilder {
            triggers: Vec::new(),
            reset: None,
            async_reset: false,
            reset_values: Vec::new(),
        }
    }

    /// Adds a clock: `Sequential.multi` is just a builder with more than
    /// one `trigger` call.
    pub fn trigger(mut self, net: &Logic, edge: Edge) -> SequentialBuilder {
        self.triggers.push((net.clone(), edge));
        self
    }

    pub fn reset(mut self, net: &Logic, async_reset: bool) -> SequentialBuilder {
        self.reset = Some(net.clone());
        self.async_reset = async_reset;
        self
    }

    /// Declares the value `receiver` takes while reset is asserted. A
    /// second call for the same receiver is a construction error.
    pub fn reset_value(mut self, receiver: &Logic, value: LogicValue) -> Result<SequentialBuilder> {
        if receiver.width() != value.width() {
            return Err(Error::WidthMismatch {
                expected: receiver.width(),
                actual: value.width(),
            });
        }
        if self.reset_values.iter().any(|(r, _)| r.id() == receiver.id()) {
            return Err(Error::IllegalConfiguration(format!(
                "duplicate reset value for net {}",
                receiver.id()
            )));
        }
        self.reset_values.push((receiver.clone(), value));
        Ok(self)
    }

    /// Finalizes the block against its conditional tree. Fails if a
    /// reset is configured but a driven receiver has no reset value, or
    /// the triggers list is empty.
    pub fn build(self, statements: Vec<Conditional>) -> Result<Sequential> {
        if self.triggers.is_empty() {
            return Err(Error::IllegalConfiguration(
                "sequential block has no triggers".to_string(),
            ));
        }
        attach_all(&statements)?;
        let mut driven = Vec::new();
        collect_driven_all(&statements, &mut driven);
        dedup_by_id(&mut driven);

        let mut reset_values = HashMap::default();
        for (net, value) in &self.reset_values {
            reset_values.insert(net.id(), value.clone());
        }
        if self.reset.is_some() {
            for net in &driven {
                if !reset_values.contains_key(&net.id()) {
                    return Err(Error::IllegalConfiguration(format!(
                        "net {} has no reset value but is driven by a reset-bearing sequential block",
                        net.id()
                    )));
                }
            }
        }

        let block = Sequential(Rc::new(RefCell::new(SequentialInner {
            statements,
            driven,
            reset: self.reset.clone(),
            async_reset: self.async_reset,
            reset_values,
        })));

        for (net, edge) in &self.triggers {
            let b = block.clone();
            let want = *edge;
            net.on_raw_edge(move |ev| b.on_trigger_edge(ev, want));
        }
        if let (Some(reset_net), true) = (&self.reset, self.async_reset) {
            let b = block.clone();
            reset_net.on_glitch(move |ev| {
                if matches!(ev.new.bit_at_unsigned(0), Bit::One) {
                    b.drive_reset();
                }
            });
        }
        Ok(block)
    }
}

impl Default for SequentialBuilder {
    fn default() -> Self {
        SequentialBuilder::new()
    }
}

struct SequentialInner {
    statements: Vec<Conditional>,
    driven: Vec<Logic>,
    reset: Option<Logic>,
    #[allow(dead_code)]
    async_reset: bool,
    reset_values: HashMap<u64, LogicValue>,
}

/// A clocked always-block: samples pre-edge values on a tagged trigger
/// edge and defers its drives to the tick's `settle` phase.
#[derive(Clone)]
pub struct Sequential(Rc<RefCell<SequentialInner>>);

impl Sequential {
    fn reset_asserted(&self) -> bool {
        let inner = self.0.borrow();
        match &inner.reset {
            Some(r) => matches!(r.value().bit_at_unsigned(0), Bit::One),
            None => false,
        }
    }

    fn on_trigger_edge(&self, event: &EdgeEvent, want: Edge) {
        match event {
            EdgeEvent::Invalid(_) => self.drive_invalid(),
            EdgeEvent::Clean(kind, _) if *kind == want => {
                if self.reset_asserted() {
                    self.drive_reset();
                } else {
                    self.drive_body();
                }
            }
            EdgeEvent::Clean(..) => {}
        }
    }

    fn drive_invalid(&self) {
        let driven = self.0.borrow().driven.clone();
        Simulator::schedule_settle(move || {
            for net in &driven {
                let _ = net.put(LogicValue::filled(net.width(), Bit::X));
            }
        });
    }

    fn drive_reset(&self) {
        let inner = self.0.borrow();
        let driven = inner.driven.clone();
        let values = inner.reset_values.clone();
        drop(inner);
        Simulator::schedule_settle(move || {
            for net in &driven {
                if let Some(value) = values.get(&net.id()) {
                    let _ = net.put(value.clone());
                }
            }
        });
    }

    fn drive_body(&self) {
        let (statements, driven) = {
            let inner = self.0.borrow();
            (inner.statements.clone(), inner.driven.clone())
        };
        let mut pending = HashMap::default();
        let outcome = execute_all(&statements, &mut pending);
        Simulator::schedule_settle(move || {
            if let Err(e) = outcome {
                log::warn!("sequential block signal-redriven: {e}, forcing x");
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
        });
    }
}
