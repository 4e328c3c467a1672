//! Four-valued logic, a mutable signal graph, a procedural conditional
//! engine, and an event-driven simulator for building and simulating
//! digital hardware from host-language objects.
//!
//! The four subsystems are layered in dependency order: [`value`] has no
//! dependents within the crate, [`net`] builds on [`value`], [`simulator`]
//! drives [`net`], and [`conditional`] ties nets together into
//! trigger-driven execution that the simulator schedules.

mod conditional;
mod error;
mod net;
mod port;
mod simulator;
mod util;
mod value;

pub(crate) use fxhash::FxHashMap as HashMap;
pub(crate) use fxhash::FxHashSet as HashSet;

pub use error::{Error, Result};
pub use value::{Bit, LogicValue};

pub use net::{
    Const, Edge, Glitch, Logic, LogicValueChanged, NextChanged, NextNegedge, NextPosedge,
};

pub use port::{PortDirection, Scope};

pub use conditional::{
    CasePriority, CaseZItem, CaseItem, Combinational, Conditional, ElseIfArm, IfBlock, Sequential,
    SequentialBuilder, SsaBuilder, SsaSignal,
};

pub use simulator::{ActionId, Simulator, TickPhase};
