//! Minimal module-boundary contract (spec component E, "Module scaffold
//! (contract only)"). Full hierarchy and textual port declarations are
//! out of scope (spec.md §1); this just gives [`crate::Logic::drive`]
//! enough to reject an unregistered cross-scope drive.

use crate::HashSet;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Which side of a module boundary a registered net plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

struct ScopeInner {
    #[allow(dead_code)]
    id: u64,
    inputs: HashSet<u64>,
    outputs: HashSet<u64>,
}

/// A cheap-clone handle identifying the module a [`crate::Logic`] net
/// was created in. Every `Logic::new` without an explicit scope is
/// created in the thread-local root scope, so ordinary same-module
/// wiring never has to register ports; only nets crossing into a
/// distinct [`Scope::child`] need `add_input`/`add_output`.
#[derive(Clone)]
pub struct Scope(Rc<RefCell<ScopeInner>>);

impl Scope {
    pub fn new() -> Scope {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        Scope(Rc::new(RefCell::new(ScopeInner {
            id,
            inputs: HashSet::default(),
            outputs: HashSet::default(),
        })))
    }

    /// The default scope nets are created in when no scope is given
    /// explicitly.
    pub fn root() -> Scope {
        thread_local! {
            static ROOT: Scope = Scope::new();
        }
        ROOT.with(|s| s.clone())
    }

    #[allow(dead_code)]
    pub(crate) fn id(&self) -> u64 {
        self.0.borrow().id
    }

    /// Registers `net_id` as one of this scope's input ports.
    pub fn add_input(&self, net_id: u64) {
        self.0.borrow_mut().inputs.insert(net_id);
    }

    /// Registers `net_id` as one of this scope's output ports.
    pub fn add_output(&self, net_id: u64) {
        self.0.borrow_mut().outputs.insert(net_id);
    }

    pub(crate) fn is_input(&self, net_id: u64) -> bool {
        self.0.borrow().inputs.contains(&net_id)
    }

    pub(crate) fn is_output(&self, net_id: u64) -> bool {
        self.0.borrow().outputs.contains(&net_id)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::root()
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Scope {}
