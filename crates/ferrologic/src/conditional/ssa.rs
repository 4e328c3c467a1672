//! Static single-assignment lowering for `Combinational.ssa` (spec
//! §4.3, "SSA form"): imperative-looking, version-per-write host code
//! lowered into a flat list of [`Conditional::assign`] statements, one
//! per receiver, driven by that receiver's last-written version.

use super::{Combinational, Conditional};
use crate::{Error, HashMap, Logic, Result};
use itertools::Itertools;
use std::cell::RefCell;
use std::rc::Rc;

/// A versioned proxy for one net, issued by [`SsaBuilder::signal`].
/// Carries no value itself; every read/write goes back through the
/// builder that issued it.
#[derive(Clone)]
pub struct SsaSignal {
    net: Logic,
}

impl SsaSignal {
    pub fn net(&self) -> Logic {
        self.net.clone()
    }
}

struct SsaBuilderInner {
    net_for_token: HashMap<u64, Logic>,
    versions: HashMap<u64, Logic>,
    writes: Vec<(u64, Logic)>,
}

/// The token-issuer passed to a `Combinational.ssa` builder closure.
/// `signal(net)` returns a proxy whose `read`/`write` through this
/// builder track the most-recently-written version, per net.
pub struct SsaBuilder(Rc<RefCell<SsaBuilderInner>>);

impl SsaBuilder {
    fn new() -> SsaBuilder {
        SsaBuilder(Rc::new(RefCell::new(SsaBuilderInner {
            net_for_token: HashMap::default(),
            versions: HashMap::default(),
            writes: Vec::new(),
        })))
    }

    /// Issues the versioned proxy for `net`. Calling this more than once
    /// for the same net returns proxies that share the same version
    /// history.
    pub fn signal(&self, net: &Logic) -> SsaSignal {
        self.0
            .borrow_mut()
            .net_for_token
            .entry(net.id())
            .or_insert_with(|| net.clone());
        SsaSignal { net: net.clone() }
    }

    /// Reads the most-recently-written version of `sig`. Fails with
    /// `uninitialized-signal` if nothing has been written yet.
    pub fn read(&self, sig: &SsaSignal) -> Result<Logic> {
        self.0
            .borrow()
            .versions
            .get(&sig.net.id())
            .cloned()
            .ok_or_else(|| {
                Error::UninitializedSignal(format!(
                    "net {} read before any write in this ssa block",
                    sig.net.id()
                ))
            })
    }

    /// Produces the next version of `sig`, driven by `expr`.
    pub fn write(&self, sig: &SsaSignal, expr: &Logic) -> Result<()> {
        if expr.width() != sig.net.width() {
            return Err(Error::WidthMismatch {
                expected: sig.net.width(),
                actual: expr.width(),
            });
        }
        let mut inner = self.0.borrow_mut();
        inner.versions.insert(sig.net.id(), expr.clone());
        inner.writes.push((sig.net.id(), expr.clone()));
        Ok(())
    }

    /// Flattens the recorded version history into one `Conditional`
    /// per touched net, assigning it its last-written version.
    fn lower(&self) -> Result<Vec<Conditional>> {
        let inner = self.0.borrow();
        let mut by_net: HashMap<u64, Vec<Logic>> = HashMap::default();
        for (id, version) in inner.writes.iter().cloned() {
            by_net.entry(id).or_default().push(version);
        }
        let mut statements = Vec::new();
        for (id, versions) in by_net.into_iter().sorted_by_key(|(id, _)| *id) {
            let last = versions.last().expect("group is never empty").clone();
            let net = inner
                .net_for_token
                .get(&id)
                .expect("every write came through a token issued for this net")
                .clone();
            statements.push(Conditional::assign(&net, &last)?);
        }
        Ok(statements)
    }
}

impl Combinational {
    /// Builds a `Combinational` block from an SSA-style closure instead
    /// of a pre-built statement list: `builder_fn` runs once, issuing
    /// tokens through the supplied [`SsaBuilder`], and the resulting
    /// version history is lowered into one assign per driven net.
    pub fn ssa(builder_fn: impl FnOnce(&SsaBuilder)) -> Result<Combinational> {
        let builder = SsaBuilder::new();
        builder_fn(&builder);
        let statements = builder.lower()?;
        Combinational::new(statements)
    }
}
