//! Mutable, width-tagged signal nets wired by directional drives (spec
//! component B). A [`Logic`] is a cheap-clone handle onto shared interior
//! state, grounded on the teacher's back-reference convention (celox
//! nets reference each other by resolved address, never by owning
//! pointer) reworked here as `Rc<RefCell<_>>` handles with `Weak`
//! back-edges from sources to their fan-out, so the wire graph never
//! forms an ownership cycle.

mod drive;
mod events;

pub use events::{Edge, Glitch, LogicValueChanged, NextChanged, NextNegedge, NextPosedge};
pub(crate) use events::{fire_once_guard, EdgeEvent, OneShotEvent};

use crate::port::Scope;
use crate::simulator::{EdgeWatcher, Simulator};
use crate::util::Broadcast;
use crate::{Bit, Error, LogicValue, Result};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NET_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) struct DriverRecord {
    pub compute: Box<dyn Fn() -> LogicValue>,
}

pub(crate) struct LogicInner {
    pub id: u64,
    pub width: usize,
    pub value: LogicValue,
    pub driver: Option<DriverRecord>,
    pub scope: Scope,
    pub glitch: Broadcast<LogicValueChanged>,
    pub edges: Broadcast<EdgeEvent>,
    pub prev_bit0: Bit,
    pub prev_value: LogicValue,
    pub edge_watch_registered: bool,
    pub is_const: bool,
}

/// A mutable signal net. Cloning a `Logic` clones the handle, not the
/// underlying net; two clones observe the same value, drives, and
/// events.
#[derive(Clone)]
pub struct Logic(pub(crate) Rc<RefCell<LogicInner>>);

impl Logic {
    /// Creates an undriven net of the given width in the root scope. Its
    /// value floats (`z`) until the first `put`/`inject`/`drive`.
    pub fn new(width: usize) -> Logic {
        Logic::new_in(width, Scope::root())
    }

    /// Creates an undriven net of the given width owned by `scope`.
    pub fn new_in(width: usize, scope: Scope) -> Logic {
        Logic(Rc::new(RefCell::new(LogicInner {
            id: NEXT_NET_ID.fetch_add(1, Ordering::Relaxed),
            width,
            value: LogicValue::filled(width, Bit::Z),
            driver: None,
            scope,
            glitch: Broadcast::new(),
            edges: Broadcast::new(),
            prev_bit0: Bit::Z,
            prev_value: LogicValue::filled(width, Bit::Z),
            edge_watch_registered: false,
            is_const: false,
        })))
    }

    pub fn id(&self) -> u64 {
        self.0.borrow().id
    }

    pub fn width(&self) -> usize {
        self.0.borrow().width
    }

    pub fn scope(&self) -> Scope {
        self.0.borrow().scope.clone()
    }

    /// `true` for the net backing a [`Const`], whose value never changes
    /// after construction.
    pub fn is_const(&self) -> bool {
        self.0.borrow().is_const
    }

    /// The current value, a cheap clone of an immutable snapshot.
    pub fn value(&self) -> LogicValue {
        self.0.borrow().value.clone()
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<LogicInner>> {
        Rc::downgrade(&self.0)
    }

    /// Records `source` as this net's sole driver: `self`'s value tracks
    /// `source`'s from now on. Fails with `signal-redriven` if this net
    /// already has a driver, or with `port-rules-violation` if `source`
    /// lives in a different, unregistered scope.
    pub fn drive(&self, source: &Logic) -> Result<()> {
        let source = source.clone();
        self.claim_driver(vec![source.clone()], move || source.value())
    }

    pub(crate) fn claim_driver(
        &self,
        sources: Vec<Logic>,
        compute: impl Fn() -> LogicValue + 'static,
    ) -> Result<()> {
        if self.0.borrow().driver.is_some() {
            return Err(Error::SignalRedriven(format!(
                "net {} already has a driver",
                self.id()
            )));
        }
        for source in &sources {
            self.check_port_contract(source)?;
        }
        let initial = compute();
        if initial.width() != self.width() {
            return Err(Error::WidthMismatch {
                expected: self.width(),
                actual: initial.width(),
            });
        }
        for source in &sources {
            let weak_self = self.downgrade();
            source.subscribe_glitch_raw(move |_| {
                if let Some(inner) = weak_self.upgrade() {
                    Logic(inner).recompute_driven();
                }
            });
        }
        self.0.borrow_mut().value = initial;
        self.0.borrow_mut().driver = Some(DriverRecord {
            compute: Box::new(compute),
        });
        Ok(())
    }

    fn check_port_contract(&self, source: &Logic) -> Result<()> {
        let my_scope = self.scope();
        let their_scope = source.scope();
        if my_scope == their_scope {
            return Ok(());
        }
        if my_scope.is_input(self.id()) || their_scope.is_output(source.id()) {
            return Ok(());
        }
        Err(Error::PortRulesViolation(format!(
            "net {} crosses a module boundary from net {} without a registered port",
            self.id(),
            source.id()
        )))
    }

    fn recompute_driven(&self) {
        let new_value = {
            let inner = self.0.borrow();
            match &inner.driver {
                Some(d) => (d.compute)(),
                None => return,
            }
        };
        let _ = self.put_internal(new_value);
    }

    /// The primitive mutation: replaces the current value and, if it
    /// actually changed, synchronously notifies every `glitch` listener.
    pub fn put(&self, value: LogicValue) -> Result<()> {
        self.put_internal(value)
    }

    pub(crate) fn put_internal(&self, value: LogicValue) -> Result<()> {
        let width = self.width();
        if value.width() != width {
            return Err(Error::WidthMismatch {
                expected: width,
                actual: value.width(),
            });
        }
        let previous = self.value();
        if previous == value {
            return Ok(());
        }
        self.0.borrow_mut().value = value.clone();
        let changed = LogicValueChanged {
            previous,
            new: value,
        };
        self.0.borrow().glitch.fire(&changed);
        Ok(())
    }

    /// Schedules a `put` to run in the simulator's current-tick injection
    /// phase, so it participates in this tick's edge detection.
    pub fn inject(&self, value: LogicValue) -> crate::simulator::ActionId {
        let net = self.clone();
        Simulator::inject_action(move || {
            let _ = net.put_internal(value);
        })
    }

    /// Subscribes to every value change.
    pub fn on_glitch(&self, mut f: impl FnMut(&LogicValueChanged) + 'static) -> Glitch {
        let id = self.0.borrow().glitch.subscribe(move |ev| f(ev));
        let inner = Rc::downgrade(&self.0);
        Glitch {
            detach: Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.borrow().glitch.unsubscribe(id);
                }
            }),
        }
    }

    pub(crate) fn subscribe_glitch_raw(&self, f: impl FnMut(&LogicValueChanged) + 'static) {
        self.0.borrow().glitch.subscribe(f);
    }

    /// Subscribes to clean `0->1` transitions of bit 0, sampled once per
    /// tick in the `clkStable` phase. Transitions touching `x`/`z` are
    /// silently suppressed; use [`Self::on_raw_edge`] to observe them.
    pub fn on_posedge(&self, mut f: impl FnMut(&LogicValueChanged) + 'static) -> Glitch {
        self.on_raw_edge_filtered(Edge::Posedge, move |ev| f(ev))
    }

    pub fn on_negedge(&self, mut f: impl FnMut(&LogicValueChanged) + 'static) -> Glitch {
        self.on_raw_edge_filtered(Edge::Negedge, move |ev| f(ev))
    }

    fn on_raw_edge_filtered(&self, want: Edge, mut f: impl FnMut(&LogicValueChanged) + 'static) -> Glitch {
        self.on_raw_edge(move |ev| {
            if let EdgeEvent::Clean(kind, changed) = ev {
                if *kind == want {
                    f(changed);
                }
            }
        })
    }

    /// Subscribes to every sampled edge, including invalid ones (used by
    /// [`crate::Sequential`] to drive all-`x` on an unknown clock).
    pub(crate) fn on_raw_edge(&self, f: impl FnMut(&EdgeEvent) + 'static) -> Glitch {
        self.ensure_edge_watched();
        let id = self.0.borrow().edges.subscribe(f);
        let inner = Rc::downgrade(&self.0);
        Glitch {
            detach: Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.borrow().edges.unsubscribe(id);
                }
            }),
        }
    }

    fn ensure_edge_watched(&self) {
        if self.width() == 0 || self.0.borrow().edge_watch_registered {
            return;
        }
        let current = self.value();
        {
            let mut inner = self.0.borrow_mut();
            inner.edge_watch_registered = true;
            inner.prev_bit0 = current.bit_at_unsigned(0);
            inner.prev_value = current;
        }
        let weak: Weak<dyn EdgeWatcher> = self.downgrade();
        Simulator::register_edge_watch(weak);
    }

    /// Resolves the first time this net's value changes.
    pub fn next_changed(&self) -> NextChanged {
        let (future, state) = OneShotEvent::new();
        let fired = fire_once_guard();
        self.on_glitch(move |ev| {
            if fired.get() {
                return;
            }
            fired.set(true);
            OneShotEvent::resolve(&state, ev.clone());
        });
        NextChanged(future)
    }

    pub fn next_posedge(&self) -> NextPosedge {
        let (future, state) = OneShotEvent::new();
        let fired = fire_once_guard();
        self.on_posedge(move |ev| {
            if fired.get() {
                return;
            }
            fired.set(true);
            OneShotEvent::resolve(&state, ev.clone());
        });
        NextPosedge(future)
    }

    pub fn next_negedge(&self) -> NextNegedge {
        let (future, state) = OneShotEvent::new();
        let fired = fire_once_guard();
        self.on_negedge(move |ev| {
            if fired.get() {
                return;
            }
            fired.set(true);
            OneShotEvent::resolve(&state, ev.clone());
        });
        NextNegedge(future)
    }
}

impl EdgeWatcher for RefCell<LogicInner> {
    fn watcher_id(&self) -> u64 {
        self.borrow().id
    }

    fn sample_edge(&self) {
        if self.borrow().width == 0 {
            return;
        }
        let (prev_bit0, cur_bit0, previous, new) = {
            let inner = self.borrow();
            (
                inner.prev_bit0,
                inner.value.bit_at_unsigned(0),
                inner.prev_value.clone(),
                inner.value.clone(),
            )
        };
        {
            let mut inner = self.borrow_mut();
            inner.prev_bit0 = cur_bit0;
            inner.prev_value = inner.value.clone();
        }
        if prev_bit0 == cur_bit0 {
            return;
        }
        let changed = LogicValueChanged { previous, new };
        let event = match (prev_bit0, cur_bit0) {
            (Bit::Zero, Bit::One) => EdgeEvent::Clean(Edge::Posedge, changed),
            (Bit::One, Bit::Zero) => EdgeEvent::Clean(Edge::Negedge, changed),
            _ => EdgeEvent::Invalid(changed),
        };
        self.borrow().edges.fire(&event);
    }
}

/// A net whose value is fixed at construction; driven by itself, and
/// fires `glitch` exactly once (on deposition).
#[derive(Clone)]
pub struct Const(Logic);

impl Const {
    pub fn new(value: LogicValue) -> Const {
        let net = Logic::new(value.width());
        {
            let mut inner = net.0.borrow_mut();
            inner.is_const = true;
            let fixed = value.clone();
            inner.driver = Some(DriverRecord {
                compute: Box::new(move || fixed.clone()),
            });
            inner.value = value.clone();
        }
        let changed = LogicValueChanged {
            previous: LogicValue::filled(value.width(), Bit::Z),
            new: value,
        };
        net.0.borrow().glitch.fire(&changed);
        Const(net)
    }

    pub fn logic(&self) -> Logic {
        self.0.clone()
    }

    pub fn value(&self) -> LogicValue {
        self.0.value()
    }

    pub fn width(&self) -> usize {
        self.0.width()
    }
}

impl std::ops::Deref for Const {
    type Target = Logic;

    fn deref(&self) -> &Logic {
        &self.0
    }
}
