//! Timestamped action queue and phased tick, grounded on the teacher's
//! `Scheduler`/`SimEvent` min-heap (celox `scheduler.rs`) but driving
//! closures instead of JIT-compiled events, and exposed as a process-wide
//! singleton per spec §9 ("Global simulator state") rather than a handle
//! threaded through every net constructor.

mod queue;

use crate::{Error, Result};
use bit_set::BitSet;
use queue::{ActionQueue, ScheduledAction};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Weak;

/// Opaque handle returned by [`Simulator::register_action`]. Carries no
/// cancellation capability (spec §4.4: "no per-action cancellation token").
pub type ActionId = u64;

/// The five phases of a single tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TickPhase {
    Injection,
    Main,
    ClkStable,
    Settle,
    PostTick,
}

/// Implemented by nets that want to be sampled for `posedge`/`negedge`
/// during the `clkStable` phase. Kept as a trait object so this module
/// never names `Logic`/`LogicInner` directly, avoiding a cyclic `mod`
/// dependency between `simulator` and `net`.
pub(crate) trait EdgeWatcher {
    fn sample_edge(&self);
    fn watcher_id(&self) -> u64;
}

struct State {
    time: u64,
    seq: u64,
    phase: TickPhase,
    queue: ActionQueue,
    injected: VecDeque<Box<dyn FnOnce()>>,
    max_sim_time: Option<u64>,
    end_requested: bool,
    edge_watched: Vec<Weak<dyn EdgeWatcher>>,
    settle: VecDeque<Box<dyn FnOnce()>>,
    notified_this_tick: BitSet,
}

impl State {
    fn new() -> State {
        State {
            time: 0,
            seq: 0,
            phase: TickPhase::PostTick,
            queue: ActionQueue::new(),
            injected: VecDeque::new(),
            max_sim_time: None,
            end_requested: false,
            edge_watched: Vec::new(),
            settle: VecDeque::new(),
            notified_this_tick: BitSet::new(),
        }
    }
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::new());
}

/// A zero-sized handle onto the process-wide (here, thread-local)
/// simulator state. All interaction goes through associated functions;
/// there is no instance to hold onto, matching the "singleton with an
/// explicit reset" option from spec §9.
pub struct Simulator;

impl Simulator {
    /// The current simulated time.
    pub fn now() -> u64 {
        STATE.with(|s| s.borrow().time)
    }

    pub fn current_phase() -> TickPhase {
        STATE.with(|s| s.borrow().phase)
    }

    /// Schedules `action` to run at timestamp `t`, which must not precede
    /// the current time. Actions scheduled for the same timestamp run in
    /// insertion order.
    pub fn register_action(t: u64, action: impl FnOnce() + 'static) -> Result<ActionId> {
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            if t < s.time {
                return Err(Error::IllegalConfiguration(format!(
                    "cannot schedule action at time {t}, already at {}",
                    s.time
                )));
            }
            let seq = s.seq;
            s.seq += 1;
            s.queue.push(ScheduledAction {
                time: t,
                seq,
                action: Box::new(action),
            });
            Ok(seq)
        })
    }

    /// Schedules `action` to run in the current timestamp's injection
    /// list, ahead of `main`. This is the only legal way for a testbench
    /// to drive a signal and still observe edges within the same tick.
    pub fn inject_action(action: impl FnOnce() + 'static) -> ActionId {
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            let seq = s.seq;
            s.seq += 1;
            s.injected.push_back(Box::new(action));
            seq
        })
    }

    pub fn set_max_sim_time(t: u64) {
        STATE.with(|s| s.borrow_mut().max_sim_time = Some(t));
    }

    /// Marks the simulator to halt at the end of the current tick; queued
    /// actions past that tick are discarded, but injections already
    /// pending in the current tick still run.
    pub fn end_simulation() {
        STATE.with(|s| s.borrow_mut().end_requested = true);
    }

    /// Clears time, queues, and phase state. Does not alter any `Logic`
    /// value.
    pub fn reset() {
        STATE.with(|s| *s.borrow_mut() = State::new());
    }

    pub(crate) fn register_edge_watch(watcher: Weak<dyn EdgeWatcher>) {
        STATE.with(|s| s.borrow_mut().edge_watched.push(watcher));
    }

    /// Defers `action` to the `settle` phase of the tick currently being
    /// processed. Used by [`crate::Sequential`] so a clock edge's drives
    /// land after `clkStable` has finished sampling every watched net,
    /// letting downstream combinational fan-out observe them within the
    /// same tick.
    pub(crate) fn schedule_settle(action: impl FnOnce() + 'static) {
        STATE.with(|s| s.borrow_mut().settle.push_back(Box::new(action)));
    }

    /// Advances through a single tick's five phases, or does nothing and
    /// returns `false` if there is no pending injection or scheduled
    /// action.
    pub fn tick() -> Result<bool> {
        let has_injected = STATE.with(|s| !s.borrow().injected.is_empty());
        let next_time = STATE.with(|s| s.borrow().queue.peek_time());
        if !has_injected && next_time.is_none() {
            return Ok(false);
        }
        if STATE.with(|s| s.borrow().end_requested) {
            return Ok(false);
        }
        if let Some(t) = next_time {
            STATE.with(|s| {
                let mut s = s.borrow_mut();
                if t > s.time {
                    s.time = t;
                }
            });
        }
        if let Some(max) = STATE.with(|s| s.borrow().max_sim_time) {
            if STATE.with(|s| s.borrow().time) > max {
                STATE.with(|s| s.borrow_mut().end_requested = true);
                return Ok(false);
            }
        }

        Self::set_phase(TickPhase::Injection);
        Self::drain_injected();

        Self::set_phase(TickPhase::Main);
        Self::drain_main_at_current_time();

        Self::set_phase(TickPhase::ClkStable);
        Self::sample_edges();

        Self::set_phase(TickPhase::Settle);
        Self::drain_settle();

        Self::set_phase(TickPhase::PostTick);

        Ok(true)
    }

    /// Runs ticks until neither an injection nor a scheduled action
    /// remains, `endSimulation` was called, or `maxSimTime` is exceeded.
    pub fn run() -> Result<()> {
        while Self::tick()? {}
        Ok(())
    }

    fn set_phase(phase: TickPhase) {
        STATE.with(|s| s.borrow_mut().phase = phase);
    }

    fn drain_injected() {
        loop {
            let batch: Vec<Box<dyn FnOnce()>> =
                STATE.with(|s| s.borrow_mut().injected.drain(..).collect());
            if batch.is_empty() {
                break;
            }
            for action in batch {
                action();
            }
        }
    }

    fn drain_settle() {
        loop {
            let batch: Vec<Box<dyn FnOnce()>> =
                STATE.with(|s| s.borrow_mut().settle.drain(..).collect());
            if batch.is_empty() {
                break;
            }
            for action in batch {
                action();
            }
        }
    }

    fn drain_main_at_current_time() {
        let now = Self::now();
        loop {
            let batch = STATE.with(|s| s.borrow_mut().queue.pop_all_at(now));
            if batch.is_empty() {
                break;
            }
            for scheduled in batch {
                (scheduled.action)();
            }
        }
    }

    /// Samples every watched net at most once per `clkStable` pass. The
    /// dedup bitset guards against a net appearing twice in
    /// `edge_watched` (e.g. a stale registration surviving alongside a
    /// fresh one); this mirrors the teacher's `discovered_in_this_step`
    /// bookkeeping for its own per-step trigger dedup.
    fn sample_edges() {
        STATE.with(|s| s.borrow_mut().notified_this_tick.make_empty());
        let watchers: Vec<Weak<dyn EdgeWatcher>> =
            STATE.with(|s| s.borrow().edge_watched.clone());
        let mut alive = Vec::with_capacity(watchers.len());
        for w in watchers {
            if let Some(watcher) = w.upgrade() {
                let id = watcher.watcher_id() as usize;
                let first_this_tick =
                    STATE.with(|s| s.borrow_mut().notified_this_tick.insert(id));
                if first_this_tick {
                    watcher.sample_edge();
                }
                alive.push(std::rc::Rc::downgrade(&watcher));
            }
        }
        STATE.with(|s| s.borrow_mut().edge_watched = alive);
    }
}
