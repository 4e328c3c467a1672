//! Event payloads and the one-shot futures returned by
//! `Logic::next_changed`/`next_posedge`/`next_negedge` (spec §6, §9).
//!
//! The futures are resolved synchronously from inside the simulator's
//! glitch/edge dispatch (§9: "no async runtime dependency"), so polling
//! them outside of an executor driven by `Simulator::run`/`tick` will
//! simply never see them complete; that mirrors the teacher, which has
//! no async runtime at all.

use crate::LogicValue;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Which edge a [`crate::Sequential`] trigger or a `posedge`/`negedge`
/// subscription cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Posedge,
    Negedge,
}

/// The payload carried by `glitch`, `posedge`, and `negedge` streams.
#[derive(Debug, Clone)]
pub struct LogicValueChanged {
    pub previous: LogicValue,
    pub new: LogicValue,
}

pub(crate) enum EdgeEvent {
    Clean(Edge, LogicValueChanged),
    Invalid(#[allow(dead_code)] LogicValueChanged),
}

/// A live subscription on one of a net's broadcast streams
/// (`glitch`/`posedge`/`negedge`), returned so the caller can detach it.
pub struct Glitch {
    pub(crate) detach: Box<dyn FnOnce()>,
}

impl Glitch {
    pub fn unsubscribe(self) {
        (self.detach)();
    }
}

pub(crate) struct OneShotState<T> {
    value: Option<T>,
    waker: Option<Waker>,
}

pub(crate) struct OneShotEvent<T> {
    state: Rc<RefCell<OneShotState<T>>>,
}

impl<T: Clone> OneShotEvent<T> {
    pub(crate) fn new() -> (OneShotEvent<T>, Rc<RefCell<OneShotState<T>>>) {
        let state = Rc::new(RefCell::new(OneShotState {
            value: None,
            waker: None,
        }));
        (
            OneShotEvent {
                state: state.clone(),
            },
            state,
        )
    }

    pub(crate) fn resolve(state: &Rc<RefCell<OneShotState<T>>>, value: T) {
        let waker = {
            let mut s = state.borrow_mut();
            if s.value.is_some() {
                return;
            }
            s.value = Some(value);
            s.waker.take()
        };
        if let Some(w) = waker {
            w.wake();
        }
    }
}

impl<T: Clone> Future for OneShotEvent<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut s = self.state.borrow_mut();
        if let Some(v) = &s.value {
            Poll::Ready(v.clone())
        } else {
            s.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// Returns a guard that is `true` the first time it's checked and `false`
/// thereafter; used so a one-shot subscription ignores broadcasts after
/// its future has already resolved once (the listener itself stays
/// registered for the net's lifetime, matching `Broadcast`'s lack of a
/// reentrant unsubscribe-from-within-callback primitive).
pub(crate) fn fire_once_guard() -> Rc<Cell<bool>> {
    Rc::new(Cell::new(false))
}

macro_rules! one_shot_future {
    ($name:ident) => {
        pub struct $name(pub(crate) OneShotEvent<LogicValueChanged>);

        impl Future for $name {
            type Output = LogicValueChanged;

            fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<LogicValueChanged> {
                let inner = unsafe { self.map_unchecked_mut(|s| &mut s.0) };
                inner.poll(cx)
            }
        }
    };
}

one_shot_future!(NextChanged);
one_shot_future!(NextPosedge);
one_shot_future!(NextNegedge);
