//! Min-heap of timestamped actions, grounded on the teacher's
//! `Scheduler`/`SimEvent` (celox `scheduler.rs`): a `BinaryHeap` with
//! `Ord` reversed so the earliest timestamp (and, within a timestamp,
//! the earliest insertion sequence) pops first.

use std::collections::BinaryHeap;

pub(crate) struct ScheduledAction {
    pub time: u64,
    pub seq: u64,
    pub action: Box<dyn FnOnce()>,
}

impl PartialEq for ScheduledAction {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for ScheduledAction {}

impl PartialOrd for ScheduledAction {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledAction {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub(crate) struct ActionQueue {
    heap: BinaryHeap<ScheduledAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        ActionQueue {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, action: ScheduledAction) {
        self.heap.push(action);
    }

    pub fn peek_time(&self) -> Option<u64> {
        self.heap.peek().map(|a| a.time)
    }

    pub fn pop_all_at(&mut self, time: u64) -> Vec<ScheduledAction> {
        let mut batch = Vec::new();
        while let Some(top) = self.heap.peek() {
            if top.time == time {
                batch.push(self.heap.pop().unwrap());
            } else {
                break;
            }
        }
        batch
    }
}
