//! Virtual-clock scheduler.
//!
//! Deferred tasks wait until the clock is advanced past their due time, then
//! run in due-time order (ties in the order they were deferred). Nothing
//! runs inside `defer`, matching `setTimeout`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::ports::outbound::{DeferredTask, Scheduler};

/// Upper bound on tasks run by [`ManualScheduler::run_until_idle`], in case
/// tasks keep re-deferring themselves.
const MAX_IDLE_RUNS: usize = 10_000;

struct PendingTask {
    due_ms: u64,
    seq: u64,
    task: DeferredTask,
}

#[derive(Default)]
struct SchedulerState {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// A scheduler driven by explicit clock advances. Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Move the clock forward by `ms`, running every task that falls due,
    /// including tasks deferred by those tasks. Returns how many ran.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now_ms().saturating_add(ms);
        let mut ran = 0;
        while let Some(pending) = self.take_due(target) {
            self.inner.borrow_mut().now_ms = pending.due_ms;
            (pending.task)();
            ran += 1;
        }
        self.inner.borrow_mut().now_ms = target;
        ran
    }

    /// Advance until no tasks remain. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(next_due) = self.next_due() {
            if ran >= MAX_IDLE_RUNS {
                warn!(pending = self.pending(), "Scheduler did not go idle; giving up");
                break;
            }
            let step = next_due.saturating_sub(self.now_ms());
            ran += self.advance(step);
        }
        ran
    }

    fn next_due(&self) -> Option<u64> {
        self.inner.borrow().pending.iter().map(|p| p.due_ms).min()
    }

    fn take_due(&self, until_ms: u64) -> Option<PendingTask> {
        let mut state = self.inner.borrow_mut();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(index, _)| index)?;
        Some(state.pending.remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay_ms: u32, task: DeferredTask) {
        let mut state = self.inner.borrow_mut();
        let due_ms = state.now_ms.saturating_add(u64::from(delay_ms));
        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(PendingTask { due_ms, seq, task });
    }
}
