//! Deterministic timer for driving a scheduler without real time passing
//!
//! Useful in tests and in hosts that own their event loop and only need to
//! know when to call back in.

use crate::host::DocumentHost;
use crate::scheduler::{ActivationId, AutosaveScheduler, ScheduledTick};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Duration,
    seq: u64,
    activation: ActivationId,
}

/// Fake clock holding scheduled ticks
///
/// Ticks run in deadline order; ticks due at the same instant run in the
/// order they were scheduled.
#[derive(Debug, Default)]
pub struct ManualTimer {
    now: Duration,
    seq: u64,
    queue: Vec<Pending>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the timer was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue a tick; `None` is ignored so `start()` results can be passed directly
    pub fn schedule(&mut self, tick: Option<ScheduledTick>) {
        if let Some(tick) = tick {
            self.seq += 1;
            self.queue.push(Pending {
                deadline: self.now + tick.delay,
                seq: self.seq,
                activation: tick.activation,
            });
        }
    }

    /// Number of queued ticks
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Time until the earliest queued tick
    pub fn next_due_in(&self) -> Option<Duration> {
        self.queue
            .iter()
            .map(|p| p.deadline)
            .min()
            .map(|deadline| deadline.saturating_sub(self.now))
    }

    /// Move time forward by `by`, running every tick that falls due
    ///
    /// Ticks scheduled by ticks that ran are themselves run if they fall
    /// inside the window. Returns the number of tick invocations.
    pub fn advance<H: DocumentHost>(
        &mut self,
        by: Duration,
        scheduler: &mut AutosaveScheduler<H>,
    ) -> usize {
        let until = self.now + by;
        let mut ran = 0;

        while let Some(index) = self.earliest_due(until) {
            let due = self.queue.swap_remove(index);
            self.now = due.deadline;
            let next = scheduler.tick(due.activation);
            self.schedule(next);
            ran += 1;
        }

        self.now = until;
        ran
    }

    /// Jump to the earliest queued tick and run everything due at that instant
    ///
    /// Returns false when nothing is queued.
    pub fn run_next<H: DocumentHost>(&mut self, scheduler: &mut AutosaveScheduler<H>) -> bool {
        match self.next_due_in() {
            Some(wait) => {
                self.advance(wait, scheduler);
                true
            }
            None => false,
        }
    }

    fn earliest_due(&self, until: Duration) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.seq))
            .map(|(index, _)| index)
    }
}
