//! One-shot, tick-delayed task execution with liveness-checked cancellation.
//!
//! Ticks are a monotonic logical clock driven by the host, not wall-clock
//! time. Cancellation is checked only at a task's due time: if the actor is
//! gone the task resolves to `Cancelled` and nothing runs. Resolved tasks are
//! returned by value and discarded, so a task can never fire or cancel twice.

use crate::types::ActorId;

pub type Tick = u64;
pub type TaskId = u64;

/// Liveness view of the connected actor set, supplied by the host.
pub trait Roster {
    fn is_connected(&self, actor: &ActorId) -> bool;
}

// ---------------------------------------------------------------------------
// Task types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Fired,
    Cancelled,
}

#[derive(Debug)]
pub struct ScheduledTask<J> {
    pub id: TaskId,
    pub actor: ActorId,
    pub due_at: Tick,
    pub job: J,
}

/// A task leaving the scheduler: `Fired` or `Cancelled`, both terminal.
#[derive(Debug)]
pub struct Resolution<J> {
    pub state: TaskState,
    pub task: ScheduledTask<J>,
}

// ---------------------------------------------------------------------------
// TickScheduler
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TickScheduler<J> {
    now: Tick,
    next_id: TaskId,
    pending: Vec<ScheduledTask<J>>,
}

impl<J> Default for TickScheduler<J> {
    fn default() -> Self {
        TickScheduler {
            now: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<J> TickScheduler<J> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Schedule `job` for `delay_ticks` after the current tick. A negative
    /// delay is corrected to 0 with a warning; a zero delay fires on the next
    /// `tick` call.
    pub fn schedule(&mut self, actor: ActorId, delay_ticks: i64, job: J) -> TaskId {
        let delay = if delay_ticks < 0 {
            tracing::warn!(delay_ticks, "negative delay corrected to 0");
            0
        } else {
            delay_ticks as u64
        };
        self.next_id += 1;
        self.pending.push(ScheduledTask {
            id: self.next_id,
            actor,
            due_at: self.now + delay,
            job,
        });
        self.next_id
    }

    /// Advance the logical clock by one tick and resolve every due task.
    ///
    /// Due tasks leave the scheduler in scheduling order: connected actors'
    /// tasks resolve to `Fired` (the caller runs the job synchronously),
    /// disconnected actors' tasks to `Cancelled`. The caller may `schedule`
    /// nested follow-ups while processing the returned resolutions; those
    /// obey the same liveness guard at their own due tick.
    pub fn tick<R: Roster + ?Sized>(&mut self, roster: &R) -> Vec<Resolution<J>> {
        self.now += 1;
        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|task| task.due_at <= now);
        self.pending = pending;

        due.into_iter()
            .map(|task| {
                let state = if roster.is_connected(&task.actor) {
                    TaskState::Fired
                } else {
                    tracing::debug!(actor = %task.actor, task = task.id, "actor gone before due, task cancelled");
                    TaskState::Cancelled
                };
                Resolution { state, task }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
