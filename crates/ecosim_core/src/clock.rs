//! Logical clock and the queue of pending tasks.
//!
//! Time only moves when a task is popped. Cancelling a task flips a shared
//! flag and leaves the entry in the heap; the entry is thrown away when it
//! reaches the front. That keeps [`TaskHandle::cancel`] O(1) at the price of
//! cancelled entries lingering in [`Scheduler::pending_count`] until popped.

use ecosim_data::SimTime;
use ordered_float::OrderedFloat;
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;

/// Work to perform when a task comes due. Receives the scheduler's context.
pub type Handler<C> = Box<dyn FnOnce(&mut C)>;

/// Caller-side handle to a scheduled task.
#[derive(Clone)]
pub struct TaskHandle {
    active: Rc<Cell<bool>>,
    due: SimTime,
}

impl TaskHandle {
    /// Deactivates the task. Its handler will never run.
    pub fn cancel(&self) {
        self.active.set(false);
    }

    /// True until the task is cancelled or popped.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    #[must_use]
    pub fn due(&self) -> SimTime {
        self.due
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("due", &self.due)
            .field("active", &self.is_active())
            .finish()
    }
}

struct Task<C> {
    due: OrderedFloat<SimTime>,
    seq: u64,
    active: Rc<Cell<bool>>,
    handler: Handler<C>,
}

impl<C> PartialEq for Task<C> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<C> Eq for Task<C> {}

impl<C> PartialOrd for Task<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for Task<C> {
    // reversed: BinaryHeap is a max-heap and we want the earliest task on top,
    // with ties going to whichever was scheduled first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Result of popping the front of the queue.
pub enum Popped<C> {
    /// The task was active; run the handler against the context.
    Ready(Handler<C>),
    /// The task had been cancelled and was dropped unrun.
    Cancelled,
}

/// What [`Scheduler::pop_and_run`] did with the front task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Ran,
    Discarded,
}

/// Time-ordered queue of pending tasks over a context `C`.
pub struct Scheduler<C> {
    queue: BinaryHeap<Task<C>>,
    now: SimTime,
    min_delta_time: SimTime,
    next_seq: u64,
}

impl<C> Scheduler<C> {
    #[must_use]
    pub fn new(min_delta_time: SimTime) -> Self {
        assert!(
            min_delta_time > 0.0 && min_delta_time.is_finite(),
            "min_delta_time must be positive, got {min_delta_time}"
        );
        Self {
            queue: BinaryHeap::new(),
            now: 0.0,
            min_delta_time,
            next_seq: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn now(&self) -> SimTime {
        self.now
    }

    #[must_use]
    pub fn min_delta_time(&self) -> SimTime {
        self.min_delta_time
    }

    /// Number of queued tasks, cancelled ones included.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the front task, if any.
    #[must_use]
    pub fn peek_time(&self) -> Option<SimTime> {
        self.queue.peek().map(|t| t.due.into_inner())
    }

    /// Schedules `handler` at `now + max(delay, min_delta_time)`.
    ///
    /// # Panics
    /// On a non-finite delay; such a task could never be ordered.
    pub fn schedule<F>(&mut self, delay: SimTime, handler: F) -> TaskHandle
    where
        F: FnOnce(&mut C) + 'static,
    {
        assert!(delay.is_finite(), "cannot schedule a task after {delay}");
        let due = self.now + delay.max(self.min_delta_time);
        assert!(due >= self.now, "task at {due} would run before now ({})", self.now);

        let active = Rc::new(Cell::new(true));
        self.queue.push(Task {
            due: OrderedFloat(due),
            seq: self.next_seq,
            active: Rc::clone(&active),
            handler: Box::new(handler),
        });
        self.next_seq += 1;
        TaskHandle { active, due }
    }

    /// Same as [`TaskHandle::cancel`].
    pub fn cancel(&self, handle: &TaskHandle) {
        handle.cancel();
    }

    /// Removes the front task and advances the clock to its due time.
    ///
    /// # Panics
    /// If the front task is due before the current time.
    pub fn pop_due(&mut self) -> Option<Popped<C>> {
        let task = self.queue.pop()?;
        let due = task.due.into_inner();
        assert!(
            due >= self.now,
            "task due at {due} popped after the clock reached {}",
            self.now
        );
        self.now = due;

        if task.active.replace(false) {
            Some(Popped::Ready(task.handler))
        } else {
            Some(Popped::Cancelled)
        }
    }

    /// Pops the front task and runs it against `ctx` unless it was cancelled.
    ///
    /// Only usable when the scheduler is not itself part of `ctx`.
    pub fn pop_and_run(&mut self, ctx: &mut C) -> Option<Step> {
        match self.pop_due()? {
            Popped::Ready(handler) => {
                handler(ctx);
                Some(Step::Ran)
            }
            Popped::Cancelled => Some(Step::Discarded),
        }
    }

    /// Drops every pending task without running it.
    pub fn clear(&mut self) {
        for task in self.queue.drain() {
            task.active.set(false);
        }
    }
}
