// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution queues that run the units of work a [`Dispatcher`](crate::Dispatcher) submits.
//!
//! The dispatcher never renders inline. For each selected sink it hands a boxed closure
//! to an [`ExecutionQueue`] and returns as soon as every closure is submitted. What
//! "run" means is up to the queue:
//!
//! | Queue               | Where work runs                         | Ordering            |
//! |---------------------|-----------------------------------------|---------------------|
//! | [`ConcurrentQueue`] | a `rayon` thread pool                   | none                |
//! | [`SerialQueue`]     | one dedicated worker thread             | FIFO                |
//! | [`ImmediateQueue`]  | the submitting thread, before returning | call order          |
//!
//! Submissions carry a [`Priority`] class and a set of [`WorkFlags`]. The shipped queues
//! accept both and treat them as hints; a custom queue is free to honor them.
//!
//! A [`QueueGroup`] tracks joint completion of several submissions:
//!
//! ```
//! use debuggable::{ConcurrentQueue, ExecutionQueue, Priority, QueueGroup, WorkFlags};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let queue = ConcurrentQueue::new();
//! let group = QueueGroup::new();
//! let done = Arc::new(AtomicUsize::new(0));
//! for _ in 0..8 {
//!     let done = done.clone();
//!     queue.submit(Some(&group), Priority::Utility, WorkFlags::DETACHED, Box::new(move || {
//!         done.fetch_add(1, Ordering::SeqCst);
//!     }));
//! }
//! group.wait();
//! assert_eq!(done.load(Ordering::SeqCst), 8);
//! ```

use crossbeam_channel::Sender;
use std::fmt::Debug;
use std::ops::{BitOr, BitOrAssign};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// One unit of work.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Quality-of-service class for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    UserInteractive,
    UserInitiated,
    #[default]
    Default,
    Utility,
    Background,
    Unspecified,
}

/// A small set of submission flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WorkFlags(u8);

impl WorkFlags {
    /// Work waits for everything submitted before it, and later work waits for it.
    pub const BARRIER: WorkFlags = WorkFlags(1 << 0);
    /// Work does not inherit anything from the submitting context.
    pub const DETACHED: WorkFlags = WorkFlags(1 << 1);
    pub const ENFORCE_PRIORITY: WorkFlags = WorkFlags(1 << 2);
    pub const INHERIT_PRIORITY: WorkFlags = WorkFlags(1 << 3);

    pub const fn empty() -> Self {
        WorkFlags(0)
    }

    pub const fn contains(self, other: WorkFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for WorkFlags {
    type Output = WorkFlags;
    fn bitor(self, rhs: WorkFlags) -> WorkFlags {
        WorkFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WorkFlags {
    fn bitor_assign(&mut self, rhs: WorkFlags) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Default)]
struct GroupState {
    pending: Mutex<usize>,
    idle: Condvar,
}

/**
Tracks completion of several units of work.

Clones share the same counter. A queue calls [`QueueGroup::enter`] when it accepts
grouped work and [`QueueGroup::leave`] once that work has run, even if it panicked.
*/
#[derive(Debug, Clone, Default)]
pub struct QueueGroup {
    state: Arc<GroupState>,
}

impl QueueGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) {
        *self
            .state
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
    }

    /// Marks one entered unit as finished. Unbalanced calls are ignored.
    pub fn leave(&self) {
        let mut pending = self
            .state
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.state.idle.notify_all();
        }
    }

    pub fn is_idle(&self) -> bool {
        *self
            .state
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == 0
    }

    /// Blocks until every entered unit has left.
    pub fn wait(&self) {
        let mut pending = self
            .state
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *pending > 0 {
            pending = self
                .state
                .idle
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`QueueGroup::wait`], giving up after `timeout`. Returns whether the group is idle.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self
            .state
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *pending > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .state
                .idle
                .wait_timeout(pending, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            pending = guard;
        }
        true
    }
}

struct LeaveOnDrop(QueueGroup);

impl Drop for LeaveOnDrop {
    fn drop(&mut self) {
        self.0.leave();
    }
}

/// Enters `group` now and wraps `work` so it leaves once run.
fn tracked(group: Option<&QueueGroup>, work: Work) -> Work {
    match group {
        None => work,
        Some(group) => {
            group.enter();
            let guard = LeaveOnDrop(group.clone());
            Box::new(move || {
                let _guard = guard;
                work();
            })
        }
    }
}

/**
Runs units of work, optionally asynchronously.

Implementations must eventually run every submitted unit exactly once and must not
block the submitter waiting for the work itself.
*/
pub trait ExecutionQueue: Debug + Send + Sync {
    fn submit(&self, group: Option<&QueueGroup>, priority: Priority, flags: WorkFlags, work: Work);

    /// Submits with no group, default priority and no flags.
    fn run(&self, work: Work) {
        self.submit(None, Priority::Default, WorkFlags::empty(), work);
    }
}

/**
Runs work on a `rayon` pool.

The default instance uses rayon's global pool. Priority and flags are accepted and
ignored, including [`WorkFlags::BARRIER`].
*/
#[derive(Debug, Clone, Default)]
pub struct ConcurrentQueue {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl ConcurrentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue with its own pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("debuggable-{index}"))
            .build()?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }
}

impl ExecutionQueue for ConcurrentQueue {
    fn submit(&self, group: Option<&QueueGroup>, _priority: Priority, _flags: WorkFlags, work: Work) {
        let work = tracked(group, work);
        match &self.pool {
            Some(pool) => pool.spawn(work),
            None => rayon::spawn(work),
        }
    }
}

/**
Runs work one unit at a time, in submission order, on a dedicated thread.

Because work never overlaps, every submission already behaves as a barrier. A unit
that panics is contained so later units still run.

Dropping the queue lets the worker finish what was already submitted, then joins it.
*/
pub struct SerialQueue {
    sender: Option<Sender<Work>>,
    worker: Option<JoinHandle<()>>,
}

impl SerialQueue {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<Work>();
        let worker = std::thread::Builder::new()
            .name("debuggable-serial".to_string())
            .spawn(move || {
                for work in receiver {
                    // a panicking unit must not take the worker down with it
                    let _ = catch_unwind(AssertUnwindSafe(work));
                }
            })
            .ok();
        Self {
            sender: Some(sender),
            worker,
        }
    }

    /// Blocks until everything submitted before this call has run.
    pub fn flush(&self) {
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
        self.run(Box::new(move || {
            let _ = done_tx.send(());
        }));
        // Err means the worker is gone, nothing left to wait for
        let _ = done_rx.recv();
    }
}

impl Default for SerialQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("pending", &self.sender.as_ref().map(Sender::len))
            .finish()
    }
}

impl ExecutionQueue for SerialQueue {
    fn submit(&self, group: Option<&QueueGroup>, _priority: Priority, _flags: WorkFlags, work: Work) {
        let work = tracked(group, work);
        match (&self.sender, &self.worker) {
            (Some(sender), Some(_)) => {
                // the worker only exits after the sender is dropped
                let _ = sender.send(work);
            }
            // thread spawn failed at construction; run inline rather than lose the work
            _ => work(),
        }
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Runs work inline on the submitting thread. Handy for tests and for short-lived tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateQueue;

impl ExecutionQueue for ImmediateQueue {
    fn submit(&self, group: Option<&QueueGroup>, _priority: Priority, _flags: WorkFlags, work: Work) {
        tracked(group, work)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn flags_combine() {
        let flags = WorkFlags::DETACHED | WorkFlags::BARRIER;
        assert!(flags.contains(WorkFlags::DETACHED));
        assert!(flags.contains(WorkFlags::BARRIER));
        assert!(!flags.contains(WorkFlags::ENFORCE_PRIORITY));
        assert!(WorkFlags::empty().is_empty());
    }

    #[test]
    fn serial_queue_preserves_order() {
        let queue = SerialQueue::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..50 {
            let seen = seen.clone();
            queue.run(Box::new(move || seen.lock().unwrap().push(i)));
        }
        queue.flush();
        assert_eq!(*seen.lock().unwrap(), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn serial_queue_survives_panicking_work() {
        let queue = SerialQueue::new();
        let count = Arc::new(AtomicUsize::new(0));
        queue.run(Box::new(|| panic!("boom")));
        let c = count.clone();
        queue.run(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        queue.flush();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn group_tracks_concurrent_work() {
        let queue = ConcurrentQueue::with_threads(2).expect("pool");
        let group = QueueGroup::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..16 {
            let count = count.clone();
            queue.submit(
                Some(&group),
                Priority::Background,
                WorkFlags::DETACHED,
                Box::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        assert!(group.wait_timeout(Duration::from_secs(10)));
        assert!(group.is_idle());
        assert_eq!(count.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn group_leaves_after_panic() {
        let group = QueueGroup::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            ImmediateQueue.submit(
                Some(&group),
                Priority::Default,
                WorkFlags::empty(),
                Box::new(|| panic!("boom")),
            );
        }));
        assert!(result.is_err());
        assert!(group.is_idle());
    }

    #[test]
    fn wait_timeout_reports_busy_group() {
        let group = QueueGroup::new();
        group.enter();
        assert!(!group.wait_timeout(Duration::from_millis(10)));
        group.leave();
        assert!(group.wait_timeout(Duration::from_millis(10)));
    }
}
