//! Typed one-shot edges carrying values from producer tasks to consumers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Condvar, Mutex};

use crate::node::{GraphEdge, GraphNode};

/// Monotone one-shot gate: closed at birth, open forever once released.
pub(crate) struct Latch {
    ready: AtomicBool,
    lock: Mutex<()>,
    cond: Condvar,
}

impl Latch {
    pub(crate) fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            lock: Mutex::new(()),
            cond: Condvar::new(),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Opens the latch and wakes every waiter. Idempotent.
    pub(crate) fn open(&self) {
        {
            let _guard = self.lock.lock();
            self.ready.store(true, Ordering::Release);
        }
        self.cond.notify_all();
    }

    /// Blocks until the latch is open; returns immediately if it already
    /// is. Wakeups re-check the flag, so spurious ones are harmless.
    pub(crate) fn wait(&self) {
        if self.is_open() {
            return;
        }
        let mut guard = self.lock.lock();
        while !self.ready.load(Ordering::Acquire) {
            self.cond.wait(&mut guard);
        }
    }
}

/// A one-shot, typed hand-off slot from exactly one producer task to any
/// number of consumers.
///
/// The producer calls [`Edge::produce`] once; consumers either poll with
/// [`Edge::try_peek`] or block in [`Edge::wait`]. The value is written at
/// most once and every reader observes the same bits: the latch release
/// happens-after the value store, and readers only touch the slot after
/// observing the latch.
///
/// `Edge<()>` is a pure completion signal. The unit type is zero-sized, so
/// a signal edge stores and copies no data; only the latch does any work.
///
/// Edges are owned by their producing [`crate::Task`] and handed to
/// consumers as `Arc` clones via [`crate::Task::outward`]; they are never
/// constructed on their own.
pub struct Edge<T> {
    slot: OnceLock<T>,
    latch: Latch,
    owner: Weak<dyn GraphNode>,
}

impl<T: Send + Sync + 'static> Edge<T> {
    pub(crate) fn new(owner: Weak<dyn GraphNode>) -> Self {
        Self {
            slot: OnceLock::new(),
            latch: Latch::new(),
            owner,
        }
    }

    /// Stores `value`, latches the edge, and wakes all waiters.
    ///
    /// Producer-only, called at most once per edge lifetime. A second call
    /// is silently ignored and its value dropped; the first value is never
    /// overwritten.
    pub fn produce(&self, value: T) {
        if self.slot.set(value).is_err() {
            return;
        }
        self.latch.open();
    }

    /// The stored value, if the edge has latched. Never blocks.
    pub fn try_peek(&self) -> Option<&T> {
        if self.latch.is_open() {
            self.slot.get()
        } else {
            None
        }
    }

    /// Blocks the caller until the producer latches the edge, then returns
    /// the stored value. Returns immediately once latched.
    pub fn wait(&self) -> &T {
        self.latch.wait();
        self.slot.get().expect("latched edge holds a value")
    }

    /// The task producing this edge, if it is still alive.
    pub fn producer(&self) -> Option<Arc<dyn GraphNode>> {
        self.owner.upgrade()
    }

    /// Whether the producer has latched the edge. The answer may be stale
    /// immediately.
    pub fn is_ready(&self) -> bool {
        self.latch.is_open()
    }
}

impl<T: Send + Sync + 'static> GraphEdge for Edge<T> {
    fn producer(&self) -> Option<Arc<dyn GraphNode>> {
        self.owner.upgrade()
    }

    fn is_ready(&self) -> bool {
        self.latch.is_open()
    }

    fn wait_ready(&self) {
        self.latch.wait();
    }
}
