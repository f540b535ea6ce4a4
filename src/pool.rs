//! Fixed-size worker pool draining a FIFO queue of closures.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

#[cfg(feature = "tracing")]
use tracing::debug;

type Job = Box<dyn FnOnce() + Send + 'static>;
type IdleCallback = Box<dyn Fn() + Send + Sync + 'static>;

struct PoolShared {
    queue: Mutex<VecDeque<Job>>,
    queue_cond: Condvar,
    /// Closures accepted and not yet finished (queued + running).
    outstanding: AtomicUsize,
    wait_lock: Mutex<()>,
    wait_cond: Condvar,
    shutdown: AtomicBool,
    on_idle: Option<IdleCallback>,
}

/// A fixed set of worker threads executing submitted closures in FIFO
/// order.
///
/// The pool tracks *outstanding work* (closures accepted but not yet
/// finished) and exposes [`WorkerPool::wait`] to block until it drains to
/// zero. An optional idle callback fires exactly once each time the
/// outstanding count returns to zero, so repeated submit/drain cycles
/// produce repeated fires.
///
/// Dropping the pool signals shutdown, wakes all workers, and joins them;
/// closures still queued at that point never run.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use weft::WorkerPool;
///
/// let counter = Arc::new(AtomicUsize::new(0));
/// let mut pool = WorkerPool::new(4);
/// for _ in 0..10 {
///     let counter = Arc::clone(&counter);
///     pool.submit(move || {
///         counter.fetch_add(1, Ordering::AcqRel);
///     });
/// }
/// pool.start();
/// pool.wait();
/// assert_eq!(counter.load(Ordering::Acquire), 10);
/// ```
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
    worker_count: usize,
}

impl WorkerPool {
    /// A pool with `worker_count` threads and no idle callback. Workers
    /// are not spawned until [`WorkerPool::start`].
    pub fn new(worker_count: usize) -> Self {
        Self::build(worker_count, None)
    }

    /// A pool whose `on_idle` callback fires each time outstanding work
    /// drains to zero.
    ///
    /// The callback runs on a worker (or canceller) thread while the
    /// pool's wait lock is held: keep it short and never call back into
    /// [`WorkerPool::wait`] from inside it.
    pub fn with_idle_callback<F>(worker_count: usize, on_idle: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(worker_count, Some(Box::new(on_idle)))
    }

    fn build(worker_count: usize, on_idle: Option<IdleCallback>) -> Self {
        Self {
            shared: Arc::new(PoolShared {
                queue: Mutex::new(VecDeque::new()),
                queue_cond: Condvar::new(),
                outstanding: AtomicUsize::new(0),
                wait_lock: Mutex::new(()),
                wait_cond: Condvar::new(),
                shutdown: AtomicBool::new(false),
                on_idle,
            }),
            workers: Vec::new(),
            worker_count,
        }
    }

    /// Queues `job` and signals one worker. Returns whether the job was
    /// accepted; a pool that has begun shutting down refuses new work.
    ///
    /// Safe to call from any thread, including concurrently with other
    /// submitters and with running workers.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return false;
        }
        {
            let mut queue = self.shared.queue.lock();
            queue.push_back(Box::new(job));
            self.shared.outstanding.fetch_add(1, Ordering::AcqRel);
        }
        self.shared.queue_cond.notify_one();
        true
    }

    /// Spawns the worker threads.
    ///
    /// Call once after construction; repeated or concurrent calls are not
    /// supported. Jobs may be submitted before or after starting.
    pub fn start(&mut self) {
        #[cfg(feature = "tracing")]
        debug!(workers = self.worker_count, "starting worker pool");

        for _ in 0..self.worker_count {
            let shared = Arc::clone(&self.shared);
            self.workers
                .push(std::thread::spawn(move || worker_loop(&shared)));
        }
    }

    /// Discards every queued closure without running it, reducing the
    /// outstanding count accordingly. Closures already executing are
    /// unaffected.
    ///
    /// If discarding empties the pool's outstanding work, waiters are
    /// woken and the idle callback fires here, so a `wait` issued after a
    /// cancel cannot block on work that will never run.
    pub fn cancel_queued(&self) {
        let became_idle = {
            let mut queue = self.shared.queue.lock();
            let drained = queue.len();
            queue.clear();
            drained > 0
                && self.shared.outstanding.fetch_sub(drained, Ordering::AcqRel) == drained
        };
        if became_idle {
            let _guard = self.shared.wait_lock.lock();
            if let Some(on_idle) = &self.shared.on_idle {
                on_idle();
            }
            self.shared.wait_cond.notify_all();
        }
    }

    /// Blocks until every accepted closure has finished or been cancelled.
    ///
    /// Safe to call from any thread. With concurrent submitters the caller
    /// observes one particular quiescent moment, not an end of life.
    pub fn wait(&self) {
        let mut guard = self.shared.wait_lock.lock();
        while self.shared.outstanding.load(Ordering::Acquire) != 0 {
            self.shared.wait_cond.wait(&mut guard);
        }
    }

    /// Whether no work is queued or running. The answer may be stale
    /// immediately.
    pub fn is_idle(&self) -> bool {
        self.shared.outstanding.load(Ordering::Acquire) == 0
    }

    /// Closures accepted and not yet finished (queued + running).
    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.load(Ordering::Acquire)
    }

    /// Closures waiting in the queue; excludes those currently running.
    pub fn queued_count(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Whether the queue is empty. Running closures are not counted.
    pub fn is_empty(&self) -> bool {
        self.shared.queue.lock().is_empty()
    }

    /// The worker count configured at construction.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        {
            let _guard = self.shared.queue.lock();
            self.shared.shutdown.store(true, Ordering::Release);
        }
        self.shared.queue_cond.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(shared: &PoolShared) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                if shared.shutdown.load(Ordering::Acquire) {
                    return;
                }
                if let Some(job) = queue.pop_front() {
                    break job;
                }
                shared.queue_cond.wait(&mut queue);
            }
        };

        job();

        // Decrement under the wait lock so a waiter observing zero also
        // observes every prior completion.
        let _guard = shared.wait_lock.lock();
        if shared.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            if let Some(on_idle) = &shared.on_idle {
                on_idle();
            }
            shared.wait_cond.notify_all();
        }
    }
}
