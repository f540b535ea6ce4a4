//! Priority-ordered dispatch of task graphs onto a worker pool.

use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::node::GraphNode;
use crate::pool::WorkerPool;
use crate::task::RunnableTask;

/// Executes a set of wired tasks on an owned [`WorkerPool`], in an order
/// consistent with the dependency relation.
///
/// [`GraphExecutor::run`] assigns every task a priority equal to its
/// dependency depth (reachability), stable-sorts the set ascending, and
/// enqueues one closure per task. Because every task's inputs are produced
/// by strictly lower-priority tasks, a worker dequeuing a task finds its
/// ancestors already running or complete, so greedy FIFO dispatch admits
/// all of the graph's parallelism without deadlock.
///
/// The caller is responsible for submitting a well-formed DAG: cycles and
/// dangling wiring are not detected here.
///
/// # Examples
///
/// ```
/// use weft::{GraphExecutor, Task};
///
/// let top = Task::<i32>::new(|| 10);
/// let left = Task::<i32, (i32,)>::new(|x: i32| x * 2);
/// let right = Task::<i32, (i32,)>::new(|x: i32| x * 3);
/// let bottom = Task::<i32, (i32, i32)>::new(|l: i32, r: i32| l + r);
///
/// left.attach_input::<0>(top.outward());
/// right.attach_input::<0>(top.outward());
/// bottom.attach_input::<0>(left.outward());
/// bottom.attach_input::<1>(right.outward());
///
/// let mut executor = GraphExecutor::new();
/// executor.submit(top.clone());
/// executor.submit(left.clone());
/// executor.submit(right.clone());
/// executor.submit(bottom.clone());
/// executor.run().unwrap();
/// executor.wait();
///
/// assert_eq!(bottom.result(), Some(50));
/// ```
pub struct GraphExecutor {
    pool: Option<WorkerPool>,
    tasks: Vec<Arc<dyn RunnableTask>>,
    worker_count: Option<usize>,
    ran: bool,
}

impl Default for GraphExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphExecutor {
    /// An executor whose pool is created lazily in [`GraphExecutor::run`]
    /// with one worker per available hardware thread.
    pub fn new() -> Self {
        Self {
            pool: None,
            tasks: Vec::new(),
            worker_count: None,
            ran: false,
        }
    }

    /// An executor whose lazily created pool will use `worker_count`
    /// threads.
    pub fn with_worker_count(worker_count: usize) -> Self {
        Self {
            worker_count: Some(worker_count),
            ..Self::new()
        }
    }

    /// An executor driving a caller-supplied pool, for example one
    /// carrying an idle callback. The pool must not have been started.
    pub fn with_pool(pool: WorkerPool) -> Self {
        Self {
            pool: Some(pool),
            ..Self::new()
        }
    }

    /// Adds `task` to the set dispatched by [`GraphExecutor::run`].
    pub fn submit(&mut self, task: Arc<dyn RunnableTask>) {
        self.tasks.push(task);
    }

    /// Number of tasks submitted so far.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Computes priorities, enqueues every task in ascending priority
    /// order, and starts the pool.
    ///
    /// Reachability is computed in a single pass with a shared visited
    /// set, so a task reachable from several submitted roots is walked
    /// only once. Ties in priority may dispatch in any order.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyRan`] on a second call; a graph executes at
    /// most once. [`EngineError::NoWorkers`] when configured with a zero
    /// worker count.
    pub fn run(&mut self) -> EngineResult<()> {
        if self.ran {
            return Err(EngineError::AlreadyRan);
        }

        if self.pool.is_none() {
            let workers = self.worker_count.unwrap_or_else(default_worker_count);
            if workers == 0 {
                return Err(EngineError::NoWorkers);
            }
            self.pool = Some(WorkerPool::new(workers));
        }
        self.ran = true;

        let mut visited = HashSet::new();
        for task in &self.tasks {
            task.compute_reachability(&mut visited);
        }
        self.tasks.sort_by_key(|task| task.reachability());

        #[cfg(feature = "tracing")]
        {
            info!(tasks = self.tasks.len(), "dispatching task graph");
            debug!(
                max_priority = self.tasks.last().map_or(0, |task| task.reachability()),
                "priorities assigned"
            );
        }

        let pool = self.pool.as_mut().expect("pool exists after lazy init");
        for task in &self.tasks {
            let task = Arc::clone(task);
            pool.submit(move || task.execute());
        }
        pool.start();
        Ok(())
    }

    /// Blocks until every dispatched task has finished or been cancelled.
    /// Returns immediately if [`GraphExecutor::run`] has not been called.
    pub fn wait(&self) {
        if let Some(pool) = &self.pool {
            pool.wait();
        }
    }

    /// Discards still-queued tasks; tasks already running finish normally.
    ///
    /// Cancellation is not propagated downstream: a consumer task that was
    /// already dequeued keeps blocking on edges its cancelled ancestors
    /// will never latch. Callers who cancel mid-graph should abandon the
    /// executor rather than wait on individual downstream tasks.
    pub fn cancel(&self) {
        if let Some(pool) = &self.pool {
            pool.cancel_queued();
        }
    }

    /// Whether the pool has no outstanding work. `true` before `run`.
    pub fn is_idle(&self) -> bool {
        self.pool.as_ref().map_or(true, WorkerPool::is_idle)
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(4)
}
