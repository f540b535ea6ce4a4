//! Tasks: graph vertices pairing a callable with typed inputs and a typed
//! outward edge.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::edge::Edge;
use crate::inputs::{InputList, SlotAt, SlotOf, TaskFn};
use crate::node::{GraphEdge, GraphNode};

/// Execution lifecycle of a task.
///
/// Only the worker running the task writes the state; observers read it
/// with acquire ordering. A consumer observing [`TaskState::Complete`] is
/// guaranteed to also observe the task's outward edge latched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    /// Not started yet.
    Incomplete = 0,
    /// The callable is running (or blocked on an input edge's producer).
    Running = 1,
    /// Finished; the outward edge is latched and the result readable.
    Complete = 2,
}

impl TaskState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TaskState::Incomplete,
            1 => TaskState::Running,
            _ => TaskState::Complete,
        }
    }
}

/// Object-safe execution surface of a task: what the executor schedules
/// and what callers use to observe completion.
pub trait RunnableTask: GraphNode {
    /// Run the task to completion; see [`Task::execute`].
    fn execute(&self);

    /// Current lifecycle state.
    fn state(&self) -> TaskState;

    /// Block until the task reaches [`TaskState::Complete`].
    fn wait_complete(&self) -> TaskState;

    /// When the callable started, if the task has started.
    fn started_at(&self) -> Option<Instant>;

    /// When the callable returned, if the task has finished.
    fn finished_at(&self) -> Option<Instant>;

    /// Wall-clock time the callable took, once the task has finished.
    fn duration(&self) -> Option<Duration>;
}

/// A unit of work in the graph: a callable plus its dependency wiring.
///
/// `Out` is the output type published on the task's outward edge; `In` is
/// the tuple of declared input types (default `()`, a source task). A `()`
/// entry in `In` is a pure dependency: the task waits for the producer's
/// completion signal but no data flows.
///
/// Tasks are created behind `Arc` so the same handle can be wired into
/// consumers, submitted to an executor, and queried for its result after
/// the run.
///
/// # Examples
///
/// ```
/// use weft::Task;
///
/// let answer = Task::<i32>::new(|| 42);
/// let doubled = Task::<i32, (i32,)>::new(|x: i32| x * 2);
/// doubled.attach_input::<0>(answer.outward());
///
/// answer.execute();
/// doubled.execute();
/// assert_eq!(doubled.result(), Some(84));
/// ```
pub struct Task<Out, In: InputList = ()> {
    inputs: In::Slots,
    output: Arc<Edge<Out>>,
    callable: Mutex<Option<Box<dyn TaskFn<In, Out>>>>,
    state: AtomicU8,
    reachability: AtomicUsize,
    started: OnceLock<Instant>,
    finished: OnceLock<Instant>,
    name: Mutex<String>,
    description: Mutex<String>,
    done_lock: Mutex<()>,
    done_cond: Condvar,
}

impl<Out: Send + Sync + 'static, In: InputList> Task<Out, In> {
    /// Creates a task around `callable`.
    ///
    /// The callable must be a `FnOnce` taking one parameter per entry of
    /// `In`, in order, and returning `Out`; anything else fails to
    /// compile. The outward edge is created here and owned by the task for
    /// its whole lifetime.
    pub fn new<F>(callable: F) -> Arc<Self>
    where
        F: TaskFn<In, Out>,
    {
        Arc::new_cyclic(|task: &Weak<Self>| {
            let owner: Weak<dyn GraphNode> = task.clone();
            Self {
                inputs: In::Slots::default(),
                output: Arc::new(Edge::new(owner)),
                callable: Mutex::new(Some(Box::new(callable))),
                state: AtomicU8::new(TaskState::Incomplete as u8),
                reachability: AtomicUsize::new(0),
                started: OnceLock::new(),
                finished: OnceLock::new(),
                name: Mutex::new(String::new()),
                description: Mutex::new(String::new()),
                done_lock: Mutex::new(()),
                done_cond: Condvar::new(),
            }
        })
    }

    /// Wires `edge` into positional slot `J`.
    ///
    /// The edge's payload type must match the declared input type at that
    /// position; an out-of-range index or a type mismatch fails to
    /// compile. Slots must not be rewired once execution has begun.
    pub fn attach_input<const J: usize>(&self, edge: &Arc<Edge<<In::Slots as SlotAt<J>>::Input>>)
    where
        In::Slots: SlotAt<J>,
    {
        <In::Slots as SlotAt<J>>::slot(&self.inputs).attach(Arc::clone(edge));
    }

    /// Wires `edge` into the unique slot of payload type `T`.
    ///
    /// Fails to compile when `T` is not among the declared inputs, or when
    /// it appears more than once; an ambiguous slot must be wired with
    /// [`Task::attach_input`] instead.
    pub fn attach_input_by_type<T, Marker>(&self, edge: &Arc<Edge<T>>)
    where
        In::Slots: SlotOf<T, Marker>,
    {
        self.inputs.slot_of().attach(Arc::clone(edge));
    }

    /// The outward edge this task produces on. Hand clones of it to
    /// consumer tasks.
    pub fn outward(&self) -> &Arc<Edge<Out>> {
        &self.output
    }

    /// Runs the task: awaits every wired input edge, invokes the callable
    /// with the collected values, publishes the result on the outward
    /// edge, and marks the task complete.
    ///
    /// Normally called by a pool worker via [`crate::GraphExecutor::run`].
    /// The outward edge latches strictly before the state becomes
    /// [`TaskState::Complete`], so an observer of `Complete` can read the
    /// result without further synchronization. Unwired slots do not block;
    /// their callable argument is the type's default value.
    pub fn execute(&self) {
        for edge in In::erased(&self.inputs).into_iter().flatten() {
            edge.wait_ready();
        }

        let Some(callable) = self.callable.lock().take() else {
            debug_assert!(false, "task executed more than once");
            return;
        };

        self.state.store(TaskState::Running as u8, Ordering::Release);
        let _ = self.started.set(Instant::now());

        #[cfg(feature = "tracing")]
        trace!(
            inputs = In::LEN,
            reachability = self.reachability.load(Ordering::Relaxed),
            "task running"
        );

        let values = In::values(&self.inputs);
        let out = callable.call(values);

        let _ = self.finished.set(Instant::now());
        self.output.produce(out);
        // Publish order: outward latch first, then Complete. Observers of
        // Complete must also observe the latch.
        self.state.store(TaskState::Complete as u8, Ordering::Release);

        drop(self.done_lock.lock());
        self.done_cond.notify_all();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Blocks until the task has completed. Any number of threads may wait
    /// on the same task; completion wakes them all.
    pub fn wait_complete(&self) -> TaskState {
        let mut guard = self.done_lock.lock();
        while TaskState::from_u8(self.state.load(Ordering::Acquire)) != TaskState::Complete {
            self.done_cond.wait(&mut guard);
        }
        TaskState::Complete
    }

    /// When the callable started, if the task has started.
    pub fn started_at(&self) -> Option<Instant> {
        self.started.get().copied()
    }

    /// When the callable returned, if the task has finished.
    pub fn finished_at(&self) -> Option<Instant> {
        self.finished.get().copied()
    }

    /// Wall-clock time the callable took, once the task has finished.
    pub fn duration(&self) -> Option<Duration> {
        Some(self.finished.get()?.duration_since(*self.started.get()?))
    }

    pub fn name(&self) -> String {
        self.name.lock().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.lock() = name.into();
    }

    pub fn description(&self) -> String {
        self.description.lock().clone()
    }

    pub fn set_description(&self, description: impl Into<String>) {
        *self.description.lock() = description.into();
    }
}

impl<Out: Clone + Send + Sync + 'static, In: InputList> Task<Out, In> {
    /// The produced value, once the task has completed. `None` before the
    /// outward edge latches.
    pub fn result(&self) -> Option<Out> {
        self.output.try_peek().cloned()
    }
}

impl<Out: Send + Sync + 'static, In: InputList> GraphNode for Task<Out, In> {
    fn inward_edges(&self) -> Vec<Option<Arc<dyn GraphEdge>>> {
        In::erased(&self.inputs)
    }

    fn inward_count(&self) -> usize {
        In::LEN
    }

    fn reachability(&self) -> usize {
        self.reachability.load(Ordering::Relaxed)
    }

    fn compute_reachability(&self, visited: &mut HashSet<usize>) {
        let key = self as *const Self as usize;
        if !visited.insert(key) {
            return;
        }
        if In::LEN == 0 {
            // Sources stay at depth zero.
            return;
        }
        let mut deepest = 0;
        for edge in In::erased(&self.inputs) {
            let depth = match edge.and_then(|edge| edge.producer()) {
                Some(producer) => {
                    producer.compute_reachability(visited);
                    producer.reachability()
                }
                None => 0,
            };
            deepest = deepest.max(depth);
        }
        self.reachability.store(deepest + 1, Ordering::Relaxed);
    }
}

impl<Out: Send + Sync + 'static, In: InputList> RunnableTask for Task<Out, In> {
    fn execute(&self) {
        Task::execute(self);
    }

    fn state(&self) -> TaskState {
        Task::state(self)
    }

    fn wait_complete(&self) -> TaskState {
        Task::wait_complete(self)
    }

    fn started_at(&self) -> Option<Instant> {
        Task::started_at(self)
    }

    fn finished_at(&self) -> Option<Instant> {
        Task::finished_at(self)
    }

    fn duration(&self) -> Option<Duration> {
        Task::duration(self)
    }
}
