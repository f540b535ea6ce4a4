//! Typed dataflow task engine
//!
//! A library for building a directed acyclic graph (DAG) of computations in
//! which every node is a callable with a statically declared input/output
//! signature, edges carry typed values (or pure completion signals) from
//! producer to consumer, and a fixed pool of worker threads executes nodes
//! in an order consistent with the dependency relation while exploiting all
//! available parallelism.
//!
//! # Features
//!
//! - **Compile-time signature checking**: a task's callable is validated
//!   against its declared input and output types through trait bounds. A
//!   wrong arity, parameter type, or return type never survives to runtime.
//! - **Typed wiring**: edges attach by position ([`Task::attach_input`]) or
//!   by unique type ([`Task::attach_input_by_type`]); both are checked at
//!   compile time.
//! - **Blocking edge latches**: each edge is a one-shot slot with a
//!   monotone latch. Consumers block until the producer publishes, with the
//!   usual release/acquire guarantees.
//! - **Priority scheduling**: the executor linearises the DAG by dependency
//!   depth and feeds a FIFO worker pool, so greedy dispatch never
//!   deadlocks and breadth-parallel work runs in parallel.
//! - **Pool lifecycle**: completion wait, bulk cancellation of queued work,
//!   a one-shot quiescence callback per drain, and graceful shutdown on
//!   drop.
//!
//! # Quick Start
//!
//! ```
//! use weft::{GraphExecutor, Task};
//!
//! // A source task: no inputs, produces an i32.
//! let answer = Task::<i32>::new(|| 42);
//!
//! // A consumer: one i32 input, doubles it.
//! let doubled = Task::<i32, (i32,)>::new(|x: i32| x * 2);
//! doubled.attach_input::<0>(answer.outward());
//!
//! let mut executor = GraphExecutor::new();
//! executor.submit(answer.clone());
//! executor.submit(doubled.clone());
//! executor.run().unwrap();
//! executor.wait();
//!
//! assert_eq!(answer.result(), Some(42));
//! assert_eq!(doubled.result(), Some(84));
//! ```
//!
//! # Core Concepts
//!
//! ## Task
//!
//! A [`Task<Out, In>`](Task) pairs a callable with an owned outward
//! [`Edge<Out>`](Edge) and one input slot per entry of the tuple `In`. The
//! callable receives one argument per declared input, in positional order.
//! Tasks live behind `Arc`, so the same handle wires consumers, goes to the
//! executor, and answers [`Task::result`] queries after the run.
//!
//! ## Edge
//!
//! An [`Edge<T>`](Edge) hands a single value from its producing task to any
//! number of consumers. It latches exactly once; late consumers return
//! immediately, early ones block until the producer publishes.
//!
//! ## Pure signals
//!
//! `Edge<()>` carries no data, only completion. Declare a `()` input to
//! depend on another task without consuming a value:
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use weft::{GraphExecutor, Task};
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let first = {
//!     let hits = Arc::clone(&hits);
//!     Task::<()>::new(move || {
//!         hits.fetch_add(1, Ordering::AcqRel);
//!     })
//! };
//! let second = {
//!     let hits = Arc::clone(&hits);
//!     Task::<(), ((),)>::new(move |_: ()| {
//!         hits.fetch_add(1, Ordering::AcqRel);
//!     })
//! };
//! second.attach_input::<0>(first.outward());
//!
//! let mut executor = GraphExecutor::new();
//! executor.submit(first.clone());
//! executor.submit(second.clone());
//! executor.run().unwrap();
//! executor.wait();
//!
//! assert_eq!(hits.load(Ordering::Acquire), 2);
//! ```
//!
//! ## Fan-in
//!
//! Inputs of distinct types can also be wired by type, order-free:
//!
//! ```
//! use weft::{GraphExecutor, Task};
//!
//! let count = Task::<u32>::new(|| 3);
//! let label = Task::<String>::new(|| "boxes".to_string());
//! let report = Task::<String, (u32, String)>::new(|n: u32, what: String| format!("{n} {what}"));
//!
//! report.attach_input_by_type(count.outward());
//! report.attach_input_by_type(label.outward());
//!
//! let mut executor = GraphExecutor::new();
//! executor.submit(count.clone());
//! executor.submit(label.clone());
//! executor.submit(report.clone());
//! executor.run().unwrap();
//! executor.wait();
//!
//! assert_eq!(report.result(), Some("3 boxes".to_string()));
//! ```
//!
//! # Scheduling
//!
//! [`GraphExecutor::run`] computes each task's *reachability*, the longest
//! path from the task to any source, and submits tasks to the pool in
//! ascending order. A task of depth `d` only ever waits on tasks of depth
//! `< d`, which were enqueued earlier, so workers never deadlock and the
//! only blocking inside a task is the short tail between a parent starting
//! and its edge latching.
//!
//! # Error Handling
//!
//! The engine itself surfaces only construction-time misuse, as
//! [`EngineError`]. Failures *inside* task callables are not caught: encode
//! fallibility in the edge payload (e.g. `Result<T, E>`) when consumers
//! need to see it. A callable that panics unwinds through the worker
//! without latching its outward edge, leaving downstream consumers blocked;
//! treat panics in callables as bugs.
//!
//! # Caveats
//!
//! - The engine does not validate graphs. A dependency cycle will recurse
//!   during the priority pass and block forever at execution; wiring the
//!   same slot twice keeps only the last edge.
//! - Graphs execute at most once; [`GraphExecutor::run`] returns
//!   [`EngineError::AlreadyRan`] on reuse.
//! - [`GraphExecutor::cancel`] drops queued tasks only. Downstream tasks
//!   already dispatched keep blocking on edges their cancelled ancestors
//!   will never latch.
//!
//! # Optional Tracing Support
//!
//! Enable the `tracing` feature for structured diagnostics via the
//! `tracing` crate:
//!
//! ```toml
//! [dependencies]
//! weft = { version = "0.1", features = ["tracing"] }
//! ```
//!
//! Instrumentation is conditionally compiled; with the feature disabled
//! (the default) no tracing code exists in the binary. Levels: INFO for
//! graph dispatch, DEBUG for pool lifecycle and priority assignment, TRACE
//! for per-task execution.

mod edge;
mod error;
mod executor;
mod inputs;
mod node;
mod pool;
mod task;

pub use edge::Edge;
pub use error::{EngineError, EngineResult};
pub use executor::GraphExecutor;
pub use inputs::{Index, InputList, InputSlot, SlotAt, SlotOf, TaskFn};
pub use node::{GraphEdge, GraphNode};
pub use pool::WorkerPool;
pub use task::{RunnableTask, Task, TaskState};
