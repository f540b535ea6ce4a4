// Pure-signal dependencies: unit edges carry completion, not data

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use weft::{GraphExecutor, Task, TaskState};

fn counting_source(counter: &Arc<AtomicUsize>) -> Arc<Task<()>> {
    let counter = Arc::clone(counter);
    Task::new(move || {
        counter.fetch_add(1, Ordering::AcqRel);
    })
}

fn counting_link(counter: &Arc<AtomicUsize>) -> Arc<Task<(), ((),)>> {
    let counter = Arc::clone(counter);
    Task::new(move |_: ()| {
        counter.fetch_add(1, Ordering::AcqRel);
    })
}

#[test]
fn unit_signal_chain_of_four() {
    let counter = Arc::new(AtomicUsize::new(0));

    let first = counting_source(&counter);
    let second = counting_link(&counter);
    let third = counting_link(&counter);
    let fourth = counting_link(&counter);

    second.attach_input::<0>(first.outward());
    third.attach_input::<0>(second.outward());
    fourth.attach_input::<0>(third.outward());

    let mut executor = GraphExecutor::new();
    executor.submit(first.clone());
    executor.submit(second.clone());
    executor.submit(third.clone());
    executor.submit(fourth.clone());
    executor.run().unwrap();
    executor.wait();

    assert_eq!(counter.load(Ordering::Acquire), 4);
    for task in [&second, &third, &fourth] {
        assert_eq!(task.state(), TaskState::Complete);
    }
    assert_eq!(first.state(), TaskState::Complete);

    // Strict start-time ordering down the chain.
    assert!(second.started_at().unwrap() >= first.finished_at().unwrap());
    assert!(third.started_at().unwrap() >= second.finished_at().unwrap());
    assert!(fourth.started_at().unwrap() >= third.finished_at().unwrap());
}

#[test]
fn signal_gates_a_data_edge() {
    let gate_opened = Arc::new(AtomicUsize::new(0));

    let gate = {
        let gate_opened = Arc::clone(&gate_opened);
        Task::<()>::new(move || {
            gate_opened.fetch_add(1, Ordering::AcqRel);
        })
    };
    let value = Task::<i32>::new(|| 21);
    // One data input plus one pure dependency.
    let gated = {
        let gate_opened = Arc::clone(&gate_opened);
        Task::<i32, (i32, ())>::new(move |x: i32, _: ()| {
            assert_eq!(gate_opened.load(Ordering::Acquire), 1);
            x * 2
        })
    };
    gated.attach_input::<0>(value.outward());
    gated.attach_input::<1>(gate.outward());

    let mut executor = GraphExecutor::new();
    executor.submit(gate.clone());
    executor.submit(value.clone());
    executor.submit(gated.clone());
    executor.run().unwrap();
    executor.wait();

    assert_eq!(gated.result(), Some(42));
}

#[test]
fn attach_signal_by_type() {
    let done = Arc::new(AtomicUsize::new(0));

    let step = {
        let done = Arc::clone(&done);
        Task::<()>::new(move || {
            done.fetch_add(1, Ordering::AcqRel);
        })
    };
    let value = Task::<i32>::new(|| 5);
    let after = Task::<i32, ((), i32)>::new(|_: (), x: i32| x + 1);

    after.attach_input_by_type(step.outward());
    after.attach_input_by_type(value.outward());

    let mut executor = GraphExecutor::new();
    executor.submit(step.clone());
    executor.submit(value.clone());
    executor.submit(after.clone());
    executor.run().unwrap();
    executor.wait();

    assert_eq!(after.result(), Some(6));
    assert_eq!(done.load(Ordering::Acquire), 1);
}
