// End-to-end graph scenarios

use crate::common::{binary, constant, unary};

use weft::{GraphExecutor, GraphNode, Task, TaskState};

#[test]
fn producer_consumer_doubling() {
    let producer = constant(42);
    let consumer = unary(|x| x * 2);
    consumer.attach_input::<0>(producer.outward());

    let mut executor = GraphExecutor::new();
    executor.submit(producer.clone());
    executor.submit(consumer.clone());
    executor.run().unwrap();
    executor.wait();

    assert_eq!(producer.result(), Some(42));
    assert_eq!(consumer.result(), Some(84));
    assert_eq!(producer.state(), TaskState::Complete);
    assert_eq!(consumer.state(), TaskState::Complete);
}

#[test]
fn linear_chain_of_five() {
    let head = constant(1);
    let links = [
        unary(|x| x + 1),
        unary(|x| x + 1),
        unary(|x| x + 1),
        unary(|x| x + 1),
    ];

    links[0].attach_input::<0>(head.outward());
    links[1].attach_input::<0>(links[0].outward());
    links[2].attach_input::<0>(links[1].outward());
    links[3].attach_input::<0>(links[2].outward());

    let mut executor = GraphExecutor::new();
    executor.submit(head.clone());
    for link in &links {
        executor.submit(link.clone());
    }
    executor.run().unwrap();
    executor.wait();

    assert_eq!(links[3].result(), Some(5));
    assert_eq!(head.reachability(), 0);
    for (i, link) in links.iter().enumerate() {
        assert_eq!(link.reachability(), i + 1);
    }
}

#[test]
fn diamond() {
    let top = constant(10);
    let left = unary(|x| x * 2);
    let right = unary(|x| x * 3);
    let bottom = binary(|l, r| l + r);

    left.attach_input::<0>(top.outward());
    right.attach_input::<0>(top.outward());
    bottom.attach_input::<0>(left.outward());
    bottom.attach_input::<1>(right.outward());

    let mut executor = GraphExecutor::new();
    executor.submit(top.clone());
    executor.submit(left.clone());
    executor.submit(right.clone());
    executor.submit(bottom.clone());
    executor.run().unwrap();
    executor.wait();

    assert_eq!(top.result(), Some(10));
    assert_eq!(left.result(), Some(20));
    assert_eq!(right.result(), Some(30));
    assert_eq!(bottom.result(), Some(50));

    let bottom_start = bottom.started_at().unwrap();
    assert!(bottom_start >= left.finished_at().unwrap());
    assert!(bottom_start >= right.finished_at().unwrap());
}

#[test]
fn fan_in_sum() {
    let producers: Vec<_> = (1..=5).map(constant).collect();
    let sum = Task::<i32, (i32, i32, i32, i32, i32)>::new(
        |a: i32, b: i32, c: i32, d: i32, e: i32| a + b + c + d + e,
    );

    sum.attach_input::<0>(producers[0].outward());
    sum.attach_input::<1>(producers[1].outward());
    sum.attach_input::<2>(producers[2].outward());
    sum.attach_input::<3>(producers[3].outward());
    sum.attach_input::<4>(producers[4].outward());

    let mut executor = GraphExecutor::new();
    for producer in &producers {
        executor.submit(producer.clone());
    }
    executor.submit(sum.clone());
    executor.run().unwrap();
    executor.wait();

    assert_eq!(sum.result(), Some(15));
}

#[test]
fn submission_order_does_not_matter() {
    let top = constant(2);
    let middle = unary(|x| x + 3);
    let bottom = unary(|x| x * 10);
    middle.attach_input::<0>(top.outward());
    bottom.attach_input::<0>(middle.outward());

    // Sinks first; the priority pass reorders before dispatch.
    let mut executor = GraphExecutor::new();
    executor.submit(bottom.clone());
    executor.submit(middle.clone());
    executor.submit(top.clone());
    executor.run().unwrap();
    executor.wait();

    assert_eq!(bottom.result(), Some(50));
}
