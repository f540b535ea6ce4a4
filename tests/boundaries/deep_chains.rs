// Long dependency chains

use std::sync::Arc;

use weft::{Edge, GraphExecutor, GraphNode, Task};

#[test]
fn chain_of_two_hundred() {
    let mut executor = GraphExecutor::with_worker_count(2);

    let head = Task::<i64>::new(|| 0);
    let mut tail: Arc<Edge<i64>> = head.outward().clone();
    executor.submit(head.clone());

    let mut links = Vec::new();
    for _ in 0..200 {
        let link = Task::<i64, (i64,)>::new(|x: i64| x + 1);
        link.attach_input::<0>(&tail);
        tail = link.outward().clone();
        executor.submit(link.clone());
        links.push(link);
    }

    executor.run().unwrap();
    executor.wait();

    assert_eq!(links.last().unwrap().result(), Some(200));
    assert_eq!(links.last().unwrap().reachability(), 200);
}

#[test]
fn wide_and_deep_grid() {
    // Four parallel chains of 50, then a join.
    let mut executor = GraphExecutor::new();
    let mut chain_tails = Vec::new();

    for lane in 0..4i64 {
        let head = Task::<i64>::new(move || lane);
        let mut tail = head.outward().clone();
        executor.submit(head.clone());
        for _ in 0..50 {
            let link = Task::<i64, (i64,)>::new(|x: i64| x + 1);
            link.attach_input::<0>(&tail);
            tail = link.outward().clone();
            executor.submit(link.clone());
        }
        chain_tails.push(tail);
    }

    let join = Task::<i64, (i64, i64, i64, i64)>::new(|a: i64, b: i64, c: i64, d: i64| a + b + c + d);
    join.attach_input::<0>(&chain_tails[0]);
    join.attach_input::<1>(&chain_tails[1]);
    join.attach_input::<2>(&chain_tails[2]);
    join.attach_input::<3>(&chain_tails[3]);
    executor.submit(join.clone());

    executor.run().unwrap();
    executor.wait();

    // (0+50) + (1+50) + (2+50) + (3+50)
    assert_eq!(join.result(), Some(206));
}
