// Randomized layered DAGs checked against the engine's invariants

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;

use weft::{Edge, GraphExecutor, GraphNode, RunnableTask, Task, TaskState};

struct RandomGraph {
    tasks: Vec<Arc<dyn RunnableTask>>,
    // (producer, consumer) index pairs, one per wired edge
    wires: Vec<(usize, usize)>,
}

fn build(rng: &mut impl Rng) -> RandomGraph {
    let mut tasks: Vec<Arc<dyn RunnableTask>> = Vec::new();
    let mut outward: Vec<Arc<Edge<i64>>> = Vec::new();
    let mut wires = Vec::new();

    for _ in 0..rng.gen_range(3..=6) {
        let seed: i64 = rng.gen_range(1..100);
        let task = Task::<i64>::new(move || seed);
        outward.push(task.outward().clone());
        tasks.push(task);
    }

    for _ in 0..3 {
        let layer_base = tasks.len();
        for _ in 0..rng.gen_range(2..=5) {
            let task = Task::<i64, (i64, i64)>::new(|a: i64, b: i64| a + b);
            let left = rng.gen_range(0..layer_base);
            let right = rng.gen_range(0..layer_base);
            task.attach_input::<0>(&outward[left]);
            task.attach_input::<1>(&outward[right]);
            wires.push((left, tasks.len()));
            wires.push((right, tasks.len()));
            outward.push(task.outward().clone());
            tasks.push(task);
        }
    }

    RandomGraph { tasks, wires }
}

#[test]
fn random_graphs_satisfy_the_engine_invariants() {
    let mut rng = rand::thread_rng();

    for _ in 0..5 {
        let graph = build(&mut rng);

        let mut executor = GraphExecutor::new();
        for task in &graph.tasks {
            executor.submit(Arc::clone(task));
        }
        executor.run().unwrap();
        executor.wait();

        // Every submitted task completed.
        for task in &graph.tasks {
            assert_eq!(task.state(), TaskState::Complete);
        }

        // Causal ordering along every wired edge.
        for &(producer, consumer) in &graph.wires {
            let produced = graph.tasks[producer].finished_at().unwrap();
            let consumed = graph.tasks[consumer].started_at().unwrap();
            assert!(produced <= consumed, "producer must end before consumer starts");
        }

        // Recomputing reachability is deterministic.
        let first: Vec<_> = graph.tasks.iter().map(|t| t.reachability()).collect();
        let mut visited = HashSet::new();
        for task in &graph.tasks {
            task.compute_reachability(&mut visited);
        }
        let second: Vec<_> = graph.tasks.iter().map(|t| t.reachability()).collect();
        assert_eq!(first, second);
    }
}
