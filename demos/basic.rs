//! Minimal end-to-end run: wire a diamond, execute it, read the results.

use weft::{GraphExecutor, Task};

fn main() {
    let top = Task::<i32>::new(|| 10);
    let left = Task::<i32, (i32,)>::new(|x: i32| x * 2);
    let right = Task::<i32, (i32,)>::new(|x: i32| x * 3);
    let bottom = Task::<i32, (i32, i32)>::new(|l: i32, r: i32| l + r);

    left.attach_input::<0>(top.outward());
    right.attach_input::<0>(top.outward());
    bottom.attach_input::<0>(left.outward());
    bottom.attach_input::<1>(right.outward());

    let mut executor = GraphExecutor::new();
    executor.submit(top.clone());
    executor.submit(left.clone());
    executor.submit(right.clone());
    executor.submit(bottom.clone());
    executor.run().expect("first run");
    executor.wait();

    println!("top    = {:?}", top.result());
    println!("left   = {:?}", left.result());
    println!("right  = {:?}", right.result());
    println!("bottom = {:?} (in {:?})", bottom.result(), bottom.duration());
}
