//! Cancelling queued work mid-flight on a bare pool.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use weft::WorkerPool;

fn main() {
    let executed = Arc::new(AtomicUsize::new(0));
    let mut pool = WorkerPool::new(4);

    for _ in 0..10_000 {
        let executed = Arc::clone(&executed);
        pool.submit(move || {
            thread::sleep(Duration::from_millis(1));
            executed.fetch_add(1, Ordering::AcqRel);
        });
    }
    pool.start();

    thread::sleep(Duration::from_millis(50));
    pool.cancel_queued();
    pool.wait();

    println!(
        "executed {} of 10000 before the cancel took effect",
        executed.load(Ordering::Acquire)
    );
}
