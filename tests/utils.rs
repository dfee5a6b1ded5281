use statsd_reporter::prelude::*;
use std::sync::Arc;
use std::thread;

pub const NUM_THREADS: u64 = 8;
pub const NUM_ITERATIONS: u64 = 500;

#[allow(dead_code)]
pub fn run_arc_threaded_test<R>(reporter: R, num_threads: u64, iterations: u64) -> Arc<R>
where
    R: Reporter + Send + Sync + 'static,
{
    let shared = Arc::new(reporter);

    let threads: Vec<_> = (0..num_threads)
        .map(|t| {
            let local = Arc::clone(&shared);

            thread::spawn(move || {
                for i in 0..iterations {
                    local.count(&format!("thread{}.counter", t), i as f64, 1.0);
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }

    shared
}

/// Split received datagrams into individual metric lines.
#[allow(dead_code)]
pub fn datagram_lines(datagrams: &[Vec<u8>]) -> Vec<String> {
    datagrams
        .iter()
        .flat_map(|d| String::from_utf8(d.clone()).unwrap().lines().map(String::from).collect::<Vec<_>>())
        .collect()
}
