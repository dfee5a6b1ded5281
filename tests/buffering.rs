use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use statsd_reporter::prelude::*;
use statsd_reporter::{BufferingClient, SpyTransport};

mod utils;
use utils::{datagram_lines, run_arc_threaded_test, NUM_ITERATIONS, NUM_THREADS};

#[test]
fn test_no_datagram_exceeds_packet_size() {
    let (rx, transport) = SpyTransport::new();
    let client = BufferingClient::builder("some.prefix.", transport)
        .with_packet_size(64)
        .build();

    for i in 0..500 {
        client.count("requests", i as f64, 1.0);
        client.gauge("a.longer.bucket.name.here", i as f64 / 3.0);
        client.timing("db.query", 0.5 * i as f64);
        client.count_unique("users", &format!("user {}!", i));
    }
    client.flush().unwrap();

    let datagrams: Vec<Vec<u8>> = rx.try_iter().collect();
    assert!(datagrams.len() > 1);
    assert!(datagrams.iter().all(|d| !d.is_empty() && d.len() <= 64));
    assert_eq!(2000, datagram_lines(&datagrams).len());
}

#[test]
fn test_everything_under_packet_size_in_one_datagram() {
    let (rx, transport) = SpyTransport::new();
    let client = BufferingClient::from_transport("", transport);

    let expected: Vec<String> = (0..10).map(|i| format!("bucket{}:{}|c", i, i)).collect();
    for i in 0..10 {
        client.count(&format!("bucket{}", i), i as f64, 1.0);
    }

    // Nothing should have been sent yet
    assert!(rx.try_recv().is_err());

    client.flush().unwrap();
    let datagrams: Vec<Vec<u8>> = rx.try_iter().collect();

    assert_eq!(1, datagrams.len());
    assert_eq!(expected.join("\n").as_bytes(), datagrams[0].as_slice());
}

#[test]
fn test_full_sample_rate_records_every_call() {
    let (rx, transport) = SpyTransport::new();
    let client = BufferingClient::builder("", transport)
        .with_rng(ChaCha8Rng::seed_from_u64(99))
        .build();

    for _ in 0..1000 {
        client.count("every", 1.0, 1.0);
    }
    client.flush().unwrap();

    let lines = datagram_lines(&rx.try_iter().collect::<Vec<_>>());
    assert_eq!(1000, lines.len());
    assert!(lines.iter().all(|l| l == "every:1|c"));
}

#[test]
fn test_sampled_fraction_converges_to_rate() {
    let (rx, transport) = SpyTransport::new();
    let client = BufferingClient::builder("", transport)
        .with_rng(ChaCha8Rng::seed_from_u64(1234))
        .build();

    for _ in 0..20_000 {
        client.count("sampled", 1.0, 0.1);
    }
    client.flush().unwrap();

    let lines = datagram_lines(&rx.try_iter().collect::<Vec<_>>());
    let fraction = lines.len() as f64 / 20_000.0;

    assert!(fraction > 0.085 && fraction < 0.115, "fraction was {}", fraction);
    assert!(lines.iter().all(|l| l == "sampled:1|c|@0.1"));
}

#[test]
fn test_unsampled_kinds_ignore_rng() {
    let (rx, transport) = SpyTransport::new();
    let client = BufferingClient::builder("", transport)
        .with_rng(ChaCha8Rng::seed_from_u64(3))
        .build();

    for _ in 0..100 {
        client.gauge("g", 1.0);
        client.timing("t", 2.0);
        client.count_unique("s", "x");
    }
    client.flush().unwrap();

    let lines = datagram_lines(&rx.try_iter().collect::<Vec<_>>());
    assert_eq!(300, lines.len());
    assert!(lines.iter().all(|l| !l.contains("|@")));
}

#[test]
fn test_concurrent_callers_lines_not_lost_or_interleaved() {
    let (rx, transport) = SpyTransport::new();
    let client = BufferingClient::builder("", transport).with_packet_size(128).build();

    let client = run_arc_threaded_test(client, NUM_THREADS, NUM_ITERATIONS);
    client.flush().unwrap();

    let datagrams: Vec<Vec<u8>> = rx.try_iter().collect();
    assert!(datagrams.iter().all(|d| d.len() <= 128));

    let lines = datagram_lines(&datagrams);
    assert_eq!((NUM_THREADS * NUM_ITERATIONS) as usize, lines.len());

    for t in 0..NUM_THREADS {
        let prefix = format!("thread{}.counter:", t);
        let mut values: Vec<u64> = lines
            .iter()
            .filter(|l| l.starts_with(&prefix))
            .map(|l| {
                assert!(l.ends_with("|c"), "corrupted line: {}", l);
                l[prefix.len()..l.len() - 2].parse().unwrap()
            })
            .collect();

        values.sort_unstable();
        assert_eq!((0..NUM_ITERATIONS).collect::<Vec<_>>(), values);
    }
}

#[test]
fn test_flush_reports_transport_failure() {
    let (rx, transport) = SpyTransport::new();
    let client = BufferingClient::from_transport("", transport);

    client.incr("lost");
    drop(rx);

    assert!(client.flush().is_err());
    assert_eq!(1, client.stats().packets_dropped);
}
