use criterion::{criterion_group, criterion_main, Criterion};
use statsd_reporter::prelude::*;
use statsd_reporter::{BufferingClient, MockReporter, NoOpClient, NopTransport};

fn benchmark_buffering_client(c: &mut Criterion) {
    let client = BufferingClient::from_transport("client.bench.", NopTransport);

    c.bench_function("buffering_client_count", |b| {
        b.iter(|| client.count("some.counter", 4.0, 1.0))
    });

    c.bench_function("buffering_client_count_sampled", |b| {
        b.iter(|| client.count("some.counter", 4.0, 0.1))
    });

    c.bench_function("buffering_client_gauge_f64", |b| {
        b.iter(|| client.gauge("some.gauge", 2.5))
    });

    c.bench_function("buffering_client_count_unique", |b| {
        b.iter(|| client.count_unique("some.set", "user name 1234"))
    });
}

fn benchmark_other_reporters(c: &mut Criterion) {
    let noop = NoOpClient;
    c.bench_function("noop_client_count", |b| b.iter(|| noop.count("some.counter", 4.0, 1.0)));

    let mock = MockReporter::new();
    c.bench_function("mock_reporter_count", |b| b.iter(|| mock.count("some.counter", 4.0, 1.0)));
}

criterion_group!(benches, benchmark_buffering_client, benchmark_other_reporters);

criterion_main!(benches);
