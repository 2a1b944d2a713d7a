use criterion::{criterion_group, criterion_main};

mod mqtt;

criterion_group!(
    benches,
    mqtt::dispatch::bench_dispatch,
    mqtt::dispatch::bench_dispatch_chunked,
    mqtt::dispatch::bench_replay
);
criterion_main!(benches);
