use criterion::{BatchSize, Criterion, Throughput};
use std::hint::black_box;
use mqtt_dispatch::mqtt::{
    Client, Data, Engine, Event, MAX_SUBSCRIPTIONS, Message, MessageId, QoS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Engine that accepts every request and does nothing
#[derive(Debug, Default)]
struct NullEngine;

impl Engine for NullEngine {
    type Error = ();

    fn start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn publish(&mut self, _: &str, _: &[u8], _: QoS, _: bool) -> Result<MessageId, Self::Error> {
        Ok(0)
    }

    fn subscribe(&mut self, _: &str, _: QoS) -> Result<MessageId, Self::Error> {
        Ok(0)
    }

    fn unsubscribe(&mut self, _: &str) -> Result<MessageId, Self::Error> {
        Ok(0)
    }
}

fn consume(message: &Message<'_>) {
    black_box(message.payload);
}

fn topics() -> Vec<String> {
    (0..MAX_SUBSCRIPTIONS)
        .map(|i| format!("bench/devices/{i}/state"))
        .collect()
}

fn setup_client(topics: &[String]) -> Client<NullEngine, fn(&Message<'_>)> {
    let mut client: Client<NullEngine, fn(&Message<'_>)> = Client::new();
    for topic in topics {
        client
            .subscribe(topic, QoS::AtMostOnce, consume)
            .expect("Failed to subscribe");
    }
    client.attach(NullEngine).expect("Failed to start");
    client.handle_event(Event::Connected);
    client
}

fn random_payload(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut payload = vec![0u8; len];
    rng.fill(&mut payload[..]);
    payload
}

pub fn bench_dispatch(c: &mut Criterion) {
    let topics = topics();
    let payload = random_payload(256);
    let mut client = setup_client(&topics);

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Bytes(payload.len() as u64 * topics.len() as u64));
    group.bench_function("dispatch_all_topics", |b| {
        b.iter(|| {
            for topic in &topics {
                client.handle_event(Event::Data(Data::complete(topic, &payload)));
            }
        })
    });
    group.bench_function("dispatch_unknown_topic", |b| {
        b.iter(|| {
            client.handle_event(Event::Data(Data::complete("bench/unknown", &payload)));
        })
    });
    group.finish();
}

pub fn bench_dispatch_chunked(c: &mut Criterion) {
    let topics = topics();
    let payload = random_payload(4000);
    let mut client = setup_client(&topics);

    let mut group = c.benchmark_group("dispatch_chunked");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("reassemble_1k_chunks", |b| {
        b.iter(|| {
            for (i, chunk) in payload.chunks(1024).enumerate() {
                client.handle_event(Event::Data(Data {
                    topic: if i == 0 { topics[0].as_str() } else { "" },
                    payload: chunk,
                    offset: i * 1024,
                    total_len: payload.len(),
                }));
            }
        })
    });
    group.finish();
}

pub fn bench_replay(c: &mut Criterion) {
    let topics = topics();

    let mut group = c.benchmark_group("replay");
    group.bench_function("replay_on_connect", |b| {
        b.iter_batched_ref(
            || setup_client(&topics),
            |client| {
                client.handle_event(Event::Disconnected);
                client.handle_event(Event::Connected);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}
