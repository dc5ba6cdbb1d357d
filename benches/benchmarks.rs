use criterion::{black_box, criterion_group, criterion_main, Criterion};

use confluent_monitor::monitor::{AggregationState, PathShape};
use confluent_monitor::prom::parse_document;

fn export(topics: usize) -> String {
    let mut text = String::from(
        "# HELP confluent_kafka_server_received_bytes The delta count of bytes received.\n\
         # TYPE confluent_kafka_server_received_bytes gauge\n",
    );
    for topic in 0..topics {
        text.push_str(&format!(
            "confluent_kafka_server_received_bytes{{kafka_id=\"lkc-1\",topic=\"topic-{topic}\"}} {topic}.25 1700000000000\n"
        ));
    }
    text
}

fn parse(c: &mut Criterion) {
    let text = export(1_000);
    c.bench_function("parse 1000 samples", |b| b.iter(|| parse_document(black_box(&text))));
}

fn aggregate(c: &mut Criterion) {
    let document = parse_document(&export(1_000));
    c.bench_function("aggregate and build paths for 1000 samples", |b| {
        b.iter(|| {
            let mut state = AggregationState::default();
            for sample in &document.samples {
                state.record_labels(&sample.labels, true);
                let _ = state.add_to_sum(&sample.name, &sample.raw_value);
                black_box(PathShape::FreeForm.build("Production", &sample.labels, &sample.name));
            }
            state.reset();
        })
    });
}

criterion_group!(benches, parse, aggregate);
criterion_main!(benches);
