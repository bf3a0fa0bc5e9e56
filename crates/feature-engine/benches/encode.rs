use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::ModelSpec;

fn bench_encode(c: &mut Criterion) {
    let spec = ModelSpec::insurance();
    let validator = spec.validator();
    let encoder = spec.encoder();
    let body = serde_json::json!({
        "age": 30, "sex": "male", "bmi": 25.0, "children": 1, "smoker": "no", "region": "northeast"
    });

    c.bench_function("validate_and_encode_insurance", |b| {
        b.iter(|| {
            let input = validator.validate_json(black_box(&body)).unwrap();
            black_box(encoder.encode(&input))
        })
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
