use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::{Duration, Instant};

use formation_terminal::debounce::Debouncer;
use formation_terminal::fields::Field;
use formation_terminal::form::FormState;
use formation_terminal::predict_fetch::{parse_error_message, parse_prediction_json};
use formation_terminal::validation::validate;

const PREDICTION_JSON: &str = r#"{"prediction":"4-3-3","confidence":87}"#;
const ERROR_JSON: &str = r#"{"error":"model unavailable"}"#;

fn sample_form() -> FormState {
    let mut form = FormState::new();
    for (field, value) in [
        (Field::ExpectedGoals, "1.5"),
        (Field::ExpectedGoalsAgainst, "oops"),
        (Field::Possession, "150"),
        (Field::ExpectedAssists, "0.8"),
        (Field::KeyPasses, "10"),
        (Field::PassesPenaltyArea, "-2"),
        (Field::ProgressivePasses, "30"),
    ] {
        form.set_value(field, value);
    }
    form
}

fn bench_collect_and_validate(c: &mut Criterion) {
    let form = sample_form();
    c.bench_function("collect_and_validate", |b| {
        b.iter(|| {
            let values = form.collect();
            black_box(validate(black_box(&values)));
        })
    });
}

fn bench_response_parse(c: &mut Criterion) {
    c.bench_function("prediction_parse", |b| {
        b.iter(|| {
            let _ = parse_prediction_json(black_box(PREDICTION_JSON));
        })
    });
    c.bench_function("error_body_parse", |b| {
        b.iter(|| black_box(parse_error_message(black_box(ERROR_JSON))))
    });
}

fn bench_debounce_churn(c: &mut Criterion) {
    c.bench_function("debounce_churn", |b| {
        b.iter(|| {
            let mut d = Debouncer::new(Duration::from_millis(300));
            let t0 = Instant::now();
            for (i, field) in Field::ALL.iter().cycle().take(200).enumerate() {
                d.trigger(*field, t0 + Duration::from_millis(i as u64 * 10));
            }
            black_box(d.take_due(t0 + Duration::from_secs(10)));
        })
    });
}

criterion_group!(
    benches,
    bench_collect_and_validate,
    bench_response_parse,
    bench_debounce_churn
);
criterion_main!(benches);
