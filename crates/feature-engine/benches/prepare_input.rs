use app_config::AppConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{FeatureEngineer, ModelTarget, RawInput};

fn bench_prepare_input(c: &mut Criterion) {
    let config = AppConfig::default();
    let engineer = FeatureEngineer::new(&config);
    let input = RawInput::from_defaults(&config).with("Population", 5_000_000.0);
    let required: Vec<String> = [
        "HDI_GDP_interaction",
        "Economic_Health",
        "Trade_Openness",
        "Peace_Index",
        "Population_log",
        "Happiness_Norm",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    c.bench_function("prepare_input_classification", |b| {
        b.iter(|| {
            engineer.prepare_input(
                black_box(&input),
                black_box(&required),
                ModelTarget::Classification,
            )
        })
    });

    c.bench_function("prepare_input_regression", |b| {
        b.iter(|| {
            engineer.prepare_input(
                black_box(&input),
                black_box(&required),
                ModelTarget::Regression,
            )
        })
    });
}

criterion_group!(benches, bench_prepare_input);
criterion_main!(benches);
