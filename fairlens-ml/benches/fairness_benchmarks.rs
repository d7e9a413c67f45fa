use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fairlens_ml::{
    LabeledRecord, MitigationTechnique, ScenarioDescriptor, compute_chi_squared,
    compute_contingency, compute_fairness_metrics, generate_reproducible_script,
    simulate_mitigation,
};

fn scenario(size: usize) -> ScenarioDescriptor {
    let records = (0..size)
        .map(|i| {
            let group = if i % 2 == 0 { "Younger" } else { "Older" };
            let outcome = if i % 3 == 0 { "Rejected" } else { "Hired" };
            LabeledRecord::new(group, outcome)
        })
        .collect();
    ScenarioDescriptor {
        scenario_text: "Hiring for a fast-paced startup".into(),
        protected_attribute_label: "age".into(),
        privileged_value: "Younger".into(),
        unprivileged_value: "Older".into(),
        outcome_attribute_label: "hiring_decision".into(),
        favorable_outcome_value: "Hired".into(),
        records,
    }
}

fn bench_engine(c: &mut Criterion) {
    let small = scenario(30);
    let large = scenario(100_000);

    c.bench_function("contingency_30_records", |b| {
        b.iter(|| {
            compute_contingency(
                black_box(&small.records),
                "subject_group",
                "Younger",
                "outcome",
                "Hired",
            )
        })
    });

    c.bench_function("fairness_metrics_30_records", |b| {
        b.iter(|| {
            compute_fairness_metrics(
                black_box(&small.records),
                "subject_group",
                "Hired",
                "outcome",
                "Younger",
            )
        })
    });

    c.bench_function("fairness_metrics_100k_records", |b| {
        b.iter(|| black_box(&large).compute_metrics())
    });

    c.bench_function("chi_squared", |b| {
        b.iter(|| compute_chi_squared(black_box(40), black_box(10), black_box(10), black_box(40)))
    });

    let before = small.compute_metrics();
    c.bench_function("simulate_mitigation", |b| {
        b.iter(|| simulate_mitigation(black_box(&before), MitigationTechnique::DisparateImpactRemover))
    });
}

fn bench_script(c: &mut Criterion) {
    let small = scenario(30);
    c.bench_function("reproducible_script_30_records", |b| {
        b.iter(|| generate_reproducible_script(black_box(&small)))
    });
}

criterion_group!(benches, bench_engine, bench_script);
criterion_main!(benches);
