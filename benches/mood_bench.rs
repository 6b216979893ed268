use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kaori_core::mood::{
    parse, select, validate, DominanceRule, ReactionPolicy, ReactionTables, StdReactionRng,
};
use kaori_core::{Dimension, MoodConfig, MoodSettings, MoodStore, MoodVector};

const RESPONSE: &str =
    "Affection:0.8, Amused:0.3, Inspired:-0.1, Frustrated:-0.4, Anxious:0.05, Curious:0.6";

fn settings() -> MoodSettings {
    let config = MoodConfig::from_toml(
        "[nature]\nAffection = 7\nAmused = 5\nInspired = 6\nFrustrated = 4\nAnxious = 3\nCurious = 6\n",
    )
    .expect("bench config parses");
    MoodSettings::from_config(&config).expect("bench config validates")
}

fn bench_parse_validate(c: &mut Criterion) {
    c.bench_function("parse_validate", |b| {
        b.iter(|| validate(&parse(black_box(RESPONSE)).unwrap()).unwrap())
    });
}

fn bench_full_update(c: &mut Criterion) {
    let settings = settings();
    let store = MoodStore::new();
    c.bench_function("parse_validate_apply", |b| {
        b.iter(|| {
            let delta = validate(&parse(black_box(RESPONSE)).unwrap()).unwrap();
            store.apply_update(&delta, &settings.weights)
        })
    });
}

fn bench_select(c: &mut Criterion) {
    let tables = ReactionTables::default();
    let mut rng = StdReactionRng::seeded(7);
    let mut group = c.benchmark_group("select");

    for (label, vector) in [
        ("neutral", MoodVector::neutral()),
        ("gated", MoodVector::neutral().with(Dimension::Affection, 0.95)),
    ] {
        for rule in [DominanceRule::RawValue, DominanceRule::DistanceFromNeutral] {
            let policy = ReactionPolicy { threshold: 0.8, dominance: rule };
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", rule), label),
                &vector,
                |b, v| b.iter(|| select(black_box(v), &policy, &tables, &mut rng)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_parse_validate, bench_full_update, bench_select);
criterion_main!(benches);
