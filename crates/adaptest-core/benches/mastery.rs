use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use adaptest_core::mastery::{running_average, MasterySkillTracker};
use adaptest_core::model::{Skill, StudentProfile};

fn make_tracker(skills: usize) -> MasterySkillTracker {
    let profile = StudentProfile {
        skills: (0..skills)
            .map(|i| Skill::new(format!("topic-{i}"), (i % 101) as i64))
            .collect(),
        ..StudentProfile::default()
    };
    MasterySkillTracker::new(profile).unwrap()
}

fn bench_running_average(c: &mut Criterion) {
    c.bench_function("running_average", |b| {
        b.iter(|| running_average(black_box(78.0), black_box(12), black_box(66.67)))
    });
}

fn bench_finalize_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("finalize_session");

    for skills in [3usize, 50, 500] {
        group.bench_function(format!("skills={skills}"), |b| {
            b.iter_batched(
                || make_tracker(skills),
                |mut tracker| tracker.finalize_session(black_box(3), black_box(5)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_running_average, bench_finalize_session);
criterion_main!(benches);
