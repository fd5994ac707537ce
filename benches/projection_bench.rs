use criterion::{Criterion, black_box, criterion_group, criterion_main};
use notechart::model::{Note, NoteList};
use notechart::stage::{StageConfig, StageProjection};

fn dense_chart(count: usize) -> NoteList {
    NoteList::from_notes((0..count).map(|i| Note {
        time: i as f32 * 0.05,
        position: (i % 9) as f32 - 4.0,
        duration: if i % 4 == 0 { 0.3 } else { 0.0 },
        ..Default::default()
    }))
}

fn projection_benchmark(c: &mut Criterion) {
    let config = StageConfig::default();
    let notes = dense_chart(10_000);

    c.bench_function("rebuild_10k_notes", |b| {
        let mut projection = StageProjection::new();
        b.iter(|| {
            projection.rebuild(black_box(&notes), &config);
        });
    });

    c.bench_function("merge_10k_notes", |b| {
        let mut projection = StageProjection::new();
        projection.rebuild(&notes, &config);
        b.iter(|| {
            black_box(projection.merged_notes(&notes));
        });
    });
}

criterion_group!(benches, projection_benchmark);
criterion_main!(benches);
