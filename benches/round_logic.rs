use criterion::{black_box, criterion_group, criterion_main, Criterion};
use whack_a_braille::core::{
    calculate_hit_score, items_for_mode, RoundEngine, RoundParams, RoundSnapshot,
};
use whack_a_braille::input::InputResolver;
use whack_a_braille::types::{Attempt, Difficulty, InputMode, MoleId, SpeechOutcome, TICK_MS};

fn live_engine() -> RoundEngine {
    let mut engine = RoundEngine::new(12345);
    engine.start(RoundParams::new("grade1Letters", Difficulty::Normal, u32::MAX));
    engine
}

fn bench_tick(c: &mut Criterion) {
    let mut engine = live_engine();

    c.bench_function("round_tick_16ms", |b| {
        b.iter(|| {
            engine.tick(black_box(TICK_MS));
            let mole = engine.active_mole_id();
            if !mole.is_none() && !engine.is_slot_visible() {
                engine.announcement_settled(mole, SpeechOutcome::started_after(0));
            }
            engine.take_effects();
        })
    });
}

fn bench_attempt(c: &mut Criterion) {
    let mut engine = live_engine();

    c.bench_function("resolve_stale_attempt", |b| {
        b.iter(|| {
            engine.handle_attempt(black_box(Attempt::chord(0b1, MoleId(u32::MAX))));
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let engine = live_engine();
    let mut snap = RoundSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            engine.snapshot_into(&mut snap);
            black_box(&snap);
        })
    });
}

fn bench_mode_pool(c: &mut Criterion) {
    c.bench_function("items_for_everything", |b| {
        b.iter(|| items_for_mode(black_box("everything")))
    });
}

fn bench_hit_score(c: &mut Criterion) {
    c.bench_function("hit_score", |b| {
        b.iter(|| calculate_hit_score(black_box(25)))
    });
}

fn bench_chord(c: &mut Criterion) {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut resolver = InputResolver::new().with_release_events(true);
    resolver.set_input_mode(InputMode::Perkins);
    resolver.set_attempt_sink(Some(tx));
    resolver.publish_active_mole_id(MoleId(1));

    c.bench_function("perkins_chord", |b| {
        b.iter(|| {
            for key in ['f', 'd', 'j'] {
                resolver.key_down(key);
            }
            for key in ['f', 'd', 'j'] {
                resolver.key_up(key);
            }
            resolver.update(TICK_MS);
            resolver.update(TICK_MS);
            while rx.try_recv().is_ok() {}
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_attempt,
    bench_snapshot,
    bench_mode_pool,
    bench_hit_score,
    bench_chord
);
criterion_main!(benches);
