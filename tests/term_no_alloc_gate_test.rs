use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use whack_a_braille::core::{RoundEngine, RoundParams, RoundSnapshot};
use whack_a_braille::term::{FrameBuffer, GameView, HudView, Viewport};
use whack_a_braille::types::{Difficulty, SpeechOutcome, TICK_MS};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn board_render_is_allocation_free_after_warmup() {
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    let mut engine = RoundEngine::new(7);
    engine.start(RoundParams::new("grade1Letters", Difficulty::Normal, 30_000));
    while engine.active_mole_id().is_none() {
        engine.tick(TICK_MS);
    }
    engine.announcement_settled(engine.active_mole_id(), SpeechOutcome::started_after(0));
    let _ = engine.take_effects();

    let hud = HudView {
        status: "Ready?",
        hit_slot: Some(1),
        speech_enabled: true,
    };
    let mut snap = RoundSnapshot::default();

    // Warm-up (string capacity, framebuffer size).
    engine.snapshot_into(&mut snap);
    view.render_into(&snap, &hud, viewport, &mut fb);

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            engine.snapshot_into(&mut snap);
            view.render_into(&snap, &hud, viewport, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}
