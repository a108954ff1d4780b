use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use blockfall::core::{Game, GameSnapshot};
use blockfall::types::{Command, GamePhase, TICK_MS};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
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
fn core_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut game = Game::new(1);
    game.start();
    let mut snap = GameSnapshot::default();

    // Warm-up.
    game.advance(TICK_MS);
    game.apply(Command::MoveLeft);
    game.apply(Command::HardDrop);
    game.take_events().for_each(drop);

    let allocs = with_alloc_counting(|| {
        // Gravity should be allocation-free.
        for _ in 0..200 {
            game.advance(TICK_MS);
            game.snapshot_into(&mut snap);
            game.take_events().for_each(drop);
        }

        // Common commands should be allocation-free.
        for _ in 0..50 {
            game.apply(Command::MoveLeft);
            game.apply(Command::MoveRight);
            game.apply(Command::RotateCw);
            game.apply(Command::RotateCcw);
            game.apply(Command::SoftDropStart);
            game.apply(Command::SoftDropStop);
            game.take_events().for_each(drop);
        }

        // Hard drop drives the lock, sweep and spawn paths.
        for _ in 0..25 {
            game.apply(Command::HardDrop);
            game.advance(1000);
            if game.phase() == GamePhase::GameOver {
                game.apply(Command::Start);
            }
            game.take_events().for_each(drop);
        }
    });

    assert_eq!(allocs, 0);
}
