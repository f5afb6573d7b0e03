//! Lock-free arena under real thread contention

use bump_arena::{AtomicArena, HeapBuffer};
use std::sync::Barrier;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

/// Run `THREADS` threads, each making `PER_THREAD` requests of `len` bytes at
/// `align`, and collect every successful block as `(start, len)`.
fn hammer(arena: &AtomicArena<'_>, len: usize, align: usize) -> Vec<(usize, usize)> {
    let barrier = Barrier::new(THREADS);

    let per_thread: Vec<Vec<(usize, usize)>> = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = &barrier;
                s.spawn(move |_| {
                    barrier.wait();
                    let mut got = Vec::new();
                    for _ in 0..PER_THREAD {
                        if let Ok(block) = arena.alloc(len, align) {
                            got.push((block.cast::<u8>().as_ptr() as usize, block.len()));
                        }
                    }
                    got
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect()
    })
    .expect("scope");

    per_thread.into_iter().flatten().collect()
}

#[test]
fn concurrent_blocks_are_disjoint_and_in_bounds() {
    let capacity = THREADS * PER_THREAD * 16;
    let mut buffer = HeapBuffer::new(capacity, 16).expect("buffer");
    let start = buffer.as_slice().as_ptr() as usize;
    let arena = buffer.atomic_arena();

    let mut blocks = hammer(&arena, 12, 16);
    assert_eq!(blocks.len(), THREADS * PER_THREAD);

    blocks.sort_unstable();
    for (block_start, len) in &blocks {
        assert_eq!(block_start % 16, 0);
        assert!(*block_start >= start);
        assert!(block_start + len <= start + capacity);
    }
    for pair in blocks.windows(2) {
        let (a, a_len) = pair[0];
        let (b, _) = pair[1];
        assert!(a + a_len <= b, "blocks {:#x} and {:#x} overlap", a, b);
    }
}

#[test]
fn contended_exhaustion_matches_sequential_count() {
    // Room for fewer blocks than are requested in total.
    let capacity = 1000 * 32;
    let mut buffer = HeapBuffer::new(capacity, 32).expect("buffer");

    let sequential = {
        let mut arena = buffer.arena();
        let mut count = 0;
        for _ in 0..THREADS * PER_THREAD {
            if arena.alloc(32, 32).is_ok() {
                count += 1;
            }
        }
        count
    };

    let arena = buffer.atomic_arena();
    let blocks = hammer(&arena, 32, 32);

    assert_eq!(sequential, 1000);
    assert_eq!(blocks.len(), sequential);
    assert_eq!(arena.remaining(), 0);
}

#[test]
fn failures_are_immediate_once_full() {
    let mut buffer = HeapBuffer::new(64, 8).expect("buffer");
    let arena = buffer.atomic_arena();
    arena.alloc(64, 8).expect("fill");

    let blocks = hammer(&arena, 1, 1);
    assert!(blocks.is_empty());
    assert_eq!(arena.used(), 64);
}
