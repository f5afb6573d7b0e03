//! Property tests for the sequential arena

use bump_arena::{BumpArena, HeapBuffer};
use proptest::prelude::*;
use std::ptr::NonNull;

const CAPACITY: usize = 4096;

fn addr(block: NonNull<[u8]>) -> usize {
    block.cast::<u8>().as_ptr() as usize
}

fn request() -> impl Strategy<Value = (usize, usize)> {
    (0usize..300, 0u32..8).prop_map(|(len, shift)| (len, 1usize << shift))
}

proptest! {
    #[test]
    fn blocks_stay_in_bounds_and_aligned(requests in prop::collection::vec(request(), 1..64)) {
        let mut buffer = HeapBuffer::new(CAPACITY, 1).expect("buffer");
        let start = buffer.as_slice().as_ptr() as usize;
        let limit = start + CAPACITY;
        let mut arena = buffer.arena();
        let mut previous_end = start;

        for (len, align) in requests {
            let remaining = arena.remaining();
            match arena.alloc(len, align) {
                Ok(block) => {
                    let block_start = addr(block);
                    prop_assert_eq!(block.len(), len);
                    prop_assert_eq!(block_start % align, 0);
                    prop_assert!(block_start >= previous_end);
                    prop_assert!(block_start + len <= limit);
                    previous_end = block_start + len;
                }
                Err(_) => {
                    let padding = (align - previous_end % align) % align;
                    prop_assert!(padding + len > remaining);
                    prop_assert_eq!(arena.remaining(), remaining);
                }
            }
        }
    }

    #[test]
    fn restore_replays_next_address(
        prefix in prop::collection::vec(request(), 0..16),
        filler in prop::collection::vec(request(), 0..32),
        probe in request(),
    ) {
        let mut buffer = HeapBuffer::new(CAPACITY, 1).expect("buffer");
        let mut arena = buffer.arena();
        for (len, align) in prefix {
            let _ = arena.alloc(len, align);
        }

        let checkpoint = arena.checkpoint();
        let expected = arena.alloc(probe.0, probe.1).map(addr).ok();
        arena.restore(checkpoint);

        for (len, align) in filler {
            let _ = arena.alloc(len, align);
        }
        arena.restore(checkpoint);

        prop_assert_eq!(arena.alloc(probe.0, probe.1).map(addr).ok(), expected);
    }

    #[test]
    fn huge_requests_never_wrap(small in 0usize..64, slack in 0usize..1024, shift in 0u32..12) {
        let mut buffer = [0u8; 128];
        let mut arena = BumpArena::new(&mut buffer);
        arena.alloc(small, 1).expect("small alloc");
        let used = arena.used();

        prop_assert!(arena.alloc(usize::MAX - slack, 1usize << shift).is_err());
        prop_assert_eq!(arena.used(), used);
    }

    #[test]
    fn lifo_free_unwinds_to_empty(lens in prop::collection::vec(0usize..64, 1..32)) {
        let mut buffer = HeapBuffer::new(CAPACITY, 1).expect("buffer");
        let mut arena = buffer.arena();
        let blocks: Vec<_> = lens
            .iter()
            .map(|&len| arena.alloc(len, 1).expect("fits"))
            .collect();

        for block in blocks.into_iter().rev() {
            prop_assert!(arena.is_last(block));
            arena.free(block);
        }
        prop_assert_eq!(arena.used(), 0);
    }
}
