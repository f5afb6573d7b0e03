//! Lock-free bump arena - concurrent allocation via compare-and-swap
//!
//! Only allocation is available through a shared reference. Resizing and
//! freeing depend on "is this the last block", which cannot be answered
//! while other threads move the cursor, so they are reached by converting
//! back into a [`BumpArena`] with exclusive ownership.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::align::bump_bounds;
use super::{ArenaStats, BumpArena};
use crate::error::AllocError;
use crate::logging;

/// Bump allocator whose cursor lives in an atomic, for allocation from
/// many threads without locking.
pub struct AtomicArena<'a> {
    start: NonNull<u8>,
    cursor: AtomicUsize,
    limit: usize,
    _buffer: PhantomData<&'a mut [u8]>,
}

// Threads only ever receive disjoint ranges of the buffer.
unsafe impl Send for AtomicArena<'_> {}
unsafe impl Sync for AtomicArena<'_> {}

impl<'a> AtomicArena<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        BumpArena::new(buffer).into_atomic()
    }

    /// # Safety
    /// Same contract as [`BumpArena::from_raw_parts`].
    pub unsafe fn from_raw_parts(start: NonNull<u8>, len: usize) -> Self {
        BumpArena::from_raw_parts(start, len).into_atomic()
    }

    pub(crate) unsafe fn from_parts(start: NonNull<u8>, len: usize, cursor: usize) -> Self {
        let base = start.as_ptr() as usize;
        Self {
            start,
            cursor: AtomicUsize::new(cursor),
            limit: base + len,
            _buffer: PhantomData,
        }
    }

    #[inline(always)]
    fn base(&self) -> usize {
        self.start.as_ptr() as usize
    }

    /// Allocate `len` bytes aligned to `align`, racing other threads.
    ///
    /// A lost race recomputes the aligned start from the cursor the winner
    /// left behind. A request that does not fit fails at once, without
    /// waiting for the cursor to move.
    pub fn alloc(&self, len: usize, align: usize) -> Result<NonNull<[u8]>, AllocError> {
        let mut retries = 0u32;
        let mut current = self.cursor.load(Ordering::SeqCst);

        loop {
            let Some((start, end)) = bump_bounds(current, len, align, self.limit) else {
                logging::log_out_of_memory(len, align, self.limit.saturating_sub(current));
                return Err(AllocError::out_of_memory(len, align));
            };

            match self
                .cursor
                .compare_exchange_weak(current, end, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => {
                    if retries > 0 {
                        logging::log_contention(retries);
                    }
                    // SAFETY: bump_bounds keeps [start, end) inside the buffer.
                    let ptr = unsafe {
                        NonNull::new_unchecked(self.start.as_ptr().add(start - self.base()))
                    };
                    return Ok(NonNull::slice_from_raw_parts(ptr, len));
                }
                Err(observed) => {
                    current = observed;
                    retries = retries.saturating_add(1);
                }
            }
        }
    }

    #[inline]
    pub fn alloc_layout(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.alloc(layout.size(), layout.align())
    }

    /// Move `value` into the arena. The value is never dropped by the arena.
    pub fn alloc_value<T>(&self, value: T) -> Result<NonNull<T>, AllocError> {
        let ptr = self.alloc_layout(Layout::new::<T>())?.cast::<T>();
        // SAFETY: the block was claimed by this thread alone and fits T.
        unsafe { ptr.as_ptr().write(value) };
        Ok(ptr)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.limit - self.base()
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.cursor.load(Ordering::SeqCst).saturating_sub(self.base())
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.cursor.load(Ordering::SeqCst))
    }

    pub fn stats(&self) -> ArenaStats {
        let cursor = self.cursor.load(Ordering::SeqCst);
        ArenaStats {
            capacity: self.capacity(),
            used: cursor.saturating_sub(self.base()),
            remaining: self.limit.saturating_sub(cursor),
        }
    }

    /// Release every allocation. Requires that no other thread holds the arena.
    pub fn reset(&mut self) {
        let base = self.base();
        logging::log_restore(self.used());
        *self.cursor.get_mut() = base;
    }

    /// Return to single-threaded use, keeping the current cursor.
    pub fn into_arena(self) -> BumpArena<'a> {
        let len = self.capacity();
        let cursor = self.cursor.into_inner();
        // SAFETY: same buffer and lifetime; `self` is consumed.
        unsafe { BumpArena::from_parts(self.start, len, cursor) }
    }
}

impl core::fmt::Debug for AtomicArena<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtomicArena")
            .field("start", &self.start)
            .field("used", &self.used())
            .field("capacity", &self.capacity())
            .finish()
    }
}
