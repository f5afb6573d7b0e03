//! Sequential bump arena - O(1) allocation over a borrowed buffer
//!
//! State is an address pair: the cursor (start of the free region) and the
//! limit (one past the end of the buffer). The occupied region
//! `[buffer_start, cursor)` is the allocations in the order they were made;
//! only the last one, whose end equals the cursor, can change in place.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::NonNull;

use super::align::bump_bounds;
use super::atomic::AtomicArena;
use super::checkpoint::{ArenaScope, Checkpoint};
use super::ArenaStats;
use crate::error::AllocError;
use crate::logging;

/// Single-threaded bump allocator over a caller-owned buffer.
///
/// All mutation goes through `&mut self`; share it across threads with
/// [`SharedArena`](super::SharedArena) or convert it into an
/// [`AtomicArena`] for lock-free allocation.
pub struct BumpArena<'a> {
    start: NonNull<u8>,
    cursor: usize,
    limit: usize,
    _buffer: PhantomData<&'a mut [u8]>,
}

// The arena is a unique borrow of its buffer, like `&'a mut [u8]`.
unsafe impl Send for BumpArena<'_> {}
unsafe impl Sync for BumpArena<'_> {}

impl<'a> BumpArena<'a> {
    /// Create an arena that hands out ranges of `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let len = buffer.len();
        let start = NonNull::from(buffer).cast::<u8>();
        // SAFETY: the range comes from a live unique borrow held for 'a.
        unsafe { Self::from_raw_parts(start, len) }
    }

    /// Create an arena over `len` bytes starting at `start`.
    ///
    /// # Safety
    /// `[start, start + len)` must be a single allocated object, valid for
    /// reads and writes and not accessed through other paths for `'a`.
    pub unsafe fn from_raw_parts(start: NonNull<u8>, len: usize) -> Self {
        let base = start.as_ptr() as usize;
        debug_assert!(base.checked_add(len).is_some(), "buffer wraps the address space");
        logging::log_arena_created(base as *const u8, len);
        Self {
            start,
            cursor: base,
            limit: base + len,
            _buffer: PhantomData,
        }
    }

    #[inline(always)]
    fn base(&self) -> usize {
        self.start.as_ptr() as usize
    }

    /// Block `[addr, addr + len)`, which must lie inside the buffer.
    #[inline(always)]
    fn block_at(&self, addr: usize, len: usize) -> NonNull<[u8]> {
        debug_assert!(addr >= self.base() && addr + len <= self.limit);
        // SAFETY: addr is within the buffer, so the offset stays in bounds
        // and derives from the buffer's own pointer.
        let ptr = unsafe { NonNull::new_unchecked(self.start.as_ptr().add(addr - self.base())) };
        NonNull::slice_from_raw_parts(ptr, len)
    }

    /// Allocate `len` bytes aligned to `align`.
    ///
    /// `align` must be a power of two; any other value fails like an
    /// exhausted arena. On failure the arena is left untouched.
    #[inline]
    pub fn alloc(&mut self, len: usize, align: usize) -> Result<NonNull<[u8]>, AllocError> {
        match bump_bounds(self.cursor, len, align, self.limit) {
            Some((start, end)) => {
                self.cursor = end;
                Ok(self.block_at(start, len))
            }
            None => {
                logging::log_out_of_memory(len, align, self.remaining());
                Err(AllocError::out_of_memory(len, align))
            }
        }
    }

    /// Allocate a block fitting `layout`.
    #[inline]
    pub fn alloc_layout(&mut self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.alloc(layout.size(), layout.align())
    }

    /// Move `value` into the arena and return a pointer to it.
    ///
    /// The value is never dropped by the arena; its storage is reclaimed by
    /// `free`, `restore` or `reset` like any other block.
    pub fn alloc_value<T>(&mut self, value: T) -> Result<NonNull<T>, AllocError> {
        let ptr = self.alloc_layout(Layout::new::<T>())?.cast::<T>();
        // SAFETY: the block is fresh, in bounds and aligned for T.
        unsafe { ptr.as_ptr().write(value) };
        Ok(ptr)
    }

    /// Whether `block` is the most recent allocation, i.e. ends at the cursor.
    #[inline]
    pub fn is_last(&self, block: NonNull<[u8]>) -> bool {
        let start = block.cast::<u8>().as_ptr() as usize;
        start.checked_add(block.len()) == Some(self.cursor)
    }

    /// Resize `block` in place to `new_len` bytes.
    ///
    /// The last block may shrink (the tail is reclaimed at once) or grow up
    /// to the limit. Any other block reports `true` for a shrink without
    /// touching the arena, and `false` for a grow.
    pub fn resize(&mut self, block: NonNull<[u8]>, new_len: usize) -> bool {
        if !self.is_last(block) {
            return new_len <= block.len();
        }

        let start = block.cast::<u8>().as_ptr() as usize;
        if new_len <= block.len() {
            self.cursor = start + new_len;
            return true;
        }

        match start.checked_add(new_len) {
            Some(end) if end <= self.limit => {
                self.cursor = end;
                true
            }
            _ => {
                logging::log_out_of_memory(new_len, 1, self.limit - start);
                false
            }
        }
    }

    /// Resize `block` in place, returning the resized block.
    ///
    /// The data never moves: `None` means the caller has to allocate and
    /// copy for itself.
    #[inline]
    pub fn remap(&mut self, block: NonNull<[u8]>, new_len: usize) -> Option<NonNull<[u8]>> {
        if self.resize(block, new_len) {
            Some(NonNull::slice_from_raw_parts(block.cast::<u8>(), new_len))
        } else {
            None
        }
    }

    /// Give `block` back. Only the last block is reclaimed; freeing any other
    /// block is a no-op and its space stays occupied until an enclosing free
    /// or a restore.
    #[inline]
    pub fn free(&mut self, block: NonNull<[u8]>) {
        if self.is_last(block) {
            self.cursor -= block.len();
        }
    }

    /// Snapshot the cursor.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.cursor)
    }

    /// Roll the cursor back to `checkpoint`, releasing everything allocated
    /// since it was taken.
    ///
    /// The token is not validated. Restoring a checkpoint from another arena,
    /// or one that was itself released by an earlier restore, lets later
    /// allocations overlap blocks the caller still uses.
    #[inline]
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        let target = checkpoint.addr();
        debug_assert!(
            target >= self.base() && target <= self.limit,
            "checkpoint does not belong to this arena"
        );
        logging::log_restore(self.cursor.saturating_sub(target));
        self.cursor = target;
    }

    /// Release every allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.restore(Checkpoint::new(self.base()));
    }

    /// Open a scope that restores the current checkpoint when dropped.
    #[inline]
    pub fn scope(&mut self) -> ArenaScope<'_, 'a> {
        ArenaScope::new(self)
    }

    /// Total size of the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.limit - self.base()
    }

    /// Bytes between the buffer start and the cursor, padding included.
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor.saturating_sub(self.base())
    }

    /// Bytes between the cursor and the limit.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.cursor)
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            capacity: self.capacity(),
            used: self.used(),
            remaining: self.remaining(),
        }
    }

    /// Switch to lock-free allocation, keeping the current cursor.
    pub fn into_atomic(self) -> AtomicArena<'a> {
        let len = self.capacity();
        // SAFETY: same buffer and lifetime; `self` is consumed.
        unsafe { AtomicArena::from_parts(self.start, len, self.cursor) }
    }

    /// Rebuild from parts produced by [`AtomicArena::into_arena`].
    ///
    /// # Safety
    /// Same contract as [`from_raw_parts`](Self::from_raw_parts); `cursor`
    /// must lie in `[start, start + len]`.
    pub(crate) unsafe fn from_parts(start: NonNull<u8>, len: usize, cursor: usize) -> Self {
        let base = start.as_ptr() as usize;
        Self {
            start,
            cursor,
            limit: base + len,
            _buffer: PhantomData,
        }
    }
}

impl core::fmt::Debug for BumpArena<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BumpArena")
            .field("start", &self.start)
            .field("used", &self.used())
            .field("capacity", &self.capacity())
            .finish()
    }
}
