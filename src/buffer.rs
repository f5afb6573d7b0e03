//! Backing buffers - owned memory for arenas to borrow
//!
//! Arenas never own their memory. `HeapBuffer` is the simplest owner: one
//! zeroed block from the global allocator with a chosen alignment, so the
//! first allocation of that alignment needs no padding.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

use crate::allocator::{AtomicArena, BumpArena, SharedArena};
use crate::config::ArenaConfig;
use crate::error::AllocError;

/// Owned, aligned, zero-initialized byte buffer.
pub struct HeapBuffer {
    ptr: NonNull<u8>,
    capacity: usize,
    layout: Layout,
}

// Plain owned bytes.
unsafe impl Send for HeapBuffer {}
unsafe impl Sync for HeapBuffer {}

impl HeapBuffer {
    /// Acquire `capacity` bytes aligned to `align` from the global allocator.
    pub fn new(capacity: usize, align: usize) -> Result<Self, AllocError> {
        // Zero-sized layouts cannot be passed to the allocator.
        let layout = Layout::from_size_align(capacity.max(1), align)
            .map_err(|_| AllocError::out_of_memory(capacity, align))?;

        // SAFETY: layout has a non-zero size.
        let ptr = NonNull::new(unsafe { alloc_zeroed(layout) })
            .ok_or(AllocError::out_of_memory(capacity, align))?;

        Ok(Self { ptr, capacity, layout })
    }

    /// Acquire a buffer sized and aligned per `config.arena`.
    pub fn from_config(config: &ArenaConfig) -> Result<Self, AllocError> {
        Self::new(config.arena.capacity, config.arena.align)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr owns `capacity` initialized bytes.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.capacity) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: ptr owns `capacity` initialized bytes, borrowed uniquely.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.capacity) }
    }

    /// Borrow the buffer as a single-threaded arena.
    pub fn arena(&mut self) -> BumpArena<'_> {
        BumpArena::new(self.as_mut_slice())
    }

    /// Borrow the buffer as a lock-free arena.
    pub fn atomic_arena(&mut self) -> AtomicArena<'_> {
        AtomicArena::new(self.as_mut_slice())
    }

    /// Borrow the buffer as a mutex-guarded arena.
    pub fn shared_arena(&mut self) -> SharedArena<'_> {
        SharedArena::new(self.arena())
    }
}

impl Drop for HeapBuffer {
    fn drop(&mut self) {
        // SAFETY: allocated in `new` with this exact layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl std::fmt::Debug for HeapBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .field("align", &self.align())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_aligned_and_zeroed() {
        let buffer = HeapBuffer::new(4096, 64).expect("buffer");
        assert_eq!(buffer.capacity(), 4096);
        assert_eq!(buffer.as_slice().as_ptr() as usize % 64, 0);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_capacity_buffer_yields_empty_arena() {
        let mut buffer = HeapBuffer::new(0, 8).expect("empty buffer");
        let mut arena = buffer.arena();
        assert_eq!(arena.capacity(), 0);
        assert!(arena.alloc(0, 1).is_ok());
        assert!(arena.alloc(1, 1).is_err());
    }

    #[test]
    fn invalid_alignment_rejected() {
        let err = HeapBuffer::new(64, 3).unwrap_err();
        assert_eq!(err, AllocError::OutOfMemory { requested: 64, align: 3 });
    }

    #[test]
    fn first_allocation_needs_no_padding() {
        let mut buffer = HeapBuffer::new(256, 32).expect("buffer");
        let mut arena = buffer.arena();
        arena.alloc(32, 32).expect("aligned");
        assert_eq!(arena.used(), 32);
    }

    #[test]
    fn from_config_uses_arena_section() {
        let mut config = ArenaConfig::default();
        config.arena.capacity = 1024;
        config.arena.align = 16;
        let buffer = HeapBuffer::from_config(&config).expect("buffer");
        assert_eq!(buffer.capacity(), 1024);
        assert_eq!(buffer.align(), 16);
    }
}
