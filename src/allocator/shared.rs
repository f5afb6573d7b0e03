//! Externally serialized arena - the full contract behind a mutex
//!
//! Unlike [`AtomicArena`](super::AtomicArena), every operation is available,
//! because the lock makes "is this the last block" a stable question.

use core::ptr::NonNull;

use parking_lot::{Mutex, MutexGuard};

use super::{ArenaStats, BumpArena, Checkpoint};
use crate::error::AllocError;

/// [`BumpArena`] behind a `parking_lot` mutex, usable through `&self`.
pub struct SharedArena<'a> {
    inner: Mutex<BumpArena<'a>>,
}

impl<'a> SharedArena<'a> {
    pub fn new(arena: BumpArena<'a>) -> Self {
        Self { inner: Mutex::new(arena) }
    }

    /// Lock the arena for a sequence of operations that must not interleave
    /// with other threads, such as allocate-then-grow.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, BumpArena<'a>> {
        self.inner.lock()
    }

    pub fn alloc(&self, len: usize, align: usize) -> Result<NonNull<[u8]>, AllocError> {
        self.inner.lock().alloc(len, align)
    }

    pub fn resize(&self, block: NonNull<[u8]>, new_len: usize) -> bool {
        self.inner.lock().resize(block, new_len)
    }

    pub fn remap(&self, block: NonNull<[u8]>, new_len: usize) -> Option<NonNull<[u8]>> {
        self.inner.lock().remap(block, new_len)
    }

    pub fn free(&self, block: NonNull<[u8]>) {
        self.inner.lock().free(block)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.lock().checkpoint()
    }

    pub fn restore(&self, checkpoint: Checkpoint) {
        self.inner.lock().restore(checkpoint)
    }

    pub fn stats(&self) -> ArenaStats {
        self.inner.lock().stats()
    }

    pub fn into_inner(self) -> BumpArena<'a> {
        self.inner.into_inner()
    }
}

impl<'a> From<BumpArena<'a>> for SharedArena<'a> {
    fn from(arena: BumpArena<'a>) -> Self {
        Self::new(arena)
    }
}
