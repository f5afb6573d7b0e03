//! Bump allocation over a fixed, caller-owned buffer
//!
//! Design: three layers sharing one bounds computation:
//! 1. Alignment arithmetic (checked, never wraps)
//! 2. Sequential arena: allocate, LIFO resize/free, checkpoint/restore
//! 3. Lock-free arena: concurrent allocate via compare-and-swap
//!
//! No allocation carries a header. "Is this the last block" is answered by
//! comparing the block's end address with the cursor.

mod align;
mod atomic;
mod bump;
mod checkpoint;
mod shared;


pub use align::{align_forward, bump_bounds};
pub use atomic::AtomicArena;
pub use bump::BumpArena;
pub use checkpoint::{ArenaScope, Checkpoint};
pub use shared::SharedArena;

use core::ptr::NonNull;

use crate::error::AllocError;

/// Generic allocator capability consumed by code that does not care which
/// allocator backs it.
///
/// Blocks are passed back exactly as they were returned (or as last resized).
pub trait Allocator {
    /// Allocate `len` bytes aligned to `align` (a power of two).
    fn alloc(&mut self, len: usize, align: usize) -> Result<NonNull<[u8]>, AllocError>;

    /// Try to change the length of `block` without moving it.
    fn resize(&mut self, block: NonNull<[u8]>, new_len: usize) -> bool;

    /// Resize in place or report that the caller must relocate.
    fn remap(&mut self, block: NonNull<[u8]>, new_len: usize) -> Option<NonNull<[u8]>> {
        if self.resize(block, new_len) {
            Some(NonNull::slice_from_raw_parts(block.cast::<u8>(), new_len))
        } else {
            None
        }
    }

    /// Release `block`. Allocators may ignore the request.
    fn free(&mut self, block: NonNull<[u8]>);
}

impl Allocator for BumpArena<'_> {
    #[inline]
    fn alloc(&mut self, len: usize, align: usize) -> Result<NonNull<[u8]>, AllocError> {
        BumpArena::alloc(self, len, align)
    }

    #[inline]
    fn resize(&mut self, block: NonNull<[u8]>, new_len: usize) -> bool {
        BumpArena::resize(self, block, new_len)
    }

    #[inline]
    fn remap(&mut self, block: NonNull<[u8]>, new_len: usize) -> Option<NonNull<[u8]>> {
        BumpArena::remap(self, block, new_len)
    }

    #[inline]
    fn free(&mut self, block: NonNull<[u8]>) {
        BumpArena::free(self, block)
    }
}

impl Allocator for &SharedArena<'_> {
    fn alloc(&mut self, len: usize, align: usize) -> Result<NonNull<[u8]>, AllocError> {
        SharedArena::alloc(*self, len, align)
    }

    fn resize(&mut self, block: NonNull<[u8]>, new_len: usize) -> bool {
        SharedArena::resize(*self, block, new_len)
    }

    fn remap(&mut self, block: NonNull<[u8]>, new_len: usize) -> Option<NonNull<[u8]>> {
        SharedArena::remap(*self, block, new_len)
    }

    fn free(&mut self, block: NonNull<[u8]>) {
        SharedArena::free(*self, block)
    }
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
    #[inline]
    fn alloc(&mut self, len: usize, align: usize) -> Result<NonNull<[u8]>, AllocError> {
        (**self).alloc(len, align)
    }

    #[inline]
    fn resize(&mut self, block: NonNull<[u8]>, new_len: usize) -> bool {
        (**self).resize(block, new_len)
    }

    #[inline]
    fn remap(&mut self, block: NonNull<[u8]>, new_len: usize) -> Option<NonNull<[u8]>> {
        (**self).remap(block, new_len)
    }

    #[inline]
    fn free(&mut self, block: NonNull<[u8]>) {
        (**self).free(block)
    }
}

/// Arena statistics for monitoring and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    pub capacity: usize,
    pub used: usize,
    pub remaining: usize,
}
