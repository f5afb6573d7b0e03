//! Checkpoints - O(1) bulk rollback of allocations

use core::ops::{Deref, DerefMut};

use super::BumpArena;

/// Saved cursor position of an arena.
///
/// Taking a checkpoint does not freeze the arena. Restoring it releases every
/// allocation made since, no matter how many there were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checkpoint(usize);

impl Checkpoint {
    #[inline]
    pub(crate) const fn new(addr: usize) -> Self {
        Self(addr)
    }

    #[inline]
    pub(crate) const fn addr(self) -> usize {
        self.0
    }
}

/// Scope guard that restores its arena to the entry checkpoint on drop.
///
/// Dereferences to the arena, so allocations made through the scope are
/// released together when it ends. Scopes nest the same way stack frames do.
pub struct ArenaScope<'s, 'a> {
    arena: &'s mut BumpArena<'a>,
    checkpoint: Checkpoint,
}

impl<'s, 'a> ArenaScope<'s, 'a> {
    pub(crate) fn new(arena: &'s mut BumpArena<'a>) -> Self {
        Self {
            checkpoint: arena.checkpoint(),
            arena,
        }
    }

    /// Checkpoint this scope rolls back to.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint
    }
}

impl<'a> Deref for ArenaScope<'_, 'a> {
    type Target = BumpArena<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.arena
    }
}

impl DerefMut for ArenaScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.arena
    }
}

impl Drop for ArenaScope<'_, '_> {
    fn drop(&mut self) {
        self.arena.restore(self.checkpoint);
    }
}
