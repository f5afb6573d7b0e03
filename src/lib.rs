//! Bump Arena - fixed-buffer bump-pointer allocation
//!
//! Carves allocations out of a single caller-owned buffer by advancing a
//! cursor. There is no backing heap and no per-allocation metadata: only the
//! most recent allocation can be grown, shrunk or freed in place, and
//! checkpoints roll back many allocations at once.

pub mod allocator;
pub mod buffer;
pub mod config;
pub mod error;
pub mod logging;

// Re-export core types
pub use allocator::{
    Allocator, ArenaScope, ArenaStats, AtomicArena, BumpArena, Checkpoint, SharedArena,
};
pub use buffer::HeapBuffer;
pub use config::ArenaConfig;
pub use error::{AllocError, ConfigError};
pub use logging::LogConfig;
