use std::fmt;
use std::io;

/// Allocation failure.
///
/// There is a single failure kind: the request does not fit between the
/// cursor and the end of the buffer, or computing its bounds would overflow
/// the address space. The fields are carried for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    OutOfMemory { requested: usize, align: usize },
}

impl AllocError {
    #[inline]
    pub(crate) const fn out_of_memory(requested: usize, align: usize) -> Self {
        Self::OutOfMemory { requested, align }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested, align } => {
                write!(f, "Out of memory: cannot allocate {} bytes aligned to {}", requested, align)
            }
        }
    }
}

impl std::error::Error for AllocError {}

/// Failure while loading or validating an [`ArenaConfig`](crate::ArenaConfig).
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read config: {}", e),
            Self::Parse(e) => write!(f, "Failed to parse config: {}", e),
            Self::Invalid { field, reason } => {
                write!(f, "Invalid config value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}
