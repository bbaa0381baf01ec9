use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheError {
    ZeroGrids,
    LevelTooDeep { level: u32, max: u32 },
    LevelAboveTop { level: u32, top: u32 },
    GridOutOfRange { index: usize, len: usize },
    CornerCountMismatch { expected: usize, got: usize },
    OutOfMemory { grids: usize, grid_bytes: usize },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::ZeroGrids => write!(f, "a grid cache needs at least one grid"),
            CacheError::LevelTooDeep { level, max } => {
                write!(f, "subdivision level {} exceeds the supported maximum {}", level, max)
            }
            CacheError::LevelAboveTop { level, top } => {
                write!(f, "level {} is finer than the cache top level {}", level, top)
            }
            CacheError::GridOutOfRange { index, len } => {
                write!(f, "grid {} out of range for a cache of {} grids", index, len)
            }
            CacheError::CornerCountMismatch { expected, got } => {
                write!(f, "expected {} corner quads (one per grid), got {}", expected, got)
            }
            CacheError::OutOfMemory { grids, grid_bytes } => {
                write!(f, "cannot allocate {} grids of {} bytes", grids, grid_bytes)
            }
        }
    }
}

impl std::error::Error for CacheError {}
