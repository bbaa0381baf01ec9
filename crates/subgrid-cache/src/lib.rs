//! Owning cache of subdivision grids: one flat `f32`-backed buffer per grid,
//! all laid out by the cache's top-level [`GridKey`].
#![forbid(unsafe_code)]

mod cache;
mod error;
mod fill;

pub use cache::{GridCache, MAX_CACHE_LEVEL, SubdivSettings};
pub use error::CacheError;
pub use subgrid_key::{Elem, GridDescriptor, GridKey, MAX_LEVEL};
