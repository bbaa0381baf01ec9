//! Grid layout descriptor and element accessors for subdivision grid caches.
//!
//! Every grid of a cache is one flat byte region of `grid_area` elements in
//! row-major order. All elements of a cache share one layout, described by a
//! [`GridKey`]: a position, optionally a normal, optionally a mask weight.
//! Elements are addressed by [`Elem`] handles and read or written only
//! through the key's accessors.
#![forbid(unsafe_code)]

mod constants;
mod elem;
mod key;

pub use constants::{FLOAT_SIZE, MASK_BYTES, MAX_LEVEL, NORMAL_BYTES, POSITION_BYTES};
pub use elem::Elem;
pub use key::{GridDescriptor, GridKey, grid_size_for_level};
pub use subgrid_geom::Vec3;
