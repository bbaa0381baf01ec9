//! Element field sizes. Every field is built from `f32`.

pub const FLOAT_SIZE: usize = core::mem::size_of::<f32>();

pub const POSITION_BYTES: usize = 3 * FLOAT_SIZE;
pub const NORMAL_BYTES: usize = 3 * FLOAT_SIZE;
pub const MASK_BYTES: usize = FLOAT_SIZE;

/// Deepest level a key describes. Element counts fit in 32 bits up to here;
/// byte sizes past level 13 need a 64-bit `usize`.
pub const MAX_LEVEL: u32 = 15;
