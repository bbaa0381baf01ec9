use std::fmt;

use crate::constants::{FLOAT_SIZE, MASK_BYTES, MAX_LEVEL, NORMAL_BYTES, POSITION_BYTES};

/// What a key needs to know about the cache that owns the grids.
pub trait GridDescriptor {
    /// Finest subdivision level stored by the cache.
    fn max_level(&self) -> u32;
    fn has_normals(&self) -> bool;
    fn has_mask(&self) -> bool;
}

/// Elements per grid side at `level`: `2^level + 1`.
#[inline]
pub const fn grid_size_for_level(level: u32) -> usize {
    (1usize << level) + 1
}

/// Layout of every element and grid of one cache configuration.
///
/// Computed once, then passed by value to every accessor. Offsets are in
/// bytes. `normal_offset` and `mask_offset` are meaningful only when the
/// matching flag is set; they are zero otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridKey {
    level: u32,
    elem_size: usize,
    grid_size: usize,
    grid_area: usize,
    grid_bytes: usize,
    normal_offset: usize,
    mask_offset: usize,
    has_normals: bool,
    has_mask: bool,
}

impl GridKey {
    /// Builds the layout for `level` directly from the two field flags.
    ///
    /// Position always comes first, the normal (if any) right after it and the
    /// mask (if any) last.
    pub fn new(level: u32, has_normals: bool, has_mask: bool) -> Self {
        debug_assert!(level <= MAX_LEVEL, "subdivision level {level} exceeds {MAX_LEVEL}");

        let mut elem_size = POSITION_BYTES;
        let mut normal_offset = 0;
        let mut mask_offset = 0;
        if has_normals {
            normal_offset = elem_size;
            elem_size += NORMAL_BYTES;
        }
        if has_mask {
            mask_offset = elem_size;
            elem_size += MASK_BYTES;
        }

        let grid_size = grid_size_for_level(level);
        let grid_area = grid_size * grid_size;
        Self {
            level,
            elem_size,
            grid_size,
            grid_area,
            grid_bytes: grid_area * elem_size,
            normal_offset,
            mask_offset,
            has_normals,
            has_mask,
        }
    }

    /// Key for `level` of the cache described by `desc`.
    #[inline]
    pub fn at_level<D: GridDescriptor + ?Sized>(desc: &D, level: u32) -> Self {
        Self::new(level, desc.has_normals(), desc.has_mask())
    }

    /// Key for the finest level of the cache described by `desc`.
    #[inline]
    pub fn top_level<D: GridDescriptor + ?Sized>(desc: &D) -> Self {
        Self::at_level(desc, desc.max_level())
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Bytes per element.
    #[inline]
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// `f32` slots per element.
    #[inline]
    pub fn elem_floats(&self) -> usize {
        self.elem_size / FLOAT_SIZE
    }

    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    #[inline]
    pub fn grid_area(&self) -> usize {
        self.grid_area
    }

    #[inline]
    pub fn grid_bytes(&self) -> usize {
        self.grid_bytes
    }

    /// `f32` slots needed to back one grid.
    #[inline]
    pub fn grid_floats(&self) -> usize {
        self.grid_bytes / FLOAT_SIZE
    }

    #[inline]
    pub fn normal_offset(&self) -> usize {
        self.normal_offset
    }

    #[inline]
    pub fn mask_offset(&self) -> usize {
        self.mask_offset
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    #[inline]
    pub fn has_mask(&self) -> bool {
        self.has_mask
    }

    /// Same field layout at another level.
    #[inline]
    pub fn with_level(&self, level: u32) -> Self {
        Self::new(level, self.has_normals, self.has_mask)
    }

}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level={} grid={}x{} elem={}B grid_bytes={}",
            self.level, self.grid_size, self.grid_size, self.elem_size, self.grid_bytes
        )?;
        if self.has_normals {
            write!(f, " normal@{}", self.normal_offset)?;
        }
        if self.has_mask {
            write!(f, " mask@{}", self.mask_offset)?;
        }
        Ok(())
    }
}
