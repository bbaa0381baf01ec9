use subgrid_geom::Aabb;
use subgrid_key::{Elem, GridDescriptor, GridKey};

use crate::error::CacheError;

/// Deepest top level a cache stores: 1025x1025 elements, at most 28 MiB per
/// grid. Keys can describe deeper levels than any buffer this crate allocates.
pub const MAX_CACHE_LEVEL: u32 = 10;

/// Per-cache configuration: top level and which optional fields are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SubdivSettings {
    pub level: u32,
    pub normals: bool,
    pub mask: bool,
}

impl SubdivSettings {
    pub const fn new(level: u32, normals: bool, mask: bool) -> Self {
        Self {
            level,
            normals,
            mask,
        }
    }
}

impl GridDescriptor for SubdivSettings {
    fn max_level(&self) -> u32 {
        self.level
    }
    fn has_normals(&self) -> bool {
        self.normals
    }
    fn has_mask(&self) -> bool {
        self.mask
    }
}

/// Grids of one cache, each stored at the top level in its own buffer.
///
/// Buffers are `Vec<f32>` so their byte views are always 4-byte aligned.
#[derive(Clone, Debug)]
pub struct GridCache {
    settings: SubdivSettings,
    key: GridKey,
    pub(crate) grids: Vec<Vec<f32>>,
}

impl GridCache {
    /// Allocates `num_grids` zeroed grids.
    ///
    /// Allocation failure is reported as [`CacheError::OutOfMemory`] instead
    /// of aborting.
    pub fn new(settings: SubdivSettings, num_grids: usize) -> Result<Self, CacheError> {
        if num_grids == 0 {
            return Err(CacheError::ZeroGrids);
        }
        if settings.level > MAX_CACHE_LEVEL {
            return Err(CacheError::LevelTooDeep {
                level: settings.level,
                max: MAX_CACHE_LEVEL,
            });
        }
        let key = GridKey::top_level(&settings);
        let grids = alloc_grids(&key, num_grids)?;
        log::debug!(
            "grid cache: {} grids, {} ({} bytes total)",
            num_grids,
            key,
            num_grids.saturating_mul(key.grid_bytes())
        );
        Ok(Self {
            settings,
            key,
            grids,
        })
    }

    /// Layout of the stored (top-level) grids.
    #[inline]
    pub fn key(&self) -> GridKey {
        self.key
    }

    /// Layout of this cache's grids at a coarser `level`.
    pub fn key_at(&self, level: u32) -> Result<GridKey, CacheError> {
        if level > self.settings.level {
            return Err(CacheError::LevelAboveTop {
                level,
                top: self.settings.level,
            });
        }
        Ok(GridKey::at_level(self, level))
    }

    /// Number of grids; never zero.
    #[inline]
    pub fn num_grids(&self) -> usize {
        self.grids.len()
    }

    fn check_index(&self, index: usize) -> Result<(), CacheError> {
        if index >= self.grids.len() {
            return Err(CacheError::GridOutOfRange {
                index,
                len: self.grids.len(),
            });
        }
        Ok(())
    }

    /// Byte region of grid `index`, addressed from [`Elem::START`].
    pub fn grid(&self, index: usize) -> Result<&[u8], CacheError> {
        self.check_index(index)?;
        Ok(bytemuck::cast_slice(&self.grids[index]))
    }

    pub fn grid_mut(&mut self, index: usize) -> Result<&mut [u8], CacheError> {
        self.check_index(index)?;
        Ok(bytemuck::cast_slice_mut(&mut self.grids[index]))
    }

    pub fn grids(&self) -> impl Iterator<Item = &[u8]> {
        self.grids.iter().map(|g| bytemuck::cast_slice::<f32, u8>(g))
    }

    /// Every grid's bytes, concatenated in grid order.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.grids.len() * self.key.grid_bytes());
        for g in self.grids() {
            out.extend_from_slice(g);
        }
        out
    }

    /// Copies grid `index` sampled at a coarser `level` into a new buffer
    /// laid out by `key_at(level)`.
    ///
    /// Coarse element `(x, y)` is top element `(x << d, y << d)` with
    /// `d = top - level`.
    pub fn extract_level(&self, index: usize, level: u32) -> Result<Vec<f32>, CacheError> {
        let coarse = self.key_at(level)?;
        let src = self.grid(index)?;
        let top = self.key;
        let shift = top.level() - level;
        let elem_size = top.elem_size();

        let mut out = vec![0.0f32; coarse.grid_floats()];
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut out);
        for (i, to) in coarse.grid_elems(Elem::START).enumerate() {
            let (x, y) = coarse.elem_xy(i);
            let from = top.grid_elem(Elem::START, x << shift, y << shift);
            let (s, d) = (from.byte_offset(), to.byte_offset());
            dst[d..d + elem_size].copy_from_slice(&src[s..s + elem_size]);
        }
        Ok(out)
    }

    /// Every grid extracted at `level`, concatenated in grid order.
    pub fn level_bytes(&self, level: u32) -> Result<Vec<u8>, CacheError> {
        if level == self.key.level() {
            return Ok(self.as_bytes());
        }
        let coarse = self.key_at(level)?;
        let mut out = Vec::with_capacity(self.grids.len() * coarse.grid_bytes());
        for i in 0..self.grids.len() {
            let g = self.extract_level(i, level)?;
            out.extend_from_slice(bytemuck::cast_slice(&g));
        }
        Ok(out)
    }

    pub fn grid_bounds(&self, index: usize) -> Result<Aabb, CacheError> {
        let bytes = self.grid(index)?;
        let mut b = Aabb::EMPTY;
        for e in self.key.grid_elems(Elem::START) {
            b.include(*self.key.co(bytes, e));
        }
        Ok(b)
    }

    /// Bounds of every stored position.
    pub fn bounds(&self) -> Aabb {
        (0..self.grids.len())
            .filter_map(|i| self.grid_bounds(i).ok())
            .fold(Aabb::EMPTY, Aabb::union)
    }
}

fn alloc_grids(key: &GridKey, num_grids: usize) -> Result<Vec<Vec<f32>>, CacheError> {
    let oom = || CacheError::OutOfMemory {
        grids: num_grids,
        grid_bytes: key.grid_bytes(),
    };
    let mut grids = Vec::new();
    grids.try_reserve_exact(num_grids).map_err(|_| oom())?;
    for _ in 0..num_grids {
        let mut grid = Vec::new();
        grid.try_reserve_exact(key.grid_floats()).map_err(|_| oom())?;
        grid.resize(key.grid_floats(), 0.0);
        grids.push(grid);
    }
    Ok(grids)
}

impl GridDescriptor for GridCache {
    fn max_level(&self) -> u32 {
        self.settings.level
    }
    fn has_normals(&self) -> bool {
        self.settings.normals
    }
    fn has_mask(&self) -> bool {
        self.settings.mask
    }
}
