//! Whole-cache passes that write grid contents. Each pass runs one rayon task
//! per grid; a task only touches its own buffer.

use std::time::Instant;

use rayon::prelude::*;
use subgrid_geom::Vec3;
use subgrid_key::{Elem, GridKey};

use crate::cache::GridCache;
use crate::error::CacheError;

/// Position of grid coordinate `(x, y)` on the bilinear patch spanned by
/// `corners`, ordered `(0,0) (1,0) (1,1) (0,1)` in grid space.
#[inline]
fn bilinear(corners: &[Vec3; 4], key: &GridKey, x: usize, y: usize) -> Vec3 {
    // grid_size is at least 2, so the span is never zero
    let span = (key.grid_size() - 1) as f32;
    let (u, v) = (x as f32 / span, y as f32 / span);
    let bottom = corners[0].lerp(corners[1], u);
    let top = corners[3].lerp(corners[2], u);
    bottom.lerp(top, v)
}

fn fill_grid(key: &GridKey, bytes: &mut [u8], corners: &[Vec3; 4]) {
    for y in 0..key.grid_size() {
        for x in 0..key.grid_size() {
            *key.grid_co_mut(bytes, Elem::START, x, y) = bilinear(corners, key, x, y);
        }
    }
}

/// Finite-difference normal at every element: central differences inside
/// the grid, one-sided at the borders. Degenerate neighbourhoods get a zero
/// normal.
fn grid_normals(key: &GridKey, bytes: &mut [u8]) {
    let n = key.grid_size();
    let src: &[u8] = bytes;
    let pos: Vec<Vec3> = key
        .grid_elems(Elem::START)
        .map(|e| *key.co(src, e))
        .collect();
    let at = |x: usize, y: usize| pos[key.elem_index(x, y)];
    for y in 0..n {
        for x in 0..n {
            let (x0, x1) = (x.saturating_sub(1), (x + 1).min(n - 1));
            let (y0, y1) = (y.saturating_sub(1), (y + 1).min(n - 1));
            let du = at(x1, y) - at(x0, y);
            let dv = at(x, y1) - at(x, y0);
            *key.grid_no_mut(bytes, Elem::START, x, y) = du.cross(dv).normalized();
        }
    }
}

fn fill_grid_mask(key: &GridKey, bytes: &mut [u8], value: f32) {
    let mut e = Elem::START;
    for _ in 0..key.grid_area() {
        *key.mask_mut(bytes, e) = value;
        e = key.elem_next(e);
    }
}

fn elapsed_ms(t: Instant) -> u32 {
    t.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

impl GridCache {
    /// Places every grid's elements on the bilinear patch of its quad.
    ///
    /// `quads[i]` feeds grid `i`; normals and mask are left untouched.
    pub fn fill_from_quads(&mut self, quads: &[[Vec3; 4]]) -> Result<(), CacheError> {
        if quads.len() != self.grids.len() {
            return Err(CacheError::CornerCountMismatch {
                expected: self.grids.len(),
                got: quads.len(),
            });
        }
        let key = self.key();
        let t = Instant::now();
        self.grids
            .par_iter_mut()
            .zip(quads.par_iter())
            .for_each(|(grid, corners)| {
                fill_grid(&key, bytemuck::cast_slice_mut(grid), corners);
            });
        log::debug!(target: "perf", "ms={} cache_fill_quads grids={} level={}", elapsed_ms(t), quads.len(), key.level());
        Ok(())
    }

    /// Recomputes normals from current positions. No-op without normals.
    pub fn recompute_normals(&mut self) {
        let key = self.key();
        if !key.has_normals() {
            return;
        }
        let t = Instant::now();
        self.grids.par_iter_mut().for_each(|grid| {
            grid_normals(&key, bytemuck::cast_slice_mut(grid));
        });
        log::debug!(target: "perf", "ms={} cache_normals grids={} level={}", elapsed_ms(t), self.grids.len(), key.level());
    }

    /// Sets every mask weight of every grid. No-op without a mask.
    pub fn fill_mask(&mut self, value: f32) {
        let key = self.key();
        if !key.has_mask() {
            return;
        }
        self.grids.par_iter_mut().for_each(|grid| {
            fill_grid_mask(&key, bytemuck::cast_slice_mut(grid), value);
        });
    }

    /// Sets every mask weight of grid `index`. No-op without a mask.
    pub fn set_grid_mask(&mut self, index: usize, value: f32) -> Result<(), CacheError> {
        let key = self.key();
        let bytes = self.grid_mut(index)?;
        if key.has_mask() {
            fill_grid_mask(&key, bytes, value);
        }
        Ok(())
    }
}
