//! Element addressing.
//!
//! An [`Elem`] is a byte offset into a grid region. Field accessors turn an
//! element into zero-copy typed views of that region; stride arithmetic moves
//! between elements. Nothing here allocates or owns memory.
//!
//! Regions must be 4-byte aligned, which holds for any region obtained by
//! casting an `[f32]` buffer to bytes. A misaligned region or an element past
//! the end of the region panics on access.

use subgrid_geom::Vec3;

use crate::constants::{MASK_BYTES, NORMAL_BYTES, POSITION_BYTES};
use crate::key::GridKey;

/// Location of one element inside a grid byte region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Elem(pub usize);

impl Elem {
    /// First element of a region.
    pub const START: Elem = Elem(0);

    #[inline]
    pub const fn byte_offset(self) -> usize {
        self.0
    }
}

#[inline]
fn view<T: bytemuck::Pod>(region: &[u8], at: usize, len: usize) -> &T {
    bytemuck::from_bytes(&region[at..at + len])
}

#[inline]
fn view_mut<T: bytemuck::Pod>(region: &mut [u8], at: usize, len: usize) -> &mut T {
    bytemuck::from_bytes_mut(&mut region[at..at + len])
}

impl GridKey {
    // --- Fields ---

    /// Position of `elem`. Position is always the first field.
    #[inline]
    pub fn co<'a>(&self, region: &'a [u8], elem: Elem) -> &'a Vec3 {
        view(region, elem.0, POSITION_BYTES)
    }

    #[inline]
    pub fn co_mut<'a>(&self, region: &'a mut [u8], elem: Elem) -> &'a mut Vec3 {
        view_mut(region, elem.0, POSITION_BYTES)
    }

    /// Normal of `elem`. The key must have normals.
    #[inline]
    pub fn no<'a>(&self, region: &'a [u8], elem: Elem) -> &'a Vec3 {
        debug_assert!(self.has_normals(), "normal accessed on a key without normals");
        view(region, elem.0 + self.normal_offset(), NORMAL_BYTES)
    }

    #[inline]
    pub fn no_mut<'a>(&self, region: &'a mut [u8], elem: Elem) -> &'a mut Vec3 {
        debug_assert!(self.has_normals(), "normal accessed on a key without normals");
        view_mut(region, elem.0 + self.normal_offset(), NORMAL_BYTES)
    }

    /// Mask weight of `elem`. The key must have a mask.
    #[inline]
    pub fn mask<'a>(&self, region: &'a [u8], elem: Elem) -> &'a f32 {
        debug_assert!(self.has_mask(), "mask accessed on a key without mask");
        view(region, elem.0 + self.mask_offset(), MASK_BYTES)
    }

    #[inline]
    pub fn mask_mut<'a>(&self, region: &'a mut [u8], elem: Elem) -> &'a mut f32 {
        debug_assert!(self.has_mask(), "mask accessed on a key without mask");
        view_mut(region, elem.0 + self.mask_offset(), MASK_BYTES)
    }

    // --- Stride arithmetic ---

    /// The element `n` strides away from `elem`; `n` may be negative.
    #[inline]
    pub fn elem_offset(&self, elem: Elem, n: isize) -> Elem {
        let delta = n * self.elem_size() as isize;
        debug_assert!(
            elem.0.checked_add_signed(delta).is_some(),
            "element offset {n} from byte {} leaves the region",
            elem.0
        );
        Elem(elem.0.wrapping_add_signed(delta))
    }

    /// The element after `elem` in linear order.
    #[inline]
    pub fn elem_next(&self, elem: Elem) -> Elem {
        self.elem_offset(elem, 1)
    }

    /// Linear index of grid coordinate `(x, y)`, row-major.
    ///
    /// Coordinates are not validated outside debug builds.
    #[inline]
    pub fn elem_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(
            x < self.grid_size() && y < self.grid_size(),
            "grid coordinate ({x}, {y}) outside {0}x{0} grid",
            self.grid_size()
        );
        y * self.grid_size() + x
    }

    /// Grid coordinate of linear index `i`.
    #[inline]
    pub fn elem_xy(&self, i: usize) -> (usize, usize) {
        (i % self.grid_size(), i / self.grid_size())
    }

    #[inline]
    pub fn in_grid(&self, x: usize, y: usize) -> bool {
        x < self.grid_size() && y < self.grid_size()
    }

    /// Element at grid coordinate `(x, y)` of the grid starting at `grid`.
    ///
    /// Hot path: coordinates are only checked by a debug assertion. Use
    /// [`GridKey::checked_grid_elem`] where they come from untrusted input.
    #[inline]
    pub fn grid_elem(&self, grid: Elem, x: usize, y: usize) -> Elem {
        self.elem_offset(grid, self.elem_index(x, y) as isize)
    }

    /// Like [`GridKey::grid_elem`], but `None` when `(x, y)` is off the grid.
    #[inline]
    pub fn checked_grid_elem(&self, grid: Elem, x: usize, y: usize) -> Option<Elem> {
        self.in_grid(x, y).then(|| self.grid_elem(grid, x, y))
    }

    /// Every element of the grid starting at `grid`, in row-major order.
    pub fn grid_elems(&self, grid: Elem) -> impl Iterator<Item = Elem> + use<> {
        let key = *self;
        let mut cur = grid;
        (0..key.grid_area()).map(move |_| {
            let e = cur;
            cur = key.elem_next(cur);
            e
        })
    }

    // --- Compound accessors ---

    #[inline]
    pub fn grid_co<'a>(&self, region: &'a [u8], grid: Elem, x: usize, y: usize) -> &'a Vec3 {
        self.co(region, self.grid_elem(grid, x, y))
    }

    #[inline]
    pub fn grid_co_mut<'a>(
        &self,
        region: &'a mut [u8],
        grid: Elem,
        x: usize,
        y: usize,
    ) -> &'a mut Vec3 {
        self.co_mut(region, self.grid_elem(grid, x, y))
    }

    #[inline]
    pub fn grid_no<'a>(&self, region: &'a [u8], grid: Elem, x: usize, y: usize) -> &'a Vec3 {
        self.no(region, self.grid_elem(grid, x, y))
    }

    #[inline]
    pub fn grid_no_mut<'a>(
        &self,
        region: &'a mut [u8],
        grid: Elem,
        x: usize,
        y: usize,
    ) -> &'a mut Vec3 {
        self.no_mut(region, self.grid_elem(grid, x, y))
    }

    #[inline]
    pub fn grid_mask<'a>(&self, region: &'a [u8], grid: Elem, x: usize, y: usize) -> &'a f32 {
        self.mask(region, self.grid_elem(grid, x, y))
    }

    #[inline]
    pub fn grid_mask_mut<'a>(
        &self,
        region: &'a mut [u8],
        grid: Elem,
        x: usize,
        y: usize,
    ) -> &'a mut f32 {
        self.mask_mut(region, self.grid_elem(grid, x, y))
    }

    #[inline]
    pub fn offset_co<'a>(&self, region: &'a [u8], elem: Elem, n: isize) -> &'a Vec3 {
        self.co(region, self.elem_offset(elem, n))
    }

    #[inline]
    pub fn offset_co_mut<'a>(&self, region: &'a mut [u8], elem: Elem, n: isize) -> &'a mut Vec3 {
        self.co_mut(region, self.elem_offset(elem, n))
    }

    #[inline]
    pub fn offset_no<'a>(&self, region: &'a [u8], elem: Elem, n: isize) -> &'a Vec3 {
        self.no(region, self.elem_offset(elem, n))
    }

    #[inline]
    pub fn offset_no_mut<'a>(&self, region: &'a mut [u8], elem: Elem, n: isize) -> &'a mut Vec3 {
        self.no_mut(region, self.elem_offset(elem, n))
    }

    #[inline]
    pub fn offset_mask<'a>(&self, region: &'a [u8], elem: Elem, n: isize) -> &'a f32 {
        self.mask(region, self.elem_offset(elem, n))
    }

    #[inline]
    pub fn offset_mask_mut<'a>(&self, region: &'a mut [u8], elem: Elem, n: isize) -> &'a mut f32 {
        self.mask_mut(region, self.elem_offset(elem, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(key: &GridKey) -> Vec<f32> {
        vec![0.0; key.grid_floats()]
    }

    #[test]
    fn position_is_first_bytes_of_element() {
        let key = GridKey::new(1, true, true);
        let mut buf = grid(&key);
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut buf);
        let e = key.grid_elem(Elem::START, 2, 1);
        *key.co_mut(bytes, e) = Vec3::new(1.0, 2.0, 3.0);
        let i = key.elem_index(2, 1) * key.elem_floats();
        assert_eq!(&buf[i..i + 3], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn fields_land_at_their_offsets() {
        let key = GridKey::new(0, true, true);
        let mut buf = grid(&key);
        assert_eq!(buf.len(), 4 * 7);
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut buf);
        let second = key.elem_next(Elem::START);
        *key.co_mut(bytes, second) = Vec3::new(1.0, 2.0, 3.0);
        *key.no_mut(bytes, second) = Vec3::new(4.0, 5.0, 6.0);
        *key.mask_mut(bytes, second) = 7.0;
        assert_eq!(buf[7..14], [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert!(buf[..7].iter().chain(&buf[14..]).all(|f| *f == 0.0));
    }

    #[test]
    fn negative_offset_walks_back() {
        let key = GridKey::new(2, false, false);
        let last = key.grid_elem(Elem::START, 4, 4);
        assert_eq!(key.elem_offset(last, -24), Elem::START);
        assert_eq!(key.elem_offset(last, -5), key.grid_elem(Elem::START, 4, 3));
    }

    #[test]
    fn checked_grid_elem_rejects_out_of_range() {
        let key = GridKey::new(2, false, false);
        assert_eq!(key.checked_grid_elem(Elem::START, 5, 0), None);
        assert_eq!(key.checked_grid_elem(Elem::START, 0, 5), None);
        assert_eq!(
            key.checked_grid_elem(Elem::START, 4, 4),
            Some(key.grid_elem(Elem::START, 4, 4))
        );
    }

    #[test]
    fn grid_elems_visits_row_major() {
        let key = GridKey::new(1, true, false);
        let elems: Vec<Elem> = key.grid_elems(Elem::START).collect();
        assert_eq!(elems.len(), 9);
        for (i, e) in elems.iter().enumerate() {
            let (x, y) = key.elem_xy(i);
            assert_eq!(*e, key.grid_elem(Elem::START, x, y));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mask accessed on a key without mask")]
    fn mask_on_maskless_key_asserts() {
        let key = GridKey::new(2, true, false);
        let buf = grid(&key);
        let bytes: &[u8] = bytemuck::cast_slice(&buf);
        let _ = key.mask(bytes, Elem::START);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "normal accessed on a key without normals")]
    fn normal_on_normalless_key_asserts() {
        let key = GridKey::new(1, false, true);
        let buf = grid(&key);
        let bytes: &[u8] = bytemuck::cast_slice(&buf);
        let _ = key.no(bytes, Elem::START);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside 3x3 grid")]
    fn unchecked_grid_elem_asserts_in_debug() {
        let key = GridKey::new(1, false, false);
        let _ = key.grid_elem(Elem::START, 3, 0);
    }
}
