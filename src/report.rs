use subgrid_cache::GridCache;
use subgrid_geom::Aabb;
use subgrid_key::{FLOAT_SIZE, GridKey};

fn field(present: bool, offset: usize) -> String {
    if present {
        format!("{} bytes ({} floats)", offset, offset / FLOAT_SIZE)
    } else {
        "-".to_string()
    }
}

pub fn layout_lines(key: &GridKey) -> Vec<String> {
    vec![
        format!("level          {}", key.level()),
        format!("grid_size      {}", key.grid_size()),
        format!("grid_area      {}", key.grid_area()),
        format!("elem_size      {} bytes ({} floats)", key.elem_size(), key.elem_floats()),
        format!("grid_bytes     {}", key.grid_bytes()),
        format!("normal_offset  {}", field(key.has_normals(), key.normal_offset())),
        format!("mask_offset    {}", field(key.has_mask(), key.mask_offset())),
    ]
}

fn fmt_bounds(b: &Aabb) -> String {
    format!(
        "({:.3}, {:.3}, {:.3})..({:.3}, {:.3}, {:.3})",
        b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
    )
}

pub fn log_cache(cache: &GridCache) {
    log::info!("cache: {} grids, {}", cache.num_grids(), cache.key());
    log::info!("bounds {}", fmt_bounds(&cache.bounds()));
    for i in 0..cache.num_grids() {
        if let Ok(b) = cache.grid_bounds(i) {
            log::debug!("grid {} bounds {}", i, fmt_bounds(&b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lines_mark_missing_fields() {
        let lines = layout_lines(&GridKey::new(2, true, false));
        assert_eq!(lines[1], "grid_size      5");
        assert_eq!(lines[3], "elem_size      24 bytes (6 floats)");
        assert_eq!(lines[5], "normal_offset  12 bytes (3 floats)");
        assert_eq!(lines[6], "mask_offset    -");
    }
}
