use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use subgrid_cache::SubdivSettings;
use subgrid_geom::Vec3;

/// Cache description loaded from TOML: one grid per `[[quads]]` entry.
#[derive(Clone, Debug, Deserialize)]
pub struct CacheConfig {
    pub level: u32,
    #[serde(default)]
    pub normals: bool,
    #[serde(default)]
    pub mask: bool,
    #[serde(default)]
    pub quads: Vec<QuadConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuadConfig {
    // Corner order: (0,0) (1,0) (1,1) (0,1) in grid space
    pub corners: [[f32; 3]; 4],
    #[serde(default)]
    pub mask: Option<f32>,
}

impl QuadConfig {
    pub fn corners(&self) -> [Vec3; 4] {
        self.corners.map(Vec3::from)
    }
}

impl CacheConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: CacheConfig = toml::from_str(toml_str)?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn settings(&self) -> SubdivSettings {
        SubdivSettings::new(self.level, self.normals, self.mask)
    }

    pub fn quad_corners(&self) -> Vec<[Vec3; 4]> {
        self.quads.iter().map(QuadConfig::corners).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
level = 3
normals = true

[[quads]]
corners = [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]]
mask = 0.5

[[quads]]
corners = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 1.0, 0.5], [1.0, 1.0, 0.5]]
"#;

    #[test]
    fn parses_sample() {
        let cfg = CacheConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.settings(), SubdivSettings::new(3, true, false));
        assert_eq!(cfg.quads.len(), 2);
        assert_eq!(cfg.quads[0].mask, Some(0.5));
        assert_eq!(cfg.quads[1].mask, None);
        let corners = cfg.quad_corners();
        assert_eq!(corners[1][2], Vec3::new(2.0, 1.0, 0.5));
    }

    #[test]
    fn flags_default_off() {
        let cfg = CacheConfig::from_toml_str("level = 0").unwrap();
        assert!(!cfg.normals && !cfg.mask);
        assert!(cfg.quads.is_empty());
    }

    #[test]
    fn bad_corner_count_is_rejected() {
        let bad = "level = 1\n[[quads]]\ncorners = [[0, 0, 0], [1, 0, 0], [1, 1, 0]]\n";
        assert!(CacheConfig::from_toml_str(bad).is_err());
    }

    #[test]
    fn bundled_sample_parses() {
        let cfg = CacheConfig::from_toml_str(include_str!("../configs/sample.toml")).unwrap();
        assert_eq!(cfg.settings(), SubdivSettings::new(4, true, true));
        assert_eq!(cfg.quad_corners().len(), 2);
    }

    #[test]
    fn missing_level_is_rejected() {
        assert!(CacheConfig::from_toml_str("normals = true").is_err());
    }
}
