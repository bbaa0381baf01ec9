use std::error::Error;
use std::fs;
use std::path::Path;

use clap::Parser;
use subgrid_cache::GridCache;
use subgrid_key::{GridKey, MAX_LEVEL};

mod cli;
mod config;
mod report;

use cli::{Cli, Command};
use config::CacheConfig;

fn build_cache(cfg: &CacheConfig) -> Result<GridCache, Box<dyn Error>> {
    let mut cache = GridCache::new(cfg.settings(), cfg.quads.len())?;
    cache.fill_from_quads(&cfg.quad_corners())?;
    cache.recompute_normals();
    for (i, q) in cfg.quads.iter().enumerate() {
        if let Some(m) = q.mask {
            cache.set_grid_mask(i, m)?;
        }
    }
    Ok(cache)
}

fn run_build(config: &Path, level: Option<u32>, out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let cfg = CacheConfig::from_path(config)?;
    log::info!("loaded {} quads from {}", cfg.quads.len(), config.display());
    let cache = build_cache(&cfg)?;
    report::log_cache(&cache);

    if let Some(out) = out {
        let level = level.unwrap_or(cache.key().level());
        let bytes = cache.level_bytes(level)?;
        fs::write(out, &bytes)?;
        log::info!(
            "wrote {} bytes ({} grids at {}) to {}",
            bytes.len(),
            cache.num_grids(),
            cache.key_at(level)?,
            out.display()
        );
    } else if level.is_some() {
        log::warn!("--level only applies together with --out");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .init();

    match cli.command {
        Command::Layout {
            level,
            normals,
            mask,
        } => {
            if level > MAX_LEVEL {
                let msg = format!("level {} exceeds the supported maximum {}", level, MAX_LEVEL);
                return Err(msg.into());
            }
            for line in report::layout_lines(&GridKey::new(level, normals, mask)) {
                println!("{}", line);
            }
        }
        Command::Build { config, level, out } => {
            run_build(&config, level, out.as_deref())?;
        }
    }
    Ok(())
}
