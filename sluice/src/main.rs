//! # Sluice
//!
//! Floods a small test scene with water and lava and prints where the
//! liquids came to rest.

mod demo;
mod logger;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use sluice_core::SimulationConfig;
use sluice_registry::{BlockDefinitions, BlockRegistry};

const CONFIG_PATH: &str = "sluice_config.json5";

fn main() -> anyhow::Result<()> {
    logger::init()?;

    let config = SimulationConfig::load_or_create(Path::new(CONFIG_PATH))
        .with_context(|| format!("failed to load {CONFIG_PATH}"))?;
    let registry = match &config.blocks_file {
        Some(path) => {
            let definitions = BlockDefinitions::from_path(path)
                .with_context(|| format!("failed to load block definitions from {}", path.display()))?;
            BlockRegistry::from_definitions(&definitions)?
        }
        None => BlockRegistry::builtin()?,
    };
    log::info!("Registered {} block types", registry.len());

    demo::run(Arc::new(registry), config)
}
