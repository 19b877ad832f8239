//! Config command

use anyhow::{Context, Result};
use souvenir_bubbles::SimulationConfig;

pub fn run(path: Option<&str>) -> Result<()> {
    let config = match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => SimulationConfig::default(),
    };
    let text = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    println!("{}", text);
    Ok(())
}
