use std::path::Path;

use anyhow::Result;
use scout_core::ScoutConfig;

use super::print_json;
use crate::Output;

/// Copy of `cfg` safe to print.
fn masked(cfg: &ScoutConfig) -> ScoutConfig {
    let mut shown = cfg.clone();
    if shown.endpoints.api_token.is_some() {
        shown.endpoints.api_token = Some("********".to_string());
    }
    shown
}

pub fn show(cfg: &ScoutConfig, output: Output) -> Result<()> {
    let shown = masked(cfg);
    match output {
        Output::Json => print_json(&shown)?,
        Output::Table => print!("{}", toml::to_string_pretty(&shown)?),
    }
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ScoutConfig::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
