use std::path::Path;

use anyhow::Context;

use crate::model::mixing::MixingConfig;

/// Read a [`MixingConfig`] from a JSON file and check it.
pub fn load_mixing_config_json(path: impl AsRef<Path>) -> anyhow::Result<MixingConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mixing config: {}", path.display()))?;
    let cfg: MixingConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse mixing config: {}", path.display()))?;
    cfg.check()?;
    Ok(cfg)
}
