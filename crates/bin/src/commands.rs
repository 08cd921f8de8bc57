//! Subcommand implementations.

use std::path::Path;

use cfgtree::Config;

pub mod get;
pub mod leaves;
pub mod set;
pub mod show;

/// Load a configuration tree from a JSON file.
pub fn load(path: &Path) -> cfgtree::Result<Config> {
    let source = std::fs::read_to_string(path)?;
    let config = Config::from_json_str(&source)?;
    tracing::debug!(file = %path.display(), keys = config.len(), "loaded configuration");
    Ok(config)
}
