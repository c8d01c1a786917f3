//! CLI command implementations.

mod inspect;
mod run;

pub use inspect::inspect_command;
pub use run::run_command;

use std::path::Path;

use anyhow::{Context, Result};

use blackout::DeidentifyConfig;

/// Load the optional TOML configuration, falling back to defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<DeidentifyConfig> {
    match path {
        Some(path) => DeidentifyConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display())),
        None => Ok(DeidentifyConfig::default()),
    }
}
