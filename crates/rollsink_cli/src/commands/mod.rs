//! CLI command implementations.

pub mod inspect;
pub mod write;

use rollsink::WriterConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the writer configuration from an optional JSON file and flags.
///
/// Flags override values read from the file. A template path is required
/// from one of the two sources.
pub fn load_config(
    config_file: Option<&Path>,
    path: Option<PathBuf>,
    size_limit: Option<u64>,
    create_dirs: bool,
) -> Result<WriterConfig, Box<dyn std::error::Error>> {
    let mut config = match config_file {
        Some(file) => {
            let data = fs::read_to_string(file)
                .map_err(|e| format!("cannot read config {}: {e}", file.display()))?;
            serde_json::from_str::<WriterConfig>(&data)?
        }
        None => {
            let path = path.clone().ok_or("Template path required for write")?;
            WriterConfig::new(path)
        }
    };

    if let Some(path) = path {
        config.path = path;
    }
    if let Some(limit) = size_limit {
        config.size_limit = limit;
    }
    if create_dirs {
        config.create_dirs = true;
    }

    Ok(config)
}
