//! Default filesystem locations.

use purposely_core::error::{PurposelyError, Result};
use std::path::PathBuf;

/// Config file location: `~/.config/purposely/config.toml`.
pub fn config_file_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| PurposelyError::config("could not determine config directory"))?;
    Ok(config_dir.join("purposely").join("config.toml"))
}

/// Data directory for the file-backed store:
/// `~/.local/share/purposely` (platform equivalent).
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| PurposelyError::storage("could not determine data directory"))?;
    Ok(data_dir.join("purposely"))
}
