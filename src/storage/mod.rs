use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CallError;

/// Resolve an asset path declared in a suite. Absolute paths are used as is;
/// relative ones are taken relative to the suite's directory under the root.
pub fn asset_path(suite_root: &Path, suite_dir: &str, asset: &str) -> PathBuf {
    let path = Path::new(asset);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    suite_root.join(suite_dir).join(path)
}

pub fn read_asset(path: &Path) -> Result<Vec<u8>, CallError> {
    fs::read(path).map_err(|e| CallError::AssetRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn read_json_asset(path: &Path) -> Result<serde_json::Value, CallError> {
    let raw = read_asset(path)?;
    serde_json::from_slice(&raw).map_err(|e| {
        CallError::InvalidExpectation(format!("Failed to parse `{}`: {e}", path.display()))
    })
}
