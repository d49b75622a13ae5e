//! Word -> image filename mapping, built by scanning a directory of rasters.

use anyhow::{bail, Context, Result};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::debug;

/// word -> image filename. Ordered so the written JSON is stable.
pub type WordImageMapping = BTreeMap<String, String>;

/// Collect every `*.{extension}` regular file in `dir` (non-recursive). The
/// word is the filename minus its extension; `reserved` is skipped.
pub fn scan_images(dir: &Path, extension: &str, reserved: &str) -> Result<WordImageMapping> {
    if !dir.is_dir() {
        bail!("{} is not a valid directory", dir.display());
    }
    let mut mapping = WordImageMapping::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let (Some(word), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            debug!("skipping non UTF-8 name {:?}", path);
            continue;
        };
        if word == reserved {
            continue;
        }
        mapping.insert(word.to_string(), file_name.to_string());
    }
    Ok(mapping)
}

pub fn write_mapping(path: &Path, mapping: &WordImageMapping) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let js = serde_json::to_string_pretty(mapping)?;
    fs::write(path, js).with_context(|| format!("write {}", path.display()))
}

pub fn read_mapping(path: &Path) -> Result<WordImageMapping> {
    let txt = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parse {}", path.display()))
}
