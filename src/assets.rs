//! Copies word images into an asset catalog as one `<id>.imageset` per image.

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::catalog::{Contents, CONTENTS_FILE};
use crate::config::MappingConfig;
use crate::mapping::{read_mapping, WordImageMapping};

/// What happened to the reserved default asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultAsset {
    /// `default.<ext>` was already in the source directory.
    Existing,
    /// Synthesized from the named mapped image first.
    Synthesized { from: String },
    /// No source could be found or synthesized; no imageset was written.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub total: usize,
    /// Words whose source raster was missing.
    pub skipped: Vec<String>,
    pub default_asset: DefaultAsset,
}

/// Asset identifier for an image file: its name without extension.
pub fn asset_id(image_file: &str) -> &str {
    Path::new(image_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(image_file)
}

/// Create `<assets_dir>/<name>.imageset` holding a descriptor and a copy of
/// `<source_dir>/<name>.<ext>`. Returns `Ok(None)` when the source is missing.
pub fn create_image_asset(name: &str, extension: &str, source_dir: &Path, assets_dir: &Path) -> Result<Option<PathBuf>> {
    let file_name = format!("{name}.{extension}");
    let source = source_dir.join(&file_name);
    if !source.is_file() {
        warn!("source file {} does not exist", source.display());
        return Ok(None);
    }
    let imageset = assets_dir.join(format!("{name}.imageset"));
    fs::create_dir_all(&imageset).with_context(|| format!("create {}", imageset.display()))?;
    Contents::imageset(&file_name).save(&imageset.join(CONTENTS_FILE))?;
    fs::copy(&source, imageset.join(&file_name))
        .with_context(|| format!("copy {} into {}", source.display(), imageset.display()))?;
    Ok(Some(imageset))
}

/// Make sure `<source_dir>/<default>.<ext>` exists, borrowing the first mapped
/// image when it does not.
pub fn ensure_default_source(source_dir: &Path, mapping: &WordImageMapping, cfg: &MappingConfig) -> Result<DefaultAsset> {
    let target = source_dir.join(format!("{}.{}", cfg.default_name, cfg.extension));
    if target.is_file() {
        return Ok(DefaultAsset::Existing);
    }
    warn!("no default image found, using a placeholder");
    let Some(first) = mapping.values().find(|f| source_dir.join(f).is_file()) else {
        return Ok(DefaultAsset::Unavailable);
    };
    fs::copy(source_dir.join(first), &target)
        .with_context(|| format!("synthesize {} from {first}", target.display()))?;
    Ok(DefaultAsset::Synthesized { from: first.clone() })
}

/// Read the mapping the copier works from. A missing file points the user at
/// the mapping generator.
pub fn load_mapping(path: &Path) -> Result<WordImageMapping> {
    if !path.is_file() {
        bail!("{} does not exist. Run generate_word_image_mapping first.", path.display());
    }
    read_mapping(path)
}

pub fn copy_images_to_assets(
    source_dir: &Path,
    assets_dir: &Path,
    mapping: &WordImageMapping,
    cfg: &MappingConfig,
) -> Result<CopyReport> {
    if !source_dir.is_dir() {
        bail!("{} is not a valid directory", source_dir.display());
    }
    if !assets_dir.is_dir() {
        bail!("{} is not a valid directory", assets_dir.display());
    }

    let mut default_asset = ensure_default_source(source_dir, mapping, cfg)?;
    if default_asset != DefaultAsset::Unavailable
        && create_image_asset(&cfg.default_name, &cfg.extension, source_dir, assets_dir)?.is_none()
    {
        default_asset = DefaultAsset::Unavailable;
    }

    let mut copied = 0;
    let mut skipped = Vec::new();
    for (word, image_file) in mapping {
        match create_image_asset(asset_id(image_file), &cfg.extension, source_dir, assets_dir)? {
            Some(dir) => {
                info!("{word} -> {}", dir.display());
                copied += 1;
            }
            None => skipped.push(word.clone()),
        }
    }
    Ok(CopyReport { copied, total: mapping.len(), skipped, default_asset })
}
