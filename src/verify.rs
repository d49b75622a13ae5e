//! Structural check of an app icon set: descriptor present, every referenced
//! file present with the right pixel size, manifest pointing at the set.

use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::catalog::{expected_pixels, CONTENTS_FILE};

/// Conditions that make the icon set unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    MissingDirectory(PathBuf),
    MissingDescriptor(PathBuf),
    UnreadableDescriptor(String),
    NoImages,
    MissingFiles(Vec<String>),
}

impl fmt::Display for VerifyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyFailure::MissingDirectory(p) => write!(f, "App icon directory not found: {}", p.display()),
            VerifyFailure::MissingDescriptor(p) => write!(f, "{CONTENTS_FILE} not found in {}", p.display()),
            VerifyFailure::UnreadableDescriptor(e) => write!(f, "Error reading {CONTENTS_FILE}: {e}"),
            VerifyFailure::NoImages => write!(f, "No images defined in {CONTENTS_FILE}"),
            VerifyFailure::MissingFiles(names) => write!(f, "Missing files: {}", names.join(", ")),
        }
    }
}

/// Non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyWarning {
    SizeMismatch { filename: String, expected: (u32, u32), actual: (u32, u32) },
    Unreadable { filename: String, error: String },
    UndeclaredSize { filename: String },
    ManifestMissing(PathBuf),
    ManifestNotReferenced { manifest: PathBuf, token: String },
}

impl fmt::Display for VerifyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyWarning::SizeMismatch { filename, expected, actual } => write!(
                f,
                "Size mismatch for {filename}: Expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            VerifyWarning::Unreadable { filename, error } => write!(f, "Error opening {filename}: {error}"),
            VerifyWarning::UndeclaredSize { filename } => {
                write!(f, "{filename} has no parseable size/scale; dimensions not checked")
            }
            VerifyWarning::ManifestMissing(p) => write!(f, "{} not found!", p.display()),
            VerifyWarning::ManifestNotReferenced { manifest, token } => {
                write!(f, "{token} not referenced in {}!", manifest.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyReport {
    /// Entries declared in the descriptor.
    pub declared: usize,
    /// Entries whose file exists and opened with the expected size.
    pub valid: usize,
    pub warnings: Vec<VerifyWarning>,
    pub failure: Option<VerifyFailure>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    fn fail(mut self, failure: VerifyFailure) -> Self {
        self.failure = Some(failure);
        self
    }
}

/// Looser view of the descriptor: `images` must be present to be meaningful.
#[derive(Deserialize)]
struct DescriptorView {
    images: Option<Vec<EntryView>>,
}

/// Only the keys the checks read; everything else (idiom included) is optional.
#[derive(Deserialize)]
struct EntryView {
    filename: Option<String>,
    size: Option<String>,
    scale: Option<String>,
}

pub fn verify_icon_set(icon_dir: &Path, manifest: &Path, token: &str) -> VerifyReport {
    let report = VerifyReport::default();
    if !icon_dir.is_dir() {
        return report.fail(VerifyFailure::MissingDirectory(icon_dir.to_path_buf()));
    }
    let contents_path = icon_dir.join(CONTENTS_FILE);
    if !contents_path.is_file() {
        return report.fail(VerifyFailure::MissingDescriptor(icon_dir.to_path_buf()));
    }
    let view: DescriptorView = match fs::read_to_string(&contents_path)
        .map_err(|e| e.to_string())
        .and_then(|txt| serde_json::from_str(&txt).map_err(|e| e.to_string()))
    {
        Ok(v) => v,
        Err(e) => return report.fail(VerifyFailure::UnreadableDescriptor(e)),
    };
    let Some(images) = view.images else {
        return report.fail(VerifyFailure::NoImages);
    };

    let mut report = VerifyReport { declared: images.len(), ..report };
    let mut missing = Vec::new();
    for entry in &images {
        let Some(filename) = entry.filename.as_deref() else { continue };
        let path = icon_dir.join(filename);
        if !path.is_file() {
            missing.push(filename.to_string());
            continue;
        }
        if let Some(w) = check_dimensions(&path, filename, entry) {
            debug!("{w}");
            report.warnings.push(w);
        } else {
            report.valid += 1;
        }
    }
    if !missing.is_empty() {
        return report.fail(VerifyFailure::MissingFiles(missing));
    }

    if let Some(w) = check_manifest(manifest, token) {
        debug!("{w}");
        report.warnings.push(w);
    }
    report
}

fn check_dimensions(path: &Path, filename: &str, entry: &EntryView) -> Option<VerifyWarning> {
    let actual = match image::image_dimensions(path) {
        Ok(d) => d,
        Err(e) => return Some(VerifyWarning::Unreadable { filename: filename.into(), error: e.to_string() }),
    };
    let expected = entry
        .size
        .as_deref()
        .zip(entry.scale.as_deref())
        .and_then(|(size, scale)| expected_pixels(size, scale));
    match expected {
        None => Some(VerifyWarning::UndeclaredSize { filename: filename.into() }),
        Some(expected) if expected != actual => {
            Some(VerifyWarning::SizeMismatch { filename: filename.into(), expected, actual })
        }
        Some(_) => None,
    }
}

fn check_manifest(manifest: &Path, token: &str) -> Option<VerifyWarning> {
    match fs::read_to_string(manifest) {
        Err(_) => Some(VerifyWarning::ManifestMissing(manifest.to_path_buf())),
        Ok(txt) if !txt.contains(token) => Some(VerifyWarning::ManifestNotReferenced {
            manifest: manifest.to_path_buf(),
            token: token.to_string(),
        }),
        Ok(_) => None,
    }
}
