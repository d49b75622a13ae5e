//! Asset catalog descriptors (`Contents.json`) and the app icon slot table.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, path::Path};

pub const CONTENTS_FILE: &str = "Contents.json";

/// One required app icon raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconSlot {
    pub filename: &'static str,
    pub idiom: &'static str,
    /// Nominal point size as written in the descriptor, e.g. "83.5x83.5".
    pub size: &'static str,
    pub scale: &'static str,
    /// Edge length of the square raster in pixels.
    pub pixels: u32,
}

const fn slot(filename: &'static str, idiom: &'static str, size: &'static str, scale: &'static str, pixels: u32) -> IconSlot {
    IconSlot { filename, idiom, size, scale, pixels }
}

pub static APP_ICON_SLOTS: &[IconSlot] = &[
    // iPhone
    slot("iphone_20pt@2x.png", "iphone", "20x20", "2x", 40),
    slot("iphone_20pt@3x.png", "iphone", "20x20", "3x", 60),
    slot("iphone_29pt@2x.png", "iphone", "29x29", "2x", 58),
    slot("iphone_29pt@3x.png", "iphone", "29x29", "3x", 87),
    slot("iphone_40pt@2x.png", "iphone", "40x40", "2x", 80),
    slot("iphone_40pt@3x.png", "iphone", "40x40", "3x", 120),
    slot("iphone_60pt@2x.png", "iphone", "60x60", "2x", 120),
    slot("iphone_60pt@3x.png", "iphone", "60x60", "3x", 180),
    // iPad
    slot("ipad_20pt@1x.png", "ipad", "20x20", "1x", 20),
    slot("ipad_20pt@2x.png", "ipad", "20x20", "2x", 40),
    slot("ipad_29pt@1x.png", "ipad", "29x29", "1x", 29),
    slot("ipad_29pt@2x.png", "ipad", "29x29", "2x", 58),
    slot("ipad_40pt@1x.png", "ipad", "40x40", "1x", 40),
    slot("ipad_40pt@2x.png", "ipad", "40x40", "2x", 80),
    slot("ipad_76pt@1x.png", "ipad", "76x76", "1x", 76),
    slot("ipad_76pt@2x.png", "ipad", "76x76", "2x", 152),
    slot("ipad_83.5pt@2x.png", "ipad", "83.5x83.5", "2x", 167),
    // App Store
    slot("ios-marketing_1024pt@1x.png", "ios-marketing", "1024x1024", "1x", 1024),
];

/// Parse "2x" -> 2.0.
pub fn parse_scale(scale: &str) -> Option<f32> {
    scale.strip_suffix('x')?.trim().parse().ok()
}

/// Parse "83.5x83.5" -> (83.5, 83.5).
pub fn parse_size(size: &str) -> Option<(f32, f32)> {
    let (w, h) = size.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Pixel dimensions an entry should have: nominal points times scale, rounded.
pub fn expected_pixels(size: &str, scale: &str) -> Option<(u32, u32)> {
    let (w, h) = parse_size(size)?;
    let s = parse_scale(scale)?;
    Some(((w * s).round() as u32, (h * s).round() as u32))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CatalogImage {
    pub idiom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogImage {
    fn universal(scale: &str, filename: Option<String>) -> Self {
        Self { idiom: "universal".into(), filename, scale: Some(scale.into()), ..Default::default() }
    }

    pub fn matches_slot(&self, slot: &IconSlot) -> bool {
        self.idiom == slot.idiom
            && self.scale.as_deref() == Some(slot.scale)
            && self.size.as_deref() == Some(slot.size)
    }
}

impl From<&IconSlot> for CatalogImage {
    fn from(slot: &IconSlot) -> Self {
        Self {
            idiom: slot.idiom.into(),
            filename: Some(slot.filename.into()),
            scale: Some(slot.scale.into()),
            size: Some(slot.size.into()),
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogInfo {
    pub version: u32,
    pub author: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CatalogInfo {
    fn default() -> Self {
        Self { version: 1, author: "xcode".into(), extra: Map::new() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Contents {
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    #[serde(default)]
    pub info: CatalogInfo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a filename patch did to a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchSummary {
    /// Entries that gained (or had a different) filename.
    pub attached: usize,
    /// Entries that already carried the slot's filename.
    pub unchanged: usize,
    /// Slots with no entry at all, appended as new entries.
    pub appended: usize,
}

impl PatchSummary {
    pub fn is_noop(&self) -> bool {
        self.attached == 0 && self.appended == 0
    }
}

impl Contents {
    /// Descriptor for a single-resolution image set: the file at 1x, empty 2x/3x slots.
    pub fn imageset(filename: &str) -> Self {
        Self {
            images: vec![
                CatalogImage::universal("1x", Some(filename.to_string())),
                CatalogImage::universal("2x", None),
                CatalogImage::universal("3x", None),
            ],
            ..Default::default()
        }
    }

    /// Fresh app icon descriptor with every slot's filename filled in.
    pub fn app_icon(slots: &[IconSlot]) -> Self {
        Self { images: slots.iter().map(CatalogImage::from).collect(), ..Default::default() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&txt).with_context(|| format!("parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut js = serde_json::to_string_pretty(self)?;
        js.push('\n');
        fs::write(path, js).with_context(|| format!("write {}", path.display()))
    }

    /// Attach slot filenames to entries keyed by (idiom, scale, size). Running
    /// it twice leaves the descriptor unchanged the second time.
    pub fn attach_filenames(&mut self, slots: &[IconSlot]) -> PatchSummary {
        let mut summary = PatchSummary::default();
        for slot in slots {
            let mut found = false;
            for entry in self.images.iter_mut().filter(|e| e.matches_slot(slot)) {
                found = true;
                if entry.filename.as_deref() == Some(slot.filename) {
                    summary.unchanged += 1;
                } else {
                    entry.filename = Some(slot.filename.to_string());
                    summary.attached += 1;
                }
            }
            if !found {
                self.images.push(CatalogImage::from(slot));
                summary.appended += 1;
            }
        }
        summary
    }
}
