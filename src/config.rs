use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Default location of the optional pipeline config, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "asset_pipeline.ron";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MappingConfig {
    /// Where the word -> image mapping is written and read back.
    pub file: PathBuf,
    /// Raster extension scanned for, without the dot.
    pub extension: String,
    /// Identifier reserved for the placeholder image; never mapped to a word.
    pub default_name: String,
}
impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("word_image_mapping.json"),
            extension: "png".into(),
            default_name: "default".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultImageConfig {
    pub width: u32,
    pub height: u32,
    pub label: String,
    pub font_px: f32,
    pub border_px: u32,
}
impl Default for DefaultImageConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            label: "No Image Available".into(),
            font_px: 24.0,
            border_px: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IconConfig {
    /// Target of the plain and modern generators.
    pub app_icon_dir: PathBuf,
    /// Target of the cool generator (inside the app target folder).
    pub project_icon_dir: PathBuf,
}
impl Default for IconConfig {
    fn default() -> Self {
        Self {
            app_icon_dir: PathBuf::from("Assets.xcassets/AppIcon.appiconset"),
            project_icon_dir: PathBuf::from("Notifications/Assets.xcassets/AppIcon.appiconset"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VerifyConfig {
    pub icon_dir: PathBuf,
    pub manifest: PathBuf,
    /// Text the manifest must contain for the icon set to be picked up.
    pub manifest_token: String,
}
impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            icon_dir: PathBuf::from("Notifications/Assets.xcassets/AppIcon.appiconset"),
            manifest: PathBuf::from("Notifications/Info.plist"),
            manifest_token: "AppIcon".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub search_dirs: Vec<PathBuf>,
    /// Face used for the icon lettering.
    pub bold: String,
    /// Face used for the placeholder label.
    pub regular: String,
}
impl Default for FontConfig {
    fn default() -> Self {
        Self {
            search_dirs: vec![
                PathBuf::from("/Library/Fonts"),
                PathBuf::from("/System/Library/Fonts/Supplemental"),
                PathBuf::from("/usr/share/fonts/truetype/msttcorefonts"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu"),
            ],
            bold: "Arial Bold.ttf".into(),
            regular: "Arial.ttf".into(),
        }
    }
}
impl FontConfig {
    /// Resolve a font name to an existing file. Absolute or relative paths that
    /// exist win; otherwise each search dir is tried in order.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        self.search_dirs
            .iter()
            .map(|d| d.join(name))
            .find(|p| p.is_file())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub mapping: MappingConfig,
    pub default_image: DefaultImageConfig,
    pub icons: IconConfig,
    pub verify: VerifyConfig,
    pub fonts: FontConfig,
}

impl PipelineConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Loader used by the binaries: an absent file silently means defaults, a
    /// broken one is reported and then ignored. Validation warnings are logged.
    pub fn load_for_cli(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        let (cfg, err) = Self::load_or_default(path);
        if let Some(e) = err {
            warn!("ignoring {}: {e}", path.display());
        }
        for w in cfg.validate() {
            warn!("config: {w}");
        }
        cfg
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.mapping.extension.is_empty() {
            w.push("mapping.extension is empty; every file would match".into());
        } else if self.mapping.extension.starts_with('.') {
            w.push(format!(
                "mapping.extension {:?} should not include the leading dot",
                self.mapping.extension
            ));
        }
        if self.mapping.default_name.is_empty() {
            w.push("mapping.default_name is empty".into());
        }
        if self.default_image.width == 0 || self.default_image.height == 0 {
            w.push(format!(
                "default_image dimensions must be > 0 (got {}x{})",
                self.default_image.width, self.default_image.height
            ));
        }
        if self.default_image.font_px <= 0.0 {
            w.push(format!(
                "default_image.font_px {} must be > 0",
                self.default_image.font_px
            ));
        }
        if self.default_image.border_px * 2 >= self.default_image.width.min(self.default_image.height)
        {
            w.push(format!(
                "default_image.border_px {} swallows the whole image",
                self.default_image.border_px
            ));
        }
        if self.default_image.label.trim().is_empty() {
            w.push("default_image.label is blank".into());
        }
        if self.verify.manifest_token.is_empty() {
            w.push("verify.manifest_token is empty; manifest check always passes".into());
        }
        if self.fonts.search_dirs.is_empty() {
            w.push("fonts.search_dirs is empty; only direct font paths resolve".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_partial_config_keeps_defaults() {
        let sample = r#"(
            mapping: (file: "out/mapping.json"),
            default_image: (width: 512, label: "Missing"),
            verify: (manifest_token: "AppIconCustom"),
        )"#;
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(sample.as_bytes()).unwrap();
        let cfg = PipelineConfig::load_from_file(file.path()).expect("parse config");
        assert_eq!(cfg.mapping.file, PathBuf::from("out/mapping.json"));
        assert_eq!(cfg.mapping.extension, "png");
        assert_eq!(cfg.default_image.width, 512);
        assert_eq!(cfg.default_image.height, 300);
        assert_eq!(cfg.default_image.label, "Missing");
        assert_eq!(cfg.verify.manifest_token, "AppIconCustom");
        assert_eq!(cfg.icons, IconConfig::default());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_detects_warnings() {
        let mut bad = PipelineConfig::default();
        bad.mapping.extension = ".png".into();
        bad.default_image.width = 0;
        bad.default_image.font_px = -1.0;
        bad.default_image.label = "  ".into();
        bad.verify.manifest_token.clear();
        bad.fonts.search_dirs.clear();
        let warnings = bad.validate();
        let joined = warnings.join(" | ");
        assert!(joined.contains("leading dot"));
        assert!(joined.contains("default_image dimensions must be > 0"));
        assert!(joined.contains("font_px"));
        assert!(joined.contains("label is blank"));
        assert!(joined.contains("manifest_token is empty"));
        assert!(joined.contains("search_dirs is empty"));
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = PipelineConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn shipped_sample_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let cfg = PipelineConfig::load_from_file(&path).expect("sample config parses");
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn load_for_cli_tolerates_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"(mapping: [not valid").unwrap();
        let cfg = PipelineConfig::load_for_cli(file.path());
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn font_resolution_prefers_existing_direct_path() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("Face.ttf");
        fs::write(&font, b"not really a font").unwrap();
        let fonts = FontConfig {
            search_dirs: vec![dir.path().to_path_buf()],
            ..FontConfig::default()
        };
        assert_eq!(fonts.resolve("Face.ttf"), Some(font.clone()));
        assert_eq!(fonts.resolve(font.to_str().unwrap()), Some(font));
        assert_eq!(fonts.resolve("Nope.ttf"), None);
    }
}
