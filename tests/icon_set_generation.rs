use std::fs;
use word_asset_pipeline::catalog::{Contents, CONTENTS_FILE};
use word_asset_pipeline::config::FontConfig;
use word_asset_pipeline::icon::DescriptorUpdate;
use word_asset_pipeline::verify::VerifyWarning;
use word_asset_pipeline::{generate_icon_set, verify_icon_set, IconStyle, APP_ICON_SLOTS};

fn no_system_fonts() -> FontConfig {
    FontConfig { search_dirs: vec![], bold: "no-such-font.ttf".into(), ..FontConfig::default() }
}

#[test]
fn full_table_renders_at_declared_edges_and_verifies() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("Notifications/Assets.xcassets/AppIcon.appiconset");
    let report = generate_icon_set(IconStyle::Modern, &dir, APP_ICON_SLOTS, &no_system_fonts()).unwrap();
    assert_eq!(report.descriptor, DescriptorUpdate::Created);
    assert_eq!(report.written.len(), APP_ICON_SLOTS.len());
    for slot in APP_ICON_SLOTS {
        let dims = image::image_dimensions(dir.join(slot.filename)).unwrap();
        assert_eq!(dims, (slot.pixels, slot.pixels), "{}", slot.filename);
    }

    let plist = tmp.path().join("Info.plist");
    fs::write(&plist, "<key>CFBundleIcons</key><string>AppIcon</string>").unwrap();
    let verified = verify_icon_set(&dir, &plist, "AppIcon");
    assert!(verified.passed(), "{:?}", verified.failure);
    assert!(verified.warnings.is_empty(), "{:?}", verified.warnings);
    assert_eq!(verified.valid, APP_ICON_SLOTS.len());
}

#[test]
fn patching_styles_are_idempotent_on_rerun() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("AppIcon.appiconset");
    fs::create_dir_all(&dir).unwrap();
    // Xcode's stock descriptor: slots declared, no filenames yet
    fs::write(
        dir.join(CONTENTS_FILE),
        r#"{ "images" : [
              { "idiom" : "iphone", "scale" : "2x", "size" : "20x20" },
              { "idiom" : "iphone", "scale" : "3x", "size" : "20x20" }
            ],
            "info" : { "author" : "xcode", "version" : 1 } }"#,
    )
    .unwrap();
    let slots = &APP_ICON_SLOTS[..4];

    let first = generate_icon_set(IconStyle::Modern, &dir, slots, &no_system_fonts()).unwrap();
    let DescriptorUpdate::Patched(summary) = first.descriptor else { panic!("expected a patch") };
    assert_eq!((summary.attached, summary.appended, summary.unchanged), (2, 2, 0));
    let after_first = fs::read_to_string(dir.join(CONTENTS_FILE)).unwrap();

    let second = generate_icon_set(IconStyle::Plain, &dir, slots, &no_system_fonts()).unwrap();
    let DescriptorUpdate::Patched(summary) = second.descriptor else { panic!("expected a patch") };
    assert!(summary.is_noop());
    assert_eq!(fs::read_to_string(dir.join(CONTENTS_FILE)).unwrap(), after_first);

    let contents = Contents::load(&dir.join(CONTENTS_FILE)).unwrap();
    assert_eq!(contents.images.len(), 4);
    assert!(contents.images.iter().all(|i| i.filename.is_some()));
}

#[test]
fn resized_icon_only_warns() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("AppIcon.appiconset");
    let slots = &APP_ICON_SLOTS[..2];
    generate_icon_set(IconStyle::Modern, &dir, slots, &no_system_fonts()).unwrap();
    image::RgbaImage::new(3, 3).save(dir.join(slots[0].filename)).unwrap();

    let report = verify_icon_set(&dir, &tmp.path().join("Info.plist"), "AppIcon");
    assert!(report.passed());
    assert!(report.warnings.iter().any(|w| matches!(w, VerifyWarning::SizeMismatch { actual: (3, 3), .. })));
    assert!(report.warnings.iter().any(|w| matches!(w, VerifyWarning::ManifestMissing(_))));
}

#[test]
fn cool_style_replaces_existing_descriptor() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("AppIcon.appiconset");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(CONTENTS_FILE), r#"{"images": [{"idiom": "watch", "scale": "2x", "size": "24x24"}]}"#).unwrap();
    let slots = &APP_ICON_SLOTS[..2];

    let report = generate_icon_set(IconStyle::Cool, &dir, slots, &no_system_fonts()).unwrap();
    assert_eq!(report.descriptor, DescriptorUpdate::Created);
    let contents = Contents::load(&dir.join(CONTENTS_FILE)).unwrap();
    assert_eq!(contents, Contents::app_icon(slots));
}
