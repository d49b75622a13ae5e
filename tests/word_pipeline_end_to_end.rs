use std::fs;
use word_asset_pipeline::assets::{copy_images_to_assets, DefaultAsset};
use word_asset_pipeline::catalog::{Contents, CONTENTS_FILE};
use word_asset_pipeline::config::MappingConfig;
use word_asset_pipeline::mapping::{read_mapping, scan_images, write_mapping};

fn png(path: &std::path::Path, shade: u8) {
    image::RgbImage::from_pixel(8, 8, image::Rgb([shade, shade, shade])).save(path).unwrap();
}

#[test]
fn mapping_then_copy_produces_three_imagesets() {
    let tmp = tempfile::tempdir().unwrap();
    let images = tmp.path().join("images");
    let assets = tmp.path().join("Assets.xcassets");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&assets).unwrap();
    png(&images.join("apple.png"), 10);
    png(&images.join("banana.png"), 20);
    png(&images.join("default.png"), 30);

    let cfg = MappingConfig::default();
    let mapping = scan_images(&images, &cfg.extension, &cfg.default_name).unwrap();
    let mapping_file = tmp.path().join("word_image_mapping.json");
    write_mapping(&mapping_file, &mapping).unwrap();
    let js: serde_json::Value = serde_json::from_str(&fs::read_to_string(&mapping_file).unwrap()).unwrap();
    assert_eq!(js, serde_json::json!({"apple": "apple.png", "banana": "banana.png"}));

    let report = copy_images_to_assets(&images, &assets, &read_mapping(&mapping_file).unwrap(), &cfg).unwrap();
    assert_eq!((report.copied, report.total), (2, 2), "expected \"2 of 2\"");
    assert_eq!(report.default_asset, DefaultAsset::Existing);

    for id in ["apple", "banana", "default"] {
        let set = assets.join(format!("{id}.imageset"));
        let contents = Contents::load(&set.join(CONTENTS_FILE)).unwrap();
        assert_eq!(contents.images[0].filename.as_deref(), Some(format!("{id}.png").as_str()));
        let files: Vec<_> = fs::read_dir(&set).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(files.len(), 2, "{id}.imageset should hold Contents.json + one png, got {files:?}");
        assert_eq!(fs::read(set.join(format!("{id}.png"))).unwrap(), fs::read(images.join(format!("{id}.png"))).unwrap());
    }
}

#[test]
fn default_is_synthesized_from_first_word_when_absent() {
    let tmp = tempfile::tempdir().unwrap();
    let images = tmp.path().join("images");
    let assets = tmp.path().join("assets");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&assets).unwrap();
    png(&images.join("zebra.png"), 1);
    png(&images.join("ant.png"), 2);

    let cfg = MappingConfig::default();
    let mapping = scan_images(&images, &cfg.extension, &cfg.default_name).unwrap();
    let report = copy_images_to_assets(&images, &assets, &mapping, &cfg).unwrap();
    assert_eq!(report.default_asset, DefaultAsset::Synthesized { from: "ant.png".into() });
    assert_eq!(fs::read(images.join("default.png")).unwrap(), fs::read(images.join("ant.png")).unwrap());
    assert!(assets.join("default.imageset/default.png").is_file());
    assert_eq!(report.total, 2);
}
