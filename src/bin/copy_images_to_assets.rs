//! Copy word images into an asset catalog
//!
//! Reads `word_image_mapping.json` (see `generate_word_image_mapping`) and
//! creates `<word>.imageset/` folders, plus the reserved `default.imageset`.
//!
//! Example:
//!   cargo run --bin copy_images_to_assets -- WordImages Notifications/Assets.xcassets

use std::{path::PathBuf, process::ExitCode};
use anyhow::{bail, Result};
use clap::Parser;
use word_asset_pipeline::{assets::{self, DefaultAsset}, cli, config::{PipelineConfig, DEFAULT_CONFIG_PATH}, logging};

#[derive(Parser, Debug)]
#[command(author, version, about = "Copy mapped word images into an .xcassets catalog", long_about = None)]
struct Args {
    source_images_dir: PathBuf,
    assets_dir: PathBuf,
    /// Mapping file (defaults to mapping.file from the config)
    #[arg(long)] mapping: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)] config: PathBuf,
}

fn run(args: Args) -> Result<()> {
    let cfg = PipelineConfig::load_for_cli(&args.config);
    for dir in [&args.source_images_dir, &args.assets_dir] {
        if !dir.is_dir() { bail!("{} is not a valid directory", dir.display()); }
    }
    let mapping_file = args.mapping.unwrap_or_else(|| cfg.mapping.file.clone());
    let words = assets::load_mapping(&mapping_file)?;

    let report = assets::copy_images_to_assets(&args.source_images_dir, &args.assets_dir, &words, &cfg.mapping)?;
    match &report.default_asset {
        DefaultAsset::Existing => {}
        DefaultAsset::Synthesized { from } => println!("Default image synthesized from {from}"),
        DefaultAsset::Unavailable => println!("Warning: no default image could be created"),
    }
    println!("Successfully copied {} of {} images to assets catalog", report.copied, report.total);
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    cli::finish(run(Args::parse()))
}
