//! Placeholder "No Image Available" generator
//!
//! Example:
//!   cargo run --bin create_default_image -- WordImages

use std::{path::PathBuf, process::ExitCode};
use anyhow::Result;
use clap::Parser;
use word_asset_pipeline::{cli, config::{PipelineConfig, DEFAULT_CONFIG_PATH}, default_image, logging};

#[derive(Parser, Debug)]
#[command(author, version, about = "Create the default placeholder image", long_about = None)]
struct Args {
    output_directory: PathBuf,
    /// Font file or name to look up in fonts.search_dirs
    #[arg(long)] font: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)] config: PathBuf,
}

fn run(args: Args) -> Result<()> {
    let mut cfg = PipelineConfig::load_for_cli(&args.config);
    if let Some(font) = args.font { cfg.fonts.regular = font; }
    let path = default_image::create_default_image(&args.output_directory, &cfg.mapping.default_name, &cfg.default_image, &cfg.fonts)?;
    println!("Created default image at {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    cli::finish(run(Args::parse()))
}
