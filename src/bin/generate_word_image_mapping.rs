//! Word -> image mapping generator
//!
//! Scans a directory of PNGs and writes `word_image_mapping.json`, one entry per
//! image named after the file (the reserved `default` image is left out).
//!
//! Example:
//!   cargo run --bin generate_word_image_mapping -- Notifications/WordImages

use std::{path::PathBuf, process::ExitCode};
use anyhow::Result;
use clap::Parser;
use word_asset_pipeline::{cli, config::{PipelineConfig, DEFAULT_CONFIG_PATH}, logging, mapping};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate the word -> image filename mapping", long_about = None)]
struct Args {
    /// Directory holding one image per word
    images_directory: PathBuf,
    /// Output file (defaults to mapping.file from the config)
    #[arg(long)] output: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)] config: PathBuf,
}

fn run(args: Args) -> Result<()> {
    let cfg = PipelineConfig::load_for_cli(&args.config);
    let found = mapping::scan_images(&args.images_directory, &cfg.mapping.extension, &cfg.mapping.default_name)?;
    let out = args.output.unwrap_or(cfg.mapping.file);
    mapping::write_mapping(&out, &found)?;
    println!("Generated mapping for {} words in {}", found.len(), out.display());
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    cli::finish(run(Args::parse()))
}
