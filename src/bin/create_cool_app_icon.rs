//! Brain-motif app icon generator
//!
//! Renders every slot of the app icon size table and updates the icon set's
//! Contents.json. Run from the project root; no arguments needed.

use std::{path::PathBuf, process::ExitCode};
use anyhow::Result;
use clap::Parser;
use word_asset_pipeline::{cli, config::{PipelineConfig, DEFAULT_CONFIG_PATH}, generate_icon_set, icon::DescriptorUpdate, logging, IconStyle, APP_ICON_SLOTS};

#[derive(Parser, Debug)]
#[command(author, version, about = "Brain-motif app icon generator", long_about = None)]
struct Args {
    /// Output .appiconset directory (defaults from the config)
    #[arg(long)] icon_dir: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)] config: PathBuf,
}

fn run(args: Args) -> Result<()> {
    let style = IconStyle::Cool;
    let cfg = PipelineConfig::load_for_cli(&args.config);
    let dir = args.icon_dir.unwrap_or_else(|| style.default_dir(&cfg.icons).to_path_buf());
    let report = generate_icon_set(style, &dir, APP_ICON_SLOTS, &cfg.fonts)?;
    for path in &report.written { println!("Generated {}", path.display()); }
    match report.descriptor {
        DescriptorUpdate::Created => println!("Wrote fresh Contents.json"),
        DescriptorUpdate::Patched(p) => println!("Contents.json: {} attached, {} appended, {} already set", p.attached, p.appended, p.unchanged),
    }
    println!("Cool app icon generation complete!");
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    cli::finish(run(Args::parse()))
}
