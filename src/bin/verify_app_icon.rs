//! App icon set verifier
//!
//! Checks `Notifications/Assets.xcassets/AppIcon.appiconset` (by default): the
//! descriptor parses, every referenced file exists at the declared pixel size,
//! and `Notifications/Info.plist` references the icon set.

use std::{path::PathBuf, process::ExitCode};
use clap::Parser;
use word_asset_pipeline::{config::{PipelineConfig, DEFAULT_CONFIG_PATH}, logging, verify_icon_set};

#[derive(Parser, Debug)]
#[command(author, version, about = "Verify that the app icon set is complete", long_about = None)]
struct Args {
    #[arg(long)] icon_dir: Option<PathBuf>,
    #[arg(long)] manifest: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)] config: PathBuf,
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();
    let cfg = PipelineConfig::load_for_cli(&args.config);
    let icon_dir = args.icon_dir.unwrap_or(cfg.verify.icon_dir);
    let manifest = args.manifest.unwrap_or(cfg.verify.manifest);

    let report = verify_icon_set(&icon_dir, &manifest, &cfg.verify.manifest_token);
    for w in &report.warnings { println!("⚠️ {w}"); }
    if let Some(failure) = &report.failure {
        println!("❌ {failure}");
        return ExitCode::from(1);
    }
    println!("✅ App icon verification complete!");
    println!("📱 Found {} icon images ({} checked clean)", report.declared, report.valid);
    println!("🎉 Your app icon is ready to use!");
    ExitCode::SUCCESS
}
