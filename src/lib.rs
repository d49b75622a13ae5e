pub mod assets;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod default_image;
pub mod icon;
pub mod logging;
pub mod mapping;
pub mod raster;
pub mod text;
pub mod verify;

// Curated re-exports
pub use catalog::{Contents, IconSlot, APP_ICON_SLOTS};
pub use config::PipelineConfig;
pub use icon::{generate_icon_set, IconStyle};
pub use mapping::WordImageMapping;
pub use verify::{verify_icon_set, VerifyReport};
