pub mod settings;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ion-prefixlist")]
#[command(about = "Bulk-apply routing prefix lists to ION elements from a CSV file")]
pub struct CliConfig {
    /// Path to the input CSV file containing site and prefix information
    pub csv_filepath: PathBuf,

    /// Enable debug logging (includes resolved API payloads)
    #[arg(long)]
    pub debug: bool,

    /// Path to the credentials settings file; environment variables are used
    /// when the file does not exist
    #[arg(long, default_value = "prismasase_settings.toml")]
    pub settings: PathBuf,
}
