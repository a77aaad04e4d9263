use clap::Parser;
use std::path::PathBuf;

/// Draw in the air with a colored marker in front of your webcam.
#[derive(Parser, Debug)]
#[command(name = "air-canvas")]
#[command(version)]
pub struct Args {
    /// JSON config file; missing sections keep their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Camera index (overrides the config file).
    #[arg(long)]
    pub camera: Option<u32>,

    /// Logo image pasted into the default logo slot (overrides the config file).
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Do not open the second window showing the marker mask.
    #[arg(long)]
    pub no_mask_window: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}
