use std::path::PathBuf;

use clap::Parser;
use foxhole::config::Config;

#[derive(Parser)]
#[command(name = "foxhole")]
#[command(about = "Drive a cube around a small skyboxed scene", long_about = None)]
struct Cli {
    /// RON scene configuration; defaults reproduce the stock scene
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the mesh, textures and skybox faces
    #[arg(short, long)]
    assets: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(root) = cli.assets {
        config = config.with_asset_root(root);
    }

    foxhole::app::run(config)
}
