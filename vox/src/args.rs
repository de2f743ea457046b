use std::path::PathBuf;

use clap::Parser;

/// Vox text-to-speech gateway
#[derive(Debug, Parser)]
#[command(name = "vox", about = "HTTP gateway bridging synthesis requests to broker workers")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "vox.toml", env = "VOX_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "VOX_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
