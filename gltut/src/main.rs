mod cli;
mod logging;
mod native;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use gltut_core::Game;

use crate::{
    cli::Cli,
    logging::{LoggingConfig, init_logging},
    native::NativePlatform,
};

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    // parse command line arguments
    let cli = Cli::parse();

    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "gltut starting up"
    );

    let platform = NativePlatform::new().wrap_err("Failed to initialize windowing layer")?;
    let game = Game::init(platform, cli.game_config()).wrap_err("Startup failed")?;
    let report = game.run().wrap_err("Render loop failed")?;

    tracing::info!(frames = report.frames, "shutting down");
    Ok(())
}
