use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use testlink_inject::cli::{Cli, handle_inject_command};
use testlink_inject::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(log_path) = cli.log_file.as_ref().or(config.log_file.as_ref()) {
        // Truncate on each run
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    logger.init();

    info!("Starting testlink-inject");
    handle_inject_command(&cli, &config)
}
