use std::path::PathBuf;
use clap::Parser;
use tracing::{debug, error, Level};

use arxiv_notifier::{
    config::{load_config, EmailCredentials, DEFAULT_CONFIG_PATH},
    error::SearchError,
    mailer::SmtpMailer,
    parser::ArxivParser
};

/// Mails a digest of recent arXiv submissions matching the configured search.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// YAML file with a `search` section
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Optional env file holding the mail credentials
    #[arg(long, default_value = "notifier.env")]
    env_file: PathBuf,
}

fn main() -> Result<(), SearchError> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            return Ok(());
        }
    };

    if let Err(e) = dotenvy::from_path(&args.env_file) {
        debug!("no env file loaded from {}: {}", args.env_file.display(), e);
    }
    let credentials = match EmailCredentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    let parser = ArxivParser::new()?;
    arxiv_notifier::run(&config, &credentials, &parser, &SmtpMailer::default())?;
    Ok(())
}
