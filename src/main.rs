use std::path::PathBuf;

use clap::Parser;
use file_tab_opener_lib::config::ConfigManager;
use file_tab_opener_lib::{i18n, shell};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: shell::Command,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("File Tab Opener starting up");

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => match ConfigManager::new() {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                eprintln!("file-tab-opener error: {}", e);
                std::process::exit(1);
            }
        },
    };
    config.load();

    match config.language() {
        Some(code) => i18n::set_language_code(code),
        None => i18n::init(),
    }

    if let Err(e) = shell::run(cli.command, &mut config).await {
        log::error!("{}", e);
        eprintln!("file-tab-opener error: {}", e);
        std::process::exit(1);
    }
}
