use anyhow::Result;
use clap::Parser;

use fengshui::cli::Cli;
use fengshui::config::Config;
use fengshui::utils::logging::{Verbosity, init_logging};
use fengshui::utils::{AppError, OutputStyle, report_error};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(Verbosity::from_debug_flag(cli.debug));

    let outcome = run(cli).await;
    if let Err(err) = outcome {
        match err.downcast_ref::<AppError>() {
            Some(app_err) => report_error(app_err),
            None => eprintln!("❌ {}", OutputStyle::error(&format!("{:#}", err))),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    // A missing config file is created with defaults
    let config_path = cli.config.clone().unwrap_or_else(Config::config_file_path);
    let config = Config::load_custom(&config_path)?;
    config.apply_color();

    cli.command.execute(config, &config_path).await
}
