use clap::Parser;

use notification_router::cli::{self, Cli, execute_command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    if let Err(error) = execute_command(&cli, settings, environment).await {
        tracing::error!(error = ?error, "Command failed");
        return Err(error.into());
    }

    Ok(())
}
