//! Command executor for dispatching CLI commands

use super::handlers::{PluginsCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};
use crate::error::{AppError, AppResult};

/// Dispatch the parsed command; no command means `serve`
///
/// # Errors
/// Returns errors from command handlers or argument validation failures
pub async fn execute_command(cli: &Cli, settings: Settings, environment: Environment) -> AppResult<()> {
    cli.validate().map_err(|message| AppError::BadRequest { message })?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, environment)
                .execute(*dry_run)
                .await
        }
        None => ServeCommandHandler::new(settings, environment).execute(false).await,
        Some(Commands::Plugins) => {
            PluginsCommandHandler::new(&settings).execute();
            Ok(())
        }
    }
}
