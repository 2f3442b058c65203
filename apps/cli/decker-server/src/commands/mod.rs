//! Handlers for each CLI action.

pub mod browse;
pub mod config;
pub mod one_shot;
pub mod server;
pub mod session;

use crate::cli::{Action, Cli};
use crate::console::ConsoleFrontend;
use crate::error::AppError;
use crate::logger::initialize as LoggerInitialize;
use crate::settings::Settings;

use decker_core::supervisor::{Dependencies, Supervisor};

use std::process::ExitCode;
use std::sync::Arc;

use log::{info, warn};

/// Run one CLI invocation to completion.
pub async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let settings = Settings::load(&cli.overrides)?;

    LoggerInitialize(&settings.storage_dir, cli.verbose)?;
    info!("decker-server starting in {}", settings.workspace.display());

    if let Action::Config { save } = cli.action {
        println!("{}", config::describe(&settings)?);
        if save {
            settings.config.save(&settings.config_dir)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let frontend = Arc::new(ConsoleFrontend::new(settings.pages_dir()));
    let deps = Dependencies::new(
        settings.config.clone(),
        Some(settings.workspace.clone()),
        frontend.clone(),
        frontend.clone(),
    );
    let handle = Supervisor::spawn(deps);

    let result = match &cli.action {
        Action::Serve => server::serve(&handle).await,
        Action::Open { document } => browse::open(&handle, document.as_deref()).await,
        Action::Preview { document } => {
            browse::preview(&handle, &frontend, document.as_deref()).await
        }
        Action::Session => session::run(&handle).await,
        action => match action.one_shot() {
            Some(command) => Ok(one_shot::run(&handle, command).await),
            None => Ok(ExitCode::SUCCESS),
        },
    };

    if let Err(e) = handle.shutdown().await {
        warn!("Supervisor shutdown: {e}");
    }

    result
}
