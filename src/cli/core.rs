//! Shell context, dispatch, and CLI error types.

use std::io;

use dialoguer::Confirm;
use flow_core::LoadOutcome;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

use crate::{
    app::FinanceApp,
    config,
    errors::AppError,
    utils::paths,
};

use super::commands;
use super::formatting::CliFormatters;
use super::output;
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

/// Failures of a single command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) app: FinanceApp,
    pub(crate) formatters: CliFormatters,
    runtime: Runtime,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Loads configuration from the application home and opens the tracker.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = config::default_manager().map_err(AppError::from)?;
        let config = manager.load().map_err(AppError::from)?;
        if !manager.config_path().exists() {
            manager.save(&config).map_err(AppError::from)?;
        }
        let app = FinanceApp::from_config(&config, &paths::app_home())?;
        Self::with_app(mode, app)
    }

    pub fn with_app(mode: CliMode, app: FinanceApp) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let runtime = Builder::new_current_thread().enable_all().build()?;
        let formatters = CliFormatters::new(app.currency());

        let context = ShellContext {
            mode,
            registry,
            app,
            formatters,
            runtime,
            running: true,
        };
        context.report_load();
        Ok(context)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        format!("financeflow [{}]> ", self.app.transactions().len())
    }

    pub(crate) fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    fn report_load(&self) {
        if let LoadOutcome::Recovered(reason) = self.app.load_outcome() {
            output::warning(format!(
                "Saved transactions could not be read ({reason}). Starting with an empty list."
            ));
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &lowered), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::new()
            .with_prompt("Exit FinanceFlow?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::App(AppError::TransactionNotFound(id)) => {
                output::error(format!("No transaction matches `{id}`."));
                output::hint("Use `list` to see transaction ids.");
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }
}
