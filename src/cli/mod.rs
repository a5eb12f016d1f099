mod commands;
mod core;
mod formatting;
pub mod output;
mod registry;
mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use self::formatting::CliFormatters;
pub use shell::{run_cli, run_with_context};
