use flow_core::{AdviceOutcome, CancelToken};
use flow_domain::TransactionKind;

use crate::{errors::AppError, utils::build_info};

use super::core::{CliMode, CommandError, CommandResult, ShellContext};
use super::formatting::short_id;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "add",
        "Record an income or expense",
        "add <income|expense> <amount> <description...>",
        cmd_add,
    ));
    registry.register(CommandEntry::new(
        "remove",
        "Delete a transaction by id or id prefix",
        "remove <id>",
        cmd_remove,
    ));
    registry.register(CommandEntry::new(
        "list",
        "Show transactions, newest first",
        "list",
        cmd_list,
    ));
    registry.register(CommandEntry::new(
        "summary",
        "Show total income, expenses and net savings",
        "summary",
        cmd_summary,
    ));
    registry.register(CommandEntry::new(
        "chart",
        "Show where the money went",
        "chart",
        cmd_chart,
    ));
    registry.register(CommandEntry::new(
        "advice",
        "Ask the AI advisor for tips on your finances",
        "advice",
        cmd_advice,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new(
        "help",
        "List commands or describe one",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "exit",
        "Leave the shell",
        "exit",
        cmd_exit,
    ));
    registry.alias("rm", "remove");
    registry.alias("ls", "list");
    registry.alias("quit", "exit");
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "usage: add <income|expense> <amount> <description...>";
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(usage.into()));
    }
    let kind: TransactionKind = args[0]
        .parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;
    let amount = parse_amount(args[1])?;
    let description = args[2..].join(" ");

    let id = context.app.add_transaction(kind, amount, &description)?;
    if let Some(txn) = context.app.transaction(id) {
        output::success(format!(
            "Added {} {} ({}) [{}].",
            txn.kind,
            context.formatters.money(txn.amount),
            txn.description,
            short_id(txn.id)
        ));
    }
    warn_if_unsaved(context);
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(CommandError::InvalidArguments("usage: remove <id>".into()));
    };
    let id = context.app.resolve_id(token)?;
    let removed = context.app.transaction(id).cloned();
    if !context.app.delete_transaction(id) {
        return Err(AppError::TransactionNotFound(token.to_string()).into());
    }
    if let Some(txn) = removed {
        output::success(format!(
            "Removed {} `{}` ({}).",
            txn.kind,
            txn.description,
            context.formatters.signed_entry(&txn)
        ));
    }
    warn_if_unsaved(context);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_no_args("list", args)?;
    let transactions = context.app.transactions();
    if transactions.is_empty() {
        output::info("No transactions yet. Try `add income 5000 Salary`.");
        return Ok(());
    }
    output::section(format!("Transactions ({})", transactions.len()));
    for txn in transactions {
        output::line(context.formatters.transaction_line(txn));
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_no_args("summary", args)?;
    let summary = context.app.summary();
    let money = |amount| context.formatters.money(amount);
    output::section("Financial Summary");
    output::line(format!("{:<16}{}", "Total Income", money(summary.total_income)));
    output::line(format!("{:<16}{}", "Total Expenses", money(summary.total_expenses)));
    output::line(format!("{:<16}{}", "Net Savings", money(summary.savings)));
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_no_args("chart", args)?;
    let Some(breakdown) = context.app.breakdown() else {
        output::info("No data to chart yet. Add income or expenses first.");
        return Ok(());
    };
    output::section(breakdown.kind.title());
    for slice in &breakdown.slices {
        output::line(context.formatters.slice_line(slice));
    }
    Ok(())
}

fn cmd_advice(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_no_args("advice", args)?;
    if !context.app.transactions().is_empty() {
        output::info("Analyzing your finances...");
    }

    let cancel = CancelToken::new();
    let interrupt = cancel.clone();
    let interactive = context.mode == CliMode::Interactive;
    let app = &context.app;
    let outcome = context.runtime().block_on(async {
        // Ctrl-C cancels the pending request instead of ending the process.
        let watcher = interactive.then(|| {
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupt.cancel();
                }
            })
        });
        let outcome = app.request_advice(&cancel).await;
        if let Some(handle) = watcher {
            handle.abort();
        }
        outcome
    });

    match &outcome {
        AdviceOutcome::Generated(text) => {
            output::section("Financial Advice");
            output::line(text);
        }
        AdviceOutcome::NoTransactions => output::info(outcome.text()),
        AdviceOutcome::NoText | AdviceOutcome::Failed | AdviceOutcome::Cancelled => {
            output::warning(outcome.text())
        }
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_no_args("version", args)?;
    let meta = build_info::current();
    output::info(meta.headline());
    output::hint(format!("built:   {}", meta.timestamp));
    output::hint(format!("target:  {} ({})", meta.target, meta.profile));
    output::hint(format!("rustc:   {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Available commands");
            for entry in context.registry.list() {
                output::line(format!("  {:<10}{}", entry.name, entry.description));
            }
            output::hint("Use `help <command>` for details.");
            Ok(())
        }
        [name] => match context.registry.get(&name.to_ascii_lowercase()) {
            Some(entry) => {
                output::section(format!("Help: {}", entry.name));
                output::line(format!("  description: {}", entry.description));
                output::line(format!("  usage:       {}", entry.usage));
                Ok(())
            }
            None => {
                context.suggest_command(name);
                Ok(())
            }
        },
        _ => Err(CommandError::InvalidArguments("usage: help [command]".into())),
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Goodbye.");
    Err(CommandError::ExitRequested)
}

fn expect_no_args(command: &str, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!(
            "`{command}` takes no arguments"
        )))
    }
}

/// Accepts `1200`, `1,200.50` or `$1200`.
fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{raw}`")))
}

fn warn_if_unsaved(context: &ShellContext) {
    if let Some(reason) = context.app.last_persist_error() {
        output::warning(format!(
            "Change kept for this session but not saved to disk: {reason}"
        ));
    }
}
