//! Terminal front end: clap command parsing, dialoguer prompts, and coloured
//! status lines around the wizard core.

pub mod interaction;
pub mod output;
pub mod runner;

use std::io::IsTerminal;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{info, warn};

use crate::account::{AccountFlow, FlowOptions};
use crate::admin::AdminFlow;
use crate::api::memory::sample_branches;
use crate::api::{
    active_branches, AccountApi, Branch, HttpAccountApi, InMemoryAccountApi, RemoteError,
    SubmissionReceipt,
};
use crate::config::{Config, ConfigManager};
use crate::currency::{format_money, Currency};
use crate::errors::{ConfigError, WizardError};
use crate::projection::{compute_projection, InterestRateTable};
use crate::utils::{Clock, SystemClock};
use crate::wizard::validation::{parse_date, parse_decimal};
use crate::wizard::{Wizard, WizardEvent};

use interaction::TerminalInteraction;
use runner::{FormResult, WizardRunner};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Debug, Parser)]
#[command(name = "account_wizard", version, about = "Branch console for opening accounts")]
pub struct Cli {
    /// Record submissions locally instead of calling the backend.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk through the account-opening wizard.
    OpenAccount,
    /// Create a back-office administrator.
    AddAdmin,
    /// Print the term-deposit rate table, or project one deposit.
    Rates {
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, requires = "term")]
        principal: Option<String>,
        #[arg(long)]
        term: Option<u32>,
        /// Start date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        start: Option<String>,
    },
    /// Inspect the persisted configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON.
    Show,
    /// Print where the configuration file lives.
    Path,
}

pub fn run_cli() -> Result<(), CliError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    output::set_plain(!std::io::stdout().is_terminal());
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let clock = SystemClock;

    match cli.command {
        Command::OpenAccount => {
            let api = backend(&config, cli.dry_run)?;
            open_account(&config, &clock, api.as_ref())
        }
        Command::AddAdmin => {
            let api = backend(&config, cli.dry_run)?;
            add_admin(api.as_ref())
        }
        Command::Rates {
            currency,
            principal,
            term,
            start,
        } => match principal {
            Some(principal) => project(
                &principal,
                currency.unwrap_or(config.default_currency),
                term.unwrap_or_default(),
                start.as_deref(),
                clock.today(),
            ),
            None => {
                print_rates(currency);
                Ok(())
            }
        },
        Command::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let json = serde_json::to_string_pretty(&config)
                        .map_err(|err| ConfigError::Serde(err.to_string()))?;
                    println!("{}", json);
                }
                ConfigAction::Path => println!("{}", manager.path().display()),
            }
            Ok(())
        }
    }
}

fn backend(config: &Config, dry_run: bool) -> Result<Box<dyn AccountApi>, CliError> {
    if dry_run {
        output::info("Dry run: submissions are recorded locally.");
        return Ok(Box::new(
            InMemoryAccountApi::new().with_branches(sample_branches()),
        ));
    }
    Ok(Box::new(HttpAccountApi::new(config)?))
}

/// Active branches, or an empty list when the listing is unavailable. Branch
/// IDs are then accepted unchecked and the backend has the final word.
fn load_branches(api: &dyn AccountApi) -> Vec<Branch> {
    match active_branches(api) {
        Ok(branches) => {
            output::section("Branches");
            for branch in &branches {
                output::info(branch.display_label());
            }
            branches
        }
        Err(err) => {
            warn!(error = %err, "branch listing unavailable");
            output::warning(format!("Branch list unavailable: {}", err));
            Vec::new()
        }
    }
}

fn open_account(config: &Config, clock: &dyn Clock, api: &dyn AccountApi) -> Result<(), CliError> {
    let branches = load_branches(api);
    let options = FlowOptions::with_clock(config, clock).with_branches(branches);
    let mut wizard = Wizard::new(AccountFlow::new(options)).map_err(WizardError::from)?;

    wizard.subscribe(|event| match event {
        WizardEvent::DefaultsApplied { currency, fields } => output::info(format!(
            "{} limits reset to {} defaults",
            fields.len(),
            currency.code()
        )),
        WizardEvent::ProjectionUpdated(projection) => {
            output::info(format!("Projection: {}", output::projection_line(projection)))
        }
        _ => {}
    });

    output::section("Open account");
    output::info("Type :back to return to the previous field, :cancel to stop.");
    let mut interaction = TerminalInteraction::new();
    let result = WizardRunner::new(&mut wizard, api).run(&mut interaction)?;
    report(result);
    Ok(())
}

fn add_admin(api: &dyn AccountApi) -> Result<(), CliError> {
    let branches = load_branches(api);
    let mut wizard = Wizard::new(AdminFlow::new(&branches)).map_err(WizardError::from)?;
    output::section("New administrator");
    let mut interaction = TerminalInteraction::new();
    let result = WizardRunner::new(&mut wizard, api).run(&mut interaction)?;
    report(result);
    Ok(())
}

fn report(result: FormResult<SubmissionReceipt>) {
    match result {
        FormResult::Completed(receipt) => {
            info!(reference = ?receipt.reference, "record created");
            let reference = receipt.reference.unwrap_or_else(|| "(no reference)".into());
            output::success(format!("Created {}", reference));
            if let Some(message) = receipt.message {
                output::info(message);
            }
        }
        FormResult::Cancelled => output::warning("Cancelled. Nothing was submitted."),
    }
}

fn print_rates(only: Option<Currency>) {
    output::section("Term deposit rates");
    let table = InterestRateTable::standard();
    for (currency, term, rate) in table.entries() {
        if only.is_some_and(|wanted| wanted != currency) {
            continue;
        }
        println!("{:<4} {:>3} months {:>6.2}%", currency.code(), term, rate);
    }
}

fn project(
    principal: &str,
    currency: Currency,
    term: u32,
    start: Option<&str>,
    today: NaiveDate,
) -> Result<(), CliError> {
    let amount = parse_decimal(principal).map_err(CliError::InvalidArguments)?;
    let start = match start {
        Some(raw) => parse_date(raw).map_err(CliError::InvalidArguments)?,
        None => today,
    };
    let projection = compute_projection(amount, currency, term, start)
        .map_err(WizardError::from)?;
    output::section(format!(
        "{} for {} months",
        format_money(amount, currency),
        term
    ));
    println!("{}", output::projection_line(&projection));
    Ok(())
}
