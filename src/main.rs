//! requp - requirements file dependency checker/updater
//!
//! Two subcommands:
//! - `check` reports which pinned packages have newer versions available
//! - `update` rewrites confirmed pins in place, interactively

use clap::Parser;
use requp::cli::{CheckArgs, Cli, Command, UpdateArgs};
use requp::manifest::ManifestWriter;
use requp::orchestrator::Orchestrator;
use requp::output::{ReportOptions, TextReporter};
use requp::registry::{build_index, HttpClient};
use requp::update::{actionable, InteractiveUpdater};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Check(args) => run_check(args).await,
        Command::Update(args) => run_update(args).await,
    }
}

/// Check subcommand: print the report; outdated packages and failed
/// lookups still exit 0
async fn run_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    args.index.validate()?;
    if args.boring {
        colored::control::set_override(false);
    }

    let client = HttpClient::new()?;
    let index = build_index(&args.index.to_config(), client);
    let orchestrator = Orchestrator::new(index, args.pin_warn, !args.boring);

    let summary = orchestrator.check(&args.manifest).await?;

    let reporter = TextReporter::new(ReportOptions {
        verbose: args.verbose,
        info: args.info,
        pin_warn: args.pin_warn,
        boring: args.boring,
    });
    let mut stdout = io::stdout().lock();
    reporter.render(&summary, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}

/// Update subcommand: check first, then walk the outdated pins with
/// per-package confirmation and write the rewritten manifest back
async fn run_update(args: UpdateArgs) -> anyhow::Result<ExitCode> {
    args.index.validate()?;
    if args.boring {
        colored::control::set_override(false);
    }

    let client = HttpClient::new()?;
    let index = build_index(&args.index.to_config(), client);
    let orchestrator = Orchestrator::new(index, args.pin, !args.boring);

    let summary = orchestrator.check(&args.manifest).await?;
    let candidates = actionable(&summary.resolutions, args.pin);

    if candidates.is_empty() {
        println!("Nothing to update.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut writer = ManifestWriter::load(&args.manifest)?;
    let mut updater = InteractiveUpdater::from_stdin(args.boring);
    if args.yes {
        updater = updater.apply_all();
    }

    let outcome = updater.run(&mut writer, &candidates)?;

    for failure in &outcome.failed {
        eprintln!("Warning: {}", failure);
    }

    if outcome.applied > 0 {
        writer.write()?;
        println!(
            "Updated {} requirement(s) in {}.",
            outcome.applied,
            args.manifest.display()
        );
    } else {
        println!("No changes written.");
    }

    Ok(ExitCode::SUCCESS)
}
