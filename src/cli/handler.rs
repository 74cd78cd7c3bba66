//! Runs an injection from parsed command line arguments

use anyhow::{Context, Result};
use colored::*;
use std::io::{self, Write};

use super::Cli;
use crate::config::Config;
use crate::inject::{InjectReport, inject_to, render};

pub fn handle_inject_command(cli: &Cli, config: &Config) -> Result<()> {
    let options = cli.inject_options(config);

    if cli.dry_run {
        let (bytes, _) = render(&cli.spreadsheet, &cli.xml, &options).with_context(|| {
            format!("Failed to inject steps into {}", cli.xml.display())
        })?;
        io::stdout()
            .write_all(&bytes)
            .context("Failed to write XML to stdout")?;
        return Ok(());
    }

    let destination = cli.output.clone().unwrap_or_else(|| cli.xml.clone());
    println!(
        "📄 Reading steps from: {}",
        cli.spreadsheet.display().to_string().cyan()
    );

    let report = inject_to(&cli.spreadsheet, &cli.xml, &destination, &options)
        .with_context(|| format!("Failed to inject steps into {}", cli.xml.display()))?;

    println!("{}", summary(&report));
    println!("💾 Written to: {}", destination.display().to_string().cyan());
    Ok(())
}

fn summary(report: &InjectReport) -> String {
    let testcase = report
        .testcase_name
        .as_deref()
        .map(|name| format!(" '{}'", name))
        .unwrap_or_default();

    match report.replaced_steps {
        Some(replaced) => format!(
            "✅ Injected {} steps into testcase{} (replaced {} existing)",
            report.steps.to_string().green(),
            testcase,
            replaced
        ),
        None => format!(
            "✅ Injected {} steps into testcase{}",
            report.steps.to_string().green(),
            testcase
        ),
    }
}
