use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::inject::InjectOptions;
use crate::xml::TextMode;

#[derive(Parser, Debug)]
#[command(name = "testlink-inject", version)]
#[command(about = "Inject spreadsheet test steps into an exported TestLink test case XML file")]
pub struct Cli {
    /// Spreadsheet with actions in column A and expected results in column B, no header row
    pub spreadsheet: PathBuf,
    /// Exported test case XML file, rewritten in place
    pub xml: PathBuf,
    /// How text content is written (overrides the config file)
    #[arg(long, value_enum)]
    pub text_mode: Option<TextMode>,
    /// Marker substituted for line breaks inside cells (overrides the config file)
    #[arg(long)]
    pub line_break: Option<String>,
    /// Write the result to this file instead of overwriting the XML input
    #[arg(short, long, conflicts_with = "dry_run")]
    pub output: Option<PathBuf>,
    /// Print the resulting XML instead of writing it
    #[arg(long)]
    pub dry_run: bool,
    /// Read configuration from this file instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Send log output to this file (truncated on each run)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Config values with command line overrides applied
    pub fn inject_options(&self, config: &Config) -> InjectOptions {
        let mut options = config.inject_options();
        if let Some(text_mode) = self.text_mode {
            options.text_mode = text_mode;
        }
        if let Some(line_break) = &self.line_break {
            options.line_break = line_break.clone();
        }
        options
    }
}
