//! Conversion of spreadsheet rows into a TestLink `<steps>` element

pub mod spreadsheet;

use log::{debug, info};
use std::path::Path;

use crate::error::Result;
use crate::inject::InjectOptions;
use crate::xml::{Element, TextMode, protect};

pub use spreadsheet::read_step_rows;

/// One spreadsheet row, numbered from 1 in sheet order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step_number: usize,
    pub actions: String,
    pub expected_results: String,
}

impl StepRecord {
    /// Builds a record, replacing line breaks in both texts with `line_break`
    pub fn new(
        step_number: usize,
        actions: &str,
        expected_results: &str,
        line_break: &str,
    ) -> Self {
        Self {
            step_number,
            actions: replace_line_breaks(actions, line_break),
            expected_results: replace_line_breaks(expected_results, line_break),
        }
    }

    /// `<step>` element with `step_number`, `actions` and `expectedresults` children
    pub fn to_element(&self) -> Element {
        let mut step = Element::new("step");
        step.push(Element::with_text("step_number", self.step_number.to_string()));
        step.push(Element::with_text("actions", self.actions.as_str()));
        step.push(Element::with_text("expectedresults", self.expected_results.as_str()));
        step
    }
}

fn replace_line_breaks(text: &str, line_break: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', line_break)
}

/// Number rows from 1 in the order they were read
pub fn records_from_rows(rows: &[(String, String)], line_break: &str) -> Vec<StepRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, (actions, expected_results))| {
            StepRecord::new(index + 1, actions, expected_results, line_break)
        })
        .collect()
}

/// Detached `<steps>` element holding one protected `<step>` per record
pub fn steps_element(records: &[StepRecord], mode: TextMode) -> Element {
    let mut steps = Element::new("steps");
    for record in records {
        let mut step = record.to_element();
        protect(&mut step, mode);
        steps.push(step);
    }
    steps
}

/// Read the first sheet of `path` and build the `<steps>` element from it
pub fn build_steps<P: AsRef<Path>>(path: P, options: &InjectOptions) -> Result<Element> {
    let path = path.as_ref();
    debug!("Building steps from {}", path.display());

    let rows = read_step_rows(path)?;
    let records = records_from_rows(&rows, &options.line_break);
    info!("Built {} steps from {}", records.len(), path.display());

    Ok(steps_element(&records, options.text_mode))
}
