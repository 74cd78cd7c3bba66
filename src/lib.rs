//! Injects test steps from a two-column spreadsheet into an exported
//! TestLink test case XML file.

pub mod cli;
pub mod config;
pub mod error;
pub mod inject;
pub mod steps;
pub mod xml;

pub use error::{InjectError, Result};
pub use inject::{
    InjectOptions, InjectReport, PreparedDocument, inject, inject_to, prepare_document, render,
};
pub use steps::{StepRecord, build_steps};
pub use xml::TextMode;
