//! Splices spreadsheet steps into an exported test case document.
//!
//! The run is build steps, prepare the document, append, serialize, write.
//! Failures before the write leave the XML file untouched; the write itself
//! is a plain overwrite and can leave a truncated file if it fails midway.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InjectError, Result};
use crate::steps::build_steps;
use crate::xml::{self, Document, Element, Node, TextMode};

const TESTCASE: &str = "testcase";
const STEPS: &str = "steps";
const STEP: &str = "step";

pub const DEFAULT_LINE_BREAK: &str = "<br>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectOptions {
    pub text_mode: TextMode,
    /// Text substituted for line breaks inside spreadsheet cells
    pub line_break: String,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            text_mode: TextMode::default(),
            line_break: DEFAULT_LINE_BREAK.to_string(),
        }
    }
}

/// A parsed document with its `testcase` element detached for editing
///
/// The element goes back into its original position in [`into_document`].
///
/// [`into_document`]: PreparedDocument::into_document
#[derive(Debug)]
pub struct PreparedDocument {
    document: Document,
    testcase: Element,
    slot: usize,
    replaced_steps: Option<usize>,
}

impl PreparedDocument {
    pub fn testcase(&self) -> &Element {
        &self.testcase
    }

    pub fn testcase_mut(&mut self) -> &mut Element {
        &mut self.testcase
    }

    /// Number of `step` elements in the removed `steps`, if there was one
    pub fn replaced_steps(&self) -> Option<usize> {
        self.replaced_steps
    }

    pub fn into_document(self) -> Document {
        let Self {
            mut document,
            testcase,
            slot,
            ..
        } = self;
        document.root.children.insert(slot, Node::Element(testcase));
        document
    }
}

/// Load `path`, drop the existing `steps` of its `testcase` and protect the
/// remaining text of the test case
pub fn prepare_document<P: AsRef<Path>>(path: P, mode: TextMode) -> Result<PreparedDocument> {
    let path = path.as_ref();
    debug!("Preparing XML document {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| InjectError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document = xml::parse(&content)?;

    let slot = document
        .root
        .position(TESTCASE)
        .ok_or_else(|| InjectError::MissingTestcase {
            path: path.to_path_buf(),
        })?;
    let Node::Element(mut testcase) = document.root.children.remove(slot) else {
        return Err(InjectError::MissingTestcase {
            path: path.to_path_buf(),
        });
    };

    let replaced_steps = testcase
        .remove_child(STEPS)
        .map(|steps| steps.child_elements().filter(|e| e.name == STEP).count());
    if let Some(count) = replaced_steps {
        debug!("Removed existing steps element with {} steps", count);
    }

    let leaves = xml::protect(&mut testcase, mode);
    debug!("Protected text of {} testcase leaves", leaves);

    Ok(PreparedDocument {
        document,
        testcase,
        slot,
        replaced_steps,
    })
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectReport {
    pub steps: usize,
    pub replaced_steps: Option<usize>,
    /// `name` attribute of the test case
    pub testcase_name: Option<String>,
    pub bytes: usize,
}

/// Build the edited document and serialize it without writing anything
pub fn render<P, Q>(
    spreadsheet: P,
    xml_path: Q,
    options: &InjectOptions,
) -> Result<(Vec<u8>, InjectReport)>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let steps = build_steps(spreadsheet, options)?;
    let mut prepared = prepare_document(xml_path, options.text_mode)?;

    let step_count = steps.child_elements().count();
    let replaced_steps = prepared.replaced_steps();
    let testcase_name = prepared.testcase().attribute("name").map(str::to_string);
    prepared.testcase_mut().push(steps);

    let bytes = xml::to_bytes(&prepared.into_document())?;
    let report = InjectReport {
        steps: step_count,
        replaced_steps,
        testcase_name,
        bytes: bytes.len(),
    };
    Ok((bytes, report))
}

/// Inject the steps of `spreadsheet` into `xml_path`, overwriting it
pub fn inject<P, Q>(spreadsheet: P, xml_path: Q, options: &InjectOptions) -> Result<InjectReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let destination = xml_path.as_ref().to_path_buf();
    inject_to(spreadsheet, xml_path, destination, options)
}

/// Inject the steps of `spreadsheet` into `xml_path`, writing the result to `destination`
pub fn inject_to<P, Q, R>(
    spreadsheet: P,
    xml_path: Q,
    destination: R,
    options: &InjectOptions,
) -> Result<InjectReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: Into<PathBuf>,
{
    let (bytes, report) = render(spreadsheet, xml_path, options)?;
    let destination = destination.into();

    fs::write(&destination, &bytes).map_err(|source| InjectError::Write {
        path: destination.clone(),
        source,
    })?;
    info!(
        "Wrote {} steps ({} bytes) to {}",
        report.steps,
        report.bytes,
        destination.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <testcases>\n<testcase internalid=\"42\" name=\"Login\">\n\
        \t<summary><![CDATA[<p>Logs in</p>]]></summary>\n\
        \t<steps><step><step_number>1</step_number></step><step/></steps>\n\
        \t<keywords><keyword name=\"smoke\"/></keywords>\n\
        </testcase>\n</testcases>\n";

    fn write_export(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("testcase.xml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_prepare_removes_steps_and_keeps_siblings() {
        let dir = TempDir::new().unwrap();
        let path = write_export(&dir, EXPORT);

        let prepared = prepare_document(&path, TextMode::Cdata).unwrap();
        assert_eq!(prepared.replaced_steps(), Some(2));
        assert!(prepared.testcase().find("steps").is_none());
        assert!(prepared.testcase().find("keywords").is_some());
        assert_eq!(prepared.testcase().attribute("internalid"), Some("42"));
    }

    #[test]
    fn test_prepare_without_steps() {
        let dir = TempDir::new().unwrap();
        let path = write_export(&dir, "<testcases><testcase name=\"x\"/></testcases>");

        let prepared = prepare_document(&path, TextMode::Escape).unwrap();
        assert_eq!(prepared.replaced_steps(), None);
    }

    #[test]
    fn test_prepare_protects_testcase_text() {
        let dir = TempDir::new().unwrap();
        let path = write_export(&dir, EXPORT);

        let prepared = prepare_document(&path, TextMode::Escape).unwrap();
        assert_eq!(
            prepared.testcase().find("summary").unwrap().children,
            vec![Node::Text("<p>Logs in</p>".to_string())]
        );
    }

    #[test]
    fn test_into_document_restores_position() {
        let dir = TempDir::new().unwrap();
        let path = write_export(&dir, "<testcases><before/><testcase/><after/></testcases>");

        let document = prepare_document(&path, TextMode::Escape)
            .unwrap()
            .into_document();
        let names: Vec<&str> = document.root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["before", "testcase", "after"]);
    }

    #[test]
    fn test_missing_testcase_is_structural_error() {
        let dir = TempDir::new().unwrap();
        let path = write_export(&dir, "<testsuite><testcases><testcase/></testcases></testsuite>");

        let err = prepare_document(&path, TextMode::Escape).unwrap_err();
        assert!(matches!(err, InjectError::MissingTestcase { .. }));
        assert!(err.to_string().starts_with("no testcase found"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = prepare_document(dir.path().join("absent.xml"), TextMode::Escape).unwrap_err();
        assert!(matches!(err, InjectError::Read { .. }));
    }

    #[test]
    fn test_default_options() {
        let options = InjectOptions::default();
        assert_eq!(options.text_mode, TextMode::Escape);
        assert_eq!(options.line_break, "<br>");
    }
}
