//! Fixture helpers shared by the integration tests
#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};

/// A single test case export as TestLink produces it, with two old steps
pub const TESTCASE_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testcases>
<testcase internalid="1042" name="Login &amp; logout">
	<node_order><![CDATA[0]]></node_order>
	<externalid><![CDATA[17]]></externalid>
	<version><![CDATA[1]]></version>
	<summary><![CDATA[<p>User logs in & out</p>]]></summary>
	<preconditions><![CDATA[]]></preconditions>
	<execution_type><![CDATA[1]]></execution_type>
	<steps>
<step>
	<step_number><![CDATA[1]]></step_number>
	<actions><![CDATA[old action]]></actions>
	<expectedresults><![CDATA[old result]]></expectedresults>
	<execution_type><![CDATA[1]]></execution_type>
</step>
<step>
	<step_number><![CDATA[2]]></step_number>
	<actions><![CDATA[another old action]]></actions>
	<expectedresults><![CDATA[another old result]]></expectedresults>
	<execution_type><![CDATA[1]]></execution_type>
</step>
</steps>
	<keywords>
		<keyword name="smoke"><notes><![CDATA[]]></notes></keyword>
	</keywords>
</testcase>
</testcases>
"#;

/// Write `rows` to the first sheet of a new workbook; empty texts leave the cell blank
pub fn write_workbook(dir: &Path, rows: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("steps.xlsx");
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (row, (actions, expected)) in rows.iter().enumerate() {
        if !actions.is_empty() {
            worksheet.write_string(row as u32, 0, *actions).unwrap();
        }
        if !expected.is_empty() {
            worksheet.write_string(row as u32, 1, *expected).unwrap();
        }
    }

    workbook.save(&path).unwrap();
    path
}

pub fn write_xml(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("testcase.xml");
    fs::write(&path, content).unwrap();
    path
}

/// Direct `testcase` child of the document root
pub fn testcase<'a, 'input>(doc: &'a roxmltree::Document<'input>) -> roxmltree::Node<'a, 'input> {
    doc.root_element()
        .children()
        .find(|node| node.has_tag_name("testcase"))
        .expect("document has a testcase")
}

pub fn child<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Vec<roxmltree::Node<'a, 'input>> {
    node.children().filter(|n| n.has_tag_name(name)).collect()
}

/// (step_number, actions, expectedresults) of every step under `steps`
pub fn step_texts(steps: roxmltree::Node<'_, '_>) -> Vec<(String, String, String)> {
    child(steps, "step")
        .into_iter()
        .map(|step| {
            let text = |name: &str| {
                child(step, name)
                    .first()
                    .and_then(|node| node.text())
                    .unwrap_or_default()
                    .to_string()
            };
            (text("step_number"), text("actions"), text("expectedresults"))
        })
        .collect()
}
