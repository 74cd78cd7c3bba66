//! Protection of leaf text so that `&`, `<` and `>` cannot break the markup.
//!
//! Text is kept decoded in the tree and encoded once by the writer, which
//! makes protection idempotent: protecting an already protected subtree
//! changes nothing.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::document::{Element, Node};

const CDATA_CLOSE: &str = "]]>";

/// How leaf text is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// Character data with `&`, `<` and `>` replaced by entities
    #[default]
    Escape,
    /// CDATA sections, as TestLink writes its own exports
    Cdata,
}

/// Mark the text of every leaf element below and including `element`
///
/// Returns the number of leaves that carry text.
pub fn protect(element: &mut Element, mode: TextMode) -> usize {
    if !element.is_leaf() {
        return element
            .child_elements_mut()
            .map(|child| protect(child, mode))
            .sum();
    }

    let mut marked = false;
    for node in element.children.iter_mut() {
        let text = match node {
            Node::Text(text) | Node::CData(text) => std::mem::take(text),
            _ => continue,
        };
        *node = match mode {
            TextMode::Escape => Node::Text(text),
            TextMode::Cdata => Node::CData(text),
        };
        marked = true;
    }
    usize::from(marked)
}

/// Split `text` into CDATA section contents so that none contains `]]>`
pub fn cdata_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(index) = rest.find(CDATA_CLOSE) {
        // "]]" closes this section, ">" opens the next one
        sections.push(rest[..index + 2].to_string());
        rest = &rest[index + 2..];
    }
    sections.push(rest.to_string());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> Element {
        let mut step = Element::new("step");
        step.children.push(Node::Text("\n".to_string()));
        step.push(Element::with_text("step_number", "1"));
        step.push(Element::with_text("actions", "Click & login"));
        step.push(Element::new("expectedresults"));
        step
    }

    #[test]
    fn test_cdata_mode_marks_leaves_only() {
        let mut step = step();
        let marked = protect(&mut step, TextMode::Cdata);

        assert_eq!(marked, 2);
        assert_eq!(step.children[0], Node::Text("\n".to_string()));
        assert_eq!(
            step.find("actions").unwrap().children,
            vec![Node::CData("Click & login".to_string())]
        );
        assert!(step.find("expectedresults").unwrap().children.is_empty());
    }

    #[test]
    fn test_escape_mode_converts_cdata_to_text() {
        let mut summary = Element::new("summary");
        summary.children.push(Node::CData("<p>x</p>".to_string()));
        protect(&mut summary, TextMode::Escape);
        assert_eq!(summary.children, vec![Node::Text("<p>x</p>".to_string())]);
    }

    #[test]
    fn test_protect_is_idempotent() {
        for mode in [TextMode::Escape, TextMode::Cdata] {
            let mut once = step();
            protect(&mut once, mode);
            let mut twice = once.clone();
            protect(&mut twice, mode);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_literal_cdata_markup_is_kept_as_text() {
        for mode in [TextMode::Escape, TextMode::Cdata] {
            let mut actions = Element::with_text("actions", "<![CDATA[a < b]]>");
            protect(&mut actions, mode);
            assert_eq!(actions.text(), "<![CDATA[a < b]]>");
        }
    }

    #[test]
    fn test_cdata_sections_split_terminator() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("]]>]]>"), vec!["]]", ">]]", ">"]);
        assert_eq!(cdata_sections(""), vec![""]);
    }
}
