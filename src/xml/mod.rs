//! In-memory XML tree with a quick-xml based reader and writer

pub mod document;
pub mod reader;
pub mod text;
pub mod writer;

pub use document::{Document, Element, Misc, Node};
pub use reader::parse;
pub use text::{TextMode, protect};
pub use writer::{element_to_string, to_bytes};
