//! Format-preserving editing of Unreal-style `.ini` files.
//!
//! This is not a general INI parser: there is no comment syntax, escaping,
//! multi-line value or include support. It reads sections and `key=value`
//! lines in order and writes them back the same way, so that bumping one
//! value in a version-controlled project file produces a one-line diff.

mod document;
mod line;

pub use document::{ConfigDocument, Entry, Section, normalize_section_name};
