//! Report assembly: JSON views of the model and their Markdown renderings.
//!
//! Each view is what gets written to (and read back from) one JSON
//! artifact. Every Markdown section states explicitly when its data was
//! not detected.

mod api;
mod code;
mod database;
mod requirements;

pub use api::ApiAnalysis;
pub use code::{CodeAnalysis, CodeSummary};
pub use database::{mermaid_identifier, DatabaseAnalysis};
pub use requirements::RequirementsDoc;

/// Escape a value for use inside a Markdown table cell.
pub(crate) fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Line rendered in place of an empty section.
pub(crate) fn not_detected(what: &str) -> String {
    format!("_No {} detected._\n\n", what)
}
