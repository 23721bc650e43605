//! # orgsheet
//!
//! Organization/event spreadsheets to seed text and REST upserts.
//!
//! The active worksheet of an `.xlsx` workbook carries a banner row, a header
//! row, and then data rows where each `name` starts an organization and each
//! `title` adds an event to the organization above it. This crate recovers
//! that hierarchy and either flattens it to a plain-text seed document or
//! upserts it into a REST backend in batches.
//!
//! ## Quick Start
//!
//! ```no_run
//! use orgsheet::{parse_file, render, TagFormat};
//!
//! let orgs = parse_file("Organization_Event.xlsx", TagFormat::Raw)?;
//! std::fs::write("backboard_seed.txt", render::to_seed_text(&orgs))?;
//! println!("Organizations: {}", orgs.len());
//! # Ok::<(), orgsheet::Error>(())
//! ```
//!
//! ## Features
//!
//! - `import` (default): slug/payload building and the batched REST upsert

pub mod container;
pub mod error;
pub mod model;
pub mod render;
pub mod sheet;
pub mod xlsx;

#[cfg(feature = "import")]
pub mod import;

// Re-exports
pub use error::{Error, Result};
pub use model::{CellValue, Event, Organization, TagFormat, Tags};
pub use sheet::{ColumnLayout, LogicalColumn, SheetParser};

use std::path::Path;

/// Parse the active worksheet of a workbook file into organizations.
///
/// # Example
///
/// ```no_run
/// use orgsheet::{parse_file, TagFormat};
///
/// let orgs = parse_file("Organization_Event.xlsx", TagFormat::List)?;
/// println!("Organizations: {}", orgs.len());
/// # Ok::<(), orgsheet::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>, tag_format: TagFormat) -> Result<Vec<Organization>> {
    let sheet = xlsx::XlsxReader::open(path)?.active_sheet()?;
    SheetParser::new(tag_format).parse(&sheet.rows)
}

/// Parse the active worksheet of an in-memory workbook.
pub fn parse_bytes(data: &[u8], tag_format: TagFormat) -> Result<Vec<Organization>> {
    let sheet = xlsx::XlsxReader::from_bytes(data.to_vec())?.active_sheet()?;
    SheetParser::new(tag_format).parse(&sheet.rows)
}

/// Render a workbook file straight to the seed text document.
pub fn to_seed_text(path: impl AsRef<Path>) -> Result<String> {
    let orgs = parse_file(path, TagFormat::Raw)?;
    Ok(render::to_seed_text(&orgs))
}
