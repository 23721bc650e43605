//! Organization/event sheet parsing.
//!
//! Row 0 of the active worksheet is a banner and is ignored, row 1 holds the
//! headers, and every later row is data. A row with a `name` starts a new
//! organization; a row with a `title` adds an event to the organization
//! started most recently. Both can happen on the same row.
//!
//! # Example
//!
//! ```no_run
//! use orgsheet::model::TagFormat;
//! use orgsheet::sheet::SheetParser;
//! use orgsheet::xlsx::XlsxReader;
//!
//! let sheet = XlsxReader::open("Organization_Event.xlsx")?.active_sheet()?;
//! let orgs = SheetParser::new(TagFormat::List).parse(&sheet.rows)?;
//! for org in &orgs {
//!     println!("{} ({} events)", org.name, org.events.len());
//! }
//! # Ok::<(), orgsheet::Error>(())
//! ```

mod header;
mod parser;

pub use header::{ColumnLayout, HeaderMap, LogicalColumn};
pub use parser::{SheetParser, DATA_START_ROW, HEADER_ROW};
