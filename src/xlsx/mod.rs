//! XLSX (Excel) workbook reading.
//!
//! Only what the sheet parser needs: the active worksheet as a grid of
//! typed cell values, with shared strings and date formats resolved.
//!
//! # Example
//!
//! ```no_run
//! use orgsheet::xlsx::XlsxReader;
//!
//! let reader = XlsxReader::open("Organization_Event.xlsx")?;
//! let sheet = reader.active_sheet()?;
//! println!("{}: {} rows", sheet.name, sheet.rows.len());
//! # Ok::<(), orgsheet::Error>(())
//! ```

mod parser;
mod shared_strings;
mod styles;

pub use parser::{parse_cell_ref, Worksheet, XlsxReader};
