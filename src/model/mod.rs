//! Record model for organization/event sheets.
//!
//! The workbook reader produces [`CellValue`]s; the sheet parser turns rows of
//! them into [`Organization`]s that own their [`Event`]s.

mod cell;
mod organization;

pub use cell::*;
pub use organization::*;
