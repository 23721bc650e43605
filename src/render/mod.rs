//! Output rendering for parsed organizations.
//!
//! # Example
//!
//! ```no_run
//! use orgsheet::render::{to_json, to_seed_text, JsonFormat};
//! use orgsheet::TagFormat;
//!
//! let orgs = orgsheet::parse_file("Organization_Event.xlsx", TagFormat::Raw)?;
//!
//! // Seed text document
//! let text = to_seed_text(&orgs);
//!
//! // Structured JSON
//! let json = to_json(&orgs, JsonFormat::Pretty)?;
//! # Ok::<(), orgsheet::Error>(())
//! ```

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{render_event_line, render_organization, to_seed_text};
