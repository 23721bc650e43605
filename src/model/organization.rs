//! Organization and event records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How tag cells are carried into the parsed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagFormat {
    /// Keep the normalized cell text as-is (seed text output)
    #[default]
    Raw,
    /// Split on commas into trimmed, non-empty tags (remote import)
    List,
}

/// Tags of an organization or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    Raw(String),
    List(Vec<String>),
}

impl Tags {
    /// Build tags from a normalized cell according to `format`.
    pub fn parse(cell: String, format: TagFormat) -> Self {
        match format {
            TagFormat::Raw => Tags::Raw(cell),
            TagFormat::List => Tags::List(
                cell.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(String::from)
                    .collect(),
            ),
        }
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        match self {
            Tags::Raw(s) => s.is_empty(),
            Tags::List(tags) => tags.is_empty(),
        }
    }
}

impl Default for Tags {
    fn default() -> Self {
        Tags::Raw(String::new())
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tags::Raw(s) => f.write_str(s),
            Tags::List(tags) => f.write_str(&tags.join(", ")),
        }
    }
}

/// An event listed under an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: String,
    /// Date exactly as it appears in the sheet; never parsed.
    pub date: String,
    pub tags: Tags,
}

/// An organization and the events that follow it in the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub description: String,
    pub tags: Tags,
    /// Events in sheet order
    pub events: Vec<Event>,
}

impl Organization {
    /// Create an organization with no events.
    pub fn new(name: impl Into<String>, description: impl Into<String>, tags: Tags) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tags,
            events: Vec::new(),
        }
    }

    /// Total number of events across a set of organizations.
    pub fn event_count(orgs: &[Organization]) -> usize {
        orgs.iter().map(|org| org.events.len()).sum()
    }
}
