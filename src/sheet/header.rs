//! Header row resolution.

use crate::error::{Error, Result};
use crate::model::{normalize_cell, CellValue};
use std::collections::HashMap;
use std::fmt;

/// The five columns a sheet must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalColumn {
    Name,
    Description,
    Tags,
    Title,
    Date,
}

impl LogicalColumn {
    /// All required columns, in the order they are checked.
    pub const REQUIRED: [LogicalColumn; 5] = [
        LogicalColumn::Name,
        LogicalColumn::Description,
        LogicalColumn::Tags,
        LogicalColumn::Title,
        LogicalColumn::Date,
    ];

    /// Lower-cased header text that identifies the column.
    pub fn key(&self) -> &'static str {
        match self {
            LogicalColumn::Name => "name",
            LogicalColumn::Description => "description",
            LogicalColumn::Tags => "tags",
            LogicalColumn::Title => "title",
            LogicalColumn::Date => "date",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            LogicalColumn::Name => "Organization name",
            LogicalColumn::Description => "Organization description",
            LogicalColumn::Tags => "Organization tags",
            LogicalColumn::Title => "Event title",
            LogicalColumn::Date => "Event date",
        }
    }
}

impl fmt::Display for LogicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header names mapped to every column position they occupy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, Vec<usize>>,
}

impl HeaderMap {
    /// Build from a header row. Names are trimmed and lower-cased; blank
    /// headers are skipped. Positions are kept left to right.
    pub fn from_row(row: &[Option<CellValue>]) -> Self {
        let mut columns: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, cell) in row.iter().enumerate() {
            let name = normalize_cell(cell.as_ref()).to_lowercase();
            if name.is_empty() {
                continue;
            }
            columns.entry(name).or_default().push(idx);
        }
        Self { columns }
    }

    /// Every position holding `name` (already lower-case), left to right.
    pub fn positions(&self, name: &str) -> &[usize] {
        self.columns.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First position of `column`.
    fn first(&self, column: LogicalColumn) -> Result<usize> {
        self.positions(column.key())
            .first()
            .copied()
            .ok_or(Error::MissingColumn(column))
    }

    /// Second position of `column`, or its first when it appears once.
    fn second_or_first(&self, column: LogicalColumn) -> Result<usize> {
        let positions = self.positions(column.key());
        positions
            .get(1)
            .or_else(|| positions.first())
            .copied()
            .ok_or(Error::MissingColumn(column))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header row had no names at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Physical column positions for each field of the record model.
///
/// A header appearing twice (`description`, `tags`) splits into an
/// organization column (first) and an event column (second). Appearing once,
/// both fields read the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub org_description: usize,
    pub org_tags: usize,
    pub title: usize,
    pub event_description: usize,
    pub date: usize,
    pub event_tags: usize,
}

impl ColumnLayout {
    /// Resolve the layout, failing on the first required column that is absent.
    pub fn resolve(headers: &HeaderMap) -> Result<Self> {
        if let Some(missing) = LogicalColumn::REQUIRED
            .into_iter()
            .find(|column| headers.positions(column.key()).is_empty())
        {
            return Err(Error::MissingColumn(missing));
        }

        Ok(Self {
            name: headers.first(LogicalColumn::Name)?,
            org_description: headers.first(LogicalColumn::Description)?,
            org_tags: headers.first(LogicalColumn::Tags)?,
            title: headers.first(LogicalColumn::Title)?,
            event_description: headers.second_or_first(LogicalColumn::Description)?,
            date: headers.first(LogicalColumn::Date)?,
            event_tags: headers.second_or_first(LogicalColumn::Tags)?,
        })
    }
}
