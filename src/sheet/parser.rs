//! Row scanning: flat sheet rows to organizations with nested events.

use crate::error::{Error, Result};
use crate::model::{cell_at, Event, Organization, Row, TagFormat, Tags};

use super::header::{ColumnLayout, HeaderMap};

/// Row holding the column headers (row 0 is a banner).
pub const HEADER_ROW: usize = 1;

/// First data row.
pub const DATA_START_ROW: usize = 2;

/// Parses sheet rows into organizations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetParser {
    tag_format: TagFormat,
}

/// Fold state: organizations so far and the one receiving events.
#[derive(Debug, Default)]
struct ScanState {
    orgs: Vec<Organization>,
    current: Option<usize>,
}

impl SheetParser {
    /// Create a parser carrying tags in the given format.
    pub fn new(tag_format: TagFormat) -> Self {
        Self { tag_format }
    }

    /// Resolve the header row of a sheet.
    pub fn layout(rows: &[Row]) -> Result<ColumnLayout> {
        let header = rows.get(HEADER_ROW).ok_or(Error::MissingHeaderRows)?;
        let layout = ColumnLayout::resolve(&HeaderMap::from_row(header))?;
        tracing::debug!(?layout, "resolved sheet columns");
        Ok(layout)
    }

    /// Parse all rows of a sheet, header rows included.
    pub fn parse(&self, rows: &[Row]) -> Result<Vec<Organization>> {
        let layout = Self::layout(rows)?;
        Ok(self.parse_data(&layout, rows.get(DATA_START_ROW..).unwrap_or_default()))
    }

    /// Parse data rows against an already-resolved layout. Never fails.
    pub fn parse_data(&self, layout: &ColumnLayout, rows: &[Row]) -> Vec<Organization> {
        let state = rows
            .iter()
            .enumerate()
            .fold(ScanState::default(), |state, (offset, row)| {
                self.scan_row(state, layout, row, DATA_START_ROW + offset)
            });

        tracing::debug!(
            organizations = state.orgs.len(),
            events = Organization::event_count(&state.orgs),
            "parsed sheet"
        );
        state.orgs
    }

    fn scan_row(
        &self,
        mut state: ScanState,
        layout: &ColumnLayout,
        row: &Row,
        row_number: usize,
    ) -> ScanState {
        let name = cell_at(row, layout.name);
        let title = cell_at(row, layout.title);

        if !name.is_empty() {
            state.orgs.push(Organization::new(
                name,
                cell_at(row, layout.org_description),
                Tags::parse(cell_at(row, layout.org_tags), self.tag_format),
            ));
            state.current = Some(state.orgs.len() - 1);
        }

        if title.is_empty() {
            return state;
        }

        match state.current.and_then(|idx| state.orgs.get_mut(idx)) {
            Some(org) => org.events.push(Event {
                title,
                description: cell_at(row, layout.event_description),
                date: cell_at(row, layout.date),
                tags: Tags::parse(cell_at(row, layout.event_tags), self.tag_format),
            }),
            None => {
                tracing::warn!(row = row_number + 1, %title, "event row before any organization dropped")
            }
        }

        state
    }
}
