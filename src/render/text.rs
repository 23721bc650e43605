//! Plain-text seed document renderer.

use crate::model::{Event, Organization};

const NOT_AVAILABLE: &str = "N/A";
const NO_DATE: &str = "TBD";
const NO_DESCRIPTION: &str = "No description.";

/// Render organizations as blocks separated by one blank line.
///
/// ```text
/// Organization: Acme
/// Description: Desc A
/// Tags: x, y
/// Events:
/// - Launch | 2024-01-01 | Tags: y, z | Event desc
/// ```
pub fn to_seed_text(orgs: &[Organization]) -> String {
    orgs.iter()
        .map(render_organization)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render one organization block (no trailing newline).
pub fn render_organization(org: &Organization) -> String {
    let tags = org.tags.to_string();
    let mut lines = vec![
        format!("Organization: {}", org.name),
        format!("Description: {}", or_default(&org.description, NOT_AVAILABLE)),
        format!("Tags: {}", or_default(&tags, NOT_AVAILABLE)),
    ];

    if org.events.is_empty() {
        lines.push("Events: None listed.".to_string());
    } else {
        lines.push("Events:".to_string());
        lines.extend(org.events.iter().map(render_event_line));
    }

    lines.join("\n")
}

/// Render one `- title | date | Tags: ... | description` event line.
pub fn render_event_line(event: &Event) -> String {
    let tags = event.tags.to_string();
    format!(
        "- {} | {} | Tags: {} | {}",
        event.title,
        or_default(&event.date, NO_DATE),
        or_default(&tags, NOT_AVAILABLE),
        or_default(&event.description, NO_DESCRIPTION)
    )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
