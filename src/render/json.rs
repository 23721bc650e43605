//! JSON renderer implementation.

use crate::error::Result;
use serde::Serialize;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Serialize parsed organizations or import payloads to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(value)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, Organization, Tags};

    fn orgs() -> Vec<Organization> {
        let mut org = Organization::new("Acme", "Desc", Tags::List(vec!["x".into()]));
        org.events.push(Event {
            title: "Launch".into(),
            date: "2024-01-01".into(),
            tags: Tags::List(vec![]),
            ..Default::default()
        });
        vec![org]
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&orgs(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"name\": \"Acme\""));
        assert!(json.contains("\"title\": \"Launch\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&orgs(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert_eq!(
            json,
            r#"[{"name":"Acme","description":"Desc","tags":["x"],"events":[{"title":"Launch","description":"","date":"2024-01-01","tags":[]}]}]"#
        );
    }

    #[test]
    fn test_json_reads_back() {
        let json = to_json(&orgs(), JsonFormat::default()).unwrap();
        let parsed: Vec<Organization> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, orgs());
    }
}
