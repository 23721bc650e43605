//! End-to-end parsing of generated workbooks.
//!
//! Run with: cargo test --test sheet_pipeline

mod common;

use common::{WorkbookBuilder, SPLIT_HEADER};
use orgsheet::{parse_bytes, parse_file, render, Error, LogicalColumn, TagFormat, Tags};

fn festival_workbook() -> WorkbookBuilder {
    WorkbookBuilder::with_header(SPLIT_HEADER)
        .row(&["", "", "", "", "Stray Event", "2024-01-05", "", ""])
        .row(&["", "Acme", "Desc A", "x,y", "Launch", "2024-01-01", "Event desc", "y, z"])
        .row(&["", "", "", "", "Workshop", "", "", ""])
        .row(&[])
        .row(&["", "  Beta Collective  ", "", "", "", "", "", ""])
        .row(&["", "Gamma & Sons", "Family run", "craft", "Open Day", "2024-06-01", "", "craft, family"])
}

#[test]
fn test_split_header_hierarchy() {
    let orgs = parse_bytes(&festival_workbook().build(), TagFormat::List).unwrap();

    let names: Vec<_> = orgs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Beta Collective", "Gamma & Sons"]);

    let acme = &orgs[0];
    assert_eq!(acme.tags, Tags::List(vec!["x".into(), "y".into()]));
    assert_eq!(acme.events.len(), 2);
    assert_eq!(acme.events[0].description, "Event desc");
    assert_eq!(acme.events[0].tags, Tags::List(vec!["y".into(), "z".into()]));
    assert_eq!(acme.events[1].title, "Workshop");

    assert!(orgs[1].events.is_empty());
    assert_eq!(orgs[2].events[0].tags, Tags::List(vec!["craft".into(), "family".into()]));
}

#[test]
fn test_orphan_event_dropped() {
    let orgs = parse_bytes(&festival_workbook().build(), TagFormat::Raw).unwrap();
    assert!(orgs
        .iter()
        .flat_map(|o| &o.events)
        .all(|e| e.title != "Stray Event"));
}

#[test]
fn test_single_description_and_tags_columns() {
    let workbook = WorkbookBuilder::with_header(&["Name", "DESCRIPTION", "Tags", "Title", "Date"])
        .row(&["Acme", "Shared", "a, b", "Launch", "May 1"])
        .build();

    let orgs = parse_bytes(&workbook, TagFormat::Raw).unwrap();
    let org = &orgs[0];
    assert_eq!(org.description, "Shared");
    assert_eq!(org.events[0].description, "Shared");
    assert_eq!(org.tags, Tags::Raw("a, b".into()));
    assert_eq!(org.events[0].tags, org.tags);
    assert_eq!(org.events[0].date, "May 1");
}

#[test]
fn test_missing_date_column_names_label() {
    let workbook = WorkbookBuilder::with_header(&["Name", "Description", "Tags", "Title"])
        .row(&["Acme", "", "", "Launch"])
        .build();

    let err = parse_bytes(&workbook, TagFormat::Raw).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(LogicalColumn::Date)));
    assert!(err.to_string().contains("Event date"));
}

#[test]
fn test_banner_only_workbook() {
    let workbook = WorkbookBuilder::new().row(&["Organizations & Events"]).build();
    let err = parse_bytes(&workbook, TagFormat::Raw).unwrap_err();
    assert!(matches!(err, Error::MissingHeaderRows));
}

#[test]
fn test_seed_text_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Organization_Event.xlsx");
    festival_workbook().write_to(&path);

    let orgs = parse_file(&path, TagFormat::Raw).unwrap();
    let text = render::to_seed_text(&orgs);

    assert_eq!(
        text,
        "Organization: Acme\n\
         Description: Desc A\n\
         Tags: x,y\n\
         Events:\n\
         - Launch | 2024-01-01 | Tags: y, z | Event desc\n\
         - Workshop | TBD | Tags: N/A | No description.\n\
         \n\
         Organization: Beta Collective\n\
         Description: N/A\n\
         Tags: N/A\n\
         Events: None listed.\n\
         \n\
         Organization: Gamma & Sons\n\
         Description: Family run\n\
         Tags: craft\n\
         Events:\n\
         - Open Day | 2024-06-01 | Tags: craft, family | No description."
    );
    assert_eq!(orgsheet::to_seed_text(&path).unwrap(), text);
}

#[test]
fn test_json_output_of_parsed_sheet() {
    let orgs = parse_bytes(&festival_workbook().build(), TagFormat::List).unwrap();
    let json = render::to_json(&orgs, render::JsonFormat::Compact).unwrap();
    assert!(json.starts_with(r#"[{"name":"Acme","description":"Desc A","tags":["x","y"]"#));
}
