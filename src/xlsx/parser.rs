//! XLSX workbook reader.

use crate::container::Package;
use crate::error::{Error, Result};
use crate::model::{CellValue, Row};
use std::collections::HashMap;
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::styles::Styles;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Worksheet limits: 1,048,576 rows and columns up to `XFD`.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Sheet entry from workbook.xml, in tab order.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// A worksheet loaded as a dense grid of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    /// Sheet tab name
    pub name: String,
    /// Rows from the first sheet row; gaps are empty rows
    pub rows: Vec<Row>,
}

/// Reader for the worksheets of an XLSX workbook.
pub struct XlsxReader {
    package: Package,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    active_tab: usize,
    relationships: HashMap<String, String>,
}

impl XlsxReader {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let shared_strings = if package.exists(SHARED_STRINGS_PART) {
            SharedStrings::parse(&package.read_xml(SHARED_STRINGS_PART)?)?
        } else {
            SharedStrings::default()
        };

        let styles = package
            .read_xml("xl/styles.xml")
            .map(|xml| Styles::parse(&xml))
            .unwrap_or_default();

        let relationships = package.read_relationships(WORKBOOK_RELS_PART)?;
        let (sheets, active_tab) = Self::parse_workbook(&package.read_xml(WORKBOOK_PART)?)?;

        Ok(Self {
            package,
            shared_strings,
            styles,
            sheets,
            active_tab,
            relationships,
        })
    }

    /// Read sheet entries and the active tab index from workbook.xml.
    fn parse_workbook(xml: &str) -> Result<(Vec<SheetInfo>, usize)> {
        let mut sheets = Vec::new();
        let mut active_tab = 0;

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e)) => {
                    match e.local_name().as_ref() {
                        b"sheet" => {
                            let mut name = String::new();
                            let mut rel_id = String::new();
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"name" => {
                                        name = attr
                                            .unescape_value()
                                            .map(|v| v.into_owned())
                                            .unwrap_or_default()
                                    }
                                    b"r:id" => {
                                        rel_id = String::from_utf8_lossy(&attr.value).into_owned()
                                    }
                                    _ => {}
                                }
                            }
                            if !name.is_empty() {
                                sheets.push(SheetInfo { name, rel_id });
                            }
                        }
                        b"workbookView" => {
                            if let Some(tab) = e
                                .attributes()
                                .flatten()
                                .find(|attr| attr.key.as_ref() == b"activeTab")
                                .and_then(|attr| {
                                    String::from_utf8_lossy(&attr.value).parse::<usize>().ok()
                                })
                            {
                                active_tab = tab;
                            }
                        }
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, active_tab))
    }

    /// Number of worksheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheet names in tab order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Index of the sheet the workbook opens on.
    ///
    /// Out-of-range `activeTab` values fall back to the first sheet.
    pub fn active_sheet_index(&self) -> usize {
        if self.active_tab < self.sheets.len() {
            self.active_tab
        } else {
            0
        }
    }

    /// Load the active worksheet.
    pub fn active_sheet(&self) -> Result<Worksheet> {
        self.sheet(self.active_sheet_index())
    }

    /// Load the worksheet at `index` (tab order).
    pub fn sheet(&self, index: usize) -> Result<Worksheet> {
        let info = self
            .sheets
            .get(index)
            .ok_or_else(|| Error::MissingComponent(format!("worksheet #{}", index + 1)))?;
        let target = self
            .relationships
            .get(&info.rel_id)
            .ok_or_else(|| Error::MissingComponent(format!("relationship {}", info.rel_id)))?;
        let part = Package::resolve_path(WORKBOOK_PART, target);

        tracing::debug!(sheet = %info.name, part = %part, "reading worksheet");
        let rows = self.parse_rows(&self.package.read_xml(&part)?)?;

        Ok(Worksheet {
            name: info.name.clone(),
            rows,
        })
    }

    /// Parse `<sheetData>` into rows, placing cells by their `r` reference.
    fn parse_rows(&self, xml: &str) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut current_row: Option<(usize, Row)> = None;
        let mut next_col = 0usize;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_phonetic = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        current_row = Some((row_index(e, rows.len())?, Vec::new()));
                        next_col = 0;
                    }
                    b"c" if current_row.is_some() => {
                        let pending = PendingCell::from_element(e, next_col)?;
                        next_col = pending.col + 1;
                        cell = Some(pending);
                    }
                    b"rPh" => in_phonetic = true,
                    b"v" | b"t" if cell.is_some() && !in_phonetic => in_value = true,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        let index = row_index(e, rows.len())?;
                        place_row(&mut rows, index, Vec::new());
                    }
                    b"c" if current_row.is_some() => {
                        next_col = PendingCell::from_element(e, next_col)?.col + 1;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Text(ref e)) if in_value => {
                    if let Some(pending) = cell.as_mut() {
                        pending.raw.push_str(&e.unescape().unwrap_or_default());
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        if let Some((index, row)) = current_row.take() {
                            place_row(&mut rows, index, row);
                        }
                    }
                    b"c" => {
                        if let (Some(pending), Some((_, row))) = (cell.take(), current_row.as_mut())
                        {
                            let col = pending.col;
                            if let Some(value) = self.resolve_cell_value(pending) {
                                if row.len() <= col {
                                    row.resize(col + 1, None);
                                }
                                row[col] = Some(value);
                            }
                        }
                    }
                    b"rPh" => in_phonetic = false,
                    b"v" | b"t" => in_value = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rows)
    }

    /// Resolve a cell's raw text according to its type and style.
    fn resolve_cell_value(&self, cell: PendingCell) -> Option<CellValue> {
        if cell.raw.is_empty() {
            return None;
        }

        let value = match cell.cell_type.as_deref() {
            Some("s") => {
                let text = cell
                    .raw
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.shared_strings.get(idx))
                    .unwrap_or_default();
                CellValue::Text(text.to_string())
            }
            Some("b") => CellValue::Bool(cell.raw.trim() == "1"),
            Some("e") => CellValue::Error(cell.raw),
            Some("d") => CellValue::Date(cell.raw),
            Some("str") | Some("inlineStr") => CellValue::Text(cell.raw),
            _ => {
                let date = cell
                    .style
                    .filter(|&style| self.styles.is_date_style(style))
                    .and_then(|_| cell.raw.trim().parse::<f64>().ok())
                    .and_then(Styles::serial_to_datetime);
                match date {
                    Some(date) => CellValue::Date(date),
                    None => CellValue::Number(cell.raw),
                }
            }
        };

        Some(value)
    }

    /// Get a reference to the underlying package.
    pub fn package(&self) -> &Package {
        &self.package
    }
}

/// A `<c>` element being read.
#[derive(Debug)]
struct PendingCell {
    col: usize,
    cell_type: Option<String>,
    style: Option<usize>,
    raw: String,
}

impl PendingCell {
    fn from_element(e: &quick_xml::events::BytesStart<'_>, next_col: usize) -> Result<Self> {
        let mut cell = Self {
            col: next_col,
            cell_type: None,
            style: None,
            raw: String::new(),
        };
        for attr in e.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value);
            match attr.key.as_ref() {
                b"r" => {
                    let (_, col) = parse_cell_ref(&value)
                        .ok_or_else(|| Error::InvalidCellReference(value.to_string()))?;
                    cell.col = col;
                }
                b"t" => cell.cell_type = Some(value.into_owned()),
                b"s" => cell.style = value.parse().ok(),
                _ => {}
            }
        }
        if cell.col >= MAX_COLUMNS {
            return Err(Error::InvalidCellReference(format!(
                "column {} past XFD",
                cell.col + 1
            )));
        }
        Ok(cell)
    }
}

/// Zero-based row index from a `<row r="N">` element, or the next row.
fn row_index(e: &quick_xml::events::BytesStart<'_>, next_row: usize) -> Result<usize> {
    let index = match e.attributes().flatten().find(|attr| attr.key.as_ref() == b"r") {
        Some(attr) => {
            let value = String::from_utf8_lossy(&attr.value);
            value
                .parse::<usize>()
                .ok()
                .and_then(|r| r.checked_sub(1))
                .ok_or_else(|| Error::InvalidCellReference(format!("row {}", value)))?
        }
        None => next_row,
    };
    if index >= MAX_ROWS {
        return Err(Error::InvalidCellReference(format!("row {}", index + 1)));
    }
    Ok(index)
}

fn place_row(rows: &mut Vec<Row>, index: usize, row: Row) {
    if rows.len() <= index {
        rows.resize(index + 1, Vec::new());
    }
    rows[index] = row;
}

/// Split an A1-style reference into zero-based (row, column).
///
/// References past `XFD1048576` are rejected.
pub fn parse_cell_ref(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let col = letters
        .chars()
        .try_fold(0usize, |acc, c| {
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })?
        .checked_sub(1)?;
    let row = digits.parse::<usize>().ok()?.checked_sub(1)?;

    (row < MAX_ROWS && col < MAX_COLUMNS).then_some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_with(shared: &[&str]) -> XlsxReader {
        use std::io::{Cursor, Write};
        use zip::write::SimpleFileOptions;

        let sst: String = shared.iter().map(|s| format!("<si><t>{}</t></si>", s)).collect();
        let parts = [
            (
                WORKBOOK_PART,
                r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><bookViews><workbookView activeTab="1"/></bookViews><sheets><sheet name="Cover" sheetId="1" r:id="rId1"/><sheet name="Orgs" sheetId="2" r:id="rId2"/></sheets></workbook>"#.to_string(),
            ),
            (
                WORKBOOK_RELS_PART,
                r#"<Relationships><Relationship Id="rId1" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Target="/xl/worksheets/sheet2.xml"/></Relationships>"#.to_string(),
            ),
            ("xl/sharedStrings.xml", format!("<sst>{}</sst>", sst)),
            (
                "xl/styles.xml",
                r#"<styleSheet><cellXfs><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#.to_string(),
            ),
            ("xl/worksheets/sheet1.xml", "<worksheet><sheetData/></worksheet>".to_string()),
            (
                "xl/worksheets/sheet2.xml",
                r#"<worksheet><sheetData><row r="2"><c r="B2" t="s"><v>0</v></c></row></sheetData></worksheet>"#.to_string(),
            ),
        ];

        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            for (name, body) in &parts {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        XlsxReader::from_bytes(buffer).unwrap()
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("C5"), Some((4, 2)));
        assert_eq!(parse_cell_ref("AA10"), Some((9, 26)));
        assert_eq!(parse_cell_ref("$B$3"), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("B"), None);
    }

    #[test]
    fn test_cell_ref_grid_limits() {
        assert_eq!(parse_cell_ref("XFD1048576"), Some((1_048_575, 16_383)));
        assert_eq!(parse_cell_ref("XFE1"), None);
        assert_eq!(parse_cell_ref("A1048577"), None);
        assert_eq!(parse_cell_ref("ZZZZZZZ1"), None);
    }

    #[test]
    fn test_out_of_grid_references_rejected() {
        let reader = reader_with(&[]);
        for xml in [
            r#"<worksheet><sheetData><row r="1"><c r="ZZZZZZZ1"><v>1</v></c></row></sheetData></worksheet>"#,
            r#"<worksheet><sheetData><row r="1"><c r="A1048577"/></row></sheetData></worksheet>"#,
            r#"<worksheet><sheetData><row r="4000000000"><c><v>1</v></c></row></sheetData></worksheet>"#,
            r#"<worksheet><sheetData><row r="9999999"/></sheetData></worksheet>"#,
        ] {
            assert!(
                matches!(reader.parse_rows(xml), Err(Error::InvalidCellReference(_))),
                "{xml}"
            );
        }

        let edge = r#"<worksheet><sheetData><row r="1"><c r="XFD1"><v>7</v></c></row></sheetData></worksheet>"#;
        let rows = reader.parse_rows(edge).unwrap();
        assert_eq!(rows[0].len(), MAX_COLUMNS);
        assert_eq!(rows[0][MAX_COLUMNS - 1], Some(CellValue::Number("7".into())));
    }

    #[test]
    fn test_active_sheet_selection() {
        let reader = reader_with(&["Name"]);
        assert_eq!(reader.sheet_names(), vec!["Cover", "Orgs"]);
        assert_eq!(reader.active_sheet_index(), 1);

        let sheet = reader.active_sheet().unwrap();
        assert_eq!(sheet.name, "Orgs");
        assert_eq!(sheet.rows.len(), 2);
        assert!(sheet.rows[0].is_empty());
        assert_eq!(sheet.rows[1], vec![None, Some(CellValue::from("Name"))]);
    }

    #[test]
    fn test_sparse_cells_keep_columns() {
        let reader = reader_with(&["Acme", "Launch"]);
        let xml = r#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="s"><v>0</v></c><c r="D1" t="s"><v>1</v></c></row>
            <row r="3"><c r="C3"/><c t="inlineStr"><is><t>inline</t></is></c></row>
        </sheetData></worksheet>"#;

        let rows = reader.parse_rows(xml).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            vec![
                Some(CellValue::from("Acme")),
                None,
                None,
                Some(CellValue::from("Launch")),
            ]
        );
        assert!(rows[1].is_empty());
        // The inline cell has no reference and follows the empty C3.
        assert_eq!(rows[2], vec![None, None, None, Some(CellValue::from("inline"))]);
    }

    #[test]
    fn test_cell_value_types() {
        let reader = reader_with(&[]);
        let xml = r#"<worksheet><sheetData><row r="1">
            <c r="A1"><v>42</v></c>
            <c r="B1" s="1"><v>45292</v></c>
            <c r="C1" t="b"><v>1</v></c>
            <c r="D1" t="e"><v>#N/A</v></c>
            <c r="E1" t="str"><f>A1&amp;"x"</f><v>42x</v></c>
            <c r="F1" t="s"><v>99</v></c>
            <c r="G1" s="1"><v>0.5</v></c>
            <c r="H1" t="b"><v>0</v></c>
        </row></sheetData></worksheet>"#;

        let rows = reader.parse_rows(xml).unwrap();
        assert_eq!(
            rows[0],
            vec![
                Some(CellValue::Number("42".into())),
                Some(CellValue::Date("2024-01-01 00:00:00".into())),
                Some(CellValue::Bool(true)),
                Some(CellValue::Error("#N/A".into())),
                Some(CellValue::Text("42x".into())),
                Some(CellValue::Text(String::new())),
                Some(CellValue::Date("12:00:00".into())),
                Some(CellValue::Bool(false)),
            ]
        );

        let text: Vec<String> = rows[0]
            .iter()
            .map(|cell| crate::model::normalize_cell(cell.as_ref()))
            .collect();
        assert_eq!(text[1], "2024-01-01 00:00:00");
        assert_eq!(text[2], "True");
        assert_eq!(text[6], "12:00:00");
        assert_eq!(text[7], "False");
    }

    #[test]
    fn test_missing_sheet() {
        let reader = reader_with(&[]);
        assert!(matches!(
            reader.sheet(5),
            Err(Error::MissingComponent(_))
        ));
    }
}
