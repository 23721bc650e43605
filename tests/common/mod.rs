//! In-memory XLSX fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// The header used by the organization/event sheets in production.
pub const SPLIT_HEADER: &[&str] = &[
    "", "Name", "Description", "Tags", "Title", "Date", "Description", "Tags",
];

/// Builds a single-sheet workbook. Text goes through the shared string
/// table; empty strings leave the cell out entirely.
#[derive(Default)]
pub struct WorkbookBuilder {
    rows: Vec<Vec<String>>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Banner row followed by `header`.
    pub fn with_header(header: &[&str]) -> Self {
        Self::new()
            .row(&["Organizations & Events"])
            .row(header)
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows
            .push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut shared: Vec<&str> = Vec::new();
        let mut sheet_rows = String::new();

        for (r, row) in self.rows.iter().enumerate() {
            sheet_rows.push_str(&format!("<row r=\"{}\">", r + 1));
            for (c, text) in row.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let idx = shared.iter().position(|s| *s == text.as_str()).unwrap_or_else(|| {
                    shared.push(text);
                    shared.len() - 1
                });
                sheet_rows.push_str(&format!(
                    "<c r=\"{}{}\" t=\"s\"><v>{}</v></c>",
                    column_name(c),
                    r + 1,
                    idx
                ));
            }
            sheet_rows.push_str("</row>");
        }

        let sst: String = shared
            .iter()
            .map(|s| format!("<si><t xml:space=\"preserve\">{}</t></si>", escape(s)))
            .collect();

        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            let mut part = |name: &str, body: &str| {
                zip.start_file(name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            };

            part(
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#,
            );
            part(
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Organizations" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
            );
            part(
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
            );
            part(
                "xl/sharedStrings.xml",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
                    sst
                ),
            );
            part(
                "xl/worksheets/sheet1.xml",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    sheet_rows
                ),
            );

            zip.finish().unwrap();
        }
        buffer
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        name.push((b'A' + ((n - 1) % 26) as u8) as char);
        n = (n - 1) / 26;
    }
    name.iter().rev().collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
