//! Number-format lookup for telling date cells from plain numbers.

use std::collections::HashMap;

/// Days from 1970-01-01 back to 1899-12-30, the Excel serial epoch.
const EXCEL_EPOCH_OFFSET: i64 = 25_569;

/// Serial of the phantom 1900-02-29.
const LEAP_BUG_SERIAL: i64 = 60;

const SECONDS_PER_DAY: i64 = 86_400;

/// Cell formats parsed from `xl/styles.xml`.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// `cellXfs` entries in order: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from `xl/styles.xml` content.
    ///
    /// Malformed XML stops the scan; whatever was read so far is kept.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            let (element, is_start) = match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(e)) => (e.into_owned(), true),
                Ok(quick_xml::events::Event::Empty(e)) => (e.into_owned(), false),
                Ok(quick_xml::events::Event::End(e)) => {
                    match e.local_name().as_ref() {
                        b"numFmts" => in_num_fmts = false,
                        b"cellXfs" => in_cell_xfs = false,
                        _ => {}
                    }
                    buf.clear();
                    continue;
                }
                Ok(quick_xml::events::Event::Eof) | Err(_) => break,
                _ => {
                    buf.clear();
                    continue;
                }
            };

            match element.local_name().as_ref() {
                b"numFmts" if is_start => in_num_fmts = true,
                b"cellXfs" if is_start => in_cell_xfs = true,
                b"numFmt" if in_num_fmts => {
                    let mut id = None;
                    let mut code = String::new();
                    for attr in element.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"numFmtId" => id = String::from_utf8_lossy(&attr.value).parse().ok(),
                            b"formatCode" => {
                                code = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_default()
                            }
                            _ => {}
                        }
                    }
                    if let Some(id) = id {
                        styles.num_fmts.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => {
                    let id = element
                        .attributes()
                        .flatten()
                        .find(|attr| attr.key.as_ref() == b"numFmtId")
                        .and_then(|attr| String::from_utf8_lossy(&attr.value).parse().ok())
                        .unwrap_or(0);
                    styles.cell_xfs.push(id);
                }
                _ => {}
            }
            buf.clear();
        }

        styles
    }

    /// Whether the cell style at `style_index` formats numbers as dates.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.cell_xfs
            .get(style_index)
            .is_some_and(|&id| self.is_date_format(id))
    }

    /// Whether a numFmtId is a date or time format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in ids: 14-22 dates, 45-47 times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }
        self.num_fmts
            .get(&num_fmt_id)
            .is_some_and(|code| is_date_format_code(code))
    }

    /// Render an Excel serial (1900 date system) the way a date cell prints.
    ///
    /// Serials of at least one day render as `YYYY-MM-DD HH:MM:SS`; a
    /// fraction of a day is a bare `HH:MM:SS`. Negative serials are not dates.
    pub fn serial_to_datetime(serial: f64) -> Option<String> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }

        let total_seconds = (serial * SECONDS_PER_DAY as f64).round() as i64;
        let serial_day = total_seconds / SECONDS_PER_DAY;
        let seconds = total_seconds % SECONDS_PER_DAY;
        let time = format!(
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        );

        if serial_day == 0 {
            return Some(time);
        }

        // Serials before the phantom 1900-02-29 count from 1899-12-31.
        let epoch_day = if serial_day < LEAP_BUG_SERIAL {
            serial_day - EXCEL_EPOCH_OFFSET + 1
        } else {
            serial_day - EXCEL_EPOCH_OFFSET
        };
        let (year, month, day) = civil_from_days(epoch_day);

        Some(format!("{:04}-{:02}-{:02} {}", year, month, day, time))
    }
}

/// Whether a custom format code contains date or time tokens.
///
/// Quoted literals, `[...]` sections and backslash escapes are ignored.
fn is_date_format_code(code: &str) -> bool {
    if code.eq_ignore_ascii_case("general") {
        return false;
    }

    let mut in_bracket = false;
    let mut in_quote = false;
    let mut escaped = false;

    for c in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if !in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            _ if in_bracket || in_quote => {}
            _ => {
                if matches!(c.to_ascii_lowercase(), 'd' | 'm' | 'y' | 'h' | 's') {
                    return true;
                }
            }
        }
    }

    false
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
