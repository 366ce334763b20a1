//! RFC 4180 CSV rendering
//!
//! Fields containing a comma, double quote, CR or LF are quoted, with inner
//! quotes doubled. Records end in CRLF.

use std::borrow::Cow;

use super::ExportRecord;

pub const HEADER: [&str; 7] = ["id", "text", "result", "from", "to", "service", "date"];

/// Render records with a header row
pub fn to_csv(records: &[ExportRecord<'_>]) -> String {
    let mut out = String::new();
    write_row(&mut out, &HEADER);
    for record in records {
        write_row(&mut out, &record.fields());
    }
    out
}

fn write_row(out: &mut String, fields: &[&str]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
