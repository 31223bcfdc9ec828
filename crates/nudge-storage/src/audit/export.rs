//! CSV rendering of audit events, for operators who want the flat file.

use nudge_core::models::AuditEvent;

use super::queries::format_timestamp;

pub const CSV_HEADER: &str = "timestamp,source,event_type,details";

/// Render events as CSV with a header row. Fields containing a comma,
/// quote, or line break are quoted with embedded quotes doubled.
pub fn render_csv(events: &[AuditEvent]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + events.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for event in events {
        let fields = [
            format_timestamp(&event.timestamp),
            escape(&event.source),
            escape(event.event_type.as_str()),
            escape(&event.details),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
