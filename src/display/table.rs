//! Plain text tables for terminal output

use chrono::{DateTime, Utc};
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Modify, Padding, Remove, Style};
use tabled::{Table, Tabled};

use super::pvc::PvcRow;
use crate::related::RelatedResource;

/// Table rendering switches
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    pub no_headers: bool,
    pub show_depth: bool,
}

/// Age since an RFC 3339 timestamp, as `45s`, `12m`, `3h` or `7d`
///
/// Timestamps that do not parse show as `-`; future ones as `0s`.
pub fn format_age(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(created) = timestamp.and_then(|t| DateTime::parse_from_rfc3339(t).ok()) else {
        return "-".to_string();
    };
    let duration = now.signed_duration_since(created.with_timezone(&Utc));

    if duration.num_seconds() < 60 {
        format!("{}s", duration.num_seconds().max(0))
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else {
        format!("{}d", duration.num_days())
    }
}

/// One line of the related-resources table
#[derive(Debug, Clone, Tabled)]
struct RelatedRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "AGE")]
    age: String,
    #[tabled(rename = "DEPTH")]
    depth: usize,
}

impl RelatedRow {
    fn new(entry: &RelatedResource, now: DateTime<Utc>) -> Self {
        let resource = &entry.resource;
        Self {
            name: resource.name().unwrap_or("-").to_string(),
            kind: resource.kind().unwrap_or("-").to_string(),
            status: resource.phase().unwrap_or("Created").to_string(),
            age: format_age(resource.creation_timestamp(), now),
            depth: entry.depth,
        }
    }
}

/// Borderless kubectl-style table, columns three spaces apart
fn kubectl_table<T: Tabled>(rows: Vec<T>, no_headers: bool) -> Table {
    let mut table = Table::new(rows);
    if no_headers {
        table.with(Remove::row(Rows::first()));
    }
    table
}

fn table_text(mut table: Table) -> String {
    table
        .with(Style::blank())
        .with(Modify::new(Columns::first()).with(Padding::new(0, 1, 0, 0)));

    table
        .to_string()
        .lines()
        .map(|line| format!("{}\n", line.trim_end()))
        .collect()
}

/// NAME, KIND, STATUS, AGE and optionally DEPTH for each related resource
pub fn render_related_table(
    entries: &[RelatedResource],
    now: DateTime<Utc>,
    options: &TableOptions,
) -> String {
    if entries.is_empty() && options.no_headers {
        return String::new();
    }
    let rows = entries.iter().map(|entry| RelatedRow::new(entry, now));
    let mut table = kubectl_table(rows.collect(), options.no_headers);
    if !options.show_depth {
        table.with(Remove::column(Columns::last()));
    }
    table_text(table)
}

/// Claims list
pub fn render_pvc_table(rows: &[PvcRow], options: &TableOptions) -> String {
    if rows.is_empty() && options.no_headers {
        return String::new();
    }
    table_text(kubectl_table(rows.to_vec(), options.no_headers))
}
