use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::models::ticket::{format_number, TicketRecord, TicketValue};
use crate::domain::services::format::{format_duration, format_instant};
use crate::error::AppError;

/// The two date-bearing columns the upstream is known to emit as epoch
/// values. Each gets a numeric `_ts` and a readable `_readable` sibling.
const DATE_COLUMNS: [&str; 2] = ["created_date", "ticket_closure_date"];

/// A normalized tabular view of the heterogeneous ticket payload.
/// One row per input ticket; missing cells are empty strings.
pub struct TicketTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn tabulate(tickets: &[TicketRecord], now: DateTime<Utc>) -> TicketTable {
    // Column keys arrive in whatever casing the upstream feels like.
    let normalized: Vec<TicketRecord> = tickets
        .iter()
        .map(|ticket| {
            ticket
                .iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v.clone()))
                .collect()
        })
        .collect();

    let mut present: HashSet<String> = HashSet::new();
    for row in &normalized {
        present.extend(row.keys().cloned());
    }
    let has_age = present.contains("age");

    // Base columns in first-seen order; the raw `age` field is replaced by
    // the derived column below.
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for row in &normalized {
        for key in row.keys() {
            if key == "age" {
                continue;
            }
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }

    for col in DATE_COLUMNS {
        if present.contains(col) {
            columns.push(format!("{}_ts", col));
            columns.push(format!("{}_readable", col));
        }
    }

    if !has_age && !present.contains("created_date") {
        warn!("Tickets carry neither an age nor a created_date field; ticket_age left empty");
    }
    columns.push("ticket_age".to_string());

    let rows = normalized
        .iter()
        .map(|row| build_row(row, &columns, has_age, now))
        .collect();

    TicketTable { columns, rows }
}

fn build_row(
    row: &TicketRecord,
    columns: &[String],
    has_age: bool,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut cells: HashMap<String, String> = HashMap::new();

    for (key, value) in row {
        if key == "age" {
            continue;
        }
        cells.insert(key.clone(), value.to_cell());
    }

    for col in DATE_COLUMNS {
        let cleaned = row.get(col).filter(|v| !v.is_missing());
        let ts = cleaned.and_then(|v| v.as_number());

        if row.contains_key(col) {
            // The raw column keeps its place, sentinel values blanked.
            cells.insert(col.to_string(), cleaned.map(|v| v.to_cell()).unwrap_or_default());
        }
        cells.insert(
            format!("{}_ts", col),
            ts.map(format_number).unwrap_or_default(),
        );
        cells.insert(
            format!("{}_readable", col),
            ts.map(|n| format_instant(n as i64)).unwrap_or_default(),
        );
    }

    let age = if has_age {
        row.get("age")
            .filter(|v| !v.is_missing())
            .and_then(|v| v.as_number())
            .map(|secs| format_duration(secs as i64))
            .unwrap_or_default()
    } else {
        derived_age(row, now)
    };
    cells.insert("ticket_age".to_string(), age);

    columns
        .iter()
        .map(|col| cells.get(col).cloned().unwrap_or_default())
        .collect()
}

/// Fallback age from the creation timestamp when the upstream omits the
/// raw seconds field. Uses the same magnitude-based second/millisecond
/// disambiguation as the timestamp formatter.
fn derived_age(row: &TicketRecord, now: DateTime<Utc>) -> String {
    let Some(ts) = row
        .get("created_date")
        .filter(|v| !v.is_missing())
        .and_then(TicketValue::as_number)
    else {
        return String::new();
    };

    let created_secs = if ts > 10_000_000_000.0 { ts / 1000.0 } else { ts };
    format_duration(now.timestamp() - created_secs as i64)
}

pub fn write_csv(table: &TicketTable, path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to create report file: {}", e)))?;

    writer
        .write_record(&table.columns)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to write report header: {}", e)))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to write report row: {}", e)))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to flush report file: {}", e)))?;

    Ok(())
}
