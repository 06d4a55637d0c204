//! Table export
//!
//! Flat-file output of one table view, for the download page and the
//! `export` subcommand. The format is picked from the file extension:
//! `.json` gets the machine-readable form, anything else gets CSV.
//!
//! ```ignore
//! use cdiac_dash::export;
//!
//! let view = export::table_view(dataset.table(FuelType::Totals), None);
//! export::write("emissions.csv", &view)?;
//! export::write("emissions.json", &view)?;
//! ```

use crate::dataset::schema::{FuelType, GEOGRAPHY, YEAR};
use crate::dataset::table::EmissionsTable;
use chrono::Local;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// One exportable row, values in column order. Absent observations stay
/// absent: empty CSV cells, JSON nulls.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub geography: String,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

/// A flattened view of one emissions table, optionally filtered to one
/// geography. Also the payload of the table-browser API.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub fuel: FuelType,
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

/// Flatten `table` for export, keeping only `geography`'s rows when one
/// is given.
pub fn table_view(table: &EmissionsTable, geography: Option<&str>) -> TableView {
    let rows = table
        .rows()
        .iter()
        .filter(|r| geography.map_or(true, |g| r.geography == g))
        .map(|r| TableRow {
            geography: r.geography.clone(),
            year: r.year,
            values: r.values.clone(),
        })
        .collect();
    TableView {
        fuel: table.fuel(),
        columns: table.columns().to_vec(),
        rows,
    }
}

/// Write `view` to `path` in the format its extension picks.
pub fn write<P: AsRef<Path>>(path: P, view: &TableView) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;
    match ext.as_str() {
        "json" => write_json(&mut file, view),
        _ => write_csv(&mut file, view),
    }
}

/// Default export filename, timestamped so repeated exports never
/// clobber each other.
pub fn default_filename(fuel: FuelType, ext: &str) -> String {
    format!(
        "cdiac-{}-{}.{}",
        fuel,
        Local::now().format("%Y%m%d-%H%M%S"),
        ext
    )
}

pub fn write_json<W: Write>(out: &mut W, view: &TableView) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, view)?;
    out.write_all(b"\n")
}

pub fn write_csv<W: Write>(out: &mut W, view: &TableView) -> io::Result<()> {
    let mut header = vec![GEOGRAPHY, YEAR];
    header.extend_from_slice(&view.columns);
    writeln!(
        out,
        "{}",
        header
            .iter()
            .map(|h| csv_field(h))
            .collect::<Vec<_>>()
            .join(",")
    )?;

    for row in &view.rows {
        let mut fields = vec![csv_field(&row.geography), row.year.to_string()];
        fields.extend(row.values.iter().map(|v| match v {
            Some(v) => v.to_string(),
            None => String::new(),
        }));
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

// Quote fields containing separators; the sector names carry commas.
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
