//! In-memory emissions table
//!
//! One `EmissionsTable` per fuel type, built once at startup and read-only
//! afterwards. Rows are keyed by (political geography, year); cells are
//! `Option<f64>` because an absent observation is not zero - the shaping
//! transforms depend on that distinction to omit points rather than render
//! them at zero.

use crate::dataset::schema::FuelType;

/// One observation row: a geography/year pair plus the value columns in
/// schema order.
#[derive(Debug, Clone)]
pub struct Row {
    pub geography: String,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

/// Immutable wide table for one fuel type.
#[derive(Debug, Clone)]
pub struct EmissionsTable {
    fuel: FuelType,
    rows: Vec<Row>,
}

impl EmissionsTable {
    /// Build a table from already-canonicalized rows. Rows whose value
    /// count does not match the fuel type's schema are a caller bug.
    pub fn from_rows(fuel: FuelType, rows: Vec<Row>) -> Self {
        debug_assert!(rows
            .iter()
            .all(|r| r.values.len() == fuel.columns().len()));
        EmissionsTable { fuel, rows }
    }

    pub fn fuel(&self) -> FuelType {
        self.fuel
    }

    /// Canonical value columns, in order.
    pub fn columns(&self) -> &'static [&'static str] {
        self.fuel.columns()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns().iter().position(|c| *c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Value of `column` for one (geography, year) cell. `None` covers
    /// unknown keys, unknown columns, and absent observations alike.
    pub fn value(&self, geography: &str, year: i32, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .find(|r| r.year == year && r.geography == geography)
            .and_then(|r| r.values[idx])
    }

    /// Maximum observed value of `column` across every row and every year.
    /// `None` when the column is unknown or has no observations at all.
    pub fn column_max(&self, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .filter_map(|r| r.values[idx])
            .fold(None, |acc, v| {
                Some(match acc {
                    Some(m) if m >= v => m,
                    _ => v,
                })
            })
    }

    /// Distinct years, sorted ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Latest year with any data, if the table is non-empty.
    pub fn latest_year(&self) -> Option<i32> {
        self.rows.iter().map(|r| r.year).max()
    }

    /// Distinct geographies in first-appearance order (the sheet groups
    /// rows by geography, so this preserves the source ordering).
    pub fn geographies(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.geography.as_str()))
            .map(|r| r.geography.as_str())
            .collect()
    }

    /// Rows for one geography, in year order as stored.
    pub fn rows_for<'a>(&'a self, geography: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows.iter().filter(move |r| r.geography == geography)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::dataset::schema::{FuelType, PHASE_COLUMNS, TOTALS_COLUMNS};

    /// Build a row with every value column set to `fill`, then override
    /// named columns. Keeps fixture tables readable in transform tests.
    pub fn row(
        fuel: FuelType,
        geography: &str,
        year: i32,
        fill: Option<f64>,
        overrides: &[(&str, Option<f64>)],
    ) -> Row {
        let columns = fuel.columns();
        let mut values = vec![fill; columns.len()];
        for (col, v) in overrides {
            let idx = columns
                .iter()
                .position(|c| c == col)
                .unwrap_or_else(|| panic!("unknown column {:?}", col));
            values[idx] = *v;
        }
        Row {
            geography: geography.to_string(),
            year,
            values,
        }
    }

    pub fn phase_table(fuel: FuelType, rows: Vec<Row>) -> EmissionsTable {
        assert!(matches!(
            fuel.columns(),
            cols if cols == PHASE_COLUMNS || cols == TOTALS_COLUMNS
        ));
        EmissionsTable::from_rows(fuel, rows)
    }
}
