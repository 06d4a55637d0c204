//! Column reconciliation across fuel-type schemas
//!
//! When the user changes the fuel-type filter while a source column is
//! selected, the previous selection may not exist in the new table: the
//! totals schema carries aggregate columns (bunkering, cement, flaring,
//! per-capita) the phase tables don't have. The resolver maps any column
//! of any table to the best-matching column of the target table, so the UI
//! can never land on an invalid selection.
//!
//! The mapping is expressed by name, not by column position. The shared
//! sector block keeps identical canonical names in every schema, so the
//! only non-identity case is a totals-only aggregate resolving into a
//! phase table, which falls back to the phase tables' primary aggregate.

use crate::dataset::schema::{FuelType, ENERGY_SUPPLY, TOTALS_COLUMNS, TOTALS_ONLY_COLUMNS};

/// Fallback for totals-only aggregates resolving into a phase schema:
/// the phase tables' primary aggregate column.
pub const PHASE_FALLBACK: &str = ENERGY_SUPPLY;

/// Best-matching column of `column` in the `target` fuel type's schema.
///
/// Total function: the result is always a column present in the target
/// schema. A column unknown to every schema resolves to the fallback
/// rather than erroring - schema mismatch is a designed invariant here,
/// never a surfaced failure.
pub fn resolve_best_match(column: &str, target: FuelType) -> &'static str {
    // Verbatim hit: the shared sector block, or totals-to-totals.
    if let Some(hit) = target.columns().iter().find(|c| **c == column) {
        return *hit;
    }

    // Totals-only aggregates resolving into a phase table, plus names
    // unknown to every schema, fall back to the primary aggregate. The
    // fallback column exists in all four schemas.
    PHASE_FALLBACK
}

/// Resolution target for a navigation view. The type-ternary view always
/// resolves against the solids schema, whatever fuel type is selected: it
/// merges all three phase tables at once and needs one column name valid
/// in each. The phase schemas are structurally identical, so solids
/// stands in for all three. Intentional asymmetry, kept as-is.
pub fn resolve_for_view(column: &str, fuel: FuelType, type_ternary: bool) -> &'static str {
    if type_ternary {
        resolve_best_match(column, FuelType::Solids)
    } else {
        resolve_best_match(column, fuel)
    }
}

/// Whether `column` is a totals-only aggregate with no phase counterpart.
pub fn is_totals_only(column: &str) -> bool {
    TOTALS_ONLY_COLUMNS.contains(&column)
}

/// All column names known to any schema. Handy for exhaustive tests and
/// option listings.
pub fn all_known_columns() -> &'static [&'static str] {
    TOTALS_COLUMNS
}
