//! Canonical column schema for the CDIAC sectoral tables
//!
//! The spreadsheet ships four sheets: one `TOTAL` sheet and one sheet per
//! fuel phase (solid / liquid / gas). The three phase sheets share one
//! schema; the totals sheet carries the same sector block plus extra
//! aggregate columns (bunkering, cement manufacture, gas flaring, a
//! per-capita figure) that only make sense summed across phases.
//!
//! Raw sheet headers vary across terminology eras of the dataset ("Nation"
//! in older releases, "Political Geography" in newer ones), so value columns
//! are assigned canonical names positionally, the key column by header
//! match. Everything downstream - the resolver, the filter state machine,
//! the shaping transforms - speaks only these canonical names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical name of the row-key column.
pub const GEOGRAPHY: &str = "Political Geography";
/// Canonical name of the year column.
pub const YEAR: &str = "Year";

// Shared sector block (present in every table).
pub const ENERGY_SUPPLY: &str = "Energy Supply Total";
pub const ENERGY_CONSUMPTION: &str = "Energy Consumption Total";
pub const STAT_DIFFERENCE: &str = "Statistical Difference (Sup-Con)";
pub const ELECTRIC_CHP_HEAT: &str = "Electric, CHP, Heat Plants";
pub const ENERGY_INDUSTRIES_OWN_USE: &str = "Energy Industries' Own Use";
pub const MANUFACTURING: &str = "Manufact, Constr, Non-Fuel Industry";
pub const TRANSPORT: &str = "Transport";
pub const HOUSEHOLD: &str = "Household";
pub const AGRICULTURE: &str = "Agriculture, Forestry, Fishing";
pub const COMMERCE: &str = "Commerce and Public Services";
pub const NES_OTHER: &str = "NES Other Consumption";
pub const NON_ENERGY_USE: &str = "Non-Energy Use";

// Aggregates only present in the totals table.
pub const FOSSIL_AND_CEMENT: &str = "Fossil Fuel and Cement Production";
pub const BUNKERED: &str = "Bunkered";
pub const BUNKERED_MARINE: &str = "Bunkered (Marine)";
pub const BUNKERED_AVIATION: &str = "Bunkered (Aviation)";
pub const FLARING: &str = "Flaring of Natural Gas";
pub const CEMENT: &str = "Manufacture of Cement";
pub const PER_CAPITA: &str = "Per Capita Total Emissions";

/// Value columns of the three phase sheets, in sheet order.
pub const PHASE_COLUMNS: &[&str] = &[
    ENERGY_SUPPLY,
    ENERGY_CONSUMPTION,
    STAT_DIFFERENCE,
    ELECTRIC_CHP_HEAT,
    ENERGY_INDUSTRIES_OWN_USE,
    MANUFACTURING,
    TRANSPORT,
    HOUSEHOLD,
    AGRICULTURE,
    COMMERCE,
    NES_OTHER,
    NON_ENERGY_USE,
];

/// Value columns of the totals sheet, in sheet order. Strict superset of
/// [`PHASE_COLUMNS`]: the shared sector block keeps its canonical names so
/// cross-table resolution is a name lookup, never index arithmetic.
pub const TOTALS_COLUMNS: &[&str] = &[
    FOSSIL_AND_CEMENT,
    ENERGY_SUPPLY,
    ENERGY_CONSUMPTION,
    STAT_DIFFERENCE,
    ELECTRIC_CHP_HEAT,
    ENERGY_INDUSTRIES_OWN_USE,
    MANUFACTURING,
    TRANSPORT,
    HOUSEHOLD,
    AGRICULTURE,
    COMMERCE,
    NES_OTHER,
    NON_ENERGY_USE,
    BUNKERED,
    BUNKERED_MARINE,
    BUNKERED_AVIATION,
    FLARING,
    CEMENT,
    PER_CAPITA,
];

/// Columns present in the totals table with no phase counterpart.
pub const TOTALS_ONLY_COLUMNS: &[&str] = &[
    FOSSIL_AND_CEMENT,
    BUNKERED,
    BUNKERED_MARINE,
    BUNKERED_AVIATION,
    FLARING,
    CEMENT,
    PER_CAPITA,
];

/// Sub-sector columns that form the stacked layers of the area/line views.
/// A fixed allow-list, not "every column": the supply/consumption totals
/// and the statistical difference are overlays, never stacked layers.
pub const STACKED_SECTORS: &[&str] = &[
    ELECTRIC_CHP_HEAT,
    ENERGY_INDUSTRIES_OWN_USE,
    MANUFACTURING,
    TRANSPORT,
    HOUSEHOLD,
    AGRICULTURE,
    COMMERCE,
    NES_OTHER,
    NON_ENERGY_USE,
];

/// Extra stacked layers only the totals view carries.
pub const STACKED_SECTORS_TOTALS_EXTRA: &[&str] =
    &[BUNKERED_MARINE, BUNKERED_AVIATION, FLARING, CEMENT];

/// Reference series overlaid (non-stacked) for visual reconciliation
/// against the stacked sum. The stacked sum and the overlay totals may
/// legitimately diverge by the statistical-difference term.
pub const OVERLAY_TOTALS: &[&str] = &[ENERGY_SUPPLY, ENERGY_CONSUMPTION, STAT_DIFFERENCE];

/// Which of the four emissions tables is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Totals,
    Solids,
    Liquids,
    Gases,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Totals,
        FuelType::Solids,
        FuelType::Liquids,
        FuelType::Gases,
    ];

    /// Sheet name in the source workbook.
    pub fn sheet_name(self) -> &'static str {
        match self {
            FuelType::Totals => "TOTAL",
            FuelType::Solids => "SOLID FUELS",
            FuelType::Liquids => "LIQUID FUELS",
            FuelType::Gases => "GAS FUELS",
        }
    }

    /// Canonical value columns of this fuel type's table, in order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            FuelType::Totals => TOTALS_COLUMNS,
            _ => PHASE_COLUMNS,
        }
    }

    /// Human label used in figure titles.
    pub fn label(self) -> &'static str {
        match self {
            FuelType::Totals => "Fossil Fuel",
            FuelType::Solids => "Solid Fuel",
            FuelType::Liquids => "Liquid Fuel",
            FuelType::Gases => "Gas Fuel",
        }
    }

    pub fn contains_column(self, column: &str) -> bool {
        self.columns().iter().any(|c| *c == column)
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FuelType::Totals => "totals",
            FuelType::Solids => "solids",
            FuelType::Liquids => "liquids",
            FuelType::Gases => "gases",
        };
        f.write_str(s)
    }
}

/// Normalize a raw key-column header to the canonical key name.
///
/// Older releases of the dataset label the key column "Nation"; newer ones
/// "Political Geography". Returns `None` for anything else so the loader
/// can fail fast on an unrecognized sheet layout.
pub fn normalize_key_header(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("nation") || trimmed.eq_ignore_ascii_case("political geography")
    {
        Some(GEOGRAPHY)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // SCHEMA INVARIANT TESTS
    // ==========================================================================
    //
    // The resolver and the filter state machine both assume the totals
    // column set is a strict superset of the phase column set. Break that
    // and cross-fuel default coercion silently dangles.
    // ==========================================================================

    #[test]
    fn totals_is_strict_superset_of_phase_schema() {
        for col in PHASE_COLUMNS {
            assert!(
                TOTALS_COLUMNS.contains(col),
                "phase column {:?} missing from totals schema",
                col
            );
        }
        assert!(TOTALS_COLUMNS.len() > PHASE_COLUMNS.len());
    }

    #[test]
    fn totals_only_columns_are_exactly_the_difference() {
        for col in TOTALS_ONLY_COLUMNS {
            assert!(TOTALS_COLUMNS.contains(col));
            assert!(!PHASE_COLUMNS.contains(col));
        }
        assert_eq!(
            TOTALS_ONLY_COLUMNS.len(),
            TOTALS_COLUMNS.len() - PHASE_COLUMNS.len()
        );
    }

    #[test]
    fn no_duplicate_column_names() {
        let mut seen = std::collections::HashSet::new();
        for col in TOTALS_COLUMNS {
            assert!(seen.insert(col), "duplicate column {:?}", col);
        }
    }

    #[test]
    fn stacked_allow_list_is_subset_of_every_phase_schema() {
        for col in STACKED_SECTORS {
            assert!(PHASE_COLUMNS.contains(col));
        }
        for col in STACKED_SECTORS_TOTALS_EXTRA {
            assert!(TOTALS_COLUMNS.contains(col));
            assert!(!PHASE_COLUMNS.contains(col));
        }
    }

    #[test]
    fn key_header_normalizes_across_terminology_eras() {
        assert_eq!(normalize_key_header("Nation"), Some(GEOGRAPHY));
        assert_eq!(normalize_key_header("Political Geography"), Some(GEOGRAPHY));
        assert_eq!(normalize_key_header("  NATION "), Some(GEOGRAPHY));
        assert_eq!(normalize_key_header("Country"), None);
    }

    #[test]
    fn sheet_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            FuelType::ALL.iter().map(|f| f.sheet_name()).collect();
        assert_eq!(names.len(), 4);
    }
}
