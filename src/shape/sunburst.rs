//! Sunburst shaping
//!
//! Two hierarchies, both (label, parent, value) node lists for a
//! `branchvalues="total"` chart, so every parent's value must cover the
//! sum of its children:
//!
//! - the sector sunburst breaks one geography's single-year emissions
//!   into the supply/consumption reconciliation tree, and
//! - the region sunburst breaks one source column into a
//!   world -> region -> country tree.
//!
//! Zero values become absent nodes rather than zero-area wedges, which
//! plotly renders as ambiguous overlapping slivers.

use crate::dataset::regions::{self, Region, RegionLookup};
use crate::dataset::schema::{self, FuelType};
use crate::dataset::table::EmissionsTable;
use serde::Serialize;

// Display labels for the reconciliation tree's synthetic nodes.
const ROOT: &str = "Total";
const CONSUMPTION: &str = "Consumption";
const STAT_DIFFERENCE: &str = "Statistical Difference";
const BUNKERED: &str = "Bunkered";
const MARINE: &str = "Marine";
const AVIATION: &str = "Aviation";
const FLARED: &str = "Flared Natural Gas";
const CEMENT: &str = "Cement";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstNode {
    pub label: String,
    pub parent: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sunburst {
    pub nodes: Vec<SunburstNode>,
}

impl Sunburst {
    fn push(&mut self, label: &str, parent: &str, value: f64) {
        // Zero wedges are omitted, not drawn empty.
        if value > 0.0 {
            self.nodes.push(SunburstNode {
                label: label.to_string(),
                parent: parent.to_string(),
                value,
            });
        }
    }

    #[cfg(test)]
    fn value_of(&self, label: &str) -> Option<f64> {
        self.nodes.iter().find(|n| n.label == label).map(|n| n.value)
    }
}

/// Supply/consumption reconciliation tree for one (geography, year) cell.
///
/// The statistical difference's sign picks the tree shape. Positive
/// difference (supplied more than consumed): the difference sits beside
/// consumption under the root. Non-positive difference (consumed more
/// than supplied): the consumption-side total is computed as
/// supply + |difference| rather than read from the consumption column,
/// and the difference wedge moves inside the electric-generation branch.
/// An explicit branch, not a numeric coincidence.
///
/// In both shapes the root's value is the sum of its direct children, so
/// the chart's branch totals always reconcile.
pub fn shape_sector_sunburst(
    table: &EmissionsTable,
    geography: &str,
    year: i32,
) -> Sunburst {
    let cell = |column: &str| table.value(geography, year, column).unwrap_or(0.0);

    let supply = cell(schema::ENERGY_SUPPLY);
    let consumed = cell(schema::ENERGY_CONSUMPTION);
    let difference = cell(schema::STAT_DIFFERENCE);

    let mut out = Sunburst { nodes: Vec::new() };

    let consumption_value = if difference > 0.0 {
        consumed
    } else {
        supply + difference.abs()
    };

    // Root value accumulates from its direct children as they're added.
    let mut root_value = consumption_value;

    out.push(CONSUMPTION, ROOT, consumption_value);

    // Sector wedges under Consumption.
    for column in schema::STACKED_SECTORS {
        out.push(column, CONSUMPTION, cell(column));
    }

    if difference > 0.0 {
        out.push(STAT_DIFFERENCE, ROOT, difference);
        root_value += difference;
    } else if difference < 0.0 {
        // Only drawable when the electric branch exists to hold it.
        if cell(schema::ELECTRIC_CHP_HEAT) > 0.0 {
            out.push(STAT_DIFFERENCE, schema::ELECTRIC_CHP_HEAT, -difference);
        }
    }

    if table.fuel() == FuelType::Totals {
        let bunkered = cell(schema::BUNKERED);
        out.push(BUNKERED, ROOT, bunkered);
        root_value += bunkered;
        out.push(MARINE, BUNKERED, cell(schema::BUNKERED_MARINE));
        out.push(AVIATION, BUNKERED, cell(schema::BUNKERED_AVIATION));

        let flared = cell(schema::FLARING);
        out.push(FLARED, ROOT, flared);
        root_value += flared;

        let cement = cell(schema::CEMENT);
        out.push(CEMENT, ROOT, cement);
        root_value += cement;
    }

    if root_value > 0.0 {
        out.nodes.insert(
            0,
            SunburstNode {
                label: ROOT.to_string(),
                parent: String::new(),
                value: root_value,
            },
        );
    } else {
        // No data for this cell at all: a well-formed empty hierarchy.
        out.nodes.clear();
    }

    out
}

/// World -> region -> country tree for one source column at one year.
///
/// Leaves are the country rows; aggregate rows never appear as leaves.
/// Region and world values are computed as child sums rather than read
/// from the aggregate rows, so the branches reconcile even where the
/// dataset's own aggregates include entities the lookup can't place.
pub fn shape_region_sunburst(
    table: &EmissionsTable,
    lookup: &RegionLookup,
    column: &str,
    year: i32,
) -> Sunburst {
    let mut out = Sunburst { nodes: Vec::new() };
    let Some(idx) = table.column_index(column) else {
        return out;
    };

    let mut region_totals: Vec<(Region, f64)> = Vec::new();
    let mut leaves: Vec<(String, Region, f64)> = Vec::new();

    for row in table.rows().iter().filter(|r| r.year == year) {
        if regions::is_aggregate(&row.geography) {
            continue;
        }
        let Some(value) = row.values[idx] else { continue };
        let region = lookup.region_of(&row.geography);
        if region == Region::None {
            continue; // unplaceable entity, no parent to hang it on
        }
        leaves.push((row.geography.clone(), region, value));
        match region_totals.iter_mut().find(|(r, _)| *r == region) {
            Some((_, total)) => *total += value,
            None => region_totals.push((region, value)),
        }
    }

    let world_total: f64 = region_totals.iter().map(|(_, t)| t).sum();
    out.push(regions::WORLD, "", world_total);
    for (region, total) in &region_totals {
        out.push(region.label(), regions::WORLD, *total);
    }
    for (geography, region, value) in &leaves {
        out.push(geography, region.label(), *value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::schema::{self, FuelType};
    use crate::dataset::table::fixtures::row;

    // ==========================================================================
    // SIGN-BRANCH RECONCILIATION TESTS
    // ==========================================================================
    //
    // Both tree shapes must keep the root equal to the sum of its direct
    // children, or branchvalues="total" draws overlapping wedges.
    // ==========================================================================

    fn phase_cell(supply: f64, consumed: f64, difference: f64) -> EmissionsTable {
        EmissionsTable::from_rows(
            FuelType::Solids,
            vec![row(
                FuelType::Solids,
                "FRANCE",
                2020,
                None,
                &[
                    (schema::ENERGY_SUPPLY, Some(supply)),
                    (schema::ENERGY_CONSUMPTION, Some(consumed)),
                    (schema::STAT_DIFFERENCE, Some(difference)),
                    (schema::ELECTRIC_CHP_HEAT, Some(40.0)),
                    (schema::TRANSPORT, Some(30.0)),
                    (schema::HOUSEHOLD, Some(0.0)),
                ],
            )],
        )
    }

    fn children_sum(s: &Sunburst, parent: &str) -> f64 {
        s.nodes
            .iter()
            .filter(|n| n.parent == parent)
            .map(|n| n.value)
            .sum()
    }

    #[test]
    fn positive_difference_sits_beside_consumption_under_the_root() {
        let s = shape_sector_sunburst(&phase_cell(100.0, 90.0, 10.0), "FRANCE", 2020);
        assert_eq!(s.value_of("Total"), Some(100.0));
        assert_eq!(s.value_of("Consumption"), Some(90.0));
        assert_eq!(s.value_of("Statistical Difference"), Some(10.0));
        let diff = s
            .nodes
            .iter()
            .find(|n| n.label == "Statistical Difference")
            .unwrap();
        assert_eq!(diff.parent, "Total");
    }

    #[test]
    fn negative_difference_reparents_into_the_electric_branch() {
        let s = shape_sector_sunburst(&phase_cell(85.0, 90.0, -5.0), "FRANCE", 2020);
        // Consumption-side total computed as supply + |difference|.
        assert_eq!(s.value_of("Consumption"), Some(90.0));
        let diff = s
            .nodes
            .iter()
            .find(|n| n.label == "Statistical Difference")
            .unwrap();
        assert_eq!(diff.parent, schema::ELECTRIC_CHP_HEAT);
        assert_eq!(diff.value, 5.0);
    }

    #[test]
    fn root_equals_child_sum_in_both_sign_branches() {
        for difference in [10.0, -5.0, 0.0] {
            let supply = 90.0 + difference;
            let s = shape_sector_sunburst(&phase_cell(supply, 90.0, difference), "FRANCE", 2020);
            let root = s.value_of("Total").unwrap();
            let sum = children_sum(&s, "Total");
            assert!(
                (root - sum).abs() < 1e-9,
                "difference {}: root {} vs child sum {}",
                difference,
                root,
                sum
            );
        }
    }

    #[test]
    fn zero_wedges_are_absent_not_zero_area() {
        let s = shape_sector_sunburst(&phase_cell(100.0, 90.0, 10.0), "FRANCE", 2020);
        // Household is observed as 0.0 and Commerce not at all; neither
        // may appear.
        assert!(s.value_of(schema::HOUSEHOLD).is_none());
        assert!(s.value_of(schema::COMMERCE).is_none());
        assert!(s.value_of(schema::TRANSPORT).is_some());
    }

    #[test]
    fn empty_cell_yields_well_formed_empty_hierarchy() {
        let table = EmissionsTable::from_rows(FuelType::Solids, vec![]);
        let s = shape_sector_sunburst(&table, "ATLANTIS", 2020);
        assert!(s.nodes.is_empty());
    }

    #[test]
    fn totals_tree_adds_the_aggregate_branches() {
        let table = EmissionsTable::from_rows(
            FuelType::Totals,
            vec![row(
                FuelType::Totals,
                "WORLD",
                2020,
                None,
                &[
                    (schema::ENERGY_SUPPLY, Some(100.0)),
                    (schema::ENERGY_CONSUMPTION, Some(90.0)),
                    (schema::STAT_DIFFERENCE, Some(10.0)),
                    (schema::BUNKERED, Some(20.0)),
                    (schema::BUNKERED_MARINE, Some(12.0)),
                    (schema::BUNKERED_AVIATION, Some(8.0)),
                    (schema::FLARING, Some(5.0)),
                    (schema::CEMENT, Some(15.0)),
                ],
            )],
        );
        let s = shape_sector_sunburst(&table, "WORLD", 2020);
        assert_eq!(s.value_of("Total"), Some(140.0));
        assert_eq!(children_sum(&s, "Total"), 140.0);
        assert_eq!(children_sum(&s, "Bunkered"), 20.0);
    }

    // ==========================================================================
    // GEOGRAPHY TREE TESTS
    // ==========================================================================

    fn geography_fixture() -> (EmissionsTable, RegionLookup) {
        let table = EmissionsTable::from_rows(
            FuelType::Liquids,
            vec![
                row(
                    FuelType::Liquids,
                    "FRANCE",
                    2020,
                    None,
                    &[(schema::TRANSPORT, Some(30.0))],
                ),
                row(
                    FuelType::Liquids,
                    "GERMANY",
                    2020,
                    None,
                    &[(schema::TRANSPORT, Some(50.0))],
                ),
                row(
                    FuelType::Liquids,
                    "INDIA",
                    2020,
                    None,
                    &[(schema::TRANSPORT, Some(20.0))],
                ),
                // Aggregate row: never a leaf.
                row(
                    FuelType::Liquids,
                    "EUROPE",
                    2020,
                    None,
                    &[(schema::TRANSPORT, Some(999.0))],
                ),
            ],
        );
        let lookup = RegionLookup::from_pairs([
            ("FRANCE", Region::Europe),
            ("GERMANY", Region::Europe),
            ("INDIA", Region::AsiaPacific),
            ("EUROPE", Region::Europe),
        ]);
        (table, lookup)
    }

    #[test]
    fn region_values_are_child_sums_not_aggregate_rows() {
        let (table, lookup) = geography_fixture();
        let s = shape_region_sunburst(&table, &lookup, schema::TRANSPORT, 2020);
        assert_eq!(s.value_of("EUROPE"), Some(80.0));
        assert_eq!(s.value_of("WORLD"), Some(100.0));
        assert_eq!(children_sum(&s, "WORLD"), 100.0);
        assert_eq!(children_sum(&s, "EUROPE"), 80.0);
    }

    #[test]
    fn unplaceable_geographies_are_skipped() {
        let (table, _) = geography_fixture();
        // INDIA missing from the lookup: no orphan node may appear.
        let lookup = RegionLookup::from_pairs([
            ("FRANCE", Region::Europe),
            ("GERMANY", Region::Europe),
        ]);
        let s = shape_region_sunburst(&table, &lookup, schema::TRANSPORT, 2020);
        assert!(s.value_of("INDIA").is_none());
        assert_eq!(s.value_of("WORLD"), Some(80.0));
    }

    #[test]
    fn unknown_column_yields_empty_tree() {
        let (table, lookup) = geography_fixture();
        let s = shape_region_sunburst(&table, &lookup, "No Such Column", 2020);
        assert!(s.nodes.is_empty());
    }
}
