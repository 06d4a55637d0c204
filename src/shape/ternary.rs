//! Ternary shaping
//!
//! Two three-axis views over one year and one geography partition:
//!
//! - the source ternary splits one table's rows between two chosen source
//!   columns and "all other sources", where the third coordinate is
//!   computed as `total - (a + b)` against the consumption total, and
//! - the type ternary splits one source column between the three fuel
//!   phases, joining the solid/liquid/gas tables by (geography, year).
//!
//! Marker size is `sqrt(5 + total)` - a fixed visual-scaling convention
//! reproduced exactly, not re-derived.

use crate::dataset::regions::{Region, RegionLookup};
use crate::dataset::schema::{self, FuelType};
use crate::dataset::table::EmissionsTable;
use crate::dataset::Dataset;
use crate::filters::Grouping;
use crate::shape::in_partition;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TernaryPoint {
    pub name: String,
    pub region: Region,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub total: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ternary {
    pub axis_a: String,
    pub axis_b: String,
    pub axis_c: String,
    pub year: i32,
    pub points: Vec<TernaryPoint>,
}

fn marker_size(total: f64) -> f64 {
    (5.0 + total).sqrt()
}

/// Two chosen sources against everything else, for one table, one year,
/// one partition. Absent observations count as zero here - a point with
/// a known total but an unreported sub-source still belongs on the plot.
/// Rows with nothing at all (a, b and total all absent) are omitted.
pub fn shape_source_ternary(
    table: &EmissionsTable,
    lookup: &RegionLookup,
    source_a: &str,
    source_b: &str,
    grouping: Grouping,
    year: i32,
) -> Ternary {
    let idx_a = table.column_index(source_a);
    let idx_b = table.column_index(source_b);
    let idx_total = table.column_index(schema::ENERGY_CONSUMPTION);

    let mut points = Vec::new();
    for row in table.rows().iter().filter(|r| r.year == year) {
        if !in_partition(&row.geography, grouping, lookup) {
            continue;
        }
        let a = idx_a.and_then(|i| row.values[i]);
        let b = idx_b.and_then(|i| row.values[i]);
        let total = idx_total.and_then(|i| row.values[i]);
        if a.is_none() && b.is_none() && total.is_none() {
            continue;
        }
        let (a, b, total) = (
            a.unwrap_or(0.0),
            b.unwrap_or(0.0),
            total.unwrap_or(0.0),
        );
        points.push(TernaryPoint {
            name: row.geography.clone(),
            region: lookup.region_of(&row.geography),
            a,
            b,
            c: total - (a + b),
            total,
            size: marker_size(total),
        });
    }

    Ternary {
        axis_a: source_a.to_string(),
        axis_b: source_b.to_string(),
        axis_c: "All Other Sources".to_string(),
        year,
        points,
    }
}

/// One source column split across the three fuel phases. The column must
/// be phase-schema valid (the filter layer guarantees that); the point
/// total comes from the totals table's same column.
///
/// Geographies come from the union of all four tables, so an entity
/// reported in a phase table but absent from the totals sheet still gets
/// a point (its total defaults to zero).
pub fn shape_type_ternary(
    dataset: &Dataset,
    column: &str,
    grouping: Grouping,
    year: i32,
) -> Ternary {
    let lookup = dataset.regions();
    let totals = dataset.table(FuelType::Totals);

    let mut seen = std::collections::HashSet::new();
    let mut geographies: Vec<&str> = Vec::new();
    for fuel in FuelType::ALL {
        for geography in dataset.table(fuel).geographies() {
            if seen.insert(geography) {
                geographies.push(geography);
            }
        }
    }

    let mut points = Vec::new();
    for geography in geographies {
        if !in_partition(geography, grouping, lookup) {
            continue;
        }
        let phase = |fuel: FuelType| dataset.table(fuel).value(geography, year, column);
        let solid = phase(FuelType::Solids);
        let liquid = phase(FuelType::Liquids);
        let gas = phase(FuelType::Gases);
        if solid.is_none() && liquid.is_none() && gas.is_none() {
            continue;
        }
        let total = totals.value(geography, year, column).unwrap_or(0.0);
        points.push(TernaryPoint {
            name: geography.to_string(),
            region: lookup.region_of(geography),
            a: solid.unwrap_or(0.0),
            b: liquid.unwrap_or(0.0),
            c: gas.unwrap_or(0.0),
            total,
            size: marker_size(total),
        });
    }

    Ternary {
        axis_a: "Solid Fuels".to_string(),
        axis_b: "Liquid Fuels".to_string(),
        axis_c: "Gas Fuels".to_string(),
        year,
        points,
    }
}
