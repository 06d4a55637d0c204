//! Time-series shaping
//!
//! Two long-form transforms: the by-geography view stacks one geography's
//! sub-sector columns and overlays the reconciliation totals on top; the
//! by-source view draws one source column as one line per selected
//! geography. Years with no observation produce no point - the line
//! breaks rather than dipping to zero.

use crate::dataset::schema::{self, FuelType};
use crate::dataset::table::EmissionsTable;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One named line or stacked layer.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    fn from_column(table: &EmissionsTable, geography: &str, column: &str) -> Series {
        let idx = table.column_index(column);
        let points = idx
            .map(|idx| {
                table
                    .rows_for(geography)
                    .filter_map(|r| {
                        r.values[idx].map(|value| SeriesPoint {
                            year: r.year,
                            value,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Series {
            name: column.to_string(),
            points,
        }
    }
}

/// One geography's sectoral breakdown over time: stacked layers plus
/// non-stacked overlay totals.
#[derive(Debug, Clone, Serialize)]
pub struct StackedTimeSeries {
    pub geography: String,
    pub stacked: Vec<Series>,
    /// Supply total, consumption total, statistical difference - drawn
    /// as plain lines over the stack. The stacked sum and these totals
    /// may legitimately diverge; the overlay exists to show that gap.
    pub overlays: Vec<Series>,
}

/// Stacked sub-sector series for one geography. The layer set is the
/// fixed sector allow-list, widened for totals by the aggregate columns
/// only that table carries.
pub fn shape_by_geography(
    table: &EmissionsTable,
    geography: &str,
) -> StackedTimeSeries {
    let mut layers: Vec<&'static str> = schema::STACKED_SECTORS.to_vec();
    if table.fuel() == FuelType::Totals {
        layers.extend_from_slice(schema::STACKED_SECTORS_TOTALS_EXTRA);
    }

    StackedTimeSeries {
        geography: geography.to_string(),
        stacked: layers
            .iter()
            .map(|col| Series::from_column(table, geography, col))
            .collect(),
        overlays: schema::OVERLAY_TOTALS
            .iter()
            .map(|col| Series::from_column(table, geography, col))
            .collect(),
    }
}

/// One source column as one line per selected geography, in selection
/// order. Unknown geographies yield empty series rather than errors -
/// the chart simply has nothing to draw for them.
pub fn shape_by_source(
    table: &EmissionsTable,
    column: &str,
    geographies: &[String],
) -> Vec<Series> {
    geographies
        .iter()
        .map(|geography| {
            let mut series = Series::from_column(table, geography, column);
            series.name = geography.clone();
            series
        })
        .collect()
}
