//! Choropleth shaping
//!
//! One frame per year, each carrying parallel ISO-3166 code / value /
//! label vectors, plus a single color-scale bound computed from the whole
//! column. The bound deliberately spans every year, not just the frame
//! being shown: a per-frame bound would recolor the map as the animation
//! advances and make years visually incomparable.

use crate::dataset::regions;
use crate::dataset::table::EmissionsTable;
use serde::Serialize;

/// One year's worth of mappable observations, parallel-vector form.
#[derive(Debug, Clone, Serialize)]
pub struct AtlasFrame {
    pub year: i32,
    pub codes: Vec<&'static str>,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

/// The shaped choropleth: every year's frame plus the shared scale bound.
#[derive(Debug, Clone, Serialize)]
pub struct Atlas {
    pub source: String,
    pub frames: Vec<AtlasFrame>,
    /// Color-scale upper bound: the column maximum across all years and
    /// all mappable geographies. Zero for an empty column.
    pub zmax: f64,
}

/// Shape `column` of `table` into per-year choropleth frames.
///
/// Aggregate rows (WORLD, regional blocs, annex blocs) are never mapped.
/// Geographies without an ISO code - historical entities, fishing zones -
/// are silently absent from the frame; that is dataset shape, not an
/// error. Absent observations are omitted, not zeroed.
pub fn shape_atlas(table: &EmissionsTable, column: &str) -> Atlas {
    let idx = table.column_index(column);

    let mut frames: Vec<AtlasFrame> = Vec::new();
    if let Some(idx) = idx {
        for year in table.years() {
            let mut frame = AtlasFrame {
                year,
                codes: Vec::new(),
                values: Vec::new(),
                labels: Vec::new(),
            };
            for row in table.rows().iter().filter(|r| r.year == year) {
                if regions::is_aggregate(&row.geography) {
                    continue;
                }
                let (Some(code), Some(value)) =
                    (regions::iso3(&row.geography), row.values[idx])
                else {
                    continue;
                };
                frame.codes.push(code);
                frame.values.push(value);
                frame.labels.push(row.geography.clone());
            }
            frames.push(frame);
        }
    }

    // Bound over every frame's values: mappable country rows only, so an
    // aggregate row can't blow out the scale.
    let zmax = frames
        .iter()
        .flat_map(|f| f.values.iter().copied())
        .fold(0.0_f64, f64::max);

    Atlas {
        source: column.to_string(),
        frames,
        zmax,
    }
}
