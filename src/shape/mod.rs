//! Data shaping transforms
//!
//! Pure functions from (dataset, filter state) to chart-ready shapes. Each
//! visualization gets its own submodule; the output types here are the
//! contract between shaping and rendering. Everything is produced fresh
//! per render and serializes straight into the figure payload.
//!
//! The one rule every transform obeys: an absent observation is omitted,
//! never rendered as zero. `Option<f64>` cells stop being options here -
//! they either become points or they don't.

pub mod atlas;
pub mod sunburst;
pub mod ternary;
pub mod timeseries;

pub use atlas::{shape_atlas, Atlas, AtlasFrame};
pub use sunburst::{shape_region_sunburst, shape_sector_sunburst, Sunburst, SunburstNode};
pub use ternary::{shape_source_ternary, shape_type_ternary, Ternary, TernaryPoint};
pub use timeseries::{shape_by_geography, shape_by_source, Series, SeriesPoint, StackedTimeSeries};

use crate::dataset::regions::{self, Region, RegionLookup};
use crate::filters::Grouping;

/// Whether a geography row belongs to the active ternary partition. The
/// four partitions select pairwise-disjoint row sets: countries only,
/// the seven regional blocs, the two annex blocs, or the single WORLD row.
pub(crate) fn in_partition(
    geography: &str,
    grouping: Grouping,
    lookup: &RegionLookup,
) -> bool {
    match grouping {
        Grouping::Individual => {
            // Country rows, minus the Antarctic fishing entries the
            // region lookup files under ANTARCTICA.
            !regions::is_aggregate(geography) && lookup.region_of(geography) != Region::Antarctica
        }
        Grouping::Region => regions::BP_REGIONS.contains(&geography),
        Grouping::Annex => regions::ANNEX_GEOGRAPHIES.contains(&geography),
        Grouping::World => geography == regions::WORLD,
    }
}
