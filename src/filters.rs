//! Filter state machine
//!
//! Given the active navigation option and the upstream filter values, this
//! module decides which controls are visible, what their valid option sets
//! are, and what to coerce a stale selection to. It is recomputed from
//! scratch on every interaction; nothing here holds state.
//!
//! The navigation -> visible-controls mapping lives in exactly one table
//! ([`ControlSet::for_nav`]) and the option sets are derived from the same
//! schema constants. Earlier generations of this logic kept two copies of
//! the mapping and they drifted apart; the agreement test at the bottom is
//! the regression guard for that defect class.

use crate::dataset::schema::{
    FuelType, STACKED_SECTORS, STACKED_SECTORS_TOTALS_EXTRA, STAT_DIFFERENCE,
};
use crate::resolver;
use serde::{Deserialize, Serialize};

/// Which visualization (or static page) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavOption {
    #[serde(rename = "carbon-atlas")]
    CarbonAtlas,
    #[serde(rename = "political-geography-time-series")]
    GeographyTimeSeries,
    #[serde(rename = "source-time-series")]
    SourceTimeSeries,
    #[serde(rename = "political-geography-sunburst")]
    GeographySunburst,
    #[serde(rename = "source-sunburst")]
    SourceSunburst,
    #[serde(rename = "type-ternary")]
    TypeTernary,
    #[serde(rename = "source-ternary")]
    SourceTernary,
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "about")]
    About,
    #[serde(rename = "download")]
    Download,
}

impl NavOption {
    pub const ALL: [NavOption; 10] = [
        NavOption::CarbonAtlas,
        NavOption::GeographyTimeSeries,
        NavOption::SourceTimeSeries,
        NavOption::GeographySunburst,
        NavOption::SourceSunburst,
        NavOption::TypeTernary,
        NavOption::SourceTernary,
        NavOption::Table,
        NavOption::About,
        NavOption::Download,
    ];

    /// Views where a negative-valued source would break the color scale
    /// or the hierarchy geometry. The statistical difference column is
    /// excluded as a selectable source for these, but stays selectable
    /// for the line-chart views.
    pub fn rejects_signed_sources(self) -> bool {
        matches!(
            self,
            NavOption::CarbonAtlas
                | NavOption::SourceSunburst
                | NavOption::TypeTernary
                | NavOption::SourceTernary
        )
    }
}

/// Light/dark rendering theme. A filter field like any other; only the
/// chart layout looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Geography partition for the ternary views. Exactly one partition is
/// active at a time and the row sets they select are pairwise disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Individual,
    Region,
    Annex,
    World,
}

impl Grouping {
    pub const ALL: [Grouping; 4] = [
        Grouping::Individual,
        Grouping::Region,
        Grouping::Annex,
        Grouping::World,
    ];
}

/// Visibility of each filter control for one navigation option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ControlSet {
    pub fuel_type: bool,
    pub source: bool,
    pub source_a: bool,
    pub source_b: bool,
    pub geography: bool,
    pub grouping: bool,
    pub year: bool,
}

impl ControlSet {
    /// The single source of truth for control visibility. Every other
    /// question about controls (option sets, cardinality) must agree
    /// with this table.
    pub fn for_nav(nav: NavOption) -> ControlSet {
        match nav {
            // The atlas animates across years with its own in-chart
            // slider, so it gets no year dropdown.
            NavOption::CarbonAtlas => ControlSet {
                fuel_type: true,
                source: true,
                ..ControlSet::default()
            },
            NavOption::SourceSunburst => ControlSet {
                fuel_type: true,
                source: true,
                year: true,
                ..ControlSet::default()
            },
            NavOption::GeographyTimeSeries => ControlSet {
                fuel_type: true,
                geography: true,
                ..ControlSet::default()
            },
            NavOption::GeographySunburst => ControlSet {
                fuel_type: true,
                geography: true,
                year: true,
                ..ControlSet::default()
            },
            NavOption::SourceTimeSeries => ControlSet {
                fuel_type: true,
                source: true,
                geography: true,
                ..ControlSet::default()
            },
            // The type ternary compares the three fuel phases against
            // each other, so a fuel-type control would be meaningless.
            NavOption::TypeTernary => ControlSet {
                source: true,
                grouping: true,
                year: true,
                ..ControlSet::default()
            },
            NavOption::SourceTernary => ControlSet {
                fuel_type: true,
                source_a: true,
                source_b: true,
                grouping: true,
                year: true,
                ..ControlSet::default()
            },
            NavOption::Table | NavOption::About | NavOption::Download => ControlSet::default(),
        }
    }
}

/// How many geographies the active view consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeographyCardinality {
    Hidden,
    Single { default: &'static str },
    Multi { defaults: &'static [&'static str] },
}

/// Default multi-select set for the by-source time series.
pub const DEFAULT_GEOGRAPHY_SET: &[&str] = &[
    "CHINA (MAINLAND)",
    "UNITED STATES OF AMERICA",
    "RUSSIAN FEDERATION",
    "INDIA",
];

pub fn geography_cardinality(nav: NavOption) -> GeographyCardinality {
    match nav {
        NavOption::GeographyTimeSeries => GeographyCardinality::Single {
            default: "UNITED STATES OF AMERICA",
        },
        NavOption::GeographySunburst => GeographyCardinality::Single { default: "WORLD" },
        NavOption::SourceTimeSeries => GeographyCardinality::Multi {
            defaults: DEFAULT_GEOGRAPHY_SET,
        },
        _ => GeographyCardinality::Hidden,
    }
}

/// Ordered valid options for the single source control, or empty when
/// the control is not meaningful for `nav`.
pub fn source_options(nav: NavOption, fuel: FuelType) -> Vec<&'static str> {
    let controls = ControlSet::for_nav(nav);
    if !controls.source {
        return Vec::new();
    }

    // The type ternary reads all three phase tables at once and needs a
    // column valid in each, so its options come from the solids schema
    // whatever fuel type is selected.
    let schema_fuel = if nav == NavOption::TypeTernary {
        FuelType::Solids
    } else {
        fuel
    };

    schema_fuel
        .columns()
        .iter()
        .copied()
        .filter(|col| !(nav.rejects_signed_sources() && *col == STAT_DIFFERENCE))
        .collect()
}

/// Ordered valid options for the ternary's A/B source controls: the
/// sub-sector columns of the active schema. The consumption total is the
/// ternary's fixed denominator and is never offered as an axis.
pub fn ternary_source_options(fuel: FuelType) -> Vec<&'static str> {
    let mut options: Vec<&'static str> = STACKED_SECTORS.to_vec();
    if fuel == FuelType::Totals {
        options.extend_from_slice(STACKED_SECTORS_TOTALS_EXTRA);
    }
    options
}

/// Coerce a previously selected source to a valid option for the new
/// (nav, fuel) pair. Returns the previous value untouched when it is
/// still valid; otherwise the resolver's best match, clamped to the
/// option list. Never returns an invalid selection.
pub fn coerce_source(previous: &str, nav: NavOption, fuel: FuelType) -> &'static str {
    let options = source_options(nav, fuel);
    if options.is_empty() {
        // Control not shown; keep a schema-valid value for the API.
        return resolver::resolve_for_view(previous, fuel, nav == NavOption::TypeTernary);
    }
    if let Some(hit) = options.iter().find(|c| **c == previous) {
        return *hit;
    }
    let resolved = resolver::resolve_for_view(previous, fuel, nav == NavOption::TypeTernary);
    if options.contains(&resolved) {
        resolved
    } else {
        // Resolver landed on a column this view excludes (the signed
        // statistical difference); fall to the first valid option.
        options[0]
    }
}

/// Coerce a ternary axis selection the same way.
pub fn coerce_ternary_source(previous: &str, fuel: FuelType, fallback_index: usize) -> &'static str {
    let options = ternary_source_options(fuel);
    if let Some(hit) = options.iter().find(|c| **c == previous) {
        return *hit;
    }
    options[fallback_index.min(options.len() - 1)]
}

/// One interaction's worth of filter values, after coercion. Ephemeral:
/// built per request, dropped after the figure is produced.
#[derive(Debug, Clone, Serialize)]
pub struct FilterState {
    pub nav: NavOption,
    pub fuel: FuelType,
    pub source: String,
    pub source_a: String,
    pub source_b: String,
    pub geographies: Vec<String>,
    pub grouping: Grouping,
    pub year: Option<i32>,
    pub theme: Theme,
}

impl FilterState {
    /// Build a valid state from raw (possibly stale) inputs. Every field
    /// a view consumes is guaranteed valid afterwards; invalid
    /// combinations are corrected here, not at render time.
    pub fn resolve(
        nav: NavOption,
        fuel: FuelType,
        source: &str,
        source_a: &str,
        source_b: &str,
        geographies: Vec<String>,
        grouping: Grouping,
        year: Option<i32>,
        theme: Theme,
    ) -> FilterState {
        let source = coerce_source(source, nav, fuel).to_string();
        let source_a = coerce_ternary_source(source_a, fuel, 0).to_string();
        let source_b = coerce_ternary_source(source_b, fuel, 1).to_string();

        let geographies = match geography_cardinality(nav) {
            GeographyCardinality::Single { default } => {
                vec![geographies
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| default.to_string())]
            }
            GeographyCardinality::Multi { defaults } => {
                if geographies.is_empty() {
                    defaults.iter().map(|g| g.to_string()).collect()
                } else {
                    geographies
                }
            }
            GeographyCardinality::Hidden => geographies,
        };

        FilterState {
            nav,
            fuel,
            source,
            source_a,
            source_b,
            geographies,
            grouping,
            year,
            theme,
        }
    }

    /// First selected geography, for the single-geography views.
    pub fn geography(&self) -> &str {
        self.geographies.first().map(String::as_str).unwrap_or("WORLD")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::schema;

    // ==========================================================================
    // VISIBILITY / OPTION AGREEMENT TESTS
    // ==========================================================================
    //
    // Historical versions kept the visibility check and the option-list
    // check in separate callbacks and they drifted. These tests pin the
    // two views of the table together for every navigation option.
    // ==========================================================================

    #[test]
    fn source_options_agree_with_visibility_for_every_nav() {
        for nav in NavOption::ALL {
            for fuel in FuelType::ALL {
                let controls = ControlSet::for_nav(nav);
                let options = source_options(nav, fuel);
                assert_eq!(
                    controls.source,
                    !options.is_empty(),
                    "visibility and options disagree for {:?}/{:?}",
                    nav,
                    fuel
                );
            }
        }
    }

    #[test]
    fn geography_cardinality_agrees_with_visibility() {
        for nav in NavOption::ALL {
            let controls = ControlSet::for_nav(nav);
            let hidden = matches!(geography_cardinality(nav), GeographyCardinality::Hidden);
            assert_eq!(controls.geography, !hidden, "disagreement for {:?}", nav);
        }
    }

    #[test]
    fn static_pages_show_no_controls() {
        for nav in [NavOption::Table, NavOption::About, NavOption::Download] {
            assert_eq!(ControlSet::for_nav(nav), ControlSet::default());
        }
    }

    #[test]
    fn ternary_axis_controls_only_on_source_ternary() {
        for nav in NavOption::ALL {
            let controls = ControlSet::for_nav(nav);
            assert_eq!(controls.source_a, nav == NavOption::SourceTernary);
            assert_eq!(controls.source_b, nav == NavOption::SourceTernary);
        }
    }

    #[test]
    fn year_control_only_on_year_pinned_views() {
        let pinned = [
            NavOption::GeographySunburst,
            NavOption::SourceSunburst,
            NavOption::TypeTernary,
            NavOption::SourceTernary,
        ];
        for nav in NavOption::ALL {
            let controls = ControlSet::for_nav(nav);
            assert_eq!(controls.year, pinned.contains(&nav), "{:?}", nav);
        }
        // The atlas animates across years inside the chart instead.
        assert!(!ControlSet::for_nav(NavOption::CarbonAtlas).year);
    }

    // ==========================================================================
    // SIGNED-SOURCE EXCLUSION TESTS
    // ==========================================================================

    #[test]
    fn stat_difference_excluded_where_sign_breaks_the_view() {
        for fuel in FuelType::ALL {
            assert!(!source_options(NavOption::CarbonAtlas, fuel)
                .contains(&schema::STAT_DIFFERENCE));
            assert!(!source_options(NavOption::SourceSunburst, fuel)
                .contains(&schema::STAT_DIFFERENCE));
            assert!(!source_options(NavOption::TypeTernary, fuel)
                .contains(&schema::STAT_DIFFERENCE));
        }
    }

    #[test]
    fn stat_difference_selectable_for_line_charts() {
        for fuel in FuelType::ALL {
            assert!(source_options(NavOption::SourceTimeSeries, fuel)
                .contains(&schema::STAT_DIFFERENCE));
        }
    }

    #[test]
    fn ternary_axis_options_never_include_the_denominator() {
        for fuel in FuelType::ALL {
            let options = ternary_source_options(fuel);
            assert!(!options.contains(&schema::ENERGY_CONSUMPTION));
            assert!(!options.contains(&schema::STAT_DIFFERENCE));
            assert!(!options.is_empty());
        }
    }

    // ==========================================================================
    // DEFAULT COERCION TESTS
    // ==========================================================================

    #[test]
    fn valid_selection_passes_through_unchanged() {
        assert_eq!(
            coerce_source(schema::TRANSPORT, NavOption::CarbonAtlas, FuelType::Solids),
            schema::TRANSPORT
        );
    }

    #[test]
    fn cement_selection_coerces_to_fallback_when_switching_to_solids() {
        // The §scenario this machine exists for: totals + cement, then
        // the user switches the fuel type to solids.
        let coerced = coerce_source(schema::CEMENT, NavOption::CarbonAtlas, FuelType::Solids);
        assert_eq!(coerced, resolver::PHASE_FALLBACK);
    }

    #[test]
    fn stat_difference_coerces_away_on_signed_views() {
        // Valid for the line chart, switches to the atlas: the resolver
        // would keep the column verbatim, but the atlas excludes it, so
        // coercion must clamp to the option list.
        let coerced = coerce_source(
            schema::STAT_DIFFERENCE,
            NavOption::CarbonAtlas,
            FuelType::Totals,
        );
        let options = source_options(NavOption::CarbonAtlas, FuelType::Totals);
        assert!(options.contains(&coerced));
        assert_ne!(coerced, schema::STAT_DIFFERENCE);
    }

    #[test]
    fn coerced_source_is_always_a_valid_option() {
        for nav in NavOption::ALL {
            for fuel in FuelType::ALL {
                let options = source_options(nav, fuel);
                for previous in resolver::all_known_columns() {
                    let coerced = coerce_source(previous, nav, fuel);
                    if !options.is_empty() {
                        assert!(
                            options.contains(&coerced),
                            "{:?}/{:?}: {:?} coerced to invalid {:?}",
                            nav,
                            fuel,
                            previous,
                            coerced
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn type_ternary_options_identical_for_every_fuel() {
        let reference = source_options(NavOption::TypeTernary, FuelType::Solids);
        for fuel in FuelType::ALL {
            assert_eq!(source_options(NavOption::TypeTernary, fuel), reference);
        }
    }

    // ==========================================================================
    // FILTER STATE RESOLUTION TESTS
    // ==========================================================================

    #[test]
    fn resolve_fills_single_geography_default() {
        let state = FilterState::resolve(
            NavOption::GeographySunburst,
            FuelType::Totals,
            schema::ENERGY_SUPPLY,
            "",
            "",
            vec![],
            Grouping::default(),
            None,
            Theme::default(),
        );
        assert_eq!(state.geographies, vec!["WORLD".to_string()]);
        assert_eq!(state.geography(), "WORLD");
    }

    #[test]
    fn resolve_truncates_multi_selection_for_single_views() {
        let state = FilterState::resolve(
            NavOption::GeographyTimeSeries,
            FuelType::Gases,
            schema::TRANSPORT,
            "",
            "",
            vec!["FRANCE".to_string(), "INDIA".to_string()],
            Grouping::default(),
            None,
            Theme::Dark,
        );
        assert_eq!(state.geographies, vec!["FRANCE".to_string()]);
    }

    #[test]
    fn resolve_fills_multi_geography_default_set() {
        let state = FilterState::resolve(
            NavOption::SourceTimeSeries,
            FuelType::Liquids,
            schema::TRANSPORT,
            "",
            "",
            vec![],
            Grouping::default(),
            None,
            Theme::default(),
        );
        assert_eq!(state.geographies.len(), DEFAULT_GEOGRAPHY_SET.len());
    }

    #[test]
    fn resolve_coerces_ternary_axes_to_distinct_defaults() {
        let state = FilterState::resolve(
            NavOption::SourceTernary,
            FuelType::Solids,
            "",
            "not a column",
            "also not a column",
            vec![],
            Grouping::Region,
            None,
            Theme::default(),
        );
        assert_ne!(state.source_a, state.source_b);
        let options = ternary_source_options(FuelType::Solids);
        assert!(options.contains(&state.source_a.as_str()));
        assert!(options.contains(&state.source_b.as_str()));
    }
}
