//! cdiac-dash - CO₂-emissions dashboard over the CDIAC sectoral tables
//!
//! A data-visualization dashboard for fossil-fuel CO₂-emissions statistics:
//! choropleth maps, sunbursts, ternary plots, and time-series charts over
//! four emissions tables (one per fuel phase plus a totals table) loaded
//! once from a spreadsheet at startup.
//!
//! # Overview
//!
//! The pipeline is deliberately simple: a static workbook is parsed into
//! immutable tables, and every chart is a pure function of those tables
//! plus the current filter selections. There is no storage engine and no
//! background work - just transforms.
//!
//! 1. **Load** ([`dataset`]): parse the workbook's four sheets into
//!    canonical-schema tables; absent observations stay absent
//!    (`Option<f64>`), never zero.
//! 2. **Filter** ([`filters`], [`resolver`]): coerce the user's selections
//!    into a valid state for the chosen view - including cross-schema
//!    column reconciliation when the fuel type changes.
//! 3. **Shape** ([`shape`]): subset and reshape the tables into the chosen
//!    view's geometry (map frames, long series, hierarchies, ternary
//!    coordinates).
//! 4. **Render** ([`chart`], [`figures`]): wrap the shaped data in traces
//!    and a themed layout the embedded UI hands to the plotting library.
//!
//! # Quick Start
//!
//! ```no_run
//! use cdiac_dash::dataset::Dataset;
//! use cdiac_dash::dataset::schema::FuelType;
//! use cdiac_dash::filters::{FilterState, Grouping, NavOption, Theme};
//! use cdiac_dash::figures;
//!
//! let dataset = Dataset::load("emissions.xlsx".as_ref()).unwrap();
//! let state = FilterState::resolve(
//!     NavOption::CarbonAtlas,
//!     FuelType::Totals,
//!     "Transport",
//!     "", "",
//!     vec![],
//!     Grouping::Individual,
//!     None,
//!     Theme::Light,
//! );
//! let figure = figures::build(&dataset, &state);
//! println!("{}", serde_json::to_string(&figure).unwrap());
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: workbook loading, canonical schema, region lookups
//! - [`resolver`]: cross-schema column reconciliation
//! - [`filters`]: navigation options, control visibility, state coercion
//! - [`shape`]: per-visualization data transforms
//! - [`chart`] / [`figures`]: figure assembly and visual constants
//! - [`export`]: CSV/JSON table export
//! - [`serve`]: the embedded web UI and its JSON API

pub mod chart;
pub mod dataset;
pub mod export;
pub mod figures;
pub mod filters;
pub mod resolver;
pub mod serve;
pub mod shape;

pub use chart::Figure;
pub use dataset::schema::FuelType;
pub use dataset::{Dataset, LoadError};
pub use filters::{FilterState, Grouping, NavOption, Theme};
