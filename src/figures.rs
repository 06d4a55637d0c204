//! Figure assembly
//!
//! One entry point, [`build`]: dispatch a resolved filter state to the
//! right shaping transform and wrap the result in traces and a layout.
//! Every arm is a pure function of (dataset, state); nothing is cached
//! between renders.

use crate::chart::{self, Figure};
use crate::dataset::Dataset;
use crate::filters::{FilterState, NavOption};
use crate::shape;
use serde_json::{json, Value};

/// Build the figure for a resolved filter state. Static pages (table,
/// about, download) have no figure and get an empty one.
pub fn build(dataset: &Dataset, state: &FilterState) -> Figure {
    match state.nav {
        NavOption::CarbonAtlas => atlas(dataset, state),
        NavOption::GeographyTimeSeries => geography_time_series(dataset, state),
        NavOption::SourceTimeSeries => source_time_series(dataset, state),
        NavOption::GeographySunburst => geography_sunburst(dataset, state),
        NavOption::SourceSunburst => source_sunburst(dataset, state),
        NavOption::TypeTernary => type_ternary(dataset, state),
        NavOption::SourceTernary => source_ternary(dataset, state),
        NavOption::Table | NavOption::About | NavOption::Download => Figure::empty(),
    }
}

/// The year a year-pinned view should show: the explicit filter value,
/// else the newest year in the dataset.
fn pinned_year(dataset: &Dataset, state: &FilterState) -> i32 {
    state.year.or_else(|| dataset.latest_year()).unwrap_or(0)
}

fn atlas(dataset: &Dataset, state: &FilterState) -> Figure {
    let table = dataset.table(state.fuel);
    let shaped = shape::shape_atlas(table, &state.source);
    let (scale, reversed) = chart::color_scale(state.fuel, state.theme);

    let trace_for = |frame: &shape::AtlasFrame| {
        json!({
            "type": "choropleth",
            "locations": frame.codes,
            "z": frame.values,
            "text": frame.labels,
            "zmin": 0.0,
            "zmax": shaped.zmax,
            "colorscale": scale,
            "reversescale": reversed,
            "colorbar": { "title": "kilotonnes C" }
        })
    };

    // Current frame up front, the rest as animation frames.
    let year = pinned_year(dataset, state);
    let current = shaped
        .frames
        .iter()
        .find(|f| f.year == year)
        .or_else(|| shaped.frames.last());

    let data = current.map(|f| vec![trace_for(f)]).unwrap_or_default();
    let frames: Vec<Value> = shaped
        .frames
        .iter()
        .map(|f| json!({ "name": f.year.to_string(), "data": [trace_for(f)] }))
        .collect();

    let mut layout = chart::base_layout(
        &state.source,
        chart::fuel_subtitle(state.fuel),
        state.theme,
    );
    layout["geo"] = json!({
        "showframe": false,
        "projection": { "type": "natural earth" },
        "bgcolor": "rgba(0,0,0,0)"
    });

    // Year slider and play/pause buttons drive the animation frames.
    if !shaped.frames.is_empty() {
        let steps: Vec<Value> = shaped
            .frames
            .iter()
            .map(|f| {
                json!({
                    "label": f.year.to_string(),
                    "method": "animate",
                    "args": [[f.year.to_string()], {
                        "mode": "immediate",
                        "frame": { "duration": 0, "redraw": true },
                        "transition": { "duration": 0 }
                    }]
                })
            })
            .collect();
        let active = shaped
            .frames
            .iter()
            .position(|f| f.year == year)
            .unwrap_or(shaped.frames.len() - 1);
        layout["sliders"] = json!([{
            "active": active,
            "currentvalue": { "prefix": "Year: " },
            "pad": { "t": 30 },
            "steps": steps
        }]);
        layout["updatemenus"] = json!([{
            "type": "buttons",
            "direction": "left",
            "showactive": false,
            "x": 0.0,
            "y": -0.05,
            "buttons": [
                {
                    "label": "Play",
                    "method": "animate",
                    "args": [null, {
                        "fromcurrent": true,
                        "frame": { "duration": 300, "redraw": true },
                        "transition": { "duration": 0 }
                    }]
                },
                {
                    "label": "Pause",
                    "method": "animate",
                    "args": [[null], {
                        "mode": "immediate",
                        "frame": { "duration": 0, "redraw": true }
                    }]
                }
            ]
        }]);
    }

    let mut figure = Figure::new(data, layout);
    figure.frames = frames;
    figure
}

fn geography_time_series(dataset: &Dataset, state: &FilterState) -> Figure {
    let table = dataset.table(state.fuel);
    let shaped = shape::shape_by_geography(table, state.geography());

    let mut data: Vec<Value> = shaped
        .stacked
        .iter()
        .map(|s| {
            json!({
                "type": "scatter",
                "mode": "lines",
                "stackgroup": "sectors",
                "name": s.name,
                "x": s.points.iter().map(|p| p.year).collect::<Vec<_>>(),
                "y": s.points.iter().map(|p| p.value).collect::<Vec<_>>()
            })
        })
        .collect();
    data.extend(shaped.overlays.iter().map(|s| {
        json!({
            "type": "scatter",
            "mode": "lines",
            "name": s.name,
            "line": { "dash": "dot", "width": 2 },
            "x": s.points.iter().map(|p| p.year).collect::<Vec<_>>(),
            "y": s.points.iter().map(|p| p.value).collect::<Vec<_>>()
        })
    }));

    let mut layout = chart::base_layout(
        state.geography(),
        chart::fuel_subtitle(state.fuel),
        state.theme,
    );
    layout["yaxis"] = json!({ "title": "CO₂ Emissions (kilotonnes C)" });
    Figure::new(data, layout)
}

fn source_time_series(dataset: &Dataset, state: &FilterState) -> Figure {
    let table = dataset.table(state.fuel);
    let lines = shape::shape_by_source(table, &state.source, &state.geographies);

    let data: Vec<Value> = lines
        .iter()
        .map(|s| {
            json!({
                "type": "scatter",
                "mode": "lines",
                "name": s.name,
                "x": s.points.iter().map(|p| p.year).collect::<Vec<_>>(),
                "y": s.points.iter().map(|p| p.value).collect::<Vec<_>>()
            })
        })
        .collect();

    let mut layout = chart::base_layout(
        &state.source,
        chart::fuel_subtitle(state.fuel),
        state.theme,
    );
    layout["yaxis"] = json!({ "title": "CO₂ Emissions (kilotonnes C)" });
    Figure::new(data, layout)
}

fn sunburst_figure(shaped: &shape::Sunburst, title: &str, state: &FilterState) -> Figure {
    let data = vec![json!({
        "type": "sunburst",
        "labels": shaped.nodes.iter().map(|n| n.label.as_str()).collect::<Vec<_>>(),
        "parents": shaped.nodes.iter().map(|n| n.parent.as_str()).collect::<Vec<_>>(),
        "values": shaped.nodes.iter().map(|n| n.value).collect::<Vec<_>>(),
        "branchvalues": "total",
        "insidetextorientation": "horizontal"
    })];
    Figure::new(
        data,
        chart::base_layout(title, chart::fuel_subtitle(state.fuel), state.theme),
    )
}

fn geography_sunburst(dataset: &Dataset, state: &FilterState) -> Figure {
    let table = dataset.table(state.fuel);
    let year = pinned_year(dataset, state);
    let shaped = shape::shape_sector_sunburst(table, state.geography(), year);
    let title = format!("{} ({})", state.geography(), year);
    sunburst_figure(&shaped, &title, state)
}

fn source_sunburst(dataset: &Dataset, state: &FilterState) -> Figure {
    let table = dataset.table(state.fuel);
    let year = pinned_year(dataset, state);
    let shaped =
        shape::shape_region_sunburst(table, dataset.regions(), &state.source, year);
    let title = format!("{} ({})", state.source, year);
    sunburst_figure(&shaped, &title, state)
}

fn ternary_figure(shaped: &shape::Ternary, title: &str, state: &FilterState) -> Figure {
    let data = vec![json!({
        "type": "scatterternary",
        "mode": "markers",
        "a": shaped.points.iter().map(|p| p.a).collect::<Vec<_>>(),
        "b": shaped.points.iter().map(|p| p.b).collect::<Vec<_>>(),
        "c": shaped.points.iter().map(|p| p.c).collect::<Vec<_>>(),
        "text": shaped.points.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        "marker": {
            "size": shaped.points.iter().map(|p| p.size).collect::<Vec<_>>(),
            "color": shaped.points.iter()
                .map(|p| chart::region_color(p.region))
                .collect::<Vec<_>>()
        }
    })];

    let mut layout = chart::base_layout(title, chart::fuel_subtitle(state.fuel), state.theme);
    layout["ternary"] = json!({
        "sum": 1,
        "aaxis": { "title": shaped.axis_a },
        "baxis": { "title": shaped.axis_b },
        "caxis": { "title": shaped.axis_c },
        "bgcolor": "rgba(0,0,0,0)"
    });
    Figure::new(data, layout)
}

fn type_ternary(dataset: &Dataset, state: &FilterState) -> Figure {
    let year = pinned_year(dataset, state);
    let shaped = shape::shape_type_ternary(dataset, &state.source, state.grouping, year);
    let title = format!("{} by Fuel Type ({})", state.source, year);
    ternary_figure(&shaped, &title, state)
}

fn source_ternary(dataset: &Dataset, state: &FilterState) -> Figure {
    let year = pinned_year(dataset, state);
    let table = dataset.table(state.fuel);
    let shaped = shape::shape_source_ternary(
        table,
        dataset.regions(),
        &state.source_a,
        &state.source_b,
        state.grouping,
        year,
    );
    let title = format!("{} vs {} ({})", state.source_a, state.source_b, year);
    ternary_figure(&shaped, &title, state)
}
