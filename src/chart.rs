//! Chart spec construction
//!
//! The renderer contract: a figure is a `data` list of trace objects plus
//! a `layout` object, in the plotly subset the embedded UI understands.
//! This module owns the visual constants - theme palette, region colors,
//! per-fuel color scales, the credit annotation - and the base layout
//! every figure starts from. The shaping transforms never see any of it.

use crate::dataset::regions::Region;
use crate::dataset::schema::FuelType;
use crate::filters::Theme;
use chrono::Datelike;
use serde::Serialize;
use serde_json::{json, Value};

/// A renderable figure. Serializes straight into the payload the UI
/// hands to the plotting library.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
    /// Animation frames, present only for the year-animated atlas.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Value>,
}

impl Figure {
    pub fn new(data: Vec<Value>, layout: Value) -> Figure {
        Figure {
            data,
            layout,
            frames: Vec::new(),
        }
    }

    /// A figure with nothing to draw; the static pages use this.
    pub fn empty() -> Figure {
        Figure::new(Vec::new(), json!({}))
    }
}

impl Theme {
    /// Foreground text color.
    pub fn text_color(self) -> &'static str {
        match self {
            Theme::Light => "#000",
            Theme::Dark => "#fff",
        }
    }
}

/// Marker color for a region bloc. Fixed palette, identical in both
/// themes, so a bloc keeps its color across every view.
pub fn region_color(region: Region) -> &'static str {
    match region {
        Region::Africa => "#46C6E7",
        Region::AsiaPacific => "#616BB2",
        Region::CommonwealthOfIndependentStates => "#8B69AD",
        Region::MiddleEast => "#F9A05B",
        Region::NorthAmerica => "#EF563C",
        Region::SouthAndCentralAmerica => "#F06591",
        Region::Europe => "#41BB91",
        Region::AnnexI => "#7570b3",
        Region::NonAnnexI => "#1b9e77",
        Region::World | Region::Antarctica | Region::None => "#888888",
    }
}

/// Continuous color scale for a fuel type's magnitude views (atlas).
/// Each fuel keeps its own scale so screenshots are recognizable at a
/// glance; the dark theme flips the scale direction so high values stay
/// bright against the dark background.
pub fn color_scale(fuel: FuelType, theme: Theme) -> (&'static str, bool) {
    let name = match fuel {
        FuelType::Totals => "Electric",
        FuelType::Solids => "turbid",
        FuelType::Liquids => "Hot",
        FuelType::Gases => "dense",
    };
    (name, theme == Theme::Dark)
}

/// The credit line stamped at the bottom of every figure.
pub fn credit_text() -> String {
    format!("The CDIAC Dashboard ({})", chrono::Local::now().year())
}

/// Base layout shared by every figure: transparent backgrounds (the page
/// supplies the surface), theme-colored text, centered title, subtitle
/// and credit annotations.
pub fn base_layout(title: &str, subtitle: &str, theme: Theme) -> Value {
    let text = theme.text_color();
    json!({
        "plot_bgcolor": "rgba(0,0,0,0)",
        "paper_bgcolor": "rgba(0,0,0,0)",
        "font": { "color": text },
        "title": {
            "text": title,
            "x": 0.5,
            "xanchor": "center",
            "font": { "size": 26, "color": text }
        },
        "annotations": [
            {
                "text": subtitle,
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": 0.5,
                "y": 1.06,
                "font": { "size": 14, "color": text }
            },
            {
                "text": credit_text(),
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": 0.5,
                "y": -0.12,
                "font": { "size": 12, "color": text }
            }
        ]
    })
}

/// Figure subtitle for a fuel type.
pub fn fuel_subtitle(fuel: FuelType) -> &'static str {
    match fuel {
        FuelType::Totals => "CO₂ Emissions",
        FuelType::Solids => "CO₂ Emissions from the Energy Use of Solid Fuels",
        FuelType::Liquids => "CO₂ Emissions from the Energy Use of Liquid Fuels",
        FuelType::Gases => "CO₂ Emissions from the Energy Use of Gas Fuels",
    }
}
