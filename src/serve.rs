//! HTTP server for the dashboard
//!
//! `cdiac-dash serve ./emissions.xlsx` → starts server, opens browser,
//! shows the dashboard. The dataset is loaded once before the listener
//! starts; every request after that is a pure function of the loaded
//! tables and the request's filter parameters.

use crate::dataset::schema::FuelType;
use crate::dataset::Dataset;
use crate::export;
use crate::figures;
use crate::filters::{
    self, ControlSet, FilterState, Grouping, GeographyCardinality, NavOption, Theme,
};
use serde::{Deserialize, Serialize};
use std::io;
use tiny_http::{Header, Method, Request, Response, Server};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

/// Raw filter parameters as they arrive from the UI. Multi-geography
/// selections are semicolon-separated - geography names themselves
/// contain commas.
#[derive(Debug, Serialize, Deserialize)]
pub struct FigureParams {
    #[serde(default = "default_nav")]
    pub nav: NavOption,
    #[serde(default = "default_fuel")]
    pub fuel: FuelType,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_a: String,
    #[serde(default)]
    pub source_b: String,
    #[serde(default)]
    pub geography: String,
    #[serde(default)]
    pub grouping: Grouping,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub theme: Theme,
}

fn default_nav() -> NavOption {
    NavOption::CarbonAtlas
}
fn default_fuel() -> FuelType {
    FuelType::Totals
}

impl Default for FigureParams {
    fn default() -> Self {
        FigureParams {
            nav: default_nav(),
            fuel: default_fuel(),
            source: String::new(),
            source_a: String::new(),
            source_b: String::new(),
            geography: String::new(),
            grouping: Grouping::default(),
            year: None,
            theme: Theme::default(),
        }
    }
}

impl FigureParams {
    /// Coerce the raw parameters into a valid filter state.
    pub fn into_state(self) -> FilterState {
        let geographies: Vec<String> = self
            .geography
            .split(';')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        FilterState::resolve(
            self.nav,
            self.fuel,
            &self.source,
            &self.source_a,
            &self.source_b,
            geographies,
            self.grouping,
            self.year,
            self.theme,
        )
    }
}

/// Everything the UI needs to (re)build its control row after a
/// navigation or fuel-type change.
#[derive(Serialize)]
struct ControlsPayload {
    controls: ControlSet,
    sources: Vec<&'static str>,
    ternary_sources: Vec<&'static str>,
    geographies: Vec<String>,
    default_geographies: Vec<&'static str>,
    multi_geography: bool,
    years: Vec<i32>,
}

fn controls_payload(dataset: &Dataset, nav: NavOption, fuel: FuelType) -> ControlsPayload {
    let table = dataset.table(fuel);
    let (multi, defaults): (bool, Vec<&'static str>) = match filters::geography_cardinality(nav) {
        GeographyCardinality::Single { default } => (false, vec![default]),
        GeographyCardinality::Multi { defaults } => (true, defaults.to_vec()),
        GeographyCardinality::Hidden => (false, Vec::new()),
    };
    ControlsPayload {
        controls: ControlSet::for_nav(nav),
        sources: filters::source_options(nav, fuel),
        ternary_sources: filters::ternary_source_options(fuel),
        geographies: table.geographies().iter().map(|g| g.to_string()).collect(),
        default_geographies: defaults,
        multi_geography: multi,
        years: table.years(),
    }
}

/// Start server, open browser, serve the dashboard.
pub fn start(port: u16, dataset: Dataset) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);
    eprintln!("\n\x1b[1;32m🌍 CDIAC Dashboard\x1b[0m");
    eprintln!("   {}", url);
    if let Some(year) = dataset.latest_year() {
        eprintln!("   Latest year: {}\n", year);
    }

    // Open browser
    let _ = open::that(&url);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &dataset) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn json_response(request: Request, json: String) -> io::Result<()> {
    let response = Response::from_string(json).with_header(
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
    );
    request.respond(response)
}

fn handle_request(mut request: Request, dataset: &Dataset) -> io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let method = request.method().clone();

    match (&method, path) {
        // Serve embedded UI
        (&Method::Get, "/") => {
            let response = Response::from_string(UI_HTML).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap(),
            );
            request.respond(response)
        }

        // API: figure for the current filter state
        (&Method::Get, "/api/figure") | (&Method::Post, "/api/figure") => {
            let params = parse_params(&mut request)?;
            let state = params.into_state();
            eprintln!("→ {:?} {} {:?}", state.nav, state.fuel, state.source);

            let figure = figures::build(dataset, &state);
            let json = serde_json::to_string(&ApiResponse::success(figure))?;
            json_response(request, json)
        }

        // API: control row contents for a (nav, fuel) pair
        (&Method::Get, "/api/controls") => {
            let params = parse_params(&mut request)?;
            let payload = controls_payload(dataset, params.nav, params.fuel);
            let json = serde_json::to_string(&ApiResponse::success(payload))?;
            json_response(request, json)
        }

        // API: flattened table for the browser and the download page
        (&Method::Get, "/api/table") => {
            let params = parse_params(&mut request)?;
            let geography = params.geography.split(';').next().map(str::trim);
            let geography = geography.filter(|g| !g.is_empty());
            let view = export::table_view(dataset.table(params.fuel), geography);
            let json = serde_json::to_string(&ApiResponse::success(view))?;
            json_response(request, json)
        }

        // 404
        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}

fn parse_params(request: &mut Request) -> io::Result<FigureParams> {
    let url = request.url().to_string();

    // Try query string
    if let Some(query) = url.split('?').nth(1) {
        if let Ok(params) = serde_urlencoded::from_str::<FigureParams>(query) {
            return Ok(params);
        }
    }

    // Try JSON body
    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;
    if !body.is_empty() {
        if let Ok(params) = serde_json::from_str::<FigureParams>(&body) {
            return Ok(params);
        }
    }

    Ok(FigureParams::default())
}
