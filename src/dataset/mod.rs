//! Dataset loading
//!
//! Loads the CDIAC national sectoral workbook once at startup: four
//! emissions sheets (`TOTAL`, `SOLID FUELS`, `LIQUID FUELS`, `GAS FUELS`)
//! plus the region lookup sheet. Everything here is a startup precondition:
//! a missing file, missing sheet, or unrecognized layout is a configuration
//! error, reported as a typed [`LoadError`] and never retried.
//!
//! After load the dataset is immutable. Transforms borrow it; nothing
//! mutates it, so any number of concurrent readers are safe.

pub mod regions;
pub mod schema;
pub mod table;

pub use regions::{Region, RegionLookup};
pub use schema::FuelType;
pub use table::{EmissionsTable, Row};

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// Sheet holding the geography -> world region assignments.
pub const REGION_SHEET: &str = "REGIONS";

/// The four emissions tables and the region lookup, loaded once.
#[derive(Debug, Clone)]
pub struct Dataset {
    totals: EmissionsTable,
    solids: EmissionsTable,
    liquids: EmissionsTable,
    gases: EmissionsTable,
    regions: RegionLookup,
}

impl Dataset {
    /// Load the workbook at `path`. Fatal on any missing sheet or layout
    /// mismatch - the caller is expected to exit, not recover.
    pub fn load(path: &Path) -> Result<Dataset, LoadError> {
        let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            detail: source.to_string(),
        })?;

        let mut sheet = |name: &str| -> Result<Range<Data>, LoadError> {
            workbook
                .worksheet_range(name)
                .map_err(|_| LoadError::MissingSheet(name.to_string()))
        };

        let totals = parse_sheet(&sheet(FuelType::Totals.sheet_name())?, FuelType::Totals)?;
        let solids = parse_sheet(&sheet(FuelType::Solids.sheet_name())?, FuelType::Solids)?;
        let liquids = parse_sheet(&sheet(FuelType::Liquids.sheet_name())?, FuelType::Liquids)?;
        let gases = parse_sheet(&sheet(FuelType::Gases.sheet_name())?, FuelType::Gases)?;
        let regions = parse_regions(&sheet(REGION_SHEET)?)?;

        Ok(Dataset {
            totals,
            solids,
            liquids,
            gases,
            regions,
        })
    }

    /// Assemble a dataset from already-built parts. Used by tests and by
    /// anything that wants to feed the transforms synthetic tables.
    pub fn from_parts(
        totals: EmissionsTable,
        solids: EmissionsTable,
        liquids: EmissionsTable,
        gases: EmissionsTable,
        regions: RegionLookup,
    ) -> Dataset {
        Dataset {
            totals,
            solids,
            liquids,
            gases,
            regions,
        }
    }

    pub fn table(&self, fuel: FuelType) -> &EmissionsTable {
        match fuel {
            FuelType::Totals => &self.totals,
            FuelType::Solids => &self.solids,
            FuelType::Liquids => &self.liquids,
            FuelType::Gases => &self.gases,
        }
    }

    pub fn regions(&self) -> &RegionLookup {
        &self.regions
    }

    /// Latest year across all four tables; the default for year-pinned
    /// views (sunbursts, the atlas slider's initial frame).
    pub fn latest_year(&self) -> Option<i32> {
        FuelType::ALL
            .iter()
            .filter_map(|f| self.table(*f).latest_year())
            .max()
    }
}

/// Startup data-load failure. Unrecoverable by design.
#[derive(Debug)]
pub enum LoadError {
    /// The workbook could not be opened at all.
    Open { path: PathBuf, detail: String },
    /// A required sheet is absent from the workbook.
    MissingSheet(String),
    /// A sheet exists but its layout does not match the expected schema.
    Layout { sheet: String, detail: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Open { path, detail } => {
                write!(f, "cannot open workbook {}: {}", path.display(), detail)
            }
            LoadError::MissingSheet(name) => write!(f, "required sheet '{}' not found", name),
            LoadError::Layout { sheet, detail } => {
                write!(f, "sheet '{}' has an unexpected layout: {}", sheet, detail)
            }
        }
    }
}

impl Error for LoadError {}

fn layout_error(fuel_sheet: &str, detail: impl Into<String>) -> LoadError {
    LoadError::Layout {
        sheet: fuel_sheet.to_string(),
        detail: detail.into(),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => Some(*v),
        Data::Int(v) => Some(*v as f64),
        // Some releases store numbers as text; anything non-numeric is an
        // absent observation, which is distinct from zero downstream.
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_sheet(range: &Range<Data>, fuel: FuelType) -> Result<EmissionsTable, LoadError> {
    let sheet = fuel.sheet_name();
    let mut rows = range.rows();

    let header = rows
        .next()
        .ok_or_else(|| layout_error(sheet, "sheet is empty"))?;
    if header.len() < 2 {
        return Err(layout_error(sheet, "missing key and year columns"));
    }

    let key = cell_text(&header[0]);
    schema::normalize_key_header(&key)
        .ok_or_else(|| layout_error(sheet, format!("unrecognized key column '{}'", key)))?;

    let year_header = cell_text(&header[1]);
    if !year_header.eq_ignore_ascii_case(schema::YEAR) {
        return Err(layout_error(
            sheet,
            format!("expected '{}' column, found '{}'", schema::YEAR, year_header),
        ));
    }

    // Value columns are named positionally: the canonical schema replaces
    // whatever era-specific headers the sheet carries.
    let expected = fuel.columns().len();
    let found = header.len() - 2;
    if found != expected {
        return Err(layout_error(
            sheet,
            format!("expected {} value columns, found {}", expected, found),
        ));
    }

    let mut parsed = Vec::new();
    for row in rows {
        let geography = cell_text(&row[0]);
        if geography.is_empty() {
            continue;
        }
        let year = match cell_number(&row[1]) {
            Some(y) => y as i32,
            None => continue,
        };
        let values = (2..header.len())
            .map(|i| row.get(i).and_then(cell_number))
            .collect();
        parsed.push(Row {
            geography,
            year,
            values,
        });
    }

    Ok(EmissionsTable::from_rows(fuel, parsed))
}

fn parse_regions(range: &Range<Data>) -> Result<RegionLookup, LoadError> {
    let mut rows = range.rows();

    let header = rows
        .next()
        .ok_or_else(|| layout_error(REGION_SHEET, "sheet is empty"))?;
    if header.len() < 2 {
        return Err(layout_error(REGION_SHEET, "missing lookup columns"));
    }
    let key = cell_text(&header[0]);
    schema::normalize_key_header(&key)
        .ok_or_else(|| layout_error(REGION_SHEET, format!("unrecognized key column '{}'", key)))?;

    let pairs = rows.filter_map(|row| {
        let geography = cell_text(&row[0]);
        if geography.is_empty() {
            return None;
        }
        let region = Region::parse(&cell_text(&row[1]));
        Some((geography, region))
    });

    Ok(RegionLookup::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;

    // ==========================================================================
    // SHEET PARSING TESTS
    // ==========================================================================
    //
    // Built on in-memory calamine ranges; no workbook fixture needed. The
    // load-failure paths (missing file, missing sheet) are the fatal
    // startup preconditions and must produce typed errors, not panics.
    // ==========================================================================

    fn range_from(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (y, row) in rows.into_iter().enumerate() {
            for (x, cell) in row.into_iter().enumerate() {
                range.set_value((y as u32, x as u32), cell);
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn solid_header(key: &str) -> Vec<Data> {
        let mut h = vec![s(key), s("Year")];
        h.extend(schema::PHASE_COLUMNS.iter().map(|c| s(c)));
        h
    }

    #[test]
    fn parses_rows_with_nation_era_header() {
        let mut data_row = vec![s("UNITED STATES OF AMERICA"), Data::Float(2020.0)];
        data_row.extend((0..schema::PHASE_COLUMNS.len()).map(|i| Data::Float(i as f64)));

        let range = range_from(vec![solid_header("Nation"), data_row]);
        let table = parse_sheet(&range, FuelType::Solids).unwrap();

        assert_eq!(table.rows().len(), 1);
        assert_eq!(
            table.value("UNITED STATES OF AMERICA", 2020, schema::ENERGY_SUPPLY),
            Some(0.0)
        );
    }

    #[test]
    fn parses_rows_with_political_geography_era_header() {
        let mut data_row = vec![s("FRANCE"), Data::Int(2019)];
        data_row.extend((0..schema::PHASE_COLUMNS.len()).map(|_| Data::Empty));

        let range = range_from(vec![solid_header("Political Geography"), data_row]);
        let table = parse_sheet(&range, FuelType::Solids).unwrap();

        // All-empty value cells load as absent observations, not zeros.
        assert_eq!(table.value("FRANCE", 2019, schema::TRANSPORT), None);
    }

    #[test]
    fn rejects_unknown_key_header() {
        let range = range_from(vec![solid_header("Country")]);
        let err = parse_sheet(&range, FuelType::Solids).unwrap_err();
        assert!(matches!(err, LoadError::Layout { .. }));
    }

    #[test]
    fn rejects_wrong_value_column_count() {
        let range = range_from(vec![vec![s("Nation"), s("Year"), s("Only Column")]]);
        let err = parse_sheet(&range, FuelType::Solids).unwrap_err();
        assert!(matches!(err, LoadError::Layout { .. }));
    }

    #[test]
    fn numeric_text_cells_parse_and_junk_becomes_null() {
        let mut data_row = vec![s("CANADA"), Data::Float(2018.0)];
        data_row.push(s("123.5")); // Energy Supply Total, stored as text
        data_row.push(s("n/a")); // Energy Consumption Total, junk
        data_row.extend((2..schema::PHASE_COLUMNS.len()).map(|_| Data::Empty));

        let range = range_from(vec![solid_header("Nation"), data_row]);
        let table = parse_sheet(&range, FuelType::Solids).unwrap();

        assert_eq!(table.value("CANADA", 2018, schema::ENERGY_SUPPLY), Some(123.5));
        assert_eq!(table.value("CANADA", 2018, schema::ENERGY_CONSUMPTION), None);
    }

    #[test]
    fn region_sheet_parses_into_lookup() {
        let range = range_from(vec![
            vec![s("Political Geography"), s("REGION")],
            vec![s("FRANCE"), s("EUROPE")],
            vec![s("WORLD"), s("WORLD")],
            vec![s("RHODESIA-NYASALAND"), s("")],
        ]);
        let lookup = parse_regions(&range).unwrap();

        assert_eq!(lookup.region_of("FRANCE"), Region::Europe);
        assert_eq!(lookup.region_of("WORLD"), Region::World);
        assert_eq!(lookup.region_of("RHODESIA-NYASALAND"), Region::None);
        assert_eq!(lookup.len(), 3);
    }

    #[test]
    fn missing_workbook_is_a_typed_open_error() {
        let err = Dataset::load(Path::new("/nonexistent/sectoral.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        // Display output is what the operator sees at startup.
        assert!(err.to_string().contains("sectoral.xlsx"));
    }
}
