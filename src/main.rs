use cdiac_dash::dataset::schema::FuelType;
use cdiac_dash::dataset::Dataset;
use cdiac_dash::export;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "cdiac-dash")]
#[command(author, version, about = "Explore CO₂-emissions statistics from fossil-fuel energy data")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive dashboard in the browser
    Serve {
        /// Path to the emissions workbook (.xlsx)
        data: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },

    /// Export one emissions table to CSV or JSON
    Export {
        /// Path to the emissions workbook (.xlsx)
        data: PathBuf,

        /// Table to export: totals, solids, liquids, gases
        #[arg(long, default_value = "totals", value_parser = parse_fuel)]
        fuel: FuelType,

        /// Keep only this political geography's rows
        #[arg(long)]
        geography: Option<String>,

        /// Output file (.csv, .json); default is a timestamped CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a table excerpt to the terminal
    Table {
        /// Path to the emissions workbook (.xlsx)
        data: PathBuf,

        /// Table to show: totals, solids, liquids, gases
        #[arg(long, default_value = "totals", value_parser = parse_fuel)]
        fuel: FuelType,

        /// Keep only this political geography's rows
        #[arg(long)]
        geography: Option<String>,

        /// Maximum rows to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn parse_fuel(raw: &str) -> Result<FuelType, String> {
    match raw.to_ascii_lowercase().as_str() {
        "totals" | "total" => Ok(FuelType::Totals),
        "solids" | "solid" => Ok(FuelType::Solids),
        "liquids" | "liquid" => Ok(FuelType::Liquids),
        "gases" | "gas" => Ok(FuelType::Gases),
        other => Err(format!(
            "unknown fuel type {:?} (expected totals, solids, liquids, or gases)",
            other
        )),
    }
}

fn load_dataset(path: &PathBuf, quiet: bool) -> Dataset {
    if !quiet {
        eprintln!("Loading {}...", path.display());
    }
    match Dataset::load(path) {
        Ok(dataset) => {
            if !quiet {
                if let Some(year) = dataset.latest_year() {
                    eprintln!("\x1b[32m✓\x1b[0m Loaded four tables, data through {}", year);
                }
            }
            dataset
        }
        Err(e) => {
            eprintln!("\x1b[31m✗\x1b[0m Failed to load dataset: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    match args.command {
        Command::Serve { data, port } => {
            let dataset = load_dataset(&data, args.quiet);
            if let Err(e) = cdiac_dash::serve::start(port, dataset) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }

        Command::Export {
            data,
            fuel,
            geography,
            output,
        } => {
            let dataset = load_dataset(&data, args.quiet);
            let view = export::table_view(dataset.table(fuel), geography.as_deref());
            let output =
                output.unwrap_or_else(|| PathBuf::from(export::default_filename(fuel, "csv")));
            if let Err(e) = export::write(&output, &view) {
                eprintln!("\x1b[31m✗\x1b[0m Export failed: {}", e);
                process::exit(1);
            }
            if !args.quiet {
                eprintln!(
                    "\x1b[32m✓\x1b[0m Wrote {} row(s) to {}",
                    view.rows.len(),
                    output.display()
                );
            }
        }

        Command::Table {
            data,
            fuel,
            geography,
            limit,
        } => {
            let dataset = load_dataset(&data, args.quiet);
            let view = export::table_view(dataset.table(fuel), geography.as_deref());
            print_excerpt(&view, limit);
        }
    }
}

fn print_excerpt(view: &export::TableView, limit: usize) {
    // Wide tables don't fit a terminal; show the key columns plus the
    // first few value columns.
    let shown = view.columns.len().min(4);
    let mut header = format!("{:<40} {:>6}", "Political Geography", "Year");
    for column in &view.columns[..shown] {
        header.push_str(&format!(" {:>24}", truncate(column, 24)));
    }
    println!("{}", header);
    println!("{}", "─".repeat(header.chars().count()));

    for row in view.rows.iter().take(limit) {
        let mut line = format!("{:<40} {:>6}", truncate(&row.geography, 40), row.year);
        for value in row.values.iter().take(shown) {
            match value {
                Some(v) => line.push_str(&format!(" {:>24.3}", v)),
                None => line.push_str(&format!(" {:>24}", "·")),
            }
        }
        println!("{}", line);
    }

    if view.rows.len() > limit {
        println!("… {} more row(s)", view.rows.len() - limit);
    }
}

fn truncate(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        raw.to_string()
    } else {
        let cut: String = raw.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}
