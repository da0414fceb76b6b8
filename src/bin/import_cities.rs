//! Convert a Numbeo "cost of living rankings" CSV export into the dataset's
//! city format.
//!
//! ```text
//! import_cities --input rankings.csv --output cities.json [--merge-into data/combined_coli.json]
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

/// Major US cities to keep from the rankings table.
const MAJOR_CITIES: [&str; 50] = [
    "New York, NY",
    "Los Angeles, CA",
    "Chicago, IL",
    "Houston, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "San Antonio, TX",
    "San Diego, CA",
    "Dallas, TX",
    "San Jose, CA",
    "Austin, TX",
    "Jacksonville, FL",
    "Fort Worth, TX",
    "Columbus, OH",
    "Charlotte, NC",
    "San Francisco, CA",
    "Indianapolis, IN",
    "Seattle, WA",
    "Denver, CO",
    "Boston, MA",
    "El Paso, TX",
    "Detroit, MI",
    "Nashville, TN",
    "Portland, OR",
    "Memphis, TN",
    "Oklahoma City, OK",
    "Las Vegas, NV",
    "Louisville, KY",
    "Baltimore, MD",
    "Milwaukee, WI",
    "Albuquerque, NM",
    "Tucson, AZ",
    "Fresno, CA",
    "Sacramento, CA",
    "Mesa, AZ",
    "Kansas City, MO",
    "Atlanta, GA",
    "Long Beach, CA",
    "Colorado Springs, CO",
    "Raleigh, NC",
    "Miami, FL",
    "Virginia Beach, VA",
    "Omaha, NE",
    "Oakland, CA",
    "Minneapolis, MN",
    "Tulsa, OK",
    "Arlington, TX",
    "Tampa, FL",
    "New Orleans, LA",
    "Wichita, KS",
];

const US_SUFFIX: &str = ", United States";

#[derive(Parser, Debug)]
#[command(name = "import_cities", about = "Import Numbeo city indices into a COLI dataset")]
struct Cli {
    /// Numbeo rankings CSV export
    #[arg(long)]
    input: PathBuf,

    /// Dataset JSON to write
    #[arg(long)]
    output: PathBuf,

    /// Existing dataset whose states (and note) are carried over
    #[arg(long)]
    merge_into: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Input / output records
// ---------------------------------------------------------------------------

/// One row of the rankings table.
#[derive(Debug, Deserialize)]
struct RankingRow {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Cost of Living Index")]
    cost_of_living: f64,
    #[serde(rename = "Rent Index")]
    rent: f64,
    #[serde(rename = "Cost of Living Plus Rent Index")]
    cost_plus_rent: f64,
    #[serde(rename = "Groceries Index")]
    groceries: f64,
    #[serde(rename = "Local Purchasing Power Index")]
    purchasing_power: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct CityIndices {
    overall: f64,
    housing: f64,
    utilities: f64,
    groceries: f64,
    transportation: f64,
    healthcare: f64,
    miscellaneous: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct CityAdditionalData {
    purchasing_power: f64,
    cost_plus_rent: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct CityRecord {
    name: String,
    state: String,
    #[serde(rename = "type")]
    kind: &'static str,
    indices: CityIndices,
    additional_data: CityAdditionalData,
}

// ---------------------------------------------------------------------------
// Matching and conversion
// ---------------------------------------------------------------------------

/// City part of "Austin, TX" / "Austin, TX, United States", lower-cased.
fn base_name(name: &str) -> String {
    name.split(',').next().unwrap_or("").trim().to_lowercase()
}

/// Loose match against the major city list: equal base names, or one
/// containing the other.
fn is_major_city(numbeo_name: &str) -> bool {
    let numbeo = base_name(numbeo_name);
    if numbeo.is_empty() {
        return false;
    }
    MAJOR_CITIES.iter().any(|city| {
        let wanted = base_name(city);
        wanted == numbeo || numbeo.contains(&wanted) || wanted.contains(&numbeo)
    })
}

/// Convert a US rankings row; `None` for foreign or non-major cities.
///
/// Numbeo has no utilities / transportation / healthcare / miscellaneous
/// components, so those are approximated from the overall index.
fn convert_row(row: &RankingRow) -> Option<CityRecord> {
    let name = row.city.trim().strip_suffix(US_SUFFIX)?.trim().to_string();
    if !is_major_city(&name) {
        return None;
    }
    let state = name
        .split(',')
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string();
    let overall = row.cost_of_living;
    Some(CityRecord {
        name,
        state,
        kind: "city",
        indices: CityIndices {
            overall,
            housing: row.rent,
            utilities: (overall * 0.95).round(),
            groceries: row.groceries,
            transportation: (overall * 0.90).round(),
            healthcare: (overall * 0.85).round(),
            miscellaneous: (overall * 0.88).round(),
        },
        additional_data: CityAdditionalData {
            purchasing_power: row.purchasing_power,
            cost_plus_rent: row.cost_plus_rent,
        },
    })
}

fn read_rankings(path: &Path) -> Result<Vec<CityRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut cities = Vec::new();
    for (row_no, result) in reader.deserialize::<RankingRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if let Some(city) = convert_row(&row) {
            cities.push(city);
        }
    }
    Ok(cities)
}

/// Dataset JSON: new meta and cities, states taken from `base` if given.
fn build_dataset(cities: Vec<CityRecord>, base: Option<JsonValue>, timestamp: &str) -> Result<JsonValue> {
    let (states, note) = match base {
        Some(base) => {
            let states = base
                .get("states")
                .cloned()
                .context("merge target has no 'states' array")?;
            let note = base.pointer("/meta/note").cloned();
            (states, note)
        }
        None => (json!([]), None),
    };

    let mut meta = json!({
        "source": "Numbeo",
        "lastUpdated": timestamp,
    });
    if let Some(note) = note {
        meta["note"] = note;
    }

    Ok(json!({
        "meta": meta,
        "states": states,
        "cities": cities,
    }))
}

/// Import the rankings and write the dataset; returns the number of cities.
/// Nothing is written when no major US city matches.
fn run(cli: &Cli) -> Result<usize> {
    log::info!("Reading rankings from {}", cli.input.display());
    let cities = read_rankings(&cli.input)?;
    if cities.is_empty() {
        bail!("No major US cities found in {}", cli.input.display());
    }

    let base = match &cli.merge_into {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Some(serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?)
        }
        None => None,
    };

    let count = cities.len();
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let dataset = build_dataset(cities, base, &timestamp)?;

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &dataset).context("writing dataset")?;

    log::info!("Wrote {count} cities to {}", cli.output.display());
    Ok(count)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let count = run(&cli)?;
    println!("Imported {count} cities into {}", cli.output.display());
    Ok(())
}
