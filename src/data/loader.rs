use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::model::{
    AdditionalData, Dataset, DatasetMeta, Indices, LocationData, LocationKind, TaxRates,
};

/// Dataset compiled into the binary.
const BUNDLED_DATASET: &str = include_str!("../../data/combined_coli.json");

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse the dataset shipped with the application.
pub fn load_bundled() -> Result<Dataset> {
    parse_json(BUNDLED_DATASET).context("parsing bundled dataset")
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ "meta": {...}, "states": [...], "cities": [...] }`
/// * `.csv`  – one location per row, see [`CsvRecord`]
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    log::debug!("{} validated: {} locations", path.display(), dataset.len());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Dataset> {
    let dataset: Dataset = serde_json::from_str(text).context("parsing JSON")?;
    dataset.validate()?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, one location per row.
///
/// `type,name,code,state,overall,housing,utilities,groceries,transportation,healthcare,miscellaneous`
/// are required columns (`code` / `state` may be empty). The economic
/// indicator columns `incomeTax,propertyTax,salesTax,medianIncome,
/// unemploymentRate,purchasingPower,costPlusRent` are optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRecord {
    #[serde(rename = "type")]
    kind: LocationKind,
    name: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    overall: f64,
    housing: f64,
    utilities: f64,
    groceries: f64,
    transportation: f64,
    healthcare: f64,
    miscellaneous: f64,
    #[serde(default)]
    income_tax: Option<f64>,
    #[serde(default)]
    property_tax: Option<f64>,
    #[serde(default)]
    sales_tax: Option<f64>,
    #[serde(default)]
    median_income: Option<f64>,
    #[serde(default)]
    unemployment_rate: Option<f64>,
    #[serde(default)]
    purchasing_power: Option<f64>,
    #[serde(default)]
    cost_plus_rent: Option<f64>,
}

impl CsvRecord {
    fn into_location(self) -> LocationData {
        let taxes = match (self.income_tax, self.property_tax, self.sales_tax) {
            (Some(income_tax), Some(property_tax), Some(sales_tax)) => Some(TaxRates {
                income_tax,
                property_tax,
                sales_tax,
            }),
            _ => None,
        };
        LocationData {
            code: self.code.filter(|c| !c.trim().is_empty()),
            name: self.name,
            state: self.state.filter(|s| !s.trim().is_empty()),
            kind: self.kind,
            indices: Indices {
                overall: self.overall,
                housing: self.housing,
                utilities: self.utilities,
                groceries: self.groceries,
                transportation: self.transportation,
                healthcare: self.healthcare,
                miscellaneous: self.miscellaneous,
            },
            additional_data: AdditionalData {
                taxes,
                median_income: self.median_income,
                unemployment_rate: self.unemployment_rate,
                purchasing_power: self.purchasing_power,
                cost_plus_rent: self.cost_plus_rent,
            },
        }
    }
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let mut states = Vec::new();
    let mut cities = Vec::new();

    for (row_no, result) in reader.deserialize::<CsvRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let location = record.into_location();
        match location.kind {
            LocationKind::State => states.push(location),
            LocationKind::City => cities.push(location),
        }
    }

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "CSV import".to_string());
    let last_updated = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let dataset = Dataset {
        meta: DatasetMeta {
            source,
            last_updated,
            note: None,
        },
        states,
        cities,
    };
    dataset.validate()?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::IndexFactor;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_bundled_dataset_is_valid() {
        let ds = load_bundled().unwrap();
        assert!(ds.states.len() >= 50);
        assert!(!ds.cities.is_empty());
        for id in ["CA", "TX"] {
            assert!(ds.find(LocationKind::State, id).is_some(), "missing {id}");
        }
        for id in ["New York, NY", "Los Angeles, CA"] {
            assert!(ds.find(LocationKind::City, id).is_some(), "missing {id}");
        }
        assert!(ds.states.iter().all(|s| s.additional_data.taxes.is_some()));
    }

    #[test]
    fn test_load_json_file() {
        let file = write_temp(
            ".json",
            r#"{
                "meta": {"source": "unit", "lastUpdated": "2024-05-01"},
                "states": [
                    {"code": "CA", "name": "California", "type": "state",
                     "indices": {"overall": 142, "housing": 230, "utilities": 120,
                                 "groceries": 110, "transportation": 130,
                                 "healthcare": 105, "miscellaneous": 115}}
                ]
            }"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.meta.source, "unit");
        assert_eq!(ds.states.len(), 1);
        assert!(ds.cities.is_empty());
        assert_eq!(ds.states[0].indices.get(IndexFactor::Housing), 230.0);
    }

    #[test]
    fn test_load_json_rejects_invalid_dataset() {
        let file = write_temp(
            ".json",
            r#"{
                "meta": {"source": "unit", "lastUpdated": "2024-05-01"},
                "states": [
                    {"name": "Nowhere", "type": "state",
                     "indices": {"overall": 1, "housing": 1, "utilities": 1,
                                 "groceries": 1, "transportation": 1,
                                 "healthcare": 1, "miscellaneous": 1}}
                ]
            }"#,
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("no code"));
    }

    #[test]
    fn test_load_csv_file() {
        let file = write_temp(
            ".csv",
            "type,name,code,state,overall,housing,utilities,groceries,transportation,healthcare,miscellaneous,incomeTax,propertyTax,salesTax,medianIncome,unemploymentRate,purchasingPower,costPlusRent\n\
             state,Texas,TX,,92.1,84.5,101.3,92.7,95.9,94.6,95.6,0,1.6,6.25,73035,4.1,,\n\
             city,\"Austin, TX\",,TX,68.4,60.2,65,66.1,61.6,58.1,60.2,,,,,,135.2,64.8\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.states.len(), 1);
        assert_eq!(ds.cities.len(), 1);

        let tx = &ds.states[0];
        assert_eq!(tx.id(), "TX");
        assert_eq!(tx.additional_data.taxes.map(|t| t.sales_tax), Some(6.25));
        assert_eq!(tx.additional_data.purchasing_power, None);

        let austin = &ds.cities[0];
        assert_eq!(austin.code, None);
        assert_eq!(austin.id(), "Austin, TX");
        assert_eq!(austin.state.as_deref(), Some("TX"));
        assert_eq!(austin.additional_data.cost_plus_rent, Some(64.8));
        assert!(austin.additional_data.taxes.is_none());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".xlsx", "");
        assert!(load_file(file.path()).is_err());
    }
}
