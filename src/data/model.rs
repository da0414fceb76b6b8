use std::collections::BTreeSet;
use std::fmt;

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LocationKind – states vs. cities
// ---------------------------------------------------------------------------

/// Which list of the dataset a location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    #[default]
    State,
    City,
}

impl LocationKind {
    /// Value used in share links (`type=state`).
    pub fn as_str(self) -> &'static str {
        match self {
            LocationKind::State => "state",
            LocationKind::City => "city",
        }
    }

    /// Lenient parse: anything other than `state` / `city` is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" => Some(LocationKind::State),
            "city" => Some(LocationKind::City),
            _ => None,
        }
    }

    /// Singular title, e.g. "State".
    pub fn label(self) -> &'static str {
        match self {
            LocationKind::State => "State",
            LocationKind::City => "City",
        }
    }

    /// Lower-case plural, e.g. "cities".
    pub fn plural(self) -> &'static str {
        match self {
            LocationKind::State => "states",
            LocationKind::City => "cities",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IndexFactor / Indices – the seven cost-of-living components
// ---------------------------------------------------------------------------

/// One cost-of-living component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexFactor {
    Overall,
    Housing,
    Utilities,
    Groceries,
    Transportation,
    Healthcare,
    Miscellaneous,
}

impl IndexFactor {
    /// All factors in display order.
    pub const ALL: [IndexFactor; 7] = [
        IndexFactor::Overall,
        IndexFactor::Housing,
        IndexFactor::Utilities,
        IndexFactor::Groceries,
        IndexFactor::Transportation,
        IndexFactor::Healthcare,
        IndexFactor::Miscellaneous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IndexFactor::Overall => "Overall",
            IndexFactor::Housing => "Housing",
            IndexFactor::Utilities => "Utilities",
            IndexFactor::Groceries => "Groceries",
            IndexFactor::Transportation => "Transportation",
            IndexFactor::Healthcare => "Healthcare",
            IndexFactor::Miscellaneous => "Miscellaneous",
        }
    }
}

/// Cost indices of a location, 100 = national average.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Indices {
    pub overall: f64,
    pub housing: f64,
    pub utilities: f64,
    pub groceries: f64,
    pub transportation: f64,
    pub healthcare: f64,
    pub miscellaneous: f64,
}

impl Indices {
    pub fn get(&self, factor: IndexFactor) -> f64 {
        match factor {
            IndexFactor::Overall => self.overall,
            IndexFactor::Housing => self.housing,
            IndexFactor::Utilities => self.utilities,
            IndexFactor::Groceries => self.groceries,
            IndexFactor::Transportation => self.transportation,
            IndexFactor::Healthcare => self.healthcare,
            IndexFactor::Miscellaneous => self.miscellaneous,
        }
    }
}

// ---------------------------------------------------------------------------
// Secondary attributes
// ---------------------------------------------------------------------------

/// State tax rates, all in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRates {
    /// Top marginal state income tax rate.
    pub income_tax: f64,
    /// Average effective property tax rate.
    pub property_tax: f64,
    /// State sales tax rate.
    pub sales_tax: f64,
}

/// Economic indicators. States carry the tax / income / unemployment figures,
/// cities the Numbeo purchasing power and cost-plus-rent indices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<TaxRates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unemployment_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchasing_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_plus_rent: Option<f64>,
}

// ---------------------------------------------------------------------------
// LocationData – one state or city
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    /// Two-letter code; always present for states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Full name ("California" or "Austin, TX").
    pub name: String,
    /// State abbreviation, cities only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub indices: Indices,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

impl LocationData {
    /// Identifier used in selections and share links: the code, else the name.
    pub fn id(&self) -> &str {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => &self.name,
        }
    }

    /// Whether `key` names this location by code or by name.
    pub fn matches(&self, key: &str) -> bool {
        self.code.as_deref() == Some(key) || self.name == key
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    pub source: String,
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub meta: DatasetMeta,
    pub states: Vec<LocationData>,
    #[serde(default)]
    pub cities: Vec<LocationData>,
}

impl Dataset {
    /// All locations of one kind, in dataset order.
    pub fn locations(&self, kind: LocationKind) -> &[LocationData] {
        match kind {
            LocationKind::State => &self.states,
            LocationKind::City => &self.cities,
        }
    }

    /// Identifiers of one kind, in dataset order.
    pub fn identifiers(&self, kind: LocationKind) -> Vec<&str> {
        self.locations(kind).iter().map(LocationData::id).collect()
    }

    /// Look up a location by identifier.
    pub fn find(&self, kind: LocationKind, id: &str) -> Option<&LocationData> {
        self.locations(kind).iter().find(|l| l.id() == id)
    }

    /// Check the structural invariants every consumer relies on.
    pub fn validate(&self) -> Result<()> {
        for kind in [LocationKind::State, LocationKind::City] {
            let mut seen = BTreeSet::new();
            for (i, loc) in self.locations(kind).iter().enumerate() {
                ensure!(
                    !loc.name.trim().is_empty(),
                    "{} entry {i} has an empty name",
                    kind.label()
                );
                if loc.kind != kind {
                    bail!(
                        "'{}' is listed under {} but has type '{}'",
                        loc.name,
                        kind.plural(),
                        loc.kind
                    );
                }
                if kind == LocationKind::State
                    && loc.code.as_deref().map_or(true, |c| c.trim().is_empty())
                {
                    bail!("State '{}' has no code", loc.name);
                }
                for factor in IndexFactor::ALL {
                    let v = loc.indices.get(factor);
                    ensure!(
                        v.is_finite() && v >= 0.0,
                        "'{}': {} index {v} must be a non-negative number",
                        loc.name,
                        factor.label()
                    );
                }
                if !seen.insert(loc.id()) {
                    bail!("Duplicate {} identifier '{}'", kind.as_str(), loc.id());
                }
            }
        }
        Ok(())
    }

    /// Number of locations across both kinds.
    pub fn len(&self) -> usize {
        self.states.len() + self.cities.len()
    }
}

// ---------------------------------------------------------------------------
// ComparisonRow – a location augmented with computed salaries
// ---------------------------------------------------------------------------

/// Comparable salary per factor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComparableByFactor {
    pub overall: f64,
    pub housing: f64,
    pub utilities: f64,
    pub groceries: f64,
    pub transportation: f64,
    pub healthcare: f64,
    pub miscellaneous: f64,
}

impl ComparableByFactor {
    pub fn get(&self, factor: IndexFactor) -> f64 {
        match factor {
            IndexFactor::Overall => self.overall,
            IndexFactor::Housing => self.housing,
            IndexFactor::Utilities => self.utilities,
            IndexFactor::Groceries => self.groceries,
            IndexFactor::Transportation => self.transportation,
            IndexFactor::Healthcare => self.healthcare,
            IndexFactor::Miscellaneous => self.miscellaneous,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    /// Identifier of the location (code, else name).
    pub code: String,
    pub name: String,
    pub indices: Indices,
    pub additional_data: AdditionalData,
    pub comparable_overall: f64,
    pub comparable_by_factor: ComparableByFactor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::location;

    fn dataset(states: Vec<LocationData>, cities: Vec<LocationData>) -> Dataset {
        Dataset {
            meta: DatasetMeta {
                source: "test".into(),
                last_updated: "2024-01-01".into(),
                note: None,
            },
            states,
            cities,
        }
    }

    #[test]
    fn test_id_prefers_code() {
        let ca = location(LocationKind::State, Some("CA"), "California", 140.0);
        assert_eq!(ca.id(), "CA");
        assert!(ca.matches("CA"));
        assert!(ca.matches("California"));

        let austin = location(LocationKind::City, None, "Austin, TX", 100.0);
        assert_eq!(austin.id(), "Austin, TX");

        let blank = location(LocationKind::City, Some(""), "Reno, NV", 100.0);
        assert_eq!(blank.id(), "Reno, NV");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "code": "TX",
            "name": "Texas",
            "type": "state",
            "indices": {"overall": 92.1, "housing": 84.5, "utilities": 101.3,
                        "groceries": 92.7, "transportation": 95.9,
                        "healthcare": 94.6, "miscellaneous": 95.6},
            "additionalData": {
                "taxes": {"incomeTax": 0, "propertyTax": 1.6, "salesTax": 6.25},
                "medianIncome": 73035,
                "unemploymentRate": 4.1
            }
        }"#;
        let loc: LocationData = serde_json::from_str(json).unwrap();
        assert_eq!(loc.kind, LocationKind::State);
        assert_eq!(loc.indices.get(IndexFactor::Housing), 84.5);
        let taxes = loc.additional_data.taxes.unwrap();
        assert_eq!(taxes.sales_tax, 6.25);
        assert_eq!(loc.additional_data.median_income, Some(73035.0));
        assert_eq!(loc.additional_data.purchasing_power, None);
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let ds = dataset(
            vec![location(LocationKind::State, Some("CA"), "California", 140.0)],
            vec![location(LocationKind::City, None, "Austin, TX", 100.0)],
        );
        assert!(ds.validate().is_ok());
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.identifiers(LocationKind::City), vec!["Austin, TX"]);
        assert!(ds.find(LocationKind::State, "CA").is_some());
        assert!(ds.find(LocationKind::City, "CA").is_none());
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let no_code = dataset(vec![location(LocationKind::State, None, "Texas", 90.0)], vec![]);
        assert!(no_code.validate().is_err());

        let dup = dataset(
            vec![
                location(LocationKind::State, Some("CA"), "California", 140.0),
                location(LocationKind::State, Some("CA"), "Cali", 140.0),
            ],
            vec![],
        );
        let err = dup.validate().unwrap_err().to_string();
        assert!(err.contains("Duplicate"), "{err}");

        let negative = dataset(vec![location(LocationKind::State, Some("CA"), "California", -1.0)], vec![]);
        assert!(negative.validate().is_err());

        let nan = dataset(vec![location(LocationKind::State, Some("CA"), "California", f64::NAN)], vec![]);
        assert!(nan.validate().is_err());

        let misplaced = dataset(vec![], vec![location(LocationKind::State, Some("CA"), "California", 140.0)]);
        assert!(misplaced.validate().is_err());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(LocationKind::parse("city"), Some(LocationKind::City));
        assert_eq!(LocationKind::parse(" State "), Some(LocationKind::State));
        assert_eq!(LocationKind::parse("county"), None);
    }
}
