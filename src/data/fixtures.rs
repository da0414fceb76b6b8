//! Small hand-built locations and datasets shared by unit tests.

use super::model::{AdditionalData, Dataset, DatasetMeta, Indices, LocationData, LocationKind};

/// A location whose seven indices all equal `overall`.
pub fn location(kind: LocationKind, code: Option<&str>, name: &str, overall: f64) -> LocationData {
    LocationData {
        code: code.map(str::to_string),
        name: name.to_string(),
        state: None,
        kind,
        indices: Indices {
            overall,
            housing: overall,
            utilities: overall,
            groceries: overall,
            transportation: overall,
            healthcare: overall,
            miscellaneous: overall,
        },
        additional_data: AdditionalData::default(),
    }
}

pub fn state(code: &str, name: &str, overall: f64) -> LocationData {
    location(LocationKind::State, Some(code), name, overall)
}

pub fn city(name: &str, state_code: &str, overall: f64) -> LocationData {
    let mut loc = location(LocationKind::City, None, name, overall);
    loc.state = Some(state_code.to_string());
    loc
}

/// Four states and three cities, enough to exercise selection rules.
pub fn small_dataset() -> Dataset {
    Dataset {
        meta: DatasetMeta {
            source: "fixture".to_string(),
            last_updated: "2024-01-01".to_string(),
            note: None,
        },
        states: vec![
            state("CA", "California", 142.2),
            state("TX", "Texas", 92.1),
            state("NY", "New York", 125.1),
            state("WA", "Washington", 114.6),
        ],
        cities: vec![
            city("New York, NY", "NY", 100.0),
            city("Los Angeles, CA", "CA", 81.0),
            city("Austin, TX", "TX", 68.4),
        ],
    }
}
