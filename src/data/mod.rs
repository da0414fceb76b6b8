/// Data layer: core types, loading, and selection filtering.
///
/// Architecture:
/// ```text
///  bundled JSON / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (validated)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  states + cities, identifiers
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  search text / selected ids → locations
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

#[cfg(test)]
pub(crate) mod fixtures;
