/// Data layer: record types, row transforms and body parsers.
///
/// Architecture:
/// ```text
///  .tsv / .csv / .json body (fetched by `source`)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  Delimited / GraphJson → parse body
///   └──────────┘
///        │  rows
///        ▼
///   ┌───────────┐
///   │ transform  │  copy row, coerce declared fields
///   └───────────┘
///        │
///        ▼
///   Dataset (Vec<Record>)  |  Graph { nodes, links }
/// ```

pub mod loader;
pub mod model;
pub mod transform;
