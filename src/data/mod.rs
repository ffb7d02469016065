/// Data layer: core types, loading, filtering and sorting.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json  (file or URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + decode → text
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  text → Vec<Row> (+ record errors)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  rows, schema (first row's keys), distinct values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │ ──▶ │   sort   │  → visible row indices
///   └──────────┘     └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  column descriptors + rows for the table widget
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod parser;
pub mod schema;
pub mod sort;
pub mod view;
