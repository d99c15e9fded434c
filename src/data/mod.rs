/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SurveyTable (malformed rows skipped)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ SurveyTable │  Vec<SurveyRecord> (GPA binned), faculty/program index
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year ∧ faculty ∧ program → Subset
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
