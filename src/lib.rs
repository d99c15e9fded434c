//! Graduate tracer study dashboard.
//!
//! The library holds everything except the egui front end: loading the
//! survey table, filtering, aggregation, chart specifications and the UI
//! state that drives them. [`dashboard::render`] is the whole pipeline.

pub mod aggregate;
pub mod chart;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod state;

pub use dashboard::render;
pub use data::filter::{filter, FilterSpec, Selection, Subset};
pub use data::loader::{load_file, LoadedTable};
pub use data::model::{GpaCategory, SurveyRecord, SurveyTable};
pub use error::{DataError, RowError};
