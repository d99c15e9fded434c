use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::aggregate::DashboardSummary;
use crate::chart::ChartSpec;
use crate::config::Settings;
use crate::dashboard::render;
use crate::data::filter::{faculty_options, filter, program_options, FilterSpec, Selection};
use crate::data::loader::{load_file, LoadedTable};
use crate::data::model::SurveyTable;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a file is loaded).
    pub table: Option<SurveyTable>,

    /// File the table came from.
    pub source: Option<PathBuf>,

    /// Rows dropped while loading `source`.
    pub skipped_rows: usize,

    /// Current widget selections.
    pub filter: FilterSpec,

    /// Charts for the current filter, rebuilt on every change.
    pub charts: Vec<ChartSpec>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source: None,
            skipped_rows: 0,
            filter: FilterSpec::year(0),
            charts: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Startup state: the configured data file loaded, or empty when none is
    /// configured. A configured file that cannot be loaded is an error.
    pub fn from_settings(settings: &Settings) -> Result<Self, DataError> {
        let mut state = Self::default();
        if let Some(path) = &settings.data_path {
            let loaded = load_file(path)?;
            state.set_table(loaded, path);
        }
        Ok(state)
    }

    /// Load a file and make it the current table. On failure the previous
    /// table is kept and the error is shown in the status line.
    pub fn load_path(&mut self, path: &Path) -> Result<(), DataError> {
        match load_file(path) {
            Ok(loaded) => {
                self.set_table(loaded, path);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded table and reset the filters to the first year.
    pub fn set_table(&mut self, loaded: LoadedTable, path: &Path) {
        let LoadedTable { table, skipped } = loaded;
        let first_year = table.year_range.map(|(lo, _)| lo).unwrap_or_default();

        self.filter = FilterSpec::year(first_year);
        self.table = Some(table);
        self.source = Some(path.to_path_buf());
        self.skipped_rows = skipped;
        self.status_message = (skipped > 0).then(|| format!("{skipped} malformed rows skipped"));
        self.refresh();
    }

    /// Recompute the charts for the current filter.
    pub fn refresh(&mut self) {
        self.charts = match &self.table {
            Some(table) => render(table, &self.filter),
            None => Vec::new(),
        };
    }

    pub fn set_year(&mut self, year: i64) {
        if self.filter.year != year {
            self.filter.year = year;
            self.refresh();
        }
    }

    /// Change faculty; a program outside the new faculty falls back to `All`.
    pub fn set_faculty(&mut self, faculty: Selection) {
        if self.filter.faculty == faculty {
            return;
        }
        self.filter.faculty = faculty;
        if !self.program_options().contains(&self.filter.program) {
            self.filter.program = Selection::All;
        }
        self.refresh();
    }

    pub fn set_program(&mut self, program: Selection) {
        if self.filter.program != program {
            self.filter.program = program;
            self.refresh();
        }
    }

    pub fn faculty_options(&self) -> Vec<Selection> {
        match &self.table {
            Some(table) => faculty_options(table),
            None => vec![Selection::All],
        }
    }

    /// Programs offered for the selected faculty.
    pub fn program_options(&self) -> Vec<Selection> {
        match &self.table {
            Some(table) => program_options(table, &self.filter.faculty),
            None => vec![Selection::All],
        }
    }

    /// Rows passing the current filter.
    pub fn visible_rows(&self) -> usize {
        self.table
            .as_ref()
            .map(|t| filter(t, &self.filter).len())
            .unwrap_or(0)
    }

    /// Aggregations for the current filter.
    pub fn summary(&self) -> Option<DashboardSummary> {
        let table = self.table.as_ref()?;
        Some(DashboardSummary::compute(&filter(table, &self.filter)))
    }

    /// Write the current aggregations as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> anyhow::Result<()> {
        let summary = self.summary().context("no table loaded")?;
        let json = serde_json::to_string_pretty(&summary).context("serialising summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartId;
    use crate::data::model::SurveyRecord;

    fn state() -> AppState {
        let table = SurveyTable::from_records(vec![
            SurveyRecord::new(2021, "FTI", "Teknik Kimia", 3.2, "Bekerja").unwrap(),
            SurveyRecord::new(2020, "FMIPA", "Fisika", 3.6, "Wirausaha").unwrap(),
            SurveyRecord::new(2020, "FTI", "Teknik Fisika", 2.9, "Bekerja").unwrap(),
        ]);
        let mut state = AppState::default();
        state.set_table(LoadedTable { table, skipped: 0 }, Path::new("mem.csv"));
        state
    }

    #[test]
    fn new_table_starts_at_first_year() {
        let s = state();
        assert_eq!(s.filter, FilterSpec::year(2020));
        assert_eq!(s.visible_rows(), 2);
        assert_eq!(s.charts.len(), 4);
        assert!(s.status_message.is_none());
    }

    #[test]
    fn faculty_change_resets_foreign_program() {
        let mut s = state();
        s.set_faculty(Selection::Only("FTI".into()));
        s.set_program(Selection::Only("Teknik Fisika".into()));
        assert_eq!(s.charts.len(), 1);

        s.set_faculty(Selection::Only("FMIPA".into()));
        assert_eq!(s.filter.program, Selection::All);
        assert_eq!(s.charts.last().map(|c| c.id), Some(ChartId::FacultyJobPerProgram));
    }

    #[test]
    fn program_options_follow_faculty() {
        let mut s = state();
        s.set_faculty(Selection::Only("FMIPA".into()));
        assert_eq!(
            s.program_options(),
            vec![Selection::All, Selection::Only("Fisika".into())]
        );
        assert_eq!(s.faculty_options().len(), 3);
    }

    #[test]
    fn year_change_refilters() {
        let mut s = state();
        s.set_year(2021);
        assert_eq!(s.visible_rows(), 1);
        s.set_year(2019);
        assert_eq!(s.visible_rows(), 0);
        assert_eq!(s.summary().unwrap().respondents, 0);
    }

    #[test]
    fn skipped_rows_are_reported() {
        let mut s = AppState::default();
        s.set_table(
            LoadedTable {
                table: SurveyTable::default(),
                skipped: 3,
            },
            Path::new("bad.csv"),
        );
        assert_eq!(s.status_message.as_deref(), Some("3 malformed rows skipped"));
        assert_eq!(s.charts.len(), 4);
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut s = state();
        assert!(s.load_path(Path::new("/definitely/missing.csv")).is_err());
        assert!(s.table.is_some());
        assert!(s.status_message.unwrap().starts_with("Error:"));
    }

    #[test]
    fn startup_without_data_path_is_empty() {
        let s = AppState::from_settings(&Settings::default()).unwrap();
        assert!(s.table.is_none());
        assert!(s.charts.is_empty());
    }

    #[test]
    fn startup_with_unreadable_data_path_fails() {
        let settings = Settings {
            data_path: Some(PathBuf::from("/definitely/missing.csv")),
        };
        match AppState::from_settings(&settings) {
            Err(DataError::DataUnavailable { path, .. }) => {
                assert_eq!(path, PathBuf::from("/definitely/missing.csv"));
            }
            Err(other) => panic!("expected DataUnavailable, got {other:?}"),
            Ok(_) => panic!("startup should fail for a missing file"),
        }
    }

    #[test]
    fn startup_loads_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        std::fs::write(
            &path,
            "Tahun Survey,Fakultas,Prodi,IP,Pekerjaan Utama\n2022,FTI,Teknik Kimia,3.3,Bekerja\n",
        )
        .unwrap();
        let s = AppState::from_settings(&Settings {
            data_path: Some(path.clone()),
        })
        .unwrap();
        assert_eq!(s.source.as_deref(), Some(path.as_path()));
        assert_eq!(s.filter, FilterSpec::year(2022));
        assert_eq!(s.visible_rows(), 1);
    }

    #[test]
    fn export_without_table_fails() {
        let s = AppState::default();
        assert!(s.export_summary(Path::new("unused.json")).is_err());
    }
}
