use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::RowError;

// ---------------------------------------------------------------------------
// Column names of the tracer study export
// ---------------------------------------------------------------------------

pub const COL_YEAR: &str = "Tahun Survey";
/// English header accepted for the year column.
pub const COL_YEAR_ALIAS: &str = "Survey Year";
pub const COL_FACULTY: &str = "Fakultas";
pub const COL_PROGRAM: &str = "Prodi";
pub const COL_GPA: &str = "IP";
pub const COL_JOB: &str = "Pekerjaan Utama";

pub const GPA_MIN: f64 = 0.0;
pub const GPA_MAX: f64 = 4.0;

// ---------------------------------------------------------------------------
// GpaCategory – binned GPA
// ---------------------------------------------------------------------------

/// GPA bucket. Bins are `[0, 2.5]`, `(2.5, 3.0]`, `(3.0, 3.5]`, `(3.5, 4.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GpaCategory {
    #[serde(rename = "<2.50")]
    Below250,
    #[serde(rename = "2.50-3.00")]
    From250To300,
    #[serde(rename = "3.00-3.50")]
    From300To350,
    #[serde(rename = "3.50-4.00")]
    From350To400,
}

impl GpaCategory {
    /// Display order, lowest bucket first.
    pub const ALL: [GpaCategory; 4] = [
        GpaCategory::Below250,
        GpaCategory::From250To300,
        GpaCategory::From300To350,
        GpaCategory::From350To400,
    ];

    /// Bin a GPA. Returns `None` for values off the 0–4 scale (or NaN).
    pub fn from_gpa(gpa: f64) -> Option<Self> {
        if !(GPA_MIN..=GPA_MAX).contains(&gpa) {
            return None;
        }
        let category = if gpa <= 2.5 {
            GpaCategory::Below250
        } else if gpa <= 3.0 {
            GpaCategory::From250To300
        } else if gpa <= 3.5 {
            GpaCategory::From300To350
        } else {
            GpaCategory::From350To400
        };
        Some(category)
    }

    pub fn label(self) -> &'static str {
        match self {
            GpaCategory::Below250 => "<2.50",
            GpaCategory::From250To300 => "2.50-3.00",
            GpaCategory::From300To350 => "3.00-3.50",
            GpaCategory::From350To400 => "3.50-4.00",
        }
    }

    /// Position in [`GpaCategory::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GpaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SurveyRecord – one respondent row
// ---------------------------------------------------------------------------

/// One respondent of one survey year.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub survey_year: i64,
    pub faculty: String,
    pub program: String,
    pub gpa: f64,
    pub primary_job: String,
    /// Derived from `gpa` when the record is built.
    pub gpa_category: GpaCategory,
}

impl SurveyRecord {
    /// Build a record, binning the GPA. Off-scale GPAs are rejected.
    pub fn new(
        survey_year: i64,
        faculty: impl Into<String>,
        program: impl Into<String>,
        gpa: f64,
        primary_job: impl Into<String>,
    ) -> Result<Self, RowError> {
        let gpa_category = GpaCategory::from_gpa(gpa).ok_or(RowError::GpaOutOfRange(gpa))?;
        Ok(SurveyRecord {
            survey_year,
            faculty: faculty.into(),
            program: program.into(),
            gpa,
            primary_job: primary_job.into(),
            gpa_category,
        })
    }
}

// ---------------------------------------------------------------------------
// SurveyTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded table with pre-computed indices for the filter widgets.
#[derive(Debug, Clone, Default)]
pub struct SurveyTable {
    /// All records in file order.
    pub records: Vec<SurveyRecord>,
    /// Sorted distinct faculties.
    pub faculties: BTreeSet<String>,
    /// Faculty → sorted distinct programs.
    pub programs_by_faculty: BTreeMap<String, BTreeSet<String>>,
    /// Smallest and largest survey year, `None` when empty.
    pub year_range: Option<(i64, i64)>,
}

impl SurveyTable {
    /// Build the indices from the loaded records.
    pub fn from_records(records: Vec<SurveyRecord>) -> Self {
        let mut faculties = BTreeSet::new();
        let mut programs_by_faculty: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut year_range: Option<(i64, i64)> = None;

        for rec in &records {
            faculties.insert(rec.faculty.clone());
            programs_by_faculty
                .entry(rec.faculty.clone())
                .or_default()
                .insert(rec.program.clone());
            year_range = Some(match year_range {
                None => (rec.survey_year, rec.survey_year),
                Some((lo, hi)) => (lo.min(rec.survey_year), hi.max(rec.survey_year)),
            });
        }

        SurveyTable {
            records,
            faculties,
            programs_by_faculty,
            year_range,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct programs across all faculties.
    pub fn all_programs(&self) -> BTreeSet<String> {
        self.programs_by_faculty
            .values()
            .flat_map(|programs| programs.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_are_closed_on_the_right() {
        assert_eq!(GpaCategory::from_gpa(0.0), Some(GpaCategory::Below250));
        assert_eq!(GpaCategory::from_gpa(2.5), Some(GpaCategory::Below250));
        assert_eq!(GpaCategory::from_gpa(2.51), Some(GpaCategory::From250To300));
        assert_eq!(GpaCategory::from_gpa(3.0), Some(GpaCategory::From250To300));
        assert_eq!(GpaCategory::from_gpa(3.5), Some(GpaCategory::From300To350));
        assert_eq!(GpaCategory::from_gpa(3.51), Some(GpaCategory::From350To400));
        assert_eq!(GpaCategory::from_gpa(4.0), Some(GpaCategory::From350To400));
    }

    #[test]
    fn off_scale_gpa_has_no_category() {
        assert_eq!(GpaCategory::from_gpa(-0.01), None);
        assert_eq!(GpaCategory::from_gpa(4.01), None);
        assert_eq!(GpaCategory::from_gpa(f64::NAN), None);
        assert!(matches!(
            SurveyRecord::new(2020, "A", "X", 4.2, "Bekerja"),
            Err(RowError::GpaOutOfRange(_))
        ));
    }

    #[test]
    fn labels_follow_display_order() {
        let labels: Vec<_> = GpaCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["<2.50", "2.50-3.00", "3.00-3.50", "3.50-4.00"]);
        for (i, c) in GpaCategory::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn table_indices() {
        let table = SurveyTable::from_records(vec![
            SurveyRecord::new(2021, "FTI", "Teknik Kimia", 3.1, "Bekerja").unwrap(),
            SurveyRecord::new(2019, "FMIPA", "Fisika", 3.4, "Wirausaha").unwrap(),
            SurveyRecord::new(2020, "FTI", "Teknik Fisika", 2.9, "Bekerja").unwrap(),
        ]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.year_range, Some((2019, 2021)));
        assert_eq!(
            table.faculties.iter().collect::<Vec<_>>(),
            ["FMIPA", "FTI"]
        );
        assert_eq!(
            table.programs_by_faculty["FTI"].iter().collect::<Vec<_>>(),
            ["Teknik Fisika", "Teknik Kimia"]
        );
        assert_eq!(table.all_programs().len(), 3);
        assert!(SurveyTable::from_records(Vec::new()).year_range.is_none());
    }
}
