use std::fmt;

use super::model::{SurveyRecord, SurveyTable};

// ---------------------------------------------------------------------------
// Filter predicate: year + optional faculty + optional program
// ---------------------------------------------------------------------------

/// Label shown for [`Selection::All`] in the filter widgets.
pub const ALL_LABEL: &str = "All";

/// A dropdown choice: either every value or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Whether `value` passes this selection.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

/// The full filter. Predicates are ANDed; the year is always an exact match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    pub year: i64,
    pub faculty: Selection,
    pub program: Selection,
}

impl FilterSpec {
    /// Only the year constrained.
    pub fn year(year: i64) -> Self {
        FilterSpec {
            year,
            faculty: Selection::All,
            program: Selection::All,
        }
    }

    pub fn matches(&self, rec: &SurveyRecord) -> bool {
        rec.survey_year == self.year
            && self.faculty.matches(&rec.faculty)
            && self.program.matches(&rec.program)
    }
}

// ---------------------------------------------------------------------------
// Subset – borrowed view of the rows passing a filter
// ---------------------------------------------------------------------------

/// Ordered view over the records of a [`SurveyTable`].
#[derive(Debug, Clone, Default)]
pub struct Subset<'a> {
    rows: Vec<&'a SurveyRecord>,
}

impl<'a> Subset<'a> {
    /// Every record of the table, in table order.
    pub fn all(table: &'a SurveyTable) -> Self {
        Subset {
            rows: table.records.iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SurveyRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows of one faculty, order preserved.
    pub fn restrict_faculty(&self, faculty: &str) -> Subset<'a> {
        Subset {
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|r| r.faculty == faculty)
                .collect(),
        }
    }
}

/// Return the rows of `table` passing `spec`, in table order.
pub fn filter<'a>(table: &'a SurveyTable, spec: &FilterSpec) -> Subset<'a> {
    Subset {
        rows: table.records.iter().filter(|r| spec.matches(r)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Dropdown options
// ---------------------------------------------------------------------------

/// Faculty choices: `All` followed by the sorted faculties.
pub fn faculty_options(table: &SurveyTable) -> Vec<Selection> {
    std::iter::once(Selection::All)
        .chain(table.faculties.iter().cloned().map(Selection::Only))
        .collect()
}

/// Program choices: `All` followed by the sorted programs of `faculty`
/// (every program when the faculty is `All`).
pub fn program_options(table: &SurveyTable, faculty: &Selection) -> Vec<Selection> {
    let programs: Vec<String> = match faculty {
        Selection::All => table.all_programs().into_iter().collect(),
        Selection::Only(f) => table
            .programs_by_faculty
            .get(f)
            .map(|p| p.iter().cloned().collect())
            .unwrap_or_default(),
    };
    std::iter::once(Selection::All)
        .chain(programs.into_iter().map(Selection::Only))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SurveyTable {
        SurveyTable::from_records(vec![
            SurveyRecord::new(2020, "FTI", "Teknik Kimia", 3.2, "Bekerja").unwrap(),
            SurveyRecord::new(2020, "FMIPA", "Fisika", 3.6, "Wirausaha").unwrap(),
            SurveyRecord::new(2021, "FTI", "Teknik Kimia", 2.4, "Bekerja").unwrap(),
            SurveyRecord::new(2020, "FTI", "Teknik Fisika", 2.9, "Bekerja").unwrap(),
        ])
    }

    #[test]
    fn year_only_keeps_matching_rows_in_order() {
        let t = table();
        let subset = filter(&t, &FilterSpec::year(2020));
        let programs: Vec<_> = subset.iter().map(|r| r.program.as_str()).collect();
        assert_eq!(programs, ["Teknik Kimia", "Fisika", "Teknik Fisika"]);
    }

    #[test]
    fn predicates_are_anded() {
        let t = table();
        let spec = FilterSpec {
            year: 2020,
            faculty: Selection::Only("FTI".into()),
            program: Selection::Only("Teknik Fisika".into()),
        };
        let subset = filter(&t, &spec);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset.iter().next().unwrap().gpa, 2.9);
    }

    #[test]
    fn inconsistent_faculty_and_program_is_empty() {
        let t = table();
        let spec = FilterSpec {
            year: 2020,
            faculty: Selection::Only("FMIPA".into()),
            program: Selection::Only("Teknik Kimia".into()),
        };
        assert!(filter(&t, &spec).is_empty());
    }

    #[test]
    fn unknown_year_is_empty() {
        let t = table();
        assert!(filter(&t, &FilterSpec::year(1999)).is_empty());
    }

    #[test]
    fn restrict_faculty() {
        let t = table();
        let subset = filter(&t, &FilterSpec::year(2020)).restrict_faculty("FTI");
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.faculty == "FTI"));
    }

    #[test]
    fn options_follow_faculty() {
        let t = table();
        assert_eq!(
            faculty_options(&t),
            vec![
                Selection::All,
                Selection::Only("FMIPA".into()),
                Selection::Only("FTI".into()),
            ]
        );
        assert_eq!(program_options(&t, &Selection::All).len(), 4);
        assert_eq!(
            program_options(&t, &Selection::Only("FTI".into())),
            vec![
                Selection::All,
                Selection::Only("Teknik Fisika".into()),
                Selection::Only("Teknik Kimia".into()),
            ]
        );
        assert_eq!(
            program_options(&t, &Selection::Only("SAPPK".into())),
            vec![Selection::All]
        );
    }

    #[test]
    fn selection_display() {
        assert_eq!(Selection::All.to_string(), "All");
        assert_eq!(Selection::Only("FTI".into()).to_string(), "FTI");
    }
}
