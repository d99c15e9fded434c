//! Properties of the filter → aggregate → chart pipeline over random tables.

use proptest::prelude::*;

use tracer_dashboard::aggregate::{
    gpa_by_category, gpa_by_program, job_counts, job_share_by_program, DashboardSummary,
};
use tracer_dashboard::{filter, render, FilterSpec, Selection, SurveyRecord, SurveyTable};

const FACULTIES: [&str; 3] = ["FMIPA", "FTI", "SAPPK"];
const PROGRAMS: [&str; 4] = ["Fisika", "Teknik Kimia", "Arsitektur", "Matematika"];
const JOBS: [&str; 5] = [
    "Bekerja",
    "Bekerja dan wiraswasta",
    "Wirausaha",
    "Melanjutkan studi",
    "Belum bekerja",
];

fn record() -> impl Strategy<Value = SurveyRecord> {
    (2019i64..=2022, 0..FACULTIES.len(), 0..PROGRAMS.len(), 0u32..=400, 0..JOBS.len()).prop_map(
        |(year, f, p, gpa, j)| {
            SurveyRecord::new(year, FACULTIES[f], PROGRAMS[p], gpa as f64 / 100.0, JOBS[j])
                .unwrap()
        },
    )
}

fn table() -> impl Strategy<Value = SurveyTable> {
    prop::collection::vec(record(), 0..60).prop_map(SurveyTable::from_records)
}

fn selection(values: &'static [&'static str]) -> impl Strategy<Value = Selection> {
    prop_oneof![
        Just(Selection::All),
        (0..values.len()).prop_map(move |i| Selection::Only(values[i].to_string())),
    ]
}

fn filter_spec() -> impl Strategy<Value = FilterSpec> {
    (2018i64..=2023, selection(&FACULTIES), selection(&PROGRAMS)).prop_map(
        |(year, faculty, program)| FilterSpec {
            year,
            faculty,
            program,
        },
    )
}

proptest! {
    #[test]
    fn category_counts_cover_every_row(t in table(), spec in filter_spec()) {
        let subset = filter(&t, &spec);
        let counts = gpa_by_category(&subset);
        prop_assert_eq!(counts.entries.len(), 4);
        prop_assert_eq!(counts.total(), subset.len());
    }

    #[test]
    fn sentinel_filters_reduce_to_year(t in table(), year in 2018i64..=2023) {
        let subset = filter(&t, &FilterSpec::year(year));
        let expected: Vec<&SurveyRecord> =
            t.records.iter().filter(|r| r.survey_year == year).collect();
        let got: Vec<&SurveyRecord> = subset.iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn job_shares_sum_to_hundred(t in table(), spec in filter_spec()) {
        let subset = filter(&t, &spec);
        let matrix = job_share_by_program(&subset);
        for row in &matrix.rows {
            prop_assert!(row.total > 0);
            let sum: f64 = row.shares.values().sum();
            prop_assert!((sum - 100.0).abs() <= 0.1, "{} sums to {}", row.program, sum);
        }
        let programs_present = gpa_by_program(&subset).len();
        prop_assert_eq!(matrix.rows.len(), programs_present);
        for w in matrix.rows.windows(2) {
            prop_assert!(w[0].total <= w[1].total);
        }
    }

    #[test]
    fn program_means_ascend_and_sizes_add_up(t in table(), spec in filter_spec()) {
        let subset = filter(&t, &spec);
        let programs = gpa_by_program(&subset);
        for w in programs.windows(2) {
            prop_assert!(w[0].mean_gpa <= w[1].mean_gpa);
        }
        prop_assert_eq!(programs.iter().map(|p| p.count).sum::<usize>(), subset.len());
        prop_assert_eq!(
            job_counts(&subset).iter().map(|j| j.count).sum::<usize>(),
            subset.len()
        );
    }

    #[test]
    fn pipeline_is_idempotent(t in table(), spec in filter_spec()) {
        let first = serde_json::to_string(&DashboardSummary::compute(&filter(&t, &spec))).unwrap();
        let second = serde_json::to_string(&DashboardSummary::compute(&filter(&t, &spec))).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(render(&t, &spec), render(&t, &spec));
    }
}
