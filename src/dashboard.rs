use crate::aggregate::jobs_first_seen;
use crate::chart::{self, ChartId, ChartSpec};
use crate::color::JobPalette;
use crate::data::filter::{filter, FilterSpec, Selection};
use crate::data::model::SurveyTable;

/// Run the whole pipeline for one filter: filter → aggregate → chart specs.
///
/// Charts come back in display order:
/// 1. GPA distribution and box plot
/// 2. when every program is shown: GPA per program, job pie, job per program
/// 3. when one faculty is chosen and every program is shown: the two
///    per-program charts again, restricted to that faculty
pub fn render(table: &SurveyTable, spec: &FilterSpec) -> Vec<ChartSpec> {
    let subset = filter(table, spec);
    let palette = JobPalette::new(&jobs_first_seen(&subset));

    let mut charts = vec![chart::gpa_distribution(&subset)];

    if spec.program.is_all() {
        charts.push(chart::gpa_per_program(ChartId::GpaPerProgram, &subset));
        charts.push(chart::job_distribution(&subset, &palette));
        charts.push(chart::job_per_program(ChartId::JobPerProgram, &subset, &palette));

        if let Selection::Only(faculty) = &spec.faculty {
            let in_faculty = subset.restrict_faculty(faculty);
            charts.push(chart::gpa_per_program(
                ChartId::FacultyGpaPerProgram,
                &in_faculty,
            ));
            charts.push(chart::job_per_program(
                ChartId::FacultyJobPerProgram,
                &in_faculty,
                &palette,
            ));
        }
    }

    log::debug!(
        "Rendered {} charts for {:?} ({} of {} rows)",
        charts.len(),
        spec,
        subset.len(),
        table.len()
    );
    charts
}
