//! Chart specifications built from aggregation results.
//!
//! A [`ChartSpec`] is plain data: the GUI decides how to draw it, this module
//! only fixes the encodings (kind, axes, colours, labels, height).

use eframe::egui::Color32;

use crate::aggregate::{
    gpa_by_category, gpa_by_program, gpa_summary, job_counts, job_share_by_program, GpaSummary,
};
use crate::color::{self, JobPalette};
use crate::data::filter::Subset;

/// Height of the GPA distribution row.
pub const GPA_DISTRIBUTION_HEIGHT: f32 = 400.0;
/// Height per program bar in the GPA-per-program chart.
pub const HEIGHT_PER_PROGRAM: f32 = 75.0;
pub const JOB_DISTRIBUTION_HEIGHT: f32 = 450.0;
pub const JOB_PER_PROGRAM_HEIGHT: f32 = 800.0;

// ---------------------------------------------------------------------------
// Spec types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    GpaDistribution,
    GpaPerProgram,
    JobDistribution,
    JobPerProgram,
    /// GPA per program restricted to the selected faculty.
    FacultyGpaPerProgram,
    /// Job share per program restricted to the selected faculty.
    FacultyJobPerProgram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Box,
    Pie,
    StackedBar,
}

/// One chart panel of the dashboard. Most charts have a single panel; the
/// GPA distribution pairs a bar panel with a box panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    /// Layout hint in display units.
    pub height: f32,
    pub panels: Vec<Panel>,
    /// Share of the row width taken by each panel.
    pub column_widths: Vec<f32>,
}

impl ChartSpec {
    fn single(id: ChartId, title: &str, height: f32, panel: Panel) -> Self {
        ChartSpec {
            id,
            title: title.to_string(),
            height,
            panels: vec![panel],
            column_widths: vec![1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Bar(BarPanel),
    Box(BoxPanel),
    Pie(PiePanel),
    StackedBar(StackedBarPanel),
}

impl Panel {
    pub fn kind(&self) -> ChartKind {
        match self {
            Panel::Bar(_) => ChartKind::Bar,
            Panel::Box(_) => ChartKind::Box,
            Panel::Pie(_) => ChartKind::Pie,
            Panel::StackedBar(_) => ChartKind::StackedBar,
        }
    }
}

/// Axis bindings of a cartesian panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axes {
    pub subtitle: Option<String>,
    pub x_title: String,
    pub y_title: String,
    pub x_range: Option<(f64, f64)>,
}

/// Horizontal bars, one colour. Bars are listed bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPanel {
    pub axes: Axes,
    pub bars: Vec<BarItem>,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
    /// Text drawn inside the bar.
    pub text: Option<String>,
}

/// Vertical box plot with every point drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPanel {
    pub axes: Axes,
    pub name: String,
    pub summary: Option<GpaSummary>,
    pub points: Vec<f64>,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiePanel {
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub percent: f64,
    pub color: Color32,
}

impl PieSlice {
    /// Slice text: value and percent.
    pub fn text(&self) -> String {
        format!("{} ({:.1}%)", self.value, self.percent)
    }
}

/// Horizontal bars stacked per category. `series[i].values[j]` belongs to
/// `categories[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBarPanel {
    pub axes: Axes,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color32,
    pub values: Vec<f64>,
    pub texts: Vec<String>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// GPA category bars next to a GPA box plot.
pub fn gpa_distribution(subset: &Subset<'_>) -> ChartSpec {
    let counts = gpa_by_category(subset);
    let bars = counts
        .iter()
        .map(|(category, n)| BarItem {
            label: category.label().to_string(),
            value: n as f64,
            text: None,
        })
        .collect();

    let bar = BarPanel {
        axes: Axes {
            subtitle: Some("Distribusi IPK".into()),
            x_title: "Jumlah".into(),
            y_title: "Kategori IPK".into(),
            x_range: None,
        },
        bars,
        color: color::GPA_DISTRIBUTION,
    };
    let boxplot = BoxPanel {
        axes: Axes {
            subtitle: Some("Boxplot IPK".into()),
            ..Axes::default()
        },
        name: "IPK".into(),
        summary: gpa_summary(subset),
        points: subset.iter().map(|r| r.gpa).collect(),
        color: color::GPA_DISTRIBUTION,
    };

    ChartSpec {
        id: ChartId::GpaDistribution,
        title: "Analisis Distribusi IPK".into(),
        height: GPA_DISTRIBUTION_HEIGHT,
        panels: vec![Panel::Bar(bar), Panel::Box(boxplot)],
        column_widths: vec![0.7, 0.3],
    }
}

/// Mean GPA per program, lowest mean at the bottom. Height grows with the
/// number of programs.
pub fn gpa_per_program(id: ChartId, subset: &Subset<'_>) -> ChartSpec {
    let programs = gpa_by_program(subset);

    let x_range = match (programs.first(), programs.last()) {
        (Some(lo), Some(hi)) => Some((lo.mean_gpa - 0.1, hi.mean_gpa + 0.1)),
        _ => None,
    };
    let height = programs.len() as f32 * HEIGHT_PER_PROGRAM;
    let bars = programs
        .iter()
        .map(|p| BarItem {
            label: p.label(),
            value: p.mean_gpa,
            text: Some(format!("{:.2}", p.mean_gpa)),
        })
        .collect();

    let panel = BarPanel {
        axes: Axes {
            subtitle: None,
            x_title: "Rata-Rata IP".into(),
            y_title: "Program Studi [Jumlah Data]".into(),
            x_range,
        },
        bars,
        color: color::GPA_PER_PROGRAM,
    };
    ChartSpec::single(id, "Indeks Prestasi per Program Studi", height, Panel::Bar(panel))
}

/// Pie of respondents per job label.
pub fn job_distribution(subset: &Subset<'_>, palette: &JobPalette) -> ChartSpec {
    let counts = job_counts(subset);
    let total = subset.len();
    let slices = counts
        .into_iter()
        .map(|jc| PieSlice {
            color: palette.color_for(&jc.job),
            percent: jc.count as f64 / total as f64 * 100.0,
            value: jc.count,
            label: jc.job,
        })
        .collect();

    ChartSpec::single(
        ChartId::JobDistribution,
        "Distribusi Pekerjaan Utama",
        JOB_DISTRIBUTION_HEIGHT,
        Panel::Pie(PiePanel { slices }),
    )
}

/// Job shares stacked per program, smallest program at the bottom.
pub fn job_per_program(id: ChartId, subset: &Subset<'_>, palette: &JobPalette) -> ChartSpec {
    let matrix = job_share_by_program(subset);
    let categories = matrix.rows.iter().map(|r| r.label()).collect();
    let series = matrix
        .jobs
        .iter()
        .map(|job| {
            let values: Vec<f64> = matrix.rows.iter().map(|r| r.percent(job)).collect();
            Series {
                name: job.clone(),
                color: palette.color_for(job),
                texts: values.iter().map(|v| format!("{v:.1}%")).collect(),
                values,
            }
        })
        .collect();

    let panel = StackedBarPanel {
        axes: Axes {
            subtitle: None,
            x_title: "Persentase (%)".into(),
            y_title: "Prodi [Jumlah Data]".into(),
            x_range: Some((0.0, 100.0)),
        },
        categories,
        series,
    };
    ChartSpec::single(
        id,
        "Pekerjaan Utama per Prodi",
        JOB_PER_PROGRAM_HEIGHT,
        Panel::StackedBar(panel),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::jobs_first_seen;
    use crate::data::model::{SurveyRecord, SurveyTable};

    fn table() -> SurveyTable {
        SurveyTable::from_records(vec![
            SurveyRecord::new(2020, "A", "X", 2.2, "Bekerja").unwrap(),
            SurveyRecord::new(2020, "A", "X", 3.8, "Wirausaha").unwrap(),
            SurveyRecord::new(2020, "A", "Y", 3.1, "Melanjutkan studi").unwrap(),
        ])
    }

    #[test]
    fn gpa_distribution_has_bar_and_box() {
        let t = table();
        let spec = gpa_distribution(&Subset::all(&t));
        let kinds: Vec<_> = spec.panels.iter().map(Panel::kind).collect();
        assert_eq!(kinds, [ChartKind::Bar, ChartKind::Box]);
        assert_eq!(spec.height, GPA_DISTRIBUTION_HEIGHT);
        let Panel::Bar(bar) = &spec.panels[0] else { panic!("expected bars") };
        let labels: Vec<_> = bar.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["<2.50", "2.50-3.00", "3.00-3.50", "3.50-4.00"]);
        assert_eq!(bar.bars[2].value, 1.0);
        assert_eq!(bar.color, color::GPA_DISTRIBUTION);
    }

    #[test]
    fn gpa_per_program_height_and_labels() {
        let t = table();
        let spec = gpa_per_program(ChartId::GpaPerProgram, &Subset::all(&t));
        assert_eq!(spec.height, 2.0 * 75.0);
        let Panel::Bar(bar) = &spec.panels[0] else { panic!("expected bars") };
        assert_eq!(bar.bars[0].label, "X [2]");
        assert_eq!(bar.bars[0].text.as_deref(), Some("3.00"));
        assert_eq!(bar.bars[1].label, "Y [1]");
        let (lo, hi) = bar.axes.x_range.unwrap();
        assert!((lo - 2.9).abs() < 1e-9 && (hi - 3.2).abs() < 1e-9);
    }

    #[test]
    fn empty_subset_builds_empty_charts() {
        let empty = Subset::default();
        let palette = JobPalette::new::<String>(&[]);
        let spec = gpa_per_program(ChartId::GpaPerProgram, &empty);
        assert_eq!(spec.height, 0.0);
        let Panel::Bar(bar) = &spec.panels[0] else { panic!("expected bars") };
        assert!(bar.bars.is_empty() && bar.axes.x_range.is_none());

        let spec = job_distribution(&empty, &palette);
        let Panel::Pie(pie) = &spec.panels[0] else { panic!("expected pie") };
        assert!(pie.slices.is_empty());

        let spec = job_per_program(ChartId::JobPerProgram, &empty, &palette);
        let Panel::StackedBar(stack) = &spec.panels[0] else { panic!("expected stacked bars") };
        assert!(stack.categories.is_empty() && stack.series.is_empty());
    }

    #[test]
    fn stacked_series_follow_first_seen_jobs() {
        let t = table();
        let subset = Subset::all(&t);
        let palette = JobPalette::new(&jobs_first_seen(&subset));
        let spec = job_per_program(ChartId::JobPerProgram, &subset, &palette);
        let Panel::StackedBar(stack) = &spec.panels[0] else { panic!("expected stacked bars") };
        assert_eq!(stack.categories, ["Y [1]", "X [2]"]);
        let names: Vec<_> = stack.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Bekerja", "Wirausaha", "Melanjutkan studi"]);
        assert_eq!(stack.series[0].values, [0.0, 50.0]);
        assert_eq!(stack.series[0].texts, ["0.0%", "50.0%"]);
        assert_eq!(stack.series[0].color, palette.color_for("Bekerja"));
    }

    #[test]
    fn pie_percentages() {
        let t = table();
        let subset = Subset::all(&t);
        let palette = JobPalette::new(&jobs_first_seen(&subset));
        let spec = job_distribution(&subset, &palette);
        let Panel::Pie(pie) = &spec.panels[0] else { panic!("expected pie") };
        let total: f64 = pie.slices.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(pie.slices[0].text(), "1 (33.3%)");
    }
}
