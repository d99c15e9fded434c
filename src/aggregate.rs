//! Grouped statistics behind every chart.
//!
//! All functions are total: an empty [`Subset`] yields zero counts or empty
//! collections, never an error.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::data::filter::Subset;
use crate::data::model::GpaCategory;

// ---------------------------------------------------------------------------
// GPA categories
// ---------------------------------------------------------------------------

/// Respondent count per GPA category, always all four in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub entries: [(GpaCategory, usize); 4],
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GpaCategory, usize)> + '_ {
        self.entries.iter().copied()
    }
}

pub fn gpa_by_category(subset: &Subset<'_>) -> CategoryCounts {
    let mut entries = GpaCategory::ALL.map(|c| (c, 0));
    for rec in subset.iter() {
        entries[rec.gpa_category.index()].1 += 1;
    }
    CategoryCounts { entries }
}

// ---------------------------------------------------------------------------
// GPA per program
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramGpa {
    pub program: String,
    pub mean_gpa: f64,
    pub count: usize,
}

impl ProgramGpa {
    /// Axis label, `"{program} [{count}]"`.
    pub fn label(&self) -> String {
        format!("{} [{}]", self.program, self.count)
    }
}

/// Mean GPA and sample size per program, ascending by mean.
/// Equal means are ordered by program name.
pub fn gpa_by_program(subset: &Subset<'_>) -> Vec<ProgramGpa> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in subset.iter() {
        let entry = groups.entry(rec.program.as_str()).or_insert((0.0, 0));
        entry.0 += rec.gpa;
        entry.1 += 1;
    }

    let mut out: Vec<ProgramGpa> = groups
        .into_iter()
        .map(|(program, (sum, count))| ProgramGpa {
            program: program.to_string(),
            mean_gpa: sum / count as f64,
            count,
        })
        .collect();
    // Stable sort keeps the name order from the BTreeMap on ties.
    out.sort_by(|a, b| a.mean_gpa.total_cmp(&b.mean_gpa));
    out
}

// ---------------------------------------------------------------------------
// Job distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCount {
    pub job: String,
    pub count: usize,
}

/// Distinct job labels in order of first appearance.
pub fn jobs_first_seen(subset: &Subset<'_>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for rec in subset.iter() {
        if !seen.iter().any(|j| *j == rec.primary_job) {
            seen.push(rec.primary_job.clone());
        }
    }
    seen
}

/// Respondents per job label, descending by count; ties keep first-seen order.
pub fn job_counts(subset: &Subset<'_>) -> Vec<JobCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<JobCount> = Vec::new();
    for rec in subset.iter() {
        match position.get(rec.primary_job.as_str()) {
            Some(&i) => out[i].count += 1,
            None => {
                position.insert(rec.primary_job.as_str(), out.len());
                out.push(JobCount {
                    job: rec.primary_job.clone(),
                    count: 1,
                });
            }
        }
    }
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

// ---------------------------------------------------------------------------
// Job share per program
// ---------------------------------------------------------------------------

/// One program row of the job cross-tabulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramJobShare {
    pub program: String,
    /// Respondents in this program.
    pub total: usize,
    /// Job label → percentage of `total`; only jobs present in the program.
    pub shares: BTreeMap<String, f64>,
}

impl ProgramJobShare {
    /// Percentage for `job`, 0 when nobody in the program reported it.
    pub fn percent(&self, job: &str) -> f64 {
        self.shares.get(job).copied().unwrap_or(0.0)
    }

    /// Axis label, `"{program} [{total}]"`.
    pub fn label(&self) -> String {
        format!("{} [{}]", self.program, self.total)
    }
}

/// Program × job percentage matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobShareMatrix {
    /// Every job label of the subset, first-seen order.
    pub jobs: Vec<String>,
    /// Rows ascending by respondent total, ties by program name.
    pub rows: Vec<ProgramJobShare>,
}

impl JobShareMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn job_share_by_program(subset: &Subset<'_>) -> JobShareMatrix {
    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for rec in subset.iter() {
        *counts
            .entry(rec.program.as_str())
            .or_default()
            .entry(rec.primary_job.as_str())
            .or_default() += 1;
    }

    let mut rows: Vec<ProgramJobShare> = counts
        .into_iter()
        .map(|(program, jobs)| {
            let total: usize = jobs.values().sum();
            let shares = jobs
                .into_iter()
                .map(|(job, n)| (job.to_string(), n as f64 / total as f64 * 100.0))
                .collect();
            ProgramJobShare {
                program: program.to_string(),
                total,
                shares,
            }
        })
        .collect();
    rows.sort_by_key(|r| r.total);

    JobShareMatrix {
        jobs: jobs_first_seen(subset),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Box plot summary
// ---------------------------------------------------------------------------

/// Five-number summary of the GPA values, with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn gpa_summary(subset: &Subset<'_>) -> Option<GpaSummary> {
    let mut values: Vec<f64> = subset.iter().map(|r| r.gpa).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let q1 = quantile(&values, 0.25);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let min = values[0];
    let max = values[values.len() - 1];
    Some(GpaSummary {
        count: values.len(),
        mean: values.iter().sum::<f64>() / values.len() as f64,
        min,
        q1,
        median: quantile(&values, 0.5),
        q3,
        max,
        lower_whisker: values.iter().copied().find(|&v| v >= low_fence).unwrap_or(min),
        upper_whisker: values
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(max),
    })
}

// ---------------------------------------------------------------------------
// Everything at once
// ---------------------------------------------------------------------------

/// All aggregations for one subset, serialisable for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub respondents: usize,
    pub gpa_categories: CategoryCounts,
    pub gpa_summary: Option<GpaSummary>,
    pub gpa_by_program: Vec<ProgramGpa>,
    pub job_counts: Vec<JobCount>,
    pub job_share_by_program: JobShareMatrix,
}

impl DashboardSummary {
    pub fn compute(subset: &Subset<'_>) -> Self {
        DashboardSummary {
            respondents: subset.len(),
            gpa_categories: gpa_by_category(subset),
            gpa_summary: gpa_summary(subset),
            gpa_by_program: gpa_by_program(subset),
            job_counts: job_counts(subset),
            job_share_by_program: job_share_by_program(subset),
        }
    }
}
