use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Index drawn with the given relative weights.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut r = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if r < *w {
                return i;
            }
            r -= w;
        }
        weights.len() - 1
    }
}

/// Faculty → (program, mean GPA) pairs.
const FACULTIES: [(&str, &[(&str, f64)]); 3] = [
    ("FMIPA", &[("Matematika", 3.35), ("Fisika", 3.2), ("Kimia", 3.28)]),
    (
        "FTI",
        &[("Teknik Kimia", 3.3), ("Teknik Fisika", 3.15), ("Teknik Industri", 3.45)],
    ),
    ("SAPPK", &[("Arsitektur", 3.4), ("Perencanaan Wilayah dan Kota", 3.25)]),
];

const JOBS: [&str; 4] = ["Bekerja", "Bekerja dan wiraswasta", "Wirausaha", "Melanjutkan studi"];
const JOB_WEIGHTS: [f64; 4] = [0.7, 0.1, 0.12, 0.08];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut years: Vec<i64> = Vec::new();
    let mut faculties: Vec<&str> = Vec::new();
    let mut programs: Vec<&str> = Vec::new();
    let mut gpas: Vec<f64> = Vec::new();
    let mut jobs: Vec<&str> = Vec::new();

    for year in 2019..=2023 {
        for (faculty, faculty_programs) in FACULTIES {
            for &(program, mean) in faculty_programs {
                let respondents = 20 + (rng.next_u64() % 40) as usize;
                for _ in 0..respondents {
                    let gpa = rng.gauss(mean, 0.3).clamp(1.8, 4.0);
                    years.push(year);
                    faculties.push(faculty);
                    programs.push(program);
                    gpas.push((gpa * 100.0).round() / 100.0);
                    jobs.push(JOBS[rng.weighted(&JOB_WEIGHTS)]);
                }
            }
        }
    }

    // CSV, same header as the tracer study export
    let csv_path = "sample_tracer.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    writer.write_record(["Tahun Survey", "Fakultas", "Prodi", "IP", "Pekerjaan Utama"])?;
    for i in 0..years.len() {
        writer.write_record([
            years[i].to_string(),
            faculties[i].to_string(),
            programs[i].to_string(),
            format!("{:.2}", gpas[i]),
            jobs[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;

    // Parquet with the same columns
    let schema = Arc::new(Schema::new(vec![
        Field::new("Tahun Survey", DataType::Int64, false),
        Field::new("Fakultas", DataType::Utf8, false),
        Field::new("Prodi", DataType::Utf8, false),
        Field::new("IP", DataType::Float64, false),
        Field::new("Pekerjaan Utama", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(years.clone())),
            Arc::new(StringArray::from(faculties)),
            Arc::new(StringArray::from(programs)),
            Arc::new(Float64Array::from(gpas)),
            Arc::new(StringArray::from(jobs)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_tracer.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} respondents to {csv_path} and {parquet_path}",
        years.len()
    );
    Ok(())
}
