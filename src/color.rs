use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

/// GPA distribution bars and box plot.
pub const GPA_DISTRIBUTION: Color32 = Color32::from_rgb(0xc8, 0x47, 0x81);
/// GPA-per-program bars.
pub const GPA_PER_PROGRAM: Color32 = Color32::from_rgb(0x56, 0x61, 0xd2);

/// Job labels with a pinned colour.
pub const KNOWN_JOBS: [(&str, Color32); 3] = [
    ("Bekerja", Color32::from_rgb(0x56, 0x61, 0xd2)),
    ("Bekerja dan wiraswasta", Color32::from_rgb(0xff, 0xcd, 0x46)),
    ("Wirausaha", Color32::from_rgb(0xf6, 0xab, 0xbf)),
];

// ---------------------------------------------------------------------------
// Color mapping: job label → Color32
// ---------------------------------------------------------------------------

/// Colours for job labels.
///
/// Known labels use [`KNOWN_JOBS`]. Every other label reuses the same three
/// colours, `KNOWN_JOBS[i % 3]`, where `i` is its position among the unknown
/// labels in the order they were given.
#[derive(Debug, Clone)]
pub struct JobPalette {
    mapping: Vec<(String, Color32)>,
    default_color: Color32,
}

impl JobPalette {
    /// Build the palette for `jobs`, which must be in first-seen order.
    pub fn new<S: AsRef<str>>(jobs: &[S]) -> Self {
        let mut unknown = 0;
        let mut mapping = Vec::with_capacity(jobs.len());

        for job in jobs {
            let job = job.as_ref();
            if mapping.iter().any(|(j, _): &(String, Color32)| j == job) {
                continue;
            }
            let color = match KNOWN_JOBS.iter().find(|(known, _)| *known == job) {
                Some((_, c)) => *c,
                None => {
                    let (_, c) = KNOWN_JOBS[unknown % KNOWN_JOBS.len()];
                    unknown += 1;
                    c
                }
            };
            mapping.push((job.to_string(), color));
        }

        JobPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a job label.
    pub fn color_for(&self, job: &str) -> Color32 {
        self.mapping
            .iter()
            .find(|(j, _)| j == job)
            .map(|(_, c)| *c)
            .unwrap_or(self.default_color)
    }
}
