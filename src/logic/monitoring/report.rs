//! Drift Report - rendered comparison of the current window vs reference
//!
//! One self-contained file per invocation under the reports directory:
//! `drift_report_<YYYYMMDD_HHMMSS>.<ext>`. Files are created with
//! `create_new`; a name already taken gets a numeric suffix instead of being
//! overwritten.

use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MonitorError;
use super::quality::QualitySummary;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const REPORT_PREFIX: &str = "drift_report";

/// Suffixes tried before giving up on a unique file name
const MAX_NAME_ATTEMPTS: usize = 1000;

// ============================================================================
// FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" | "htm" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format '{}'", other)),
        }
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Drift verdict for one feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDrift {
    pub feature: String,
    pub statistic: String,
    pub threshold: f64,
    pub score: f64,
    pub p_value: Option<f64>,
    pub drifted: bool,
    pub reference_mean: f64,
    pub current_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCount {
    pub label: String,
    pub count: usize,
}

/// What the model answered over the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub class_counts: Vec<ClassCount>,
    pub mean_confidence: f64,
    pub mean_latency_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Name of the drift statistic applied to every feature
    pub method: String,
    pub reference_rows: usize,
    pub current_rows: usize,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    /// True iff at least one feature drifted
    pub dataset_drift: bool,
    pub drifted_features: usize,
    pub drift_share: f64,
    pub features: Vec<FeatureDrift>,
    pub predictions: PredictionSummary,
    pub quality: QualitySummary,
}

// ============================================================================
// WRITING
// ============================================================================

/// Write `report` into `dir`, returns the created path
pub fn write_report(report: &DriftReport, dir: &Path, format: ReportFormat) -> Result<PathBuf, MonitorError> {
    fs::create_dir_all(dir)?;

    let stem = format!(
        "{}_{}",
        REPORT_PREFIX,
        report.generated_at.with_timezone(&Local).format("%Y%m%d_%H%M%S")
    );
    let (path, file) = create_unique(dir, &stem, format.extension())?;

    let written = (|| -> Result<(), MonitorError> {
        let mut writer = BufWriter::new(file);
        match format {
            ReportFormat::Html => writer.write_all(render_html(report).as_bytes())?,
            ReportFormat::Json => serde_json::to_writer_pretty(&mut writer, report)?,
        }
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&path);
        return Err(e);
    }

    Ok(path)
}

fn create_unique(dir: &Path, stem: &str, ext: &str) -> Result<(PathBuf, File), MonitorError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{}.{}", stem, ext)
        } else {
            format!("{}_{}.{}", stem, attempt, ext)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free report name for {} in {}", stem, dir.display()),
    )
    .into())
}

// ============================================================================
// HTML
// ============================================================================

const STYLE: &str = "\
body{font-family:-apple-system,Segoe UI,Helvetica,Arial,sans-serif;margin:2rem;color:#222}\
h1{font-size:1.5rem}h2{font-size:1.15rem;margin-top:2rem}\
table{border-collapse:collapse;min-width:60%}\
th,td{border:1px solid #ddd;padding:.4rem .7rem;text-align:right}\
th:first-child,td:first-child{text-align:left}\
th{background:#f4f4f4}\
.drift{color:#b00020;font-weight:600}.ok{color:#1b7f3b}\
.verdict{padding:.8rem 1rem;border-radius:4px;display:inline-block}\
.verdict.drift{background:#fde7ea}.verdict.ok{background:#e6f4ea}\
.meta{color:#666;font-size:.9rem}";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn verdict(drifted: bool) -> (&'static str, &'static str) {
    if drifted { ("drift", "Drift detected") } else { ("ok", "No drift") }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Self-contained HTML page (inline CSS, no scripts)
pub fn render_html(report: &DriftReport) -> String {
    let mut html = String::new();
    // `write!` into a String cannot fail
    let _ = render_html_into(&mut html, report);
    html
}

fn render_html_into(out: &mut String, report: &DriftReport) -> std::fmt::Result {
    let (class, label) = verdict(report.dataset_drift);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Data Drift Report {}</title>", report.report_id)?;
    writeln!(out, "<style>{}</style></head><body>", STYLE)?;

    writeln!(out, "<h1>Data Drift Report</h1>")?;
    writeln!(
        out,
        "<p class=\"meta\">Report {} &middot; generated {} &middot; method <code>{}</code></p>",
        report.report_id,
        report.generated_at.to_rfc3339(),
        escape(&report.method)
    )?;
    if let (Some(start), Some(end)) = (report.window_start, report.window_end) {
        writeln!(
            out,
            "<p class=\"meta\">Window {} &ndash; {}</p>",
            start.to_rfc3339(),
            end.to_rfc3339()
        )?;
    }
    writeln!(
        out,
        "<p class=\"verdict {}\">{}: {} of {} features drifted ({})</p>",
        class,
        label,
        report.drifted_features,
        report.features.len(),
        percent(report.drift_share)
    )?;
    writeln!(
        out,
        "<p>Reference rows: {} &middot; Current rows: {}</p>",
        report.reference_rows, report.current_rows
    )?;

    // Drift table
    writeln!(out, "<h2>Feature drift</h2>")?;
    writeln!(
        out,
        "<table><tr><th>Feature</th><th>Statistic</th><th>Score</th><th>p-value</th>\
         <th>Threshold</th><th>Reference mean</th><th>Current mean</th><th>Status</th></tr>"
    )?;
    for f in &report.features {
        let (class, label) = verdict(f.drifted);
        let p_value = f.p_value.map(|p| format!("{:.4}", p)).unwrap_or_else(|| "&ndash;".to_string());
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{:.4}</td><td>{}</td><td>{}</td><td>{:.3}</td><td>{:.3}</td>\
             <td class=\"{}\">{}</td></tr>",
            escape(&f.feature),
            escape(&f.statistic),
            f.score,
            p_value,
            f.threshold,
            f.reference_mean,
            f.current_mean,
            class,
            label
        )?;
    }
    writeln!(out, "</table>")?;

    // Predictions
    let p = &report.predictions;
    writeln!(out, "<h2>Predictions</h2>")?;
    writeln!(
        out,
        "<p>Mean confidence: {:.3} &middot; Mean latency: {:.2} ms</p>",
        p.mean_confidence, p.mean_latency_ms
    )?;
    writeln!(out, "<table><tr><th>Class</th><th>Count</th></tr>")?;
    for c in &p.class_counts {
        writeln!(out, "<tr><td>{}</td><td>{}</td></tr>", escape(&c.label), c.count)?;
    }
    writeln!(out, "</table>")?;

    // Quality
    let q = &report.quality;
    writeln!(out, "<h2>Data quality</h2>")?;
    writeln!(
        out,
        "<p>Rows: {} &middot; Duplicate rows: {} ({}) &middot; Submitted: {} &middot; Rejected: {}</p>",
        q.rows,
        q.duplicate_rows,
        percent(q.duplicate_rate),
        q.submitted_records,
        q.rejected_records
    )?;
    writeln!(
        out,
        "<table><tr><th>Feature</th><th>Missing</th><th>Out of range</th>\
         <th>Current min</th><th>Current max</th><th>Current std</th>\
         <th>Reference min</th><th>Reference max</th><th>Reference std</th></tr>"
    )?;
    for f in &q.features {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td>\
             <td>{:.3}</td><td>{:.3}</td><td>{:.3}</td></tr>",
            escape(&f.feature),
            percent(f.missing_rate),
            percent(f.out_of_range_rate),
            f.current.min,
            f.current.max,
            f.current.std,
            f.reference.min,
            f.reference.max,
            f.reference.std
        )?;
    }
    writeln!(out, "</table>")?;

    writeln!(out, "</body></html>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset;
    use crate::logic::monitoring::quality;

    fn sample_report(drifted: bool) -> DriftReport {
        let rows = [[5.0, 3.0, 1.5, 0.2], [6.0, 2.9, 4.5, 1.5]];
        DriftReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            method: "welch_t_test".to_string(),
            reference_rows: 150,
            current_rows: 2,
            window_start: None,
            window_end: None,
            dataset_drift: drifted,
            drifted_features: usize::from(drifted),
            drift_share: if drifted { 0.25 } else { 0.0 },
            features: vec![FeatureDrift {
                feature: "petal_length".to_string(),
                statistic: "welch_t_test".to_string(),
                threshold: 0.05,
                score: 0.4,
                p_value: Some(if drifted { 0.001 } else { 0.6 }),
                drifted,
                reference_mean: 3.758,
                current_mean: 3.0,
            }],
            predictions: PredictionSummary {
                class_counts: vec![ClassCount { label: "<setosa>".to_string(), count: 2 }],
                mean_confidence: 0.9,
                mean_latency_ms: 1.5,
            },
            quality: quality::assess(&dataset::shared(), &rows, &quality::IntakeCounts::default()),
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>(), Ok(ReportFormat::Html));
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default(), ReportFormat::Html);
        assert_eq!(ReportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_html_contents() {
        let html = render_html(&sample_report(true));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Drift detected"));
        assert!(html.contains("petal_length"));
        assert!(html.contains("&lt;setosa&gt;"));
        assert!(!html.contains("<setosa>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<script"));

        assert!(render_html(&sample_report(false)).contains("No drift"));
    }

    #[test]
    fn test_json_report_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(false);
        let path = write_report(&report, dir.path(), ReportFormat::Json).unwrap();

        assert_eq!(path.extension().unwrap(), "json");
        let parsed: DriftReport = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed.report_id, report.report_id);
        assert_eq!(parsed.features, report.features);
    }

    #[test]
    fn test_same_second_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(false);

        let first = write_report(&report, dir.path(), ReportFormat::Html).unwrap();
        let second = write_report(&report, dir.path(), ReportFormat::Html).unwrap();
        let third = write_report(&report, dir.path(), ReportFormat::Html).unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(second.to_string_lossy().ends_with("_1.html"));
        assert!(third.to_string_lossy().ends_with("_2.html"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/reports");
        let path = write_report(&sample_report(true), &nested, ReportFormat::Html).unwrap();
        assert!(path.starts_with(&nested));

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("drift_report_"));
        assert!(name.ends_with(".html"));
    }
}
