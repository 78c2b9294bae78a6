//! Human-readable terminal rendering of report sections.
//!
//! Sections render through `fmt::Write` so the command layer can print them
//! incrementally as each fetch completes, and tests can capture the output.

use crate::Result;
use crate::coverage::CoverageFileDetail;
use crate::report::aggregate::{HotspotsSection, IssueRecord, IssuesSummary, MetricMap, QualityGateSection, Severity};
use clap::ValueEnum;
use core::fmt::{self, Write};
use owo_colors::OwoColorize;
use std::io::{IsTerminal, stdout};
use strum::IntoEnumIterator;

const SEPARATOR_WIDTH: usize = 40;

/// Control when to use colored output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

#[derive(Copy, Clone)]
enum TextStyle {
    Bold,
    Dimmed,
    Good,
    Bad,
    Warn,
    Note,
}

#[derive(Debug)]
pub struct ConsoleRenderer {
    enabled: bool,
}

impl ConsoleRenderer {
    #[must_use]
    pub fn new(color_mode: ColorMode) -> Self {
        let enabled = matches!(color_mode, ColorMode::Always) || (matches!(color_mode, ColorMode::Auto) && stdout().is_terminal());
        Self { enabled }
    }

    pub fn quality_gate<W: Write>(&self, w: &mut W, section: &QualityGateSection) -> Result<()> {
        self.section_header(w, "Quality Gate")?;

        write!(w, "Status: ")?;
        if section.passed() {
            self.write_styled(w, "PASSED", TextStyle::Good)?;
        } else {
            self.write_styled(w, "FAILED", TextStyle::Bad)?;
        }
        writeln!(w)?;

        for condition in &section.conditions {
            write!(w, "  ")?;
            let style = if condition.status == "OK" { TextStyle::Good } else { TextStyle::Bad };
            self.write_styled(w, &condition.status, style)?;

            write!(w, " {}", condition.metric_key)?;

            if let Some(actual) = &condition.actual_value {
                write!(w, ": {actual}")?;
            }

            if let (Some(comparator), Some(threshold)) = (&condition.comparator, &condition.error_threshold) {
                write!(w, " (threshold {} {threshold})", comparator_symbol(comparator))?;
            }

            writeln!(w)?;
        }

        writeln!(w)?;
        Ok(())
    }

    /// Issue listing, most severe first. `limit` caps how many lines are shown;
    /// the summary counts always reflect the full set.
    pub fn issues<W: Write>(&self, w: &mut W, issues: &[IssueRecord], summary: &IssuesSummary, limit: Option<usize>) -> Result<()> {
        self.section_header(w, "Issues")?;

        if issues.is_empty() {
            writeln!(w, "No unresolved issues.")?;
            writeln!(w)?;
            return Ok(());
        }

        writeln!(w, "Total: {}", summary.total)?;
        self.summary_counts(w, summary)?;
        writeln!(w)?;

        let mut sorted: Vec<_> = issues.iter().collect();
        sorted.sort_by_key(|issue| core::cmp::Reverse(issue.severity));

        let shown = limit.unwrap_or(sorted.len()).min(sorted.len());
        for issue in &sorted[..shown] {
            self.issue_line(w, issue)?;
        }

        if shown < sorted.len() {
            let hidden = sorted.len() - shown;
            self.write_styled(w, &format!("  ... and {hidden} more (pass --all to show everything)"), TextStyle::Dimmed)?;
            writeln!(w)?;
        }

        writeln!(w)?;
        Ok(())
    }

    pub fn hotspots<W: Write>(&self, w: &mut W, section: &HotspotsSection) -> Result<()> {
        self.section_header(w, "Security Hotspots")?;

        if section.hotspots.is_empty() {
            writeln!(w, "No security hotspots.")?;
            writeln!(w)?;
            return Ok(());
        }

        writeln!(w, "Total: {}", section.count)?;
        for hotspot in &section.hotspots {
            write!(w, "  ")?;
            let style = match hotspot.vulnerability_probability.as_str() {
                "HIGH" => TextStyle::Bad,
                "MEDIUM" => TextStyle::Warn,
                _ => TextStyle::Note,
            };
            self.write_styled(w, &format!("[{}]", hotspot.vulnerability_probability), style)?;

            write!(w, " {}", hotspot.file)?;
            if let Some(line) = hotspot.line {
                write!(w, ":{line}")?;
            }

            writeln!(w, ": {} ({})", hotspot.message, hotspot.security_category)?;
        }

        writeln!(w)?;
        Ok(())
    }

    /// One labeled line per metric key, in endpoint order; missing metrics show as n/a.
    pub fn metric_section<W: Write>(&self, w: &mut W, title: &str, keys: &[&str], map: &MetricMap) -> Result<()> {
        self.section_header(w, title)?;

        let width = keys.iter().map(|key| metric_label(key).len()).max().unwrap_or(0);
        for key in keys {
            let label = metric_label(key);
            let value = map.get(key).copied().flatten();
            writeln!(w, "  {label:<width$}  {}", format_metric_value(key, value))?;
        }

        writeln!(w)?;
        Ok(())
    }

    pub fn coverage_detail<W: Write>(&self, w: &mut W, files: &[CoverageFileDetail]) -> Result<()> {
        self.section_header(w, "Files With Uncovered New Lines")?;

        if files.is_empty() {
            writeln!(w, "All new lines are covered.")?;
            writeln!(w)?;
            return Ok(());
        }

        self.write_styled(w, &format!("  {:>9}  {:>8}  {:>8}  File", "Uncovered", "To Cover", "Coverage"), TextStyle::Bold)?;
        writeln!(w)?;

        for file in files {
            let to_cover = file.lines_to_cover.map_or_else(|| "n/a".to_string(), |v| format!("{v:.0}"));
            let coverage = file.coverage.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"));
            writeln!(w, "  {:>9}  {to_cover:>8}  {coverage:>8}  {}", file.uncovered_lines, file.path)?;
        }

        writeln!(w)?;
        Ok(())
    }

    fn issue_line<W: Write>(&self, w: &mut W, issue: &IssueRecord) -> Result<()> {
        write!(w, "  ")?;
        self.write_styled(w, &format!("[{}]", issue.severity), severity_style(issue.severity))?;

        write!(w, " {}", issue.file)?;
        if let Some(line) = issue.line {
            write!(w, ":{line}")?;
        }

        write!(w, ": {}", issue.message)?;
        self.write_styled(w, &format!(" ({})", issue.rule), TextStyle::Dimmed)?;
        writeln!(w)?;
        Ok(())
    }

    fn summary_counts<W: Write>(&self, w: &mut W, summary: &IssuesSummary) -> Result<()> {
        for severity in Severity::iter().rev() {
            let count = summary.count(severity);
            if count == 0 {
                continue;
            }
            write!(w, "  ")?;
            self.write_styled(w, &severity.to_string(), severity_style(severity))?;
            writeln!(w, ": {count}")?;
        }

        Ok(())
    }

    fn section_header<W: Write>(&self, w: &mut W, title: &str) -> Result<()> {
        self.write_styled(w, title, TextStyle::Bold)?;
        writeln!(w)?;
        self.write_styled(w, &"─".repeat(SEPARATOR_WIDTH), TextStyle::Dimmed)?;
        writeln!(w)?;
        Ok(())
    }

    fn write_styled<W: Write>(&self, w: &mut W, text: &str, style: TextStyle) -> fmt::Result {
        if !self.enabled {
            return write!(w, "{text}");
        }

        match style {
            TextStyle::Bold => write!(w, "{}", text.bold()),
            TextStyle::Dimmed => write!(w, "{}", text.dimmed()),
            TextStyle::Good => write!(w, "{}", text.green()),
            TextStyle::Bad => write!(w, "{}", text.red()),
            TextStyle::Warn => write!(w, "{}", text.yellow()),
            TextStyle::Note => write!(w, "{}", text.cyan()),
        }
    }
}

const fn severity_style(severity: Severity) -> TextStyle {
    match severity {
        Severity::Blocker | Severity::Critical => TextStyle::Bad,
        Severity::Major => TextStyle::Warn,
        Severity::Minor => TextStyle::Note,
        Severity::Info => TextStyle::Dimmed,
    }
}

fn comparator_symbol(comparator: &str) -> &str {
    match comparator {
        "GT" => ">",
        "LT" => "<",
        other => other,
    }
}

fn metric_label(key: &str) -> &'static str {
    match key {
        "new_duplicated_lines_density" | "duplicated_lines_density" => "Duplicated lines density",
        "new_duplicated_lines" => "Duplicated lines",
        "new_duplicated_blocks" => "Duplicated blocks",
        "new_coverage" | "coverage" => "Coverage",
        "new_lines_to_cover" => "Lines to cover",
        "new_uncovered_lines" => "Uncovered lines",
        "bugs" => "Bugs",
        "vulnerabilities" => "Vulnerabilities",
        "code_smells" => "Code smells",
        "line_coverage" => "Line coverage",
        "complexity" => "Cyclomatic complexity",
        "cognitive_complexity" => "Cognitive complexity",
        "reliability_rating" => "Reliability rating",
        "security_rating" => "Security rating",
        "sqale_rating" => "Maintainability rating",
        "ncloc" => "Lines of code",
        "sqale_index" => "Technical debt",
        _ => "Metric",
    }
}

/// Formats a metric value for display: percentages for densities and coverage,
/// letter grades for ratings, a work duration for technical debt, and n/a for
/// metrics the service did not return.
fn format_metric_value(key: &str, value: Option<f64>) -> String {
    let Some(value) = value else {
        return "n/a".to_string();
    };

    if key.ends_with("_rating") {
        return rating_letter(value).to_string();
    }

    if key == "sqale_index" {
        return format_work_duration(value);
    }

    if key.ends_with("coverage") || key.ends_with("density") {
        return format!("{value:.1}%");
    }

    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

const fn rating_letter(value: f64) -> char {
    if value <= 1.0 {
        'A'
    } else if value <= 2.0 {
        'B'
    } else if value <= 3.0 {
        'C'
    } else if value <= 4.0 {
        'D'
    } else {
        'E'
    }
}

/// Renders minutes of technical debt using the service's 8-hour workday convention.
fn format_work_duration(minutes: f64) -> String {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "debt is a non-negative minute count")]
    let total = minutes.max(0.0).round() as u64;

    const MINUTES_PER_HOUR: u64 = 60;
    const MINUTES_PER_DAY: u64 = 8 * MINUTES_PER_HOUR;

    if total >= MINUTES_PER_DAY {
        format!("{}d {}h", total / MINUTES_PER_DAY, (total % MINUTES_PER_DAY) / MINUTES_PER_HOUR)
    } else if total >= MINUTES_PER_HOUR {
        format!("{}h {}min", total / MINUTES_PER_HOUR, total % MINUTES_PER_HOUR)
    } else {
        format!("{total}min")
    }
}
