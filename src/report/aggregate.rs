//! The structures a finished report is made of, shaped for JSON serialization.
//!
//! Metric maps hold canonical-metric-name → nullable number; `None` means the
//! service did not return that metric, which is deliberately distinct from a
//! value of zero.

use crate::api::types::{Hotspot, Issue, QualityGateCondition, QualityGateResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const LOG_TARGET: &str = " aggregate";

/// Canonical metric name → value, `None` when the service returned no data.
pub type MetricMap = BTreeMap<&'static str, Option<f64>>;

/// The five severity levels, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    /// Buckets a raw severity string. Unrecognized values land in the lowest
    /// bucket with a warning rather than being silently reclassified.
    #[must_use]
    pub fn bucket(raw: &str) -> Self {
        match raw {
            "INFO" => Self::Info,
            "MINOR" => Self::Minor,
            "MAJOR" => Self::Major,
            "CRITICAL" => Self::Critical,
            "BLOCKER" => Self::Blocker,
            other => {
                log::warn!(target: LOG_TARGET, "unrecognized severity '{other}', treating as INFO");
                Self::Info
            }
        }
    }
}

/// Report metadata: what was analyzed and when the report was generated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub project_key: String,
    pub organization: Option<String>,
    pub branch: Option<String>,
    pub pull_request: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Quality gate verdict plus its threshold conditions, passed through unchanged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateSection {
    pub status: String,
    pub conditions: Vec<QualityGateCondition>,
}

impl QualityGateSection {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == "OK"
    }
}

impl From<QualityGateResponse> for QualityGateSection {
    fn from(response: QualityGateResponse) -> Self {
        Self {
            status: response.project_status.status,
            conditions: response.project_status.conditions,
        }
    }
}

/// An issue with its component key normalized to a project-relative path and its
/// severity bucketed; everything else passes through.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub key: String,
    pub rule: String,
    pub severity: Severity,
    pub file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    pub message: String,

    #[serde(rename = "type")]
    pub issue_type: String,

    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl IssueRecord {
    #[must_use]
    pub fn from_api(issue: Issue, file: String) -> Self {
        Self {
            key: issue.key,
            rule: issue.rule,
            severity: Severity::bucket(&issue.severity),
            file,
            line: issue.line,
            message: issue.message,
            issue_type: issue.issue_type,
            status: issue.status,
            effort: issue.effort,
            debt: issue.debt,
            tags: issue.tags,
        }
    }
}

/// Issue counts per severity bucket. `total` is the server-side total, which can
/// exceed the number of listed issues when the result set spans multiple pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssuesSummary {
    pub total: u64,
    pub blocker: u64,
    pub critical: u64,
    pub major: u64,
    pub minor: u64,
    pub info: u64,
}

impl IssuesSummary {
    #[must_use]
    pub fn tally(total: u64, issues: &[IssueRecord]) -> Self {
        let mut summary = Self {
            total,
            ..Self::default()
        };

        for issue in issues {
            match issue.severity {
                Severity::Blocker => summary.blocker += 1,
                Severity::Critical => summary.critical += 1,
                Severity::Major => summary.major += 1,
                Severity::Minor => summary.minor += 1,
                Severity::Info => summary.info += 1,
            }
        }

        summary
    }

    /// The count for one severity bucket.
    #[must_use]
    pub const fn count(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Blocker => self.blocker,
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
            Severity::Info => self.info,
        }
    }
}

/// A security hotspot with its component key normalized to a path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotRecord {
    pub key: String,
    pub file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    pub message: String,
    pub security_category: String,
    pub vulnerability_probability: String,
    pub status: String,
    pub rule_key: String,
}

impl HotspotRecord {
    #[must_use]
    pub fn from_api(hotspot: Hotspot, file: String) -> Self {
        Self {
            key: hotspot.key,
            file,
            line: hotspot.line,
            message: hotspot.message,
            security_category: hotspot.security_category,
            vulnerability_probability: hotspot.vulnerability_probability,
            status: hotspot.status,
            rule_key: hotspot.rule_key,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HotspotsSection {
    pub count: u64,
    pub hotspots: Vec<HotspotRecord>,
}

/// The full pull-request report. The per-file coverage ranking is a text-mode-only
/// rendering and intentionally not part of this document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrReport {
    pub meta: Meta,
    pub quality_gate: QualityGateSection,
    pub issues: Vec<IssueRecord>,
    pub issues_summary: IssuesSummary,
    pub security_hotspots: HotspotsSection,
    pub duplication: MetricMap,
    pub coverage: MetricMap,

    /// Project-wide metrics are a branch-mode concern; null in pull-request reports.
    pub metrics: Option<MetricMap>,
}

/// The branch-mode metrics report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub meta: Meta,
    pub quality_gate: QualityGateSection,
    pub metrics: MetricMap,
}

/// The issues listing report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuesReport {
    pub meta: Meta,
    pub issues: Vec<IssueRecord>,
    pub issues_summary: IssuesSummary,
}
