//! Wire types for the analysis service's REST API.
//!
//! These are deserialized straight off the JSON payloads. Fields the service may omit
//! are modeled as `Option` or defaulted collections so a sparse response never fails
//! to parse.

use serde::{Deserialize, Serialize};

/// A single metric's value for one component.
///
/// Depending on the query, the value lives either inline in `value` or under the
/// new-code period data (`periods` on most server versions, a singular `period` on
/// some). Use [`Measure::new_code_value`](crate::measures) to read it uniformly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Measure {
    pub metric: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<MeasurePeriod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<MeasurePeriod>,
}

/// One new-code period snapshot of a measure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurePeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Response from the quality gate project-status endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateResponse {
    pub project_status: ProjectStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectStatus {
    pub status: String,

    #[serde(default)]
    pub conditions: Vec<QualityGateCondition>,
}

/// A single threshold condition contributing to the quality gate verdict.
/// Passed through to the output unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateCondition {
    pub status: String,

    pub metric_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_threshold: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,
}

/// Response from the issue search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesResponse {
    pub total: u64,

    pub issues: Vec<Issue>,

    #[serde(default)]
    pub components: Vec<Component>,
}

/// An issue as returned by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,

    pub rule: String,

    pub severity: String,

    pub component: String,

    pub message: String,

    #[serde(rename = "type")]
    pub issue_type: String,

    pub status: String,

    #[serde(default)]
    pub line: Option<u32>,

    #[serde(default)]
    pub effort: Option<String>,

    #[serde(default)]
    pub debt: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// A component referenced by issues or hotspots, carrying the relative path when known.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    pub key: String,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub qualifier: Option<String>,
}

/// Response from the security hotspot search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HotspotsResponse {
    pub paging: Paging,

    pub hotspots: Vec<Hotspot>,

    #[serde(default)]
    pub components: Vec<Component>,
}

/// A flagged location requiring manual security review.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub key: String,

    pub component: String,

    pub security_category: String,

    pub vulnerability_probability: String,

    pub status: String,

    pub message: String,

    pub rule_key: String,

    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub page_index: u64,

    pub page_size: u64,

    pub total: u64,
}

/// Response from the component measures endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasuresResponse {
    pub component: MeasuresComponent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeasuresComponent {
    pub key: String,

    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// Response from the component tree measures endpoint, one entry per analyzed file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTreeResponse {
    #[serde(default)]
    pub paging: Option<Paging>,

    #[serde(default)]
    pub base_component: Option<TreeComponent>,

    pub components: Vec<TreeComponent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeComponent {
    pub key: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub qualifier: Option<String>,

    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// Strips the `"<project_key>:"` prefix from a fully qualified component key,
/// yielding a project-relative file path. Keys for other projects pass through unchanged.
#[must_use]
pub fn strip_project_prefix<'a>(component: &'a str, project_key: &str) -> &'a str {
    component
        .strip_prefix(project_key)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(component)
}
