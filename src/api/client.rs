use crate::api::types::{ComponentTreeResponse, HotspotsResponse, IssuesResponse, MeasuresResponse, QualityGateResponse};
use crate::config::Config;
use core::fmt::{self, Display, Formatter};
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "       api";

/// Metric keys fetched for the duplication section.
pub const DUPLICATION_METRICS: &[&str] = &["new_duplicated_lines_density", "new_duplicated_lines", "new_duplicated_blocks"];

/// Metric keys fetched for the new-code coverage section and the per-file coverage detail.
pub const COVERAGE_METRICS: &[&str] = &["new_coverage", "new_lines_to_cover", "new_uncovered_lines"];

/// Metric keys fetched for the project-wide metrics section (branch mode).
pub const PROJECT_METRICS: &[&str] = &[
    "bugs",
    "vulnerabilities",
    "code_smells",
    "coverage",
    "line_coverage",
    "duplicated_lines_density",
    "complexity",
    "cognitive_complexity",
    "reliability_rating",
    "security_rating",
    "sqale_rating",
    "ncloc",
    "sqale_index",
];

/// Page size used for issue and hotspot searches. Results past the first page are
/// not fetched.
const PAGE_SIZE: &str = "500";

/// Default page size for the component tree fetch; callers of
/// [`ApiClient::coverage_tree`] pick the size, large enough by default to cover
/// every file of a typical pull request in one page.
pub const DEFAULT_TREE_PAGE_SIZE: u32 = 500;

pub type ApiResult<T> = core::result::Result<T, ApiError>;

/// Failure of a single API call: either a non-2xx response (with status code and
/// best-effort parsed body) or a transport-level error (no status).
#[derive(Debug, Clone)]
pub struct ApiError {
    label: &'static str,
    status_code: Option<u16>,
    details: Option<serde_json::Value>,
    message: String,
}

impl ApiError {
    fn request(label: &'static str, err: &dyn Display) -> Self {
        Self {
            label,
            status_code: None,
            details: None,
            message: format!("{label} API request failed: {err}"),
        }
    }

    pub(crate) fn status(label: &'static str, status_code: u16, body: String) -> Self {
        let details = if body.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&body).unwrap_or_else(|_| serde_json::Value::String(body)))
        };

        Self {
            label,
            status_code: Some(status_code),
            details,
            message: format!("{label} API returned {status_code}"),
        }
    }

    /// The metric group this call belonged to (e.g. "quality gate", "issues").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    #[must_use]
    pub const fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl core::error::Error for ApiError {}

/// What a report is scoped to: one pull request or one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    PullRequest(String),
    Branch(String),
}

impl Target {
    /// The query parameter this target contributes to every scoped API call.
    #[must_use]
    pub fn query_param(&self) -> (&'static str, String) {
        match self {
            Self::PullRequest(pr) => ("pullRequest", pr.clone()),
            Self::Branch(branch) => ("branch", branch.clone()),
        }
    }

    #[must_use]
    pub fn pull_request(&self) -> Option<&str> {
        match self {
            Self::PullRequest(pr) => Some(pr),
            Self::Branch(_) => None,
        }
    }

    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::PullRequest(_) => None,
            Self::Branch(branch) => Some(branch),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::PullRequest(pr) => write!(f, "pull request #{pr}"),
            Self::Branch(branch) => write!(f, "branch '{branch}'"),
        }
    }
}

/// Authenticated client for the analysis service's REST API.
///
/// Calls are strictly sequential GETs with no retry; the first failure is terminal
/// for the report being built.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    project_key: String,
    organization: Option<String>,
}

impl ApiClient {
    /// Create a client carrying the bearer token on every request.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let mut auth_val = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.token))?;
        auth_val.set_sensitive(true);

        let mut headers = reqwest::header::HeaderMap::new();
        let _ = headers.insert(reqwest::header::AUTHORIZATION, auth_val);

        let http = reqwest::Client::builder().user_agent("sonar-report").default_headers(headers).build()?;

        Ok(Self {
            http,
            base: config.host.clone(),
            project_key: config.project_key.clone(),
            organization: config.organization.clone(),
        })
    }

    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    #[must_use]
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Overall quality gate verdict plus its threshold conditions.
    pub async fn quality_gate(&self, target: &Target) -> ApiResult<QualityGateResponse> {
        let query = vec![("projectKey", self.project_key.clone()), target.query_param()];
        self.get_json("quality gate", "api/qualitygates/project_status", query).await
    }

    /// Unresolved issues scoped to the target, first page only.
    pub async fn search_issues(&self, target: &Target) -> ApiResult<IssuesResponse> {
        let mut query = vec![
            ("componentKeys", self.project_key.clone()),
            ("resolved", "false".to_string()),
            ("ps", PAGE_SIZE.to_string()),
            target.query_param(),
        ];

        if let Some(org) = &self.organization {
            query.push(("organization", org.clone()));
        }

        self.get_json("issues", "api/issues/search", query).await
    }

    /// Security hotspots for one pull request, first page only.
    pub async fn search_hotspots(&self, pull_request: &str) -> ApiResult<HotspotsResponse> {
        let query = vec![
            ("projectKey", self.project_key.clone()),
            ("pullRequest", pull_request.to_string()),
            ("ps", PAGE_SIZE.to_string()),
        ];

        self.get_json("security hotspots", "api/hotspots/search", query).await
    }

    /// Project-level measures for the given metric keys.
    pub async fn component_measures(&self, label: &'static str, target: &Target, metric_keys: &[&str]) -> ApiResult<MeasuresResponse> {
        let query = vec![
            ("component", self.project_key.clone()),
            ("metricKeys", metric_keys.join(",")),
            target.query_param(),
        ];

        self.get_json(label, "api/measures/component", query).await
    }

    /// File-level new-code coverage measures, sorted server-side by uncovered lines descending.
    pub async fn coverage_tree(&self, pull_request: &str, page_size: u32) -> ApiResult<ComponentTreeResponse> {
        let query = vec![
            ("component", self.project_key.clone()),
            ("metricKeys", COVERAGE_METRICS.join(",")),
            ("qualifiers", "FIL".to_string()),
            ("s", "metric".to_string()),
            ("metricSort", "new_uncovered_lines".to_string()),
            ("asc", "false".to_string()),
            ("metricSortFilter", "withMeasuresOnly".to_string()),
            ("ps", page_size.to_string()),
            ("pullRequest", pull_request.to_string()),
        ];

        self.get_json("coverage detail", "api/measures/component_tree", query).await
    }

    async fn get_json<T: DeserializeOwned>(&self, label: &'static str, path: &str, query: Vec<(&str, String)>) -> ApiResult<T> {
        let url = self.base.join(path).map_err(|e| ApiError::request(label, &e))?;

        log::debug!(target: LOG_TARGET, "GET {url}");

        let response = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ApiError::request(label, &e))?;

        let status = response.status();
        if !status.is_success() {
            log::debug!(target: LOG_TARGET, "{label} request failed with status {status}");
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status(label, status.as_u16(), body));
        }

        response.json::<T>().await.map_err(|e| ApiError::request(label, &e))
    }
}
