//! Orchestrates one report run: a strictly sequential chain of API calls, each
//! folded through the extraction layer into the output aggregate. The first call
//! that fails aborts the run; there is no retry and no partial JSON aggregate.

use crate::api::types::{Component, strip_project_prefix};
use crate::api::{ApiClient, ApiResult, Target, client};
use crate::coverage::{CoverageFileDetail, rank_uncovered_files};
use crate::measures::extract_number;
use crate::report::aggregate::{
    HotspotRecord, HotspotsSection, IssueRecord, IssuesReport, IssuesSummary, Meta, MetricMap, MetricsReport, PrReport,
    QualityGateSection,
};
use chrono::Utc;
use std::collections::HashMap;

const LOG_TARGET: &str = "    report";

#[derive(Debug)]
pub struct ReportBuilder<'a> {
    client: &'a ApiClient,
    target: Target,
}

impl<'a> ReportBuilder<'a> {
    #[must_use]
    pub const fn new(client: &'a ApiClient, target: Target) -> Self {
        Self { client, target }
    }

    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }

    #[must_use]
    pub fn meta(&self) -> Meta {
        Meta {
            project_key: self.client.project_key().to_string(),
            organization: self.client.organization().map(ToString::to_string),
            branch: self.target.branch().map(ToString::to_string),
            pull_request: self.target.pull_request().map(ToString::to_string),
            generated_at: Utc::now(),
        }
    }

    pub async fn quality_gate(&self) -> ApiResult<QualityGateSection> {
        log::debug!(target: LOG_TARGET, "fetching quality gate for {}", self.target);
        let response = self.client.quality_gate(&self.target).await?;
        Ok(response.into())
    }

    pub async fn issues(&self) -> ApiResult<(Vec<IssueRecord>, IssuesSummary)> {
        log::debug!(target: LOG_TARGET, "fetching issues for {}", self.target);
        let response = self.client.search_issues(&self.target).await?;

        let paths = component_paths(&response.components);
        let project_key = self.client.project_key();

        let records: Vec<_> = response
            .issues
            .into_iter()
            .map(|issue| {
                let file = resolve_path(&paths, &issue.component, project_key);
                IssueRecord::from_api(issue, file)
            })
            .collect();

        let summary = IssuesSummary::tally(response.total, &records);
        Ok((records, summary))
    }

    pub async fn hotspots(&self, pull_request: &str) -> ApiResult<HotspotsSection> {
        log::debug!(target: LOG_TARGET, "fetching security hotspots for pull request #{pull_request}");
        let response = self.client.search_hotspots(pull_request).await?;

        let paths = component_paths(&response.components);
        let project_key = self.client.project_key();

        let hotspots: Vec<_> = response
            .hotspots
            .into_iter()
            .map(|hotspot| {
                let file = resolve_path(&paths, &hotspot.component, project_key);
                HotspotRecord::from_api(hotspot, file)
            })
            .collect();

        Ok(HotspotsSection {
            count: response.paging.total,
            hotspots,
        })
    }

    pub async fn duplication(&self) -> ApiResult<MetricMap> {
        self.metric_map("duplication", client::DUPLICATION_METRICS).await
    }

    pub async fn coverage(&self) -> ApiResult<MetricMap> {
        self.metric_map("coverage", client::COVERAGE_METRICS).await
    }

    pub async fn project_metrics(&self) -> ApiResult<MetricMap> {
        self.metric_map("project metrics", client::PROJECT_METRICS).await
    }

    pub async fn coverage_detail(&self, pull_request: &str) -> ApiResult<Vec<CoverageFileDetail>> {
        log::debug!(target: LOG_TARGET, "fetching per-file coverage for pull request #{pull_request}");
        let tree = self.client.coverage_tree(pull_request, client::DEFAULT_TREE_PAGE_SIZE).await?;
        Ok(rank_uncovered_files(&tree, self.client.project_key()))
    }

    /// The full pull-request aggregate, fetched in canonical order. Used by JSON
    /// mode; text mode drives the individual sections so output stays incremental.
    pub async fn pr_report(&self, pull_request: &str) -> ApiResult<PrReport> {
        let quality_gate = self.quality_gate().await?;
        let (issues, issues_summary) = self.issues().await?;
        let security_hotspots = self.hotspots(pull_request).await?;
        let duplication = self.duplication().await?;
        let coverage = self.coverage().await?;

        Ok(PrReport {
            meta: self.meta(),
            quality_gate,
            issues,
            issues_summary,
            security_hotspots,
            duplication,
            coverage,
            metrics: None,
        })
    }

    pub async fn metrics_report(&self) -> ApiResult<MetricsReport> {
        let quality_gate = self.quality_gate().await?;
        let metrics = self.project_metrics().await?;

        Ok(MetricsReport {
            meta: self.meta(),
            quality_gate,
            metrics,
        })
    }

    pub async fn issues_report(&self) -> ApiResult<IssuesReport> {
        let (issues, issues_summary) = self.issues().await?;

        Ok(IssuesReport {
            meta: self.meta(),
            issues,
            issues_summary,
        })
    }

    async fn metric_map(&self, label: &'static str, keys: &'static [&'static str]) -> ApiResult<MetricMap> {
        log::debug!(target: LOG_TARGET, "fetching {label} measures for {}", self.target);
        let response = self.client.component_measures(label, &self.target, keys).await?;

        Ok(keys
            .iter()
            .map(|&key| (key, extract_number(&response.component.measures, key)))
            .collect())
    }
}

fn component_paths(components: &[Component]) -> HashMap<&str, &str> {
    components
        .iter()
        .filter_map(|c| c.path.as_deref().map(|path| (c.key.as_str(), path)))
        .collect()
}

fn resolve_path(paths: &HashMap<&str, &str>, component: &str, project_key: &str) -> String {
    paths
        .get(component)
        .map_or_else(|| strip_project_prefix(component, project_key).to_string(), ToString::to_string)
}
