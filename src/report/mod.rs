//! Report assembly and output rendering.

pub mod aggregate;
pub mod builder;
pub mod console;
pub mod json;

pub use aggregate::{
    HotspotRecord, HotspotsSection, IssueRecord, IssuesReport, IssuesSummary, Meta, MetricMap, MetricsReport, PrReport,
    QualityGateSection, Severity,
};
pub use builder::ReportBuilder;
pub use console::{ColorMode, ConsoleRenderer};
