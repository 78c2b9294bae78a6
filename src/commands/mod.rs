mod common;
mod issues;
mod metrics;
mod pr;

pub use issues::{IssuesArgs, process_issues};
pub use metrics::{MetricsArgs, process_metrics};
pub use pr::{PrArgs, process_pr};
