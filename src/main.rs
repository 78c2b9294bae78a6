//! A tool to fetch code-quality analysis results and render them in the terminal or as JSON.
//!
//! # Overview
//!
//! `sonar-report` talks to a SonarCloud/SonarQube-compatible analysis service and
//! reports on a single pull request or a whole branch: quality gate verdict,
//! unresolved issues, security hotspots, duplication, new-code coverage (including
//! a per-file ranking of uncovered lines), and project-wide metrics.
//!
//! # Quick Start
//!
//! ```bash
//! export SONAR_TOKEN=...
//! export SONAR_PROJECT_KEY=my-org_my-project
//! sonar-report pr 1234
//! ```
//!
//! This prints a color-coded report for pull request 1234.
//!
//! # Commands
//!
//! **Pull request report:**
//! ```bash
//! sonar-report pr 1234          # explicit PR number
//! sonar-report pr               # PR number taken from the CI environment
//! ```
//!
//! **Branch metrics:**
//! ```bash
//! sonar-report metrics          # current git branch
//! sonar-report metrics -b main
//! ```
//!
//! **Issue listing:**
//! ```bash
//! sonar-report issues           # first 10 issues on the current branch
//! sonar-report issues -l 50
//! sonar-report issues --all
//! ```
//!
//! # JSON Output
//!
//! Every command accepts `--json`, which suppresses the incremental text output and
//! emits one JSON document on stdout instead. `--output <PATH>` duplicates that
//! document to a file. On failure, JSON mode emits a single
//! `{"error": {"message", "statusCode", "details"}}` document and exits non-zero.
//!
//! # Configuration
//!
//! All connection settings come from flags or the environment:
//!
//! | Flag             | Environment variable |
//! |------------------|----------------------|
//! | `--token`        | `SONAR_TOKEN`        |
//! | `--host-url`     | `SONAR_HOST_URL`     |
//! | `--project-key`  | `SONAR_PROJECT_KEY`  |
//! | `--organization` | `SONAR_ORGANIZATION` |

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use sonar_report::Result;

mod commands;

use crate::commands::{IssuesArgs, MetricsArgs, PrArgs, process_issues, process_metrics, process_pr};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "sonar-report", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: ReportSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReportSubcommand {
    /// Report on a single pull request
    Pr(PrArgs),
    /// Report project-wide metrics for a branch
    Metrics(MetricsArgs),
    /// List unresolved issues for a branch
    Issues(IssuesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        ReportSubcommand::Pr(pr_args) => process_pr(pr_args).await,
        ReportSubcommand::Metrics(metrics_args) => process_metrics(metrics_args).await,
        ReportSubcommand::Issues(issues_args) => process_issues(issues_args).await,
    }
}
