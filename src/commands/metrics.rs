use super::common::{Common, CommonArgs, finish_json};
use clap::Parser;
use sonar_report::Result;
use sonar_report::api::{Target, client};
use sonar_report::git;
use sonar_report::report::{ConsoleRenderer, ReportBuilder};

#[derive(Parser, Debug)]
pub struct MetricsArgs {
    /// Branch to report on [default: the current git branch]
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_metrics(args: &MetricsArgs) -> Result<()> {
    finish_json(args.common.json, args.common.output.as_deref(), run(args).await)
}

async fn run(args: &MetricsArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => git::current_branch().await?,
    };

    let builder = ReportBuilder::new(&common.client, Target::Branch(branch.clone()));

    if common.json {
        return common.emit_json(builder.metrics_report().await);
    }

    let renderer = ConsoleRenderer::new(common.color);
    let mut out = String::new();

    println!("Branch '{branch}' on {}\n", common.client.project_key());

    renderer.quality_gate(&mut out, &builder.quality_gate().await?)?;
    print!("{out}");
    out.clear();

    renderer.metric_section(&mut out, "Project Metrics", client::PROJECT_METRICS, &builder.project_metrics().await?)?;
    print!("{out}");

    Ok(())
}
