use super::common::{Common, CommonArgs, finish_json};
use clap::Parser;
use sonar_report::Result;
use sonar_report::api::Target;
use sonar_report::git;
use sonar_report::report::{ConsoleRenderer, ReportBuilder};

#[derive(Parser, Debug)]
pub struct IssuesArgs {
    /// Branch to list issues for [default: the current git branch]
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Maximum number of issues to display
    #[arg(short = 'l', long, value_name = "COUNT", default_value_t = 10, conflicts_with = "all")]
    pub limit: usize,

    /// Display all issues
    #[arg(short = 'a', long)]
    pub all: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_issues(args: &IssuesArgs) -> Result<()> {
    finish_json(args.common.json, args.common.output.as_deref(), run(args).await)
}

async fn run(args: &IssuesArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => git::current_branch().await?,
    };

    let builder = ReportBuilder::new(&common.client, Target::Branch(branch.clone()));

    if common.json {
        return common.emit_json(builder.issues_report().await);
    }

    let renderer = ConsoleRenderer::new(common.color);
    let mut out = String::new();

    println!("Branch '{branch}' on {}\n", common.client.project_key());

    let (issues, summary) = builder.issues().await?;
    let limit = if args.all { None } else { Some(args.limit) };
    renderer.issues(&mut out, &issues, &summary, limit)?;
    print!("{out}");

    Ok(())
}
