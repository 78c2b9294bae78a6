use super::common::{Common, CommonArgs, finish_json};
use clap::Parser;
use ohno::bail;
use sonar_report::api::{Target, client};
use sonar_report::git;
use sonar_report::report::{ConsoleRenderer, ReportBuilder};
use sonar_report::Result;

#[derive(Parser, Debug)]
pub struct PrArgs {
    /// Pull request number [default: derived from the CI environment]
    #[arg(value_name = "PR-NUMBER")]
    pub pr: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_pr(args: &PrArgs) -> Result<()> {
    finish_json(args.common.json, args.common.output.as_deref(), run(args).await)
}

async fn run(args: &PrArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let pull_request = match &args.pr {
        Some(pr) => pr.clone(),
        None => match git::pull_request_from_ci() {
            Some(pr) => pr,
            None => bail!("could not determine the pull request number from the environment; pass it explicitly"),
        },
    };

    let builder = ReportBuilder::new(&common.client, Target::PullRequest(pull_request.clone()));

    if common.json {
        return common.emit_json(builder.pr_report(&pull_request).await);
    }

    // Text mode renders each section as soon as its fetch completes; a failed
    // fetch leaves the earlier sections on the console and aborts the run.
    let renderer = ConsoleRenderer::new(common.color);
    let mut out = String::new();

    println!("Pull request #{pull_request} on {}\n", common.client.project_key());

    renderer.quality_gate(&mut out, &builder.quality_gate().await?)?;
    print_section(&mut out);

    let (issues, summary) = builder.issues().await?;
    renderer.issues(&mut out, &issues, &summary, None)?;
    print_section(&mut out);

    renderer.hotspots(&mut out, &builder.hotspots(&pull_request).await?)?;
    print_section(&mut out);

    renderer.metric_section(&mut out, "Duplication (new code)", client::DUPLICATION_METRICS, &builder.duplication().await?)?;
    print_section(&mut out);

    renderer.metric_section(&mut out, "Coverage (new code)", client::COVERAGE_METRICS, &builder.coverage().await?)?;
    print_section(&mut out);

    renderer.coverage_detail(&mut out, &builder.coverage_detail(&pull_request).await?)?;
    print_section(&mut out);

    Ok(())
}

fn print_section(out: &mut String) {
    print!("{out}");
    out.clear();
}
