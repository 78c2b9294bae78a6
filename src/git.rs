//! Best-effort discovery of the local git and CI context.

use crate::Result;
use ohno::bail;
use tokio::process::Command;

const LOG_TARGET: &str = "       git";

/// The branch currently checked out in the working directory.
pub async fn current_branch() -> Result<String> {
    let output = match Command::new("git").args(["rev-parse", "--abbrev-ref", "HEAD"]).output().await {
        Ok(output) => output,
        Err(e) => bail!("could not run git to determine the current branch: {e}"),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("could not determine the current branch: {}", stderr.trim());
    }

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if branch.is_empty() || branch == "HEAD" {
        bail!("could not determine the current branch (detached HEAD?); pass --branch explicitly");
    }

    log::debug!(target: LOG_TARGET, "current branch is '{branch}'");
    Ok(branch)
}

/// The pull request number advertised by the CI environment, if any.
///
/// GitHub Actions exposes `GITHUB_REF` as `refs/pull/<number>/merge` for
/// pull-request builds.
#[must_use]
pub fn pull_request_from_ci() -> Option<String> {
    let github_ref = std::env::var("GITHUB_REF").ok()?;
    let number = pull_request_from_ref(&github_ref)?;

    log::debug!(target: LOG_TARGET, "pull request #{number} found in GITHUB_REF");
    Some(number.to_string())
}

fn pull_request_from_ref(github_ref: &str) -> Option<&str> {
    let number = github_ref.strip_prefix("refs/pull/")?.split('/').next()?;
    (!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())).then_some(number)
}
