use crate::Result;
use ohno::bail;
use url::Url;

/// Process-wide configuration, read once at startup and passed by reference from
/// there on. Credentials and identifiers come from CLI flags with environment
/// fallbacks; anything required but missing is rejected here, before any network
/// call is made.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the analysis service.
    pub host: Url,

    /// Authentication token sent as a bearer token on every request.
    pub token: String,

    /// Key of the project being reported on.
    pub project_key: String,

    /// Organization the project belongs to, where the service requires one.
    pub organization: Option<String>,
}

impl Config {
    pub fn new(host_url: &str, token: Option<String>, project_key: Option<String>, organization: Option<String>) -> Result<Self> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            bail!("no authentication token configured; set SONAR_TOKEN or pass --token");
        };

        let Some(project_key) = project_key.filter(|k| !k.is_empty()) else {
            bail!("no project key configured; set SONAR_PROJECT_KEY or pass --project-key");
        };

        let host = match Url::parse(host_url) {
            Ok(url) => url,
            Err(e) => bail!("invalid analysis service URL '{host_url}': {e}"),
        };

        Ok(Self {
            host,
            token,
            project_key,
            organization: organization.filter(|o| !o.is_empty()),
        })
    }
}
