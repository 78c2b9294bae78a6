//! Shared argument surface and setup logic for all subcommands.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use clap::ValueEnum;
use serde::Serialize;
use sonar_report::Result;
use sonar_report::api::{ApiClient, ApiError, ApiResult};
use sonar_report::config::Config;
use sonar_report::report::{ColorMode, json};

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

/// Arguments shared by every subcommand
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Analysis service authentication token
    #[arg(long, value_name = "TOKEN", env = "SONAR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the analysis service
    #[arg(long, value_name = "URL", env = "SONAR_HOST_URL", default_value = "https://sonarcloud.io")]
    pub host_url: String,

    /// Key of the project to report on
    #[arg(long, value_name = "KEY", env = "SONAR_PROJECT_KEY")]
    pub project_key: Option<String>,

    /// Organization the project belongs to
    #[arg(long, value_name = "ORG", env = "SONAR_ORGANIZATION")]
    pub organization: Option<String>,

    /// Emit one JSON document instead of human-readable text
    #[arg(long, help_heading = "Output")]
    pub json: bool,

    /// Also write the JSON document to this file
    #[arg(long, value_name = "PATH", help_heading = "Output")]
    pub output: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto", help_heading = "Output")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// JSON-mode wrapper for a whole command run: an error that never produced a
/// JSON document on its own (missing configuration, undeterminable git context,
/// rendering) still ends as one structured error document on stdout and a
/// non-zero exit. Text mode passes the error through to `main` unchanged.
pub fn finish_json(json_mode: bool, output: Option<&Utf8Path>, result: Result<()>) -> Result<()> {
    match result {
        Err(e) if json_mode => {
            if let Err(emit_err) = json::emit_fatal(&e.to_string(), output) {
                eprintln!("{emit_err}");
            }
            std::process::exit(1);
        }
        other => other,
    }
}

pub struct Common {
    pub client: ApiClient,
    pub json: bool,
    pub color: ColorMode,
    output: Option<Utf8PathBuf>,
}

impl Common {
    /// Set up logging, read the configuration, and build the API client.
    ///
    /// # Errors
    ///
    /// Returns an error when required configuration is missing or invalid; nothing
    /// touches the network before this succeeds.
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let config = Config::new(&args.host_url, args.token.clone(), args.project_key.clone(), args.organization.clone())?;
        let client = ApiClient::new(&config)?;

        if args.output.is_some() && !args.json {
            log::warn!("--output only applies with --json; ignoring it");
        }

        Ok(Self {
            client,
            json: args.json,
            color: args.color,
            output: args.output.clone(),
        })
    }

    #[must_use]
    pub fn output(&self) -> Option<&Utf8Path> {
        self.output.as_deref()
    }

    /// JSON-mode terminal step: emit the document, or the structured error document
    /// followed by a non-zero exit.
    pub fn emit_json<T: Serialize>(&self, result: ApiResult<T>) -> Result<()> {
        match result {
            Ok(document) => json::emit(&document, self.output()),
            Err(e) => self.fail_json(&e),
        }
    }

    pub fn fail_json(&self, error: &ApiError) -> ! {
        if let Err(e) = json::emit_error(error, self.output()) {
            eprintln!("{e}");
        }
        std::process::exit(1);
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        if log_level == LogLevel::None {
            return;
        }

        let level = match log_level {
            LogLevel::None => return, // Already checked above, but being explicit
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug) || matches!(log_level, LogLevel::Trace))
            .init();
    }
}
