//! Machine-readable output: one JSON document on stdout, optionally duplicated to
//! a file. The file write is best-effort; its failure never suppresses the stdout
//! document.

use crate::Result;
use crate::api::ApiError;
use camino::Utf8Path;
use serde::Serialize;
use std::fs;

const LOG_TARGET: &str = "      json";

/// Serializes `document` to stdout and, when requested, to `output`.
pub fn emit<T: Serialize>(document: &T, output: Option<&Utf8Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(document)?;
    println!("{text}");

    if let Some(path) = output {
        if let Err(e) = fs::write(path, &text) {
            log::warn!(target: LOG_TARGET, "could not write output file '{path}': {e}");
        } else {
            log::debug!(target: LOG_TARGET, "wrote output file '{path}'");
        }
    }

    Ok(())
}

/// The structured error document emitted when a report run fails in JSON mode:
/// `{"error": {"message", "statusCode", "details"}}`.
#[must_use]
pub fn error_document(error: &ApiError) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "message": error.to_string(),
            "statusCode": error.status_code(),
            "details": error.details(),
        }
    })
}

pub fn emit_error(error: &ApiError, output: Option<&Utf8Path>) -> Result<()> {
    emit(&error_document(error), output)
}

/// The error document for a failure that never reached the API (missing
/// configuration, undeterminable git context, rendering). Same shape as
/// [`error_document`], with a null status code and no details.
#[must_use]
pub fn fatal_document(message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "message": message,
            "statusCode": null,
            "details": null,
        }
    })
}

pub fn emit_fatal(message: &str, output: Option<&Utf8Path>) -> Result<()> {
    emit(&fatal_document(message), output)
}
