//! Client for the analysis service's REST API.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, ApiResult, Target};
