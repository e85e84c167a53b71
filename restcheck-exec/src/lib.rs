#![forbid(unsafe_code)]

//! HTTP execution engine for restcheck test suites.
//!
//! This crate is intentionally thin; the test-case model and the response
//! verification live in `restcheck-core`.

pub mod http;
pub mod request;
pub mod runner;

pub use crate::http::{
    HttpClient, HttpError, HttpRequestParts, HttpResponseParts, Limits, ReqwestHttpClient,
};
pub use crate::request::{build_request, BuildError};
pub use crate::runner::{run_case, run_suite, CaseOutcome, CaseStatus, RunConfig, StopFlag};
