use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use restcheck_core::{verify, TestCase, VerificationResult};

use crate::http::{HttpClient, Limits};
use crate::request::build_request;

/// Cooperative cancellation for a running suite. The flag is checked between
/// cases; an in-flight request is not interrupted.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Response satisfied the verify-response document.
    Passed,
    /// Response received but verification failed.
    Failed,
    /// Request never produced a response (build or transport failure).
    Error,
    /// Not executed because the suite was stopped.
    Skipped,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CaseOutcome {
    pub case_id: String,
    pub name: String,
    pub status: CaseStatus,
    pub http_status: Option<u16>,
    pub verdict: Option<VerificationResult>,
    pub error: Option<String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    pub limits: Limits,
}

/// Execute one test case: build the request, send it, and verify the captured
/// body against the case's verify-response document. Failures of any kind are
/// folded into the outcome, never propagated.
pub async fn run_case(http: &dyn HttpClient, config: &RunConfig, case: &TestCase) -> CaseOutcome {
    let started = Instant::now();
    let mut outcome = CaseOutcome {
        case_id: case.id.clone(),
        name: case.display_name().to_string(),
        status: CaseStatus::Error,
        http_status: None,
        verdict: None,
        error: None,
        elapsed: Duration::ZERO,
    };

    let req = match build_request(case) {
        Ok(r) => r,
        Err(e) => {
            outcome.error = Some(e.to_string());
            outcome.elapsed = started.elapsed();
            return outcome;
        }
    };

    match http.send(req, config.limits).await {
        Ok(resp) => {
            let expected = case.verify_response.as_deref().unwrap_or("");
            let verdict = verify(expected, &resp.body_text());
            outcome.status = if verdict.matched {
                CaseStatus::Passed
            } else {
                CaseStatus::Failed
            };
            outcome.http_status = Some(resp.status);
            outcome.verdict = Some(verdict);
        }
        Err(e) => {
            outcome.error = Some(e.to_string());
        }
    }
    outcome.elapsed = started.elapsed();
    outcome
}

/// Execute cases in authored order. When the stop flag is raised, remaining
/// cases are reported as skipped rather than dropped, so reports stay aligned
/// with the suite.
pub async fn run_suite(
    http: &dyn HttpClient,
    config: &RunConfig,
    cases: &[TestCase],
    stop: &StopFlag,
) -> Vec<CaseOutcome> {
    let mut outcomes = Vec::with_capacity(cases.len());
    for case in cases {
        if stop.is_stopped() {
            outcomes.push(CaseOutcome {
                case_id: case.id.clone(),
                name: case.display_name().to_string(),
                status: CaseStatus::Skipped,
                http_status: None,
                verdict: None,
                error: None,
                elapsed: Duration::ZERO,
            });
            continue;
        }
        outcomes.push(run_case(http, config, case).await);
    }
    outcomes
}
