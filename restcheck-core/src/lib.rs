#![forbid(unsafe_code)]

//! Core verification logic for restcheck API test suites.
//!
//! The execution engine lives in `restcheck-exec`; this crate owns the
//! test-case model and the expected-vs-actual response comparison.

pub mod types;
pub mod verify;

pub use crate::types::{Auth, TestCase};
pub use crate::verify::{verify, Mismatch, VerificationResult, ANY_VALUE};
