//! Expected-vs-actual response body comparison.
//!
//! A test case may carry a "verify response" document: a JSON object whose
//! values are matched against the captured response body. The string
//! `"$any-value"` is a wildcard that accepts any present, non-null value.
//! Comparison is object-to-object at every level; scalars, arrays, and
//! type-mismatched pairs are compared by canonical string form, so `5` and
//! `"5"` are considered equal. A null on either side never matches.

use serde_json::Value as JsonValue;

/// Wildcard sentinel: accepts any present, non-null value in the response.
pub const ANY_VALUE: &str = "$any-value";

/// The first point of divergence between the expected document and the
/// response body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Mismatch {
    /// Dotted path from the document root, e.g. `$.user.id`.
    pub path: String,
    pub message: String,
}

impl Mismatch {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Verdict of a single verification call.
///
/// Only `matched` is load-bearing; `mismatch` exists for report rendering.
/// An unparseable input is folded into `matched = false` rather than
/// surfaced as an error, so callers cannot distinguish "body did not match"
/// from "body was not JSON".
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VerificationResult {
    pub matched: bool,
    pub mismatch: Option<Mismatch>,
}

impl VerificationResult {
    fn matched() -> Self {
        Self {
            matched: true,
            mismatch: None,
        }
    }

    fn mismatched(mismatch: Mismatch) -> Self {
        Self {
            matched: false,
            mismatch: Some(mismatch),
        }
    }
}

/// Compare a raw "verify response" document against a raw response body.
///
/// An empty or whitespace-only `expected_text` means no verification was
/// requested and is vacuously satisfied. Otherwise both inputs must parse
/// as JSON objects and agree per [`compare_value`]'s rules.
pub fn verify(expected_text: &str, actual_text: &str) -> VerificationResult {
    let expected_text = expected_text.trim();
    if expected_text.is_empty() {
        return VerificationResult::matched();
    }
    let actual_text = actual_text.trim();

    let expected: JsonValue = match serde_json::from_str(expected_text) {
        Ok(v) => v,
        Err(_) => {
            return VerificationResult::mismatched(Mismatch::new(
                "$",
                "verify-response document is not valid JSON",
            ))
        }
    };
    let actual: JsonValue = match serde_json::from_str(actual_text) {
        Ok(v) => v,
        Err(_) => {
            return VerificationResult::mismatched(Mismatch::new(
                "$",
                "response body is not valid JSON",
            ))
        }
    };

    // Only object-to-object comparison is supported at the top level; a
    // scalar or array root never matches, even against an equal one.
    if expected.is_null() || actual.is_null() {
        return VerificationResult::mismatched(Mismatch::new("$", "null never matches"));
    }
    match (&expected, &actual) {
        (JsonValue::Object(_), JsonValue::Object(_)) => match compare_value(&expected, &actual, "$")
        {
            None => VerificationResult::matched(),
            Some(m) => VerificationResult::mismatched(m),
        },
        _ => VerificationResult::mismatched(Mismatch::new(
            "$",
            "top-level value must be an object on both sides",
        )),
    }
}

/// Compare one expected value against one actual value. `None` means match.
fn compare_value(expected: &JsonValue, actual: &JsonValue, path: &str) -> Option<Mismatch> {
    // Null on either side fails, including two explicit nulls.
    if expected.is_null() || actual.is_null() {
        return Some(Mismatch::new(path, "null never matches"));
    }

    if let (JsonValue::Object(exp), JsonValue::Object(act)) = (expected, actual) {
        return compare_objects(exp, act, path);
    }

    // Scalars, arrays, and mixed types compare by string form. Arrays are
    // never recursed into.
    let exp_str = canonical_string(expected);
    let act_str = canonical_string(actual);
    if exp_str != act_str {
        return Some(Mismatch::new(
            path,
            format!("expected `{exp_str}`, got `{act_str}`"),
        ));
    }
    None
}

fn compare_objects(
    expected: &serde_json::Map<String, JsonValue>,
    actual: &serde_json::Map<String, JsonValue>,
    path: &str,
) -> Option<Mismatch> {
    // Strict two-way key-set equality: extra keys on either side mismatch.
    if let Some(k) = expected.keys().find(|k| !actual.contains_key(*k)) {
        return Some(Mismatch::new(
            path,
            format!("key `{k}` missing from response"),
        ));
    }
    if let Some(k) = actual.keys().find(|k| !expected.contains_key(*k)) {
        return Some(Mismatch::new(
            path,
            format!("unexpected key `{k}` in response"),
        ));
    }

    for (k, ev) in expected {
        let child = format!("{path}.{k}");
        let av = actual.get(k).unwrap_or(&JsonValue::Null);
        if ev.as_str() == Some(ANY_VALUE) {
            if av.is_null() {
                return Some(Mismatch::new(child, "wildcard requires a non-null value"));
            }
            continue;
        }
        if let Some(m) = compare_value(ev, av, &child) {
            return Some(m);
        }
    }
    None
}

/// String form used for leaf comparison: strings render unquoted, every
/// other value renders as compact JSON. This is what makes `5` and `"5"`
/// compare equal.
fn canonical_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
