//! HTTP problem details as reported by a remote service

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Problem description returned by an HTTP API (RFC 7807 shaped).
///
/// Only `code` and `is_transient` are read when building a
/// [`DataError`](crate::DataError); the rest is carried along as the inner
/// error for whoever logs it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[error("{}: {}", .code, summary(.title, .detail))]
pub struct HttpProblem {
    pub code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_transient: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub status: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub detail: Option<String>,
}

#[allow(clippy::ref_option)]
fn summary<'a>(title: &'a Option<String>, detail: &'a Option<String>) -> &'a str {
    detail
        .as_deref()
        .or(title.as_deref())
        .unwrap_or("http problem")
}

impl HttpProblem {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_transient(mut self, is_transient: bool) -> Self {
        self.is_transient = is_transient;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_display() {
        let problem = HttpProblem::new("CONFLICT");
        assert_eq!(problem.to_string(), "CONFLICT: http problem");

        let problem = problem.with_title("Conflict");
        assert_eq!(problem.to_string(), "CONFLICT: Conflict");

        let problem = problem.with_detail("version 3 is stale");
        assert_eq!(problem.to_string(), "CONFLICT: version 3 is stale");
    }

    #[test]
    fn test_problem_builders() {
        let problem = HttpProblem::new("UNAVAILABLE")
            .with_transient(true)
            .with_status(503);
        assert_eq!(problem.code, "UNAVAILABLE");
        assert!(problem.is_transient);
        assert_eq!(problem.status, Some(503));
        assert!(problem.title.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_problem_decodes_camel_case() {
        let problem: HttpProblem =
            serde_json::from_str(r#"{"code":"TIMEOUT","isTransient":true,"status":504}"#)
                .unwrap();
        assert_eq!(problem.code, "TIMEOUT");
        assert!(problem.is_transient);
        assert_eq!(problem.status, Some(504));

        let problem: HttpProblem = serde_json::from_str(r#"{"code":"BAD"}"#).unwrap();
        assert!(!problem.is_transient);
    }
}
