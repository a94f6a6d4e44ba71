//! Deep diagnostics for a [`DataError`]
//!
//! `Display` on a `DataError` stops at one level. The helpers here walk the
//! cause chain and the fields for callers that want everything.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::DataError;

/// Multi-line rendering of an error, its fields and every cause.
///
/// ```text
/// Code: [E1] Message: [save order] Inner error: [boom] (transient)
///     order_id: 42
/// caused by: Code: [E0] Message: [insert row] Inner error: [boom]
/// ```
///
/// Fields are sorted by key so the output is stable.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    error: &'a DataError,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entry(f, self.error)?;
        for cause in self.error.causes() {
            f.write_str("\ncaused by: ")?;
            write_entry(f, cause)?;
        }
        Ok(())
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, error: &DataError) -> fmt::Result {
    write!(f, "{error}")?;
    if error.is_transient() {
        f.write_str(" (transient)")?;
    }
    for (key, value) in sorted_fields(error) {
        write!(f, "\n    {key}: {value}")?;
    }
    Ok(())
}

fn sorted_fields(error: &DataError) -> BTreeMap<&str, &Value> {
    error
        .fields()
        .iter()
        .map(|(key, value)| (key.as_str(), value))
        .collect()
}

impl DataError {
    #[must_use]
    pub fn report(&self) -> Report<'_> {
        Report { error: self }
    }

    /// Emit this error as a `tracing` event.
    ///
    /// Transient errors go out at WARN, permanent ones at ERROR.
    pub fn trace(&self) {
        let fields = sorted_fields(self);
        let chain_depth = self.causes().count();
        if self.is_transient() {
            tracing::warn!(
                code = %self.code(),
                transient = true,
                msg = %self.message(),
                inner = %self.inner(),
                fields = ?fields,
                chain_depth,
                "{self}"
            );
        } else {
            tracing::error!(
                code = %self.code(),
                transient = false,
                msg = %self.message(),
                inner = %self.inner(),
                fields = ?fields,
                chain_depth,
                "{self}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_chain() {
        let err = DataError::new("boom", "E1", "bad thing");
        assert_eq!(err.report().to_string(), err.to_string());
    }

    #[test]
    fn test_report_full_chain() {
        let mut err = DataError::transient("boom", "E1", "save order");
        err.add_fields([("order_id", Value::from(42)), ("actor", Value::from("svc"))])
            .wrap(DataError::new("boom", "E0", "insert row"));

        let expected = "Code: [E1] Message: [save order] Inner error: [boom] (transient)\n    \
                        actor: \"svc\"\n    \
                        order_id: 42\n\
                        caused by: Code: [E0] Message: [insert row] Inner error: [boom]";
        assert_eq!(err.report().to_string(), expected);
    }

    #[test]
    fn test_trace_without_subscriber() {
        DataError::transient("reset", "E9", "flaky").trace();
        DataError::new("boom", "E1", "bad thing").trace();
    }
}
