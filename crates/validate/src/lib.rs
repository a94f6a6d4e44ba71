#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Validation failures for request data
//!
//! A [`ValidationError`] collects every rejected field from one validation
//! pass so the caller can report them all at once instead of stopping at the
//! first bad value.

use std::collections::HashMap;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Invalid field names mapped to the reason each was rejected.
///
/// Renders as `Invalid fields- email: malformed, phone: too short`. The order
/// of the pairs follows map iteration and is not stable between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[error("{}", render(.invalid_fields))]
pub struct ValidationError {
    invalid_fields: HashMap<String, String>,
}

fn render(invalid_fields: &HashMap<String, String>) -> String {
    let pairs: Vec<String> = invalid_fields
        .iter()
        .map(|(field, reason)| format!("{field}: {reason}"))
        .collect();
    if pairs.is_empty() {
        "Invalid fields-".to_owned()
    } else {
        format!("Invalid fields- {}", pairs.join(", "))
    }
}

impl ValidationError {
    /// Create an error holding a single invalid field.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::empty().with_invalid_field(field, reason)
    }

    /// Create an error with no invalid fields, to be filled in while checking.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record `field` as invalid. A second reason for the same field replaces
    /// the first.
    pub fn add_invalid_field(
        &mut self,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> &mut Self {
        self.invalid_fields.insert(field.into(), reason.into());
        self
    }

    #[must_use]
    pub fn with_invalid_field(
        mut self,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.add_invalid_field(field, reason);
        self
    }

    /// Every invalid field and its reason. This is the live map.
    #[must_use]
    pub fn invalid_fields(&self) -> &HashMap<String, String> {
        &self.invalid_fields
    }

    #[must_use]
    pub fn reason(&self, field: &str) -> Option<&str> {
        self.invalid_fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invalid_fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.invalid_fields.len()
    }

    /// Finish a validation pass: `Ok` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field was recorded as invalid.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Emit the failure as a WARN `tracing` event.
    pub fn trace(&self) {
        tracing::warn!(invalid_count = self.len(), "{self}");
    }
}

impl<K, V> FromIterator<(K, V)> for ValidationError
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut error = Self::empty();
        error.extend(iter);
        error
    }
}

impl<K, V> Extend<(K, V)> for ValidationError
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (field, reason) in iter {
            self.add_invalid_field(field, reason);
        }
    }
}
