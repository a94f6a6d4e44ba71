//! The enriched error value and its constructors

use std::borrow::Cow;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

use crate::problem::HttpProblem;
use crate::UNKNOWN_CODE;

/// Raw error carried inside a [`DataError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error with a machine friendly code, the originating error and extra context.
///
/// `inner` is the technical fault that started it all. `cause` is an earlier
/// `DataError` that a lower layer produced and this one re-interprets, so the
/// two answer different questions: "what actually broke" and "which layers
/// looked at it on the way up".
///
/// Only the constructors below build one. Mutation goes through
/// [`add_field`](Self::add_field), [`add_fields`](Self::add_fields) and
/// [`wrap`](Self::wrap), all of which act on the same instance.
#[derive(Debug)]
pub struct DataError {
    inner: BoxError,
    code: String,
    message: String,
    cause: Option<Box<DataError>>,
    transient: bool,
    fields: HashMap<String, Value>,
}

impl DataError {
    /// Create a permanent error from the information provided.
    ///
    /// An empty `code` is replaced by [`UNKNOWN_CODE`].
    pub fn new(
        inner: impl Into<BoxError>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::build(inner.into(), code.into(), message.into(), false)
    }

    /// Same as [`new`](Self::new) but flagged transient, for failures the
    /// caller already knows may succeed on retry (timeouts, resets).
    pub fn transient(
        inner: impl Into<BoxError>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::build(inner.into(), code.into(), message.into(), true)
    }

    /// Create an error from a database failure.
    ///
    /// When `inner` is a [`sqlx::Error::Database`] whose driver reports a
    /// native code, that code is used verbatim. Anything else gets
    /// [`UNKNOWN_CODE`].
    pub fn from_database(inner: impl Into<BoxError>, message: impl Into<String>) -> Self {
        let inner = inner.into();
        let code = database_code(&*inner).unwrap_or_else(|| UNKNOWN_CODE.to_owned());
        Self::build(inner, code, message.into(), false)
    }

    /// Create an error from an [`HttpProblem`], copying its code and
    /// transience. Anything else gets [`UNKNOWN_CODE`] and is not transient.
    pub fn from_http_problem(inner: impl Into<BoxError>, message: impl Into<String>) -> Self {
        let inner = inner.into();
        let (code, transient) = match inner.downcast_ref::<HttpProblem>() {
            Some(problem) => (problem.code.clone(), problem.is_transient),
            None => (UNKNOWN_CODE.to_owned(), false),
        };
        Self::build(inner, code, message.into(), transient)
    }

    fn build(inner: BoxError, code: String, message: String, transient: bool) -> Self {
        let code = if code.is_empty() {
            UNKNOWN_CODE.to_owned()
        } else {
            code
        };
        Self {
            inner,
            code,
            message,
            cause: None,
            transient,
            fields: HashMap::new(),
        }
    }

    /// Machine friendly code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Message given at the call site that created this error
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The originating error
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    /// Give up the enrichment and take back the originating error.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.inner
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    /// Whether no specific code could be derived.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.code == UNKNOWN_CODE
    }

    /// Set `cause` as the cause of this error and return this error.
    ///
    /// A second call replaces the earlier cause.
    pub fn wrap(&mut self, cause: DataError) -> &mut Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Builder form of [`wrap`](Self::wrap).
    #[must_use]
    pub fn with_cause(mut self, cause: DataError) -> Self {
        self.wrap(cause);
        self
    }

    #[must_use]
    pub fn cause(&self) -> Option<&DataError> {
        self.cause.as_deref()
    }

    /// Walk the cause chain, nearest cause first. Does not yield `self`.
    #[must_use]
    pub fn causes(&self) -> Causes<'_> {
        Causes { next: self.cause() }
    }

    /// The deepest error in the chain, `self` if nothing was wrapped.
    #[must_use]
    pub fn root_cause(&self) -> &DataError {
        self.causes().last().unwrap_or(self)
    }

    /// Extra fields describing the failure. This is the live map, not a copy.
    #[must_use]
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.fields
    }

    /// Insert a field, overwriting any existing value under `key`.
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add every pair through [`add_field`](Self::add_field).
    ///
    /// NOTE: keys already present are overwritten.
    pub fn add_fields<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in fields {
            self.add_field(key, value);
        }
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_field(key, value);
        self
    }
}

fn database_code(err: &(dyn StdError + Send + Sync + 'static)) -> Option<String> {
    match err.downcast_ref::<sqlx::Error>()? {
        sqlx::Error::Database(db) => db.code().map(Cow::into_owned),
        _ => None,
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Code: [{}] Message: [{}] Inner error: [{}]",
            self.code, self.message, self.inner
        )
    }
}

impl StdError for DataError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.inner)
    }
}

impl From<HttpProblem> for DataError {
    fn from(problem: HttpProblem) -> Self {
        let message = problem
            .detail
            .clone()
            .or_else(|| problem.title.clone())
            .unwrap_or_default();
        Self::from_http_problem(problem, message)
    }
}

/// Iterator over a [`DataError`] cause chain, see [`DataError::causes`].
#[derive(Debug, Clone)]
pub struct Causes<'a> {
    next: Option<&'a DataError>,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a DataError;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}
