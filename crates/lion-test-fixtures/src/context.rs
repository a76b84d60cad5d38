//! Ambient request context.
//!
//! Request-scoped key/value data (server headers, query string, form body,
//! uploads and cookies) that code under test reads implicitly. Tests clear
//! keys between cases and assert that nothing leaked.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use lion_test_core::assert::assert_key_absent;
use lion_test_core::{Result, TestError};
use parking_lot::RwLock;
use serde_json::Value;

/// Section of the request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Server variables and request headers.
    Server,
    /// Query string parameters.
    Query,
    /// Form body fields.
    Body,
    /// Uploaded files.
    Files,
    /// Cookies.
    Cookies,
}

impl Scope {
    /// Every scope, in lookup order.
    pub const ALL: [Self; 5] = [
        Self::Server,
        Self::Query,
        Self::Body,
        Self::Files,
        Self::Cookies,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Query => "query",
            Self::Body => "body",
            Self::Files => "files",
            Self::Cookies => "cookies",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide request state visible to code under test.
pub trait AmbientContext: Send + Sync {
    /// Returns true if `key` is set in `scope`.
    fn contains(&self, scope: Scope, key: &str) -> bool;

    /// Removes `key` from `scope`. Missing keys are ignored.
    fn clear(&self, scope: Scope, key: &str);
}

/// In-memory request context.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    scopes: Arc<RwLock<HashMap<Scope, BTreeMap<String, Value>>>>,
}

impl RequestContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` in `scope`, returning the previous value.
    pub fn insert(
        &self,
        scope: Scope,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.scopes
            .write()
            .entry(scope)
            .or_default()
            .insert(key.into(), value.into())
    }

    /// Value of `key` in `scope`.
    #[must_use]
    pub fn get(&self, scope: Scope, key: &str) -> Option<Value> {
        self.scopes
            .read()
            .get(&scope)
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Keys set in `scope`, sorted.
    #[must_use]
    pub fn keys(&self, scope: Scope) -> Vec<String> {
        self.scopes
            .read()
            .get(&scope)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns true if no scope holds any key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.read().values().all(BTreeMap::is_empty)
    }

    /// Drops every key of every scope.
    pub fn reset(&self) {
        self.scopes.write().clear();
    }
}

impl AmbientContext for RequestContext {
    fn contains(&self, scope: Scope, key: &str) -> bool {
        self.scopes
            .read()
            .get(&scope)
            .is_some_and(|entries| entries.contains_key(key))
    }

    fn clear(&self, scope: Scope, key: &str) {
        if let Some(entries) = self.scopes.write().get_mut(&scope) {
            entries.remove(key);
        }
    }
}

/// Clears `header` from the server scope and asserts it is gone.
///
/// # Errors
/// [`TestError::InvalidArgument`] for an empty name, [`TestError::Assertion`]
/// if the header survived.
pub fn assert_header_not_has_key<C>(context: &C, header: &str) -> Result<()>
where
    C: AmbientContext + ?Sized,
{
    if header.is_empty() {
        return Err(TestError::invalid_argument("Header name cannot be empty."));
    }
    clear_and_check(context, Scope::Server, header)
}

/// Clears `key` from every scope that holds it and asserts it is gone.
///
/// # Errors
/// [`TestError::InvalidArgument`] for an empty key, [`TestError::Assertion`]
/// if the key survived in some scope.
pub fn assert_http_body_not_has_key<C>(context: &C, key: &str) -> Result<()>
where
    C: AmbientContext + ?Sized,
{
    if key.is_empty() {
        return Err(TestError::invalid_argument("Superglobal key cannot be empty."));
    }
    for scope in Scope::ALL {
        if context.contains(scope, key) {
            clear_and_check(context, scope, key)?;
        }
    }
    Ok(())
}

fn clear_and_check<C>(context: &C, scope: Scope, key: &str) -> Result<()>
where
    C: AmbientContext + ?Sized,
{
    context.clear(scope, key);
    tracing::debug!(%scope, key, "request context key cleared");
    assert_key_absent(key, |k| context.contains(scope, k), scope.as_str())
}
