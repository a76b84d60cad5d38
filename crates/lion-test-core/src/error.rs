//! Test error types.
//!
//! Errors raised by this crate itself. Reflection and configuration errors are
//! kept distinct from [`TestError::Assertion`] so a misconfigured test reads
//! differently from an assertion that did not hold.

/// Result type alias for test support operations.
pub type Result<T> = std::result::Result<T, TestError>;

/// Testing errors.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    /// The bound type has no method with this name.
    #[error("Method {method} does not exist in class {class}.")]
    MethodNotFound {
        /// Requested method name.
        method: String,
        /// Name of the bound type.
        class: String,
    },

    /// The bound type has no field with this name.
    #[error("Property '{property}' does not exist in class {class}.")]
    PropertyNotFound {
        /// Requested field name.
        property: String,
        /// Name of the bound type.
        class: String,
    },

    /// Reflective access attempted before an instance was bound.
    #[error("reflection has not been initialized; call init_reflection first")]
    ReflectionNotInitialized,

    /// The exception expectation is incomplete or names an unusable type.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Assertion failed.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A helper received an argument it cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Image generation failed.
    #[error("image error: {0}")]
    Image(String),

    /// Harness configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON conversion error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TestError {
    /// Creates a method-not-found error.
    #[must_use]
    pub fn method_not_found(method: impl Into<String>, class: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
            class: class.into(),
        }
    }

    /// Creates a property-not-found error.
    #[must_use]
    pub fn property_not_found(property: impl Into<String>, class: impl Into<String>) -> Self {
        Self::PropertyNotFound {
            property: property.into(),
            class: class.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates an assertion error.
    #[must_use]
    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::Assertion(msg.into())
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true for reflective lookups of members that do not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MethodNotFound { .. } | Self::PropertyNotFound { .. }
        )
    }

    /// Returns true if this error is an assertion mismatch.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}
