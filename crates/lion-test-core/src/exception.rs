//! Domain exception family.
//!
//! Lion exceptions carry a response `status` next to the usual message and
//! code. [`LionException`] is the capability every family member implements;
//! [`Exception`] is the stock member and [`lion_exception!`](crate::lion_exception)
//! declares more of them. Anything raised inside a test step travels as a
//! [`Throwable`], which keeps family members apart from other errors.

use std::any::{Any, TypeId};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TestError;

#[doc(hidden)]
pub use serde as __serde;

/// Exception code: an integer or a text code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExceptionCode {
    /// Numeric code (HTTP-like, e.g. `500`).
    Int(i64),
    /// Text code.
    Text(String),
}

impl Default for ExceptionCode {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(code) => write!(f, "{code}"),
            Self::Text(code) => write!(f, "\"{code}\""),
        }
    }
}

impl From<i64> for ExceptionCode {
    fn from(code: i64) -> Self {
        Self::Int(code)
    }
}

impl From<i32> for ExceptionCode {
    fn from(code: i32) -> Self {
        Self::Int(i64::from(code))
    }
}

impl From<u16> for ExceptionCode {
    fn from(code: u16) -> Self {
        Self::Int(i64::from(code))
    }
}

impl From<&str> for ExceptionCode {
    fn from(code: &str) -> Self {
        Self::Text(code.to_string())
    }
}

impl From<String> for ExceptionCode {
    fn from(code: String) -> Self {
        Self::Text(code)
    }
}

/// Capability shared by every member of the domain exception family.
pub trait LionException: std::error::Error + Any + Send + Sync {
    /// Builds the exception from message, status and code.
    fn new(
        message: impl Into<String>,
        status: impl Into<String>,
        code: impl Into<ExceptionCode>,
    ) -> Self
    where
        Self: Sized;

    /// Exception message.
    fn message(&self) -> &str;

    /// Response status (e.g. `"session-error"`).
    fn status(&self) -> &str;

    /// Exception code.
    fn code(&self) -> &ExceptionCode;

    /// JSON body of the exception: `{"code", "status", "message"}`.
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "status": self.status(),
            "message": self.message(),
        })
    }

    /// Wraps the exception for propagation out of a test step.
    fn into_throwable(self) -> Throwable
    where
        Self: Sized,
    {
        Throwable::lion(self)
    }
}

/// Stock member of the domain exception family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    code: ExceptionCode,
    status: String,
    message: String,
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Exception {}

impl LionException for Exception {
    fn new(
        message: impl Into<String>,
        status: impl Into<String>,
        code: impl Into<ExceptionCode>,
    ) -> Self {
        Self {
            code: code.into(),
            status: status.into(),
            message: message.into(),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn code(&self) -> &ExceptionCode {
        &self.code
    }
}

/// Declares a new member of the domain exception family.
///
/// The generated type is a newtype over [`Exception`] with its own identity,
/// so expectations can tell `SessionError` apart from `AuthError`.
///
/// ```
/// use lion_test_core::exception::{ExceptionType, LionException};
///
/// lion_test_core::lion_exception! {
///     /// Raised when the session is missing.
///     pub struct SessionError;
/// }
///
/// let err = SessionError::new("ERR", "session-error", 500);
/// assert_eq!(err.status(), "session-error");
/// assert!(ExceptionType::of::<SessionError>().is_throwable());
/// ```
#[macro_export]
macro_rules! lion_exception {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis struct $name($crate::exception::Exception);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::error::Error for $name {}

        impl $crate::exception::LionException for $name {
            fn new(
                message: impl ::std::convert::Into<::std::string::String>,
                status: impl ::std::convert::Into<::std::string::String>,
                code: impl ::std::convert::Into<$crate::exception::ExceptionCode>,
            ) -> Self {
                Self(<$crate::exception::Exception as $crate::exception::LionException>::new(
                    message, status, code,
                ))
            }

            fn message(&self) -> &str {
                $crate::exception::LionException::message(&self.0)
            }

            fn status(&self) -> &str {
                $crate::exception::LionException::status(&self.0)
            }

            fn code(&self) -> &$crate::exception::ExceptionCode {
                $crate::exception::LionException::code(&self.0)
            }
        }

        impl $crate::exception::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::exception::__serde::Serializer,
            {
                $crate::exception::__serde::Serialize::serialize(&self.0, serializer)
            }
        }
    };
}

type Factory = fn(String, String, ExceptionCode) -> RaisedException;

fn construct<E: LionException>(
    message: String,
    status: String,
    code: ExceptionCode,
) -> RaisedException {
    RaisedException::new(E::new(message, status, code))
}

/// Runtime identifier of an exception type.
///
/// Identifiers built with [`ExceptionType::of`] carry the throwable capability
/// and can construct an instance; [`ExceptionType::opaque`] names any type
/// without it.
#[derive(Clone, Copy)]
pub struct ExceptionType {
    id: TypeId,
    name: &'static str,
    factory: Option<Factory>,
}

impl ExceptionType {
    /// Identifier of a domain exception type.
    #[must_use]
    pub fn of<E: LionException>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
            factory: Some(construct::<E> as Factory),
        }
    }

    /// Identifier of an arbitrary type that cannot be thrown.
    #[must_use]
    pub fn opaque<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            factory: None,
        }
    }

    /// Fully qualified type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if the type belongs to the domain exception family.
    #[must_use]
    pub const fn is_throwable(&self) -> bool {
        self.factory.is_some()
    }

    /// Constructs an instance, or `None` for opaque types.
    #[must_use]
    pub fn instantiate(
        &self,
        message: impl Into<String>,
        status: impl Into<String>,
        code: impl Into<ExceptionCode>,
    ) -> Option<RaisedException> {
        self.factory
            .map(|factory| factory(message.into(), status.into(), code.into()))
    }
}

impl PartialEq for ExceptionType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ExceptionType {}

impl fmt::Debug for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionType")
            .field("name", &self.name)
            .field("throwable", &self.is_throwable())
            .finish()
    }
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A raised member of the domain exception family, tagged with its type.
pub struct RaisedException {
    kind: ExceptionType,
    inner: Box<dyn LionException>,
}

impl RaisedException {
    /// Wraps a domain exception.
    #[must_use]
    pub fn new<E: LionException>(exception: E) -> Self {
        Self {
            kind: ExceptionType::of::<E>(),
            inner: Box::new(exception),
        }
    }

    /// Concrete type of the exception.
    #[must_use]
    pub const fn exception_type(&self) -> ExceptionType {
        self.kind
    }

    /// Message of the exception.
    #[must_use]
    pub fn message(&self) -> &str {
        self.inner.message()
    }

    /// Status of the exception.
    #[must_use]
    pub fn status(&self) -> &str {
        self.inner.status()
    }

    /// Code of the exception.
    #[must_use]
    pub fn code(&self) -> &ExceptionCode {
        self.inner.code()
    }

    /// The exception as a trait object.
    #[must_use]
    pub fn get(&self) -> &dyn LionException {
        self.inner.as_ref()
    }

    /// Downcasts to the concrete exception type.
    #[must_use]
    pub fn downcast_ref<E: LionException>(&self) -> Option<&E> {
        let any: &dyn Any = self.inner.as_ref();
        any.downcast_ref::<E>()
    }
}

impl fmt::Debug for RaisedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RaisedException")
            .field("type", &self.kind.name())
            .field("message", &self.message())
            .field("status", &self.status())
            .field("code", self.code())
            .finish()
    }
}

impl fmt::Display for RaisedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl std::error::Error for RaisedException {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Anything raised inside a test step.
#[derive(Debug, thiserror::Error)]
pub enum Throwable {
    /// A member of the domain exception family.
    #[error(transparent)]
    Lion(#[from] RaisedException),

    /// An error raised by the test support layer itself.
    #[error(transparent)]
    Test(#[from] TestError),

    /// Any other error.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Throwable {
    /// Wraps a domain exception.
    #[must_use]
    pub fn lion<E: LionException>(exception: E) -> Self {
        Self::Lion(RaisedException::new(exception))
    }

    /// Wraps an error from outside the domain family.
    #[must_use]
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Other(error.into())
    }

    /// Returns the domain exception, if this is one.
    #[must_use]
    pub const fn as_lion(&self) -> Option<&RaisedException> {
        match self {
            Self::Lion(raised) => Some(raised),
            _ => None,
        }
    }

    /// Returns the test support error, if this is one.
    #[must_use]
    pub const fn as_test_error(&self) -> Option<&TestError> {
        match self {
            Self::Test(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true for members of the domain exception family.
    #[must_use]
    pub const fn is_lion(&self) -> bool {
        matches!(self, Self::Lion(_))
    }
}

impl From<std::io::Error> for Throwable {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
