// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # lion-test-core
//!
//! Reflection access and domain exception expectations for unit tests.
//!
//! This crate provides:
//! - **Reflection**: validated read/write of non-public fields and invocation
//!   of non-public methods through a cached [`TypeDescriptor`]
//! - **Exception family**: [`LionException`], the stock [`Exception`] and the
//!   [`lion_exception!`] declaration macro
//! - **Expectations**: a chainable [`ExceptionExpectation`] with automatic and
//!   callback terminal modes
//! - **Harness**: a per-test [`TestCase`] that verifies registered
//!   expectations once the test body returns
//!
//! ## Example
//!
//! ```rust
//! use lion_test_core::{ExceptionType, LionException, TestCase};
//!
//! lion_test_core::lion_exception! {
//!     pub struct SessionError;
//! }
//!
//! let result = TestCase::run(|case| {
//!     case.exception(ExceptionType::of::<SessionError>())
//!         .exception_message("ERR")
//!         .exception_status("session-error")
//!         .exception_code(500)
//!         .expect_lion_exception_with(|| {
//!             Err(SessionError::new("ERR", "session-error", 500).into_throwable())
//!         })
//! });
//! assert!(result.is_ok());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assert;
pub mod config;
pub mod error;
pub mod exception;
pub mod expectation;
pub mod harness;
pub mod host;
pub mod reflection;

pub use assert::{assert_instances, assert_same};
pub use config::{HarnessConfig, ImageDefaults, MessageMatch};
pub use error::{Result, TestError};
pub use exception::{
    Exception, ExceptionCode, ExceptionType, LionException, RaisedException, Throwable,
};
pub use expectation::ExceptionExpectation;
pub use harness::{TestCase, TestCaseBuilder};
pub use host::ExpectedOutcome;
pub use reflection::{Args, Reflect, ReflectionAccessor, TypeDescriptor};
