// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Lion Test: unit test support for Lion packages.
//!
//! Validated reflection access, domain exception expectations and fixture
//! helpers behind one import.
//!
//! # Quick Start
//!
//! ```rust
//! use lion_test::prelude::*;
//!
//! lion_test::lion_exception! {
//!     pub struct SessionError;
//! }
//!
//! lion_test::init_test_logging();
//!
//! let result = TestCase::run(|case| {
//!     case.exception(ExceptionType::of::<SessionError>())
//!         .exception_message("ERR")
//!         .exception_status("session-error")
//!         .exception_code(500)
//!         .expect_lion_exception()
//! });
//! assert!(result.is_ok());
//! ```

pub use lion_test_core as core;
pub use lion_test_core::lion_exception;
pub use lion_test_fixtures as fixtures;

/// Prelude module for common imports.
pub mod prelude {
    pub use lion_test_core::{
        Args, Exception, ExceptionCode, ExceptionExpectation, ExceptionType, HarnessConfig,
        LionException, Reflect, ReflectionAccessor, TestCase, TestError, Throwable,
        TypeDescriptor, assert_instances,
    };
    pub use lion_test_fixtures::{
        AmbientContext, ImageSpec, OutputBuffer, RequestContext, Scope,
        assert_header_not_has_key, assert_http_body_not_has_key, assert_is_date,
        assert_json_content, assert_with_output, create_directory, create_image,
        get_exception_from_api, get_response, rmdir_recursively,
    };
}

/// Installs a `tracing` subscriber that writes through the test harness.
///
/// The filter comes from `RUST_LOG`. Calling it more than once is harmless.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
