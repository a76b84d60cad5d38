//! Declarative domain exception expectations.
//!
//! An [`ExceptionExpectation`] accumulates type, message, status and code,
//! then ends in one of two terminal modes:
//!
//! - **automatic** ([`ExceptionExpectation::throw`]): registers the
//!   expectation with the host, builds the configured exception and raises
//!   it;
//! - **callback** ([`ExceptionExpectation::verify_work`]): runs a unit of work
//!   and asserts the domain exception it raises field by field.

use crate::assert::assert_same;
use crate::error::TestError;
use crate::exception::{ExceptionCode, ExceptionType, RaisedException, Throwable};
use crate::host::ExpectedOutcome;

/// Expected domain exception: type, message, status and code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionExpectation {
    exception: Option<ExceptionType>,
    message: Option<String>,
    status: Option<String>,
    code: Option<ExceptionCode>,
}

/// Fully configured expectation.
struct Configured<'a> {
    exception: ExceptionType,
    message: &'a str,
    status: &'a str,
    code: &'a ExceptionCode,
}

impl ExceptionExpectation {
    /// Creates an unconfigured expectation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected exception type.
    #[must_use]
    pub fn exception(mut self, exception: ExceptionType) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Sets the expected message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the expected response status.
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the expected code.
    #[must_use]
    pub fn code(mut self, code: impl Into<ExceptionCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Expected exception type, if set.
    #[must_use]
    pub const fn expected_type(&self) -> Option<ExceptionType> {
        self.exception
    }

    /// Expected message, if set.
    #[must_use]
    pub fn expected_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Expected status, if set.
    #[must_use]
    pub fn expected_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Expected code, if set.
    #[must_use]
    pub const fn expected_code(&self) -> Option<&ExceptionCode> {
        self.code.as_ref()
    }

    fn configured(&self) -> Result<Configured<'_>, TestError> {
        let missing = |field: &str| {
            TestError::invalid_configuration(format!(
                "the exception {field} has not been configured"
            ))
        };
        Ok(Configured {
            exception: self.exception.ok_or_else(|| missing("type"))?,
            message: self.message.as_deref().ok_or_else(|| missing("message"))?,
            status: self.status.as_deref().ok_or_else(|| missing("status"))?,
            code: self.code.as_ref().ok_or_else(|| missing("code"))?,
        })
    }

    /// Automatic mode: registers the expectation and raises the configured exception.
    ///
    /// The type is validated before anything is constructed. The status is
    /// asserted here because the host only knows type, message and code.
    /// The returned value is what the test body should propagate.
    #[must_use = "the raised exception must be propagated to the host"]
    pub fn throw(&self, host: &mut ExpectedOutcome) -> Throwable {
        let expected = match self.configured() {
            Ok(expected) => expected,
            Err(err) => return err.into(),
        };

        if !expected.exception.is_throwable() {
            return TestError::invalid_configuration(format!(
                "The exception {} must implement LionException.",
                expected.exception
            ))
            .into();
        }

        let Some(raised) = expected.exception.instantiate(
            expected.message,
            expected.status,
            expected.code.clone(),
        ) else {
            return TestError::invalid_configuration(format!(
                "The exception {} cannot be constructed.",
                expected.exception
            ))
            .into();
        };

        host.expect_exception(expected.exception);
        host.expect_exception_message(expected.message);
        host.expect_exception_code(expected.code.clone());

        if let Err(err) = assert_same(expected.status, raised.status(), "exception status") {
            return err.into();
        }

        tracing::info!(
            exception = %expected.exception,
            status = expected.status,
            code = %expected.code,
            "raising expected exception"
        );
        Throwable::Lion(raised)
    }

    /// Callback mode: runs `work` and asserts the domain exception it raises.
    ///
    /// Fields are compared in order: type, status, message, code. Errors
    /// outside the domain family are returned unchanged without inspection.
    /// When `work` raises nothing, `require_raised` decides between an
    /// assertion failure and a silent pass.
    ///
    /// # Errors
    /// [`TestError::InvalidConfiguration`] if a field is unset,
    /// [`TestError::Assertion`] on the first mismatch, or the error `work`
    /// raised if it is not a domain exception.
    pub fn verify_work<F>(&self, work: F, require_raised: bool) -> Result<(), Throwable>
    where
        F: FnOnce() -> Result<(), Throwable>,
    {
        let expected = self.configured()?;

        match work() {
            Ok(()) if require_raised => Err(TestError::assertion(format!(
                "Failed asserting that exception of type {} is thrown",
                expected.exception
            ))
            .into()),
            Ok(()) => {
                tracing::warn!(
                    exception = %expected.exception,
                    "work raised no exception; expectation passes vacuously"
                );
                Ok(())
            }
            Err(Throwable::Lion(raised)) => {
                Self::compare(&expected, &raised).map_err(Throwable::from)
            }
            Err(other) => Err(other),
        }
    }

    fn compare(expected: &Configured<'_>, raised: &RaisedException) -> Result<(), TestError> {
        if raised.exception_type() != expected.exception {
            return Err(TestError::assertion(format!(
                "exception type: expected {}, got {}",
                expected.exception,
                raised.exception_type()
            )));
        }
        assert_same(expected.status, raised.status(), "exception status")?;
        assert_same(expected.message, raised.message(), "exception message")?;
        assert_same(expected.code, raised.code(), "exception code")?;
        tracing::debug!(exception = %expected.exception, "raised exception matches expectation");
        Ok(())
    }
}
