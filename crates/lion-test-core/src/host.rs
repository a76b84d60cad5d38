//! Exception expectations registered with the host.
//!
//! The registry holds three independent expectations (type, message, code).
//! Once the test body has finished, [`ExpectedOutcome::verify`] checks them
//! against what the body raised.

use crate::config::MessageMatch;
use crate::error::TestError;
use crate::exception::{ExceptionCode, ExceptionType, Throwable};

/// Registered exception expectations of one test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedOutcome {
    exception: Option<ExceptionType>,
    message: Option<String>,
    code: Option<ExceptionCode>,
}

impl ExpectedOutcome {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects the test to end by raising exactly this type.
    pub fn expect_exception(&mut self, exception: ExceptionType) {
        self.exception = Some(exception);
    }

    /// Expects the raised exception to carry this message.
    pub fn expect_exception_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Expects the raised exception to carry this code.
    pub fn expect_exception_code(&mut self, code: impl Into<ExceptionCode>) {
        self.code = Some(code.into());
    }

    /// Returns true if any expectation is registered.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.exception.is_some() || self.message.is_some() || self.code.is_some()
    }

    /// Registered exception type.
    #[must_use]
    pub const fn exception(&self) -> Option<ExceptionType> {
        self.exception
    }

    /// Registered message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Registered code.
    #[must_use]
    pub const fn code(&self) -> Option<&ExceptionCode> {
        self.code.as_ref()
    }

    /// Checks the outcome of a test body against the registered expectations.
    ///
    /// With nothing registered the outcome is returned unchanged. Otherwise
    /// the body must have raised, and the raised error must satisfy every
    /// registration; a satisfied expectation turns the outcome into `Ok`.
    ///
    /// # Errors
    /// Returns the unexpected error, or [`TestError::Assertion`] describing
    /// the first registration that did not hold.
    pub fn verify(
        &self,
        outcome: Result<(), Throwable>,
        message_match: MessageMatch,
    ) -> Result<(), Throwable> {
        if !self.is_armed() {
            return outcome;
        }

        let raised = match outcome {
            Ok(()) => {
                return Err(TestError::assertion(format!(
                    "Failed asserting that exception of type {} is thrown",
                    self.describe_type()
                ))
                .into());
            }
            Err(raised) => raised,
        };

        match raised {
            // Harness failures are never what a test expects.
            Throwable::Test(err)
                if err.is_assertion() || matches!(err, TestError::InvalidConfiguration(_)) =>
            {
                Err(err.into())
            }
            Throwable::Lion(exception) => {
                if let Some(expected) = self.exception
                    && exception.exception_type() != expected
                {
                    return Err(TestError::assertion(format!(
                        "Failed asserting that exception of type {} matches expected exception {}",
                        exception.exception_type(),
                        expected
                    ))
                    .into());
                }
                if let Some(expected) = &self.message
                    && !message_match.matches(expected, exception.message())
                {
                    return Err(TestError::assertion(format!(
                        "Failed asserting that exception message '{}' contains '{expected}'",
                        exception.message()
                    ))
                    .into());
                }
                if let Some(expected) = &self.code
                    && exception.code() != expected
                {
                    return Err(TestError::assertion(format!(
                        "Failed asserting that {} is equal to expected exception code {expected}",
                        exception.code()
                    ))
                    .into());
                }
                tracing::debug!(
                    exception = %exception.exception_type(),
                    "expected exception observed"
                );
                Ok(())
            }
            other => self.check_foreign(&other, message_match),
        }
    }

    /// Errors outside the domain family only satisfy a message-only expectation.
    fn check_foreign(
        &self,
        raised: &Throwable,
        message_match: MessageMatch,
    ) -> Result<(), Throwable> {
        if self.exception.is_some() || self.code.is_some() {
            return Err(TestError::assertion(format!(
                "Failed asserting that exception of type {} is thrown, got: {raised}",
                self.describe_type()
            ))
            .into());
        }
        let actual = raised.to_string();
        match &self.message {
            Some(expected) if !message_match.matches(expected, &actual) => {
                Err(TestError::assertion(format!(
                    "Failed asserting that exception message '{actual}' contains '{expected}'"
                ))
                .into())
            }
            _ => Ok(()),
        }
    }

    fn describe_type(&self) -> String {
        self.exception
            .map_or_else(|| "any".to_string(), |kind| kind.name().to_string())
    }
}
