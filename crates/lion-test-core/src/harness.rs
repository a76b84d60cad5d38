//! Per-test harness.
//!
//! A [`TestCase`] is created fresh for every test method. It carries the
//! reflection accessor, the exception expectation and the host registry, and
//! [`TestCaseBuilder::run`] verifies the registry once the body has returned.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::HarnessConfig;
use crate::error::{Result, TestError};
use crate::exception::{ExceptionCode, ExceptionType, Throwable};
use crate::expectation::ExceptionExpectation;
use crate::host::ExpectedOutcome;
use crate::reflection::{Args, Reflect, ReflectionAccessor};

/// State of one test method.
///
/// Host registrations are only checked by [`TestCase::finish`]; a case dropped
/// with pending registrations logs a warning.
#[derive(Debug)]
#[must_use = "registered expectations are only verified by `finish`"]
pub struct TestCase {
    name: String,
    config: HarnessConfig,
    reflection: Option<ReflectionAccessor>,
    expectation: ExceptionExpectation,
    outcome: ExpectedOutcome,
    finished: bool,
}

impl TestCase {
    /// Creates a new test case builder.
    #[must_use]
    pub fn builder() -> TestCaseBuilder {
        TestCaseBuilder::default()
    }

    /// Creates a test case with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Runs `body` on a fresh test case with default settings.
    ///
    /// # Errors
    /// Returns whatever the body raised that no registered expectation
    /// accounts for.
    pub fn run<F>(body: F) -> std::result::Result<(), Throwable>
    where
        F: FnOnce(&mut Self) -> std::result::Result<(), Throwable>,
    {
        Self::builder().run(body)
    }

    /// Name of the test.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Harness configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    // ── Reflection ──────────────────────────────────────────────────────────

    /// Binds `instance` for reflective access, replacing any previous binding.
    pub fn init_reflection<T: Reflect>(&mut self, instance: T) {
        self.reflection = Some(ReflectionAccessor::new(instance));
    }

    /// The active accessor.
    ///
    /// # Errors
    /// [`TestError::ReflectionNotInitialized`] before `init_reflection`.
    pub fn reflection(&self) -> Result<&ReflectionAccessor> {
        self.reflection
            .as_ref()
            .ok_or(TestError::ReflectionNotInitialized)
    }

    fn reflection_mut(&mut self) -> Result<&mut ReflectionAccessor> {
        self.reflection
            .as_mut()
            .ok_or(TestError::ReflectionNotInitialized)
    }

    /// Invokes a non-public method of the bound instance.
    ///
    /// # Errors
    /// See [`ReflectionAccessor::invoke_private_method`].
    pub fn invoke_private_method(
        &mut self,
        method: &str,
        args: impl Into<Args>,
    ) -> std::result::Result<Value, Throwable> {
        self.reflection_mut()?.invoke_private_method(method, args)
    }

    /// Reads a non-public field of the bound instance.
    ///
    /// # Errors
    /// See [`ReflectionAccessor::read_private_field`].
    pub fn read_private_field(&self, field: &str) -> Result<Value> {
        self.reflection()?.read_private_field(field)
    }

    /// Reads a non-public field and decodes it as `T`.
    ///
    /// # Errors
    /// See [`ReflectionAccessor::read_private_field_as`].
    pub fn read_private_field_as<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        self.reflection()?.read_private_field_as(field)
    }

    /// Overwrites a non-public field of the bound instance.
    ///
    /// # Errors
    /// See [`ReflectionAccessor::write_private_field`].
    pub fn write_private_field(&mut self, field: &str, value: impl Serialize) -> Result<()> {
        self.reflection_mut()?.write_private_field(field, value)
    }

    /// Asserts that a non-public field strictly equals `expected`.
    ///
    /// # Errors
    /// Reflection errors, or [`TestError::Assertion`] on mismatch.
    pub fn assert_property_value(&self, field: &str, expected: impl Serialize) -> Result<()> {
        let expected = serde_json::to_value(expected)?;
        let actual = self.read_private_field(field)?;
        crate::assert::assert_same(&expected, &actual, field)
    }

    /// The bound instance, if it is a `T`.
    #[must_use]
    pub fn target<T: Reflect>(&self) -> Option<&T> {
        self.reflection.as_ref().and_then(|r| r.target::<T>())
    }

    /// The bound instance, mutably, if it is a `T`.
    #[must_use]
    pub fn target_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.reflection.as_mut().and_then(|r| r.target_mut::<T>())
    }

    // ── Exception expectation ───────────────────────────────────────────────

    /// Sets the expected exception type.
    pub fn exception(&mut self, exception: ExceptionType) -> &mut Self {
        self.expectation = std::mem::take(&mut self.expectation).exception(exception);
        self
    }

    /// Sets the expected exception message.
    pub fn exception_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.expectation = std::mem::take(&mut self.expectation).message(message);
        self
    }

    /// Sets the expected exception status.
    pub fn exception_status(&mut self, status: impl Into<String>) -> &mut Self {
        self.expectation = std::mem::take(&mut self.expectation).status(status);
        self
    }

    /// Sets the expected exception code.
    pub fn exception_code(&mut self, code: impl Into<ExceptionCode>) -> &mut Self {
        self.expectation = std::mem::take(&mut self.expectation).code(code);
        self
    }

    /// The configured exception expectation.
    #[must_use]
    pub const fn expectation(&self) -> &ExceptionExpectation {
        &self.expectation
    }

    /// Automatic mode: raises the configured exception for the host to observe.
    ///
    /// Always returns `Err`; propagate it with `?`. See
    /// [`ExceptionExpectation::throw`].
    ///
    /// # Errors
    /// The configured exception, an invalid configuration, or a status
    /// assertion failure.
    pub fn expect_lion_exception(&mut self) -> std::result::Result<(), Throwable> {
        Err(self.expectation.throw(&mut self.outcome))
    }

    /// Callback mode: runs `work` and asserts the domain exception it raises.
    ///
    /// # Errors
    /// See [`ExceptionExpectation::verify_work`].
    pub fn expect_lion_exception_with<F>(&mut self, work: F) -> std::result::Result<(), Throwable>
    where
        F: FnOnce() -> std::result::Result<(), Throwable>,
    {
        self.expectation
            .verify_work(work, self.config.require_raised_exception)
    }

    // ── Host registrations ──────────────────────────────────────────────────

    /// Expects the test to end by raising exactly this type.
    pub fn expect_exception(&mut self, exception: ExceptionType) {
        self.outcome.expect_exception(exception);
    }

    /// Expects the raised exception to carry this message.
    pub fn expect_exception_message(&mut self, message: impl Into<String>) {
        self.outcome.expect_exception_message(message);
    }

    /// Expects the raised exception to carry this code.
    pub fn expect_exception_code(&mut self, code: impl Into<ExceptionCode>) {
        self.outcome.expect_exception_code(code);
    }

    /// Registered host expectations.
    #[must_use]
    pub const fn expected_outcome(&self) -> &ExpectedOutcome {
        &self.outcome
    }

    /// Returns true if expectations are registered but not yet verified.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.finished && self.outcome.is_armed()
    }

    /// Verifies the body's outcome against the registered expectations.
    ///
    /// # Errors
    /// See [`ExpectedOutcome::verify`].
    pub fn finish(
        mut self,
        outcome: std::result::Result<(), Throwable>,
    ) -> std::result::Result<(), Throwable> {
        self.finished = true;
        let verdict = self.outcome.verify(outcome, self.config.message_match);
        match &verdict {
            Ok(()) => tracing::info!(test = %self.name, "test case passed"),
            Err(err) => tracing::warn!(test = %self.name, error = %err, "test case failed"),
        }
        verdict
    }
}

impl Default for TestCase {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestCase {
    fn drop(&mut self) {
        if self.is_pending() {
            tracing::warn!(
                test = %self.name,
                "test case dropped with unverified exception expectations; call finish or run"
            );
        }
    }
}

/// Builder for a test case.
#[derive(Debug, Default)]
pub struct TestCaseBuilder {
    name: Option<String>,
    config: Option<HarnessConfig>,
}

impl TestCaseBuilder {
    /// Sets the test name (defaults to the current thread name).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the harness configuration.
    #[must_use]
    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the test case.
    #[must_use]
    pub fn build(self) -> TestCase {
        // The libtest harness names each test thread after the test.
        let name = self.name.unwrap_or_else(|| {
            std::thread::current().name().unwrap_or("test").to_string()
        });

        TestCase {
            name,
            config: self.config.unwrap_or_default(),
            reflection: None,
            expectation: ExceptionExpectation::new(),
            outcome: ExpectedOutcome::new(),
            finished: false,
        }
    }

    /// Builds a fresh test case, runs `body` on it and verifies the outcome.
    ///
    /// # Errors
    /// Returns whatever the body raised that no registered expectation
    /// accounts for.
    pub fn run<F>(self, body: F) -> std::result::Result<(), Throwable>
    where
        F: FnOnce(&mut TestCase) -> std::result::Result<(), Throwable>,
    {
        let mut case = self.build();
        let span = tracing::info_span!("test_case", name = %case.name);
        let _guard = span.enter();

        let outcome = body(&mut case);
        case.finish(outcome)
    }
}
