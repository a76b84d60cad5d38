//! End-to-end tests of the per-test harness against a realistic provider.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod provider;

use lion_test_core::{
    Args, ExceptionCode, ExceptionType, HarnessConfig, LionException, Reflect, TestCase, TestError,
    Throwable, assert_instances,
};
use provider::{AuthProvider, ClassProvider, ExceptionProvider};
use serde_json::{Value, json};

fn session_case(case: &mut TestCase) -> &mut TestCase {
    case.exception(ExceptionType::of::<ExceptionProvider>())
        .exception_message("ERR")
        .exception_status("session-error")
        .exception_code(500)
}

// ============================================================================
// Reflection
// ============================================================================

#[test]
fn test_invoke_private_method_without_args() {
    TestCase::run(|case| {
        case.init_reflection(ClassProvider::default());
        let bits = case.invoke_private_method("get_bits", Args::new())?;
        assert_eq!(bits, json!(100));
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_invoke_private_method_with_args() {
    TestCase::run(|case| {
        case.init_reflection(ClassProvider::default());
        let returned = case.invoke_private_method("subtract_bits", [json!(84)])?;
        assert_eq!(returned, Value::Null);
        case.assert_property_value("bits", 16)?;
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_invoke_private_method_with_return() {
    let mut case = TestCase::new();
    case.init_reflection(ClassProvider::default());
    let result = case.invoke_private_method("result_bits", [json!(84)]).unwrap();
    assert_eq!(result, json!(16));
}

#[test]
fn test_read_and_write_private_field() {
    let mut case = TestCase::new();
    case.init_reflection(ClassProvider::default());
    assert_eq!(case.read_private_field("bits").unwrap(), json!(100));

    case.write_private_field("bits", 16).unwrap();
    assert_eq!(case.read_private_field_as::<i64>("bits").unwrap(), 16);
    assert_eq!(
        case.invoke_private_method("get_bits", Args::new()).unwrap(),
        json!(16)
    );
}

#[test]
fn test_assert_property_value_mismatch() {
    let mut case = TestCase::new();
    case.init_reflection(ClassProvider::default());
    let err = case.assert_property_value("bits", 84).unwrap_err();
    assert!(err.is_assertion());
}

#[test]
fn test_unknown_member_names_class() {
    let mut case = TestCase::new();
    case.init_reflection(ClassProvider::default());

    let err = case.invoke_private_method("missing", Args::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Method missing does not exist in class ClassProvider."
    );

    let err = case.read_private_field("missing").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Property 'missing' does not exist in class ClassProvider."
    );
    assert!(err.is_not_found());
}

#[test]
fn test_target_state_is_shared_with_accessor() {
    let mut case = TestCase::new();
    case.init_reflection(ClassProvider::default());
    case.target_mut::<ClassProvider>().unwrap().set_bits(42);
    case.assert_property_value("bits", 42).unwrap();
}

#[test]
fn test_assert_instances_uses_declared_capabilities() {
    let provider = ClassProvider::default();
    assert_instances(&provider, &["ClassProvider", "TestProviderInterface"]).unwrap();
    assert!(assert_instances(&provider, &["Countable"]).is_err());
}

// ============================================================================
// Exception expectations
// ============================================================================

#[test]
fn test_expect_lion_exception_automatic_mode() {
    TestCase::run(|case| session_case(case).expect_lion_exception()).unwrap();
}

#[test]
fn test_expect_lion_exception_callback_mode() {
    TestCase::run(|case| {
        session_case(case).expect_lion_exception_with(|| {
            Err(ExceptionProvider::new("ERR", "session-error", 500).into_throwable())
        })
    })
    .unwrap();
}

#[test]
fn test_callback_mode_through_private_method() {
    TestCase::run(|case| {
        let mut provider = ClassProvider::default();
        provider.set_bits(-1);
        session_case(case).expect_lion_exception_with(|| {
            provider.invoke_method("validate_session", Args::new()).map(drop)
        })
    })
    .unwrap();
}

#[test]
fn test_callback_mode_status_mismatch_fails() {
    let err = TestCase::run(|case| {
        session_case(case).expect_lion_exception_with(|| {
            Err(ExceptionProvider::new("ERR", "other-status", 500).into_throwable())
        })
    })
    .unwrap_err();
    assert!(err.as_test_error().is_some_and(TestError::is_assertion));
    assert!(err.to_string().contains("other-status"));
}

#[test]
fn test_callback_mode_other_family_member_fails() {
    let err = TestCase::run(|case| {
        session_case(case).expect_lion_exception_with(|| {
            Err(AuthProvider::new("ERR", "session-error", 500).into_throwable())
        })
    })
    .unwrap_err();
    assert!(err.to_string().contains("exception type"));
}

#[test]
fn test_callback_mode_no_exception() {
    let err = TestCase::run(|case| session_case(case).expect_lion_exception_with(|| Ok(())))
        .unwrap_err();
    assert!(err.to_string().contains("is thrown"));

    let lenient = HarnessConfig {
        require_raised_exception: false,
        ..HarnessConfig::default()
    };
    TestCase::builder()
        .with_config(lenient)
        .run(|case| session_case(case).expect_lion_exception_with(|| Ok(())))
        .unwrap();
}

#[test]
fn test_automatic_mode_rejects_non_family_type() {
    let err = TestCase::run(|case| {
        session_case(case)
            .exception(ExceptionType::opaque::<ClassProvider>())
            .expect_lion_exception()
    })
    .unwrap_err();
    assert!(matches!(
        err.as_test_error(),
        Some(TestError::InvalidConfiguration(_))
    ));
    assert!(err.to_string().contains("must implement LionException"));
}

#[test]
fn test_text_code_is_distinct_from_int_code() {
    let err = TestCase::run(|case| {
        session_case(case).expect_lion_exception_with(|| {
            Err(ExceptionProvider::new("ERR", "session-error", "500").into_throwable())
        })
    })
    .unwrap_err();
    assert!(err.to_string().contains("exception code"));
    assert_ne!(ExceptionCode::from(500), ExceptionCode::from("500"));
}

#[test]
fn test_foreign_error_is_not_inspected() {
    let err = TestCase::run(|case| {
        session_case(case).expect_lion_exception_with(|| Err(Throwable::other("db offline")))
    })
    .unwrap_err();
    assert!(matches!(err, Throwable::Other(_)));
}
