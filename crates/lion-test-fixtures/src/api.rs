//! Capturing exceptions raised by API calls.

use lion_test_core::Throwable;

/// Runs `callback` and hands back whatever it raised, if anything.
///
/// Domain exceptions and foreign errors are both captured so the test can
/// inspect them instead of failing on propagation.
pub fn get_exception_from_api<F>(callback: F) -> Option<Throwable>
where
    F: FnOnce() -> Result<(), Throwable>,
{
    match callback() {
        Ok(()) => None,
        Err(raised) => {
            tracing::debug!(
                error = %raised,
                lion = raised.is_lion(),
                "captured exception from api"
            );
            Some(raised)
        }
    }
}
