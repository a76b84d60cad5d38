//! Assertion primitives.
//!
//! Each primitive returns [`TestError::Assertion`] instead of panicking so that
//! helpers can compose them with `?` and tests decide how to fail.

use std::fmt::Debug;

use crate::error::{Result, TestError};
use crate::reflection::{Reflect, TypeDescriptor};

/// Strict equality.
pub fn assert_same<T>(expected: &T, actual: &T, what: &str) -> Result<()>
where
    T: PartialEq + Debug + ?Sized,
{
    if expected == actual {
        Ok(())
    } else {
        Err(TestError::assertion(format!("{what}: expected {expected:?}, got {actual:?}")))
    }
}

/// The condition must hold.
pub fn assert_true(condition: bool, what: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(TestError::assertion(format!("{what}: expected true, got false")))
    }
}

/// `key` must not be present according to `contains`.
pub fn assert_key_absent(
    key: &str,
    contains: impl FnOnce(&str) -> bool,
    scope: &str,
) -> Result<()> {
    if contains(key) {
        Err(TestError::assertion(format!("{scope}: key '{key}' is still present")))
    } else {
        Ok(())
    }
}

/// Every name must be the type of `instance` or a capability it declares.
pub fn assert_instances<T: Reflect>(_instance: &T, names: &[&str]) -> Result<()> {
    assert_descriptor_instances(&T::type_descriptor(), names)
}

/// Descriptor form of [`assert_instances`].
pub fn assert_descriptor_instances(descriptor: &TypeDescriptor, names: &[&str]) -> Result<()> {
    for name in names {
        if !descriptor.implements(name) {
            return Err(TestError::assertion(format!(
                "{} is not an instance of {name}",
                descriptor.name()
            )));
        }
    }
    Ok(())
}
