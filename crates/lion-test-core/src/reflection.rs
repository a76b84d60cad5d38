//! Validated access to the non-public surface of a system under test.
//!
//! A type opts in by implementing [`Reflect`] in its own module, where its
//! private fields and methods are in scope. [`ReflectionAccessor`] binds one
//! instance, caches its [`TypeDescriptor`] and checks every requested member
//! against it before touching the instance.
//!
//! ```
//! use lion_test_core::reflection::{Args, Reflect, ReflectionAccessor, TypeDescriptor};
//! use lion_test_core::{TestError, Throwable};
//! use serde_json::{Value, json};
//!
//! struct Counter {
//!     bits: i64,
//! }
//!
//! impl Reflect for Counter {
//!     fn type_descriptor() -> TypeDescriptor {
//!         TypeDescriptor::new("Counter").with_field("bits").with_method("get_bits")
//!     }
//!
//!     fn read_field(&self, field: &str) -> Result<Value, TestError> {
//!         match field {
//!             "bits" => Ok(json!(self.bits)),
//!             _ => Err(TestError::property_not_found(field, "Counter")),
//!         }
//!     }
//!
//!     fn write_field(&mut self, field: &str, value: Value) -> Result<(), TestError> {
//!         match field {
//!             "bits" => self.bits = serde_json::from_value(value)?,
//!             _ => return Err(TestError::property_not_found(field, "Counter")),
//!         }
//!         Ok(())
//!     }
//!
//!     fn invoke_method(&mut self, method: &str, _args: Args) -> Result<Value, Throwable> {
//!         match method {
//!             "get_bits" => Ok(json!(self.bits)),
//!             _ => Err(TestError::method_not_found(method, "Counter").into()),
//!         }
//!     }
//! }
//!
//! let mut accessor = ReflectionAccessor::new(Counter { bits: 100 });
//! accessor.write_private_field("bits", 16).unwrap();
//! assert_eq!(accessor.read_private_field("bits").unwrap(), json!(16));
//! ```

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, TestError};
use crate::exception::Throwable;

/// Member tables of one concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    methods: BTreeSet<String>,
    fields: BTreeSet<String>,
    interfaces: BTreeSet<String>,
}

impl TypeDescriptor {
    /// Creates an empty descriptor for the named type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: BTreeSet::new(),
            fields: BTreeSet::new(),
            interfaces: BTreeSet::new(),
        }
    }

    /// Creates an empty descriptor named after `T`.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Declares a method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.methods.insert(method.into());
        self
    }

    /// Declares a field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into());
        self
    }

    /// Declares a capability the type provides.
    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.insert(interface.into());
        self
    }

    /// Type name used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the type declares the method.
    #[must_use]
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    /// Returns true if the type declares the field.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Returns true if `name` is the type itself or one of its declared capabilities.
    #[must_use]
    pub fn implements(&self, name: &str) -> bool {
        self.name == name || self.interfaces.contains(name)
    }

    /// Declared method names, sorted.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }

    /// Declared field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Declared capability names, sorted.
    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(String::as_str)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Positional arguments for a reflectively invoked method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    /// No arguments.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a serializable argument.
    ///
    /// # Errors
    /// Returns an error if the value cannot be represented as JSON.
    pub fn push(&mut self, value: impl Serialize) -> Result<()> {
        self.0.push(serde_json::to_value(value)?);
        Ok(())
    }

    /// Decodes the argument at `index`.
    ///
    /// # Errors
    /// Returns [`TestError::InvalidArgument`] if the argument is missing or
    /// does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let value = self.0.get(index).ok_or_else(|| {
            TestError::invalid_argument(format!(
                "missing argument #{index} ({} given)",
                self.0.len()
            ))
        })?;
        serde_json::from_value(value.clone())
            .map_err(|e| TestError::invalid_argument(format!("argument #{index}: {e}")))
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw argument values.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[Value; N]> for Args {
    fn from(values: [Value; N]) -> Self {
        Self(values.into())
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reflective surface of a type under test.
///
/// Implementations live next to the type so private members are reachable.
/// [`ReflectionAccessor`] only calls `read_field`, `write_field` and
/// `invoke_method` with names the descriptor declares.
pub trait Reflect: Any {
    /// Member tables of the implementing type.
    fn type_descriptor() -> TypeDescriptor
    where
        Self: Sized;

    /// Current value of a field.
    fn read_field(&self, field: &str) -> Result<Value>;

    /// Overwrites a field.
    fn write_field(&mut self, field: &str, value: Value) -> Result<()>;

    /// Invokes a method with positional arguments.
    ///
    /// Errors raised by the method itself are returned as-is.
    fn invoke_method(&mut self, method: &str, args: Args) -> std::result::Result<Value, Throwable>;
}

/// Binds one instance and validates every reflective access against its descriptor.
pub struct ReflectionAccessor {
    target: Box<dyn Reflect>,
    descriptor: TypeDescriptor,
}

impl ReflectionAccessor {
    /// Binds `instance` and builds its descriptor.
    #[must_use]
    pub fn new<T: Reflect>(instance: T) -> Self {
        let descriptor = T::type_descriptor();
        tracing::debug!(
            class = %descriptor.name(),
            methods = descriptor.methods.len(),
            fields = descriptor.fields.len(),
            "reflection initialized"
        );
        Self {
            target: Box::new(instance),
            descriptor,
        }
    }

    /// Cached descriptor of the bound type.
    #[must_use]
    pub const fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Invokes a non-public method of the bound instance.
    ///
    /// # Errors
    /// [`TestError::MethodNotFound`] if the method is not declared; otherwise
    /// whatever the method itself raises, unchanged.
    pub fn invoke_private_method(
        &mut self,
        method: &str,
        args: impl Into<Args>,
    ) -> std::result::Result<Value, Throwable> {
        if !self.descriptor.has_method(method) {
            return Err(TestError::method_not_found(method, self.descriptor.name()).into());
        }

        let args = args.into();
        tracing::debug!(
            class = %self.descriptor.name(),
            method,
            args = args.len(),
            "invoking private method"
        );
        self.target.invoke_method(method, args)
    }

    /// Reads a non-public field of the bound instance.
    ///
    /// # Errors
    /// [`TestError::PropertyNotFound`] if the field is not declared.
    pub fn read_private_field(&self, field: &str) -> Result<Value> {
        self.check_field(field)?;
        tracing::debug!(class = %self.descriptor.name(), field, "reading private field");
        self.target.read_field(field)
    }

    /// Reads a non-public field and decodes it as `T`.
    ///
    /// # Errors
    /// [`TestError::PropertyNotFound`] if the field is not declared, or a JSON
    /// error if the value does not fit `T`.
    pub fn read_private_field_as<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        Ok(serde_json::from_value(self.read_private_field(field)?)?)
    }

    /// Overwrites a non-public field of the bound instance.
    ///
    /// # Errors
    /// [`TestError::PropertyNotFound`] if the field is not declared, or a JSON
    /// error if the field's type cannot hold `value`.
    pub fn write_private_field(&mut self, field: &str, value: impl Serialize) -> Result<()> {
        self.check_field(field)?;
        let value = serde_json::to_value(value)?;
        tracing::debug!(class = %self.descriptor.name(), field, %value, "writing private field");
        self.target.write_field(field, value)
    }

    /// The bound instance, if it is a `T`.
    #[must_use]
    pub fn target<T: Reflect>(&self) -> Option<&T> {
        let any: &dyn Any = self.target.as_ref();
        any.downcast_ref::<T>()
    }

    /// The bound instance, mutably, if it is a `T`.
    #[must_use]
    pub fn target_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self.target.as_mut();
        any.downcast_mut::<T>()
    }

    fn check_field(&self, field: &str) -> Result<()> {
        if self.descriptor.has_field(field) {
            Ok(())
        } else {
            Err(TestError::property_not_found(field, self.descriptor.name()))
        }
    }
}

impl fmt::Debug for ReflectionAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionAccessor")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    struct Holder {
        value: i64,
        text: String,
    }

    impl Reflect for Holder {
        fn type_descriptor() -> TypeDescriptor {
            TypeDescriptor::new("Holder")
                .with_field("value")
                .with_field("text")
                .with_method("double")
        }

        fn read_field(&self, field: &str) -> Result<Value> {
            match field {
                "value" => Ok(json!(self.value)),
                "text" => Ok(json!(self.text)),
                _ => Err(TestError::property_not_found(field, "Holder")),
            }
        }

        fn write_field(&mut self, field: &str, value: Value) -> Result<()> {
            match field {
                "value" => self.value = serde_json::from_value(value)?,
                "text" => self.text = serde_json::from_value(value)?,
                _ => return Err(TestError::property_not_found(field, "Holder")),
            }
            Ok(())
        }

        fn invoke_method(
            &mut self,
            method: &str,
            args: Args,
        ) -> std::result::Result<Value, Throwable> {
            match method {
                "double" => {
                    let n: i64 = args.get(0)?;
                    Ok(json!(n.wrapping_mul(2)))
                }
                _ => Err(TestError::method_not_found(method, "Holder").into()),
            }
        }
    }

    proptest! {
        /// write then read returns the written value
        #[test]
        fn field_roundtrip(value in any::<i64>(), text in ".*") {
            let mut accessor = ReflectionAccessor::new(Holder { value: 0, text: String::new() });
            accessor.write_private_field("value", value).unwrap();
            accessor.write_private_field("text", &text).unwrap();
            prop_assert_eq!(accessor.read_private_field_as::<i64>("value").unwrap(), value);
            prop_assert_eq!(accessor.read_private_field_as::<String>("text").unwrap(), text);
        }

        /// pure methods return what a direct call returns
        #[test]
        fn invoke_matches_direct_call(n in any::<i64>()) {
            let mut accessor = ReflectionAccessor::new(Holder { value: 0, text: String::new() });
            let result = accessor.invoke_private_method("double", [json!(n)]).unwrap();
            prop_assert_eq!(result, json!(n.wrapping_mul(2)));
        }

        /// undeclared names never yield a default
        #[test]
        fn undeclared_names_are_rejected(name in "[a-z]{1,12}") {
            prop_assume!(name != "value" && name != "text" && name != "double");
            let mut accessor = ReflectionAccessor::new(Holder { value: 0, text: String::new() });
            prop_assert!(accessor.read_private_field(&name).unwrap_err().is_not_found());
            prop_assert!(accessor.write_private_field(&name, 1).unwrap_err().is_not_found());
            let err = accessor.invoke_private_method(&name, Args::new()).unwrap_err();
            prop_assert!(err.as_test_error().is_some_and(TestError::is_not_found));
        }
    }
}
