//! Systems under test shared by the integration tests.

use lion_test_core::{Args, LionException, Reflect, TestError, Throwable, TypeDescriptor};
use serde_json::{Value, json};

lion_test_core::lion_exception! {
    /// Exception raised by the session layer.
    pub struct ExceptionProvider;
}

lion_test_core::lion_exception! {
    /// Exception raised by the auth layer.
    pub struct AuthProvider;
}

/// Object with private state and private methods.
pub struct ClassProvider {
    bits: i64,
}

impl Default for ClassProvider {
    fn default() -> Self {
        Self { bits: 100 }
    }
}

impl ClassProvider {
    pub fn set_bits(&mut self, bits: i64) {
        self.bits = bits;
    }

    fn get_bits(&self) -> i64 {
        self.bits
    }

    fn subtract_bits(&mut self, bits: i64) {
        self.bits -= bits;
    }

    fn result_bits(&mut self, bits: i64) -> i64 {
        self.bits -= bits;
        self.get_bits()
    }

    fn validate_session(&self) -> Result<(), ExceptionProvider> {
        if self.bits < 0 {
            return Err(ExceptionProvider::new("ERR", "session-error", 500));
        }
        Ok(())
    }
}

impl Reflect for ClassProvider {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new("ClassProvider")
            .with_field("bits")
            .with_method("get_bits")
            .with_method("subtract_bits")
            .with_method("result_bits")
            .with_method("validate_session")
            .with_interface("TestProviderInterface")
    }

    fn read_field(&self, field: &str) -> Result<Value, TestError> {
        match field {
            "bits" => Ok(json!(self.bits)),
            _ => Err(TestError::property_not_found(field, "ClassProvider")),
        }
    }

    fn write_field(&mut self, field: &str, value: Value) -> Result<(), TestError> {
        match field {
            "bits" => self.bits = serde_json::from_value(value)?,
            _ => return Err(TestError::property_not_found(field, "ClassProvider")),
        }
        Ok(())
    }

    fn invoke_method(&mut self, method: &str, args: Args) -> Result<Value, Throwable> {
        match method {
            "get_bits" => Ok(json!(self.get_bits())),
            "subtract_bits" => {
                self.subtract_bits(args.get(0)?);
                Ok(Value::Null)
            }
            "result_bits" => Ok(json!(self.result_bits(args.get(0)?))),
            "validate_session" => {
                self.validate_session().map_err(Throwable::lion)?;
                Ok(Value::Null)
            }
            _ => Err(TestError::method_not_found(method, "ClassProvider").into()),
        }
    }
}
