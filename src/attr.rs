//! Validated attribute cell
//!
//! An [`Attribute`] owns one named slot and the value currently bound to it.
//! Writes go through a one-key named signature, so an attribute accepts
//! exactly what a method taking that single named argument would.

use crate::signature::{NamedSignature, SignatureResult, SlotSpec, ValidationResult};
use crate::value::{ArgMap, Value};

/// A named value guarded by a slot.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    signature: NamedSignature,
    value: Option<Value>,
}

impl Attribute {
    /// Builds the attribute's signature. Fails like any malformed slot would.
    pub fn new(name: impl Into<String>, spec: impl Into<SlotSpec>) -> SignatureResult<Self> {
        let name = name.into();
        let signature = NamedSignature::new([(name.clone(), spec)])?;
        Ok(Self {
            name,
            signature,
            value: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates and stores `value`. On failure the previous value is kept.
    pub fn set(&mut self, value: impl Into<Value>) -> ValidationResult<()> {
        let mut args = ArgMap::new();
        args.insert(self.name.clone(), value.into());

        let mut accepted = self.signature.validate(&args)?;
        self.value = accepted.swap_remove(&self.name);
        Ok(())
    }

    /// The stored value, else the slot's default.
    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref().or_else(|| {
            self.signature
                .slot(&self.name)
                .and_then(|slot| slot.default())
        })
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Forgets the stored value; `get` falls back to the default again.
    pub fn clear(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Failure, SignatureError};
    use crate::value::ValueType;

    fn ml_attr() -> Attribute {
        Attribute::new(
            "ml_attr",
            SlotSpec::from(ValueType::String).default_value("foo"),
        )
        .unwrap()
    }

    #[test]
    fn test_default_then_set() {
        let mut attr = ml_attr();
        assert_eq!(attr.get(), Some(&Value::from("foo")));
        assert!(!attr.is_set());

        attr.set("bar").unwrap();
        assert_eq!(attr.get(), Some(&Value::from("bar")));
        assert!(attr.is_set());
    }

    #[test]
    fn test_rejected_write_keeps_previous_value() {
        let mut attr = ml_attr();
        attr.set("bar").unwrap();

        let err = attr.set(5).unwrap_err();
        assert_eq!(
            err,
            Failure::TypeMismatch {
                slot: "ml_attr".into(),
                expected: ValueType::String,
            }
        );
        assert_eq!(attr.get(), Some(&Value::from("bar")));
    }

    #[test]
    fn test_clear_falls_back_to_default() {
        let mut attr = ml_attr();
        attr.set("bar").unwrap();
        attr.clear();
        assert_eq!(attr.get(), Some(&Value::from("foo")));
    }

    #[test]
    fn test_no_default_reads_none() {
        let attr = Attribute::new("count", ValueType::Integer).unwrap();
        assert_eq!(attr.name(), "count");
        assert_eq!(attr.get(), None);
    }

    #[test]
    fn test_malformed_slot_rejected() {
        let err = Attribute::new("x", SlotSpec::from(ValueType::Integer).default_value("no"))
            .unwrap_err();
        assert!(matches!(err, SignatureError::InvalidDefault { .. }));
    }
}
