//! argsig - Declarative argument signatures with fail-fast validation
//!
//! A signature describes what a method accepts, either positionally or by
//! name. Each slot carries constraints (type, pattern, range, predicate,
//! capability, composite) and modifiers (optional, required, default).
//! Validating a call returns the arguments with defaults applied, or the
//! first [`Failure`] found.
//!
//! ```
//! use argsig::{OrderedSignature, SlotSpec, Value, ValueType};
//!
//! let sig = OrderedSignature::new([
//!     SlotSpec::from(ValueType::String),
//!     SlotSpec::from(ValueType::Integer).optional(),
//! ])
//! .unwrap();
//!
//! assert!(sig.validate(&[Value::from("foo")]).is_ok());
//! assert!(sig.validate(&[Value::from("foo"), Value::from("bar")]).is_err());
//! ```

pub mod attr;
pub mod config;
pub mod signature;
pub mod value;

pub use attr::Attribute;
pub use config::{ConfigError, SignatureConfig};
pub use signature::{
    Constraint, Failure, NamedSignature, OrderedSignature, Rule, SignatureError, SignatureResult,
    SlotKey, SlotSpec, ValidationResult, ValueRange, Verdict,
};
pub use value::{ArgList, ArgMap, Object, Value, ValueType};
