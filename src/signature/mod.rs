//! Signature subsystem
//!
//! A signature declares what a method accepts: an ordered list of slots or a
//! named map of them, each slot an AND-group of constraints plus modifiers.
//!
//! # Design Principles
//!
//! - Malformed signatures are rejected once, at build time
//! - Validation is fail-fast and reports exactly one failure
//! - Failures are returned as values, never panics
//! - Caller arguments are never mutated
//! - Deterministic: same signature and arguments, same outcome

mod constraint;
pub mod defaults;
mod errors;
mod types;
mod validator;

pub use constraint::{check_all, Constraint, PredicateFn, ValueRange, Verdict};
pub use errors::{Failure, SignatureError, SignatureResult, SlotKey, ValidationResult};
pub use types::{NamedSignature, OrderedSignature, Rule, Slot, SlotSpec};
pub use validator::{validate_named, validate_named_value, validate_ordered, validate_ordered_value};
