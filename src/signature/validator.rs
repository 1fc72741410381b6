//! Argument validation against a signature
//!
//! Check order (observable through which failure a malformed call reports):
//! 1. defaulting on a working copy
//! 2. shape (sequence or mapping)
//! 3. ordered: too many, then too few arguments
//! 4. unknown index or key, then per-value constraints, in encounter order
//! 5. named: missing required keys, reported together and sorted
//!
//! Validation is fail-fast and never mutates the caller's arguments.

use tracing::{debug, trace};

use super::defaults;
use super::errors::{Failure, ValidationResult};
use super::types::{NamedSignature, OrderedSignature};
use crate::value::{ArgList, ArgMap, Value};

/// Validates positional arguments, returning them with defaults spliced in.
pub fn validate_ordered(signature: &OrderedSignature, args: &[Value]) -> ValidationResult<ArgList> {
    let mut args = args.to_vec();
    defaults::apply_ordered(signature, &mut args);

    match check_ordered(signature, &args) {
        Ok(()) => {
            trace!(args = args.len(), "ordered arguments accepted");
            Ok(args)
        }
        Err(failure) => {
            debug!(code = failure.code(), slot = ?failure.slot(), %failure, "ordered arguments rejected");
            Err(failure)
        }
    }
}

/// Validates positional arguments supplied as a single value.
///
/// `Nil` counts as no arguments; anything but a list fails `NotASequence`.
pub fn validate_ordered_value(signature: &OrderedSignature, args: &Value) -> ValidationResult<ArgList> {
    match args {
        Value::Nil => validate_ordered(signature, &[]),
        Value::List(items) => validate_ordered(signature, items),
        _ => {
            debug!(got = args.type_name(), "ordered arguments rejected: not a sequence");
            Err(Failure::NotASequence)
        }
    }
}

fn check_ordered(signature: &OrderedSignature, args: &[Value]) -> ValidationResult<()> {
    if args.len() > signature.len() {
        return Err(Failure::TooManyArguments {
            got: args.len(),
            max: signature.len(),
        });
    }

    if args.len() < signature.min_required() {
        return Err(Failure::TooFewArguments {
            got: args.len(),
            min: signature.min_required(),
        });
    }

    for (index, value) in args.iter().enumerate() {
        let slot = signature.slot(index).ok_or(Failure::UnknownSlot(index))?;
        slot.check(value)?;
    }

    Ok(())
}

/// Validates named arguments, returning them with defaults inserted.
pub fn validate_named(signature: &NamedSignature, args: &ArgMap) -> ValidationResult<ArgMap> {
    let mut args = args.clone();
    defaults::apply_named(signature, &mut args);

    match check_named(signature, &args) {
        Ok(()) => {
            trace!(args = args.len(), "named arguments accepted");
            Ok(args)
        }
        Err(failure) => {
            debug!(code = failure.code(), slot = ?failure.slot(), %failure, "named arguments rejected");
            Err(failure)
        }
    }
}

/// Validates named arguments supplied as a single value.
///
/// `Nil` counts as no arguments; anything but a map fails `NotAMapping`.
pub fn validate_named_value(signature: &NamedSignature, args: &Value) -> ValidationResult<ArgMap> {
    match args {
        Value::Nil => validate_named(signature, &ArgMap::new()),
        Value::Map(map) => validate_named(signature, map),
        _ => {
            debug!(got = args.type_name(), "named arguments rejected: not a mapping");
            Err(Failure::NotAMapping)
        }
    }
}

fn check_named(signature: &NamedSignature, args: &ArgMap) -> ValidationResult<()> {
    for (key, value) in args {
        let slot = signature
            .slot(key)
            .ok_or_else(|| Failure::UnknownKey(key.clone()))?;
        slot.check(value)?;
    }

    let missing: Vec<&str> = signature
        .required_keys()
        .filter(|key| !args.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(Failure::missing_required(missing));
    }

    Ok(())
}
