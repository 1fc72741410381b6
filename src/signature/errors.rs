//! Signature error types
//!
//! Two families:
//! - [`Failure`]: a per-call validation outcome, returned (never raised) so the
//!   caller decides where to surface it
//! - [`SignatureError`]: a malformed schema, reported once at build time
//!
//! Failure codes:
//! - TYPE_MISMATCH, PATTERN_MISMATCH, RANGE_MISMATCH, CAPABILITY_MISSING,
//!   CUSTOM_VALIDATION_FAILED (per-slot constraint checks)
//! - NOT_A_SEQUENCE, NOT_A_MAPPING (argument shape)
//! - TOO_MANY_ARGUMENTS, TOO_FEW_ARGUMENTS, UNKNOWN_SLOT (ordered arity)
//! - UNKNOWN_KEY, MISSING_REQUIRED (named membership)
//! - caller-defined codes carried by [`Failure::Custom`]

use std::fmt;

use thiserror::Error;

use super::constraint::ValueRange;
use crate::value::ValueType;

/// Result type for per-call validation
pub type ValidationResult<T> = Result<T, Failure>;

/// Result type for signature construction
pub type SignatureResult<T> = Result<T, SignatureError>;

/// Position of a slot: an index in an ordered signature, a key in a named one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Index(i) => write!(f, "{}", i),
            SlotKey::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<usize> for SlotKey {
    fn from(index: usize) -> Self {
        SlotKey::Index(index)
    }
}

impl From<&str> for SlotKey {
    fn from(name: &str) -> Self {
        SlotKey::Name(name.to_string())
    }
}

impl From<String> for SlotKey {
    fn from(name: String) -> Self {
        SlotKey::Name(name)
    }
}

/// The first violation found while validating one call.
///
/// Messages are part of the public contract: the same input always renders
/// the same text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    #[error("value of argument '{slot}' is an invalid type. Requires '{expected}'")]
    TypeMismatch { slot: SlotKey, expected: ValueType },

    #[error("value of argument '{slot}' does not match this pattern: '{pattern}'")]
    PatternMismatch { slot: SlotKey, pattern: String },

    #[error("value of argument '{slot}' does not match range '{range}'")]
    RangeMismatch { slot: SlotKey, range: ValueRange },

    #[error("value of argument '{slot}' does not respond to '{capability}'")]
    CapabilityMissing { slot: SlotKey, capability: String },

    #[error("value of argument '{slot}' does not pass custom validation.")]
    CustomValidationFailed { slot: SlotKey },

    #[error("this method takes ordered arguments")]
    NotASequence,

    #[error("this method takes named arguments")]
    NotAMapping,

    #[error("too many arguments ({got} for {max})")]
    TooManyArguments { got: usize, max: usize },

    #[error("not enough arguments ({got} for minimum {min})")]
    TooFewArguments { got: usize, min: usize },

    #[error("argument {0} does not exist in signature")]
    UnknownSlot(usize),

    #[error("argument '{0}' does not exist in signature")]
    UnknownKey(String),

    /// Keys are kept sorted.
    #[error("argument(s) '{}' were not found but are required by the signature", .0.join(", "))]
    MissingRequired(Vec<String>),

    /// Raised by a predicate with its own code; propagated as-is.
    #[error("{message}")]
    Custom { code: String, message: String },
}

impl Failure {
    /// Creates a caller-defined failure for predicates to hand back.
    pub fn custom(code: impl Into<String>, message: impl Into<String>) -> Self {
        Failure::Custom {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a missing-required failure with keys in sorted order.
    pub fn missing_required<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        Failure::MissingRequired(keys)
    }

    /// Returns the stable failure code
    pub fn code(&self) -> &str {
        match self {
            Failure::TypeMismatch { .. } => "TYPE_MISMATCH",
            Failure::PatternMismatch { .. } => "PATTERN_MISMATCH",
            Failure::RangeMismatch { .. } => "RANGE_MISMATCH",
            Failure::CapabilityMissing { .. } => "CAPABILITY_MISSING",
            Failure::CustomValidationFailed { .. } => "CUSTOM_VALIDATION_FAILED",
            Failure::NotASequence => "NOT_A_SEQUENCE",
            Failure::NotAMapping => "NOT_A_MAPPING",
            Failure::TooManyArguments { .. } => "TOO_MANY_ARGUMENTS",
            Failure::TooFewArguments { .. } => "TOO_FEW_ARGUMENTS",
            Failure::UnknownSlot(_) => "UNKNOWN_SLOT",
            Failure::UnknownKey(_) => "UNKNOWN_KEY",
            Failure::MissingRequired(_) => "MISSING_REQUIRED",
            Failure::Custom { code, .. } => code,
        }
    }

    /// Returns the offending slot for per-slot failures
    pub fn slot(&self) -> Option<&SlotKey> {
        match self {
            Failure::TypeMismatch { slot, .. }
            | Failure::PatternMismatch { slot, .. }
            | Failure::RangeMismatch { slot, .. }
            | Failure::CapabilityMissing { slot, .. }
            | Failure::CustomValidationFailed { slot } => Some(slot),
            _ => None,
        }
    }
}

/// A schema that cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignatureError {
    #[error("optional slots must be at the end: slot {index} is required but follows an optional slot")]
    OptionalNotTrailing { index: usize },

    #[error("duplicate key '{0}' in named signature")]
    DuplicateKey(String),

    #[error("slot '{slot}' declares more than one default")]
    DuplicateDefault { slot: SlotKey },

    #[error("slot '{slot}' is flagged both optional and required")]
    ConflictingModifiers { slot: SlotKey },

    #[error("default for slot '{slot}' fails its own constraints: {failure}")]
    InvalidDefault { slot: SlotKey, failure: Box<Failure> },

    #[error("constraints on slot '{slot}' nest deeper than {max} levels")]
    NestingTooDeep { slot: SlotKey, max: usize },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid range: {0}")]
    InvalidRange(String),
}
