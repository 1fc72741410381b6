//! Constraints a slot value must satisfy
//!
//! Each variant has exactly one evaluation branch:
//! - Type: instance-of check against a [`ValueType`]
//! - Pattern: regex search over the value's canonical string form
//! - Range: ordinal membership; incomparable values are simply not members
//! - Predicate: caller function returning a [`Verdict`]
//! - Capability: reflective probe for a named capability
//! - All: AND-group, evaluated in declaration order, first failure wins
//!
//! Evaluation never mutates the value.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::errors::{Failure, SignatureError, SignatureResult, SlotKey, ValidationResult};
use crate::value::{Value, ValueType};

/// Outcome of a caller-supplied predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    /// Generic rejection; reported as `CustomValidationFailed`.
    Fail,
    /// Rejection with the caller's own failure, propagated unchanged.
    Reject(Failure),
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl From<Result<(), Failure>> for Verdict {
    fn from(result: Result<(), Failure>) -> Self {
        match result {
            Ok(()) => Verdict::Pass,
            Err(failure) => Verdict::Reject(failure),
        }
    }
}

/// Predicate function shared between clones of a constraint.
pub type PredicateFn = Arc<dyn Fn(&Value) -> Verdict + Send + Sync>;

/// An ordered interval over numbers or strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    lower: Value,
    upper: Value,
    lower_inclusive: bool,
    upper_inclusive: bool,
}

impl ValueRange {
    /// Creates a range, rejecting endpoints that do not share an ordinal
    /// domain or that are out of order.
    pub fn new(
        lower: impl Into<Value>,
        upper: impl Into<Value>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> SignatureResult<Self> {
        let lower = lower.into();
        let upper = upper.into();
        match lower.ordinal_cmp(&upper) {
            None => Err(SignatureError::InvalidRange(format!(
                "endpoints {} and {} are not comparable",
                lower.inspect(),
                upper.inspect()
            ))),
            Some(Ordering::Greater) => Err(SignatureError::InvalidRange(format!(
                "lower bound {} exceeds upper bound {}",
                lower.inspect(),
                upper.inspect()
            ))),
            Some(_) => Ok(Self {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            }),
        }
    }

    /// Closed range `[lower, upper]`.
    pub fn inclusive(lower: impl Into<Value>, upper: impl Into<Value>) -> SignatureResult<Self> {
        Self::new(lower, upper, true, true)
    }

    /// Half-open range `[lower, upper)`.
    pub fn half_open(lower: impl Into<Value>, upper: impl Into<Value>) -> SignatureResult<Self> {
        Self::new(lower, upper, true, false)
    }

    pub fn lower(&self) -> &Value {
        &self.lower
    }

    pub fn upper(&self) -> &Value {
        &self.upper
    }

    /// Membership test. Values outside the range's domain are not members.
    pub fn contains(&self, value: &Value) -> bool {
        let above = match value.ordinal_cmp(&self.lower) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.lower_inclusive,
            _ => false,
        };
        let below = match value.ordinal_cmp(&self.upper) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.upper_inclusive,
            _ => false,
        };
        above && below
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.lower_inclusive { '[' } else { '(' },
            self.lower.inspect(),
            self.upper.inspect(),
            if self.upper_inclusive { ']' } else { ')' }
        )
    }
}

/// A single checkable rule. Immutable once built.
#[derive(Clone)]
pub enum Constraint {
    Type(ValueType),
    Pattern(Regex),
    Range(ValueRange),
    Predicate(PredicateFn),
    Capability(String),
    All(Vec<Constraint>),
}

impl Constraint {
    /// Instance-of constraint.
    pub fn of(value_type: ValueType) -> Self {
        Constraint::Type(value_type)
    }

    /// Compiles a pattern constraint.
    pub fn pattern(source: &str) -> SignatureResult<Self> {
        Regex::new(source)
            .map(Constraint::Pattern)
            .map_err(|e| SignatureError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn range(range: ValueRange) -> Self {
        Constraint::Range(range)
    }

    /// Custom predicate. The closure may return `bool`, `Verdict`, or
    /// `Result<(), Failure>`.
    pub fn predicate<F, R>(f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Constraint::Predicate(Arc::new(move |value| f(value).into()))
    }

    /// Duck-typing probe for a named capability.
    pub fn responds_to(capability: impl Into<String>) -> Self {
        Constraint::Capability(capability.into())
    }

    /// AND-group of constraints.
    pub fn all(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Constraint::All(constraints.into_iter().collect())
    }

    /// Whether nesting goes deeper than `limit` levels; a leaf is one level.
    ///
    /// The walk never descends past `limit`, so arbitrarily deep trees are
    /// rejected without exhausting the stack.
    pub fn depth_exceeds(&self, limit: usize) -> bool {
        if limit == 0 {
            return true;
        }
        match self {
            Constraint::All(members) => members.iter().any(|m| m.depth_exceeds(limit - 1)),
            _ => false,
        }
    }

    /// Evaluates this constraint against the value held by `slot`.
    pub fn check(&self, value: &Value, slot: &SlotKey) -> ValidationResult<()> {
        match self {
            Constraint::Type(value_type) => {
                if !value_type.admits(value) {
                    return Err(Failure::TypeMismatch {
                        slot: slot.clone(),
                        expected: value_type.clone(),
                    });
                }
            }
            Constraint::Pattern(regex) => {
                if !regex.is_match(&value.to_string()) {
                    return Err(Failure::PatternMismatch {
                        slot: slot.clone(),
                        pattern: regex.as_str().to_string(),
                    });
                }
            }
            Constraint::Range(range) => {
                if !range.contains(value) {
                    return Err(Failure::RangeMismatch {
                        slot: slot.clone(),
                        range: range.clone(),
                    });
                }
            }
            Constraint::Predicate(f) => match f(value) {
                Verdict::Pass => {}
                Verdict::Fail => {
                    return Err(Failure::CustomValidationFailed { slot: slot.clone() });
                }
                Verdict::Reject(failure) => return Err(failure),
            },
            Constraint::Capability(capability) => {
                if !value.responds_to(capability) {
                    return Err(Failure::CapabilityMissing {
                        slot: slot.clone(),
                        capability: capability.clone(),
                    });
                }
            }
            Constraint::All(members) => check_all(members, value, slot)?,
        }

        Ok(())
    }
}

/// Evaluates constraints in order, stopping at the first failure.
pub fn check_all(constraints: &[Constraint], value: &Value, slot: &SlotKey) -> ValidationResult<()> {
    for constraint in constraints {
        constraint.check(value, slot)?;
    }
    Ok(())
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Type(t) => f.debug_tuple("Type").field(t).finish(),
            Constraint::Pattern(r) => f.debug_tuple("Pattern").field(&r.as_str()).finish(),
            Constraint::Range(r) => f.debug_tuple("Range").field(&r.to_string()).finish(),
            Constraint::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Constraint::Capability(c) => f.debug_tuple("Capability").field(c).finish(),
            Constraint::All(members) => f.debug_tuple("All").field(members).finish(),
        }
    }
}

impl From<ValueType> for Constraint {
    fn from(value_type: ValueType) -> Self {
        Constraint::Type(value_type)
    }
}

impl From<Regex> for Constraint {
    fn from(regex: Regex) -> Self {
        Constraint::Pattern(regex)
    }
}

impl From<ValueRange> for Constraint {
    fn from(range: ValueRange) -> Self {
        Constraint::Range(range)
    }
}
