//! Signature definitions
//!
//! Two shapes:
//! - ordered: a sequence of slots; required by default, `optional` only at the tail
//! - named: a key-to-slot mapping; optional by default, `required` per key
//!
//! A slot is authored as a list of [`Rule`]s mixing constraints and modifiers.
//! Modifiers are stripped at build time and the remaining constraints form
//! the slot's AND-group. Signatures are immutable once built.

use indexmap::IndexMap;
use tracing::debug;

use super::constraint::{check_all, Constraint, ValueRange};
use super::defaults;
use super::errors::{SignatureError, SignatureResult, SlotKey, ValidationResult};
use super::validator;
use crate::config::SignatureConfig;
use crate::value::{ArgList, ArgMap, Value, ValueType};

/// One authoring item for a slot.
#[derive(Debug, Clone)]
pub enum Rule {
    Constraint(Constraint),
    /// Ordered slots: may be omitted (must be trailing)
    Optional,
    /// Named slots: must be present
    Required,
    /// Spliced in when the caller omits the slot
    Default(Value),
}

impl Rule {
    /// Default-value modifier.
    pub fn default_value(value: impl Into<Value>) -> Self {
        Rule::Default(value.into())
    }
}

impl From<Constraint> for Rule {
    fn from(constraint: Constraint) -> Self {
        Rule::Constraint(constraint)
    }
}

impl From<ValueType> for Rule {
    fn from(value_type: ValueType) -> Self {
        Rule::Constraint(Constraint::Type(value_type))
    }
}

impl From<ValueRange> for Rule {
    fn from(range: ValueRange) -> Self {
        Rule::Constraint(Constraint::Range(range))
    }
}

/// Authoring form of a slot: constraints and modifiers in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SlotSpec {
    rules: Vec<Rule>,
}

impl SlotSpec {
    /// A slot that accepts any value
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn optional(self) -> Self {
        self.with(Rule::Optional)
    }

    pub fn required(self) -> Self {
        self.with(Rule::Required)
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.with(Rule::Default(value.into()))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl From<Rule> for SlotSpec {
    fn from(rule: Rule) -> Self {
        Self { rules: vec![rule] }
    }
}

impl From<Constraint> for SlotSpec {
    fn from(constraint: Constraint) -> Self {
        Rule::from(constraint).into()
    }
}

impl From<ValueType> for SlotSpec {
    fn from(value_type: ValueType) -> Self {
        Rule::from(value_type).into()
    }
}

impl From<ValueRange> for SlotSpec {
    fn from(range: ValueRange) -> Self {
        Rule::from(range).into()
    }
}

impl From<Vec<Rule>> for SlotSpec {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl<const N: usize> From<[Rule; N]> for SlotSpec {
    fn from(rules: [Rule; N]) -> Self {
        Self {
            rules: rules.into(),
        }
    }
}

/// A compiled slot.
#[derive(Debug, Clone)]
pub struct Slot {
    key: SlotKey,
    constraints: Vec<Constraint>,
    optional: bool,
    required: bool,
    default: Option<Value>,
}

impl Slot {
    /// Strips modifiers out of `spec` and runs the build-time checks.
    fn compile(key: SlotKey, spec: SlotSpec, config: &SignatureConfig) -> SignatureResult<Self> {
        let mut constraints = Vec::new();
        let mut optional = false;
        let mut required = false;
        let mut default = None;

        for rule in spec.rules {
            match rule {
                Rule::Constraint(constraint) => constraints.push(constraint),
                Rule::Optional => optional = true,
                Rule::Required => required = true,
                Rule::Default(value) => {
                    if default.is_some() {
                        return Err(SignatureError::DuplicateDefault { slot: key });
                    }
                    default = Some(value);
                }
            }
        }

        if optional && required {
            return Err(SignatureError::ConflictingModifiers { slot: key });
        }

        let max = config.max_constraint_depth;
        if constraints.iter().any(|c| c.depth_exceeds(max)) {
            return Err(SignatureError::NestingTooDeep { slot: key, max });
        }

        if config.check_defaults {
            if let Some(value) = &default {
                check_all(&constraints, value, &key).map_err(|failure| {
                    SignatureError::InvalidDefault {
                        slot: key.clone(),
                        failure: Box::new(failure),
                    }
                })?;
            }
        }

        Ok(Self {
            key,
            constraints,
            optional,
            required,
            default,
        })
    }

    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Runs the slot's constraints against `value`.
    pub fn check(&self, value: &Value) -> ValidationResult<()> {
        check_all(&self.constraints, value, &self.key)
    }
}

/// Positional signature.
#[derive(Debug, Clone)]
pub struct OrderedSignature {
    slots: Vec<Slot>,
    min_required: usize,
}

impl OrderedSignature {
    /// Builds a signature with the default configuration.
    pub fn new<I, S>(slots: I) -> SignatureResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<SlotSpec>,
    {
        Self::with_config(slots, &SignatureConfig::default())
    }

    /// Builds a signature, enforcing trailing-only optional slots.
    pub fn with_config<I, S>(slots: I, config: &SignatureConfig) -> SignatureResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<SlotSpec>,
    {
        let mut compiled = Vec::new();
        let mut first_optional = None;

        for (index, spec) in slots.into_iter().enumerate() {
            let slot = Slot::compile(SlotKey::Index(index), spec.into(), config)?;
            match (first_optional, slot.is_optional()) {
                (None, true) => first_optional = Some(index),
                (Some(_), false) => return Err(SignatureError::OptionalNotTrailing { index }),
                _ => {}
            }
            compiled.push(slot);
        }

        let min_required = first_optional.unwrap_or(compiled.len());
        debug!(slots = compiled.len(), min_required, "built ordered signature");

        Ok(Self {
            slots: compiled,
            min_required,
        })
    }

    /// Number of declared slots (the maximum argument count).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Index of the first optional slot, or the length when none is optional.
    pub fn min_required(&self) -> usize {
        self.min_required
    }

    /// The argument list an empty call resolves to after defaulting.
    pub fn defaults(&self) -> ArgList {
        let mut args = ArgList::new();
        defaults::apply_ordered(self, &mut args);
        args
    }

    /// See [`validator::validate_ordered`].
    pub fn validate(&self, args: &[Value]) -> ValidationResult<ArgList> {
        validator::validate_ordered(self, args)
    }

    /// See [`validator::validate_ordered_value`].
    pub fn validate_value(&self, args: &Value) -> ValidationResult<ArgList> {
        validator::validate_ordered_value(self, args)
    }
}

/// Keyed signature.
#[derive(Debug, Clone)]
pub struct NamedSignature {
    slots: IndexMap<String, Slot>,
}

impl NamedSignature {
    /// Builds a signature with the default configuration.
    pub fn new<I, K, S>(slots: I) -> SignatureResult<Self>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<SlotSpec>,
    {
        Self::with_config(slots, &SignatureConfig::default())
    }

    /// Builds a signature, rejecting duplicate keys.
    pub fn with_config<I, K, S>(slots: I, config: &SignatureConfig) -> SignatureResult<Self>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<SlotSpec>,
    {
        let mut compiled = IndexMap::new();

        for (key, spec) in slots {
            let key = key.into();
            if compiled.contains_key(&key) {
                return Err(SignatureError::DuplicateKey(key));
            }
            let slot = Slot::compile(SlotKey::Name(key.clone()), spec.into(), config)?;
            compiled.insert(key, slot);
        }

        let signature = Self { slots: compiled };
        debug!(
            slots = signature.len(),
            required = signature.required_keys().count(),
            "built named signature"
        );
        Ok(signature)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }

    /// Slots in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(key, slot)| (key.as_str(), slot))
    }

    /// Keys flagged `required`, in declaration order.
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_required())
            .map(|(key, _)| key.as_str())
    }

    /// The argument map an empty call resolves to after defaulting.
    pub fn defaults(&self) -> ArgMap {
        let mut args = ArgMap::new();
        defaults::apply_named(self, &mut args);
        args
    }

    /// See [`validator::validate_named`].
    pub fn validate(&self, args: &ArgMap) -> ValidationResult<ArgMap> {
        validator::validate_named(self, args)
    }

    /// See [`validator::validate_named_value`].
    pub fn validate_value(&self, args: &Value) -> ValidationResult<ArgMap> {
        validator::validate_named_value(self, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_are_stripped() {
        let sig = OrderedSignature::new([
            SlotSpec::from(ValueType::String),
            SlotSpec::from(ValueType::Integer).optional().default_value(1),
        ])
        .unwrap();

        let slot = sig.slot(1).unwrap();
        assert_eq!(slot.constraints().len(), 1);
        assert!(slot.is_optional());
        assert_eq!(slot.default(), Some(&Value::from(1)));
        assert_eq!(sig.min_required(), 1);
    }

    #[test]
    fn test_all_required_by_default() {
        let sig = OrderedSignature::new([ValueType::String, ValueType::Integer]).unwrap();
        assert_eq!(sig.min_required(), 2);
    }

    #[test]
    fn test_optional_must_trail() {
        let err = OrderedSignature::new([
            SlotSpec::from(ValueType::String).optional(),
            SlotSpec::from(ValueType::Integer),
        ])
        .unwrap_err();
        assert_eq!(err, SignatureError::OptionalNotTrailing { index: 1 });
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = NamedSignature::new([
            ("a", SlotSpec::from(ValueType::String)),
            ("a", SlotSpec::from(ValueType::Integer)),
        ])
        .unwrap_err();
        assert_eq!(err, SignatureError::DuplicateKey("a".into()));
    }

    #[test]
    fn test_duplicate_default_rejected() {
        let err = NamedSignature::new([("a", SlotSpec::new().default_value(1).default_value(2))])
            .unwrap_err();
        assert_eq!(err, SignatureError::DuplicateDefault { slot: "a".into() });
    }

    #[test]
    fn test_conflicting_modifiers_rejected() {
        let err = NamedSignature::new([("a", [Rule::Optional, Rule::Required])]).unwrap_err();
        assert_eq!(err, SignatureError::ConflictingModifiers { slot: "a".into() });
    }

    #[test]
    fn test_redundant_modifiers_accepted() {
        let ordered = OrderedSignature::new([SlotSpec::from(ValueType::String).required()]);
        assert!(ordered.is_ok());
        let named = NamedSignature::new([("a", SlotSpec::new().optional())]);
        assert!(named.is_ok());
    }

    #[test]
    fn test_invalid_default_rejected() {
        let err = OrderedSignature::new([SlotSpec::from(ValueType::String).default_value(5)])
            .unwrap_err();
        match err {
            SignatureError::InvalidDefault { slot, failure } => {
                assert_eq!(slot, SlotKey::Index(0));
                assert_eq!(failure.code(), "TYPE_MISMATCH");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_check_can_be_disabled() {
        let config = SignatureConfig {
            check_defaults: false,
            ..Default::default()
        };
        let sig = OrderedSignature::with_config(
            [SlotSpec::from(ValueType::String).default_value(5)],
            &config,
        );
        assert!(sig.is_ok());
    }

    #[test]
    fn test_nesting_bound() {
        let mut constraint = Constraint::of(ValueType::Any);
        for _ in 0..4 {
            constraint = Constraint::all([constraint]);
        }

        let config = SignatureConfig::with_max_depth(4);
        let err = NamedSignature::with_config([("deep", constraint.clone())], &config).unwrap_err();
        assert_eq!(
            err,
            SignatureError::NestingTooDeep {
                slot: "deep".into(),
                max: 4
            }
        );

        let config = SignatureConfig::with_max_depth(5);
        assert!(NamedSignature::with_config([("deep", constraint)], &config).is_ok());
    }

    #[test]
    fn test_very_deep_nesting_rejected() {
        let mut constraint = Constraint::of(ValueType::Integer);
        for _ in 0..1_000 {
            constraint = Constraint::all([constraint]);
        }
        let err = OrderedSignature::new([constraint]).unwrap_err();
        assert_eq!(
            err,
            SignatureError::NestingTooDeep {
                slot: SlotKey::Index(0),
                max: 16
            }
        );
    }

    #[test]
    fn test_required_keys_in_declaration_order() {
        let sig = NamedSignature::new([
            ("z", SlotSpec::new().required()),
            ("a", SlotSpec::new()),
            ("m", SlotSpec::new().required()),
        ])
        .unwrap();
        assert_eq!(sig.required_keys().collect::<Vec<_>>(), vec!["z", "m"]);
    }
}
