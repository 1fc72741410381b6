//! Default-value application
//!
//! Runs before any arity or membership check, on the validator's working
//! copy. Values the caller supplied are never overwritten.

use super::types::{NamedSignature, OrderedSignature};
use crate::value::{ArgList, ArgMap, Value};

/// Extends `args` with defaults for omitted slots, each at its own index.
///
/// Omitted slots before a defaulted one are padded with `Nil`, which the
/// slot checks then see like any supplied value. Omitted slots after the
/// last default stay absent.
pub fn apply_ordered(signature: &OrderedSignature, args: &mut ArgList) {
    let slots = signature.slots();
    let last_default = match slots.iter().rposition(|slot| slot.default().is_some()) {
        Some(index) => index,
        None => return,
    };

    for slot in slots.iter().take(last_default + 1).skip(args.len()) {
        args.push(slot.default().cloned().unwrap_or(Value::Nil));
    }
}

/// Inserts defaults for absent keys, in declaration order.
pub fn apply_named(signature: &NamedSignature, args: &mut ArgMap) {
    for (key, slot) in signature.slots() {
        if let Some(value) = slot.default() {
            if !args.contains_key(key) {
                args.insert(key.to_string(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SlotSpec;
    use crate::value::ValueType;

    fn ordered() -> OrderedSignature {
        OrderedSignature::new([
            SlotSpec::from(ValueType::String).default_value("foo"),
            SlotSpec::from(ValueType::String).default_value("bar"),
        ])
        .unwrap()
    }

    #[test]
    fn test_ordered_fills_trailing_slots() {
        let sig = ordered();

        let mut args = ArgList::new();
        apply_ordered(&sig, &mut args);
        assert_eq!(args, vec![Value::from("foo"), Value::from("bar")]);

        let mut args = vec![Value::from("fixme")];
        apply_ordered(&sig, &mut args);
        assert_eq!(args, vec![Value::from("fixme"), Value::from("bar")]);

        let mut args = vec![Value::from("fixme"), Value::from("woot")];
        apply_ordered(&sig, &mut args);
        assert_eq!(args, vec![Value::from("fixme"), Value::from("woot")]);
    }

    #[test]
    fn test_ordered_pads_gap_with_nil() {
        let sig = OrderedSignature::new([
            SlotSpec::from(ValueType::String).default_value("a"),
            SlotSpec::from(ValueType::String).optional(),
            SlotSpec::from(ValueType::String).optional().default_value("c"),
            SlotSpec::from(ValueType::String).optional(),
        ])
        .unwrap();

        let mut args = ArgList::new();
        apply_ordered(&sig, &mut args);
        assert_eq!(args, vec![Value::from("a"), Value::Nil, Value::from("c")]);

        let mut args = vec![Value::from("x"), Value::from("y")];
        apply_ordered(&sig, &mut args);
        assert_eq!(args, vec![Value::from("x"), Value::from("y"), Value::from("c")]);
    }

    #[test]
    fn test_ordered_without_defaults_is_untouched() {
        let sig = OrderedSignature::new([ValueType::String, ValueType::Integer]).unwrap();
        let mut args = vec![Value::from("x")];
        apply_ordered(&sig, &mut args);
        assert_eq!(args, vec![Value::from("x")]);
    }

    #[test]
    fn test_named_keeps_supplied_values() {
        let sig = NamedSignature::new([
            ("foo", SlotSpec::from(ValueType::String).default_value("foo").required()),
            ("bar", SlotSpec::from(ValueType::String).default_value("bar")),
            ("baz", SlotSpec::from(ValueType::String)),
        ])
        .unwrap();

        let mut args = ArgMap::new();
        args.insert("foo".into(), Value::from("fixme"));
        apply_named(&sig, &mut args);

        assert_eq!(args.len(), 2);
        assert_eq!(args.get("foo"), Some(&Value::from("fixme")));
        assert_eq!(args.get("bar"), Some(&Value::from("bar")));
        assert!(!args.contains_key("baz"));
    }

    #[test]
    fn test_named_present_nil_is_not_replaced() {
        let sig = NamedSignature::new([("x", SlotSpec::new().default_value(1))]).unwrap();

        let mut args = ArgMap::new();
        args.insert("x".into(), Value::Nil);
        apply_named(&sig, &mut args);
        assert_eq!(args.get("x"), Some(&Value::Nil));
    }
}
