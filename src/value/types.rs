//! Value and type definitions
//!
//! Supported value kinds:
//! - nil: absence of a meaningful value (still a present argument)
//! - bool, 64-bit signed integer, 64-bit float
//! - string and symbol (an interned-style name)
//! - list: ordered sequence of values
//! - map: string-keyed, insertion-ordered mapping
//! - object: host value exposing a class name and capabilities

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Positional arguments.
pub type ArgList = Vec<Value>;

/// Named arguments. Iteration order is insertion order.
pub type ArgMap = IndexMap<String, Value>;

/// Capabilities every value exposes.
const COMMON_CAPABILITIES: &[&str] = &["to_s", "inspect", "eq", "hash", "clone"];
const BOOL_CAPABILITIES: &[&str] = &["not", "and", "or"];
const NUMERIC_CAPABILITIES: &[&str] = &["+", "-", "*", "/", "abs", "cmp", "to_f", "to_i"];
const INTEGER_CAPABILITIES: &[&str] = &["succ", "pred", "times", "%"];
const FLOAT_CAPABILITIES: &[&str] = &["floor", "ceil", "round", "is_nan"];
const STRING_CAPABILITIES: &[&str] = &[
    "len", "is_empty", "chars", "bytes", "lines", "split", "trim", "upcase", "downcase",
    "starts_with", "ends_with", "contains", "+", "cmp", "to_sym",
];
const SYMBOL_CAPABILITIES: &[&str] = &["len", "cmp", "to_sym"];
const LIST_CAPABILITIES: &[&str] = &[
    "len", "is_empty", "iter", "each", "map", "get", "first", "last", "push", "contains",
];
const MAP_CAPABILITIES: &[&str] = &[
    "len", "is_empty", "iter", "each", "get", "keys", "values", "contains_key", "insert",
];

/// A host value that is not one of the built-in kinds.
///
/// Objects answer nominal type checks through [`Object::is_a`] and duck-typed
/// checks through [`Object::responds_to`].
pub trait Object: fmt::Debug + Send + Sync {
    /// Name of the object's own class.
    fn class_name(&self) -> &str;

    /// Whether this object is an instance of `class` (its own class or an ancestor).
    fn is_a(&self, class: &str) -> bool {
        self.class_name() == class
    }

    /// Whether this object exposes the named capability.
    fn responds_to(&self, capability: &str) -> bool;

    /// Canonical string conversion.
    fn to_text(&self) -> String {
        format!("#<{}>", self.class_name())
    }
}

/// A dynamically typed argument value.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
    List(ArgList),
    Map(ArgMap),
    Object(Arc<dyn Object>),
}

impl Value {
    /// Creates a symbol value.
    pub fn sym(name: impl Into<String>) -> Self {
        Value::Sym(name.into())
    }

    /// Wraps a host object.
    pub fn object<O: Object + 'static>(object: O) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_list(&self) -> Option<&ArgList> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ArgMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the concrete type name for messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Sym(_) => "Symbol",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Object(object) => object.class_name(),
        }
    }

    /// Quoted rendering: strings are escaped, symbols prefixed, nil spelled out.
    pub fn inspect(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Str(s) => format!("{:?}", s),
            Value::Sym(s) => format!(":{}", s),
            other => other.to_string(),
        }
    }

    /// Orders two values within a shared ordinal domain.
    ///
    /// Integers and floats compare numerically with each other; strings compare
    /// with strings and symbols with symbols. Any other pairing, and NaN,
    /// yields `None`.
    pub fn ordinal_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Sym(a), Value::Sym(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Reflective capability probe.
    ///
    /// Built-in kinds answer from a fixed table; objects decide for themselves.
    pub fn responds_to(&self, capability: &str) -> bool {
        if let Value::Object(object) = self {
            return object.responds_to(capability);
        }
        if COMMON_CAPABILITIES.contains(&capability) {
            return true;
        }
        let table: &[&[&str]] = match self {
            Value::Nil | Value::Object(_) => &[],
            Value::Bool(_) => &[BOOL_CAPABILITIES],
            Value::Int(_) => &[NUMERIC_CAPABILITIES, INTEGER_CAPABILITIES],
            Value::Float(_) => &[NUMERIC_CAPABILITIES, FLOAT_CAPABILITIES],
            Value::Str(_) => &[STRING_CAPABILITIES],
            Value::Sym(_) => &[SYMBOL_CAPABILITIES],
            Value::List(_) => &[LIST_CAPABILITIES],
            Value::Map(_) => &[MAP_CAPABILITIES],
        };
        table.iter().any(|caps| caps.contains(&capability))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Exact integer-to-float ordering; no rounding of integers past 2^53.
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, exactly representable
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float < -LIMIT {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc() as i64;
    match int.cmp(&whole) {
        Ordering::Equal => 0.0f64.partial_cmp(&float.fract()),
        other => Some(other),
    }
}

/// Canonical string conversion, the text pattern constraints match against.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_nan() => write!(f, "NaN"),
            Value::Float(x) if x.is_infinite() => {
                write!(f, "{}", if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Str(s) | Value::Sym(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.inspect())?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value.inspect())?;
                }
                write!(f, "}}")
            }
            Value::Object(object) => write!(f, "{}", object.to_text()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ArgList> for Value {
    fn from(items: ArgList) -> Self {
        Value::List(items)
    }
}

impl From<ArgMap> for Value {
    fn from(map: ArgMap) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// A type a value can be an instance of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Every value
    Any,
    Nil,
    Bool,
    /// Integers and floats
    Numeric,
    Integer,
    Float,
    String,
    Symbol,
    List,
    Map,
    /// Host objects whose class (or an ancestor) has this name
    Class(String),
}

impl ValueType {
    /// Creates a nominal class type.
    pub fn class(name: impl Into<String>) -> Self {
        ValueType::Class(name.into())
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            ValueType::Any => "Any",
            ValueType::Nil => "Nil",
            ValueType::Bool => "Bool",
            ValueType::Numeric => "Numeric",
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Symbol => "Symbol",
            ValueType::List => "List",
            ValueType::Map => "Map",
            ValueType::Class(name) => name,
        }
    }

    /// Instance-of test.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Any, _) => true,
            (ValueType::Nil, Value::Nil) => true,
            (ValueType::Bool, Value::Bool(_)) => true,
            (ValueType::Numeric, Value::Int(_) | Value::Float(_)) => true,
            (ValueType::Integer, Value::Int(_)) => true,
            (ValueType::Float, Value::Float(_)) => true,
            (ValueType::String, Value::Str(_)) => true,
            (ValueType::Symbol, Value::Sym(_)) => true,
            (ValueType::List, Value::List(_)) => true,
            (ValueType::Map, Value::Map(_)) => true,
            (ValueType::Class(name), Value::Object(object)) => object.is_a(name),
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Duck;

    impl Object for Duck {
        fn class_name(&self) -> &str {
            "Duck"
        }

        fn is_a(&self, class: &str) -> bool {
            matches!(class, "Duck" | "Bird")
        }

        fn responds_to(&self, capability: &str) -> bool {
            capability == "quack"
        }
    }

    #[test]
    fn test_canonical_string_conversion() {
        assert_eq!(Value::Nil.to_string(), "");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(1.0).to_string(), "1.0");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::from("pee").to_string(), "pee");
        assert_eq!(Value::sym("foo").to_string(), "foo");
        assert_eq!(
            Value::from(vec![Value::from(1), Value::from("a"), Value::Nil]).to_string(),
            "[1, \"a\", nil]"
        );
        assert_eq!(Value::object(Duck).to_string(), "#<Duck>");
    }

    #[test]
    fn test_map_rendering_keeps_insertion_order() {
        let mut map = ArgMap::new();
        map.insert("b".into(), Value::from(1));
        map.insert("a".into(), Value::sym("x"));
        assert_eq!(Value::from(map).to_string(), "{b: 1, a: :x}");
    }

    #[test]
    fn test_ordinal_cmp_domains() {
        assert_eq!(Value::from(1).ordinal_cmp(&Value::from(2)), Some(Ordering::Less));
        assert_eq!(Value::from(2.5).ordinal_cmp(&Value::from(2)), Some(Ordering::Greater));
        assert_eq!(Value::from("b").ordinal_cmp(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::from("1").ordinal_cmp(&Value::from(1)), None);
        assert_eq!(Value::Nil.ordinal_cmp(&Value::Nil), None);
        assert_eq!(Value::from(f64::NAN).ordinal_cmp(&Value::from(1)), None);
    }

    #[test]
    fn test_ordinal_cmp_int_float_is_exact() {
        let big = Value::from(9_007_199_254_740_993i64);
        let below = Value::from(9_007_199_254_740_992.0);
        assert_eq!(big.ordinal_cmp(&below), Some(Ordering::Greater));
        assert_eq!(below.ordinal_cmp(&big), Some(Ordering::Less));

        assert_eq!(Value::from(2).ordinal_cmp(&Value::from(2.0)), Some(Ordering::Equal));
        assert_eq!(Value::from(2).ordinal_cmp(&Value::from(2.5)), Some(Ordering::Less));
        assert_eq!(Value::from(-2).ordinal_cmp(&Value::from(-2.5)), Some(Ordering::Greater));
        assert_eq!(
            Value::from(i64::MAX).ordinal_cmp(&Value::from(9_223_372_036_854_775_808.0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from(i64::MIN).ordinal_cmp(&Value::from(f64::NEG_INFINITY)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::from(i64::MIN).ordinal_cmp(&Value::from(-9_223_372_036_854_775_808.0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_type_admission() {
        assert!(ValueType::Numeric.admits(&Value::from(1)));
        assert!(ValueType::Numeric.admits(&Value::from(1.5)));
        assert!(!ValueType::Integer.admits(&Value::from(1.5)));
        assert!(!ValueType::String.admits(&Value::Nil));
        assert!(ValueType::Any.admits(&Value::Nil));
        assert!(ValueType::class("Bird").admits(&Value::object(Duck)));
        assert!(!ValueType::class("Fish").admits(&Value::object(Duck)));
        assert!(!ValueType::class("String").admits(&Value::from("s")));
    }

    #[test]
    fn test_capability_probe() {
        assert!(Value::from("abc").responds_to("upcase"));
        assert!(Value::from(1).responds_to("to_s"));
        assert!(!Value::from(1).responds_to("upcase"));
        assert!(Value::object(Duck).responds_to("quack"));
        assert!(!Value::object(Duck).responds_to("to_s"));
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = Value::object(Duck);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::object(Duck));
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"name": "x", "n": 3, "ratio": 0.5, "tags": [null, true]}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("x")));
        assert_eq!(map.get("n"), Some(&Value::Int(3)));
        assert_eq!(map.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(
            map.get("tags"),
            Some(&Value::List(vec![Value::Nil, Value::Bool(true)]))
        );
    }
}
