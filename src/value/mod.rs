//! Dynamic argument values
//!
//! Call arguments arrive untyped, so validation works over a small dynamic
//! value model:
//! - nil, booleans, 64-bit integers and floats
//! - strings and symbols
//! - lists and insertion-ordered maps
//! - opaque host objects implementing [`Object`]

mod types;

pub use types::{ArgList, ArgMap, Object, Value, ValueType};
