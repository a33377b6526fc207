//! JSON value model
//!
//! [`Value`] is the currency for every context attribute and flag variation.
//! It is a closed set of JSON types with structural equality and accessors that
//! fall back to zero values instead of failing.

pub mod builder;
pub mod convert;
pub mod number;
pub mod value;

pub use builder::{ArrayBuilder, ObjectBuilder};
pub use convert::FromValue;
pub use number::Number;
pub use value::{Value, ValueType, Values};
