//! Evaluation contexts
//!
//! A [`Context`] describes who or what a flag is evaluated for. Single-kind
//! contexts come from [`Context::create`] or a [`ContextBuilder`]; multi-kind
//! contexts combine several of them through [`Context::create_multi`] or a
//! [`ContextMultiBuilder`].

pub mod builder;
pub(crate) mod codec;
#[allow(clippy::module_inception)]
pub mod context;
pub mod kind;
pub mod multi_builder;

pub use builder::ContextBuilder;
pub use context::Context;
pub use kind::ContextKind;
pub use multi_builder::ContextMultiBuilder;
