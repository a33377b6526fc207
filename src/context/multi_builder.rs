//! Builder for multi-kind contexts

use super::context::Context;

/// Accumulates single-kind contexts for a multi-kind [`Context`]
///
/// Building with one member returns that member unchanged; with none, an
/// invalid context. Members added after a build do not affect contexts
/// already built.
#[derive(Debug, Clone, Default)]
pub struct ContextMultiBuilder {
    contexts: Vec<Context>,
}

impl ContextMultiBuilder {
    /// Create an empty multi-kind builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-kind context
    pub fn add(&mut self, context: Context) -> &mut Self {
        self.contexts.push(context);
        self
    }

    /// Combine the added contexts
    pub fn build(&self) -> Context {
        Context::create_multi(&self.contexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextKind;

    #[test]
    fn test_empty_builder_fails() {
        let c = ContextMultiBuilder::new().build();
        assert_eq!(c.error(), Some("multi-kind context must contain at least one kind"));
    }

    #[test]
    fn test_single_member_is_returned_unwrapped() {
        let only = Context::create("a");
        let built = ContextMultiBuilder::new().add(only.clone()).build();
        assert!(Context::ptr_eq(&only, &built));
        assert!(!built.is_multiple());
    }

    #[test]
    fn test_add_after_build() {
        let mut b = ContextMultiBuilder::new();
        b.add(Context::create("a"))
            .add(Context::create_with_kind(ContextKind::of("org"), "o"));
        let first = b.build();
        b.add(Context::create_with_kind(ContextKind::of("device"), "d"));
        let second = b.build();
        assert_eq!(first.individual_context_count(), 2);
        assert_eq!(second.individual_context_count(), 3);
    }
}
