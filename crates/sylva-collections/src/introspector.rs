use sylva_common::TextSpan;

/// Tells an [`IntervalTree`](crate::IntervalTree) where a value sits.
///
/// The answer for a given value must not change while the value is in a
/// tree; the tree caches subtree ends computed from it. A changing answer
/// makes query results meaningless (it is not memory-unsafe).
pub trait IntervalIntrospector<T> {
    fn span(&self, value: &T) -> TextSpan;
}

impl<T, F> IntervalIntrospector<T> for F
where
    F: Fn(&T) -> TextSpan,
{
    #[inline]
    fn span(&self, value: &T) -> TextSpan {
        self(value)
    }
}

/// Introspector for trees that store the spans themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpanIntrospector;

impl IntervalIntrospector<TextSpan> for SpanIntrospector {
    #[inline]
    fn span(&self, value: &TextSpan) -> TextSpan {
        *value
    }
}
