//! Composable annotation queries.
//!
//! Every filter variant (by source, by kind, by kind including subtypes, and
//! any combination) is one [`AnnotationFilter`] value built from independent
//! predicates. [`AnnotationOverlay`] gives documents, snippets and queries the
//! same query surface over whatever annotations they expose.

use layered_overlay::Spanned;

use crate::{Annotation, AnnotationKind, Source};

/// How an [`AnnotationFilter`] matches kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindMatch {
    /// The kind itself only
    Exact(AnnotationKind),
    /// The kind or any of its subtypes
    IncludingSubtypes(AnnotationKind),
}

impl KindMatch {
    pub fn accepts(self, kind: AnnotationKind) -> bool {
        match self {
            KindMatch::Exact(expected) => kind == expected,
            KindMatch::IncludingSubtypes(ancestor) => kind.is_a(ancestor),
        }
    }
}

/// A conjunction of optional predicates over annotations.
///
/// # Example
///
/// ```
/// use layered_overlay_document::{AnnotationFilter, AnnotationKind, Source};
///
/// let gold_mentions = AnnotationFilter::any()
///     .source(Source::Gold)
///     .kind_or_subtype(AnnotationKind::Mention);
/// # let _ = gold_mentions;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AnnotationFilter {
    source: Option<Source>,
    kind: Option<KindMatch>,
}

impl AnnotationFilter {
    /// Matches every annotation.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to an exact provenance source.
    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Restrict to an exact kind (no subtypes).
    pub fn kind(mut self, kind: AnnotationKind) -> Self {
        self.kind = Some(KindMatch::Exact(kind));
        self
    }

    /// Restrict to a kind or any of its subtypes.
    pub fn kind_or_subtype(mut self, kind: AnnotationKind) -> Self {
        self.kind = Some(KindMatch::IncludingSubtypes(kind));
        self
    }

    pub fn matches(&self, annotation: &Annotation) -> bool {
        self.source.map_or(true, |s| annotation.source() == s)
            && self.kind.map_or(true, |k| k.accepts(annotation.kind()))
    }
}

/// Read access to a collection of annotations with filtering and counting.
///
/// Implementors only provide [`AnnotationOverlay::overlay`]; every query is
/// derived from it.
pub trait AnnotationOverlay {
    /// All annotations visible through this overlay, in insertion order.
    fn overlay(&self) -> Box<dyn Iterator<Item = &Annotation> + '_>;

    fn annotations_matching(
        &self,
        filter: AnnotationFilter,
    ) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        Box::new(self.overlay().filter(move |a| filter.matches(a)))
    }

    fn annotations_by_source(&self, source: Source) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        self.annotations_matching(AnnotationFilter::any().source(source))
    }

    fn annotations_of_kind(
        &self,
        kind: AnnotationKind,
        including_subtypes: bool,
    ) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        let filter = if including_subtypes {
            AnnotationFilter::any().kind_or_subtype(kind)
        } else {
            AnnotationFilter::any().kind(kind)
        };
        self.annotations_matching(filter)
    }

    fn annotations_by_source_and_kind(
        &self,
        source: Source,
        kind: AnnotationKind,
    ) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        self.annotations_matching(AnnotationFilter::any().source(source).kind(kind))
    }

    /// Annotations fully inside `[begin, end)`.
    fn annotations_within(&self, begin: usize, end: usize) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        Box::new(
            self.overlay()
                .filter(move |a| a.begin() >= begin && a.end() <= end),
        )
    }

    fn count_annotations(&self, filter: AnnotationFilter) -> usize {
        self.annotations_matching(filter).count()
    }

    fn count_by_source(&self, source: Source) -> usize {
        self.annotations_by_source(source).count()
    }

    fn count_of_kind(&self, kind: AnnotationKind, including_subtypes: bool) -> usize {
        self.annotations_of_kind(kind, including_subtypes).count()
    }

    fn count_by_source_and_kind(&self, source: Source, kind: AnnotationKind) -> usize {
        self.annotations_by_source_and_kind(source, kind).count()
    }
}

impl AnnotationOverlay for [Annotation] {
    fn overlay(&self) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        Box::new(self.iter())
    }
}
