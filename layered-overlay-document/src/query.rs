//! Queries: documents that also carry a ranked set of retrieved results.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::{
    Annotation, AnnotationKind, AnnotationOverlay, Document, DocumentFactory, OverlayError,
    OverlayResult, Source,
};

/// One retrieved hit: a target document and the annotation locating the
/// relevant span inside it.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    document: &'a Document,
    annotation: Annotation,
}

impl<'a> QueryResult<'a> {
    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Relevance is the annotation's confidence.
    pub fn relevance(&self) -> f64 {
        self.annotation.confidence()
    }

    /// Same document and an annotation with the same range and kind.
    pub fn matches(&self, other: &QueryResult<'_>) -> bool {
        (std::ptr::eq(self.document, other.document) || self.document == other.document)
            && self.annotation.matches(&other.annotation)
    }
}

// Descending relevance, then document handle, then annotation identity.
// A NaN relevance ranks after every real score.
impl<'a> Ord for QueryResult<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (mine, theirs) = (self.relevance(), other.relevance());
        let by_relevance = match (mine.is_nan(), theirs.is_nan()) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => theirs.total_cmp(&mine),
        };
        by_relevance
            .then_with(|| self.document.handle().cmp(&other.document.handle()))
            .then_with(|| self.annotation.id().cmp(&other.annotation.id()))
    }
}

impl<'a> PartialOrd for QueryResult<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> PartialEq for QueryResult<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<'a> Eq for QueryResult<'a> {}

/// A document posed as a query, with results ordered by descending relevance.
///
/// Result documents are borrowed, so they must outlive the query.
///
/// # Example
///
/// ```
/// use layered_overlay::Span;
/// use layered_overlay_document::{Annotation, AnnotationKind, Document, Query, Source};
///
/// let corpus = Document::new();
/// let mut query = Query::new();
/// for confidence in [0.2, 0.9, 0.5] {
///     let hit = Annotation::new(AnnotationKind::Relevance, Source::Pred, Span::empty_at(0))
///         .with_confidence(confidence);
///     query.add_result(&corpus, hit);
/// }
/// let ranked: Vec<f64> = query.results().map(|r| r.relevance()).collect();
/// assert_eq!(ranked, vec![0.9, 0.5, 0.2]);
/// ```
#[derive(Debug, Default)]
pub struct Query<'a> {
    document: Document,
    results: BTreeSet<QueryResult<'a>>,
}

impl<'a> Query<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the query text with `factory`.
    pub fn from_text<F: DocumentFactory + ?Sized>(text: &str, factory: &F) -> OverlayResult<Self> {
        let mut query = Self::new();
        factory.add_to_document_from_text(text, &mut query.document)?;
        Ok(query)
    }

    /// Record a hit inside `document`. The annotation is repointed to it.
    ///
    /// Returns `false` if an identical result was already present.
    pub fn add_result(&mut self, document: &'a Document, mut annotation: Annotation) -> bool {
        annotation.set_document(document.handle());
        trace!(
            query = %self.document.handle(),
            target = %document.handle(),
            relevance = annotation.confidence(),
            "adding result"
        );
        self.results.insert(QueryResult {
            document,
            annotation,
        })
    }

    /// Results in ranking order.
    pub fn results(&self) -> impl Iterator<Item = &QueryResult<'a>> {
        self.results.iter()
    }

    pub fn results_by_source(&self, source: Source) -> impl Iterator<Item = &QueryResult<'a>> {
        self.results
            .iter()
            .filter(move |r| r.annotation.source() == source)
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// The single annotation of `kind` attached to the query itself.
    ///
    /// If several are attached, the first one added wins.
    pub fn annotation(&self, kind: AnnotationKind) -> OverlayResult<&Annotation> {
        self.document
            .annotations_of_kind(kind, false)
            .next()
            .ok_or(OverlayError::EmptyResult { kind })
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl<'a> Deref for Query<'a> {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.document
    }
}

impl<'a> DerefMut for Query<'a> {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}
