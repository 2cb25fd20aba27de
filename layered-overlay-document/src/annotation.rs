//! Annotation overlays: ranges tagged with provenance, kind and confidence.
//!
//! An [`Annotation`] never owns text. It refers to a range in its owning
//! document's coordinate space, and records which document that is through
//! a non-owning [`DocumentRef`] handle.
//!
//! Annotation kinds form a small closed hierarchy:
//!
//! ```text
//! Generic
//! ├── Passage
//! │   └── Section
//! ├── Mention
//! │   └── NamedEntity
//! └── Relevance
//! ```
//!
//! Subtype-inclusive filtering walks this hierarchy via [`AnnotationKind::is_a`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use layered_overlay::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// Where an annotation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    /// Ground truth
    Gold,
    /// Model prediction
    Pred,
    /// Weakly or automatically labeled
    Silver,
    /// Added manually by a user
    User,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Gold => "GOLD",
            Source::Pred => "PRED",
            Source::Silver => "SILVER",
            Source::User => "USER",
        })
    }
}

/// The kind of an annotation, resolved at compile time instead of by runtime type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Root of the hierarchy; every kind is a `Generic`
    Generic,
    /// A contiguous passage of text (paragraph, retrieved span)
    Passage,
    /// A topical section of a document
    Section,
    /// A mention of something in the text
    Mention,
    /// A mention with an entity type
    NamedEntity,
    /// A span marked relevant to a query
    Relevance,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 6] = [
        AnnotationKind::Generic,
        AnnotationKind::Passage,
        AnnotationKind::Section,
        AnnotationKind::Mention,
        AnnotationKind::NamedEntity,
        AnnotationKind::Relevance,
    ];

    /// Direct supertype, `None` for [`AnnotationKind::Generic`].
    pub fn parent(self) -> Option<AnnotationKind> {
        match self {
            AnnotationKind::Generic => None,
            AnnotationKind::Passage | AnnotationKind::Mention | AnnotationKind::Relevance => {
                Some(AnnotationKind::Generic)
            }
            AnnotationKind::Section => Some(AnnotationKind::Passage),
            AnnotationKind::NamedEntity => Some(AnnotationKind::Mention),
        }
    }

    /// True if `self` is `ancestor` or one of its subtypes.
    pub fn is_a(self, ancestor: AnnotationKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    pub fn name(self) -> &'static str {
        match self {
            AnnotationKind::Generic => "Generic",
            AnnotationKind::Passage => "Passage",
            AnnotationKind::Section => "Section",
            AnnotationKind::Mention => "Mention",
            AnnotationKind::NamedEntity => "NamedEntity",
            AnnotationKind::Relevance => "Relevance",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a document, used as a non-owning back-reference.
///
/// Handles are process-unique. They are lookup keys only and never keep a
/// document alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentRef(u64);

impl DocumentRef {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        DocumentRef(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Identity of an annotation instance, used for removal and result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(u64);

impl AnnotationId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        AnnotationId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A range in a document's coordinate space tagged with provenance.
///
/// Equality compares range, kind, source, confidence and label. Identity
/// (for [`crate::Document::remove_annotation`]) is the [`AnnotationId`],
/// shared by clones of the same instance.
///
/// # Example
///
/// ```
/// use layered_overlay::{Span, Spanned};
/// use layered_overlay_document::{Annotation, AnnotationKind, Source};
///
/// let gold = Annotation::new(AnnotationKind::NamedEntity, Source::Gold, Span::new(0, 6).unwrap())
///     .with_label("LOC");
/// let pred = Annotation::new(AnnotationKind::NamedEntity, Source::Pred, Span::new(0, 6).unwrap())
///     .with_confidence(0.8);
///
/// assert!(gold.matches(&pred));
/// assert_ne!(gold, pred);
/// assert_eq!(pred.length(), 6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(skip, default = "AnnotationId::next")]
    id: AnnotationId,
    span: Span,
    kind: AnnotationKind,
    source: Source,
    confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip)]
    document: Option<DocumentRef>,
}

impl Annotation {
    /// A new annotation with confidence 1.0 and no owning document yet.
    pub fn new(kind: AnnotationKind, source: Source, span: Span) -> Self {
        Self {
            id: AnnotationId::next(),
            span,
            kind,
            source,
            confidence: 1.0,
            label: None,
            document: None,
        }
    }

    /// Set the confidence score. Values are stored as given; retrieval
    /// scores outside `0.0..=1.0` keep their ordering.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The document this annotation was last added to.
    pub fn document_ref(&self) -> Option<DocumentRef> {
        self.document
    }

    pub(crate) fn set_document(&mut self, document: DocumentRef) {
        self.document = Some(document);
    }

    pub(crate) fn shift(&mut self, delta: usize) {
        self.span = self.span.shifted(delta);
    }

    /// Same range and same kind, regardless of source, confidence or label.
    pub fn matches(&self, other: &Annotation) -> bool {
        self.span == other.span && self.kind == other.kind
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span
            && self.kind == other.kind
            && self.source == other.source
            && self.confidence == other.confidence
            && self.label == other.label
    }
}

impl Spanned for Annotation {
    fn span(&self) -> Span {
        self.span
    }
}
