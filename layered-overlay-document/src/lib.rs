//! Documents, annotation overlays and derived views for layered-overlay.
//!
//! A [`Document`] owns an ordered list of sentences (from `layered-overlay`)
//! and an unordered collection of [`Annotation`]s. Annotations from
//! different [`Source`]s over the same range coexist; they are never merged.
//!
//! ## Core Types
//!
//! - [`Document`] - Sentences, annotations, metadata and tag availability
//! - [`Annotation`] / [`AnnotationKind`] / [`Source`] - Provenance-tagged ranges
//! - [`AnnotationFilter`] / [`AnnotationOverlay`] - Composable filtering and counting
//! - [`Snippet`] - A borrowed view over some of a document's sentences
//! - [`Query`] / [`QueryResult`] - A document with ranked results in other documents
//! - [`DocumentFactory`] / [`SegmentingFactory`] - Raw text to sentence trees
//! - [`DocumentDisplay`] - Text with underlined annotations
//!
//! ## Example
//!
//! ```
//! use layered_overlay::Spanned;
//! use layered_overlay_document::{
//!     Annotation, AnnotationKind, AnnotationOverlay, Document, SegmentingFactory, Source,
//! };
//!
//! let mut doc = Document::from_text("Alice met Bob. They talked.", &SegmentingFactory::default()).unwrap();
//! assert_eq!(doc.sentence_count(), 2);
//!
//! let alice = doc.token(0).unwrap().span();
//! doc.add_annotation(Annotation::new(AnnotationKind::NamedEntity, Source::Gold, alice));
//! doc.add_annotation(Annotation::new(AnnotationKind::NamedEntity, Source::Pred, alice).with_confidence(0.6));
//!
//! assert_eq!(doc.count_by_source(Source::Gold), 1);
//! assert_eq!(doc.count_of_kind(AnnotationKind::Mention, true), 2);
//! assert_eq!(doc.text_of(&doc.annotations()[0]).unwrap(), "Alice");
//! ```

mod annotation;
mod config;
mod display;
mod document;
mod error;
mod factory;
mod overlay;
mod query;
mod record;
mod snippet;

pub use annotation::{Annotation, AnnotationId, AnnotationKind, DocumentRef, Source};
pub use config::OverlayConfig;
pub use display::DocumentDisplay;
pub use document::{Document, TitleAbstract};
pub use error::{OverlayError, OverlayResult};
pub use factory::{DocumentFactory, SegmentingFactory};
pub use overlay::{AnnotationFilter, AnnotationOverlay, KindMatch};
pub use query::{Query, QueryResult};
pub use record::DocumentRecord;
pub use snippet::{Snippet, SnippetConfig, SnippetSelection};
