//! Non-owning views over a subset of a document's sentences.

use layered_overlay::{tokens_to_text, RangePolicy, Sentence, Span, Spanned, Token};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Annotation, AnnotationOverlay, Document, DocumentRef, OverlayError, OverlayResult};

/// Bounds applied when building snippets for training or inference batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    /// Largest number of sentences a snippet may hold, unbounded if `None`
    pub max_sentences: Option<usize>,
}

/// A range-bounded view over some of a document's sentences.
///
/// The snippet shares a borrow of its source document, so any number of
/// snippets over one document can be alive at once. Sentences are referenced
/// by index and annotation reads filter the source's overlay down to the
/// snippet range. Nothing is copied. Writes go through the owned
/// [`SnippetSelection`], which outlives the borrow.
///
/// Snippets built from an explicit sentence collection carry no usable
/// range; their annotation view is empty and their text joins the selected
/// sentences with a single space.
pub struct Snippet<'a> {
    source: &'a Document,
    sentences: Vec<usize>,
    /// `None` for explicit collections
    span: Option<Span>,
}

impl<'a> std::fmt::Debug for Snippet<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snippet")
            .field("source", &self.source.handle())
            .field("sentences", &self.sentences)
            .field("span", &self.span)
            .finish()
    }
}

impl<'a> Snippet<'a> {
    /// The sentences overlapping `[begin, begin + length)`, widened to their
    /// sentence boundaries.
    ///
    /// If no sentence overlaps the window, the snippet keeps the raw window
    /// and holds no sentences. Fails if `begin + length` overflows.
    pub fn from_range(source: &'a Document, begin: usize, length: usize) -> OverlayResult<Self> {
        let window = Span::checked_with_length(begin, length)?;
        let end = window.end();
        let sentences: Vec<usize> = source
            .sentences()
            .iter()
            .enumerate()
            .filter(|(_, s)| RangePolicy::Overlapping.selects(&s.span(), begin, end))
            .map(|(index, _)| index)
            .collect();

        let span = match (sentences.first(), sentences.last()) {
            (Some(&first), Some(&last)) => {
                let all = source.sentences();
                all[first].span().cover(&all[last].span())
            }
            _ => window,
        };
        debug!(
            doc = %source.handle(),
            window = %window,
            snippet = %span,
            sentences = sentences.len(),
            "built snippet from range"
        );
        Ok(Self {
            source,
            sentences,
            span: Some(span),
        })
    }

    /// An explicit collection of sentences, in the given order.
    pub fn from_sentences(source: &'a Document, indices: &[usize]) -> OverlayResult<Self> {
        for &index in indices {
            source.sentence(index)?;
        }
        Ok(Self {
            source,
            sentences: indices.to_vec(),
            span: None,
        })
    }

    /// Like [`Snippet::from_sentences`], shuffling the order with `rng`.
    pub fn shuffled<R: Rng + ?Sized>(
        source: &'a Document,
        indices: &[usize],
        rng: &mut R,
    ) -> OverlayResult<Self> {
        let mut snippet = Self::from_sentences(source, indices)?;
        snippet.sentences.shuffle(rng);
        Ok(snippet)
    }

    /// Enforce `config`, failing if the snippet holds too many sentences.
    pub fn within(self, config: &SnippetConfig) -> OverlayResult<Self> {
        match config.max_sentences {
            Some(max) if self.sentences.len() > max => Err(OverlayError::SnippetTooLarge {
                requested: self.sentences.len(),
                max,
            }),
            _ => Ok(self),
        }
    }

    pub fn source(&self) -> &'a Document {
        self.source
    }

    /// An owned copy of this snippet's selection, detached from the borrow.
    pub fn selection(&self) -> SnippetSelection {
        SnippetSelection {
            document: self.source.handle(),
            sentences: self.sentences.clone(),
            span: self.span,
        }
    }

    /// Append one of the source's sentences. Offsets and range are unchanged.
    pub fn add_sentence(&mut self, index: usize) -> OverlayResult<()> {
        self.source.sentence(index)?;
        self.sentences.push(index);
        Ok(())
    }

    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        let all = self.source.sentences();
        self.sentences.iter().map(move |&index| &all[index])
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences().flat_map(|s| s.tokens().iter())
    }

    pub fn is_empty(&self) -> bool {
        self.tokens().next().is_none()
    }

    /// Surface text of the selected sentences.
    pub fn text(&self) -> String {
        match self.span {
            Some(span) => tokens_to_text(self.tokens(), span.begin()),
            None => self
                .sentences()
                .map(Sentence::text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl<'a> Spanned for Snippet<'a> {
    fn span(&self) -> Span {
        self.span.unwrap_or_default()
    }
}

impl<'a> AnnotationOverlay for Snippet<'a> {
    fn overlay(&self) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        match self.span {
            Some(span) => Box::new(
                self.source
                    .annotations()
                    .iter()
                    .filter(move |a| span.encloses(&a.span())),
            ),
            None => Box::new(std::iter::empty()),
        }
    }
}

/// The owned half of a [`Snippet`]: which document, which sentences and
/// which range, without borrowing the document.
///
/// Writes that a snippet forwards to its source go through here, so the
/// document can be borrowed mutably once the reading views are gone.
///
/// ```
/// use layered_overlay::Span;
/// use layered_overlay_document::{
///     Annotation, AnnotationKind, AnnotationOverlay, Document, SegmentingFactory, Snippet, Source,
/// };
///
/// let mut doc = Document::from_text("Alice met Bob. They talked.", &SegmentingFactory::default()).unwrap();
/// let selection = Snippet::from_range(&doc, 16, 2).unwrap().selection();
/// let mention = Annotation::new(AnnotationKind::Mention, Source::User, Span::new(15, 19).unwrap());
/// selection.add_annotation(&mut doc, mention).unwrap();
///
/// let snippet = selection.view(&doc).unwrap();
/// assert_eq!(snippet.count_by_source(Source::User), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetSelection {
    document: DocumentRef,
    sentences: Vec<usize>,
    span: Option<Span>,
}

impl SnippetSelection {
    pub fn document(&self) -> DocumentRef {
        self.document
    }

    pub fn sentence_indices(&self) -> &[usize] {
        &self.sentences
    }

    /// Borrow `source` again as a [`Snippet`] over the same selection.
    pub fn view<'a>(&self, source: &'a Document) -> OverlayResult<Snippet<'a>> {
        self.check(source)?;
        Ok(Snippet {
            source,
            sentences: self.sentences.clone(),
            span: self.span,
        })
    }

    /// Add an annotation to the source document.
    pub fn add_annotation(&self, source: &mut Document, annotation: Annotation) -> OverlayResult<()> {
        self.check(source)?;
        source.add_annotation(annotation);
        Ok(())
    }

    pub fn add_annotations<I>(&self, source: &mut Document, annotations: I) -> OverlayResult<()>
    where
        I: IntoIterator<Item = Annotation>,
    {
        self.check(source)?;
        source.add_annotations(annotations);
        Ok(())
    }

    fn check(&self, source: &Document) -> OverlayResult<()> {
        if source.handle() == self.document {
            Ok(())
        } else {
            Err(OverlayError::ForeignDocument {
                expected: self.document,
                found: source.handle(),
            })
        }
    }
}
