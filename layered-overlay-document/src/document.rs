//! Documents: ordered sentences plus an unordered annotation overlay.
//!
//! A [`Document`] owns its sentences (and through them its tokens) and the
//! annotations attached to it. The surface text is never stored; it is
//! reconstructed from the token tree on demand with
//! [`layered_overlay::tokens_to_text`].

use std::collections::{BTreeMap, BTreeSet};

use layered_overlay::{tokens_to_text, RangeError, RangePolicy, Sentence, Span, Spanned, Token};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::{
    Annotation, AnnotationKind, AnnotationOverlay, DocumentFactory, DocumentRef, OverlayResult,
    Source,
};

/// Title and abstract of documents that carry a dedicated summary section.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TitleAbstract {
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
}

/// A piece of text made of sentences, tokens and annotations.
///
/// # Example
///
/// ```
/// use layered_overlay::{Sentence, Spanned, Token};
/// use layered_overlay_document::{Annotation, AnnotationKind, AnnotationOverlay, Document, Source};
///
/// let mut doc = Document::new();
/// doc.add_sentence(Sentence::from_tokens(vec![Token::new("Hello", 0), Token::new("there", 6)]), true);
/// doc.add_sentence(Sentence::from_tokens(vec![Token::new("Bye", 0)]), true);
/// assert_eq!(doc.text(), "Hello there Bye");
///
/// let span = doc.sentence(1).unwrap().span();
/// doc.add_annotation(Annotation::new(AnnotationKind::Passage, Source::Gold, span));
/// assert_eq!(doc.count_by_source(Source::Gold), 1);
/// ```
pub struct Document {
    handle: DocumentRef,
    span: Span,
    sentences: Vec<Sentence>,
    annotations: Vec<Annotation>,
    id: Option<String>,
    language: Option<String>,
    doc_type: Option<String>,
    title: Option<TitleAbstract>,
    /// Opaque provenance, e.g. the record this document was built from
    source: Option<serde_json::Value>,
    /// Which tag sets have been computed for which source
    assigned_tags: BTreeMap<Source, BTreeSet<String>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("handle", &self.handle)
            .field("id", &self.id)
            .field("span", &self.span)
            .field("sentence_count", &self.sentences.len())
            .field("annotation_count", &self.annotations.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality: range, language, type, sentences, annotations and
/// tag availability. Handles and ids are not compared.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span
            && self.language == other.language
            && self.doc_type == other.doc_type
            && self.sentences == other.sentences
            && self.annotations == other.annotations
            && self.assigned_tags == other.assigned_tags
    }
}

impl Document {
    /// An empty document with range `[0, 0)`.
    pub fn new() -> Self {
        Self {
            handle: DocumentRef::next(),
            span: Span::default(),
            sentences: Vec::new(),
            annotations: Vec::new(),
            id: None,
            language: None,
            doc_type: None,
            title: None,
            source: None,
            assigned_tags: BTreeMap::new(),
        }
    }

    /// Build a document from raw text with the given factory.
    pub fn from_text<F: DocumentFactory + ?Sized>(text: &str, factory: &F) -> OverlayResult<Self> {
        factory.from_text(text)
    }

    /// The handle annotations use to refer back to this document.
    pub fn handle(&self) -> DocumentRef {
        self.handle
    }

    // ------------------------------------------------------------------
    // Sentences and tokens
    // ------------------------------------------------------------------

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Indexed access; fails if `index` is out of bounds.
    pub fn sentence(&self, index: usize) -> Result<&Sentence, RangeError> {
        self.sentences.get(index).ok_or(RangeError::IndexOutOfBounds {
            index,
            len: self.sentences.len(),
        })
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// All tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens().iter())
    }

    /// Mutable token access for encoders and taggers.
    pub fn tokens_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.sentences.iter_mut().flat_map(|s| s.tokens_mut())
    }

    /// The `index`-th token of the document, counting across sentences.
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens().nth(index)
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::token_count).sum()
    }

    /// True if the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens().next().is_none()
    }

    /// First sentence with `begin <= pos < end`.
    ///
    /// Positions in gaps between sentences find nothing.
    pub fn sentence_at_position(&self, pos: usize) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.span().contains(pos))
    }

    /// Index of the last sentence that starts at or before `pos`.
    ///
    /// This is an "insert-before" lookup: a position in the gap after a
    /// sentence still resolves to that sentence. `None` means no sentence
    /// starts at or before `pos`, including the empty document.
    pub fn sentence_index_at_position(&self, pos: usize) -> Option<usize> {
        match self.sentences.iter().position(|s| s.begin() > pos) {
            Some(later) => later.checked_sub(1),
            None => self.sentences.len().checked_sub(1),
        }
    }

    /// Sentences selected from `[begin, end]` by `policy`.
    pub fn sentences_in_range(
        &self,
        begin: usize,
        end: usize,
        policy: RangePolicy,
    ) -> impl Iterator<Item = &Sentence> {
        policy.select(&self.sentences, begin, end)
    }

    /// Tokens selected from `[begin, end]` by `policy`.
    pub fn tokens_in_range(
        &self,
        begin: usize,
        end: usize,
        policy: RangePolicy,
    ) -> impl Iterator<Item = &Token> {
        policy.select(self.tokens(), begin, end)
    }

    /// A uniformly chosen sentence, `None` if there are none.
    pub fn random_sentence<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Sentence> {
        self.sentences.choose(rng)
    }

    /// Append a sentence at the end of the document.
    ///
    /// With `adjust_offsets` the sentence (and its tokens) is moved to start
    /// right after the current end, leaving one separator position when the
    /// document already has sentences; the first sentence resets `begin` to
    /// 0. Without it the sentence's offsets are kept and the document range
    /// is only widened to include it.
    pub fn add_sentence(&mut self, mut sentence: Sentence, adjust_offsets: bool) {
        if adjust_offsets {
            let begin = if self.sentences.is_empty() {
                0
            } else {
                self.span.begin()
            };
            let mut cursor = self.span.end();
            if !self.sentences.is_empty() {
                cursor += 1;
            }
            trace!(from = sentence.begin(), to = cursor, "moving sentence");
            sentence.move_to(cursor);
            self.span = Span::with_length(begin, sentence.end() - begin);
        } else if self.sentences.is_empty() {
            self.span = sentence.span();
        } else {
            self.span = self.span.cover(&sentence.span());
        }
        self.sentences.push(sentence);
    }

    /// Concatenate `other` onto this document, consuming it.
    ///
    /// `other` is shifted by this document's end when this document is empty
    /// or its text already ends in a space or newline, and by `end + 1`
    /// otherwise. Sentences, tokens and annotations move by the same delta;
    /// annotations and tag availability are re-homed here.
    pub fn append(&mut self, other: Document) {
        let offset = if self.is_empty() || self.text().ends_with(&['\n', ' '][..]) {
            self.span.end()
        } else {
            self.span.end() + 1
        };
        debug!(
            target_doc = %self.handle,
            appended = %other.handle,
            offset,
            sentences = other.sentences.len(),
            "appending document"
        );

        let Document {
            sentences,
            annotations,
            assigned_tags,
            ..
        } = other;

        for mut sentence in sentences {
            sentence.shift(offset);
            if self.sentences.is_empty() {
                self.span = sentence.span();
            } else {
                self.span = self.span.cover(&sentence.span());
            }
            self.sentences.push(sentence);
        }
        for mut annotation in annotations {
            annotation.shift(offset);
            annotation.set_document(self.handle);
            self.annotations.push(annotation);
        }
        for (source, tags) in assigned_tags {
            self.assigned_tags.entry(source).or_default().extend(tags);
        }
    }

    /// Deep copy of the sentence tree with `id`, range and provenance.
    ///
    /// Annotations are not copied: their ranges belong to this document and
    /// must be re-attached by the caller.
    pub fn clone_tree(&self) -> Document {
        self.clone_tree_with(|text| text.to_string())
    }

    /// Like [`Document::clone_tree`], passing every token text through `transform`.
    pub fn clone_tree_with<F>(&self, transform: F) -> Document
    where
        F: Fn(&str) -> String,
    {
        let mut result = Document::new();
        for sentence in &self.sentences {
            result.add_sentence(sentence.clone_with(&transform), false);
        }
        result.id = self.id.clone();
        result.span = self.span;
        result.source = self.source.clone();
        debug!(from = %self.handle, to = %result.handle, "cloned sentence tree");
        result
    }

    /// Replace the whole sentence tree by tokenizing `text` with `factory`.
    ///
    /// Clears existing sentences and resets the range to `[0, 0)` first.
    /// Annotations are kept untouched.
    pub fn set_text<F: DocumentFactory + ?Sized>(&mut self, text: &str, factory: &F) -> OverlayResult<()> {
        self.sentences.clear();
        self.span = Span::default();
        debug!(doc = %self.handle, len = text.len(), "rebuilding document from text");
        factory.add_to_document_from_text(text, self)
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// The document text, reconstructed from token offsets.
    ///
    /// Falls back to space-joined sentence texts when there are no tokens,
    /// and to `""` for an empty document.
    pub fn text(&self) -> String {
        if self.token_count() > 0 {
            tokens_to_text(self.tokens(), self.span.begin())
        } else {
            self.sentences
                .iter()
                .map(Sentence::text)
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// The text covered by `span`, which must lie inside this document.
    pub fn text_at(&self, span: Span) -> Result<String, RangeError> {
        let text = self.text();
        let outside = || RangeError::OutsideText {
            begin: span.begin(),
            end: span.end(),
            text_begin: self.span.begin(),
            text_end: self.span.begin() + text.len(),
        };
        let begin = span
            .begin()
            .checked_sub(self.span.begin())
            .ok_or_else(outside)?;
        let end = begin + span.length();
        if end > text.len() {
            return Err(outside());
        }
        text.get(begin..end)
            .map(str::to_string)
            .ok_or(RangeError::NotCharBoundary {
                begin: span.begin(),
                end: span.end(),
            })
    }

    /// The text an annotation refers to.
    pub fn text_of(&self, annotation: &Annotation) -> Result<String, RangeError> {
        self.text_at(annotation.span())
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Attach an annotation. Duplicates are kept.
    pub fn add_annotation(&mut self, mut annotation: Annotation) {
        annotation.set_document(self.handle);
        self.annotations.push(annotation);
    }

    pub fn add_annotations<I>(&mut self, annotations: I)
    where
        I: IntoIterator<Item = Annotation>,
    {
        for annotation in annotations {
            self.add_annotation(annotation);
        }
    }

    /// All annotations in insertion order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Remove every annotation of exactly `kind` (no subtypes) from `source`.
    pub fn clear_annotations(&mut self, source: Source, kind: AnnotationKind) {
        let before = self.annotations.len();
        self.annotations
            .retain(|a| !(a.kind() == kind && a.source() == source));
        trace!(
            doc = %self.handle,
            %source,
            %kind,
            removed = before - self.annotations.len(),
            "cleared annotations"
        );
    }

    /// Remove the first annotation with the same identity as `annotation`.
    ///
    /// Returns whether anything was removed.
    pub fn remove_annotation(&mut self, annotation: &Annotation) -> bool {
        match self
            .annotations
            .iter()
            .position(|a| a.id() == annotation.id())
        {
            Some(index) => {
                self.annotations.remove(index);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Tag availability
    // ------------------------------------------------------------------

    /// Record (or unrecord) that tags of `tag` have been computed for `source`.
    pub fn set_tag_available(&mut self, source: Source, tag: &str, exists: bool) {
        if exists {
            self.assigned_tags
                .entry(source)
                .or_default()
                .insert(tag.to_string());
        } else if let Some(tags) = self.assigned_tags.get_mut(&source) {
            tags.remove(tag);
        }
    }

    pub fn is_tag_available(&self, source: Source, tag: &str) -> bool {
        self.assigned_tags
            .get(&source)
            .map_or(false, |tags| tags.contains(tag))
    }

    pub fn assigned_tags(&self) -> &BTreeMap<Source, BTreeSet<String>> {
        &self.assigned_tags
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    pub fn doc_type(&self) -> Option<&str> {
        self.doc_type.as_deref()
    }

    pub fn set_doc_type(&mut self, doc_type: impl Into<String>) {
        self.doc_type = Some(doc_type.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().and_then(|t| t.title.as_deref())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title.get_or_insert_with(TitleAbstract::default).title = Some(title.into());
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.title.as_ref().and_then(|t| t.abstract_text.as_deref())
    }

    pub fn set_abstract(&mut self, abstract_text: impl Into<String>) {
        self.title
            .get_or_insert_with(TitleAbstract::default)
            .abstract_text = Some(abstract_text.into());
    }

    pub fn title_abstract(&self) -> Option<&TitleAbstract> {
        self.title.as_ref()
    }

    /// Opaque provenance attached by whoever built this document.
    pub fn source(&self) -> Option<&serde_json::Value> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, source: serde_json::Value) {
        self.source = Some(source);
    }

    // ------------------------------------------------------------------
    // Record conversion
    // ------------------------------------------------------------------

    pub(crate) fn from_parts(
        span: Span,
        sentences: Vec<Sentence>,
        annotations: Vec<Annotation>,
        assigned_tags: BTreeMap<Source, BTreeSet<String>>,
    ) -> Self {
        let mut document = Document::new();
        document.span = span;
        document.sentences = sentences;
        document.assigned_tags = assigned_tags;
        document.add_annotations(annotations);
        document
    }

    pub(crate) fn set_metadata(
        &mut self,
        id: Option<String>,
        language: Option<String>,
        doc_type: Option<String>,
        title: Option<TitleAbstract>,
    ) {
        self.id = id;
        self.language = language;
        self.doc_type = doc_type;
        self.title = title;
    }
}

impl Spanned for Document {
    fn span(&self) -> Span {
        self.span
    }
}

impl AnnotationOverlay for Document {
    fn overlay(&self) -> Box<dyn Iterator<Item = &Annotation> + '_> {
        Box::new(self.annotations.iter())
    }
}
