//! Building sentence and token trees from raw text.

use layered_overlay::{Sentence, Token};
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Document, OverlayResult};

/// Produces the initial sentence/token tree of a document from raw text.
///
/// Implementors only split text; [`DocumentFactory::add_to_document_from_text`]
/// takes care of offsets when appending to a document that already holds
/// sentences.
pub trait DocumentFactory {
    /// Split `text` into sentences whose tokens carry byte offsets into `text`.
    fn sentences_from_text(&self, text: &str) -> OverlayResult<Vec<Sentence>>;

    fn from_text(&self, text: &str) -> OverlayResult<Document> {
        let mut document = Document::new();
        self.add_to_document_from_text(text, &mut document)?;
        Ok(document)
    }

    /// Tokenize `text` and append the result to `document`.
    fn add_to_document_from_text(&self, text: &str, document: &mut Document) -> OverlayResult<()> {
        let mut fresh = Document::new();
        for sentence in self.sentences_from_text(text)? {
            fresh.add_sentence(sentence, false);
        }
        document.append(fresh);
        Ok(())
    }
}

/// Unicode sentence and word segmentation (UAX #29).
///
/// Whitespace-only segments are dropped, except line breaks when
/// `keep_newlines` is set. Sentences made only of line breaks are folded
/// into the preceding sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentingFactory {
    pub keep_newlines: bool,
}

impl Default for SegmentingFactory {
    fn default() -> Self {
        Self {
            keep_newlines: true,
        }
    }
}

impl SegmentingFactory {
    pub fn new(keep_newlines: bool) -> Self {
        Self { keep_newlines }
    }

    fn keeps(&self, word: &str) -> bool {
        if word.trim().is_empty() {
            self.keep_newlines && word.contains('\n')
        } else {
            true
        }
    }
}

impl DocumentFactory for SegmentingFactory {
    fn sentences_from_text(&self, text: &str) -> OverlayResult<Vec<Sentence>> {
        let mut sentences: Vec<Sentence> = Vec::new();
        for (offset, segment) in text.split_sentence_bound_indices() {
            let tokens: Vec<Token> = segment
                .split_word_bound_indices()
                .filter(|(_, word)| self.keeps(word))
                .map(|(index, word)| Token::new(word, offset + index))
                .collect();
            if tokens.is_empty() {
                continue;
            }

            let only_breaks = tokens.iter().all(|t| t.text().trim().is_empty());
            match sentences.last_mut() {
                Some(previous) if only_breaks => {
                    for token in tokens {
                        previous.add_token(token);
                    }
                }
                _ => sentences.push(Sentence::from_tokens(tokens)),
            }
        }
        debug!(
            len = text.len(),
            sentences = sentences.len(),
            "segmented text"
        );
        Ok(sentences)
    }
}
