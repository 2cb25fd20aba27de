//! Leaf spans carrying surface text and encoder/tagger attachments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Span, Spanned};

/// A value attached to a token by an external encoder or tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attachment {
    /// Dense vector produced by an encoder
    Vector(Vec<f32>),
    /// Discrete label produced by a tagger (e.g. a BIOES tag)
    Tag(String),
}

/// A terminal span.
///
/// `text` is the literal surface string. Its byte length may differ from
/// the span length (for example after normalization); offset-exact
/// reconstruction reconciles the two, see [`crate::tokens_to_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    text: String,
    span: Span,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attachments: BTreeMap<String, Attachment>,
}

impl Token {
    /// A token whose span length matches its text.
    pub fn new(text: impl Into<String>, begin: usize) -> Self {
        let text = text.into();
        let span = Span::with_length(begin, text.len());
        Self {
            text,
            span,
            attachments: BTreeMap::new(),
        }
    }

    /// A token with an explicit span, which may disagree with the text length.
    pub fn with_span(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
            attachments: BTreeMap::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Zero-length tokens are skipped by reconstruction.
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Attach a value under `key`, returning the previous value if any.
    pub fn attach(&mut self, key: impl Into<String>, value: Attachment) -> Option<Attachment> {
        self.attachments.insert(key.into(), value)
    }

    pub fn attachment(&self, key: &str) -> Option<&Attachment> {
        self.attachments.get(key)
    }

    pub fn detach(&mut self, key: &str) -> Option<Attachment> {
        self.attachments.remove(key)
    }

    /// All attachments, ordered by key.
    pub fn attachments(&self) -> impl Iterator<Item = (&str, &Attachment)> {
        self.attachments.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn relocate(&mut self, begin: usize) {
        self.span = self.span.moved_to(begin);
    }

    pub(crate) fn shift(&mut self, delta: usize) {
        self.span = self.span.shifted(delta);
    }

    /// Copy with the same span and attachments, passing the text through `transform`.
    pub fn clone_with<F>(&self, transform: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            text: transform(&self.text),
            span: self.span,
            attachments: self.attachments.clone(),
        }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_span_follows_text() {
        let token = Token::new("world", 6);
        assert_eq!(token.begin(), 6);
        assert_eq!(token.end(), 11);
        assert_eq!(token.length(), 5);
    }

    #[test]
    fn test_explicit_span_may_disagree_with_text() {
        let token = Token::with_span("etc", Span::with_length(0, 4));
        assert_eq!(token.text().len(), 3);
        assert_eq!(token.length(), 4);
    }

    #[test]
    fn test_attachments() {
        let mut token = Token::new("Berlin", 0);
        assert!(token.attach("ner", Attachment::Tag("S-LOC".into())).is_none());
        token.attach("fasttext", Attachment::Vector(vec![0.5, -0.25]));

        assert_eq!(
            token.attachment("ner"),
            Some(&Attachment::Tag("S-LOC".into()))
        );
        let keys: Vec<_> = token.attachments().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["fasttext", "ner"]);

        assert!(token.detach("ner").is_some());
        assert!(token.attachment("ner").is_none());
    }

    #[test]
    fn test_clone_with_keeps_span() {
        let mut token = Token::new("Straße", 10);
        token.attach("pos", Attachment::Tag("NN".into()));
        let upper = token.clone_with(|t| t.to_uppercase());

        assert_eq!(upper.text(), "STRASSE");
        assert_eq!(upper.span(), token.span());
        assert!(upper.attachment("pos").is_some());
    }
}
