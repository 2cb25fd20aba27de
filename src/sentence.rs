//! Ordered token sequences whose range is derived from their tokens.

use serde::{Deserialize, Serialize};

use crate::{tokens_to_text, RangePolicy, Span, Spanned, Token};

/// An ordered sequence of tokens in reading order.
///
/// The sentence owns no text; [`Sentence::text`] reconstructs it from the
/// tokens. When built from tokens its range is `min(begin)..max(end)` over
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    span: Span,
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut sentence = Self::new();
        for token in tokens {
            sentence.add_token(token);
        }
        sentence
    }

    /// A sentence without tokens that still occupies `span`.
    pub fn with_span(span: Span) -> Self {
        Self {
            span,
            tokens: Vec::new(),
        }
    }

    /// Append a token, widening the range to cover it.
    pub fn add_token(&mut self, token: Token) {
        if self.tokens.is_empty() {
            self.span = token.span();
        } else {
            self.span = self.span.cover(&token.span());
        }
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Mutable token access for taggers. Token ranges cannot be changed through it.
    pub fn tokens_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.tokens.iter_mut()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens selected from `[begin, end]` by `policy`.
    pub fn tokens_in_range(
        &self,
        begin: usize,
        end: usize,
        policy: RangePolicy,
    ) -> impl Iterator<Item = &Token> {
        policy.select(&self.tokens, begin, end)
    }

    /// Offset-exact surface text of this sentence.
    pub fn text(&self) -> String {
        tokens_to_text(&self.tokens, self.span.begin())
    }

    /// Move the sentence so it starts at `begin`, carrying its tokens along.
    pub fn move_to(&mut self, begin: usize) {
        let old_begin = self.span.begin();
        for token in &mut self.tokens {
            let relative = token.begin().saturating_sub(old_begin);
            token.relocate(begin + relative);
        }
        self.span = self.span.moved_to(begin);
    }

    /// Shift the sentence and its tokens `delta` bytes to the right.
    pub fn shift(&mut self, delta: usize) {
        for token in &mut self.tokens {
            token.shift(delta);
        }
        self.span = self.span.shifted(delta);
    }

    /// Deep copy, passing every token text through `transform`.
    pub fn clone_with<F>(&self, transform: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            span: self.span,
            tokens: self
                .tokens
                .iter()
                .map(|token| token.clone_with(&transform))
                .collect(),
        }
    }
}

impl Spanned for Sentence {
    fn span(&self) -> Span {
        self.span
    }
}
