//! Regenerating surface text from a token sequence.
//!
//! Two independent algorithms:
//!
//! - [`words_to_text`] joins token texts with rule-based spacing and ignores
//!   offsets entirely. Use it for freshly assembled tokens without reliable
//!   positions.
//! - [`tokens_to_text`] walks stored offsets and reproduces the original
//!   spacing. The output always has exactly as many bytes as the offsets
//!   describe, even when a token's text and its stored length disagree.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Spanned, Token};

/// Spacing rules for [`words_to_text_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinRules {
    /// Token texts that attach to the previous token (closing punctuation, clitics)
    pub skip_space_before: BTreeSet<String>,
    /// Token texts after which the next token attaches (opening brackets, newline)
    pub skip_space_after: BTreeSet<String>,
}

impl Default for JoinRules {
    fn default() -> Self {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            skip_space_before: set(&[
                ",", ".", ":", ";", "?", "!", ")", "]", "'m", "'s", "'re", "'ve", "'d", "'ll",
                "n't",
            ]),
            skip_space_after: set(&["(", "[", "", "\n"]),
        }
    }
}

impl JoinRules {
    /// Whether a space goes between `previous` and `next`.
    pub fn space_between(&self, previous: &str, next: &str) -> bool {
        !self.skip_space_after.contains(previous) && !self.skip_space_before.contains(next)
    }
}

static DEFAULT_RULES: Lazy<JoinRules> = Lazy::new(JoinRules::default);

/// Join token texts with the default spacing rules.
pub fn words_to_text<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a Token>,
{
    words_to_text_with(tokens, &DEFAULT_RULES)
}

/// Join token texts, inserting a single space unless `rules` say otherwise.
/// The result is trimmed.
pub fn words_to_text_with<'a, I>(tokens: I, rules: &JoinRules) -> String
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut out = String::new();
    let mut last = "";
    for token in tokens {
        let word = token.text();
        if rules.space_between(last, word) {
            out.push(' ');
        }
        out.push_str(word);
        last = word;
    }
    out.trim().to_string()
}

/// Rebuild text from token offsets, starting the cursor at `begin`.
///
/// Gaps between tokens are filled with spaces. Each token contributes exactly
/// `token.length()` bytes: longer texts are truncated (at the nearest
/// preceding char boundary), shorter ones are padded with spaces. If offsets
/// run backwards, a single space is emitted and the cursor resets to the
/// token's begin.
pub fn tokens_to_text<'a, I>(tokens: I, begin: usize) -> String
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut out = String::new();
    let mut cursor = begin;
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if cursor > token.begin() {
            warn!(
                cursor,
                token_begin = token.begin(),
                "token offsets run backwards, resetting cursor"
            );
            out.push(' ');
            cursor = token.begin();
        }
        pad(&mut out, token.begin() - cursor);

        let word = token.text();
        let length = token.length();
        let cut = floor_char_boundary(word, length);
        out.push_str(&word[..cut]);
        pad(&mut out, length - cut);

        cursor = token.end();
    }
    out
}

fn pad(out: &mut String, count: usize) {
    out.extend(std::iter::repeat(' ').take(count));
}

/// Largest char boundary in `text` that is `<= index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    (0..=index)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}
