//! Span primitives for layered annotation overlays.
//!
//! Text is modelled as nested half-open ranges over one shared coordinate
//! space: documents contain sentences, sentences contain tokens. This crate
//! holds the leaf layers and the text reconstruction that regenerates a
//! surface string from tokens on demand. Documents, annotations and derived
//! views live in `layered-overlay-document`.
//!
//! ## Core Types
//!
//! - [`Span`] / [`Spanned`] - The `[begin, end)` range and the trait every layer implements
//! - [`Token`] - Leaf span with surface text and encoder/tagger [`Attachment`]s
//! - [`Sentence`] - Ordered tokens, range derived from its tokens
//! - [`RangePolicy`] - Enclosed vs. overlapping selection
//!
//! ## Example
//!
//! ```
//! use layered_overlay::{tokens_to_text, words_to_text, Sentence, Spanned, Token};
//!
//! let sentence = Sentence::from_tokens(vec![
//!     Token::new("Hello", 0),
//!     Token::new("world", 8),
//!     Token::new("!", 13),
//! ]);
//! assert_eq!(sentence.end(), 14);
//!
//! // offsets are honoured
//! assert_eq!(tokens_to_text(sentence.tokens(), 0), "Hello   world!");
//! // heuristic spacing ignores them
//! assert_eq!(words_to_text(sentence.tokens()), "Hello world!");
//! ```

mod error;
mod sentence;
mod span;
mod text;
mod token;

pub use error::RangeError;
pub use sentence::Sentence;
pub use span::{overlap_length, RangePolicy, Span, Spanned};
pub use text::{tokens_to_text, words_to_text, words_to_text_with, JoinRules};
pub use token::{Attachment, Token};
