use layered_overlay::{RangeError, RangePolicy, Sentence, Spanned, Token};

use crate::Document;

/// Sentences at `[0,5)` and `[10,15)` with a gap between them.
fn gapped() -> Document {
    let mut doc = Document::new();
    doc.add_sentence(
        Sentence::from_tokens(vec![Token::new("Hello", 0)]),
        false,
    );
    doc.add_sentence(
        Sentence::from_tokens(vec![Token::new("World", 10)]),
        false,
    );
    doc
}

fn texts<'a>(sentences: impl Iterator<Item = &'a Sentence>) -> Vec<String> {
    sentences.map(Sentence::text).collect()
}

#[test]
fn sentence_index_in_gap_resolves_to_previous() {
    let doc = gapped();
    assert_eq!(doc.sentence_index_at_position(0), Some(0));
    assert_eq!(doc.sentence_index_at_position(7), Some(0));
    assert_eq!(doc.sentence_index_at_position(10), Some(1));
    assert_eq!(doc.sentence_index_at_position(500), Some(1));
}

#[test]
fn sentence_index_before_first_sentence() {
    let mut doc = Document::new();
    doc.add_sentence(Sentence::from_tokens(vec![Token::new("late", 3)]), false);
    assert_eq!(doc.sentence_index_at_position(1), None);
    assert_eq!(doc.sentence_index_at_position(3), Some(0));
}

#[test]
fn sentence_at_position_misses_gaps() {
    let doc = gapped();
    assert!(doc.sentence_at_position(7).is_none());
    assert!(doc.sentence_at_position(5).is_none());
    assert_eq!(doc.sentence_at_position(12).map(Sentence::text), Some("World".to_string()));
}

#[test]
fn sentences_in_range_policies() {
    let doc = gapped();
    assert_eq!(
        texts(doc.sentences_in_range(3, 12, RangePolicy::Overlapping)),
        vec!["Hello", "World"]
    );
    assert!(texts(doc.sentences_in_range(3, 12, RangePolicy::Enclosed)).is_empty());
    assert_eq!(
        texts(doc.sentences_in_range(0, 15, RangePolicy::Enclosed)),
        vec!["Hello", "World"]
    );
    assert_eq!(
        texts(doc.sentences_in_range(8, 15, RangePolicy::from_enclosed(true))),
        vec!["World"]
    );
}

#[test]
fn degenerate_window_only_matches_straddling_sentences() {
    let doc = gapped();
    assert_eq!(
        texts(doc.sentences_in_range(3, 3, RangePolicy::Overlapping)),
        vec!["Hello"]
    );
    // ending exactly at the window counts as straddling its end
    assert_eq!(
        texts(doc.sentences_in_range(5, 5, RangePolicy::Overlapping)),
        vec!["Hello"]
    );
    assert!(texts(doc.sentences_in_range(7, 7, RangePolicy::Overlapping)).is_empty());
}

#[test]
fn tokens_in_range_across_sentences() {
    let mut doc = Document::new();
    doc.add_sentence(
        Sentence::from_tokens(vec![Token::new("one", 0), Token::new("two", 4)]),
        false,
    );
    doc.add_sentence(
        Sentence::from_tokens(vec![Token::new("three", 8), Token::new("four", 14)]),
        false,
    );

    let overlapping: Vec<_> = doc
        .tokens_in_range(5, 10, RangePolicy::Overlapping)
        .map(Token::text)
        .collect();
    assert_eq!(overlapping, vec!["two", "three"]);

    let enclosed: Vec<_> = doc
        .tokens_in_range(4, 13, RangePolicy::Enclosed)
        .map(Token::text)
        .collect();
    assert_eq!(enclosed, vec!["two", "three"]);

    assert_eq!(doc.token(3).map(Token::text), Some("four"));
    assert_eq!(doc.token_count(), 4);
    assert!(doc.token(4).is_none());
}

#[test]
fn indexed_sentence_access_fails_out_of_bounds() {
    let doc = gapped();
    assert_eq!(doc.sentence(1).unwrap().begin(), 10);
    assert_eq!(
        doc.sentence(2).unwrap_err(),
        RangeError::IndexOutOfBounds { index: 2, len: 2 }
    );
}
