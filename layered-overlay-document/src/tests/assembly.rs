use layered_overlay::{Sentence, Span, Spanned, Token};
use proptest::prelude::*;

use crate::{
    Annotation, AnnotationKind, AnnotationOverlay, Document, DocumentFactory, SegmentingFactory,
    Source,
};

fn sentence(words: &[(&str, usize)]) -> Sentence {
    Sentence::from_tokens(words.iter().map(|(w, b)| Token::new(*w, *b)).collect())
}

fn assert_range_invariant(doc: &Document) {
    match (
        doc.sentences().iter().map(Spanned::begin).min(),
        doc.sentences().iter().map(Spanned::end).max(),
    ) {
        (Some(begin), Some(end)) => {
            assert_eq!(doc.begin(), begin, "document begin");
            assert_eq!(doc.end(), end, "document end");
        }
        _ => assert_eq!(doc.begin(), 0),
    }
}

#[test]
fn add_sentence_with_adjusted_offsets() {
    let mut doc = Document::new();
    // original offsets are ignored
    doc.add_sentence(sentence(&[("Hello", 40), ("there", 46)]), true);
    doc.add_sentence(sentence(&[("Bye", 3), ("!", 6)]), true);

    assert_eq!(doc.sentence(0).unwrap().span(), Span::new(0, 11).unwrap());
    assert_eq!(doc.sentence(1).unwrap().span(), Span::new(12, 16).unwrap());
    assert_eq!(doc.text(), "Hello there Bye!");
    assert_range_invariant(&doc);
}

#[test]
fn add_sentence_keeping_offsets_only_widens() {
    let mut doc = Document::new();
    doc.add_sentence(sentence(&[("late", 20)]), false);
    assert_eq!(doc.span(), Span::new(20, 24).unwrap());
    doc.add_sentence(sentence(&[("early", 2)]), false);
    assert_eq!(doc.span(), Span::new(2, 24).unwrap());
    doc.add_sentence(sentence(&[("inside", 10)]), false);
    assert_eq!(doc.span(), Span::new(2, 24).unwrap());
    assert_range_invariant(&doc);
}

#[test]
fn append_inserts_separator_and_moves_annotations() {
    let factory = SegmentingFactory::default();
    let mut a = factory.from_text("Alice met Bob.").unwrap();
    let mut b = factory.from_text("Bob left.").unwrap();
    b.set_tag_available(Source::Gold, "NamedEntity", true);
    b.add_annotation(Annotation::new(
        AnnotationKind::Mention,
        Source::Gold,
        Span::new(4, 8).unwrap(),
    ));

    a.append(b);

    assert_eq!(a.text(), "Alice met Bob. Bob left.");
    assert_eq!(a.sentence_count(), 2);
    assert_range_invariant(&a);

    let moved = &a.annotations()[0];
    assert_eq!(moved.span(), Span::new(19, 23).unwrap());
    assert_eq!(moved.document_ref(), Some(a.handle()));
    assert_eq!(a.text_of(moved).unwrap(), "left");
    assert!(a.is_tag_available(Source::Gold, "NamedEntity"));
}

#[test]
fn append_after_trailing_newline_adds_no_separator() {
    let factory = SegmentingFactory::default();
    let mut a = factory.from_text("Line one.\n").unwrap();
    let b = factory.from_text("Two.").unwrap();
    a.append(b);
    assert_eq!(a.text(), "Line one.\nTwo.");
    assert_range_invariant(&a);
}

#[test]
fn append_into_empty_document() {
    let mut doc = Document::new();
    let mut other = Document::new();
    other.add_sentence(sentence(&[("far", 30), ("away", 34)]), false);
    doc.append(other);
    assert_eq!(doc.span(), Span::new(30, 38).unwrap());
    assert_eq!(doc.text(), "far away");
    assert_range_invariant(&doc);
}

#[test]
fn clone_tree_copies_sentences_not_annotations() {
    let mut doc = SegmentingFactory::default()
        .from_text("Berlin is big.")
        .unwrap();
    doc.set_id("doc-1");
    doc.set_source(serde_json::json!("wiki"));
    doc.add_annotation(Annotation::new(
        AnnotationKind::NamedEntity,
        Source::Gold,
        Span::new(0, 6).unwrap(),
    ));

    let copy = doc.clone_tree();
    assert_eq!(copy.text(), doc.text());
    assert_eq!(copy.id(), Some("doc-1"));
    assert_eq!(copy.source(), doc.source());
    assert_eq!(copy.span(), doc.span());
    assert_eq!(copy.annotation_count(), 0);
    assert_ne!(copy.handle(), doc.handle());

    let shouting = doc.clone_tree_with(|text| text.to_uppercase());
    assert_eq!(shouting.text(), "BERLIN IS BIG.");
    // the source tree is untouched
    assert_eq!(doc.text(), "Berlin is big.");
}

#[test]
fn clone_tree_with_reconciles_changed_lengths() {
    let doc = SegmentingFactory::default().from_text("Straße ok").unwrap();
    // the grown word is cut back at a char boundary and padded
    let grown = doc.clone_tree_with(|text| text.replace('a', "aä"));
    assert_eq!(grown.text(), "Straä  ok");
    assert_eq!(grown.text().len(), doc.text().len());
}

#[test]
fn set_text_replaces_tree_and_keeps_annotations() {
    let factory = SegmentingFactory::default();
    let mut doc = factory.from_text("Old text here. And more.").unwrap();
    doc.add_annotation(Annotation::new(
        AnnotationKind::Passage,
        Source::User,
        Span::new(0, 3).unwrap(),
    ));

    doc.set_text("New.", &factory).unwrap();

    assert_eq!(doc.text(), "New.");
    assert_eq!(doc.sentence_count(), 1);
    assert_eq!(doc.span(), Span::new(0, 4).unwrap());
    assert_eq!(doc.annotation_count(), 1);
}

#[test]
fn add_to_document_from_text_appends() {
    let factory = SegmentingFactory::default();
    let mut doc = factory.from_text("First.").unwrap();
    factory
        .add_to_document_from_text("Second one.", &mut doc)
        .unwrap();
    assert_eq!(doc.text(), "First. Second one.");
    assert_eq!(doc.sentence_count(), 2);
    assert_range_invariant(&doc);
}

fn sentence_text() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,8}", 1..10).prop_map(|words| words.join(" ") + ".")
}

proptest! {
    #[test]
    fn prop_factory_round_trip(sentences in proptest::collection::vec(sentence_text(), 1..5)) {
        let text = sentences.join(" ");
        let doc = SegmentingFactory::default().from_text(&text).unwrap();
        prop_assert_eq!(doc.text(), text);
        assert_range_invariant(&doc);
    }

    #[test]
    fn prop_append_concatenates(left in sentence_text(), right in sentence_text()) {
        let factory = SegmentingFactory::default();
        let mut doc = factory.from_text(&left).unwrap();
        let count = doc.sentence_count();
        doc.append(factory.from_text(&right).unwrap());
        prop_assert_eq!(doc.text(), format!("{} {}", left, right));
        prop_assert_eq!(doc.sentence_count(), count + 1);
        assert_range_invariant(&doc);
    }

    #[test]
    fn prop_overlay_survives_append(left in sentence_text(), right in sentence_text()) {
        let factory = SegmentingFactory::default();
        let mut doc = factory.from_text(&left).unwrap();
        let mut other = factory.from_text(&right).unwrap();
        let first_word = other.token(0).unwrap().span();
        let expected = other.text_at(first_word).unwrap();
        other.add_annotation(Annotation::new(AnnotationKind::Mention, Source::Pred, first_word));

        doc.append(other);

        let moved = doc.annotations_by_source(Source::Pred).next().unwrap();
        prop_assert_eq!(doc.text_of(moved).unwrap(), expected);
    }
}
