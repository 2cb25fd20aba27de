use layered_overlay::Span;

use crate::{
    Annotation, AnnotationKind, AnnotationOverlay, Document, DocumentFactory, OverlayError, Query,
    SegmentingFactory, Source,
};

fn relevance(source: Source, begin: usize, end: usize, confidence: f64) -> Annotation {
    Annotation::new(AnnotationKind::Relevance, source, Span::new(begin, end).unwrap())
        .with_confidence(confidence)
}

fn corpus(text: &str) -> Document {
    SegmentingFactory::default().from_text(text).unwrap()
}

#[test]
fn results_rank_by_descending_relevance() {
    let doc = corpus("Paris is the capital of France.");
    let mut query = Query::new();
    for confidence in [0.2, 0.9, 0.5] {
        query.add_result(&doc, relevance(Source::Pred, 0, 5, confidence));
    }
    let ranked: Vec<f64> = query.results().map(|r| r.relevance()).collect();
    assert_eq!(ranked, vec![0.9, 0.5, 0.2]);
}

#[test]
fn raw_scores_rank_unchanged() {
    let doc = corpus("Paris is the capital of France.");
    let mut query = Query::new();
    for confidence in [3.5, 7.25, -0.2, -0.8] {
        query.add_result(&doc, relevance(Source::Pred, 0, 5, confidence));
    }
    let ranked: Vec<f64> = query.results().map(|r| r.relevance()).collect();
    assert_eq!(ranked, vec![7.25, 3.5, -0.2, -0.8]);
}

#[test]
fn nan_relevance_ranks_last() {
    let doc = corpus("Paris is the capital of France.");
    let mut query = Query::new();
    query.add_result(&doc, relevance(Source::Pred, 0, 5, f64::NAN));
    query.add_result(&doc, relevance(Source::Pred, 0, 5, 0.9));
    query.add_result(&doc, relevance(Source::Pred, 0, 5, -f64::NAN));

    let ranked: Vec<f64> = query.results().map(|r| r.relevance()).collect();
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0], 0.9);
    assert!(ranked[1..].iter().all(|r| r.is_nan()));
}

#[test]
fn ties_are_kept_and_ordered_deterministically() {
    let first = corpus("One.");
    let second = corpus("Two.");
    let mut query = Query::new();
    query.add_result(&second, relevance(Source::Pred, 0, 3, 0.5));
    query.add_result(&first, relevance(Source::Pred, 0, 3, 0.5));
    query.add_result(&first, relevance(Source::Gold, 0, 3, 0.5));

    assert_eq!(query.result_count(), 3);
    let handles: Vec<_> = query.results().map(|r| r.document().handle()).collect();
    // document handles are allocated in creation order
    assert_eq!(handles, vec![first.handle(), first.handle(), second.handle()]);
}

#[test]
fn identical_result_is_deduplicated() {
    let doc = corpus("Same hit twice.");
    let hit = relevance(Source::Pred, 0, 4, 0.7);
    let mut query = Query::new();
    assert!(query.add_result(&doc, hit.clone()));
    assert!(!query.add_result(&doc, hit));
    assert_eq!(query.result_count(), 1);
}

#[test]
fn add_result_repoints_annotation() {
    let doc = corpus("Target text.");
    let mut query = Query::new();
    query.add_result(&doc, relevance(Source::Gold, 0, 6, 1.0));
    let result = query.results().next().unwrap();
    assert_eq!(result.annotation().document_ref(), Some(doc.handle()));
    assert_eq!(result.document().text_of(result.annotation()).unwrap(), "Target");
}

#[test]
fn results_by_source() {
    let doc = corpus("Gold and predicted hits.");
    let mut query = Query::new();
    query.add_result(&doc, relevance(Source::Gold, 0, 4, 1.0));
    query.add_result(&doc, relevance(Source::Pred, 0, 4, 0.3));
    query.add_result(&doc, relevance(Source::Pred, 9, 18, 0.8));

    let pred: Vec<f64> = query
        .results_by_source(Source::Pred)
        .map(|r| r.relevance())
        .collect();
    assert_eq!(pred, vec![0.8, 0.3]);
    assert_eq!(query.results_by_source(Source::Silver).count(), 0);
}

#[test]
fn result_matching() {
    let doc = corpus("Shared document.");
    let other = corpus("Other document.");
    let mut query = Query::new();
    query.add_result(&doc, relevance(Source::Gold, 0, 6, 1.0));
    query.add_result(&doc, relevance(Source::Pred, 0, 6, 0.4));
    query.add_result(&other, relevance(Source::Pred, 0, 5, 0.2));
    query.add_result(&doc, relevance(Source::Pred, 7, 15, 0.1));

    let results: Vec<_> = query.results().collect();
    let gold = results[0];
    assert!(gold.matches(results[1]));
    // different document
    assert!(!gold.matches(results[2]));
    // different range
    assert!(!gold.matches(results[3]));
}

#[test]
fn single_annotation_accessor() {
    let mut query = Query::from_text("where is paris", &SegmentingFactory::default()).unwrap();
    assert_eq!(query.text(), "where is paris");
    assert!(matches!(
        query.annotation(AnnotationKind::Relevance),
        Err(OverlayError::EmptyResult {
            kind: AnnotationKind::Relevance
        })
    ));

    query.add_annotation(relevance(Source::User, 9, 14, 1.0));
    let found = query.annotation(AnnotationKind::Relevance).unwrap();
    assert_eq!(query.text_of(found).unwrap(), "paris");
    assert_eq!(query.count_by_source(Source::User), 1);
}
