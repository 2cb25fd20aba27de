//! Stable, enumerable record form of a [`Document`] for serialization.

use std::collections::{BTreeMap, BTreeSet};

use layered_overlay::{Sentence, Span, Spanned};
use serde::{Deserialize, Serialize};

use crate::{Annotation, Document, OverlayResult, Source, TitleAbstract};

/// Everything a document holds except its handle and opaque provenance.
///
/// Annotation identities are not persisted; reading a record assigns fresh
/// ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleAbstract>,
    pub span: Span,
    pub sentences: Vec<Sentence>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub assigned_tags: BTreeMap<Source, BTreeSet<String>>,
}

impl From<&Document> for DocumentRecord {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id().map(str::to_string),
            language: document.language().map(str::to_string),
            doc_type: document.doc_type().map(str::to_string),
            title: document.title_abstract().cloned(),
            span: document.span(),
            sentences: document.sentences().to_vec(),
            annotations: document.annotations().to_vec(),
            assigned_tags: document.assigned_tags().clone(),
        }
    }
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        let mut document = Document::from_parts(
            record.span,
            record.sentences,
            record.annotations,
            record.assigned_tags,
        );
        document.set_metadata(record.id, record.language, record.doc_type, record.title);
        document
    }
}

impl DocumentRecord {
    /// Serialize to a RON string.
    pub fn to_ron_string(&self) -> OverlayResult<String> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(6)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from a RON string.
    pub fn from_ron_string(s: &str) -> OverlayResult<Self> {
        Ok(ron::from_str(s)?)
    }
}

impl Document {
    pub fn to_record(&self) -> DocumentRecord {
        DocumentRecord::from(self)
    }

    pub fn to_ron_string(&self) -> OverlayResult<String> {
        self.to_record().to_ron_string()
    }

    pub fn from_ron_string(s: &str) -> OverlayResult<Self> {
        DocumentRecord::from_ron_string(s).map(Document::from)
    }
}
