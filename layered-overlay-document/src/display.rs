//! Underlined rendering of a document and its annotations, for inspection and snapshots.

use std::fmt::Write;

use layered_overlay::Spanned;
use unicode_width::UnicodeWidthStr;

use crate::{Annotation, AnnotationFilter, AnnotationOverlay, Document};

/// Line breaks in the first row are drawn with this single-width symbol.
const NEWLINE_SYMBOL: &str = "↵";

/// Renders a document's text with the selected annotations underlined.
///
/// ```text
/// Alice met Bob.
/// ╰───╯GOLD NamedEntity[PER](1.00)
///           ╰─╯PRED Mention(0.75)
/// ```
pub struct DocumentDisplay<'a> {
    document: &'a Document,
    include_annotations: Vec<&'a Annotation>,
}

impl<'a> std::fmt::Display for DocumentDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.document.text();
        let opening_line = text.replace('\n', NEWLINE_SYMBOL);
        f.write_str(&opening_line)?;

        for annotation in self.include_annotations.iter() {
            f.write_char('\n')?;

            let start_char_idx = self.display_column(&text, annotation.begin());
            let end_char_idx = self.display_column(&text, annotation.end());
            for _ in 0..start_char_idx {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;

            let char_len = end_char_idx.saturating_sub(start_char_idx);
            for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                f.write_char('─')?;
            }

            if char_len > 1 {
                f.write_char('╯')?;
            }

            write!(f, "{} {}", annotation.source(), annotation.kind())?;
            if let Some(label) = annotation.label() {
                write!(f, "[{}]", label)?;
            }
            write!(f, "({:.2})", annotation.confidence())?;
        }

        Ok(())
    }
}

impl<'a> DocumentDisplay<'a> {
    pub fn new(document: &'a Document) -> Self {
        DocumentDisplay {
            document,
            include_annotations: Vec::new(),
        }
    }

    /// Underline every annotation accepted by `filter`, in insertion order.
    pub fn include(mut self, filter: AnnotationFilter) -> Self {
        let document = self.document;
        self.include_annotations
            .extend(document.annotations_matching(filter));
        self
    }

    pub fn include_all(self) -> Self {
        self.include(AnnotationFilter::any())
    }

    // Terminal column of a document offset in the rendered first row.
    fn display_column(&self, text: &str, offset: usize) -> usize {
        let mut relative = offset
            .saturating_sub(self.document.begin())
            .min(text.len());
        while !text.is_char_boundary(relative) {
            relative -= 1;
        }
        UnicodeWidthStr::width(&text[..relative].replace('\n', NEWLINE_SYMBOL)[..])
    }
}
