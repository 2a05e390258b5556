//! Normalized page/document model.
//!
//! Extraction backends emit one [`Word`] per token, one record set per page.
//! [`Page`] and [`Document`] wrap those record sets in source page order and
//! expose the reading-order text handed to downstream chunking. All of these
//! are built once during ingestion and read-only afterward.

use serde::{Deserialize, Serialize};

use crate::geometry::{combine, BBox, EmptyInputError};

/// One page's record set as emitted by a backend.
pub type PageRecords = Vec<Word>;

/// One extracted token with its geometry and grouping ids.
///
/// `block` and `line` come from the backend's layout grouping, `index_sort`
/// is the backend's emission order within the page (the default reading-order
/// tiebreak), and `confidence` is in `[0, 1]` with 1.0 meaning an
/// authoritative digital text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub x0: f64,
    pub y0: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(rename = "Text")]
    pub text: String,
    pub block: u32,
    pub page: u32,
    pub index_sort: u32,
    pub line: u32,
    pub confidence: f32,
}

impl Word {
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.y0, self.x2, self.y2)
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - ({}, {}, {}, {}) - {} - {} - {} - {}",
            self.text, self.x0, self.y0, self.x2, self.y2, self.block, self.page,
            self.index_sort, self.line
        )
    }
}

/// An ordered sequence of words, immutable once constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordList {
    word_list: Vec<Word>,
}

impl WordList {
    pub fn new(word_list: Vec<Word>) -> Self {
        Self { word_list }
    }

    pub fn words(&self) -> &[Word] {
        &self.word_list
    }

    /// Geometric union of all member boxes.
    ///
    /// Fails on a zero-word list; guard with [`WordList::is_empty`] first.
    pub fn bbox(&self) -> Result<BBox, EmptyInputError> {
        let boxes: Vec<BBox> = self.word_list.iter().map(Word::bbox).collect();
        combine(&boxes)
    }

    /// Tokens joined by single spaces, in stored order.
    pub fn text(&self) -> String {
        self.word_list
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.word_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.word_list.iter()
    }
}

/// One physical page's normalized records.
///
/// A page with zero rows is a valid "empty page" state, distinct from a
/// failed extraction (which never constructs a `Page` at all).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    words: WordList,
}

impl Page {
    pub fn from_records(records: PageRecords) -> Self {
        Self {
            words: WordList::new(records),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn text(&self) -> String {
        self.words.text()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// An ordered sequence of pages, one per physical page of the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Build a document from per-page record sets in backend emission order,
    /// which backends guarantee matches physical page order.
    pub fn from_records(records: Vec<PageRecords>) -> Self {
        Self {
            pages: records.into_iter().map(Page::from_records).collect(),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page holds any extracted text. Downstream consumers treat
    /// this as "nothing to index", not as an error.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Page::is_empty)
    }

    /// Full-document text: page texts joined by single spaces, in page order.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .map(Page::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, page: u32, index_sort: u32) -> Word {
        Word {
            x0: 10.0 * index_sort as f64,
            y0: 20.0,
            x2: 10.0 * index_sort as f64 + 8.0,
            y2: 32.0,
            text: text.to_string(),
            block: 0,
            page,
            index_sort,
            line: 0,
            confidence: 1.0,
        }
    }

    #[test]
    fn test_word_record_round_trip() {
        let original = word("invoice", 2, 7);
        let record = serde_json::to_value(&original).unwrap();
        // Literal column names of the backend schema.
        assert_eq!(record["Text"], "invoice");
        assert_eq!(record["index_sort"], 7);
        let restored: Word = serde_json::from_value(record).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_word_list_text_and_bbox() {
        let words = WordList::new(vec![word("alpha", 0, 0), word("beta", 0, 1)]);
        assert_eq!(words.text(), "alpha beta");
        let bbox = words.bbox().unwrap();
        assert_eq!(bbox.to_tuple(), (0.0, 20.0, 18.0, 32.0));
    }

    #[test]
    fn test_word_list_empty_bbox_fails() {
        let words = WordList::new(Vec::new());
        assert!(words.bbox().is_err());
    }

    #[test]
    fn test_empty_page_text_is_empty_string() {
        let page = Page::from_records(Vec::new());
        assert_eq!(page.text(), "");
        assert!(page.is_empty());
    }

    #[test]
    fn test_document_text_aggregation_round_trip() {
        let records = vec![
            vec![word("one", 0, 0), word("two", 0, 1)],
            vec![word("three", 1, 0)],
        ];
        let doc = Document::from_records(records.clone());

        let page_join = doc
            .pages()
            .iter()
            .map(Page::text)
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(doc.text(), page_join);

        let word_join = records
            .iter()
            .flatten()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(doc.text(), word_join);
    }

    #[test]
    fn test_document_with_empty_page_does_not_fail() {
        let doc = Document::from_records(vec![vec![word("only", 0, 0)], Vec::new()]);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[1].text(), "");
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::from_records(Vec::new());
        assert!(doc.is_empty());
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_document_serde_round_trip() {
        let doc = Document::from_records(vec![vec![word("persisted", 0, 0)]]);
        let json = serde_json::to_string(&doc).unwrap();
        let restored: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, doc);
    }
}
