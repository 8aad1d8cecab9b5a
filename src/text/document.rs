use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// A single labeled instance parsed from one svmlight-style line.
///
/// Immutable once parsed; `features` maps each token to its raw count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    label: String,
    features: BTreeMap<String, u32>,
}

impl Document {
    pub fn new(label: impl Into<String>, features: BTreeMap<String, u32>) -> Self {
        Self {
            label: label.into(),
            features,
        }
    }

    /// Parses `<label> <token>:<count> <token>:<count> ...`.
    ///
    /// The token/count split happens at the last `:`, so tokens may themselves contain colons.
    /// A repeated token keeps the last count seen. `line_no` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the line is blank or a feature is not `name:count`.
    ///
    /// # Example
    ///
    /// ```
    /// use textknn::Document;
    ///
    /// let doc = Document::parse_line("cat f1:2 f2:1", 1).unwrap();
    /// assert_eq!(doc.label(), "cat");
    /// assert_eq!(doc.count("f1"), 2);
    /// assert_eq!(doc.count("f3"), 0);
    /// ```
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let label = fields
            .next()
            .ok_or_else(|| Error::malformed(line_no, "missing label"))?;

        let mut features = BTreeMap::new();
        for field in fields {
            let (token, count) = field.rsplit_once(':').ok_or_else(|| {
                Error::malformed(line_no, format!("feature `{field}` is not token:count"))
            })?;
            if token.is_empty() {
                return Err(Error::malformed(
                    line_no,
                    format!("feature `{field}` has an empty token"),
                ));
            }
            let count: u32 = count.parse().map_err(|_| {
                Error::malformed(
                    line_no,
                    format!("feature `{field}` has a non-integer count"),
                )
            })?;
            features.insert(token.to_string(), count);
        }

        Ok(Self::new(label, features))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn features(&self) -> &BTreeMap<String, u32> {
        &self.features
    }

    /// Count for `token`, zero when absent.
    pub fn count(&self, token: &str) -> u32 {
        self.features.get(token).copied().unwrap_or(0)
    }
}

/// An ordered collection of documents loaded from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Parses every line of `text` as a [`Document`], preserving order.
    ///
    /// A line that fails to parse, blank lines included, aborts the whole load. A final newline
    /// does not start an extra line.
    pub fn parse(text: &str) -> Result<Self> {
        let documents = text
            .lines()
            .enumerate()
            .map(|(i, line)| Document::parse_line(line, i + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { documents })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let corpus = Self::parse(&text)?;
        debug!(
            "loaded {} documents from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// True labels in document order.
    pub fn labels(&self) -> Vec<&str> {
        self.documents.iter().map(Document::label).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
