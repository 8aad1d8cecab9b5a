use std::collections::BTreeSet;

use super::document::Document;

/// The fixed, lexicographically ordered token set that defines vector coordinates.
///
/// Built once from the training documents and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<String>,
}

impl Vocabulary {
    /// Collects every distinct token of `documents`, sorted ascending.
    ///
    /// No thresholding or stopword removal is applied.
    ///
    /// # Example
    ///
    /// ```
    /// use textknn::{Corpus, Vocabulary};
    ///
    /// let train = Corpus::parse("cat f2:1 f1:2\ndog f2:3").unwrap();
    /// let vocab = Vocabulary::build(&train);
    /// assert_eq!(vocab.tokens(), ["f1", "f2"]);
    /// ```
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let tokens: BTreeSet<&str> = documents
            .into_iter()
            .flat_map(|doc| doc.features().keys().map(String::as_str))
            .collect();
        Self {
            tokens: tokens.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Coordinate of `token`, if it is part of the vocabulary.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens
            .binary_search_by(|probe| probe.as_str().cmp(token))
            .ok()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
