use ndarray::{Array1, Array2};

use super::document::Document;
use super::vocabulary::Vocabulary;

/// Dense count vector for `doc`, aligned to `vocab`.
///
/// Entry `i` is the count of `vocab.tokens()[i]` in `doc`, or zero. Tokens of `doc` missing from
/// the vocabulary are dropped.
pub fn vectorize(doc: &Document, vocab: &Vocabulary) -> Array1<f64> {
    let mut vec = Array1::zeros(vocab.len());
    for (token, &count) in doc.features() {
        if let Some(i) = vocab.index_of(token) {
            vec[i] = f64::from(count);
        }
    }
    vec
}

/// Stacks the vectors of `documents` row by row, preserving document order.
///
/// # Example
///
/// ```
/// use textknn::{vectorize_all, Corpus, Vocabulary};
///
/// let train = Corpus::parse("cat f1:2 f2:1\ndog f2:3").unwrap();
/// let vocab = Vocabulary::build(&train);
/// let rows = vectorize_all(&train, &vocab);
/// assert_eq!(rows.row(1).to_vec(), vec![0.0, 3.0]);
/// ```
pub fn vectorize_all<'a, I>(documents: I, vocab: &Vocabulary) -> Array2<f64>
where
    I: IntoIterator<Item = &'a Document>,
{
    let rows: Vec<Array1<f64>> = documents
        .into_iter()
        .map(|doc| vectorize(doc, vocab))
        .collect();
    let mut matrix = Array2::zeros((rows.len(), vocab.len()));
    for (mut dst, src) in matrix.rows_mut().into_iter().zip(rows.iter()) {
        dst.assign(src);
    }
    matrix
}
