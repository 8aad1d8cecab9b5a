use std::collections::BTreeSet;

use log::debug;
use ndarray::Array2;

use super::vote::VoteTally;
use crate::error::{Error, Result};

/// True-label by predicted-label counts over a fixed, sorted label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    /// An all-zero matrix over the distinct values of `labels`.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        let n = labels.len();
        Self {
            labels: labels.into_iter().collect(),
            counts: Array2::zeros((n, n)),
        }
    }

    fn index(&self, label: &str) -> Result<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .map_err(|_| Error::UnknownLabel(label.to_string()))
    }

    /// Increments cell `(truth, predicted)`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownLabel`] if either label is outside the matrix's label set.
    pub fn record(&mut self, truth: &str, predicted: &str) -> Result<()> {
        let row = self.index(truth)?;
        let col = self.index(predicted)?;
        self.counts[[row, col]] += 1;
        Ok(())
    }

    /// Count for `(truth, predicted)`, zero for labels outside the matrix.
    pub fn get(&self, truth: &str, predicted: &str) -> usize {
        match (self.index(truth), self.index(predicted)) {
            (Ok(row), Ok(col)) => self.counts[[row, col]],
            _ => 0,
        }
    }

    /// Row/column labels in ascending order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Sum of all cells, i.e. documents recorded.
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Trace of the matrix.
    pub fn correct(&self) -> usize {
        self.counts.diag().sum()
    }

    /// `correct / total`, or `0.0` when nothing was recorded.
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }
}

/// A document's true label and the vote among its neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub truth: String,
    pub tally: VoteTally,
}

impl Prediction {
    pub fn predicted(&self) -> &str {
        self.tally.winner()
    }

    pub fn is_correct(&self) -> bool {
        self.truth == self.predicted()
    }
}

/// Per-document predictions of one pass together with their confusion matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub predictions: Vec<Prediction>,
    pub confusion: ConfusionMatrix,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        self.confusion.accuracy()
    }
}

/// Classifies every document of one set and accumulates a fresh confusion matrix.
///
/// `truths[i]` is the true label of the document whose ranked training neighbors are
/// `ranked[i]`. The matrix is keyed over the distinct `train_labels`.
///
/// # Errors
///
/// - [`Error::InvalidK`] if `k` is outside `1..=train_labels.len()`.
/// - [`Error::UnknownLabel`] if a true label never occurs in training.
/// - [`Error::LengthMismatch`] unless there is one ranked list per document.
pub fn evaluate<T, S>(
    truths: &[T],
    train_labels: &[S],
    ranked: &[Vec<usize>],
    k: usize,
) -> Result<Evaluation>
where
    T: AsRef<str>,
    S: AsRef<str>,
{
    if truths.len() != ranked.len() {
        return Err(Error::LengthMismatch {
            documents: truths.len(),
            rankings: ranked.len(),
        });
    }

    let mut confusion = ConfusionMatrix::new(train_labels);
    let mut predictions = Vec::with_capacity(truths.len());
    for (truth, neighbors) in truths.iter().zip(ranked) {
        let tally = VoteTally::from_neighbors(neighbors, train_labels, k)?;
        confusion.record(truth.as_ref(), tally.winner())?;
        predictions.push(Prediction {
            truth: truth.as_ref().to_string(),
            tally,
        });
    }
    debug!(
        "evaluated {} documents: {}/{} correct",
        predictions.len(),
        confusion.correct(),
        confusion.total()
    );

    Ok(Evaluation {
        predictions,
        confusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRAIN: [&str; 4] = ["spam", "ham", "spam", "ham"];

    #[test]
    fn test_confusion_matrix_bookkeeping() {
        let mut cm = ConfusionMatrix::new(["b", "a", "b", "c"]);
        assert_eq!(cm.labels(), ["a", "b", "c"]);
        assert_eq!(cm.total(), 0);
        assert_eq!(cm.accuracy(), 0.0);

        cm.record("a", "a").unwrap();
        cm.record("a", "b").unwrap();
        cm.record("c", "c").unwrap();
        assert_eq!(cm.get("a", "b"), 1);
        assert_eq!(cm.get("b", "a"), 0);
        assert_eq!(cm.counts().dim(), (3, 3));
        assert_eq!(cm.counts()[[0, 0]], 1);
        assert_eq!(cm.counts()[[0, 1]], 1);
        assert_eq!(cm.counts()[[2, 2]], 1);
        assert_eq!(cm.total(), 3);
        assert_eq!(cm.correct(), 2);
        assert_relative_eq!(cm.accuracy(), 2.0 / 3.0);

        assert!(matches!(cm.record("z", "a"), Err(Error::UnknownLabel(l)) if l == "z"));
        assert_eq!(cm.total(), 3);
    }

    #[test]
    fn test_evaluate_counts_every_document() {
        let truths = ["spam", "ham", "ham"];
        let ranked = vec![vec![0, 1, 2, 3], vec![1, 3, 0, 2], vec![2, 0, 1, 3]];
        let eval = evaluate(&truths, &TRAIN, &ranked, 1).unwrap();

        assert_eq!(eval.predictions.len(), 3);
        assert_eq!(eval.confusion.total(), truths.len());
        assert_eq!(eval.confusion.get("spam", "spam"), 1);
        assert_eq!(eval.confusion.get("ham", "ham"), 1);
        assert_eq!(eval.confusion.get("ham", "spam"), 1);
        assert!(!eval.predictions[2].is_correct());
        assert_relative_eq!(eval.accuracy(), 2.0 / 3.0);
    }

    #[test]
    fn test_perfect_accuracy_iff_all_correct() {
        let truths = ["spam", "ham"];
        let ranked = vec![vec![0, 2, 1, 3], vec![1, 3, 0, 2]];
        let eval = evaluate(&truths, &TRAIN, &ranked, 2).unwrap();
        assert!(eval.predictions.iter().all(Prediction::is_correct));
        assert_eq!(eval.accuracy(), 1.0);

        let eval = evaluate(&truths, &TRAIN, &ranked, 4).unwrap();
        // 2-2 tie: first neighbor decides
        assert_eq!(eval.predictions[0].predicted(), "spam");
        assert_eq!(eval.predictions[1].predicted(), "ham");
    }

    #[test]
    fn test_unknown_truth_label_fails() {
        let truths = ["eggs"];
        let ranked = vec![vec![0, 1, 2, 3]];
        assert!(matches!(
            evaluate(&truths, &TRAIN, &ranked, 1),
            Err(Error::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_invalid_k_fails() {
        let truths = ["spam"];
        let ranked = vec![vec![0, 1, 2, 3]];
        assert!(matches!(
            evaluate(&truths, &TRAIN, &ranked, 5),
            Err(Error::InvalidK { k: 5, train_len: 4 })
        ));
    }

    #[test]
    fn test_mismatched_rankings_fail() {
        let truths = ["spam", "ham"];
        let ranked = vec![vec![0, 1, 2, 3]];
        assert!(matches!(
            evaluate(&truths, &TRAIN, &ranked, 1),
            Err(Error::LengthMismatch {
                documents: 2,
                rankings: 1
            })
        ));
        assert!(matches!(
            evaluate::<&str, &str>(&[], &TRAIN, &ranked, 1),
            Err(Error::LengthMismatch {
                documents: 0,
                rankings: 1
            })
        ));
    }
}
