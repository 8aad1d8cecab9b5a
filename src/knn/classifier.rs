use log::{info, warn};

use super::distance::{DistanceMatrix, Metric};
use super::evaluate::{evaluate, Evaluation};
use crate::error::{Error, Result};
use crate::text::{vectorize_all, Corpus, Vocabulary};

/// Configuration options for a k-NN classification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnConfig {
    /// Number of neighbors that vote.
    pub k: usize,
    /// Distance used to rank neighbors.
    pub metric: Metric,
}

impl KnnConfig {
    pub fn new(k: usize, metric: Metric) -> Self {
        Self { k, metric }
    }

    /// Customize the number of neighbors.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Customize the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Checks `1 <= k <= train_len`.
    pub fn validate(&self, train_len: usize) -> Result<()> {
        if self.k == 0 || self.k > train_len {
            return Err(Error::InvalidK {
                k: self.k,
                train_len,
            });
        }
        Ok(())
    }
}

/// Everything produced by one pass of the pipeline.
#[derive(Debug, Clone)]
pub struct ClassificationRun {
    pub config: KnnConfig,
    pub vocabulary: Vocabulary,
    /// Distances over the training vectors followed by the test vectors.
    pub distances: DistanceMatrix,
    /// Self-evaluation on the training set; a document may vote for itself.
    pub train: Evaluation,
    pub test: Evaluation,
}

/// A k-NN classifier over bag-of-words documents.
///
/// The vocabulary comes from the training set only; test tokens outside it are ignored.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    config: KnnConfig,
}

impl KnnClassifier {
    pub fn new(config: KnnConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KnnConfig {
        &self.config
    }

    /// Runs vocabulary extraction, vectorization, the distance matrix, and both evaluations.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyTrainingSet`] if `train` has no documents.
    /// - [`Error::InvalidK`] if `k` is outside `1..=train.len()`; checked before any work.
    /// - [`Error::UnknownLabel`] if a test document's label never occurs in training.
    ///
    /// # Example
    ///
    /// ```
    /// use textknn::{Corpus, KnnClassifier, KnnConfig, Metric};
    ///
    /// let train = Corpus::parse("cat f1:2 f2:1\ndog f2:3").unwrap();
    /// let test = Corpus::parse("cat f1:1").unwrap();
    ///
    /// let knn = KnnClassifier::new(KnnConfig::new(1, Metric::Euclidean));
    /// let run = knn.run(&train, &test).unwrap();
    /// assert_eq!(run.test.predictions[0].predicted(), "cat");
    /// assert_eq!(run.test.accuracy(), 1.0);
    /// ```
    pub fn run(&self, train: &Corpus, test: &Corpus) -> Result<ClassificationRun> {
        let KnnConfig { k, metric } = self.config;
        if train.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        self.config.validate(train.len())?;

        let vocabulary = Vocabulary::build(train);
        info!(
            "vocabulary of {} tokens from {} training documents",
            vocabulary.len(),
            train.len()
        );

        let vectors = vectorize_all(train.iter().chain(test.iter()), &vocabulary);
        if metric == Metric::Cosine {
            let empty = vectors
                .rows()
                .into_iter()
                .filter(|row| row.iter().all(|&x| x == 0.0))
                .count();
            if empty > 0 {
                warn!("{empty} documents have all-zero vectors; their cosine distances are maximal");
            }
        }

        let distances = DistanceMatrix::compute(&vectors, &metric);
        let ranked = distances.ranked_neighbors(train.len());
        let (train_ranked, test_ranked) = ranked.split_at(train.len());
        info!(
            "ranked {} documents against {} training candidates using {metric} distance",
            ranked.len(),
            train.len()
        );

        let train_labels = train.labels();
        let train_eval = evaluate(&train_labels, &train_labels, train_ranked, k)?;
        let test_eval = evaluate(&test.labels(), &train_labels, test_ranked, k)?;
        info!(
            "training accuracy {:.4}, test accuracy {:.4}",
            train_eval.accuracy(),
            test_eval.accuracy()
        );

        Ok(ClassificationRun {
            config: self.config,
            vocabulary,
            distances,
            train: train_eval,
            test: test_eval,
        })
    }
}
