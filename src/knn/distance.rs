use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::{Array2, ArrayView1};

use crate::error::{Error, Result};

/// Cosine distance assigned when either vector has zero norm.
///
/// This is the upper bound of cosine distance, so documents with no vocabulary tokens rank
/// after every other candidate.
pub const DEGENERATE_COSINE_DISTANCE: f64 = 2.0;

/// A dissimilarity between two equally sized vectors.
pub trait Distance {
    /// Compute the distance between `x` and `y`. Must be symmetric and non-negative.
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;
}

/// Standard L2 norm of the difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Distance for Euclidean {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        x.iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// `1 - cos(x, y)`, falling back to [`DEGENERATE_COSINE_DISTANCE`] for zero-norm input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl Distance for Cosine {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let norm_x = x.dot(&x).sqrt();
        let norm_y = y.dot(&y).sqrt();
        if norm_x == 0.0 || norm_y == 0.0 {
            return DEGENERATE_COSINE_DISTANCE;
        }
        (1.0 - x.dot(&y) / (norm_x * norm_y)).clamp(0.0, 2.0)
    }
}

/// Selectable metric, parsed from the command-line selector (`1` or `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Euclidean,
    Cosine,
}

impl Metric {
    /// Resolves the numeric selector used on the command line.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMetric`] for anything other than `1` or `2`.
    pub fn from_selector(selector: &str) -> Result<Self> {
        match selector.trim() {
            "1" => Ok(Metric::Euclidean),
            "2" => Ok(Metric::Cosine),
            other => Err(Error::InvalidMetric(other.to_string())),
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            Metric::Euclidean => 1,
            Metric::Cosine => 2,
        }
    }
}

impl Distance for Metric {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        match self {
            Metric::Euclidean => Euclidean.compute(x, y),
            Metric::Cosine => Cosine.compute(x, y),
        }
    }
}

impl TryFrom<u8> for Metric {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Metric::Euclidean),
            2 => Ok(Metric::Cosine),
            other => Err(Error::InvalidMetric(other.to_string())),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    /// Accepts the numeric selector or the metric name.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "cosine" => Ok(Metric::Cosine),
            _ => Metric::from_selector(s),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Euclidean => write!(f, "euclidean"),
            Metric::Cosine => write!(f, "cosine"),
        }
    }
}

/// Square, symmetric matrix of pairwise distances over the stacked train-then-test vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dist: Array2<f64>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances between the rows of `vectors`.
    ///
    /// Each unordered pair is evaluated once and mirrored, so the result is exactly symmetric.
    /// The diagonal is always zero.
    ///
    /// # Example
    ///
    /// ```
    /// use ndarray::array;
    /// use textknn::{DistanceMatrix, Metric};
    ///
    /// let vectors = array![[2.0, 1.0], [0.0, 3.0], [1.0, 0.0]];
    /// let matrix = DistanceMatrix::compute(&vectors, &Metric::Euclidean);
    /// assert_eq!(matrix.get(2, 0), 2.0_f64.sqrt());
    /// assert_eq!(matrix.ranked_neighbors(2)[2], vec![0, 1]);
    /// ```
    pub fn compute<D: Distance + ?Sized>(vectors: &Array2<f64>, metric: &D) -> Self {
        let n = vectors.nrows();
        let mut dist = Array2::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.compute(vectors.row(i), vectors.row(j));
                dist[[i, j]] = d;
                dist[[j, i]] = d;
            }
        }
        debug!("computed {n}x{n} distance matrix");
        Self { dist }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[[i, j]]
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.dist.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.dist
    }

    /// For every row, the candidate indices `0..n_candidates` ordered by ascending distance.
    ///
    /// Only the first `n_candidates` columns (the training documents) are ranked, but every row
    /// gets a list, test rows included. Ties keep ascending index order since the sort is
    /// stable. A row's own index is not filtered out.
    pub fn ranked_neighbors(&self, n_candidates: usize) -> Vec<Vec<usize>> {
        let n_candidates = n_candidates.min(self.len());
        self.dist
            .rows()
            .into_iter()
            .map(|row| {
                let mut order: Vec<usize> = (0..n_candidates).collect();
                order.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
                order
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_euclidean() {
        let x = array![2.0, 1.0];
        let y = array![1.0, 0.0];
        assert_relative_eq!(Euclidean.compute(x.view(), y.view()), 2.0_f64.sqrt());
        assert_eq!(Euclidean.compute(x.view(), x.view()), 0.0);
    }

    #[test]
    fn test_cosine() {
        let x = array![1.0, 0.0];
        let y = array![0.0, 4.0];
        let z = array![3.0, 3.0];
        assert_relative_eq!(Cosine.compute(x.view(), y.view()), 1.0);
        assert_relative_eq!(
            Cosine.compute(x.view(), z.view()),
            1.0 - 1.0 / 2.0_f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(Cosine.compute(z.view(), (&z * 2.0).view()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_zero_norm_is_maximal() {
        let zero = array![0.0, 0.0];
        let x = array![1.0, 2.0];
        assert_eq!(Cosine.compute(zero.view(), x.view()), DEGENERATE_COSINE_DISTANCE);
        assert_eq!(Cosine.compute(x.view(), zero.view()), DEGENERATE_COSINE_DISTANCE);
        assert_eq!(Cosine.compute(zero.view(), zero.view()), DEGENERATE_COSINE_DISTANCE);
    }

    #[test]
    fn test_metric_selector() {
        assert_eq!(Metric::from_selector("1").unwrap(), Metric::Euclidean);
        assert_eq!(Metric::from_selector("2").unwrap(), Metric::Cosine);
        assert_eq!(Metric::try_from(2u8).unwrap(), Metric::Cosine);
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!(" 1 ".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!(Metric::Cosine.selector(), 2);

        for bad in ["0", "3", "", "manhattan", "1.0"] {
            assert!(matches!(
                Metric::from_selector(bad),
                Err(Error::InvalidMetric(_))
            ));
        }
        assert!(matches!(Metric::try_from(7u8), Err(Error::InvalidMetric(_))));
    }

    #[test]
    fn test_matrix_symmetric_with_zero_diagonal() {
        let vectors = array![
            [2.0, 1.0, 0.0],
            [0.0, 3.0, 1.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [5.0, 5.0, 5.0]
        ];
        for metric in [Metric::Euclidean, Metric::Cosine] {
            let matrix = DistanceMatrix::compute(&vectors, &metric);
            assert_eq!(matrix.len(), 5);
            for i in 0..5 {
                assert_eq!(matrix.get(i, i), 0.0);
                for j in 0..5 {
                    assert_eq!(matrix.get(i, j), matrix.get(j, i));
                    assert!(matrix.get(i, j) >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_ranked_neighbors_are_sorted_permutations_of_train() {
        let vectors = array![[2.0, 1.0], [0.0, 3.0], [1.0, 1.0], [4.0, 0.0], [1.0, 0.0]];
        let n_train = 3;
        let matrix = DistanceMatrix::compute(&vectors, &Metric::Euclidean);
        let ranked = matrix.ranked_neighbors(n_train);

        assert_eq!(ranked.len(), 5);
        for (row, order) in ranked.iter().enumerate() {
            assert_eq!(order.len(), n_train);
            let mut seen = order.clone();
            seen.sort_unstable();
            assert_eq!(seen, vec![0, 1, 2]);
            for pair in order.windows(2) {
                assert!(matrix.get(row, pair[0]) <= matrix.get(row, pair[1]));
            }
        }
        // training rows find themselves first
        assert_eq!(ranked[0][0], 0);
        assert_eq!(ranked[1][0], 1);
    }

    #[test]
    fn test_ties_keep_index_order() {
        // rows 0, 1 and 2 are all at distance 1 from the query in row 3
        let vectors = array![[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, 0.0]];
        let matrix = DistanceMatrix::compute(&vectors, &Metric::Euclidean);
        assert_eq!(matrix.ranked_neighbors(3)[3], vec![0, 1, 2]);
    }

    #[test]
    fn test_scenario_test_row_prefers_closest_train() {
        let vectors = array![[2.0, 1.0], [0.0, 3.0], [1.0, 0.0]];
        let matrix = DistanceMatrix::compute(&vectors, &Metric::Euclidean);
        assert_relative_eq!(matrix.get(2, 0), 2.0_f64.sqrt());
        assert_relative_eq!(matrix.get(2, 1), 10.0_f64.sqrt());
        assert_eq!(matrix.ranked_neighbors(2)[2], vec![0, 1]);
    }
}
