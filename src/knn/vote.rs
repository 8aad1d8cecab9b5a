use std::collections::HashMap;

use crate::error::{Error, Result};

/// Label counts among a document's `k` nearest training neighbors, ranked by descending count.
///
/// Labels with equal counts stay in the order they first appear among the neighbors; there is
/// no secondary alphabetical sort. The first entry is the prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    k: usize,
    ranked: Vec<(String, usize)>,
}

impl VoteTally {
    /// Tallies the labels of the first `k` entries of `neighbors`.
    ///
    /// `neighbors` holds training indices in ascending distance order and `train_labels` maps
    /// each training index to its label.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidK`] unless `1 <= k <= train_labels.len()` and `neighbors` has at least
    /// `k` entries.
    ///
    /// # Example
    ///
    /// ```
    /// use textknn::VoteTally;
    ///
    /// let labels = ["dog", "cat", "cat", "dog"];
    /// let tally = VoteTally::from_neighbors(&[3, 1, 0, 2], &labels, 3).unwrap();
    /// assert_eq!(tally.winner(), "dog");
    /// assert_eq!(tally.ranked(), [("dog".to_string(), 2), ("cat".to_string(), 1)]);
    /// ```
    pub fn from_neighbors<S: AsRef<str>>(
        neighbors: &[usize],
        train_labels: &[S],
        k: usize,
    ) -> Result<Self> {
        let train_len = train_labels.len();
        if k == 0 || k > train_len || k > neighbors.len() {
            return Err(Error::InvalidK { k, train_len });
        }

        let mut slot: HashMap<&str, usize> = HashMap::with_capacity(k);
        let mut ranked: Vec<(String, usize)> = Vec::with_capacity(k);
        for &idx in &neighbors[..k] {
            let label = train_labels[idx].as_ref();
            match slot.get(label) {
                Some(&pos) => ranked[pos].1 += 1,
                None => {
                    slot.insert(label, ranked.len());
                    ranked.push((label.to_string(), 1));
                }
            }
        }
        // stable, so equal counts keep first-occurrence order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(Self { k, ranked })
    }

    /// The top-voted label.
    pub fn winner(&self) -> &str {
        &self.ranked[0].0
    }

    /// `(label, count)` pairs, highest count first.
    pub fn ranked(&self) -> &[(String, usize)] {
        &self.ranked
    }

    /// `(label, count / k)` pairs in ranked order.
    pub fn scores(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        let k = self.k as f64;
        self.ranked
            .iter()
            .map(move |(label, count)| (label.as_str(), *count as f64 / k))
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Sum of all counts; always equals `k`.
    pub fn total(&self) -> usize {
        self.ranked.iter().map(|(_, count)| count).sum()
    }
}
