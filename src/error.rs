use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading documents or running the classification pipeline.
///
/// Every variant is fatal for a run: nothing is retried and no partial output is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// The distance selector was neither Euclidean (`1`) nor cosine (`2`).
    #[error("invalid distance metric `{0}`: expected 1 (Euclidean) or 2 (cosine)")]
    InvalidMetric(String),

    /// `k` must satisfy `1 <= k <= |train|`.
    #[error("invalid k = {k}: must be between 1 and the training set size ({train_len})")]
    InvalidK { k: usize, train_len: usize },

    /// A line lacked a label or carried a feature that is not `name:count`.
    #[error("malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// The training file held no documents.
    #[error("training set contains no documents")]
    EmptyTrainingSet,

    /// A document's true label never occurs in the training set.
    #[error("label `{0}` does not occur in the training set")]
    UnknownLabel(String),

    /// Each evaluated document needs exactly one ranked neighbor list.
    #[error("{documents} documents but {rankings} ranked neighbor lists")]
    LengthMismatch { documents: usize, rankings: usize },

    #[error("failed to access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
