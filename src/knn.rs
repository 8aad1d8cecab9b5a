pub mod classifier;
pub mod distance;
pub mod evaluate;
pub mod vote;

// Re-export public types and functions
pub use classifier::{ClassificationRun, KnnClassifier, KnnConfig};
pub use distance::{Cosine, Distance, DistanceMatrix, Euclidean, Metric};
pub use evaluate::{evaluate, ConfusionMatrix, Evaluation, Prediction};
pub use vote::VoteTally;
