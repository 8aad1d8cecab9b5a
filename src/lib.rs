pub mod error;
pub mod knn;
pub mod report;
pub mod text;

pub use error::{Error, Result};
pub use knn::{
    evaluate, ClassificationRun, ConfusionMatrix, Cosine, Distance, DistanceMatrix, Euclidean,
    Evaluation, KnnClassifier, KnnConfig, Metric, Prediction, VoteTally,
};
pub use report::{render_console_report, render_output, write_output};
pub use text::{vectorize, vectorize_all, Corpus, Document, Vocabulary};
