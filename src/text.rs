pub mod document;
pub mod vectorize;
pub mod vocabulary;

pub use document::{Corpus, Document};
pub use vectorize::{vectorize, vectorize_all};
pub use vocabulary::Vocabulary;
