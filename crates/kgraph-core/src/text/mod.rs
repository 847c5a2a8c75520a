//! Text pre-processing utilities

mod normalizer;

pub use normalizer::TextNormalizer;
