pub mod normalizer;

pub use normalizer::RecordNormalizer;
