// src/extractors/mod.rs
pub mod fields;
pub mod items;
pub mod profile;
pub mod section;
pub mod strategy;

// Re-export key extraction types for convenience
pub use profile::ProfileExtractor;
