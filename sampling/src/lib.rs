//! Seeded randomness for tests and benchmarks.

pub mod source;
