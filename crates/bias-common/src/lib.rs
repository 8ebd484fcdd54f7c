//! Shared types and normalization for the media bias resolver.
//!
//! Everything here is pure: domain canonicalization, folded text for citation
//! matching, aggregator hint extraction, and decoding of the bundled bias
//! database JSON. Persistence and orchestration live
//! in `bias-resolver`.

pub mod aggregator;
pub mod bundle;
pub mod hashing;
pub mod normalization;
pub mod types;
