//! Publisher bias resolution for links and citation strings on search pages.
//!
//! [`BiasResolver`] owns a [`loader::DatabaseLoader`] and a
//! [`cache::ResolutionCache`] over injected storage, data source and clock.
//! Lookups are total: every URL or citation resolves to a record, falling back
//! to `unknown` when no tier matches. Matching tiers, in order, are exact
//! domain, `www`-stripped domain, containment, registrable root, TLD variants,
//! and a fixed table of well-known outlets. Links on news aggregators are first
//! matched by the publisher named in their `source` parameter or path.

pub mod alternatives;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod message;
pub mod resolver;
pub mod source;
pub mod special_cases;
pub mod store;

pub use bias_common::types::{BiasCategory, BiasDatabase, BiasRecord, Reliability, ResolutionResult};
pub use config::ResolverConfig;
pub use error::ResolveError;
pub use resolver::BiasResolver;
