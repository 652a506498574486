//! exercise-media - Exercise media resolution and caching
//!
//! Turns free-text exercise names into canonical records with instructional
//! media, while keeping calls to the metered lookup service to a minimum.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod exercises;
pub mod resolver;

pub use db::Database;
pub use error::{ConfigError, LookupError, ResolveError, StoreError};
pub use exercises::{Candidate, ExerciseRecord, MediaVariant};
pub use resolver::{CacheStats, MediaResolver, ResolverConfig};
