//! Lookup service boundary - search, fetch and metadata calls
//!
//! The resolver only talks to the service through [`LookupClient`], which
//! keeps the HTTP implementation swappable for stubs in tests.

pub mod http;
pub mod wire;

pub use http::HttpLookupClient;

use async_trait::async_trait;

use crate::error::LookupError;
use crate::exercises::{Candidate, ExerciseRecord, ExternalId};

#[async_trait]
pub trait LookupClient: Send + Sync {
    /// Text search; hits may lack media
    async fn search_by_text(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, LookupError>;

    /// Every exercise filed under a muscle, regardless of name
    async fn search_by_muscle(&self, muscle: &str, limit: usize) -> Result<Vec<Candidate>, LookupError>;

    /// Full record including every media variant
    async fn fetch_by_id(&self, id: &ExternalId) -> Result<ExerciseRecord, LookupError>;

    async fn list_muscle_names(&self) -> Result<Vec<String>, LookupError>;

    async fn list_category_names(&self) -> Result<Vec<String>, LookupError>;
}
