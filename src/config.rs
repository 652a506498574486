//! Runtime settings from flags, environment and `.env`

use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use crate::client::HttpLookupClient;
use crate::error::ConfigError;
use crate::resolver::{AliasTable, ResolverConfig};

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Base URL of the exercise media API
    #[arg(long, env = "EXERCISE_API_URL", default_value = "https://api.musclewiki.com")]
    pub api_url: String,

    /// API credential sent with every lookup
    #[arg(long, env = "EXERCISE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// SQLite file for the persistent media cache
    #[arg(long, env = "MEDIA_DB_PATH", default_value = "exercise_media.db")]
    pub db_path: String,

    /// Minimum milliseconds between outbound lookups
    #[arg(long, env = "MEDIA_MIN_INTERVAL_MS", default_value = "250")]
    pub min_interval_ms: u64,

    /// Per-call timeout in seconds
    #[arg(long, env = "MEDIA_CALL_TIMEOUT_SECS", default_value = "10")]
    pub call_timeout_secs: u64,

    /// Names resolved concurrently per batch
    #[arg(long, env = "MEDIA_BATCH_SIZE", default_value = "5")]
    pub batch_size: usize,

    /// Results requested per text search
    #[arg(long, env = "MEDIA_SEARCH_LIMIT", default_value = "10")]
    pub search_limit: usize,

    /// Results requested per muscle search
    #[arg(long, env = "MEDIA_MUSCLE_SEARCH_LIMIT", default_value = "50")]
    pub muscle_search_limit: usize,
}

impl Settings {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs.max(1))
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            min_interval: Duration::from_millis(self.min_interval_ms),
            call_timeout: self.call_timeout(),
            batch_size: self.batch_size.max(1),
            search_limit: self.search_limit.max(1),
            muscle_search_limit: self.muscle_search_limit.max(1),
            aliases: AliasTable::builtin(),
        }
    }

    /// Lookup client; fails at startup when the credential is missing
    pub fn lookup_client(&self) -> Result<Arc<HttpLookupClient>, ConfigError> {
        let client = HttpLookupClient::new(&self.api_url, self.api_key.as_deref(), self.call_timeout())?;
        Ok(Arc::new(client))
    }
}
