//! reqwest implementation of the lookup client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::LookupClient;
use super::wire::{ListPayload, NamedItem, WireExercise};
use crate::error::{ConfigError, LookupError};
use crate::exercises::{Candidate, ExerciseRecord, ExternalId};

/// Credential header expected by the service
const API_KEY_HEADER: &str = "X-API-Key";

const USER_AGENT: &str = concat!("exercise-media/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the exercise media API
pub struct HttpLookupClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpLookupClient {
    /// Build a client; a missing or blank credential is a configuration error
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = header::HeaderMap::new();
        let key_value = header::HeaderValue::from_str(api_key)
            .map_err(|_| ConfigError::InvalidCredential)?;
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let http_client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, LookupError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Lookup request");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout(self.timeout)
                } else {
                    LookupError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }

    fn candidates(payload: ListPayload<WireExercise>) -> Vec<Candidate> {
        payload
            .into_vec()
            .into_iter()
            .filter_map(WireExercise::into_candidate)
            .collect()
    }

    fn names(payload: ListPayload<NamedItem>) -> Vec<String> {
        payload.into_vec().into_iter().map(NamedItem::into_name).collect()
    }
}

#[async_trait]
impl LookupClient for HttpLookupClient {
    async fn search_by_text(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, LookupError> {
        let payload = self
            .get_json("/search", &[("q", query.to_string()), ("limit", limit.to_string())])
            .await?;
        Ok(Self::candidates(payload))
    }

    async fn search_by_muscle(&self, muscle: &str, limit: usize) -> Result<Vec<Candidate>, LookupError> {
        let payload = self
            .get_json(
                "/exercises",
                &[("muscles", muscle.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(Self::candidates(payload))
    }

    async fn fetch_by_id(&self, id: &ExternalId) -> Result<ExerciseRecord, LookupError> {
        let wire: WireExercise = self.get_json(&format!("/exercises/{}", id), &[]).await?;
        Ok(wire.into_record())
    }

    async fn list_muscle_names(&self) -> Result<Vec<String>, LookupError> {
        let payload = self.get_json("/muscles", &[]).await?;
        Ok(Self::names(payload))
    }

    async fn list_category_names(&self) -> Result<Vec<String>, LookupError> {
        let payload = self.get_json("/categories", &[]).await?;
        Ok(Self::names(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_missing_credential_rejected() {
        let err = HttpLookupClient::new("https://api.example.com", None, TIMEOUT).err();
        assert!(matches!(err, Some(ConfigError::MissingCredential)));

        let err = HttpLookupClient::new("https://api.example.com", Some("   "), TIMEOUT).err();
        assert!(matches!(err, Some(ConfigError::MissingCredential)));
    }

    #[test]
    fn test_base_url_requires_scheme() {
        let err = HttpLookupClient::new("api.example.com", Some("key"), TIMEOUT).err();
        assert!(matches!(err, Some(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = HttpLookupClient::new("https://api.example.com/", Some("key"), TIMEOUT).unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
