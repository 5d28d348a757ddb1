//! OMDb (Open Movie Database) provider client.
//!
//! API reference: https://www.omdbapi.com/

use std::time::Duration;

use tracing::debug;

use crate::MetadataError;
use crate::provider::{MovieProvider, ProviderRecord, ProviderSearchPayload};

pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OmdbClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OmdbClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, MetadataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MetadataError::Network(format!("build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<serde_json::Value, MetadataError> {
        let mut all_params = vec![("apikey", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        debug!(url = %self.base_url, ?params, "OMDb request");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "OMDb returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }
}

/// OMDb signals every kind of miss (no matches, bad id, provider-side
/// complaints) with `"Response": "False"`. All of them read as "no result".
fn is_no_result(data: &serde_json::Value) -> bool {
    if data.is_null() || data["Response"].as_str() == Some("False") {
        debug!(
            reason = data["Error"].as_str().unwrap_or("Unknown error"),
            "OMDb returned no result"
        );
        return true;
    }
    false
}

#[async_trait::async_trait]
impl MovieProvider for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<ProviderSearchPayload, MetadataError> {
        let page = page.to_string();
        let data = self.get_json(&[("s", query), ("page", &page)]).await?;
        parse_search_payload(data)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ProviderRecord>, MetadataError> {
        let data = self.get_json(&[("i", id)]).await?;
        if is_no_result(&data) {
            return Ok(None);
        }

        serde_json::from_value(data)
            .map(Some)
            .map_err(|e| MetadataError::Provider(format!("decode record: {e}")))
    }
}

fn parse_search_payload(data: serde_json::Value) -> Result<ProviderSearchPayload, MetadataError> {
    if is_no_result(&data) {
        return Ok(ProviderSearchPayload::no_result());
    }

    let records = match data.get("Search") {
        Some(list) => serde_json::from_value(list.clone())
            .map_err(|e| MetadataError::Provider(format!("decode search list: {e}")))?,
        None => Vec::new(),
    };

    // OMDb sends the total as a string; tolerate a bare number too.
    let total_results = match &data["totalResults"] {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    };

    Ok(ProviderSearchPayload {
        records,
        total_results,
    })
}
