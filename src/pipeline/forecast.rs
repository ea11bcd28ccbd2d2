//! Structured forecast retrieval: fetch a URL and parse the body as JSON.
//!
//! The result is an untyped [`serde_json::Value`] tree. No schema validation
//! happens here — the feed's shape is only interrogated later, when the
//! prompt composer extracts the locations collection. Keeping the fetch
//! shape-agnostic means an upstream format change fails at the one place
//! that actually names the missing field.

use crate::error::BriefError;
use crate::pipeline::fetch::Fetcher;
use serde_json::Value;
use tracing::info;

/// Fetch and parse the forecast JSON feed.
pub async fn fetch_forecast(fetcher: &dyn Fetcher, url: &str) -> Result<Value, BriefError> {
    info!("Fetching forecast data: {url}");
    let bytes = fetcher.fetch(url).await?;

    serde_json::from_slice(&bytes).map_err(|e| BriefError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticFetcher(Vec<u8>);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, BriefError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn valid_json_parses_to_value() {
        let fetcher =
            StaticFetcher(br#"{"Dataset":{"Locations":{"Location":[{"name":"Taoyuan"}]}}}"#.to_vec());

        let value = fetch_forecast(&fetcher, "https://feed.example/forecast.json")
            .await
            .expect("valid JSON must parse");
        assert_eq!(
            value["Dataset"]["Locations"]["Location"][0]["name"],
            "Taoyuan"
        );
    }

    #[tokio::test]
    async fn any_json_shape_is_accepted() {
        let fetcher = StaticFetcher(b"[1, 2, 3]".to_vec());
        let value = fetch_forecast(&fetcher, "https://feed.example/forecast.json")
            .await
            .expect("arrays are accepted");
        assert!(value.is_array());
    }

    #[tokio::test]
    async fn malformed_body_fails_with_parse() {
        let fetcher = StaticFetcher(b"<html>rate limited</html>".to_vec());
        let err = fetch_forecast(&fetcher, "https://feed.example/forecast.json")
            .await
            .unwrap_err();
        assert!(matches!(err, BriefError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("forecast.json"));
    }
}
