//! Resource retrieval: fetch a chart URL and decode it to a raster image.
//!
//! Transport lives behind the narrow [`Fetcher`] trait so the orchestrator
//! can be exercised with in-memory fakes; [`HttpFetcher`] is the production
//! implementation. Decoding dispatches on the resource kind: document
//! payloads are rasterised via [`crate::pipeline::render`], everything else
//! goes straight to the `image` decoder.
//!
//! There is deliberately no retry logic. A missing chart makes the briefing
//! unusable (the prompt promises the model all five charts in order), so any
//! single failure aborts the whole run.

use crate::config::{Resource, ResourceKind};
use crate::error::BriefError;
use async_trait::async_trait;
use image::DynamicImage;
use tracing::{debug, info};

/// Byte-level retrieval of a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the URL and return the response body.
    ///
    /// Implementations must treat a non-success HTTP status as an error.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BriefError>;
}

/// Production fetcher over a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    /// Build a fetcher with the given per-request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self, BriefError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BriefError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BriefError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                BriefError::FetchTimeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                BriefError::Fetch {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(BriefError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| BriefError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Fetch a chart resource and decode it into a raster image.
///
/// Documents are rasterised from page 1; everything else is decoded
/// directly. `max_document_pixels` caps the longest rendered edge.
pub async fn fetch_resource(
    fetcher: &dyn Fetcher,
    resource: &Resource,
    max_document_pixels: u32,
) -> Result<DynamicImage, BriefError> {
    info!("Fetching resource: {}", resource.name());
    let bytes = fetcher.fetch(resource.url()).await?;

    match resource.kind() {
        ResourceKind::Document => {
            crate::pipeline::render::first_page(bytes, resource.url(), max_document_pixels).await
        }
        ResourceKind::Image => {
            image::load_from_memory(&bytes).map_err(|e| BriefError::Decode {
                url: resource.url().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapFetcher {
        bodies: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, BriefError> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| BriefError::Fetch {
                    url: url.to_string(),
                    reason: "HTTP 404 Not Found".to_string(),
                })
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        use image::{Rgba, RgbaImage};
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([0, 128, 255, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buf),
            image::ImageFormat::Png,
        )
        .expect("PNG encoding of a solid image cannot fail");
        buf
    }

    #[tokio::test]
    async fn image_resource_is_decoded() {
        let url = "https://charts.example/qpf.png";
        let fetcher = MapFetcher {
            bodies: HashMap::from([(url.to_string(), png_bytes(4, 3))]),
        };

        let img = fetch_resource(&fetcher, &Resource::new(url), 2000)
            .await
            .expect("decode must succeed");
        assert_eq!((img.width(), img.height()), (4, 3));
    }

    #[tokio::test]
    async fn malformed_image_bytes_fail_with_decode() {
        let url = "https://charts.example/bad.png";
        let fetcher = MapFetcher {
            bodies: HashMap::from([(url.to_string(), b"not an image".to_vec())]),
        };

        let err = fetch_resource(&fetcher, &Resource::new(url), 2000)
            .await
            .unwrap_err();
        assert!(matches!(err, BriefError::Decode { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn missing_resource_fails_with_fetch() {
        let fetcher = MapFetcher {
            bodies: HashMap::new(),
        };

        let err = fetch_resource(&fetcher, &Resource::new("https://charts.example/gone.png"), 2000)
            .await
            .unwrap_err();
        assert!(matches!(err, BriefError::Fetch { .. }));
        assert!(err.to_string().contains("404"));
    }
}
