//! Configuration types for a briefing run.
//!
//! All run behaviour is controlled through [`BriefingConfig`], built via its
//! [`BriefingConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs, serialise the resource list for logging, and
//! substitute fakes for the network-facing collaborators in tests.
//!
//! The default configuration reproduces the fixed CWA pipeline: the
//! F-D0047-005 township forecast feed, four QPF precipitation charts in
//! chronological order, and the surface analysis chart (a PDF) last. The
//! downstream model's reading of the charts depends on that order, so the
//! resource list is ordered and consumed positionally.

use crate::error::BriefError;
use crate::pipeline::fetch::Fetcher;
use crate::pipeline::generate::Generator;
use crate::progress::ProgressCallback;
use crate::prompts::{DEFAULT_PROMPT_TEMPLATE, LOCATIONS_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The CWA open-data township forecast feed (Taoyuan, F-D0047-005).
pub const DEFAULT_FORECAST_URL: &str =
    "https://cwaopendata.s3.ap-northeast-1.amazonaws.com/Forecast/F-D0047-005.json";

/// The fixed chart set: QPF accumulation charts for the next 6/12/18/24
/// hours, then the surface analysis chart. Chronological order, surface
/// chart last.
pub fn default_resources() -> Vec<Resource> {
    vec![
        Resource::new("https://cwa.ppp503.workers.dev/Data/fcst_img/QPF_ChFcstPrecip_6_06.png"),
        Resource::new("https://cwa.ppp503.workers.dev/Data/fcst_img/QPF_ChFcstPrecip_6_12.png"),
        Resource::new("https://cwa.ppp503.workers.dev/Data/fcst_img/QPF_ChFcstPrecip_6_18.png"),
        Resource::new("https://cwa.ppp503.workers.dev/Data/fcst_img/QPF_ChFcstPrecip_6_24.png"),
        Resource::new(
            "https://cwaopendata.s3.ap-northeast-1.amazonaws.com/Forecast/F-C0035-003.pdf",
        ),
    ]
}

/// What a resource URL denotes, derived from its path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Raster image bytes, decoded directly.
    Image,
    /// A paginated document; only page 1 is rasterised.
    Document,
}

/// A single chart resource to fetch, identified only by its URL.
///
/// Serde-transparent so a resource list can be supplied as a plain JSON
/// array of URL strings (`--resources charts.json` in the CLI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
    url: String,
}

impl Resource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Derive the kind from the URL path suffix, ignoring any query string
    /// or fragment. Only `.pdf` denotes a document; everything else is
    /// handed to the image decoder.
    pub fn kind(&self) -> ResourceKind {
        if self.path().to_ascii_lowercase().ends_with(".pdf") {
            ResourceKind::Document
        } else {
            ResourceKind::Image
        }
    }

    /// Last path segment, used in progress notices.
    pub fn name(&self) -> &str {
        self.path().rsplit('/').next().unwrap_or(&self.url)
    }

    fn path(&self) -> &str {
        self.url.split(['?', '#']).next().unwrap_or(&self.url)
    }
}

/// Configuration for a briefing run.
///
/// Built via [`BriefingConfig::builder()`] or [`BriefingConfig::default()`].
///
/// # Example
/// ```rust
/// use skybrief::BriefingConfig;
///
/// let config = BriefingConfig::builder()
///     .model("gemini-2.0-flash")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BriefingConfig {
    /// URL of the structured forecast JSON feed.
    pub forecast_url: String,

    /// Ordered chart resources. The order here is the order the images
    /// reach the model.
    pub resources: Vec<Resource>,

    /// Instruction template; must contain the `{locations}` placeholder,
    /// which is replaced with the serialised locations collection.
    pub prompt_template: String,

    /// LLM model identifier. If None, uses the provider's default vision
    /// model.
    pub model: Option<String>,

    /// LLM provider name. If None, `"gemini"` — the provider the briefing
    /// prompt was tuned against.
    pub provider_name: Option<String>,

    /// Pre-constructed generator. Takes precedence over `provider_name`
    /// and skips the credential check, which is how tests inject fakes.
    pub generator: Option<Arc<dyn Generator>>,

    /// Pre-constructed fetcher. If None, an HTTP fetcher is built from
    /// `download_timeout_secs`.
    pub fetcher: Option<Arc<dyn Fetcher>>,

    /// Sampling temperature for the completion. Default: 0.2.
    ///
    /// The briefing must stay faithful to the forecast data; low
    /// temperature keeps the model from embellishing beyond what the
    /// charts show.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 1024.
    ///
    /// Five lines of at most 65 Chinese characters each fit comfortably;
    /// the headroom covers models that pad with full-width punctuation.
    pub max_tokens: usize,

    /// Maximum rendered document dimension (width or height) in pixels.
    /// Default: 2000.
    ///
    /// A safety cap so a surface chart distributed at poster size cannot
    /// exhaust memory; either dimension is capped and the other scales
    /// proportionally.
    pub max_document_pixels: u32,

    /// Per-fetch timeout in seconds. Default: 60.
    pub download_timeout_secs: u64,

    /// Generation call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Progress callback, fired around each fetch and the generation call.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            resources: default_resources(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            model: None,
            provider_name: None,
            generator: None,
            fetcher: None,
            temperature: 0.2,
            max_tokens: 1024,
            max_document_pixels: 2000,
            download_timeout_secs: 60,
            api_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BriefingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BriefingConfig")
            .field("forecast_url", &self.forecast_url)
            .field("resources", &self.resources)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("generator", &self.generator.as_ref().map(|_| "<dyn Generator>"))
            .field("fetcher", &self.fetcher.as_ref().map(|_| "<dyn Fetcher>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_document_pixels", &self.max_document_pixels)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl BriefingConfig {
    /// Create a new builder for `BriefingConfig`.
    pub fn builder() -> BriefingConfigBuilder {
        BriefingConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BriefingConfig`].
#[derive(Debug)]
pub struct BriefingConfigBuilder {
    config: BriefingConfig,
}

impl BriefingConfigBuilder {
    pub fn forecast_url(mut self, url: impl Into<String>) -> Self {
        self.config.forecast_url = url.into();
        self
    }

    pub fn resources(mut self, resources: Vec<Resource>) -> Self {
        self.config.resources = resources;
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = template.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.config.fetcher = Some(fetcher);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_document_pixels(mut self, px: u32) -> Self {
        self.config.max_document_pixels = px.max(100);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BriefingConfig, BriefError> {
        let c = &self.config;
        if c.forecast_url.trim().is_empty() {
            return Err(BriefError::InvalidConfig(
                "Forecast URL must not be empty".into(),
            ));
        }
        if c.resources.is_empty() {
            return Err(BriefError::InvalidConfig(
                "Resource list must contain at least one chart".into(),
            ));
        }
        if !c.prompt_template.contains(LOCATIONS_PLACEHOLDER) {
            return Err(BriefError::InvalidConfig(format!(
                "Prompt template must contain the {LOCATIONS_PLACEHOLDER} placeholder"
            )));
        }
        Ok(self.config)
    }
}
