//! # skybrief
//!
//! Summarise CWA weather forecasts with a Vision Language Model.
//!
//! ## Why this crate?
//!
//! The CWA township forecast is a deep JSON tree, and the accompanying QPF
//! and surface charts are images — rainfall bins keyed by colour, fronts
//! drawn by hand. A vision model can read both at once and produce the
//! short, fixed-format daily briefing a dashboard or chat channel wants,
//! without anyone maintaining a parser for every chart style the bureau
//! publishes.
//!
//! ## Pipeline Overview
//!
//! ```text
//! run
//!  │
//!  ├─ 1. Forecast  download + parse the F-D0047-005 JSON feed
//!  ├─ 2. Fetch     download the 4 QPF charts and the surface chart (PDF),
//!  │               rasterising page 1 of the PDF via pdfium
//!  ├─ 3. Compose   interpolate the locations data into the prompt template
//!  ├─ 4. Generate  one multimodal request: prompt + 5 images, in order
//!  └─ 5. Output    the model's five-line briefing, printed verbatim
//! ```
//!
//! Everything is sequential; any stage failure aborts the run with no
//! partial output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skybrief::{brief, BriefingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Requires GEMINI_API_KEY in the environment
//!     let config = BriefingConfig::default();
//!     let summary = brief(&config).await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `skybrief` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! skybrief = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod brief;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use brief::{brief, brief_sync};
pub use config::{
    default_resources, BriefingConfig, BriefingConfigBuilder, Resource, ResourceKind,
    DEFAULT_FORECAST_URL,
};
pub use error::BriefError;
pub use pipeline::fetch::{Fetcher, HttpFetcher};
pub use pipeline::generate::{
    Generator, VisionGenerator, DEFAULT_MODEL, DEFAULT_PROVIDER, GEMINI_API_KEY_VAR,
};
pub use progress::{BriefingProgress, NoopProgress, ProgressCallback};
pub use prompts::{DEFAULT_PROMPT_TEMPLATE, LOCATIONS_PLACEHOLDER};
