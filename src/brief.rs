//! The briefing run: sequence every pipeline stage and return the summary.
//!
//! The flow is strictly sequential — resolve collaborators, fetch the
//! forecast JSON, fetch and decode each chart in declared order, compose the
//! prompt, call the model. Any failure aborts the whole run: there is no
//! partial output, no skip-and-continue, and no retry. The caller prints the
//! returned summary (the CLI writes it to stdout).

use crate::config::BriefingConfig;
use crate::error::BriefError;
use crate::pipeline::{encode, fetch, forecast, generate};
use crate::prompts;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Run the full briefing pipeline.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// The generation result: the model's briefing text, verbatim.
///
/// # Errors
/// Every stage error is fatal and surfaces here:
/// - Missing credential (raised before any network call)
/// - Fetch/timeout failures for the forecast feed or any chart
/// - Malformed JSON, undecodable image bytes, empty documents
/// - A missing locations field in the forecast
/// - Generation endpoint failures
pub async fn brief(config: &BriefingConfig) -> Result<String, BriefError> {
    let start = Instant::now();

    // ── Step 1: Resolve collaborators ────────────────────────────────────
    // The generator resolution carries the credential check, so a
    // misconfigured run dies before the first byte is fetched.
    let generator = generate::resolve_generator(config)?;
    let fetcher = resolve_fetcher(config)?;

    let total = config.resources.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    // ── Step 2: Fetch the structured forecast ────────────────────────────
    let forecast_data = forecast::fetch_forecast(fetcher.as_ref(), &config.forecast_url)
        .await
        .inspect_err(|e| error!("Forecast fetch failed: {e}"))?;

    // ── Step 3: Fetch charts in declared order ───────────────────────────
    // The collection is positional: charts[i] corresponds to resources[i],
    // and the model reads them in exactly that order.
    let mut charts: Vec<DynamicImage> = Vec::with_capacity(total);
    for (i, resource) in config.resources.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_resource_start(i + 1, total, resource.name());
        }

        let image = fetch::fetch_resource(fetcher.as_ref(), resource, config.max_document_pixels)
            .await
            .inspect_err(|e| error!("Resource {} failed: {e}", resource.name()))?;

        if let Some(ref cb) = config.progress_callback {
            cb.on_resource_complete(i + 1, total, image.width(), image.height());
        }
        charts.push(image);
    }

    // ── Step 4: Compose the prompt ───────────────────────────────────────
    let prompt = prompts::compose(&config.prompt_template, &forecast_data)?;

    // ── Step 5: Encode and generate ──────────────────────────────────────
    let attachments = charts
        .iter()
        .map(encode::encode_chart)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BriefError::Internal(format!("Chart encoding failed: {e}")))?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_start();
    }
    info!("Requesting briefing for {} charts", attachments.len());

    let summary = generator.generate(&prompt, attachments).await?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(summary.len());
    }
    info!(
        "Briefing complete: {} bytes in {}ms",
        summary.len(),
        start.elapsed().as_millis()
    );

    Ok(summary)
}

/// Synchronous wrapper around [`brief`].
///
/// Creates a temporary tokio runtime internally.
pub fn brief_sync(config: &BriefingConfig) -> Result<String, BriefError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BriefError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(brief(config))
}

/// Use the injected fetcher when present, otherwise build the HTTP one.
fn resolve_fetcher(config: &BriefingConfig) -> Result<Arc<dyn fetch::Fetcher>, BriefError> {
    if let Some(ref fetcher) = config.fetcher {
        return Ok(Arc::clone(fetcher));
    }
    Ok(Arc::new(fetch::HttpFetcher::new(
        config.download_timeout_secs,
    )?))
}
