//! Prompt template and composition for the weather briefing.
//!
//! Centralising the template here serves two purposes:
//!
//! 1. **Single source of truth** — the output contract (five labelled lines,
//!    the per-line character budget, the forbidden characters) lives in
//!    exactly one place.
//!
//! 2. **Testability** — composition is a pure function over the parsed
//!    forecast, so unit tests can verify the interpolation without touching
//!    the network or a real model.
//!
//! Callers can override the template via
//! [`crate::config::BriefingConfig::prompt_template`]; the constant here is
//! used only when no override is provided. Any override must contain
//! [`LOCATIONS_PLACEHOLDER`], which [`compose`] replaces with the serialised
//! locations collection.

use crate::error::BriefError;
use serde_json::Value;

/// Placeholder in the template that receives the serialised locations data.
pub const LOCATIONS_PLACEHOLDER: &str = "{locations}";

/// Default briefing instruction.
///
/// The model receives this text followed by the five chart images in order:
/// QPF 0–6, 6–12, 12–18, 18–24 hr, then the surface chart. The output
/// contract — five labelled lines, ≤65 Chinese characters each, no '＊',
/// no title or date lines — is what downstream display surfaces expect.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"Tell me the Taoyuan City daily weather overview for the next 24 hours in the agreed format (each item ≤65 Chinese characters, no '＊'),
including: 天氣型態、降雨預報、雨勢關注區域、風力概況、風勢關注區域. Information on the QPF plots must be used in 降雨預報. Use only data from the reference JSON, the QPF plots (0~6, 6~12, 12~18, 18~24 hr) and the surface chart image.
Output only those five lines (no title/date lines).

Use the following JSON data for reference:
{locations}
"#;

/// Locate the locations collection inside the parsed forecast.
///
/// The expected path is `Dataset → Locations → Location`. The live CWA feed
/// wraps the dataset in a `cwaopendata` envelope, so that form is accepted
/// as well, with the unwrapped path taking precedence.
pub fn extract_locations(forecast: &Value) -> Result<&Value, BriefError> {
    forecast
        .pointer("/Dataset/Locations/Location")
        .or_else(|| forecast.pointer("/cwaopendata/Dataset/Locations/Location"))
        .ok_or_else(|| BriefError::FieldNotFound {
            path: "Dataset.Locations.Location".to_string(),
        })
}

/// Build the briefing prompt from the template and the parsed forecast.
///
/// Pure function: extracts the locations collection, serialises it to JSON
/// text, and substitutes it for [`LOCATIONS_PLACEHOLDER`].
pub fn compose(template: &str, forecast: &Value) -> Result<String, BriefError> {
    let locations = extract_locations(forecast)?;
    let serialized = locations.to_string();
    Ok(template.replace(LOCATIONS_PLACEHOLDER, &serialized))
}
