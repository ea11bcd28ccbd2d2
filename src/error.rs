//! Error types for the skybrief library.
//!
//! Every error here is fatal: the briefing pipeline has no partial-success
//! mode. Either the full run completes and yields exactly one summary, or it
//! aborts at the failing stage with no generation output at all. Each variant
//! therefore carries enough context (URL, field path) for the terminal
//! message to identify which resource was being processed when the run died.

use thiserror::Error;

/// All errors returned by the skybrief library.
#[derive(Debug, Error)]
pub enum BriefError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The API key environment variable is absent or empty.
    ///
    /// Raised before any network activity so a misconfigured run fails
    /// instantly instead of after five downloads.
    #[error("{var} is not set.\nExport your API key first: export {var}=...")]
    MissingCredential { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// HTTP transport failure or non-success status while fetching a resource.
    #[error("Failed to fetch '{url}': {reason}\nCheck your internet connection.")]
    Fetch { url: String, reason: String },

    /// A fetch exceeded the configured timeout.
    #[error("Fetch timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    FetchTimeout { url: String, secs: u64 },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The response body was not valid JSON.
    #[error("Response from '{url}' is not valid JSON: {reason}")]
    Parse { url: String, reason: String },

    /// The payload could not be decoded as a raster image or opened as a
    /// document.
    #[error("Could not decode '{url}': {reason}")]
    Decode { url: String, reason: String },

    /// The document opened cleanly but contains zero pages, so there is
    /// nothing to rasterise.
    #[error("Document at '{url}' has no pages")]
    EmptyDocument { url: String },

    // ── Prompt errors ─────────────────────────────────────────────────────
    /// The forecast JSON does not carry the expected nested field.
    #[error("Forecast JSON is missing '{path}'\nThe feed format may have changed upstream.")]
    FieldNotFound { path: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// The generation endpoint rejected the request or returned an unusable
    /// response. The upstream message is surfaced verbatim.
    #[error("Generation request failed: {message}")]
    Api { message: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (task join, tempfile plumbing).
    #[error("Internal error: {0}")]
    Internal(String),
}
