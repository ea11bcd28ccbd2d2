//! CLI binary for skybrief.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `BriefingConfig`, renders fetch progress, and prints the briefing.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use skybrief::{brief, BriefingConfig, BriefingProgress, ProgressCallback, Resource};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar that advances per fetched chart, then
/// switches to a spinner while the model writes the briefing.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl BriefingProgress for CliProgress {
    fn on_run_start(&self, total_resources: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:30.green/238}] {pos}/{len} charts  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_resources as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Fetching");
    }

    fn on_resource_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_resource_complete(&self, index: usize, total: usize, width: u32, height: u32) {
        self.bar.println(format!(
            "  {} Chart {index}/{total}  {}",
            green("✓"),
            dim(&format!("{width}x{height} px")),
        ));
        self.bar.inc(1);
    }

    fn on_generation_start(&self) {
        self.bar.set_prefix("Summarising");
        self.bar.set_message("waiting for the model…");
    }

    fn on_run_complete(&self, summary_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} briefing ready  {}",
            green("✔"),
            dim(&format!("{summary_len} bytes"))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # The fixed pipeline, end to end
  skybrief

  # A different vision model
  skybrief --model gemini-2.5-pro

  # Substitute the chart set (JSON array of URLs)
  skybrief --resources charts.json

  # A custom briefing template (must contain {locations})
  skybrief --prompt-file briefing.txt

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY       Generation API key (required)
  SKYBRIEF_MODEL       Override the model ID
  SKYBRIEF_PROVIDER    Override the provider name

SETUP:
  1. Set the API key:  export GEMINI_API_KEY=...
  2. Run:              skybrief

  The surface chart is a PDF; rendering it requires a pdfium library
  (set PDFIUM_LIB_PATH if it is not on the default search path).
"#;

/// Fetch CWA forecast data and charts, then print a model-written briefing.
#[derive(Parser, Debug)]
#[command(
    name = "skybrief",
    version,
    about = "Summarise CWA weather forecasts with a Vision Language Model",
    long_about = "Fetch the CWA township forecast JSON plus the QPF and surface charts, \
send everything to a vision model in one multimodal request, and print the \
five-line Taoyuan weather briefing it returns.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Vision model ID (e.g. gemini-2.0-flash, gemini-2.5-pro).
    #[arg(long, env = "SKYBRIEF_MODEL")]
    model: Option<String>,

    /// LLM provider name.
    #[arg(long, env = "SKYBRIEF_PROVIDER")]
    provider: Option<String>,

    /// Forecast JSON feed URL.
    #[arg(long, env = "SKYBRIEF_FORECAST_URL")]
    forecast_url: Option<String>,

    /// Path to a JSON array of chart URLs replacing the built-in list.
    ///
    /// Order matters: charts are shown to the model in list order, and the
    /// default template expects QPF charts chronologically with the surface
    /// chart last.
    #[arg(long, env = "SKYBRIEF_RESOURCES")]
    resources: Option<PathBuf>,

    /// Path to a text file containing a custom prompt template.
    #[arg(long, env = "SKYBRIEF_PROMPT_FILE")]
    prompt_file: Option<PathBuf>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "SKYBRIEF_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max tokens the model may generate.
    #[arg(long, env = "SKYBRIEF_MAX_TOKENS", default_value_t = 1024)]
    max_tokens: usize,

    /// Per-fetch timeout in seconds.
    #[arg(long, env = "SKYBRIEF_DOWNLOAD_TIMEOUT", default_value_t = 60)]
    download_timeout: u64,

    /// Generation call timeout in seconds.
    #[arg(long, env = "SKYBRIEF_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Disable the progress display.
    #[arg(long, env = "SKYBRIEF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SKYBRIEF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the briefing and errors.
    #[arg(short, long, env = "SKYBRIEF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar carries the per-chart feedback, so INFO-level library
    // logs are suppressed while it is active.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgress::new() as Arc<dyn BriefingProgress>)
    } else {
        None
    };

    let config = build_config(&cli, progress).await?;

    // ── Run the briefing ─────────────────────────────────────────────────
    let summary = brief(&config).await.context("Briefing failed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if !cli.quiet && show_progress {
        eprintln!("{}", cyan("--- briefing ---"));
    }
    handle
        .write_all(summary.as_bytes())
        .context("Failed to write to stdout")?;
    // Ensure a trailing newline on stdout.
    if !summary.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }

    Ok(())
}

/// Map CLI args to `BriefingConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BriefingConfig> {
    let mut builder = BriefingConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref url) = cli.forecast_url {
        builder = builder.forecast_url(url.as_str());
    }

    if let Some(ref model) = cli.model {
        builder = builder.model(model.as_str());
    }

    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.as_str());
    }

    if let Some(ref path) = cli.resources {
        let body = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read resource list from {path:?}"))?;
        let resources: Vec<Resource> = serde_json::from_str(&body)
            .with_context(|| format!("{path:?} is not a JSON array of URLs"))?;
        builder = builder.resources(resources);
    }

    if let Some(ref path) = cli.prompt_file {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt template from {path:?}"))?;
        builder = builder.prompt_template(template);
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
