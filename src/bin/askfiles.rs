//! CLI binary for askfiles.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `QueryConfig` plus an `Action` and prints per-page answers.

use anyhow::{Context, Result};
use askfiles::{
    ask_path, Action, QueryConfig, QueryOutput, QueryProgressCallback, DISCLAIMER,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar's length is set by `on_query_start` once the page count is
    /// known (after normalization).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading document…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl QueryProgressCallback for CliProgressCallback {
    fn on_query_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Asking");
    }

    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, answer_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(&format!("{answer_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let msg = truncate_for_display(error, 79);
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total_pages,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_query_complete(&self, total_pages: usize, answered_count: usize) {
        self.bar.finish_and_clear();
        let failed = total_pages.saturating_sub(answered_count);
        if failed == 0 {
            eprintln!(
                "{} {} pages answered",
                green("✔"),
                bold(&answered_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages answered  ({} failed)",
                cyan("⚠"),
                bold(&answered_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

/// Truncate a one-line error message to at most `max_chars` characters,
/// appending an ellipsis. Counts characters, not bytes, so multi-byte
/// text from provider error bodies never splits mid-character.
fn truncate_for_display(error: &str, max_chars: usize) -> String {
    let mut chars = error.char_indices();
    match chars.nth(max_chars) {
        Some((byte_idx, _)) => format!("{}\u{2026}", &error[..byte_idx]),
        None => error.to_string(),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Free-text question about an image of notes
  askfiles --ask "What does the second paragraph say?" notes.jpg

  # Transcribe every page of a PDF
  askfiles --extract-text lecture.pdf

  # Canned study helpers
  askfiles --topics chapter3.pdf
  askfiles --questionnaire chapter3.pdf
  askfiles --formulas physics_notes.png

  # Several files in one run, JSON output
  askfiles --ask "Summarise this page" --json a.pdf b.webp > answers.json

  # From a URL, with an explicit model
  askfiles --provider gemini --model gemini-1.5-flash-8b \
      --extract-text https://example.com/scan.pdf

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  ASKFILES_PROVIDER       Override provider (gemini, openai, anthropic, ollama)
  ASKFILES_MODEL          Override model ID
  PDFIUM_LIB_PATH         Path to an existing libpdfium copy
"#;

/// Ask questions about images and PDFs of your notes using vision LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "askfiles",
    version,
    about = "Ask questions about images and PDFs of your notes using vision LLMs",
    long_about = "Upload images (JPEG, PNG, WebP) or PDFs of handwritten or printed notes and \
ask a multimodal model about every page: free-text questions, verbatim transcription, topic \
lists, quizzes, or formula extraction.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Files or HTTP/HTTPS URLs to ask about (jpg, jpeg, png, webp, pdf).
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Free-text instruction sent to the model for every page.
    #[arg(long, group = "action")]
    ask: Option<String>,

    /// Transcribe each page verbatim (default when no action is given).
    #[arg(long, group = "action")]
    extract_text: bool,

    /// List the topics on each page with one-line descriptions.
    #[arg(long, group = "action")]
    topics: bool,

    /// Turn each page into a short quiz with answers.
    #[arg(long, group = "action")]
    questionnaire: bool,

    /// List only the formulas on each page.
    #[arg(long, group = "action")]
    formulas: bool,

    /// Model ID (e.g. gemini-1.5-flash-8b, gpt-4.1-nano).
    #[arg(long, env = "ASKFILES_MODEL")]
    model: Option<String>,

    /// Provider: gemini, openai, anthropic, ollama, azure.
    #[arg(
        long,
        env = "ASKFILES_PROVIDER",
        long_help = "Vision model provider. Auto-detected from API key env vars if not set \
            (GEMINI_API_KEY is preferred)."
    )]
    provider: Option<String>,

    /// Maximum rendered page dimension in pixels.
    #[arg(long, env = "ASKFILES_MAX_PIXELS", default_value_t = 2000)]
    max_pixels: u32,

    /// Max model output tokens per page.
    #[arg(long, env = "ASKFILES_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "ASKFILES_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Output structured JSON instead of formatted text.
    #[arg(long, env = "ASKFILES_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "ASKFILES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ASKFILES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except answers and errors.
    #[arg(short, long, env = "ASKFILES_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "ASKFILES_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

impl Cli {
    fn action(&self) -> Action {
        if let Some(ref text) = self.ask {
            Action::Ask(text.clone())
        } else if self.topics {
            Action::ExploreTopics
        } else if self.questionnaire {
            Action::GenerateQuestionnaire
        } else if self.formulas {
            Action::CollectFormulas
        } else if self.extract_text {
            Action::ExtractText
        } else {
            // No action flag given: transcription is the default.
            Action::ExtractText
        }
    }
}

/// One input's results, for `--json` output.
#[derive(Serialize)]
struct InputReport<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<QueryOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let action = cli.action();
    let mut failures = 0usize;
    let mut reports: Vec<InputReport> = Vec::with_capacity(cli.inputs.len());

    for input in &cli.inputs {
        let progress = if show_progress {
            Some(CliProgressCallback::new_dynamic())
        } else {
            None
        };

        let mut builder = QueryConfig::builder()
            .max_rendered_pixels(cli.max_pixels)
            .max_tokens(cli.max_tokens)
            .temperature(cli.temperature)
            .download_timeout_secs(cli.download_timeout);

        if let Some(ref model) = cli.model {
            builder = builder.model(model.clone());
        }
        if let Some(ref provider) = cli.provider {
            builder = builder.provider_name(provider.clone());
        }
        if let Some(cb) = progress {
            builder = builder.progress_callback(cb);
        }
        let config = builder.build().context("Invalid configuration")?;

        if !cli.quiet && !cli.json && cli.inputs.len() > 1 {
            eprintln!("{} {}", cyan("◆"), bold(input));
        }

        match ask_path(input, &action, &config).await {
            Ok(output) => {
                if cli.json {
                    reports.push(InputReport {
                        input,
                        output: Some(output),
                        error: None,
                    });
                } else {
                    print_answers(input, &output, cli.quiet)?;
                }
            }
            Err(e) => {
                // One bad file must not abort the rest of the batch.
                failures += 1;
                if cli.json {
                    reports.push(InputReport {
                        input,
                        output: None,
                        error: Some(e.to_string()),
                    });
                } else {
                    eprintln!("{} {}: {}", red("✘"), input, e);
                }
            }
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&reports).context("Failed to serialise output")?;
        println!("{json}");
    }

    if failures > 0 && failures == cli.inputs.len() {
        anyhow::bail!("all {failures} inputs failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_error_passes_through_untouched() {
        assert_eq!(truncate_for_display("HTTP 503", 79), "HTTP 503");
    }

    #[test]
    fn long_error_is_truncated_with_ellipsis() {
        let error = "x".repeat(200);
        let msg = truncate_for_display(&error, 79);
        assert_eq!(msg.chars().count(), 80);
        assert!(msg.ends_with('\u{2026}'));
    }

    #[test]
    fn truncation_never_splits_a_multibyte_character() {
        // Provider error bodies carry curly quotes and accented text; the
        // cut must land on a char boundary regardless of byte layout.
        let error = format!("model call failed: {}", "é’…".repeat(40));
        let msg = truncate_for_display(&error, 79);
        assert_eq!(msg.chars().count(), 80);
        assert!(msg.ends_with('\u{2026}'));

        let exactly_at_limit = "ü".repeat(79);
        assert_eq!(truncate_for_display(&exactly_at_limit, 79), exactly_at_limit);
    }

    #[test]
    fn action_flags_map_explicitly() {
        fn cli(args: &[&str]) -> Cli {
            Cli::parse_from(std::iter::once("askfiles").chain(args.iter().copied()))
        }

        assert_eq!(cli(&["--extract-text", "a.pdf"]).action(), Action::ExtractText);
        assert_eq!(cli(&["a.pdf"]).action(), Action::ExtractText);
        assert_eq!(cli(&["--topics", "a.pdf"]).action(), Action::ExploreTopics);
        assert_eq!(
            cli(&["--questionnaire", "a.pdf"]).action(),
            Action::GenerateQuestionnaire
        );
        assert_eq!(cli(&["--formulas", "a.pdf"]).action(), Action::CollectFormulas);
        assert_eq!(
            cli(&["--ask", "what is this?", "a.pdf"]).action(),
            Action::Ask("what is this?".into())
        );
    }
}

/// Print one input's per-page answers as formatted text.
fn print_answers(input: &str, output: &QueryOutput, quiet: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for answer in &output.answers {
        if output.answers.len() > 1 {
            writeln!(handle, "\n{}", bold(&format!("── page {} ──", answer.page_num)))?;
        }
        writeln!(handle, "{}", answer.result.as_str())?;
    }

    if !quiet {
        eprintln!("{}", dim(DISCLAIMER));
        eprintln!(
            "   {}: {}/{} pages answered in {}ms",
            dim(input),
            output.stats.answered_pages,
            output.stats.total_pages,
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}
