//! CLI binary for infopage.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, runs one operation, and prints JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use infopage::{
    extraction_prompt, full_schema, section_schema, ClientConfig, InfographicClient,
    InfographicResult, Intent, PromptSet, SectionKey,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract an informational one-pager (stdout)
  infopage extract report.pdf

  # Sales framing, written to a file
  infopage extract brochure.pdf --intent selling -o brochure.json

  # Rewrite one section of a saved result
  infopage revise brochure.json --section quote --instruction "make it punchier"

  # Show what the model is asked for
  infopage schema --section chartData
  infopage prompt --intent project-wrapup

ENVIRONMENT VARIABLES:
  OPENROUTER_API_KEY    OpenRouter API key (required for extract/revise)
  INFOPAGE_MODEL        Default model ID (default: google/gemini-2.5-flash)
  OPENROUTER_BASE_URL   Endpoint base URL (default: https://openrouter.ai/api/v1)
"#;

/// Turn PDF and text documents into structured infographic content.
#[derive(Parser, Debug)]
#[command(
    name = "infopage",
    version,
    about = "Turn PDF and text documents into structured infographic content",
    long_about = "Send a PDF or text document to a hosted LLM (via OpenRouter) and get back \
the title, stats, chart data, takeaways, quote and topics of a one-page infographic as JSON. \
Individual sections can be regenerated from a natural-language instruction.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Per-call timeout in seconds.
    #[arg(long, global = true, env = "INFOPAGE_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Retries on transient failures (connection errors, 429, 5xx).
    #[arg(long, global = true, env = "INFOPAGE_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "INFOPAGE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "INFOPAGE_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a full infographic from a document.
    Extract {
        /// PDF or TXT file.
        input: PathBuf,

        /// Narrative framing: informational, selling, project-wrapup.
        #[arg(long, default_value = "informational", value_parser = parse_intent)]
        intent: Intent,

        /// Model ID (e.g. google/gemini-2.5-flash, openai/gpt-4.1-mini).
        #[arg(long)]
        model: Option<String>,

        /// Text file replacing the whole system prompt for the chosen intent.
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// Write JSON to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON output.
        #[arg(long)]
        compact: bool,
    },

    /// Regenerate one section of a saved result.
    Revise {
        /// JSON file produced by `extract`.
        result: PathBuf,

        /// Section key, e.g. title, quote, chartData.
        #[arg(long)]
        section: String,

        /// What to change.
        #[arg(long)]
        instruction: String,

        /// Model ID.
        #[arg(long)]
        model: Option<String>,

        /// Write the updated result here (default: overwrite RESULT).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the JSON schema sent to the model.
    Schema {
        /// Only this section's schema.
        #[arg(long)]
        section: Option<String>,
    },

    /// Print the default extraction prompt for an intent.
    Prompt {
        #[arg(long, default_value = "informational", value_parser = parse_intent)]
        intent: Intent,
    },
}

fn parse_intent(s: &str) -> Result<Intent, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters in normal runs, so
    // library logs stay at warn unless --verbose.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Schema { section } => {
            let schema = match section {
                Some(name) => {
                    let key: SectionKey = name.parse().context("Unknown section")?;
                    section_schema(key)
                }
                None => full_schema(),
            };
            println!("{}", serde_json::to_string_pretty(schema)?);
        }

        Command::Prompt { intent } => {
            println!("{}", extraction_prompt(*intent));
        }

        Command::Extract {
            input,
            intent,
            model,
            prompt_file,
            output,
            compact,
        } => {
            let mut prompts = PromptSet::new();
            if let Some(path) = prompt_file {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read prompt from {:?}", path))?;
                prompts = prompts.with_override(*intent, text);
            }
            let client = build_client(&cli, prompts)?;

            let spinner = spinner(cli.quiet, format!("Analyzing {}", input.display()));
            let result = client
                .extract_file(input, model.as_deref(), *intent)
                .await;
            spinner.finish_and_clear();
            let result = result.context("Extraction failed")?;

            if !cli.quiet {
                for note in result.advisories() {
                    eprintln!("{} {}", yellow("⚠"), note);
                }
            }

            let json = if *compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            emit(&json, output.as_deref()).await?;

            if !cli.quiet {
                eprintln!(
                    "{} {}  {}",
                    green("✔"),
                    bold(&result.title),
                    dim(&format!("({intent})"))
                );
            }
        }

        Command::Revise {
            result: result_path,
            section,
            instruction,
            model,
            output,
        } => {
            let key: SectionKey = section.parse().context("Unknown section")?;
            let text = tokio::fs::read_to_string(result_path)
                .await
                .with_context(|| format!("Failed to read {:?}", result_path))?;
            let mut result: InfographicResult = serde_json::from_str(&text)
                .with_context(|| format!("{:?} is not an infographic result", result_path))?;

            let client = build_client(&cli, PromptSet::new())?;

            let spinner = spinner(cli.quiet, format!("Revising {key}"));
            let revised = client
                .revise_in_place(&mut result, key, instruction, model.as_deref())
                .await;
            spinner.finish_and_clear();
            revised.context("Section revision failed")?;

            let json = serde_json::to_string_pretty(&result)?;
            let target = output.as_deref().unwrap_or(result_path);
            write_atomic(target, &json).await?;

            if !cli.quiet {
                eprintln!(
                    "{} {} updated  →  {}",
                    green("✔"),
                    bold(key.as_str()),
                    target.display()
                );
            }
        }
    }

    Ok(())
}

/// Map global CLI flags to a client.
fn build_client(cli: &Cli, prompts: PromptSet) -> Result<InfographicClient> {
    let base = ClientConfig::from_env().context("Invalid environment configuration")?;
    let mut builder = ClientConfig::builder()
        .base_url(base.base_url)
        .model(base.model)
        .prompts(prompts)
        .api_timeout_secs(cli.api_timeout)
        .max_retries(cli.max_retries);
    if let Some(key) = base.api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build().context("Invalid configuration")?;
    InfographicClient::new(config).context("Failed to create client")
}

fn spinner(quiet: bool, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Print to stdout, or write atomically to `path`.
async fn emit(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => write_atomic(p, json).await,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .context("Failed to write to stdout")?;
            handle.write_all(b"\n").ok();
            Ok(())
        }
    }
}

/// Write to a temp file next to `path`, then rename over it.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, format!("{contents}\n"))
        .await
        .with_context(|| format!("Failed to write {:?}", tmp))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
