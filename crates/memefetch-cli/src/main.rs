//! memefetch CLI - newest Know Your Meme submissions from the command line

mod mcp;

use clap::{Parser, Subcommand};
use memefetch::{summarize, AnalyzedMeme, SummaryOutcome, Tool, DEFAULT_LIMIT, TOOL_LLMTXT};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// memefetch - agent-friendly meme scraper
#[derive(Parser, Debug)]
#[command(name = "memefetch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,

    /// Site origin to scrape
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Request timeout in seconds (client default when omitted)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Also write the JSON output to this file
    #[arg(long, global = true)]
    save: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the newest memes
    Newest {
        /// Maximum number of memes
        #[arg(long, short, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Return the raw listing HTML when nothing matches
        #[arg(long)]
        include_html_on_empty: bool,
    },
    /// Fetch the HTML of one meme page
    Details {
        /// Absolute URL or site path such as /memes/doge
        url: String,
    },
    /// Dispatch an action with JSON parameters, as an agent would
    Call {
        /// get_newest_memes or get_meme_details
        action: String,

        /// Parameters as a JSON object, e.g. '{"limit": 3}'
        params: Option<String>,
    },
    /// Print tool definitions for function-calling frameworks
    Schema,
    /// Fetch the newest memes, then their pages, and report page insights
    Digest {
        /// Maximum number of memes
        #[arg(long, short, default_value_t = 3)]
        limit: usize,
    },
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
}

/// Digest output: per-meme insights and the summary
#[derive(Debug, Serialize)]
struct DigestReport {
    memes: Vec<AnalyzedMeme>,
    summary: SummaryOutcome,
}

#[tokio::main]
async fn main() {
    // stdout carries JSON, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    let tool = build_tool(&cli);

    match cli.command {
        Some(Commands::Newest {
            limit,
            include_html_on_empty,
        }) => {
            let outcome = if include_html_on_empty {
                tool.get_newest_memes_with_html(limit).await
            } else {
                tool.get_newest_memes(limit).await
            };
            emit(&outcome, cli.save.as_ref());
        }
        Some(Commands::Details { url }) => {
            let result = tool.get_meme_details(&url).await;
            emit(&result, cli.save.as_ref());
        }
        Some(Commands::Call { action, params }) => {
            let params = parse_params(params.as_deref()).unwrap_or_else(|| {
                eprintln!("Error: params must be a valid JSON string");
                std::process::exit(1);
            });
            let response = tool.dispatch(&action, &params).await;
            emit(&response, cli.save.as_ref());
        }
        Some(Commands::Schema) => {
            emit(&tool.tool_definitions(), cli.save.as_ref());
        }
        Some(Commands::Digest { limit }) => {
            let report = run_digest(&tool, limit).await;
            emit(&report, cli.save.as_ref());
        }
        Some(Commands::Mcp) => {
            mcp::run_server(tool).await;
        }
        None => {
            eprintln!("Usage: memefetch newest [--limit N]");
            eprintln!("   or: memefetch details <URL>");
            eprintln!("   or: memefetch call <ACTION> [PARAMS_JSON]");
            eprintln!("   or: memefetch mcp");
            eprintln!("   or: memefetch --help");
            std::process::exit(1);
        }
    }
}

fn build_tool(cli: &Cli) -> Tool {
    let mut builder = Tool::builder();
    if let Some(ref origin) = cli.origin {
        builder = builder.origin(origin);
    }
    if let Some(ref ua) = cli.user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(secs) = cli.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// Parse optional JSON params; absent means an empty object
fn parse_params(raw: Option<&str>) -> Option<Value> {
    match raw {
        None => Some(Value::Object(Default::default())),
        Some(raw) => serde_json::from_str(raw).ok(),
    }
}

/// Listing, then each page in turn; failed pages are skipped
async fn run_digest(tool: &Tool, limit: usize) -> DigestReport {
    let outcome = tool.get_newest_memes(limit).await;
    if let Some(err) = outcome.error() {
        warn!(error = err, "listing failed");
    }

    let mut memes = Vec::new();
    for meme in outcome.memes() {
        let page = tool.get_meme_details(&meme.url).await;
        if let Some(ref err) = page.error {
            warn!(url = %meme.url, error = %err, "skipping page");
            continue;
        }
        memes.push(AnalyzedMeme::new(meme, &page));
    }

    let summary = summarize(&memes);
    DigestReport { memes, summary }
}

/// Print pretty JSON and optionally persist it
fn emit<T: Serialize>(value: &T, save: Option<&PathBuf>) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing response: {}", e);
        std::process::exit(1);
    });
    if let Some(path) = save {
        if let Err(e) = std::fs::write(path, &json) {
            eprintln!("Error writing {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
    writeln_safe(&json);
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
