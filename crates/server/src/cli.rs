//! CLI argument parsing and subcommand dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lexis_core::{Config, DocumentMeta, RawDocument};
use lexis_ingest::{FileTextExtractor, TextExtractor};
use lexis_llm::AnalysisType;
use lexis_rag::normalize::normalize_with_limit;
use lexis_rag::{chunk, AnalysisService, ReportKind};
use tracing::{info, warn};

use crate::router::build_router;
use crate::state::AppState;

/// Legal document analysis: HTTP server and one-shot tools.
#[derive(Parser, Debug)]
#[command(name = "lexis-server", version, about = "Legal document analysis server")]
pub struct CliArgs {
    /// Server options, also honoured when no command is given
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Refuse to start without AI credentials
    #[arg(long, env = "LEXIS_REQUIRE_AI")]
    pub require_ai: bool,

    /// Port override (defaults to PORT / 4004)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default when no command is given)
    Serve(ServeArgs),

    /// Analyze a document and print a report
    Analyze {
        file: PathBuf,

        /// comprehensive, summary, clauses or parties
        #[arg(long = "type", default_value = "comprehensive")]
        analysis_type: String,

        /// simplified or full
        #[arg(long, default_value = "simplified")]
        report: String,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the structured outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a question about a document
    Ask { file: PathBuf, question: String },

    /// Show how a document is chunked
    Chunks {
        file: PathBuf,

        /// Chunk size in characters (defaults to CHUNK_SIZE / 1000)
        #[arg(long)]
        size: Option<usize>,
    },
}

pub async fn dispatch(config: Config, args: CliArgs) -> anyhow::Result<()> {
    let Some(command) = args.command else {
        return serve(config, args.serve).await;
    };
    match command {
        Command::Serve(serve_args) => serve(config, serve_args).await,
        Command::Analyze {
            file,
            analysis_type,
            report,
            out,
            json,
        } => {
            analyze(
                &config,
                &file,
                AnalysisType::parse(&analysis_type),
                ReportKind::parse(&report),
                out.as_deref(),
                json,
            )
            .await
        }
        Command::Ask { file, question } => ask(&config, &file, &question).await,
        Command::Chunks { file, size } => chunks(&config, &file, size).await,
    }
}

async fn serve(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    if args.require_ai {
        config.require_ai()?;
    } else if !config.ai.is_configured() {
        warn!(
            "No API key for AI provider '{}'; serving fallback analyses only",
            config.ai.provider
        );
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.log_summary();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("md") => "text/markdown",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "text/plain",
    }
}

/// Read and extract a local file. Returns the file name and its text.
async fn read_document(path: &Path) -> anyhow::Result<(String, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    let raw = RawDocument::new(bytes, mime_for(path), &file_name);
    let extracted = tokio::task::spawn_blocking(move || FileTextExtractor.extract(&raw)).await??;
    info!(
        "Extracted '{}': {} chars",
        file_name,
        extracted.text.chars().count()
    );
    Ok((file_name, extracted.text))
}

fn title_of(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

async fn analyze(
    config: &Config,
    path: &Path,
    analysis_type: AnalysisType,
    kind: ReportKind,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let (file_name, text) = read_document(path).await?;
    let service = AnalysisService::from_config(config);
    let outcome = service.analyze(&text, analysis_type).await;

    for degradation in &outcome.degradations {
        warn!("degraded: {:?}", degradation);
    }

    let rendered = if json {
        serde_json::to_string_pretty(&outcome)?
    } else {
        let meta = DocumentMeta::new(title_of(&file_name), &text);
        service.assemble_report(&outcome.report, &meta, kind)
    };

    match out {
        Some(out) => {
            tokio::fs::write(out, rendered)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!("Report written to {}", out.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

async fn ask(config: &Config, path: &Path, question: &str) -> anyhow::Result<()> {
    let (_, text) = read_document(path).await?;
    let service = AnalysisService::from_config(config);
    let answer = service.answer(None, &text, question).await;

    println!("{}", answer.answer);
    println!();
    println!("Confidence: {:.2}", answer.confidence);
    println!("Sources:    {}", answer.sources.join(", "));
    println!("Engine:     {}", answer.engine);
    for degradation in &answer.degradations {
        println!("Degraded:   {degradation:?}");
    }
    Ok(())
}

async fn chunks(config: &Config, path: &Path, size: Option<usize>) -> anyhow::Result<()> {
    let (file_name, text) = read_document(path).await?;
    let size = size.unwrap_or(config.analysis.chunk_size);
    let normalized = normalize_with_limit(&text, config.analysis.max_text_chars);
    let chunks = chunk(&normalized, size);

    println!("{file_name}: {} chunks (size {size})", chunks.len());
    for c in &chunks {
        println!("[{}] offset={} len={}", c.index, c.char_offset, c.length);
        println!("    {}", c.text);
    }
    Ok(())
}
