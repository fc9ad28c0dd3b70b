use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use command_parser::{
    load_config_file, lower_to_strings, CommandParser, ContextMemory, MetricsHub, ParseResult,
    ParserConfig, SessionRegistry,
};
use directive_dispatch::{dispatch, RecordingSink};

#[derive(Parser, Debug)]
#[command(
    name = "sr-directive",
    version,
    about = "Compile operator utterances into instruction tokens",
    disable_help_subcommand = true
)]
struct Cli {
    /// Parser config (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print Prometheus counters to stderr before exiting
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse an utterance into command descriptors
    Parse {
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
        /// Emit JSON instead of one descriptor per line
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
        /// Also show the normalized text and clauses
        #[arg(long, action = ArgAction::SetTrue)]
        explain: bool,
    },
    /// Parse and lower an utterance, one token per line
    Lower {
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },
    /// Read utterances from stdin against one session context
    Session {
        /// Emit one JSON object per utterance
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Dry-run dispatch through an in-memory sink, honouring waits
    Dispatch {
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },
    /// List lexicon entries (built-in plus configured)
    Lexicon,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => ParserConfig::default(),
    };
    let parser = Arc::new(CommandParser::new(config).context("building parser")?);
    let metrics = MetricsHub::new().map_err(anyhow::Error::msg)?;
    info!(
        lexicon_entries = parser.normalizer().lexicon().len(),
        "parser ready"
    );

    match cli.command {
        Commands::Parse {
            utterance,
            json,
            explain,
        } => {
            let mut context = ContextMemory::default();
            let result = parser.analyze(&utterance.join(" "), &mut context);
            record(&metrics, &result);
            warn_low_confidence(&parser, &result);
            print_parse(&result, json, explain)?;
        }
        Commands::Lower { utterance } => {
            let mut context = ContextMemory::default();
            let result = parser.analyze(&utterance.join(" "), &mut context);
            record(&metrics, &result);
            for token in lower_to_strings(&result.descriptors) {
                println!("{token}");
            }
        }
        Commands::Session { json } => run_session(parser.clone(), &metrics, json)?,
        Commands::Dispatch { utterance } => {
            let mut context = ContextMemory::default();
            let result = parser.analyze(&utterance.join(" "), &mut context);
            record(&metrics, &result);
            warn_low_confidence(&parser, &result);
            let tokens = result.tokens();
            let mut sink = RecordingSink::new("dry-run");
            let report = dispatch(&tokens, &mut sink).await?;
            for sent in sink.sent() {
                let at = sent
                    .at
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_else(|_| sent.at.to_string());
                println!("{at}\t{}", sent.token);
            }
            info!(
                sent = report.sent,
                skipped = report.skipped,
                waited_ms = report.waited.as_millis() as u64,
                halted = report.halted,
                "dispatch finished"
            );
        }
        Commands::Lexicon => {
            for entry in parser.normalizer().lexicon().entries() {
                println!("{}\t{}", entry.source, entry.canonical);
            }
        }
    }

    if cli.metrics {
        eprint!("{}", metrics.encode_text());
    }
    Ok(())
}

fn setup_tracing() {
    // Best-effort; logs go to stderr so token output stays pipeable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn record(metrics: &MetricsHub, result: &ParseResult) {
    metrics.record(result, result.tokens().len());
}

fn warn_low_confidence(parser: &CommandParser, result: &ParseResult) {
    let threshold = parser.config().confidence_threshold;
    for d in result.descriptors.iter().filter(|d| !d.is_unknown()) {
        if !d.is_confident(threshold) {
            warn!(raw = %d.raw, confidence = d.confidence, threshold, "low-confidence command");
        }
    }
}

fn print_parse(result: &ParseResult, json: bool, explain: bool) -> Result<()> {
    if json {
        let out = if explain {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string_pretty(&result.descriptors)?
        };
        println!("{out}");
        return Ok(());
    }
    if explain {
        println!("normalized: {}", result.normalized);
        for (i, clause) in result.clauses.iter().enumerate() {
            println!("clause {i}: {clause}");
        }
    }
    for d in &result.descriptors {
        println!(
            "{:.2}\t{}\t{}",
            d.confidence,
            serde_json::to_string(&d.command)?,
            d.raw
        );
    }
    Ok(())
}

fn run_session(parser: Arc<CommandParser>, metrics: &MetricsHub, json: bool) -> Result<()> {
    let registry = SessionRegistry::new(parser.clone());
    let session = registry.open();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let result = session.parse(&line);
        record(metrics, &result);
        warn_low_confidence(&parser, &result);
        if json {
            let tokens = lower_to_strings(&result.descriptors);
            let out = serde_json::json!({
                "utterance": result.utterance,
                "tokens": tokens,
                "context": session.snapshot(),
            });
            writeln!(stdout, "{out}")?;
        } else {
            writeln!(stdout, "{}", lower_to_strings(&result.descriptors).join(" "))?;
        }
    }
    registry.close(&session.id());
    Ok(())
}
