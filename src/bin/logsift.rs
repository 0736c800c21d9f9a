use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logsift::analyzer::{load_file, LogAnalyzer};
use logsift::chunking::split_into_chunks;
use logsift::oracle::CommandOracle;
use logsift::progress::LoggingProgress;
use logsift::sections;
use logsift::AnalyzerConfig;

#[derive(Parser, Debug)]
#[command(name = "logsift", version, about = "Chunked, AI-assisted log analysis with cross-file line matching")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Command that answers prompts: reads the prompt on stdin, writes the response to stdout.
    /// Falls back to $LOGSIFT_ORACLE_CMD.
    #[arg(long = "oracle-cmd", global = true)]
    oracle_cmd: Option<String>,

    /// Byte threshold per chunk
    #[arg(long = "chunk-max-bytes", global = true)]
    chunk_max_bytes: Option<usize>,
    /// Line threshold per chunk
    #[arg(long = "chunk-max-lines", global = true)]
    chunk_max_lines: Option<usize>,
    /// Concurrent chunk requests
    #[arg(long = "concurrency", global = true)]
    concurrency: Option<usize>,

    /// Output format for analysis results
    #[arg(long = "format", value_enum, default_value_t = Format::Json, global = true)]
    format: Format,

    /// Log level: trace | debug | info | warn | error
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,
    /// Shorthand for --log-level debug
    #[arg(long = "verbose", short = 'v', default_value_t = false, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Analyze one log file
    Analyze { file: PathBuf },
    /// Analyze several log files and report what they share
    Compare {
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,
    },
    /// Exact line matches across files (offline)
    Matches {
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,
    },
    /// Show how a file would be chunked (offline)
    Chunks { file: PathBuf },
    /// Parse a saved oracle response (`-` for stdin)
    Parse {
        #[arg(default_value = "-")]
        input: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

fn init_logging(cli: &Cli) {
    let level = if let Some(l) = &cli.log_level {
        l.to_lowercase()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        "warn".to_string()
    };
    let mut filter = EnvFilter::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        if let Ok(directive) = format!("logsift={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init();
}

fn build_config(cli: &Cli) -> anyhow::Result<AnalyzerConfig> {
    let mut cfg = AnalyzerConfig::from_env()?;
    if let Some(b) = cli.chunk_max_bytes {
        cfg.chunk_limits.max_bytes = b;
    }
    if let Some(l) = cli.chunk_max_lines {
        cfg.chunk_limits.max_lines = l;
    }
    if let Some(c) = cli.concurrency {
        cfg.concurrency = c;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_analyzer(cli: &Cli, cfg: AnalyzerConfig) -> anyhow::Result<LogAnalyzer> {
    let cmd = cli.oracle_cmd.clone().or_else(|| std::env::var("LOGSIFT_ORACLE_CMD").ok());
    let Some(cmd) = cmd else {
        bail!("no oracle configured; pass --oracle-cmd or set LOGSIFT_ORACLE_CMD");
    };
    let oracle = CommandOracle::from_command_line(&cmd).context("empty --oracle-cmd")?;
    Ok(LogAnalyzer::new(cfg).with_oracle(Arc::new(oracle)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    let cfg = build_config(&cli)?;

    match &cli.command {
        Cmd::Analyze { file } => {
            let analyzer = build_analyzer(&cli, cfg)?;
            let out = analyzer.analyze_file(file, &LoggingProgress)?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&out)?),
                Format::Markdown => print!("{}", sections::render(&out.analysis)),
            }
        }
        Cmd::Compare { files } => {
            let analyzer = build_analyzer(&cli, cfg)?;
            let out = analyzer.compare_files(files.as_slice(), &LoggingProgress)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Cmd::Matches { files } => {
            let analyzer = LogAnalyzer::new(cfg);
            let out = analyzer.match_files(files.as_slice())?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Cmd::Chunks { file } => {
            let loaded = load_file(file)?;
            let plan: Vec<serde_json::Value> = split_into_chunks(&loaded.content, &cfg.chunk_limits)
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    serde_json::json!({
                        "chunk": i + 1,
                        "start": c.line_range.start,
                        "end": c.line_range.end,
                        "lines": c.line_range.len(),
                        "bytes": c.content.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Cmd::Parse { input } => {
            let text = if input == "-" {
                let mut s = String::new();
                io::stdin().read_to_string(&mut s)?;
                s
            } else {
                load_file(&PathBuf::from(input))?.content
            };
            let out = sections::parse_analysis(&text);
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&out)?),
                Format::Markdown => print!("{}", sections::render(&out)),
            }
        }
    }
    Ok(())
}
