use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use stratintel::config::{self, Config};
use stratintel::markup::{complete_utf8_prefix, DocumentTracker, MarkupParser};
use stratintel::output;
use stratintel::scoring::{self, PartnerProfile, ScoringInput};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_NO_DOCUMENT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the Success Probability Index and ethical safeguards for an engagement
    Score {
        /// YAML engagement description (`-` for stdin)
        input: String,
    },
    /// Run only the ethical safeguard rules for an engagement
    Ethics {
        /// YAML engagement description (`-` for stdin)
        input: String,
    },
    /// Rate one partner profile or rank a list of them
    Rate {
        /// YAML partner profile or list of profiles (`-` for stdin)
        profiles: String,
    },
    /// Parse a report markup document
    Parse {
        /// Markup source (`-` for stdin)
        #[arg(default_value = "-")]
        source: String,
    },
    /// Parse a report as it arrives, printing each section once it completes
    Stream {
        /// Markup source (`-` for stdin)
        #[arg(default_value = "-")]
        source: String,

        /// Bytes read per chunk
        #[arg(long, default_value_t = 256)]
        chunk_size: usize,
    },
}

#[derive(Parser, Debug)]
#[command(name = "stratintel")]
#[command(about = "Engagement scoring and report markup parsing", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score adjustments
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/stratintel/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    spi: &'a scoring::ScoreResult,
    ethics: &'a scoring::EthicalCheckResult,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = stratintel::telemetry::init(stratintel::telemetry::default_level(cli.verbose)) {
        eprintln!("Logging setup failed: {}", e);
    }

    // Load config
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    if let Err(errors) = scoring::validate_scoring(&config.scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match run(&cli, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_INPUT
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli, config: &Config) -> Result<i32> {
    let use_colors = !cli.json && output::should_use_colors();

    match &cli.command {
        Commands::Score { input } => {
            let input: ScoringInput = config::load_yaml(input)?;
            let spi = scoring::compute_score(&input, &config.scoring);
            let ethics = scoring::check_ethical_safeguards(&input, &config.scoring);
            info!(composite = spi.composite_score, risk = ethics.risk_score, "scored engagement");

            if cli.json {
                print_json(&ScoreReport {
                    spi: &spi,
                    ethics: &ethics,
                })?;
            } else {
                println!("{}", output::format_score_result(&spi, cli.verbose, use_colors));
                println!();
                println!("{}", output::format_ethics(&ethics, use_colors));
            }
        }
        Commands::Ethics { input } => {
            let input: ScoringInput = config::load_yaml(input)?;
            let ethics = scoring::check_ethical_safeguards(&input, &config.scoring);

            if cli.json {
                print_json(&ethics)?;
            } else {
                println!("{}", output::format_ethics(&ethics, use_colors));
            }
        }
        Commands::Rate { profiles } => {
            let profiles = load_profiles(profiles)?;
            debug!(count = profiles.len(), "loaded partner profiles");
            let ranked = scoring::rank_partners(&profiles, &config.scoring);

            if cli.json {
                print_json(&ranked)?;
            } else if cli.verbose {
                for score in &ranked {
                    println!("{}", output::format_partner_detail(score, use_colors));
                    println!();
                }
            } else {
                println!("{}", output::format_partner_table(&ranked, use_colors));
            }
        }
        Commands::Parse { source } => {
            let raw = config::read_source(source)?;
            let parser = MarkupParser::new(config.markup.namespace.as_str());

            let Some(doc) = parser.parse(&raw) else {
                warn!(bytes = raw.len(), "no complete document in input");
                eprintln!("No complete document yet (missing title or finished section).");
                return Ok(EXIT_NO_DOCUMENT);
            };

            info!(
                sections = doc.sections.len(),
                paragraphs = doc.paragraph_count(),
                "parsed document"
            );
            if cli.json {
                print_json(&doc)?;
            } else {
                println!("{}", output::format_document(&doc, use_colors));
            }
        }
        Commands::Stream { source, chunk_size } => {
            let parser = MarkupParser::new(config.markup.namespace.as_str());
            return stream_document(source, (*chunk_size).max(1), parser, cli.json, use_colors);
        }
    }

    Ok(EXIT_SUCCESS)
}

/// Accept either a single profile or a list of profiles.
fn load_profiles(path: &str) -> Result<Vec<PartnerProfile>> {
    let content = config::read_source(path)?;
    if let Ok(list) = serde_saphyr::from_str::<Vec<PartnerProfile>>(&content) {
        return Ok(list);
    }
    let single: PartnerProfile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse partner profiles in {}", path))?;
    Ok(vec![single])
}

fn stream_document(
    source: &str,
    chunk_size: usize,
    parser: MarkupParser,
    json: bool,
    use_colors: bool,
) -> Result<i32> {
    let mut reader: Box<dyn Read> = if source == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(File::open(source).with_context(|| format!("Failed to open {}", source))?)
    };

    let mut tracker = DocumentTracker::new(parser);
    let mut bytes = Vec::new();
    let mut chunk = vec![0u8; chunk_size];

    loop {
        let read = reader.read(&mut chunk).context("Failed to read markup stream")?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);

        let text =
            complete_utf8_prefix(&bytes).context("stream did not contain valid UTF-8")?;

        let delta = tracker.update(text);
        let Some(doc) = tracker.document() else {
            continue;
        };
        debug!(
            new = delta.new_sections.len(),
            changed = delta.changed_sections.len(),
            "stream update"
        );

        if json {
            for &index in &delta.new_sections {
                print_json(&doc.sections[index])?;
            }
            continue;
        }

        if delta.header_changed {
            println!("# {}", doc.title);
            if !doc.subtitle.is_empty() {
                println!("{}", doc.subtitle);
            }
            println!();
        }
        for &index in &delta.new_sections {
            println!("{}", output::format_section(&doc.sections[index], use_colors));
            println!();
        }
    }

    // A character still held back at end of input was truncated
    std::str::from_utf8(&bytes).context("stream did not contain valid UTF-8")?;

    match tracker.document() {
        Some(doc) => {
            info!(
                sections = doc.sections.len(),
                paragraphs = doc.paragraph_count(),
                "stream complete"
            );
            Ok(EXIT_SUCCESS)
        }
        None => {
            eprintln!("Stream ended without a complete document.");
            Ok(EXIT_NO_DOCUMENT)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
