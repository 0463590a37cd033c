//! DeepScope CLI - Main Entry Point
//!
//! Checks claims against the configured evidence sources and prints the
//! verdict reports as JSON on stdout. Logs go to stderr.
//!
//! Usage:
//!     deepscope check "Water boils at 105°C at sea level"
//!     deepscope --config deepscope.json batch claims.json --transcript yt-abc123

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use deepscope_core::{Claim, ExtractedClaim, SourceLocator};
use deepscope_verify::{FactCheckPipeline, VerifyConfig};
use serde::Deserialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "deepscope")]
#[command(about = "Fact-check claims against filings, market data and fact-check sources")]
#[command(version)]
struct Args {
    /// JSON config file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a single claim
    Check {
        /// Claim text
        claim: String,

        /// Category label; inferred from the text when omitted
        #[arg(long)]
        category: Option<String>,
    },

    /// Check a file of extracted claims
    Batch {
        /// JSON array of {"text", "category"} records, or {"claims": [...]}
        path: PathBuf,

        /// Transcript id used in source locators (defaults to the file stem)
        #[arg(long)]
        transcript: Option<String>,
    },
}

/// Claim files come either bare or wrapped the way the extractor emits them
#[derive(Deserialize)]
#[serde(untagged)]
enum ClaimFile {
    Bare(Vec<ExtractedClaim>),
    Wrapped { claims: Vec<ExtractedClaim> },
}

impl ClaimFile {
    fn into_claims(self) -> Vec<ExtractedClaim> {
        match self {
            Self::Bare(claims) | Self::Wrapped { claims } => claims,
        }
    }
}

fn read_claims(path: &Path) -> deepscope::Result<Vec<ExtractedClaim>> {
    let json = std::fs::read_to_string(path)?;
    let file: ClaimFile = serde_json::from_str(&json)?;
    Ok(file.into_claims())
}

fn transcript_id(path: &Path, explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transcript".to_string())
    })
}

fn load_config(path: Option<&Path>) -> deepscope::Result<VerifyConfig> {
    let config = match path {
        Some(path) => VerifyConfig::from_file(path).map_err(deepscope::Error::config)?,
        None => VerifyConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn build_pipeline(config: &VerifyConfig) -> deepscope::Result<FactCheckPipeline> {
    FactCheckPipeline::from_config(config).map_err(deepscope::Error::config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: deepscope panicked");
        eprintln!(
            "  Location: {}",
            panic_info
                .location()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    }));

    let args = Args::parse();
    deepscope::tracing::init_with_filter(&args.log_level);

    info!("DeepScope {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref())?;
    let pipeline = build_pipeline(&config)?;

    let output = match args.command {
        Command::Check { claim, category } => {
            let extracted = ExtractedClaim::new(claim, category.as_deref());
            let claim = Claim::from_extracted(extracted, SourceLocator::detached());
            let outcome = pipeline.check_claim(claim).await;
            serde_json::to_string_pretty(&outcome)?
        }
        Command::Batch { path, transcript } => {
            let claims = read_claims(&path)?;
            let id = transcript_id(&path, transcript);
            info!(transcript = %id, claims = claims.len(), "Checking claim batch");
            let outcome = pipeline.check_transcript(&id, claims).await;
            serde_json::to_string_pretty(&outcome)?
        }
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_category() {
        let args = Args::parse_from([
            "deepscope",
            "check",
            "Apple stock rose 3%",
            "--category",
            "market_data",
        ]);
        match args.command {
            Command::Check { claim, category } => {
                assert_eq!(claim, "Apple stock rose 3%");
                assert_eq!(category.as_deref(), Some("market_data"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_read_claims_accepts_both_shapes() {
        let mut bare = tempfile::NamedTempFile::new().unwrap();
        write!(bare, r#"[{{"text": "GDP grew 2.5%", "category": "Macroeconomic"}}]"#).unwrap();
        let claims = read_claims(bare.path()).unwrap();
        assert_eq!(claims, vec![ExtractedClaim::new("GDP grew 2.5%", Some("Macroeconomic"))]);

        let mut wrapped = tempfile::NamedTempFile::new().unwrap();
        write!(wrapped, r#"{{"claims": [{{"text": "Water boils at 105°C"}}]}}"#).unwrap();
        let claims = read_claims(wrapped.path()).unwrap();
        assert_eq!(claims, vec![ExtractedClaim::new("Water boils at 105°C", None)]);
    }

    #[test]
    fn test_read_claims_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            read_claims(file.path()),
            Err(deepscope::Error::Serialization(_))
        ));
        assert!(matches!(
            read_claims(Path::new("/nonexistent/claims.json")),
            Err(deepscope::Error::Io(_))
        ));
    }

    #[test]
    fn test_config_failures_are_config_errors() {
        match load_config(Some(Path::new("/nonexistent/deepscope.json"))) {
            Err(deepscope::Error::Config(msg)) => {
                assert!(msg.contains("/nonexistent/deepscope.json"))
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"claim_concurrency": 0}}"#).unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(deepscope::Error::Config(_))
        ));

        let config = VerifyConfig {
            claim_concurrency: 0,
            ..VerifyConfig::default()
        };
        assert!(matches!(
            build_pipeline(&config),
            Err(deepscope::Error::Config(_))
        ));
    }

    #[test]
    fn test_transcript_id_defaults_to_file_stem() {
        let path = Path::new("/data/yt-abc123.json");
        assert_eq!(transcript_id(path, None), "yt-abc123");
        assert_eq!(transcript_id(path, Some("custom".into())), "custom");
    }
}
