mod fixtures;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use synastry_config::SynastrySettings;
use synastry_core::narrative::{SectionKind, SynastryTab};
use synastry_core::service::{InMemoryLedger, SynastryRequest};
use synastry_core::{AnalysisBundle, SynastryError, SynastryService};

use crate::fixtures::{load_pair_file, EchoGenerator, FixtureEphemeris, PairFile};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file (default: configs/synastry.toml, falling back to built-in defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print synastry data and relationship scores for a pair file.
    Compute {
        #[arg(long)]
        input: PathBuf,

        /// Also build the composite chart.
        #[arg(long)]
        composite: bool,
    },
    /// Run the full pipeline for one report section with an echo generator.
    Section {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, default_value = "overview")]
        section: String,

        #[arg(long)]
        lang: Option<String>,
    },
    /// Run the full pipeline for one tab with an echo generator.
    Tab {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, default_value = "main")]
        tab: String,

        #[arg(long)]
        lang: Option<String>,
    },
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<SynastrySettings> {
    match path {
        Some(p) => synastry_config::load_synastry_settings_from(p),
        None => synastry_config::load_or_default(),
    }
}

async fn build_service(pair: &PairFile, settings: SynastrySettings) -> SynastryService {
    let ledger = InMemoryLedger::default();
    ledger.grant(&pair.user_id, 1).await;
    SynastryService::new(
        Arc::new(FixtureEphemeris::from_pair(pair)),
        Arc::new(EchoGenerator),
        Arc::new(ledger),
        settings,
    )
}

fn request_for(pair: &PairFile, lang: Option<String>) -> SynastryRequest {
    SynastryRequest {
        user_id: pair.user_id.clone(),
        device_fingerprint: None,
        person_a: pair.person_a.birth.clone(),
        person_b: pair.person_b.birth.clone(),
        relationship_type: pair.relationship_type,
        lang,
    }
}

fn print_error(err: &SynastryError) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(&err.body())?;
    eprintln!("{} {}", err.status_code(), body);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_ref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_filter.as_str()),
    )
    .init();

    match &args.config {
        Some(path) => log::info!("settings loaded from {}", path.display()),
        None => log::info!("settings loaded from default search paths"),
    }
    log::debug!(
        "lang={} suggestion_limit={} max_tokens={:?}",
        settings.default_lang,
        settings.suggestion_limit,
        settings.max_tokens
    );

    match args.command {
        Command::Compute { input, composite } => {
            let pair = load_pair_file(&input)?;
            log::info!("computing {} synastry from {}", pair.relationship_type, input.display());
            let mut bundle = AnalysisBundle::compute(&pair.person_a.chart, &pair.person_b.chart);
            if composite {
                bundle = bundle.with_default_composite(&pair.person_a.chart, &pair.person_b.chart);
            }
            println!("{}", serde_json::to_string_pretty(&bundle.report())?);
        }
        Command::Section {
            input,
            section,
            lang,
        } => {
            let section: SectionKind = section
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("--section")?;
            let pair = load_pair_file(&input)?;
            let service = build_service(&pair, settings).await;
            match service.analyze_section(&request_for(&pair, lang), section).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(err) => {
                    print_error(&err)?;
                    std::process::exit(1);
                }
            }
        }
        Command::Tab { input, tab, lang } => {
            let tab: SynastryTab = tab
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("--tab")?;
            let pair = load_pair_file(&input)?;
            let service = build_service(&pair, settings).await;
            match service.analyze_tab(&request_for(&pair, lang), tab).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(err) => {
                    print_error(&err)?;
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
