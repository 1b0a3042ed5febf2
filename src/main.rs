use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rift_insights::analytics::heatmap::MAP_ZONES;
use rift_insights::analytics::window::TimeWindow;
use rift_insights::config::AppConfig;
use rift_insights::gateway::{AnalysisGateway, AnalysisKind, AnalysisRequest};
use rift_insights::models::{BenchmarkRecord, Cohort, CohortType, CoreMetric, RawMatch};
use rift_insights::providers::{MemoryCache, StaticBenchmarkStore, StaticMatchProvider};

#[derive(Parser)]
#[command(name = "rift-insights")]
#[command(about = "Post-match telemetry analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// JSON file of raw match records
    #[arg(long, default_value = "./matches.json")]
    matches: String,

    /// Optional JSON file of cohort benchmark records
    #[arg(long)]
    benchmarks: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate metric snapshot for a player
    Snapshot {
        /// Player identifier (PUUID)
        #[arg(long)]
        player: String,

        /// Lookback window (7d, 30d, 90d, season)
        #[arg(long, default_value = "30d")]
        window: String,
    },

    /// Early-vs-late trend detection for a player
    Trend {
        #[arg(long)]
        player: String,

        #[arg(long, default_value = "30d")]
        window: String,
    },

    /// Percentile rank of one metric against a cohort
    Benchmark {
        #[arg(long)]
        player: String,

        #[arg(long, default_value = "30d")]
        window: String,

        /// Metric to rank (win_rate, kda, cs_per_minute, vision_score, damage_share)
        #[arg(long, default_value = "kda")]
        metric: String,

        /// Cohort type (role, rank, global, champion)
        #[arg(long, default_value = "global")]
        cohort: String,

        /// Cohort slice value, e.g. "jungle" for a role cohort
        #[arg(long, default_value = "")]
        filter: String,

        /// Cohort region (defaults to the configured region)
        #[arg(long)]
        region: Option<String>,
    },

    /// Head-to-head comparison of two players
    Compare {
        #[arg(long)]
        player: String,

        #[arg(long)]
        opponent: String,

        #[arg(long, default_value = "30d")]
        window: String,
    },

    /// Ward-placement heatmap for a player
    Heatmap {
        #[arg(long)]
        player: String,

        #[arg(long, default_value = "30d")]
        window: String,
    },

    /// Print the named map zone table
    Zones,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting rift-insights v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Zones = cli.command {
        println!("=== Map Zones ===\n");
        for zone in MAP_ZONES {
            let marker = if zone.strategic { " [strategic]" } else { "" };
            println!("  {}{}", zone.name, marker);
        }
        return Ok(());
    }

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path).context("failed to load configuration")?
    } else {
        tracing::debug!(path = %cli.config, "config file not found, using defaults");
        AppConfig::default()
    };

    let provider = load_matches(&cli.matches)?;
    let benchmarks = match &cli.benchmarks {
        Some(path) => load_benchmarks(path)?,
        None => StaticBenchmarkStore::new(),
    };

    let gateway = AnalysisGateway::new(
        Arc::new(provider),
        Arc::new(benchmarks),
        Arc::new(MemoryCache::new()),
        config,
    );

    let request = build_request(&cli.command)?;
    let response = gateway.analyze(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn build_request(command: &Commands) -> Result<AnalysisRequest> {
    let request = match command {
        Commands::Snapshot { player, window } => AnalysisRequest {
            player_id: player.clone(),
            window: parse_window(window)?,
            region: None,
            kind: AnalysisKind::Snapshot,
        },
        Commands::Trend { player, window } => AnalysisRequest {
            player_id: player.clone(),
            window: parse_window(window)?,
            region: None,
            kind: AnalysisKind::Trend,
        },
        Commands::Benchmark {
            player,
            window,
            metric,
            cohort,
            filter,
            region,
        } => {
            let cohort_region = region.clone().unwrap_or_default();
            AnalysisRequest {
                player_id: player.clone(),
                window: parse_window(window)?,
                region: region.clone(),
                kind: AnalysisKind::Benchmark {
                    cohort: Cohort::new(parse_cohort_type(cohort)?, filter.clone(), cohort_region),
                    metric: parse_metric(metric)?,
                },
            }
        }
        Commands::Compare {
            player,
            opponent,
            window,
        } => AnalysisRequest {
            player_id: player.clone(),
            window: parse_window(window)?,
            region: None,
            kind: AnalysisKind::Comparison {
                opponent: opponent.clone(),
            },
        },
        Commands::Heatmap { player, window } => AnalysisRequest {
            player_id: player.clone(),
            window: parse_window(window)?,
            region: None,
            kind: AnalysisKind::Heatmap,
        },
        Commands::Zones => unreachable!("handled before request dispatch"),
    };
    Ok(request)
}

/// Load raw matches and index them under every participant, so any player
/// appearing in the file can be analyzed.
fn load_matches(path: &str) -> Result<StaticMatchProvider> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read match file: {path}"))?;
    let matches: Vec<RawMatch> =
        serde_json::from_str(&contents).context("failed to parse match file")?;

    let mut by_player: HashMap<String, Vec<RawMatch>> = HashMap::new();
    for m in &matches {
        for p in &m.participants {
            by_player.entry(p.puuid.clone()).or_default().push(m.clone());
        }
    }

    tracing::info!(
        matches = matches.len(),
        players = by_player.len(),
        "loaded match file"
    );

    let mut provider = StaticMatchProvider::new();
    for (player, player_matches) in by_player {
        provider = provider.with_matches(player, player_matches);
    }
    Ok(provider)
}

fn load_benchmarks(path: &str) -> Result<StaticBenchmarkStore> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read benchmark file: {path}"))?;
    let records: Vec<BenchmarkRecord> =
        serde_json::from_str(&contents).context("failed to parse benchmark file")?;

    tracing::info!(records = records.len(), "loaded benchmark file");

    let mut store = StaticBenchmarkStore::new();
    for record in records {
        store = store.with_record(record);
    }
    Ok(store)
}

fn parse_window(s: &str) -> Result<TimeWindow> {
    match TimeWindow::parse(s) {
        Some(window) => Ok(window),
        None => bail!("invalid window: {s} (expected 7d, 30d, 90d or season)"),
    }
}

fn parse_metric(s: &str) -> Result<CoreMetric> {
    match s.trim().to_lowercase().as_str() {
        "win_rate" => Ok(CoreMetric::WinRate),
        "kda" => Ok(CoreMetric::Kda),
        "cs_per_minute" => Ok(CoreMetric::CsPerMinute),
        "vision_score" => Ok(CoreMetric::VisionScore),
        "damage_share" => Ok(CoreMetric::DamageShare),
        other => bail!("invalid metric: {other}"),
    }
}

fn parse_cohort_type(s: &str) -> Result<CohortType> {
    match s.trim().to_lowercase().as_str() {
        "role" => Ok(CohortType::Role),
        "rank" => Ok(CohortType::Rank),
        "global" => Ok(CohortType::Global),
        "champion" => Ok(CohortType::Champion),
        other => bail!("invalid cohort type: {other}"),
    }
}
