use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use rift_rewind::api::state::{AppState, GatewayTimeouts};
use rift_rewind::api::{build_router, with_http_layers};
use rift_rewind::calculate;
use rift_rewind::client::DashboardClient;
use rift_rewind::config::AppConfig;
use rift_rewind::models::PlayerData;
use rift_rewind::parse_duration;
use rift_rewind::report;
use rift_rewind::upstream::{HttpAnalysisConfig, HttpAnalysisService};

#[derive(Parser)]
#[command(name = "rift-rewind")]
#[command(about = "League of Legends season recap gateway and stats")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

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
    /// Start the proxy gateway
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Analysis service endpoint (overrides config and LAMBDA_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,

        /// Deadline for /api/analyze (e.g., "30s")
        #[arg(long)]
        analyze_timeout: Option<String>,

        /// Deadline for /api/search-player (e.g., "25s")
        #[arg(long)]
        search_timeout: Option<String>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Print rollups for a saved analysis payload
    Stats {
        /// JSON file as returned by /api/analyze
        file: PathBuf,

        /// Player name used in the share text
        #[arg(long, default_value = "Summoner")]
        player: String,
    },

    /// Look up a player through a running gateway
    Lookup {
        /// Summoner name
        name: String,

        /// Riot tag, without the '#'
        tag: String,

        /// Gateway base URL
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        gateway: String,

        /// Request timeout (e.g., "45s")
        #[arg(long, default_value = "45s")]
        timeout: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            endpoint,
            analyze_timeout,
            search_timeout,
            access_log,
        } => {
            tracing::info!("Starting rift-rewind v{}", env!("CARGO_PKG_VERSION"));

            let mut config = AppConfig::load_or_default(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config.display()))?;
            config.apply_env();
            config.apply_endpoint_override(endpoint);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(raw) = analyze_timeout {
                config.upstream.analyze_timeout_seconds = duration_flag(&raw)?.as_secs();
            }
            if let Some(raw) = search_timeout {
                config.upstream.search_timeout_seconds = duration_flag(&raw)?.as_secs();
            }
            config.validate()?;

            serve(config, access_log).await?;
        }
        Commands::Stats { file, player } => {
            let data = read_player_data(&file)?;
            print_stats(&player, &data);
        }
        Commands::Lookup {
            name,
            tag,
            gateway,
            timeout,
        } => {
            let base = Url::parse(&gateway).context("Invalid --gateway URL")?;
            let client = DashboardClient::new(&base, duration_flag(&timeout)?)?;

            let data = client.fetch_player_data(&name, &tag).await?;
            print_stats(&format!("{}#{}", name.trim(), tag.trim()), &data);
        }
    }

    Ok(())
}

fn duration_flag(raw: &str) -> Result<Duration> {
    match parse_duration(raw) {
        Some(d) if !d.is_zero() => Ok(d),
        _ => bail!("Invalid duration {:?} (expected e.g. \"30s\")", raw),
    }
}

async fn serve(config: AppConfig, access_log: bool) -> Result<()> {
    let timeouts = GatewayTimeouts::from(&config.upstream);

    let state = match config.upstream.endpoint_url()? {
        Some(endpoint) => {
            tracing::info!("Relaying to analysis service at {}", endpoint);
            let service = HttpAnalysisService::new(HttpAnalysisConfig::new(endpoint))?;
            AppState::new(Arc::new(service), timeouts)
        }
        None => {
            tracing::warn!(
                "No analysis endpoint configured; proxy routes will answer 503. Set LAMBDA_ENDPOINT or [upstream].endpoint"
            );
            AppState {
                timeouts,
                ..AppState::unconfigured()
            }
        }
    };

    let app = with_http_layers(build_router(state), &config.server.cors_origin, access_log);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gateway: http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn read_player_data(path: &Path) -> Result<PlayerData> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not an analysis payload", path.display()))
}

fn print_stats(player: &str, data: &PlayerData) {
    let headline = calculate::headline_stats(&data.summary, &data.matches);
    println!("\n=== {} ===", player);
    println!("Games:     {}", headline.games);
    println!("Win rate:  {}%", headline.win_rate);
    println!("Avg KDA:   {:.1}", headline.avg_kda);

    let champions = calculate::champion_rollups(&data.matches);
    if !champions.is_empty() {
        println!("\n=== Champions ===");
        for c in &champions {
            println!(
                "  {:<14} {:>3} games  {:>3}% WR  {} KDA  tier {}",
                c.name,
                c.games,
                c.win_rate,
                c.kda_display(),
                c.mastery_tier
            );
        }
    }

    let roles = calculate::role_rollups(&data.matches);
    if !roles.is_empty() {
        println!("\n=== Roles ===");
        for r in &roles {
            println!(
                "  {:<10} {:>3} games  {:>5.1}% WR  {:.2} KDA  {:.1} CS/min",
                r.role, r.games, r.win_rate, r.avg_kda, r.avg_cs_per_min
            );
        }
    }

    let modes = calculate::game_mode_distribution(&data.matches);
    if !modes.is_empty() {
        println!("\n=== Game modes ===");
        for m in &modes {
            println!("  {:<16} {:>3} games  {:>5.1}% WR", m.mode.description(), m.games, m.win_rate);
        }
    }

    let form = calculate::recent_form(&data.matches);
    if form.games > 0 {
        println!("\n=== Last {} games ===", form.games);
        println!("Win rate:  {:.1}%", form.win_rate);
        println!("Avg KDA:   {:.2}", form.avg_kda);
        if let Some(mode) = form.most_played_mode {
            println!("Mostly:    {}", mode);
        }
        if !form.cs_trend.is_empty() {
            let cs: Vec<String> = form
                .cs_trend
                .iter()
                .map(|p| format!("{:.1}", p.cs_per_min))
                .collect();
            println!("CS/min:    {}", cs.join(" → "));
        }
    }

    if let Some(recap) = &data.recap {
        println!("\n=== Insights ===");
        for card in report::insight_cards(recap) {
            println!("  [{}] {}", card.title, card.description);
        }

        println!("\n=== Tips ===");
        for tip in report::advice_tips(recap) {
            println!("  {} ({}): {}", tip.title, tip.category, tip.tip);
        }
        for role in report::role_tips(recap) {
            println!("  {}:", role.role);
            for tip in &role.tips {
                println!("    - {}", tip);
            }
        }

        let champions = recap.recommended_champions();
        if !champions.is_empty() {
            println!("  Champions to try: {}", champions.join(", "));
        }

        println!("\n{}", report::share_text(player, recap, Some(&headline)));
    }

    let today = chrono::Local::now().date_naive();
    println!("\nExport as: {}", report::export_file_name(player, today));
}
