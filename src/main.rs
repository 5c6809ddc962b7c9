//! cuaca: hourly temperature dashboard for a single fixed location.
//!
//! Fetches the hourly forecast (cache-first for instant display, then the
//! network), derives stats, and renders the chart series, stat cards, and
//! table in the terminal. Re-running the command is the manual reload.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;

use cuaca_core::error::{AppError, NetworkError, ReqwestErrorExt};
use cuaca_core::{Config, TemperatureUnit as ConfigUnit};
use cuaca_offline::{OfflineError, ShellStore, ShellWorker};
use cuaca_ui::{chart_series, stat_cards, table_rows, ChartPoint, DashboardSession, Phase};
use cuaca_weather::{
    DateRange, ForecastProvider, ForecastService, SnapshotCache, TemperatureUnit,
};

/// Hourly temperature dashboard
#[derive(Parser)]
#[command(name = "cuaca", about = "Hourly temperature dashboard")]
struct Cli {
    /// Temperature unit: c or f (overrides the configured preference)
    #[arg(long, value_parser = parse_unit)]
    unit: Option<TemperatureUnit>,

    /// First day to show (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to show (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Show every hourly row instead of the most recent ones
    #[arg(long)]
    full: bool,

    /// Warm the offline shell cache (install + activate + one forecast
    /// request routed through it), then exit
    #[arg(long)]
    warm_shell: bool,
}

fn parse_unit(s: &str) -> Result<TemperatureUnit, String> {
    match s.to_ascii_lowercase().as_str() {
        "c" | "celsius" => Ok(TemperatureUnit::Celsius),
        "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
        other => Err(format!("unknown unit {other:?}, expected c or f")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    cuaca_core::init()?;

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::load()?;

    if cli.warm_shell {
        return warm_shell(&config).await;
    }

    let provider = ForecastProvider::new(
        &config.weather.endpoint,
        config.location.latitude,
        config.location.longitude,
    )
    .map_err(weather_to_app)?;
    let cache = SnapshotCache::open(config.config_dir.join("snapshots.sqlite"));
    let service = ForecastService::new(provider, cache, config.snapshot_max_age());

    let unit = cli.unit.unwrap_or(match config.weather.temperature_unit {
        ConfigUnit::Celsius => TemperatureUnit::Celsius,
        ConfigUnit::Fahrenheit => TemperatureUnit::Fahrenheit,
    });

    let mut state = cuaca_ui::DashboardState::new(unit);
    state.set_range(DateRange {
        start: cli.from,
        end: cli.to,
    });

    let mut session = DashboardSession::new(service, state);

    println!("Loading forecast for {}...", config.location.label);
    let mut cached_shown = false;
    let phase = session
        .reload_with(|state| {
            if state.phase() == Phase::Loading && !state.readings().is_empty() && !cached_shown {
                cached_shown = true;
                println!("(showing last-known data while fetching)");
            }
        })
        .await;

    if phase == Phase::Failed {
        let message = session.state().error().unwrap_or("Failed to load forecast data.");
        eprintln!("{}", message);
        std::process::exit(1);
    }

    render(session.state(), &config.location.label, cli.full);
    Ok(())
}

/// Install and activate the offline shell, then route one forecast request
/// through it so the last response is stored for offline use.
async fn warm_shell(config: &Config) -> Result<(), AppError> {
    let store = ShellStore::open(&config.config_dir.join("shell"), &config.shell.cache_version)
        .map_err(|e| AppError::Other(e.into()))?;
    let worker = ShellWorker::new(store, &config.shell.scope, config.shell.assets.clone())
        .map_err(offline_to_app)?;

    // Shell assets only resolve when the scope is a full URL; a bare path
    // scope leaves the asset precache to the hosting environment.
    if let Err(e) = worker.install().await {
        tracing::warn!("Shell asset precache skipped: {}", e);
    }
    worker.activate();

    let forecast_url = format!(
        "{}/v1/forecast?latitude={}&longitude={}&hourly=temperature_2m&timezone=auto",
        config.weather.endpoint.trim_end_matches('/'),
        config.location.latitude,
        config.location.longitude
    );
    let response = worker.handle(&forecast_url).await.map_err(offline_to_app)?;
    println!(
        "Offline shell ready: {} stored response(s), forecast {} bytes",
        worker.store().keys().len(),
        response.body.len()
    );
    Ok(())
}

fn weather_to_app(e: cuaca_weather::WeatherError) -> AppError {
    match e {
        cuaca_weather::WeatherError::Network(e) => AppError::Network(e.into_network_error()),
        cuaca_weather::WeatherError::Status { status } => {
            AppError::Network(NetworkError::ServerError {
                status,
                message: "forecast request failed".into(),
            })
        }
        cuaca_weather::WeatherError::Parse(msg) => {
            AppError::Network(NetworkError::InvalidResponse(msg))
        }
    }
}

fn offline_to_app(e: OfflineError) -> AppError {
    match e {
        OfflineError::Network(e) => AppError::Network(e.into_network_error()),
        OfflineError::Status { status, .. } => AppError::Network(NetworkError::ServerError {
            status,
            message: "shell request failed".into(),
        }),
        OfflineError::Store(e) => AppError::Other(e.into()),
    }
}

fn render(state: &cuaca_ui::DashboardState, location_label: &str, full: bool) {
    let meta = state.meta();
    println!();
    println!("{} - hourly temperature", location_label);
    match (&meta.timezone, &meta.timezone_abbreviation) {
        (Some(tz), Some(abbr)) => println!("Timezone: {} ({})", tz, abbr),
        (Some(tz), None) => println!("Timezone: {}", tz),
        _ => {}
    }
    println!();

    let visible = state.visible_readings();
    let Some(stats) = state.stats() else {
        println!("No readings in the selected range.");
        return;
    };

    let now_label = cuaca_ui::format::long_label(chrono::Local::now().naive_local());
    for card in stat_cards(&stats, state.unit(), &now_label) {
        match &card.sub {
            Some(sub) => println!("  {:<24} {:>10}   {}", card.label, card.value, sub),
            None => println!("  {:<24} {:>10}", card.label, card.value),
        }
    }
    println!();

    let shown: &[cuaca_weather::Reading] = if full || visible.len() <= 24 {
        &visible
    } else {
        &visible[visible.len() - 24..]
    };
    if shown.len() < visible.len() {
        println!(
            "(last {} of {} hours; use --full for all)",
            shown.len(),
            visible.len()
        );
    }

    render_chart(&chart_series(shown, state.unit()));
    println!();

    for row in table_rows(shown, state.unit()) {
        println!("  {:<32} {:>8}", row.time, row.value);
    }
}

/// Minimal text rendering of the chart series: one scaled bar per point.
fn render_chart(series: &[ChartPoint]) {
    let Some((min, max)) = series.iter().fold(None, |acc, p| match acc {
        None => Some((p.value, p.value)),
        Some((lo, hi)) => Some((p.value.min(lo), p.value.max(hi))),
    }) else {
        return;
    };

    let span = (max - min).max(f64::EPSILON);
    for point in series {
        let filled = 1 + ((point.value - min) / span * 29.0).round() as usize;
        println!(
            "  {:>9}  {:<30} {:>6.1}",
            point.label,
            "▇".repeat(filled),
            point.value
        );
    }
}
