use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use evac::{Blockage, Mode, Notice, OverlaySnapshot, Planner, PlannerConfig, TripSummary};
use foundation::LatLon;
use routing::{
    AnalysisJob, DEFAULT_API_BASE, FallbackService, HttpRoutingService, MockRoutingService,
    RoutingService, TravelProfile,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless evacuation route planner")]
struct Args {
    /// Routing API base URL (default: $EVAC_API_BASE or http://localhost:8000/api)
    #[arg(long)]
    api_base: Option<String>,

    /// Use the built-in mock backend only
    #[arg(long)]
    offline: bool,

    /// Planner config as JSON; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (default: $EVAC_SEED or the config value)
    #[arg(long)]
    seed: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up places by name
    Geocode {
        query: String,
    },

    /// Terrain elevation at a point
    Elevation {
        /// Point: lat,lon
        #[arg(value_parser = parse_point)]
        point: LatLon,
    },

    /// Compute a route and print the resulting overlays as JSON
    Plan {
        /// Start point: lat,lon
        #[arg(long, value_parser = parse_point)]
        start: LatLon,

        /// Destination: lat,lon
        #[arg(long, value_parser = parse_point)]
        end: LatLon,

        /// Polygon obstacle: "lat,lon;lat,lon;lat,lon" (repeatable)
        #[arg(long, value_parser = parse_polygon)]
        polygon: Vec<Blockage>,

        /// Rectangle obstacle from two corners: "lat,lon;lat,lon" (repeatable)
        #[arg(long, value_parser = parse_rectangle)]
        rect: Vec<Blockage>,

        /// Travel profile, e.g. foot-walking or driving-car
        #[arg(long)]
        profile: Option<TravelProfile>,

        /// evacuate, heatmap, defense or crowd
        #[arg(long, default_value = "evacuate")]
        mode: Mode,

        /// Simulation steps to run before printing (crowd mode)
        #[arg(long, default_value_t = 0)]
        ticks: u32,

        /// Also compute the areas reachable from the start point
        #[arg(long)]
        isochrones: bool,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    summary: Option<TripSummary>,
    analysis: Option<&'a AnalysisJob>,
    notices: Vec<&'a Notice>,
    overlays: OverlaySnapshot,
}

#[derive(Serialize)]
struct ElevationReport {
    location: LatLon,
    elevation_m: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let mock = MockRoutingService::new(config.seed);
    let service: Box<dyn RoutingService> = if args.offline {
        info!("using mock routing backend");
        Box::new(mock)
    } else {
        let api_base = args.api_base.clone().unwrap_or_else(|| {
            env::var("EVAC_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
        });
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(args.timeout))
            .build()?;
        info!(%api_base, "using routing backend with mock fallback");
        Box::new(FallbackService::new(
            HttpRoutingService::with_client(api_base, client),
            mock,
        ))
    };

    let mut planner = Planner::new(config);

    match args.command {
        Command::Geocode { query } => {
            let results = planner.search(service.as_ref(), &query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Elevation { point } => {
            let elevation_m = planner.elevation_at(service.as_ref(), point).await;
            if elevation_m.is_none() {
                warn!(%point, "no elevation available");
            }
            let report = ElevationReport {
                location: point,
                elevation_m,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Plan {
            start,
            end,
            polygon,
            rect,
            profile,
            mode,
            ticks,
            isochrones,
        } => {
            if let Some(profile) = profile {
                planner.set_profile(profile);
            }
            planner.set_mode(mode);
            planner.set_start(start);
            planner.set_end(end);
            for blockage in polygon.into_iter().chain(rect) {
                planner.push_blockage(blockage);
            }

            planner.refresh(service.as_ref()).await?;
            if isochrones {
                planner.reachable_areas(service.as_ref()).await?;
            }
            for _ in 0..ticks {
                planner.tick();
            }

            if planner.routes().is_empty() {
                warn!("no route available");
            }
            let report = Report {
                summary: planner.summary(),
                analysis: planner.analysis(),
                notices: planner.notices().iter().map(|e| &e.payload).collect(),
                overlays: planner.overlays(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<PlannerConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
            PlannerConfig::from_json_str(&raw)?
        }
        None => PlannerConfig::default(),
    };

    let env_seed = match env::var("EVAC_SEED") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid EVAC_SEED `{raw}`: {e}"))?,
        ),
        Err(_) => None,
    };
    if let Some(seed) = args.seed.or(env_seed) {
        config.seed = seed;
    }
    Ok(config)
}

fn parse_point(raw: &str) -> Result<LatLon, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon but got `{raw}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude in `{raw}`"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude in `{raw}`"))?;
    Ok(LatLon::new(lat, lon))
}

fn parse_points(raw: &str) -> Result<Vec<LatLon>, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_point)
        .collect()
}

fn parse_polygon(raw: &str) -> Result<Blockage, String> {
    let points = parse_points(raw)?;
    if points.len() < 3 {
        return Err(format!("a polygon needs at least 3 points, got {}", points.len()));
    }
    Ok(Blockage::polygon(&points))
}

fn parse_rectangle(raw: &str) -> Result<Blockage, String> {
    match parse_points(raw)?.as_slice() {
        [a, b] => Ok(Blockage::rectangle(*a, *b)),
        other => Err(format!("a rectangle needs exactly 2 corners, got {}", other.len())),
    }
}
