use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use krishi_route::catalog;
use krishi_route::config::{Config, ConfigOverrides};
use krishi_route::cost::VehicleClass;
use krishi_route::geo::Coordinate;
use krishi_route::optimizer::{OptimizationRequest, OptimizationSummary, ProfitOptimizer};
use krishi_route::output::csv::{destinations_to_csv, results_to_csv, vehicles_to_csv};
use krishi_route::output::render_json;
use krishi_route::output::table::{
    render_destinations_table, render_fuel_table, render_results_table, render_vehicles_table,
};
use krishi_route::server::run_server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "krishi-route",
    about = "Find the mandi that pays the most after transport and handling"
)]
struct Cli {
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// JSON file of candidate destinations; defaults to the built-in catalog.
    #[arg(short, long, global = true)]
    destinations: Option<PathBuf>,
    #[arg(short, long, global = true)]
    region: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Optimize {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        crop: String,
        /// Quintals.
        #[arg(long)]
        quantity: f64,
        #[arg(long, default_value = "miniTruck")]
        vehicle: String,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// List open destinations, optionally only those buying a crop.
    Destinations {
        #[arg(long)]
        crop: Option<String>,
    },
    FuelPrice,
    Vehicles,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        destinations_path: cli.destinations.clone(),
        default_region: cli.region.clone(),
    });

    match &cli.command {
        Commands::Config { init, show } => {
            if *init {
                Config::write_template(&config_path)?;
                println!("Wrote config template to {}", config_path.display());
            }
            if *show || !*init {
                println!("{}", render_json(&config)?);
            }
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await?;
        }
        Commands::Destinations { crop } => {
            let catalog = catalog::load_or_builtin(config.resolved_destinations_path().as_deref())?;
            let listed = catalog::open_destinations(&catalog, crop.as_deref());
            info!(total = catalog.len(), listed = listed.len(), "listed destinations");
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_destinations_table(&listed, crop.as_deref()))
                }
                OutputFormat::Json => println!("{}", render_json(&listed)?),
                OutputFormat::Csv => println!("{}", destinations_to_csv(&listed)?),
            }
        }
        Commands::FuelPrice => {
            let optimizer = ProfitOptimizer::new(config.engine_config());
            let prices = &optimizer.config().regional_prices;
            match config.engine.default_region.as_deref() {
                Some(region) => {
                    if !prices.is_known(region) {
                        warn!("unknown region {region}, using default fuel price");
                    }
                    println!("{region}: ₹{:.2}/litre", prices.unit_price(Some(region)));
                }
                None => match cli.output {
                    OutputFormat::Table => println!("{}", render_fuel_table(prices)),
                    OutputFormat::Json | OutputFormat::Csv => {
                        let entries = prices.entries().collect::<Vec<_>>();
                        println!("{}", render_json(&entries)?);
                    }
                },
            }
        }
        Commands::Vehicles => {
            let engine = config.engine_config();
            match cli.output {
                OutputFormat::Table => println!("{}", render_vehicles_table(&engine.vehicles)),
                OutputFormat::Csv => println!("{}", vehicles_to_csv(&engine.vehicles)?),
                OutputFormat::Json => {
                    let entries = engine
                        .vehicles
                        .entries()
                        .map(|(class, profile)| (class.to_string(), *profile))
                        .collect::<Vec<_>>();
                    println!("{}", render_json(&entries)?);
                }
            }
        }
        Commands::Optimize {
            lat,
            lng,
            crop,
            quantity,
            vehicle,
            top,
        } => {
            let vehicle = vehicle.parse::<VehicleClass>()?;
            if let VehicleClass::Other(name) = &vehicle {
                warn!("unknown vehicle {name}, using fallback constants");
            }
            let request = OptimizationRequest {
                origin: Coordinate::new(*lat, *lng),
                commodity: crop.trim().to_string(),
                quantity: *quantity,
                vehicle,
                region: config.engine.default_region.clone(),
            };
            let destinations =
                catalog::load_or_builtin(config.resolved_destinations_path().as_deref())?;
            let optimizer = ProfitOptimizer::new(config.engine_config());
            let results = optimizer.optimize(&request, &destinations)?;
            info!(
                candidates = destinations.len(),
                eligible = results.len(),
                "ranked destinations"
            );
            if results.is_empty() {
                println!("No mandis found offering {}", request.commodity);
                return Ok(());
            }
            if results[0].insights.exceeds_capacity {
                warn!(
                    "{} quintals needs {} trips with {}",
                    request.quantity, results[0].insights.trips_required, request.vehicle
                );
            }
            print_summary(&OptimizationSummary::from_results(results).truncated(*top), cli.output)?;
        }
    }

    Ok(())
}

fn print_summary(summary: &OptimizationSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_results_table(&summary.results));
            if let Some(best) = &summary.best {
                println!(
                    "Best: {} (net ₹{}, {:.1} km, {})",
                    best.destination_name,
                    best.net_profit,
                    best.distance_km,
                    best.insights.travel_time
                );
            }
        }
        OutputFormat::Json => println!("{}", render_json(summary)?),
        OutputFormat::Csv => println!("{}", results_to_csv(&summary.results)?),
    }
    Ok(())
}
