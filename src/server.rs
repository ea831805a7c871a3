use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::catalog;
use crate::config::Config;
use crate::cost::{VehicleClass, VehicleProfile};
use crate::error::EngineError;
use crate::geo::Coordinate;
use crate::optimizer::{Destination, OptimizationRequest, OptimizationSummary, ProfitOptimizer};

#[derive(Clone)]
pub struct ApiState {
    config: Config,
    optimizer: Arc<ProfitOptimizer>,
    destinations: Arc<Vec<Destination>>,
}

impl ApiState {
    pub fn new(config: Config, destinations: Vec<Destination>) -> Self {
        Self {
            optimizer: Arc::new(ProfitOptimizer::new(config.engine_config())),
            config,
            destinations: Arc::new(destinations),
        }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let destinations = catalog::load_or_builtin(config.resolved_destinations_path().as_deref())?;
        Ok(Self::new(config, destinations))
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeBody {
    lat: f64,
    lng: f64,
    crop: String,
    quantity: f64,
    vehicle: String,
    region: Option<String>,
    top: Option<usize>,
    destinations: Option<Vec<Destination>>,
}

#[derive(Debug, Deserialize)]
pub struct DestinationsQuery {
    crop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FuelPriceQuery {
    region: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct FuelPriceResponse {
    region: Option<String>,
    known_region: bool,
    fuel_price: f64,
}

#[derive(Debug, Serialize)]
struct VehicleEntry {
    vehicle: String,
    #[serde(flatten)]
    profile: VehicleProfile,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/vehicles", get(vehicles))
        .route("/v1/destinations", get(destinations))
        .route("/v1/fuel-price", get(fuel_price))
        .route("/v1/optimize", post(optimize))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let state = ApiState::from_config(config)?;
    info!(destinations = state.destinations.len(), "loaded destination catalog");

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn vehicles(State(state): State<ApiState>) -> Json<ApiResponse<Vec<VehicleEntry>>> {
    let vehicles = &state.optimizer.config().vehicles;
    let entries = vehicles
        .entries()
        .map(|(class, profile)| VehicleEntry {
            vehicle: class.to_string(),
            profile: *profile,
        })
        .collect();
    ok(entries)
}

async fn destinations(
    State(state): State<ApiState>,
    Query(query): Query<DestinationsQuery>,
) -> Json<ApiResponse<Vec<Destination>>> {
    let listed = catalog::open_destinations(&state.destinations, query.crop.as_deref())
        .into_iter()
        .cloned()
        .collect();
    ok(listed)
}

async fn fuel_price(
    State(state): State<ApiState>,
    Query(query): Query<FuelPriceQuery>,
) -> Json<ApiResponse<FuelPriceResponse>> {
    let region = query.region.or_else(|| state.config.engine.default_region.clone());
    let prices = &state.optimizer.config().regional_prices;
    let known_region = region.as_deref().map(|r| prices.is_known(r)).unwrap_or(false);
    ok(FuelPriceResponse {
        fuel_price: prices.unit_price(region.as_deref()),
        known_region,
        region,
    })
}

pub async fn optimize(
    State(state): State<ApiState>,
    Json(body): Json<OptimizeBody>,
) -> ApiResult<OptimizationSummary> {
    let vehicle = body
        .vehicle
        .parse::<VehicleClass>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let request = OptimizationRequest {
        origin: Coordinate::new(body.lat, body.lng),
        commodity: body.crop.trim().to_string(),
        quantity: body.quantity,
        vehicle,
        region: body
            .region
            .or_else(|| state.config.engine.default_region.clone()),
    };

    let destinations = body
        .destinations
        .as_deref()
        .unwrap_or(state.destinations.as_slice());
    let results = state.optimizer.optimize(&request, destinations).map_err(|e| {
        warn!("rejected optimize request: {e}");
        ApiError::from(e)
    })?;
    if results.is_empty() {
        return Err(ApiError::not_found(format!(
            "No mandis found offering {}",
            request.commodity
        )));
    }

    info!(
        crop = %request.commodity,
        vehicle = %request.vehicle,
        candidates = destinations.len(),
        eligible = results.len(),
        "optimized destinations"
    );
    let mut summary = OptimizationSummary::from_results(results);
    if let Some(top) = body.top {
        summary = summary.truncated(top);
    }
    Ok(ok(summary))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
