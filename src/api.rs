//! REST API for the packing service.
//!
//! Provides the HTTP surface over the packing engine. The engine itself is
//! a pure library; every handler here consumes its `PackingResult`
//! read-only. Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, PackerConfig};
use crate::model::{Container, ContainerSpec, Item, ValidationError};
use crate::packer::{
    PackingResult, pack_items_with_config, pack_items_with_progress,
};

#[derive(Clone)]
struct ApiState {
    packer_config: PackerConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>packpoint API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Container type description in the packing request.
#[derive(Deserialize, Clone, ToSchema)]
pub struct ContainerRequest {
    #[schema(value_type = [f64; 3], example = json!([120.0, 100.0, 80.0]))]
    pub dims: (f64, f64, f64),
    /// Weight capacity per container; omit for unbounded.
    #[serde(default)]
    #[schema(nullable = true)]
    pub max_weight: Option<f64>,
}

impl ContainerRequest {
    fn into_spec(self) -> Result<ContainerSpec, ValidationError> {
        ContainerSpec::new(self.dims, self.max_weight)
    }
}

/// Request structure for the packing endpoints.
#[derive(Deserialize, ToSchema)]
#[schema(
    example = json!({
        "container": {
            "dims": [120.0, 100.0, 80.0],
            "max_weight": 500.0
        },
        "items": [
            { "id": 1, "name": "Box1", "dims": [30.0, 20.0, 10.0], "weight": 5.0 }
        ],
        "allow_rotation": true
    })
)]
pub struct PackRequest {
    pub container: ContainerRequest,
    pub items: Vec<Item>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub allow_rotation: Option<bool>,
}

#[derive(Debug)]
struct ValidatedPackRequest {
    spec: ContainerSpec,
    items: Vec<Item>,
    allow_rotation: Option<bool>,
}

impl ValidatedPackRequest {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn into_parts(self) -> (Vec<Item>, ContainerSpec, Option<bool>) {
        (self.items, self.spec, self.allow_rotation)
    }
}

#[derive(Debug)]
enum PackRequestValidationError {
    InvalidContainer(ValidationError),
    InvalidItem(ValidationError),
}

impl PackRequest {
    fn into_validated(self) -> Result<ValidatedPackRequest, PackRequestValidationError> {
        let spec = self
            .container
            .into_spec()
            .map_err(PackRequestValidationError::InvalidContainer)?;

        let items = self
            .items
            .into_iter()
            .map(|item| Item::new(item.id, item.name, item.dims, item.weight))
            .collect::<Result<Vec<_>, ValidationError>>()
            .map_err(PackRequestValidationError::InvalidItem)?;

        Ok(ValidatedPackRequest {
            spec,
            items,
            allow_rotation: self.allow_rotation,
        })
    }
}

/// Response structure with all packed containers.
#[derive(Serialize, ToSchema)]
pub struct PackResponse {
    pub results: Vec<PackedContainer>,
    pub unpacked: Vec<PackedUnpackedItem>,
    pub is_complete: bool,
    pub average_utilization: f64,
}

/// Single container with metadata and placed items.
#[derive(Serialize, ToSchema)]
pub struct PackedContainer {
    pub id: usize,
    #[schema(value_type = [f64; 3], example = json!([120.0, 100.0, 80.0]))]
    pub dims: (f64, f64, f64),
    #[schema(nullable = true)]
    pub max_weight: Option<f64>,
    pub total_weight: f64,
    pub used_volume: f64,
    pub utilization_percent: f64,
    pub placed: Vec<PackedPlacement>,
}

/// Single placed item in the response.
///
/// # Fields
/// * `pos` - Anchor position (x, y, z), the minimum corner
/// * `dims` - Effective dimensions after orientation
/// * `orientation` - Orientation index 0-5
#[derive(Serialize, ToSchema)]
pub struct PackedPlacement {
    pub id: usize,
    #[schema(nullable = true)]
    pub name: Option<String>,
    #[schema(value_type = [f64; 3], example = json!([0.0, 0.0, 0.0]))]
    pub pos: (f64, f64, f64),
    #[schema(value_type = [f64; 3], example = json!([30.0, 20.0, 10.0]))]
    pub dims: (f64, f64, f64),
    pub orientation: usize,
    pub weight: f64,
}

/// Item that could not be packed, with a typed reason.
#[derive(Serialize, ToSchema)]
pub struct PackedUnpackedItem {
    pub id: usize,
    #[schema(nullable = true)]
    pub name: Option<String>,
    #[schema(value_type = [f64; 3], example = json!([100.0, 100.0, 100.0]))]
    pub dims: (f64, f64, f64),
    pub weight: f64,
    pub reason_code: String,
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input data",
        details,
    )
}

fn container_config_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid container configuration",
        details,
    )
}

fn parse_pack_request(
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Result<ValidatedPackRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    match payload.into_validated() {
        Ok(validated) => Ok(validated),
        Err(PackRequestValidationError::InvalidContainer(err)) => {
            Err(container_config_error(err.to_string()))
        }
        Err(PackRequestValidationError::InvalidItem(err)) => {
            Err(validation_error(err.to_string()))
        }
    }
}

impl PackResponse {
    /// Creates a PackResponse from a PackingResult.
    pub fn from_packing_result(result: PackingResult) -> Self {
        let average_utilization = result.average_utilization();
        let PackingResult {
            containers,
            unpacked,
        } = result;

        let is_complete = unpacked.is_empty();

        Self {
            results: containers
                .into_iter()
                .enumerate()
                .map(|(i, container)| {
                    let total_weight = container.used_weight();
                    let used_volume = container.used_volume();
                    let utilization_percent = container.utilization_percent();
                    let Container {
                        dims,
                        max_weight,
                        placed,
                    } = container;

                    PackedContainer {
                        id: i + 1,
                        dims,
                        max_weight: max_weight.is_finite().then_some(max_weight),
                        total_weight,
                        used_volume,
                        utilization_percent,
                        placed: placed
                            .into_iter()
                            .map(|p| PackedPlacement {
                                id: p.item.id,
                                name: p.item.name.clone(),
                                pos: p.position,
                                dims: p.dims,
                                orientation: p.orientation,
                                weight: p.item.weight,
                            })
                            .collect(),
                    }
                })
                .collect(),
            unpacked: unpacked
                .into_iter()
                .map(|entry| PackedUnpackedItem {
                    id: entry.item.id,
                    name: entry.item.name.clone(),
                    dims: entry.item.dims,
                    weight: entry.item.weight,
                    reason_code: entry.reason.code().to_string(),
                    reason: entry.reason.to_string(),
                })
                .collect(),
            is_complete,
            average_utilization,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack, handle_pack_stream),
    components(
        schemas(
            PackRequest,
            ContainerRequest,
            PackResponse,
            PackedContainer,
            PackedPlacement,
            PackedUnpackedItem,
            ErrorResponse,
            Item
        )
    ),
    tags((name = "packing", description = "Endpoints for packing computation"))
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests. Blocks until the server is
/// terminated.
pub async fn start_api_server(config: ApiConfig, packer_config: PackerConfig) {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { packer_config };

    let app = Router::new()
        // API endpoints
        .route("/pack", post(handle_pack))
        .route("/pack_stream", post(handle_pack_stream))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            panic!("❌ Could not bind API server to {}: {}", addr, err);
        }
    };

    let display_host = config.display_host().to_string();
    println!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("📦 API Endpoints:");
    println!("   - POST /pack");
    println!("   - POST /pack_stream");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

/// Handler for POST /pack endpoint.
///
/// Takes a container type and a list of items and packs them into as few
/// containers as possible.
///
/// # Parameters
/// * `payload` - JSON payload with container dimensions and items
///
/// # Returns
/// JSON response with all used containers and placed items
#[utoipa::path(
    post,
    path = "/pack",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Successfully packed items", body = PackResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or container configuration",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let item_count = request.item_count();
    let (items, spec, allow_rotation_override) = request.into_parts();

    println!("📥 New pack request: {} items", item_count);
    let mut packing_config = state.packer_config.packing_config();
    if let Some(allow_rotation) = allow_rotation_override {
        packing_config.allow_rotation = allow_rotation;
    }
    let packing_result = pack_items_with_config(items, spec, packing_config);
    println!(
        "📦 Result: {} containers, {} unpacked items",
        packing_result.container_count(),
        packing_result.unpacked_count()
    );

    let response = PackResponse::from_packing_result(packing_result);
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /pack_stream endpoint (SSE).
///
/// Streams pack events in real-time as Server-Sent Events
/// (text/event-stream). A consumer can visualize each placement live
/// without waiting for the complete result.
#[utoipa::path(
    post,
    path = "/pack_stream",
    request_body = PackRequest,
    responses(
        (
            status = 200,
            description = "Streams pack events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request or container configuration",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack_stream(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (items, spec, allow_rotation_override) = request.into_parts();

    let (tx, rx) = mpsc::channel::<String>(32);

    let mut packing_config = state.packer_config.packing_config();
    if let Some(allow_rotation) = allow_rotation_override {
        packing_config.allow_rotation = allow_rotation;
    }

    tokio::task::spawn_blocking(move || {
        let _ = pack_items_with_progress(items, spec, packing_config, |evt| {
            if let Ok(json) = serde_json::to_string(evt) {
                if tx.blocking_send(json).is_err() {
                    // Receiver has closed the stream; remaining events are discarded.
                    return;
                }
            }
        });
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
