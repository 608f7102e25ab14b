use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

mod config;
mod metrics;

use config::AppConfig;
use extract::{
    EntityRecord, Extractor, GeminiClient, ParseDiagnostics, ParseOptions, RelationshipRecord,
    ResponseCache, ResponseParser,
};
use highlight::{LegendEntry, RenderConfig, RenderDiagnostics, render_highlights};
use metrics::{Metrics, MetricsSnapshot, TimedOperation};

struct AppState {
    extractor: Extractor,
    parser: ResponseParser,
    render_config: RenderConfig,
    metrics: Arc<Metrics>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; /analyze will fail until it is");
    }

    let client = GeminiClient::new(config.llm.base_url.clone(), config.llm.model.clone(), api_key)
        .with_timeout(Duration::from_secs(config.llm.request_timeout_secs))?;

    let mut extractor = Extractor::new(client, config.retry_policy());
    if config.cache.enabled {
        extractor = extractor.with_cache(ResponseCache::new(config.cache.max_entries));
    }

    let state = Arc::new(AppState {
        extractor,
        parser: ResponseParser::new(),
        render_config: RenderConfig {
            max_markup_len: config.render.max_markup_len,
        },
        metrics: Metrics::new(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/parse", post(parse_reply))
        .route("/highlight", post(highlight_text))
        .route("/analyze", post(analyze_text))
        .route("/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Server listening on http://localhost:3000");
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.extractor.model().to_string(),
    })
}

fn default_true() -> bool {
    true
}

/// Parse a canned model reply without any model call. Useful for exercising
/// the grammar against recorded replies.
#[derive(Deserialize)]
struct ParseRequest {
    raw: String,
    #[serde(default = "default_true")]
    include_relationships: bool,
    #[serde(default)]
    deduplicate: bool,
}

#[derive(Serialize)]
struct ParseResponse {
    entities: Vec<EntityRecord>,
    relationships: Vec<RelationshipRecord>,
    diagnostics: ParseDiagnostics,
}

async fn parse_reply(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> Json<ParseResponse> {
    let result = state.parser.parse(
        &req.raw,
        &ParseOptions {
            include_relationships: req.include_relationships,
            deduplicate: req.deduplicate,
        },
    );
    Json(ParseResponse {
        entities: result.entities,
        relationships: result.relationships,
        diagnostics: result.diagnostics,
    })
}

#[derive(Deserialize)]
struct HighlightRequest {
    text: String,
    entities: Vec<EntityRecord>,
}

#[derive(Serialize)]
struct HighlightResponse {
    /// None when there was nothing to visualize.
    markup: Option<String>,
    legend: Vec<LegendEntry>,
    diagnostics: RenderDiagnostics,
}

async fn highlight_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HighlightRequest>,
) -> Json<HighlightResponse> {
    let result = render_highlights(&req.text, &req.entities, &state.render_config);
    state.metrics.record_render(result.diagnostics.truncated);
    Json(HighlightResponse {
        markup: result.rendered.into_markup(),
        legend: highlight::legend(&req.entities),
        diagnostics: result.diagnostics,
    })
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
    #[serde(default = "default_true")]
    include_relationships: bool,
    #[serde(default)]
    deduplicate: bool,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    entities: Vec<EntityRecord>,
    relationships: Vec<RelationshipRecord>,
    markup: Option<String>,
    legend: Vec<LegendEntry>,
    parse: ParseDiagnostics,
    render: RenderDiagnostics,
}

async fn analyze_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let request_id = Uuid::new_v4();
    let timer = TimedOperation::start();

    let options = ParseOptions {
        include_relationships: req.include_relationships,
        deduplicate: req.deduplicate,
    };

    let result = match state.extractor.extract(&req.text, &options).await {
        Ok(result) => result,
        Err(e) => {
            state.metrics.record_request(false);
            tracing::error!(%request_id, error = %e, "extraction failed");
            return Err((StatusCode::BAD_GATEWAY, e.to_string()));
        }
    };
    state.metrics.record_request(true);
    state.metrics.record_extract(
        timer.elapsed(),
        result.entities.len(),
        result.relationships.len(),
    );

    let rendered = render_highlights(&req.text, &result.entities, &state.render_config);
    state.metrics.record_render(rendered.diagnostics.truncated);

    tracing::info!(
        %request_id,
        entities = result.entities.len(),
        relationships = result.relationships.len(),
        "analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        legend: highlight::legend(&result.entities),
        entities: result.entities,
        relationships: result.relationships,
        markup: rendered.rendered.into_markup(),
        parse: result.diagnostics,
        render: rendered.diagnostics,
    }))
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
