//! HTTP gateway for standin.
//!
//! Exposes the answer pipeline over HTTP:
//! - `POST /api/chat/stream` — ask a question, receive an SSE event stream
//! - `GET  /health`          — liveness and readiness
//!
//! Built on Axum. Input policy lives here, not in the pipeline: an empty
//! question is a 400, a missing pipeline (no API key configured) is a 503.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    response::sse::{Event as SseEvent, Sse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use standin_config::AppConfig;
use standin_core::snippet::SnippetStore;
use standin_pipeline::{ContextAggregator, PromptTemplate, Shortcut, ShortcutTable, TurnPipeline};
use standin_providers::OpenAiCompatGenerator;
use standin_retrieval::{ChromaStore, LocalVectorStore};

/// Shared application state for the gateway.
pub struct GatewayState {
    /// `None` until a generation API key is configured; requests get 503.
    pub pipeline: Option<Arc<TurnPipeline>>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat/stream", post(chat_stream_handler))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the answer pipeline from configuration.
pub async fn build_pipeline(config: &AppConfig) -> standin_core::Result<TurnPipeline> {
    let store: Arc<dyn SnippetStore> = match config.retrieval.backend.as_str() {
        "chroma" => Arc::new(ChromaStore::new(&config.retrieval.chroma_url)?),
        _ => match &config.retrieval.data_dir {
            Some(dir) => Arc::new(LocalVectorStore::load_from_dir(dir).await?),
            None => Arc::new(LocalVectorStore::new()),
        },
    };

    let api_key = config
        .generation
        .api_key
        .clone()
        .ok_or_else(|| standin_core::Error::Config {
            message: "no generation API key configured (set STANDIN_API_KEY)".into(),
        })?;

    let generator_name = if config.generation.base_url.contains("groq") {
        "groq"
    } else {
        "openai-compat"
    };
    let generator = OpenAiCompatGenerator::new(
        generator_name,
        &config.generation.base_url,
        api_key,
        &config.generation.model,
    )?;

    let template = match (&config.prompt.template, &config.prompt.template_file) {
        (Some(inline), _) => PromptTemplate::new(inline),
        (None, Some(path)) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| standin_core::Error::Config {
                    message: format!("cannot read prompt template {}: {e}", path.display()),
                })?;
            PromptTemplate::new(content)
        }
        (None, None) => Ok(PromptTemplate::default()),
    }
    .map_err(|e| standin_core::Error::Config {
        message: e.to_string(),
    })?;

    let shortcuts = ShortcutTable::new(
        config
            .shortcuts
            .iter()
            .map(|s| Shortcut::new(s.keywords.clone(), &s.answer))
            .collect(),
    );

    let aggregator = ContextAggregator::new(
        store,
        config.collection_refs(),
        config.retrieval.parallel,
    );

    Ok(TurnPipeline::new(
        Arc::new(generator),
        aggregator,
        template,
        config.history.max_history,
    )
    .with_shortcuts(shortcuts)
    .with_sampling(
        config.generation.temperature,
        Some(config.generation.max_tokens),
    ))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let pipeline = if config.has_api_key() {
        Some(Arc::new(build_pipeline(&config).await?))
    } else {
        warn!("No generation API key found — gateway starts degraded, chat returns 503");
        None
    };

    let state = Arc::new(GatewayState {
        pipeline,
        started_at: chrono::Utc::now(),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    pipeline_ready: bool,
    uptime_secs: i64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        pipeline_ready: state.pipeline.is_some(),
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}

#[derive(Deserialize)]
struct ChatRequest {
    question: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// `POST /api/chat/stream` — ask a question, receive an SSE stream of
/// `chunk` events (and at most one terminal `error` event).
async fn chat_stream_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<
    Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>>,
    (StatusCode, Json<ErrorResponse>),
> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "question must not be empty".into(),
            }),
        ));
    }

    let Some(pipeline) = state.pipeline.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "pipeline not ready — no generation API key configured".into(),
            }),
        ));
    };

    info!(question_len = question.len(), "chat/stream request");

    let rx = pipeline.handle(question);

    let stream = ReceiverStream::new(rx).map(|event| {
        let event_type = event.event_type().to_string();
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(SseEvent::default().event(event_type).data(data))
    });

    Ok(Sse::new(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use standin_core::error::{GenerationError, RetrievalError};
    use standin_core::generator::{GenerationRequest, Generator, TokenChunk};
    use standin_core::snippet::{CollectionRef, Snippet};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    struct CannedGenerator(Vec<&'static str>);

    #[async_trait]
    impl Generator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn stream(
            &self,
            _request: GenerationRequest,
        ) -> Result<mpsc::Receiver<Result<TokenChunk, GenerationError>>, GenerationError> {
            let (tx, rx) = mpsc::channel(8);
            let chunks = self.0.clone();
            tokio::spawn(async move {
                for c in chunks {
                    if tx.send(Ok(TokenChunk::text(c))).await.is_err() {
                        return;
                    }
                }
                let _ = tx.send(Ok(TokenChunk::done())).await;
            });
            Ok(rx)
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl SnippetStore for EmptyStore {
        fn name(&self) -> &str {
            "empty"
        }

        async fn search(
            &self,
            _collection: &str,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<Snippet>, RetrievalError> {
            Ok(vec![])
        }
    }

    fn ready_state() -> SharedState {
        let aggregator = ContextAggregator::new(
            Arc::new(EmptyStore),
            vec![CollectionRef::new("personal", 3)],
            true,
        );
        let pipeline = TurnPipeline::new(
            Arc::new(CannedGenerator(vec!["Hello ", "world"])),
            aggregator,
            PromptTemplate::default(),
            6,
        );
        Arc::new(GatewayState {
            pipeline: Some(Arc::new(pipeline)),
            started_at: chrono::Utc::now(),
        })
    }

    fn degraded_state() -> SharedState {
        Arc::new(GatewayState {
            pipeline: None,
            started_at: chrono::Utc::now(),
        })
    }

    fn chat_request(question: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat/stream")
            .header("Content-Type", "application/json")
            .body(Body::from(format!(r#"{{"question":{question:?}}}"#)))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_readiness() {
        let app = build_router(ready_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["pipeline_ready"], true);
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let app = build_router(ready_state());
        let response = app.oneshot(chat_request("   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn degraded_gateway_returns_503() {
        let app = build_router(degraded_state());
        let response = app.oneshot(chat_request("hello")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let health = build_router(degraded_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        // Health stays 200 even when degraded.
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_streams_sse_chunks() {
        let app = build_router(ready_state());
        let response = app.oneshot(chat_request("who are you?")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ct| ct.starts_with("text/event-stream"))
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("event: chunk"));
        assert!(text.contains("Hello "));
        assert!(text.contains("world"));
        assert!(!text.contains("event: error"));
    }
}
