mod config;
mod models;
mod render;
mod services;
mod session;
mod utils;

use axum::{
    Form, Router,
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use session::Session;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Clone)]
struct AppState {
    generator: Arc<dyn services::llm::TextGenerator>,
    session: Arc<Mutex<Session>>,
}

impl AppState {
    fn new(generator: Arc<dyn services::llm::TextGenerator>) -> Self {
        AppState {
            generator,
            session: Arc::new(Mutex::new(Session::default())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    #[serde(default)]
    topic: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = config::Config::from_env();

    // Create the generation client
    let generator = Arc::new(services::llm::GeminiClient::new(&config)?);

    let app = build_router(AppState::new(generator));

    // Run our application
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(model = %config.model, "Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate_ebook))
        .route("/reset", post(reset))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(render::html::session_page(&session))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn generate_ebook(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Redirect {
    // The lock is released before the service call so the page stays readable
    let request = state.session.lock().await.begin(&form.topic);

    let Some(request) = request else {
        tracing::debug!("Submission ignored");
        return Redirect::to("/");
    };

    // Owned by its own task so a dropped client connection cannot leave the
    // session stuck in the generating phase
    let generator = state.generator.clone();
    let session = state.session.clone();
    let task = tokio::spawn(async move {
        let outcome = services::generator::generate(&request, generator.as_ref()).await;
        session.lock().await.finish(outcome);
    });

    if let Err(err) = task.await {
        tracing::error!(error = %err, "Generation task failed");
        state
            .session
            .lock()
            .await
            .finish(Err(services::generator::GenerationError::Service(err.into())));
    }

    Redirect::to("/")
}

async fn reset(State(state): State<AppState>) -> Redirect {
    if !state.session.lock().await.reset() {
        tracing::debug!("Reset ignored while generating");
    }
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::services::generator::GENERIC_FAILURE_MESSAGE;
    use crate::services::generator::fake::FakeGenerator;
    use crate::session::Phase;
    use axum::body::{Body, to_bytes};
    use http::{Request, StatusCode, header};
    use futures::future::BoxFuture;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    /// Holds every call until `release` is called.
    struct GatedGenerator {
        gate: Notify,
        text: String,
    }

    impl GatedGenerator {
        fn new(text: String) -> Self {
            GatedGenerator {
                gate: Notify::new(),
                text,
            }
        }

        fn release(&self) {
            self.gate.notify_one();
        }
    }

    impl services::llm::TextGenerator for GatedGenerator {
        fn generate_structured<'a>(
            &'a self,
            _request: &'a services::llm::StructuredRequest,
        ) -> BoxFuture<'a, anyhow::Result<Option<String>>> {
            Box::pin(async move {
                self.gate.notified().await;
                Ok(Some(self.text.clone()))
            })
        }
    }

    async fn wait_while_generating(state: &AppState) -> Phase {
        for _ in 0..200 {
            let phase = state.session.lock().await.phase();
            if phase != Phase::Generating {
                return phase;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        Phase::Generating
    }

    fn app(generator: Arc<dyn services::llm::TextGenerator>) -> (Router, AppState) {
        let state = AppState::new(generator);
        (build_router(state.clone()), state)
    }

    fn submit(topic: &str) -> Request<Body> {
        let body = format!("topic={}", topic.replace(' ', "+"));
        Request::post("/generate")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn page(router: &Router) -> String {
        let response = router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (router, _) = app(Arc::new(FakeGenerator::no_text()));
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn blank_topic_issues_no_call() {
        let generator = Arc::new(FakeGenerator::no_text());
        let (router, state) = app(generator.clone());

        let response = router.clone().oneshot(submit("   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(generator.call_count(), 0);
        assert_eq!(state.session.lock().await.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn successful_generation_renders_document() {
        let generator = Arc::new(FakeGenerator::text(fixtures::ebook_json(&[
            "Start", "Soil", "Water", "Harvest",
        ])));
        let (router, state) = app(generator.clone());

        let response = router.clone().oneshot(submit("Urban Gardening")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        assert_eq!(generator.call_count(), 1);
        assert!(generator.calls.lock().unwrap()[0].prompt.contains("Urban Gardening"));
        assert_eq!(state.session.lock().await.phase(), Phase::Complete);

        let html = page(&router).await;
        assert!(html.contains("<h1>Concrete Jungle Harvest</h1>"));
        assert!(html.contains(r#"<span class="num">4.</span>"#));
        assert!(!html.contains(r#"<span class="num">5.</span>"#));
        for number in 1..=4 {
            assert!(html.contains(&format!("<span>Chapter {number}</span>")));
        }
    }

    #[tokio::test]
    async fn transport_error_shows_banner_and_keeps_topic() {
        let generator = Arc::new(FakeGenerator::failing("network unreachable"));
        let (router, state) = app(generator);

        router.clone().oneshot(submit("Urban Gardening")).await.unwrap();
        assert_eq!(state.session.lock().await.phase(), Phase::Error);

        let html = page(&router).await;
        assert!(html.contains(GENERIC_FAILURE_MESSAGE));
        assert!(html.contains(r#"value="Urban Gardening""#));
    }

    #[tokio::test]
    async fn empty_and_invalid_text_follow_the_error_path() {
        for generator in [FakeGenerator::text(""), FakeGenerator::text("not json {")] {
            let (router, state) = app(Arc::new(generator));
            router.clone().oneshot(submit("Urban Gardening")).await.unwrap();

            let session = state.session.lock().await;
            assert_eq!(session.phase(), Phase::Error);
            assert_eq!(session.error(), Some(GENERIC_FAILURE_MESSAGE));
            assert_eq!(session.topic(), "Urban Gardening");
        }
    }

    #[tokio::test]
    async fn reset_discards_document() {
        let generator = Arc::new(FakeGenerator::text(fixtures::ebook_json(&["A", "B"])));
        let (router, state) = app(generator);
        router.clone().oneshot(submit("Urban Gardening")).await.unwrap();

        let response = router
            .clone()
            .oneshot(Request::post("/reset").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        {
            let session = state.session.lock().await;
            assert_eq!(session.phase(), Phase::Idle);
            assert_eq!(session.topic(), "");
            assert!(session.ebook().is_none());
        }

        let html = page(&router).await;
        assert!(html.contains("Build Ebook"));
        assert!(!html.contains("Concrete Jungle Harvest"));
    }

    #[tokio::test]
    async fn submit_while_generating_is_refused() {
        let generator = Arc::new(FakeGenerator::no_text());
        let (router, state) = app(generator.clone());
        state.session.lock().await.begin("Urban Gardening");

        router.oneshot(submit("Stoicism")).await.unwrap();
        assert_eq!(generator.call_count(), 0);
        assert_eq!(state.session.lock().await.topic(), "Urban Gardening");
    }

    #[tokio::test]
    async fn dropped_request_still_finishes_generation() {
        let generator = Arc::new(GatedGenerator::new(fixtures::ebook_json(&["A", "B"])));
        let (router, state) = app(generator.clone());

        // A client that disconnects mid-generation drops the handler future
        let request = router.clone().oneshot(submit("Urban Gardening"));
        let dropped = tokio::time::timeout(Duration::from_millis(50), request).await;
        assert!(dropped.is_err());
        assert_eq!(state.session.lock().await.phase(), Phase::Generating);

        generator.release();
        assert_eq!(wait_while_generating(&state).await, Phase::Complete);

        let mut session = state.session.lock().await;
        assert_eq!(session.ebook().map(|ebook| ebook.chapters.len()), Some(2));
        assert!(session.reset());
    }
}
