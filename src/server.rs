//! HTTP front end for question lookup.
//!
//! The corpus is loaded once before the listener is bound; every request
//! then runs a read-only scan over the shared [`Matcher`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Question form |
//! | `POST` | `/` | Form submission (`question` field), renders the answer |
//! | `POST` | `/ask` | JSON `{"question": ".."}` → `{"found": .., "answer": ..}` |
//! | `GET`  | `/health` | Health check (version and pair count) |
//!
//! JSON errors use the shape
//! `{ "error": { "code": "bad_request", "message": "question must not be empty" } }`.

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::corpus;
use crate::matcher::{AnswerResult, Matcher};

/// Shared state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    matcher: Arc<Matcher>,
    not_found_message: Arc<str>,
}

/// `qaf serve`: load the corpus, then serve until the process is terminated.
pub async fn run_serve(config: &Config) -> anyhow::Result<()> {
    let corpus = corpus::load_from_config(config)?;
    let matcher = Matcher::new(corpus, config.matching.threshold);
    run_server(config, Arc::new(matcher)).await
}

/// Binds `[server].bind` and serves the given matcher.
pub async fn run_server(config: &Config, matcher: Arc<Matcher>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pairs = matcher.corpus().len();
    let app = router(matcher, &config.server.not_found_message);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!(bind = %bind_addr, pairs, "server listening");
    println!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the application router.
pub fn router(matcher: Arc<Matcher>, not_found_message: &str) -> Router {
    let state = AppState {
        matcher,
        not_found_message: Arc::from(not_found_message),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_form).post(handle_form_submit))
        .route("/ask", post(handle_ask))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

// ============ GET / and POST / ============

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Поиск ответов</title>
</head>
<body>
    <h1>Поиск по вопросам (Приблизительный поиск)</h1>
    <form method="POST">
        <label for="question">Введите вопрос:</label><br>
        <input type="text" id="question" name="question" style="width:300px;" required>
        <button type="submit">Найти ответ</button>
    </form>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Renders the form page, with a result section when `answer` is set.
fn render_page(answer: Option<&str>) -> String {
    let mut page = String::from(PAGE_HEAD);
    if let Some(answer) = answer {
        page.push_str("    <hr>\n    <h2>Результат:</h2>\n    <p>");
        page.push_str(&escape_html(answer));
        page.push_str("</p>\n");
    }
    page.push_str(PAGE_TAIL);
    page
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Deserialize)]
struct QuestionForm {
    #[serde(default)]
    question: String,
}

async fn handle_form() -> Html<String> {
    Html(render_page(None))
}

async fn handle_form_submit(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> Html<String> {
    let result = state.matcher.answer(form.question.trim());
    let text = result.answer().unwrap_or(&*state.not_found_message);
    Html(render_page(Some(text)))
}

// ============ POST /ask ============

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AnswerResult>, AppError> {
    if req.question.trim().is_empty() {
        return Err(bad_request("question must not be empty"));
    }
    Ok(Json(state.matcher.answer(&req.question)))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    pairs: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pairs: state.matcher.corpus().len(),
    })
}
