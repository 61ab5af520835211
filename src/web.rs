//! HTTP surface: the single page plus the JSON endpoint its button posts to.

use crate::app::App;
use crate::error::ErrorKind;
use crate::models::{Click, InteractionOutcome};
use crate::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

const INDEX_HTML: &str = include_str!("../data/index.html");
const REFINE_ERROR: &str = "Error refining prompt. Please try again.";
const EMPTY_PROMPT: &str = "Please enter a prompt.";

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/interactions", post(create_interaction))
        .with_state(app)
}

pub async fn serve(listener: TcpListener, app: Arc<App>) -> Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(app)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_interaction(State(app): State<Arc<App>>, Json(click): Json<Click>) -> Response {
    match app.handle(&click).await {
        Ok(Some(outcome)) => Json(outcome).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            let (status, message) = match e.kind() {
                ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, EMPTY_PROMPT),
                _ => (StatusCode::BAD_GATEWAY, REFINE_ERROR),
            };
            let outcome = InteractionOutcome {
                image_url: None,
                loading_indicator: None,
                status: message.to_string(),
            };
            (status, Json(outcome)).into_response()
        }
    }
}
