//! Plain HTTP handlers.
//!
//! # Responsibilities
//! - Serve the static index page on `/`
//! - Serve `-returnshtml` pages with the status code encoded in the path
//! - Answer everything else with a plain 404
//!
//! # Design Decisions
//! - The index page is read on every request so edits show up without restart
//! - An unreadable index page is a 500 for that request only

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::FixtureConfig;
use crate::handshake::directive::Directive;
use crate::handshake::response::{HtmlPage, NOT_FOUND_BODY};

const TEXT_HTML: &str = "text/html";

/// State shared by the page handlers.
#[derive(Debug, Clone)]
pub struct PageState {
    index_path: Arc<PathBuf>,
}

/// Build the router for requests without upgrade headers.
pub fn build_router(config: &FixtureConfig) -> Router {
    let state = PageState {
        index_path: Arc::new(PathBuf::from(&config.assets.index_path)),
    };

    Router::new()
        .route("/", any(index_page))
        .fallback(directive_page)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index_page(State(state): State<PageState>) -> Response {
    match tokio::fs::read_to_string(state.index_path.as_path()).await {
        Ok(html) => ([(header::CONTENT_TYPE, TEXT_HTML)], html).into_response(),
        Err(e) => {
            tracing::error!(
                path = %state.index_path.display(),
                error = %e,
                "Failed to read index page"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error loading index.html: {}", e),
            )
                .into_response()
        }
    }
}

async fn directive_page(uri: Uri) -> Response {
    let directive = Directive::for_page(uri.path());

    let Some(page) = HtmlPage::from_directive(&directive) else {
        return (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response();
    };

    let status = u16::try_from(page.status)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);
    let mut response = (status, [(header::CONTENT_TYPE, TEXT_HTML)], page.body()).into_response();
    if let Some(challenge) = page.www_authenticate() {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static(challenge));
    }
    response
}
