//! Static asset delivery for the controller page.
//!
//! Serves the browser UI (HTML/JS/CSS) from a configurable root directory on
//! its own HTTP listener, separate from the WebSocket command channel.  The
//! rules are deliberately small:
//!
//! - `/` maps to `index.html`;
//! - any path component that is not a plain file/directory name (`..`, `.`,
//!   an absolute prefix) is answered with `403 Forbidden` — requests are
//!   jailed to the root;
//! - the content type comes from the extension (`.html`, `.js`, `.css`);
//!   anything else is served as `text/plain`;
//! - a file that cannot be read is `404 File not found`.
//!
//! Path resolution is a pure function so the jail rules are testable without
//! a listener.

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{debug, info};

/// Builds the asset router for the given root directory.
pub fn router(public_dir: PathBuf) -> Router {
    Router::new().fallback(serve_asset).with_state(public_dir)
}

/// Binds the HTTP listener and serves assets until the process exits.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_static_server(bind_addr: SocketAddr, public_dir: PathBuf) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind asset listener on {bind_addr}"))?;

    info!("controller page available at http://{bind_addr}/");

    axum::serve(listener, router(public_dir))
        .await
        .context("static asset server failed")?;

    Ok(())
}

async fn serve_asset(State(root): State<PathBuf>, uri: Uri) -> Response {
    let path = match resolve_request_path(&root, uri.path()) {
        Ok(path) => path,
        Err(status) => {
            debug!(path = uri.path(), "rejected asset request");
            return (status, "Forbidden").into_response();
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type_for(&path))], bytes).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

/// Resolves a request path against the asset root.
///
/// Returns `403` for any path that tries to step outside the root.  Only
/// plain-name components survive: `..`, `.`, and absolute prefixes are all
/// rejected rather than normalized.
fn resolve_request_path(root: &Path, request_path: &str) -> Result<PathBuf, StatusCode> {
    let trimmed = request_path.trim_start_matches('/');
    let relative = if trimmed.is_empty() {
        Path::new("index.html")
    } else {
        Path::new(trimmed)
    };

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(root.join(relative))
}

/// Maps a file extension to its content type; unknown extensions default to
/// plain text.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        _ => "text/plain",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
