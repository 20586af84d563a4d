//! Browser UI assets.
//!
//! The UI is three files: `index.html`, `app.js` and `style.css`.  They are
//! read from the configured static directory on every request, so an
//! operator can restyle the page without rebuilding.  Any file missing from
//! that directory is served from the copy compiled into the binary, so a bare
//! `prompt-relay` with no `static/` directory still has a working UI.

use std::path::{Component, Path, PathBuf};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::debug;

const EMBEDDED: &[(&str, &str)] = &[
    ("index.html", include_str!("../../../static/index.html")),
    ("app.js", include_str!("../../../static/app.js")),
    ("style.css", include_str!("../../../static/style.css")),
];

/// Static asset source: a directory with an embedded fallback.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    dir: PathBuf,
}

impl StaticAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Serves `relative` (e.g. `"app.js"`), or 404.
    pub async fn serve(&self, relative: &str) -> Response {
        if !is_plain_relative(relative) {
            return StatusCode::NOT_FOUND.into_response();
        }

        let bytes = match tokio::fs::read(self.dir.join(relative)).await {
            Ok(bytes) => bytes,
            Err(_) => match embedded(relative) {
                Some(text) => {
                    debug!(asset = relative, "serving embedded asset");
                    text.as_bytes().to_vec()
                }
                None => return StatusCode::NOT_FOUND.into_response(),
            },
        };

        (
            [
                (header::CONTENT_TYPE, content_type(relative)),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            bytes,
        )
            .into_response()
    }
}

fn embedded(name: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, body)| *body)
}

/// Only plain downward paths; no `..`, no absolute paths, no drive prefixes.
fn is_plain_relative(path: &str) -> bool {
    !path.is_empty() && Path::new(path).components().all(|c| matches!(c, Component::Normal(_)))
}

fn content_type(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|e| e.to_str()).unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_directory_falls_back_to_embedded_index() {
        // Arrange
        let dir = tempdir().unwrap();
        let assets = StaticAssets::new(dir.path().join("nope"));

        // Act
        let response = assets.serve("index.html").await;

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert!(body_of(response).await.contains("modelSelect"));
    }

    #[tokio::test]
    async fn test_file_on_disk_wins_over_embedded_copy() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body { color: red; }").unwrap();
        let assets = StaticAssets::new(dir.path());

        let response = assets.serve("style.css").await;

        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(body_of(response).await, "body { color: red; }");
    }

    #[tokio::test]
    async fn test_unknown_asset_is_404() {
        let dir = tempdir().unwrap();
        let response = StaticAssets::new(dir.path()).serve("missing.png").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parent_traversal_is_404() {
        let dir = tempdir().unwrap();
        let response = StaticAssets::new(dir.path()).serve("../Cargo.toml").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_plain_relative_paths() {
        assert!(is_plain_relative("app.js"));
        assert!(is_plain_relative("img/logo.png"));
        assert!(!is_plain_relative(""));
        assert!(!is_plain_relative("/etc/passwd"));
        assert!(!is_plain_relative("a/../../b"));
        assert!(!is_plain_relative("./app.js"));
    }
}
