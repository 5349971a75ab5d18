//! HTTP server for the feed, articles and static assets

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{html_escape, ContentKind, MarkdownRenderer};
use crate::feed::FEED_CONTENT_TYPE;
use crate::Folio;

/// Server state
struct ServerState {
    folio: Folio,
    renderer: MarkdownRenderer,
}

/// Build the application router
pub fn router(folio: Folio) -> Router {
    let feed_route = format!("/{}", folio.config.feed_path.trim_start_matches('/'));
    let renderer = MarkdownRenderer::new(&folio.config.highlight_theme);
    let state = Arc::new(ServerState { folio, renderer });

    Router::new()
        .route(&feed_route, get(feed_handler))
        .route("/:kind/:slug", get(article_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: Folio, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;
    let feed_url = format!("http://{}:{}/{}", ip, port, folio.config.feed_path);

    let app = router(folio);

    println!("Server running at http://{}:{}", ip, port);
    println!("Feed available at {}", feed_url);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Regenerate the feed from disk on every request
async fn feed_handler(State(state): State<Arc<ServerState>>) -> Response {
    let result = tokio::task::spawn_blocking(move || state.folio.feed_xml()).await;

    match result {
        Ok(Ok(xml)) => ([(header::CONTENT_TYPE, FEED_CONTENT_TYPE)], xml).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Feed generation failed: {:#}", e);
            internal_error()
        }
        Err(e) => {
            tracing::error!("Feed task panicked: {}", e);
            internal_error()
        }
    }
}

/// Render a single article as HTML
async fn article_handler(
    State(state): State<Arc<ServerState>>,
    Path((kind, slug)): Path<(String, String)>,
    request: Request<Body>,
) -> Response {
    let Ok(kind) = kind.parse::<ContentKind>() else {
        return serve_static(&state, request).await;
    };

    let lookup_state = state.clone();
    let result =
        tokio::task::spawn_blocking(move || lookup_state.folio.article(kind, &slug)).await;

    match result {
        Ok(Ok(Some(article))) => {
            let body = state.renderer.render(&article.body);
            let record = &article.record;
            let html = format!(
                "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} | {}</title>\n</head>\n<body>\n<article>\n<h1>{}</h1>\n<time datetime=\"{}\">{}</time>\n{}</article>\n</body>\n</html>\n",
                html_escape(&state.folio.config.language),
                html_escape(&record.title),
                html_escape(&state.folio.config.title),
                html_escape(&record.title),
                record.date.to_rfc3339(),
                record.date.format("%Y-%m-%d"),
                body
            );
            Html(html).into_response()
        }
        Ok(Ok(None)) => not_found(),
        Ok(Err(e)) => {
            tracing::error!("Failed to load article: {:#}", anyhow::Error::from(e));
            internal_error()
        }
        Err(e) => {
            tracing::error!("Article task panicked: {}", e);
            internal_error()
        }
    }
}

/// Serve everything else from the public directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    serve_static(&state, request).await
}

async fn serve_static(state: &ServerState, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.folio.public_dir);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => internal_error(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site(files: &[(&str, &str)]) -> (TempDir, Folio) {
        let tmp = TempDir::new().unwrap();
        for dir in ["content/blogs", "content/weeklies", "public/assets"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        for (path, content) in files {
            fs::write(tmp.path().join(path), content).unwrap();
        }
        let folio = Folio::new(tmp.path()).unwrap();
        (tmp, folio)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8_lossy(&bytes).to_string())
    }

    #[tokio::test]
    async fn test_feed_is_xml() {
        let (_tmp, folio) = site(&[(
            "content/blogs/hello.md",
            "---\ntitle: Hello\ndate: 2024-01-01\n---\nHi\n",
        )]);

        let (status, content_type, body) = get(router(folio), "/feed.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/xml"));
        assert!(body.contains("blog-hello"));
    }

    #[tokio::test]
    async fn test_invalid_content_is_server_error() {
        let (_tmp, folio) = site(&[("content/weeklies/bad.md", "no front-matter at all\n")]);

        let (status, _, body) = get(router(folio), "/feed.xml").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("bad.md"));
    }

    #[tokio::test]
    async fn test_article_page() {
        let (_tmp, folio) = site(&[(
            "content/blogs/intro.md",
            "---\ntitle: Intro <1>\ndate: 2024-01-01\n---\n# Heading\n",
        )]);
        let app = router(folio);

        let (status, _, body) = get(app.clone(), "/blog/intro").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Intro &lt;1&gt;</h1>"));
        assert!(body.contains("<h1>Heading</h1>"));

        let (status, _, _) = get(app.clone(), "/weekly/intro").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get(app.clone(), "/blogs/intro").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get(app, "/project/intro").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_assets() {
        let (_tmp, folio) = site(&[("public/assets/avatar.png", "png-bytes")]);

        let (status, _, body) = get(router(folio), "/assets/avatar.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "png-bytes");
    }
}
