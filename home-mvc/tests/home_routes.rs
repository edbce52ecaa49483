//! Integration tests driving the Home controller through its router.

use std::sync::Arc;

use axum::{Router, body::Body};
use home_mvc::{
    ControllerRouter, HomeController, ServerInfo,
    caching::{Cache, ControllerExt},
};
use http::{Request, StatusCode, header};
use scraper::{Html, Selector};
use tower::ServiceExt;

fn server_info() -> Arc<ServerInfo> {
    Arc::new(ServerInfo {
        base_url: "http://localhost:3000".parse().unwrap(),
    })
}

fn app() -> Router {
    ControllerRouter::new(HomeController).into_router(server_info())
}

fn cached_app() -> Router {
    ControllerRouter::new(HomeController.with_cache(Cache::default())).into_router(server_info())
}

async fn get(app: Router, uri: &str) -> http::Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();

    app.oneshot(request).await.unwrap()
}

async fn body_text(response: http::Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    String::from_utf8(body.to_vec()).unwrap()
}

fn select_text(html: &str, selector: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(selector).unwrap();

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect())
}

#[tokio::test]
async fn index_renders_index_view() {
    for uri in ["/", "/Home", "/Home/Index", "/home/index/"] {
        let response = get(app(), uri).await;

        assert_eq!(response.status(), StatusCode::OK, "uri: {uri}");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );

        let html = body_text(response).await;
        assert_eq!(select_text(&html, "title").as_deref(), Some("Index"));
        assert_eq!(select_text(&html, "#edit-id"), None);
    }
}

#[tokio::test]
async fn edit_renders_identifier() {
    for (uri, expected) in [
        ("/Home/Edit/42", "42"),
        ("/Home/Edit/0", "0"),
        ("/Home/Edit/-1", "-1"),
        ("/home/edit?id=17", "17"),
    ] {
        let response = get(app(), uri).await;

        assert_eq!(response.status(), StatusCode::OK, "uri: {uri}");

        let html = body_text(response).await;
        assert_eq!(select_text(&html, "title").as_deref(), Some("Edit"));
        assert_eq!(select_text(&html, "#edit-id").as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    for (uri, status) in [
        ("/Home/Edit/abc", StatusCode::BAD_REQUEST),
        ("/Home/Edit/3000000000", StatusCode::BAD_REQUEST),
        ("/Home/Edit", StatusCode::BAD_REQUEST),
        ("/Home/Delete/1", StatusCode::NOT_FOUND),
        ("/favicon.ico", StatusCode::NOT_FOUND),
    ] {
        let response = get(app(), uri).await;

        assert_eq!(response.status(), status, "uri: {uri}");
    }
}

#[tokio::test]
async fn only_get_and_head_are_allowed() {
    let request = Request::head("/Home/Edit/5").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::post("/Home/Edit/5").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
}

#[tokio::test]
async fn cached_pages_are_revalidated() {
    let response = get(cached_app(), "/Home/Edit/42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let etag = response.headers()[header::ETAG].clone();
    assert!(etag.to_str().unwrap().starts_with('"'));
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "private, max-age=60, must-revalidate"
    );

    let request = Request::get("/Home/Edit/42")
        .header(header::IF_NONE_MATCH, etag.clone())
        .body(Body::empty())
        .unwrap();
    let response = cached_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers()[header::ETAG], etag);

    // A different identifier yields a different page.
    let request = Request::get("/Home/Edit/43")
        .header(header::IF_NONE_MATCH, etag.clone())
        .body(Body::empty())
        .unwrap();
    let response = cached_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::get("/Home/Edit/42")
        .header(header::IF_NONE_MATCH, etag)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::empty())
        .unwrap();
    let response = cached_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ETAG).is_none());
}

#[tokio::test]
async fn cached_app_passes_rejections_through() {
    let response = get(cached_app(), "/Home/Edit/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::ETAG).is_none());
}
