// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end proxy flow tests against a mock upstream.

use reqwest::Method;
use url::Url;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portico::server::{router, AppState};
use portico::{ProxyBase, ProxyRequest, ProxyService};

fn base() -> ProxyBase {
    ProxyBase::new("https", "proxy.example")
}

fn request(target: Url, session: &str) -> ProxyRequest {
    ProxyRequest {
        target,
        method: Method::GET,
        body: None,
        user_agent: Some("portico-tests/1.0".to_string()),
        proxy_base: base(),
        session_id: session.to_string(),
    }
}

async fn spawn_server(service: ProxyService) -> String {
    let app = router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn html_is_rewritten_and_shim_injected() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                concat!(
                    "<html><head><title>t</title></head><body>",
                    r#"<a href="/next/page?x=1">next</a>"#,
                    r#"<a href="mailto:a@b.com">mail</a>"#,
                    r#"<img src="/logo.png">"#,
                    "</body></html>",
                )
                .as_bytes(),
                "text/html; charset=utf-8",
            ),
        )
        .mount(&upstream)
        .await;

    let service = ProxyService::new().unwrap();
    let target = Url::parse(&format!("{}/page", upstream.uri())).unwrap();
    let outcome = service.proxy(request(target, "s1")).await.unwrap();

    assert_eq!(outcome.status, 200);
    let body = String::from_utf8(outcome.body.to_vec()).unwrap();

    // Same-origin link and subresource routed through the proxy base
    assert!(body.contains("https://proxy.example/api/proxy?url="));
    assert!(body.contains("%2Fnext%2Fpage%3Fx%3D1"));
    assert!(body.contains("%2Flogo.png"));
    // Untouchables stay untouched
    assert!(body.contains(r#"href="mailto:a@b.com""#));
    // Runtime interceptor and chrome-hiding style are present
    assert!(body.contains("rewriteUrlForProxy"));
    assert!(body.contains("display: none !important"));
}

#[tokio::test]
async fn redirect_chain_collects_cookies_and_returns_final_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", "/second")
                .insert_header("set-cookie", "a=1; Path=/"),
        )
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/final")
                .insert_header("set-cookie", "b=2; HttpOnly"),
        )
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .insert_header("set-cookie", "c=3")
                .set_body_string("arrived"),
        )
        .mount(&upstream)
        .await;

    let service = ProxyService::new().unwrap();
    let target = Url::parse(&format!("{}/start", upstream.uri())).unwrap();
    let outcome = service.proxy(request(target, "chain")).await.unwrap();

    // Caller sees only the final body; every hop's cookie is captured
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.body.as_ref(), b"arrived");

    let session = service.sessions().session("chain");
    assert_eq!(session.serialize(), "a=1; b=2; c=3");
}

#[tokio::test]
async fn collected_cookies_are_replayed_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .insert_header("set-cookie", "sid=secret; Path=/; HttpOnly")
                .set_body_string("ok"),
        )
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "sid=secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("authorized"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let service = ProxyService::new().unwrap();
    let login = Url::parse(&format!("{}/login", upstream.uri())).unwrap();
    service.proxy(request(login, "replay")).await.unwrap();

    let private = Url::parse(&format!("{}/private", upstream.uri())).unwrap();
    let outcome = service.proxy(request(private, "replay")).await.unwrap();
    assert_eq!(outcome.body.as_ref(), b"authorized");
}

#[tokio::test]
async fn redirect_loop_surfaces_last_redirect_response() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .expect(11) // initial fetch + ten followed hops
        .mount(&upstream)
        .await;

    let service = ProxyService::new().unwrap();
    let target = Url::parse(&format!("{}/loop", upstream.uri())).unwrap();
    let outcome = service.proxy(request(target, "loop")).await.unwrap();

    assert_eq!(outcome.status, 302);
}

#[tokio::test]
async fn post_body_is_forwarded_form_encoded() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=x&pass=y"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("posted"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let service = ProxyService::new().unwrap();
    let target = Url::parse(&format!("{}/submit", upstream.uri())).unwrap();
    let outcome = service
        .proxy(ProxyRequest {
            target,
            method: Method::POST,
            body: Some(bytes::Bytes::from_static(b"user=x&pass=y")),
            user_agent: None,
            proxy_base: base(),
            session_id: "post".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(outcome.body.as_ref(), b"posted");
}

#[tokio::test]
async fn css_is_rewritten_and_binary_passes_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/styles.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"body{background:url(/img/bg.png)}".as_slice(), "text/css"),
        )
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw.bin"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(vec![0u8, 159, 146, 150]),
        )
        .mount(&upstream)
        .await;

    let service = ProxyService::new().unwrap();

    let css = Url::parse(&format!("{}/styles.css", upstream.uri())).unwrap();
    let outcome = service.proxy(request(css, "assets")).await.unwrap();
    let body = String::from_utf8(outcome.body.to_vec()).unwrap();
    assert!(body.contains("https://proxy.example/api/proxy?url="));
    assert!(body.contains("%2Fimg%2Fbg.png"));

    let bin = Url::parse(&format!("{}/raw.bin", upstream.uri())).unwrap();
    let outcome = service.proxy(request(bin, "assets")).await.unwrap();
    assert_eq!(outcome.content_type, "application/octet-stream");
    assert_eq!(outcome.body.as_ref(), &[0u8, 159, 146, 150][..]);
}

#[tokio::test]
async fn missing_url_parameter_yields_400_json() {
    let service = ProxyService::new().unwrap();
    let addr = spawn_server(service).await;

    let resp = reqwest::get(format!("{addr}/api/proxy")).await.unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "URL parameter is required");
}

#[tokio::test]
async fn unreachable_upstream_yields_500_json() {
    let service = ProxyService::new().unwrap();
    let addr = spawn_server(service).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{addr}/api/proxy"))
        .query(&[("url", "http://127.0.0.1:9/nothing")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch URL");
}

#[tokio::test]
async fn session_cookie_is_issued_once() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("hello"),
        )
        .mount(&upstream)
        .await;

    let service = ProxyService::new().unwrap();
    let addr = spawn_server(service).await;
    let client = reqwest::Client::new();

    let first = client
        .get(format!("{addr}/api/proxy"))
        .query(&[("url", upstream.uri())])
        .send()
        .await
        .unwrap();
    let set_cookie = first
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("first response issues a session cookie")
        .to_string();
    assert!(set_cookie.starts_with("portico_sid="));
    assert!(set_cookie.contains("HttpOnly"));

    let sid = set_cookie.split(';').next().unwrap().to_string();
    let second = client
        .get(format!("{addr}/api/proxy"))
        .query(&[("url", upstream.uri())])
        .header("cookie", sid)
        .send()
        .await
        .unwrap();
    assert!(second.headers().get("set-cookie").is_none());
}

#[tokio::test]
async fn healthz_responds() {
    let service = ProxyService::new().unwrap();
    let addr = spawn_server(service).await;

    let resp = reqwest::get(format!("{addr}/healthz")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
