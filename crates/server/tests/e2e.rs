mod support;

use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use support::{app, ADMIN, PASSWORD};

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let app = app().await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_console_session() -> anyhow::Result<()> {
    let app = start_server().await?;
    let http = client();
    let url = |path: &str| format!("{}{}", app.base_url, path);

    let res = http
        .put(url("/content/settings"))
        .json(&json!({"updates": {"contact.email": "ops@zarvis.global"}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = http
        .post(url("/auth/login"))
        .json(&json!({"username": ADMIN, "password": PASSWORD}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let me: Value = http.get(url("/auth/me")).send().await?.json().await?;
    assert_eq!(me["authenticated"], true);

    let res = http
        .put(url("/content/settings"))
        .json(&json!({"updates": {"contact.email": "ops@zarvis.global"}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = http
        .post(url("/content/services"))
        .json(&json!({"title": "Discreet Escrow", "description": "Funds held in neutral custody", "orderIndex": 4}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;

    let content: Value = http.get(url("/content")).send().await?.json().await?;
    assert_eq!(content["settings"]["contact.email"], "ops@zarvis.global");
    let last = content["services"].as_array().and_then(|s| s.last()).cloned().unwrap_or(Value::Null);
    assert_eq!(last, created["service"]);

    let res = http.post(url("/auth/logout")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let me: Value = http.get(url("/auth/me")).send().await?.json().await?;
    assert_eq!(me, json!({"authenticated": false}));

    let id = created["service"]["id"].as_i64().unwrap_or_default();
    let res = http.delete(url(&format!("/content/services/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}
