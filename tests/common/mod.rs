use anyhow::{Context, Result};
use serde_json::{json, Value};

use campus_care_api::routes;
use campus_care_api::state::AppState;

/// One fresh in-process server per call: every test gets its own empty store,
/// so suites never bleed state into each other.
pub struct TestServer {
    pub base_url: String,
}

pub async fn spawn_server() -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let app = routes::app(AppState::new());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server exited: {}", e);
        }
    });

    Ok(TestServer { base_url: format!("http://127.0.0.1:{}", port) })
}

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// A valid student registration body; callers override what they test.
pub fn student_body(email: &str) -> Value {
    json!({
        "username": "Foulen Fouleni",
        "email": email,
        "password": "secret123",
        "date_of_birth": "1999-04-02",
        "role": "student",
        "speciality": "TWIN",
        "level": 3
    })
}

pub async fn register(server: &TestServer, body: &Value) -> Result<Value> {
    let res = client()
        .post(format!("{}/auth/register", server.base_url))
        .json(body)
        .send()
        .await?;
    anyhow::ensure!(res.status() == 201, "register failed: {}", res.text().await?);
    Ok(res.json::<Value>().await?["data"].clone())
}

pub async fn login(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let res = client()
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == 200, "login failed: {}", res.text().await?);
    let body = res.json::<Value>().await?;
    Ok(body["data"]["token"].as_str().context("no token in login response")?.to_string())
}

/// Register a student and sign in, returning (token, user id).
pub async fn student_session(server: &TestServer, email: &str) -> Result<(String, String)> {
    let user = register(server, &student_body(email)).await?;
    let token = login(server, email, "secret123").await?;
    Ok((token, user["id"].as_str().context("no user id")?.to_string()))
}

/// Register an admin (development registration secret) and sign in.
pub async fn admin_session(server: &TestServer, email: &str) -> Result<(String, String)> {
    let body = json!({
        "username": "Site Admin",
        "email": email,
        "password": "secret123",
        "date_of_birth": "1990-01-15",
        "role": "admin",
        "admin_secret": "dev-admin"
    });
    let user = register(server, &body).await?;
    let token = login(server, email, "secret123").await?;
    Ok((token, user["id"].as_str().context("no user id")?.to_string()))
}

/// Register an association member and sign in.
pub async fn member_session(server: &TestServer, email: &str) -> Result<(String, String)> {
    let body = json!({
        "username": "Club Lead",
        "email": email,
        "password": "secret123",
        "date_of_birth": "1995-06-20",
        "role": "association_member"
    });
    let user = register(server, &body).await?;
    let token = login(server, email, "secret123").await?;
    Ok((token, user["id"].as_str().context("no user id")?.to_string()))
}
