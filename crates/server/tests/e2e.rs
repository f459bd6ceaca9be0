use std::net::SocketAddr;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::storage::JsonDocStore;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::routes::{self, ServerState};
use server::startup::build_cors;

struct TestApp {
    base_url: String,
    data_dir: std::path::PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated data directory per test
    let data_dir = std::env::temp_dir().join(format!("e2e_data_{}", Uuid::new_v4()));
    let store = JsonDocStore::new(&data_dir).await?;

    let app: Router = routes::build_router(ServerState::new(store), build_cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_schema_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // empty listing for an unknown user
    let res = c.get(format!("{}/alice/schemas", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, json!([]));

    // create
    let res = c.post(format!("{}/alice/schemas/new", app.base_url))
        .json(&json!({"name": "Character", "description": "sheet"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let mut schema = res.json::<serde_json::Value>().await?;
    let id = schema["_id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_eq!(schema["version"], 1);

    // persisted where the layout says
    assert!(app.data_dir.join("schemas").join("alice").join(format!("{id}.json")).is_file());

    // save with a variable added; null collections from older clients are accepted
    schema["variables"] = json!({"hp": {"type": "number", "min": 0.0, "options": null, "items": null}});
    schema["visualizations"] = json!(null);
    let res = c.post(format!("{}/alice/schemas/save", app.base_url)).json(&schema).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "schema saved");

    let res = c.get(format!("{}/alice/schemas/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let fetched = res.json::<serde_json::Value>().await?;
    assert_eq!(fetched["variables"]["hp"]["type"], "number");

    let res = c.get(format!("{}/alice/schemas", app.base_url)).send().await?;
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(list.len(), 1);

    // delete, then 404 on get and delete
    let res = c.delete(format!("{}/alice/schemas/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(format!("{}/alice/schemas/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.delete(format!("{}/alice/schemas/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_instance_requires_schema() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.post(format!("{}/bob/instances/new", app.base_url))
        .json(&json!({"name": "Rook", "description": "", "schema_id": "missing"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "invalid schema");

    let schema = c.post(format!("{}/bob/schemas/new", app.base_url))
        .json(&json!({"name": "Sheet"}))
        .send().await?
        .json::<serde_json::Value>().await?;
    let schema_id = schema["_id"].as_str().unwrap_or_default().to_string();

    let res = c.post(format!("{}/bob/instances/new", app.base_url))
        .json(&json!({"name": "Rook", "description": "", "schema_id": schema_id}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let mut instance = res.json::<serde_json::Value>().await?;
    assert_eq!(instance["user_id"], "bob");
    let instance_id = instance["_id"].as_str().unwrap_or_default().to_string();

    instance["variables"] = json!({"hp": 7});
    let res = c.post(format!("{}/bob/instances/save", app.base_url)).json(&instance).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "instance saved");

    let list = c.get(format!("{}/bob/instances", app.base_url))
        .send().await?
        .json::<Vec<serde_json::Value>>().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["variables"]["hp"], 7);

    let owners = c.get(format!("{}/admin/collections/instances", app.base_url))
        .send().await?
        .json::<serde_json::Value>().await?;
    assert_eq!(owners["bob"], json!([instance_id]));
    Ok(())
}

#[tokio::test]
async fn e2e_admin_lists_owners_and_rejects_unknown_collection() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for user in ["carol", "dave"] {
        let res = c.post(format!("{}/{user}/schemas/new", app.base_url)).json(&json!({})).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }
    std::fs::create_dir_all(app.data_dir.join("schemas").join("erin"))?;

    let owners = c.get(format!("{}/admin/collections/schemas", app.base_url))
        .send().await?
        .json::<std::collections::BTreeMap<String, Vec<String>>>().await?;
    assert_eq!(owners.len(), 3);
    assert_eq!(owners["carol"].len(), 1);
    assert!(owners["erin"].is_empty());

    let res = c.get(format!("{}/admin/collections/secrets", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_rejects_traversal_and_bad_json() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // an encoded separator decodes into the user segment
    let res = c.get(format!("{}/a%2Fb/schemas", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.post(format!("{}/frank/schemas/save", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "invalid JSON");

    // well-formed JSON of the wrong shape gets the same body
    let res = c.post(format!("{}/frank/instances/new", app.base_url))
        .json(&json!({"name": 7}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<serde_json::Value>().await?["error"], "invalid JSON");

    let now = chrono::Utc::now();
    let res = c.post(format!("{}/frank/schemas/save", app.base_url))
        .json(&json!({"_id": "", "created_at": now, "updated_at": now}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}
