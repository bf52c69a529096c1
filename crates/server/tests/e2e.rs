use std::net::SocketAddr;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::ServiceRequestStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Fresh store per test run; nothing is shared between tests.
    let store = ServiceRequestStore::new();
    let state = ServerState { store };

    let app: Router = routes::build_router(CorsLayer::very_permissive(), state);
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
async fn e2e_service_request_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let base = format!("{}/servicerequest", app.base_url);

    // empty store lists as no-content
    let res = c.get(&base).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    // create A
    let res = c
        .post(&base)
        .json(&json!({"buildingCode": "B1", "description": "hvac down"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let a = res.json::<serde_json::Value>().await?;
    let a_id = a["id"].as_str().expect("id").to_string();
    assert!(!Uuid::parse_str(&a_id)?.is_nil());
    assert_eq!(a["currentStatus"], "Created");
    assert_eq!(a["createdBy"], "System admin");
    assert!(a["createdDate"].is_string());
    assert!(a["lastModifiedDate"].is_null());

    // create B
    let res = c
        .post(&base)
        .json(&json!({"buildingCode": "B2", "description": "leak", "createdBy": "facilities"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let b = res.json::<serde_json::Value>().await?;
    assert_eq!(b["createdBy"], "facilities");

    // both are open
    let res = c.get(&base).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let open = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(open.len(), 2);

    // update A; creation provenance must survive whatever the payload says
    let res = c
        .put(format!("{}/{}", base, a_id))
        .json(&json!({
            "buildingCode": "B1",
            "description": "hvac repaired twice",
            "currentStatus": "InProgress",
            "createdBy": "impostor"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = c.get(format!("{}/{}", base, a_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let a_after = res.json::<serde_json::Value>().await?;
    assert_eq!(a_after["description"], "hvac repaired twice");
    assert_eq!(a_after["currentStatus"], "InProgress");
    assert_eq!(a_after["createdBy"], "System admin");
    assert_eq!(a_after["createdDate"], a["createdDate"]);
    assert_eq!(a_after["lastModifiedBy"], "System admin");
    assert!(a_after["lastModifiedDate"].is_string());

    // soft delete A
    let res = c.delete(format!("{}/{}", base, a_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // A is out of the list but still addressable, now Complete
    let res = c.get(&base).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let open = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["buildingCode"], "B2");

    let res = c.get(format!("{}/{}", base, a_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let a_deleted = res.json::<serde_json::Value>().await?;
    assert_eq!(a_deleted["currentStatus"], "Complete");
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_and_nil_ids() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let base = format!("{}/servicerequest", app.base_url);
    let unknown = Uuid::new_v4();

    let res = c.get(format!("{}/{}", base, unknown)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c
        .put(format!("{}/{}", base, unknown))
        .json(&json!({"buildingCode": "B1", "description": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/{}", base, unknown)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.get(format!("{}/{}", base, Uuid::nil())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_duplicate_caller_supplied_id_conflicts() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let base = format!("{}/servicerequest", app.base_url);
    let id = Uuid::new_v4();

    let res = c
        .post(&base)
        .json(&json!({"id": id, "buildingCode": "B1", "description": "first"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created["id"], id.to_string());

    let res = c
        .post(&base)
        .json(&json!({"id": id, "buildingCode": "B1", "description": "second"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Conflict");
    Ok(())
}
