//! In-process mock of the storage service used by the integration tests.

// shared across test binaries; not every binary touches every helper
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{self, WebSocketUpgrade};
use axum::extract::{Multipart, Path, RawQuery, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

/// Uploads into this directory id fail with a structured 404.
pub const MISSING_DIRECTORY: &str = "99999999-9999-9999-9999-999999999999";
/// This cid's Sia object has no eTag yet.
pub const PENDING_CID: &str = "pending-cid";
/// Export id whose response is delayed, for cancellation tests.
pub const SLOW_EXPORT: &str = "slow";

pub const TOTAL_SIZE: u64 = 1000;

#[derive(Clone)]
pub struct MockState {
    pub hits: Arc<AtomicUsize>,
    pub upload_hits: Arc<AtomicUsize>,
    pub ws_auth: Arc<Mutex<Option<String>>>,
    pub expected_token: String,
}

impl MockState {
    pub fn transport_hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn upload_count(&self) -> usize {
        self.upload_hits.load(Ordering::SeqCst)
    }
}

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Bind the mock service on an ephemeral port and serve it in the
/// background. Returns the origin plus a handle for assertions.
pub async fn spawn(expected_token: &str) -> (Url, MockState) {
    init_tracing();
    let state = MockState {
        hits: Arc::new(AtomicUsize::new(0)),
        upload_hits: Arc::new(AtomicUsize::new(0)),
        ws_auth: Arc::new(Mutex::new(None)),
        expected_token: expected_token.to_string(),
    };

    let app = router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), state)
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/directory/", get(root_contents))
        .route("/directory", get(segment_lookup))
        .route("/directory/create", post(create_directory))
        .route(
            "/directory/:id",
            get(directory_contents).put(echo_update).delete(op_ok),
        )
        .route("/directory/:id/size", get(directory_size))
        .route("/directory/:id/zip", get(zip_bytes))
        .route("/drives", get(list_drives))
        .route("/drives/create", post(create_drive))
        .route("/drives/:id", put(echo_update).delete(op_ok))
        .route("/drives/:id/contents", get(directory_contents))
        .route("/drives/:id/size", get(directory_size))
        .route("/files/", get(list_files))
        .route("/files/total-size", get(total_size))
        .route("/files/upload", post(upload_file))
        .route("/files/metadata/:cid", get(ipfs_metadata))
        .route("/files/:id", get(get_file).put(echo_update).delete(op_ok))
        .route("/open/object/meta/:user/:cid", get(sia_metadata))
        .route("/api/user/settings", get(read_settings).put(update_settings))
        .route(
            "/api/user/settings/encryption-key",
            get(read_encryption_key).post(op_ok),
        )
        .route(
            "/api/user/settings/custom-edge-nodes",
            get(custom_edge_nodes).post(op_ok),
        )
        .route("/api/storage", get(storage_usage))
        .route("/api/file-access/:file_id/:cid", get(file_access).post(op_ok).put(op_ok).delete(op_ok))
        .route("/api/file-access/password/:file_id/:cid", post(op_ok))
        .route("/retrieval-requests", get(list_retrievals))
        .route("/retrieval-requests/create", post(create_retrieval))
        .route("/dsns/sync", post(op_ok))
        .route("/dsns/upload", post(dsn_upload))
        .route("/dsns/metadata/:cid", post(dsn_metadata))
        .route("/export/:id", post(export_bundle))
        .layer(middleware::from_fn_with_state(state.clone(), count_hits))
        .with_state(state)
}

async fn count_hits(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

fn directory_json(name: &str) -> Value {
    json!({ "id": Uuid::new_v4(), "name": name, "itemCount": 0 })
}

fn file_json(name: &str, directory_id: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "name": name,
        "directoryId": directory_id,
        "ownerId": "7e66e3b8-82be-422a-ba53-5acb1bcf3940",
        "size": 11,
        "cid": "bafybeigdyrmock",
    })
}

async fn root_contents() -> Json<Value> {
    Json(json!({
        "directories": [directory_json("Drive")],
        "files": [],
    }))
}

async fn directory_contents(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "directories": [directory_json("Sub-directory")],
        "files": [file_json("testing.txt", &id)],
    }))
}

async fn segment_lookup(RawQuery(query): RawQuery) -> Json<Value> {
    let query = query.unwrap_or_default();
    let segments: Vec<String> = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "segment[]")
        .map(|(_, value)| value.into_owned())
        .collect();
    let leaf = segments.last().cloned().unwrap_or_default();
    Json(json!({
        "directories": { "id": Uuid::new_v4(), "name": leaf },
        "directoryLink": segments.join("/"),
    }))
}

async fn create_directory(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": Uuid::new_v4(),
        "name": body["name"],
        "itemCount": 0,
        "storageClass": body["storageClass"],
    }))
}

async fn create_drive(Json(body): Json<Value>) -> Json<Value> {
    create_directory(Json(body)).await
}

/// Echoes the raw request body so tests can assert on its exact shape.
async fn echo_update(body: String) -> Json<Value> {
    Json(json!({ "success": true, "message": body }))
}

async fn op_ok() -> Json<Value> {
    Json(json!({ "success": true }))
}

async fn directory_size() -> Json<Value> {
    Json(json!({ "totalSize": 42 }))
}

async fn total_size() -> Json<Value> {
    Json(json!({ "totalSize": TOTAL_SIZE }))
}

async fn zip_bytes() -> Vec<u8> {
    b"PK\x03\x04mock-zip".to_vec()
}

async fn list_drives() -> Json<Value> {
    Json(json!([directory_json("Drive")]))
}

async fn list_files() -> Json<Value> {
    Json(json!([file_json("testing.txt", MISSING_DIRECTORY)]))
}

async fn get_file(Path(id): Path<String>) -> Json<Value> {
    let mut file = file_json("testing.txt", MISSING_DIRECTORY);
    file["id"] = json!(id);
    Json(file)
}

async fn upload_file(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    state.upload_hits.fetch_add(1, Ordering::SeqCst);

    let mut name = String::new();
    let mut directory_id = String::new();
    let mut size = 0usize;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().map(ToString::to_string);
        match field_name.as_deref() {
            Some("name") => name = field.text().await.unwrap(),
            Some("directoryId") => directory_id = field.text().await.unwrap(),
            Some("file") => size = field.bytes().await.unwrap().len(),
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    if directory_id == MISSING_DIRECTORY {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "code": 404, "message": "Directory not found" })),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "code": 201,
            "id": Uuid::new_v4(),
            "name": name,
            "cid": "bafybeigdyrmock",
            "directoryId": directory_id,
            "ownerId": "7e66e3b8-82be-422a-ba53-5acb1bcf3940",
            "size": size,
        })),
    )
        .into_response()
}

async fn ipfs_metadata(Path(cid): Path<String>) -> Json<Value> {
    Json(json!({ "cid": cid, "size": 11, "pinStatus": "pinned" }))
}

async fn sia_metadata(Path((_user, cid)): Path<(String, String)>) -> Json<Value> {
    let e_tag = if cid == PENDING_CID { "" } else { "d41d8cd98f" };
    Json(json!({ "object": { "eTag": e_tag, "size": 11 } }))
}

async fn read_settings() -> Json<Value> {
    Json(json!({ "node": "https://edge-1.stowage.dev", "isSecureMode": false }))
}

async fn update_settings(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "node": body["node"],
        "isSecureMode": body["isSecureMode"],
    }))
}

async fn read_encryption_key() -> Json<Value> {
    Json(json!({ "encryptionKey": "mock-key" }))
}

async fn custom_edge_nodes() -> Json<Value> {
    Json(json!({ "customEdgeNodes": ["https://custom-edge.example/"] }))
}

async fn storage_usage() -> Json<Value> {
    Json(json!({ "capacity": 107374182400u64, "used": 1024 }))
}

async fn file_access() -> Json<Value> {
    Json(json!({
        "secureSharing": "RESTRICTED",
        "emails": ["test@example.com"],
        "passwordSet": true,
    }))
}

async fn list_retrievals() -> Json<Value> {
    Json(json!([{
        "id": Uuid::new_v4(),
        "dsn": "SIA",
        "fileId": Uuid::new_v4(),
        "status": "PENDING",
    }]))
}

async fn create_retrieval(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": Uuid::new_v4(),
        "dsn": body["dsn"],
        "fileId": body["fileId"],
        "status": "PENDING",
    }))
}

async fn dsn_upload(mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let _ = field.bytes().await;
    }
    Json(json!({ "success": true, "code": 201, "cid": "bafybeigdyrmock" }))
}

async fn dsn_metadata() -> Json<Value> {
    Json(json!({ "SIA": { "object": { "eTag": "d41d8cd98f" } } }))
}

async fn export_bundle(Path(id): Path<String>) -> Vec<u8> {
    if id == SLOW_EXPORT {
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    }
    vec![0u8; TOTAL_SIZE as usize]
}

async fn ws_handler(State(state): State<MockState>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| relay(socket, state))
}

/// Auth handshake first, then answer every `*:initialize` announcement
/// with the matching change event.
async fn relay(mut socket: ws::WebSocket, state: MockState) {
    let Some(Ok(ws::Message::Text(auth))) = socket.recv().await else {
        return;
    };
    *state.ws_auth.lock() = Some(auth.clone());
    let auth: Value = serde_json::from_str(&auth).unwrap_or_default();
    if auth["auth"]["token"].as_str() != Some(state.expected_token.as_str()) {
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        let ws::Message::Text(text) = message else {
            continue;
        };
        let Ok(frame) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        let reply = match frame["event"].as_str() {
            Some("directory:initialize") => r#"{"event":"directory:change"}"#,
            Some("total-size:initialize") => r#"{"event":"total-size:change"}"#,
            _ => continue,
        };
        if socket.send(ws::Message::Text(reply.to_string())).await.is_err() {
            break;
        }
    }
}
