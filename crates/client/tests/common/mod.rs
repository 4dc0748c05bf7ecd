//! In-process mock Girder backend for integration tests.
//!
//! Serves the listing and mutation endpoints the client depends on,
//! records every request, and supports latency and failure injection
//! so tests can pin down ordering and rollback behavior.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use girdertree_client::TreeviewConfig;
use girdertree_core::Entity;

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub params: Vec<(String, String)>,
}

#[derive(Default)]
pub struct MockState {
    pub me: Mutex<Option<Value>>,
    pub folders: Mutex<Vec<Value>>,
    pub items: Mutex<Vec<Value>>,
    /// Files keyed by owning item id.
    pub files: Mutex<HashMap<String, Vec<Value>>>,
    pub collections: Mutex<Vec<Value>>,
    pub users: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<Recorded>>,
    pub folder_creates: AtomicUsize,
    pub item_creates: AtomicUsize,
    /// Artificial handler latency in milliseconds, keyed by path.
    pub delays: Mutex<HashMap<String, u64>>,
    /// Requests to answer with a 500, keyed by "METHOD /path".
    pub fail: Mutex<HashSet<String>>,
    /// Girder-Token header of the most recent request, if any.
    pub last_token: Mutex<Option<String>>,
    next_id: AtomicUsize,
}

impl MockState {
    fn record(&self, method: &str, path: &str, params: &HashMap<String, String>) {
        self.requests.lock().unwrap().push(Recorded {
            method: method.to_string(),
            path: path.to_string(),
            params: params.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        });
    }

    fn should_fail(&self, key: &str) -> bool {
        self.fail.lock().unwrap().contains(key)
    }

    async fn apply_delay(&self, path: &str) {
        let ms = self.delays.lock().unwrap().get(path).copied();
        if let Some(ms) = ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn new_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Number of non-GET requests the backend has received.
    pub fn mutation_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method != "GET")
            .count()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn set_delay(&self, path: &str, ms: u64) {
        self.delays.lock().unwrap().insert(path.to_string(), ms);
    }

    pub fn fail_on(&self, key: &str) {
        self.fail.lock().unwrap().insert(key.to_string());
    }

    pub fn recover(&self, key: &str) {
        self.fail.lock().unwrap().remove(key);
    }

    // ---- seeding ----

    pub fn login(&self, id: &str, login: &str) -> Value {
        let user = json!({
            "_id": id, "_modelType": "user", "login": login,
            "firstName": "Test", "lastName": "User", "_accessLevel": 2,
        });
        *self.me.lock().unwrap() = Some(user.clone());
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn add_user(&self, id: &str, login: &str) -> Value {
        let user = json!({
            "_id": id, "_modelType": "user", "login": login, "_accessLevel": 0,
        });
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn add_collection(&self, id: &str, name: &str, access: i64) -> Value {
        let collection = json!({
            "_id": id, "_modelType": "collection", "name": name, "_accessLevel": access,
        });
        self.collections.lock().unwrap().push(collection.clone());
        collection
    }

    pub fn add_folder(
        &self,
        id: &str,
        name: &str,
        parent_type: &str,
        parent_id: &str,
        access: i64,
    ) -> Value {
        let folder = json!({
            "_id": id, "_modelType": "folder", "name": name,
            "parentCollection": parent_type, "parentId": parent_id,
            "_accessLevel": access,
        });
        self.folders.lock().unwrap().push(folder.clone());
        folder
    }

    pub fn add_item(&self, id: &str, name: &str, folder_id: &str) -> Value {
        let item = json!({
            "_id": id, "_modelType": "item", "name": name, "folderId": folder_id,
        });
        self.items.lock().unwrap().push(item.clone());
        item
    }

    pub fn add_file(&self, item_id: &str, id: &str, name: &str, mime: &str) -> Value {
        let file = json!({
            "_id": id, "_modelType": "file", "name": name, "mimeType": mime,
        });
        self.files
            .lock()
            .unwrap()
            .entry(item_id.to_string())
            .or_default()
            .push(file.clone());
        file
    }

    // ---- state lookups ----

    pub fn folder(&self, id: &str) -> Value {
        self.folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| f["_id"] == id)
            .cloned()
            .unwrap_or_else(|| panic!("no folder {id}"))
    }

    pub fn item(&self, id: &str) -> Value {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i["_id"] == id)
            .cloned()
            .unwrap_or_else(|| panic!("no item {id}"))
    }
}

/// A running mock backend bound to an ephemeral port.
pub struct MockGirder {
    pub url: String,
    pub state: Arc<MockState>,
}

impl MockGirder {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/user/me", get(user_me))
            .route("/user", get(list_users))
            .route("/collection", get(list_collections))
            .route("/folder", get(list_folders).post(create_folder))
            .route("/item", get(list_items).post(create_item))
            .route("/item/{id}/files", get(list_files))
            .route("/folder/{id}", axum::routing::put(update_folder))
            .route("/item/{id}", axum::routing::put(update_item))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> TreeviewConfig {
        TreeviewConfig::new(&self.url)
    }
}

/// Convert a seeded JSON value into the typed wire entity.
pub fn to_entity(value: &Value) -> Entity {
    serde_json::from_value(value.clone()).expect("seeded value is a valid entity")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

type Shared = State<Arc<MockState>>;

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "injected failure"})),
    )
        .into_response()
}

fn page(list: Vec<Value>, params: &HashMap<String, String>) -> Vec<Value> {
    let offset: usize = params
        .get("offset")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let limit: usize = params
        .get("limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(50);
    list.into_iter().skip(offset).take(limit).collect()
}

async fn user_me(State(state): Shared, headers: HeaderMap) -> Response {
    *state.last_token.lock().unwrap() = headers
        .get("Girder-Token")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.record("GET", "/user/me", &HashMap::new());
    if state.should_fail("GET /user/me") {
        return failure();
    }
    let me = state.me.lock().unwrap().clone();
    Json(me.unwrap_or(Value::Null)).into_response()
}

async fn list_users(State(state): Shared, Query(params): Query<HashMap<String, String>>) -> Response {
    state.record("GET", "/user", &params);
    if state.should_fail("GET /user") {
        return failure();
    }
    let users = state.users.lock().unwrap().clone();
    Json(Value::Array(page(users, &params))).into_response()
}

async fn list_collections(
    State(state): Shared,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("GET", "/collection", &params);
    if state.should_fail("GET /collection") {
        return failure();
    }
    let collections = state.collections.lock().unwrap().clone();
    Json(Value::Array(page(collections, &params))).into_response()
}

async fn list_folders(
    State(state): Shared,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("GET", "/folder", &params);
    if state.should_fail("GET /folder") {
        return failure();
    }
    state.apply_delay("/folder").await;
    let folders: Vec<Value> = state
        .folders
        .lock()
        .unwrap()
        .iter()
        .filter(|f| {
            params
                .get("parentType")
                .is_none_or(|t| f["parentCollection"] == *t)
                && params.get("parentId").is_none_or(|id| f["parentId"] == *id)
                && params.get("name").is_none_or(|n| f["name"] == *n)
        })
        .cloned()
        .collect();
    Json(Value::Array(page(folders, &params))).into_response()
}

async fn list_items(State(state): Shared, Query(params): Query<HashMap<String, String>>) -> Response {
    state.record("GET", "/item", &params);
    if state.should_fail("GET /item") {
        return failure();
    }
    state.apply_delay("/item").await;
    let items: Vec<Value> = state
        .items
        .lock()
        .unwrap()
        .iter()
        .filter(|i| params.get("folderId").is_none_or(|id| i["folderId"] == *id))
        .cloned()
        .collect();
    Json(Value::Array(page(items, &params))).into_response()
}

async fn list_files(
    State(state): Shared,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = format!("/item/{id}/files");
    state.record("GET", &path, &params);
    if state.should_fail(&format!("GET {path}")) {
        return failure();
    }
    let files = state
        .files
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(page(files, &params))).into_response()
}

async fn create_folder(
    State(state): Shared,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("POST", "/folder", &params);
    if state.should_fail("POST /folder") {
        return failure();
    }
    state.folder_creates.fetch_add(1, Ordering::SeqCst);
    let folder = json!({
        "_id": state.new_id("folder"),
        "_modelType": "folder",
        "name": params.get("name").cloned().unwrap_or_default(),
        "parentCollection": params.get("parentType").cloned().unwrap_or_default(),
        "parentId": params.get("parentId").cloned().unwrap_or_default(),
        "description": params.get("description").cloned().unwrap_or_default(),
        "_accessLevel": 2,
    });
    state.folders.lock().unwrap().push(folder.clone());
    Json(folder).into_response()
}

async fn create_item(
    State(state): Shared,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("POST", "/item", &params);
    if state.should_fail("POST /item") {
        return failure();
    }
    state.item_creates.fetch_add(1, Ordering::SeqCst);
    let item = json!({
        "_id": state.new_id("item"),
        "_modelType": "item",
        "name": params.get("name").cloned().unwrap_or_default(),
        "folderId": params.get("folderId").cloned().unwrap_or_default(),
    });
    state.items.lock().unwrap().push(item.clone());
    Json(item).into_response()
}

async fn update_folder(
    State(state): Shared,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = format!("/folder/{id}");
    state.record("PUT", &path, &params);
    if state.should_fail(&format!("PUT {path}")) {
        return failure();
    }
    let mut folders = state.folders.lock().unwrap();
    let Some(folder) = folders.iter_mut().find(|f| f["_id"] == *id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "no such folder"})))
            .into_response();
    };
    if let Some(name) = params.get("name") {
        folder["name"] = json!(name);
    }
    if let Some(parent_id) = params.get("parentId") {
        folder["parentId"] = json!(parent_id);
    }
    if let Some(parent_type) = params.get("parentType") {
        folder["parentCollection"] = json!(parent_type);
    }
    Json(folder.clone()).into_response()
}

async fn update_item(
    State(state): Shared,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = format!("/item/{id}");
    state.record("PUT", &path, &params);
    if state.should_fail(&format!("PUT {path}")) {
        return failure();
    }
    let mut items = state.items.lock().unwrap();
    let Some(item) = items.iter_mut().find(|i| i["_id"] == *id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "no such item"}))).into_response();
    };
    if let Some(name) = params.get("name") {
        item["name"] = json!(name);
    }
    if let Some(folder_id) = params.get("folderId") {
        item["folderId"] = json!(folder_id);
    }
    Json(item.clone()).into_response()
}
