//! In-process fake of the legalist backend, just enough of the REST surface
//! for end-to-end client flows.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Account {
    first_name: String,
    last_name: String,
    password: String,
}

#[derive(Debug, Default)]
struct Backend {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    posts: Vec<Value>,
    next_id: u64,
}

type Shared = Arc<Mutex<Backend>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupBody {
    first_name: String,
    last_name: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct NewPostBody {
    username: String,
    city: String,
    state: String,
    description: String,
}

pub struct FakeBackend {
    base_url: String,
    state: Shared,
}

impl FakeBackend {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn seed_user(&self, first_name: &str, last_name: &str, username: &str, password: &str) {
        let mut backend = self.state.lock().expect("backend lock");
        backend.accounts.insert(
            username.to_string(),
            Account {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                password: password.to_string(),
            },
        );
    }

    pub fn seed_post(&self, username: &str, city: &str, state: &str, description: &str) {
        let mut backend = self.state.lock().expect("backend lock");
        let post = new_post(&mut backend, username, city, state, description);
        backend.posts.push(post);
    }

    /// Every issued token stops being accepted, as after a server-side expiry.
    pub fn expire_tokens(&self) {
        self.state.lock().expect("backend lock").tokens.clear();
    }

    pub fn has_account(&self, username: &str) -> bool {
        self.state
            .lock()
            .expect("backend lock")
            .accounts
            .contains_key(username)
    }
}

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

pub async fn spawn_backend() -> FakeBackend {
    let state: Shared = Arc::new(Mutex::new(Backend::default()));

    let app = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/dashboard", get(dashboard))
        .route("/api/auth/delete-account", delete(delete_account))
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/user/{username}", get(user_posts))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });

    FakeBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn user_json(username: &str, account: &Account) -> Value {
    json!({
        "_id": format!("u-{username}"),
        "firstName": account.first_name,
        "lastName": account.last_name,
        "username": username,
    })
}

fn new_post(
    backend: &mut Backend,
    username: &str,
    city: &str,
    state: &str,
    description: &str,
) -> Value {
    backend.next_id += 1;
    json!({
        "_id": format!("p{}", backend.next_id),
        "username": username,
        "city": city,
        "state": state,
        "description": description,
        "createdAt": Utc::now().to_rfc3339(),
    })
}

fn issue_token(backend: &mut Backend, username: &str) -> String {
    let token = format!("token-{username}-{}", backend.tokens.len() + 1);
    backend.tokens.insert(token.clone(), username.to_string());
    token
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// Resolves the bearer token to a username or answers 401.
fn authorize(backend: &Backend, headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| backend.tokens.get(token))
        .cloned()
        .ok_or_else(|| message(StatusCode::UNAUTHORIZED, "Token is not valid"))
}

async fn signup(State(state): State<Shared>, Json(body): Json<SignupBody>) -> Response {
    let mut backend = state.lock().expect("backend lock");
    if backend.accounts.contains_key(&body.username) {
        return message(StatusCode::BAD_REQUEST, "Username already exists");
    }

    let account = Account {
        first_name: body.first_name,
        last_name: body.last_name,
        password: body.password,
    };
    let user = user_json(&body.username, &account);
    backend.accounts.insert(body.username.clone(), account);
    let token = issue_token(&mut backend, &body.username);

    (StatusCode::CREATED, Json(json!({ "token": token, "user": user }))).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    let mut backend = state.lock().expect("backend lock");
    let user = match backend.accounts.get(&body.username) {
        Some(account) if account.password == body.password => user_json(&body.username, account),
        _ => return message(StatusCode::BAD_REQUEST, "Invalid credentials"),
    };
    let token = issue_token(&mut backend, &body.username);

    Json(json!({ "token": token, "user": user })).into_response()
}

async fn dashboard(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let backend = state.lock().expect("backend lock");
    let username = match authorize(&backend, &headers) {
        Ok(username) => username,
        Err(response) => return response,
    };
    match backend.accounts.get(&username) {
        Some(account) => Json(json!({ "user": user_json(&username, account) })).into_response(),
        None => message(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn delete_account(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut backend = state.lock().expect("backend lock");
    let username = match authorize(&backend, &headers) {
        Ok(username) => username,
        Err(response) => return response,
    };
    backend.accounts.remove(&username);
    backend.tokens.retain(|_, owner| *owner != username);

    message(StatusCode::OK, "Account deleted successfully")
}

async fn list_posts(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let backend = state.lock().expect("backend lock");
    if let Err(response) = authorize(&backend, &headers) {
        return response;
    }
    Json(Value::Array(backend.posts.clone())).into_response()
}

async fn user_posts(
    State(state): State<Shared>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Response {
    let backend = state.lock().expect("backend lock");
    if let Err(response) = authorize(&backend, &headers) {
        return response;
    }
    let posts: Vec<Value> = backend
        .posts
        .iter()
        .filter(|post| post["username"] == username.as_str())
        .cloned()
        .collect();
    Json(json!({ "posts": posts })).into_response()
}

async fn create_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<NewPostBody>,
) -> Response {
    let mut backend = state.lock().expect("backend lock");
    if let Err(response) = authorize(&backend, &headers) {
        return response;
    }
    let post = new_post(
        &mut backend,
        &body.username,
        &body.city,
        &body.state,
        &body.description,
    );
    backend.posts.push(post.clone());

    (StatusCode::CREATED, Json(post)).into_response()
}
