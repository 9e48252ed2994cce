//! In-process HTTP service with the fixtures the contract tests run against.
//!
//! # Routes
//! - `GET /ola` plain-text greeting
//! - `GET /users` all users
//! - `GET /users/{id}` one user, or 404 with an `error` message
//! - `POST /users` create a user; `name` is required (400 otherwise)

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub const GREETING: &str = "Ola Mundo!";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub rua: String,
    pub numero: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filhos: Option<Vec<Child>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub salary: Option<f64>,
}

pub type Db = Arc<RwLock<BTreeMap<u64, User>>>;

/// The three users every fresh server starts with.
pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "João da Silva".to_string(),
            endereco: None,
            age: Some(30),
            salary: Some(1234.5678),
            filhos: None,
        },
        User {
            id: 2,
            name: "Maria Joaquina".to_string(),
            endereco: Some(Address {
                rua: "Rua dos bobos".to_string(),
                numero: 0,
            }),
            age: Some(25),
            salary: Some(2500.0),
            filhos: None,
        },
        User {
            id: 3,
            name: "Ana Júlia".to_string(),
            endereco: None,
            age: Some(20),
            salary: None,
            filhos: Some(vec![
                Child {
                    name: "Zezinho".to_string(),
                },
                Child {
                    name: "Luizinho".to_string(),
                },
            ]),
        },
    ]
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(
        seed_users().into_iter().map(|user| (user.id, user)).collect(),
    ));
    Router::new()
        .route("/ola", get(ola))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ola() -> &'static str {
    GREETING
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let users = db.read().await;
    Json(users.values().cloned().collect())
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let users = db.read().await;
    match users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Usuário inexistente" })),
        )
            .into_response(),
    }
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> Response {
    let Some(name) = input.name.filter(|name| !name.trim().is_empty()) else {
        tracing::debug!("rejecting user without a name");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "id": null, "error": "Name é um atributo obrigatório" })),
        )
            .into_response();
    };

    let mut users = db.write().await;
    let id = users.keys().next_back().map_or(1, |last| last + 1);
    let user = User {
        id,
        name,
        endereco: None,
        age: input.age,
        salary: input.salary,
        filhos: None,
    };
    users.insert(id, user.clone());
    tracing::info!(id, name = %user.name, "created user");
    (StatusCode::CREATED, Json(user)).into_response()
}
