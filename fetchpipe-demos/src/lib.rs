use std::net::SocketAddr;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use fetchpipe_core::{RequestPack, ResponsePack};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Returns the server address from the PORT env var, defaulting to 3000.
pub fn server_addr() -> anyhow::Result<SocketAddr> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    Ok(format!("0.0.0.0:{port}").parse()?)
}

/// Resource carried by `/api/user` packs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserQuery {
    pub id: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// The demo envelope service.
///
/// - `GET  /api/ping` - plain JSON
/// - `POST /api/user` - takes a [`RequestPack`] with a [`UserQuery`], answers a [`ResponsePack`]
/// - `GET  /api/broken` - 500 with a JSON body
pub fn envelope_router() -> Router {
    Router::new()
        .route("/api/ping", get(|| async { Json(json!({ "pong": true })) }))
        .route("/api/user", post(lookup_user))
        .route(
            "/api/broken",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "storage offline" })),
                )
            }),
        )
}

async fn lookup_user(Json(pack): Json<RequestPack>) -> Json<ResponsePack> {
    tracing::info!(session = %pack.session, passport = ?pack.passport, "pack received");

    let reply = |code: i64, message: &str, resource: String| ResponsePack {
        code,
        message: message.to_string(),
        success: code == 0,
        session: pack.session.clone(),
        resource,
        sign: String::new(),
        other: None,
    };

    if pack.passport.is_none() {
        return Json(reply(401, "missing passport", String::new()));
    }

    let query: UserQuery = match serde_json::from_str(&pack.resource) {
        Ok(query) => query,
        Err(e) => return Json(reply(400, &format!("bad resource: {e}"), String::new())),
    };

    let user = User {
        id: query.id,
        name: format!("user-{}", query.id),
    };
    match serde_json::to_string(&user) {
        Ok(resource) => Json(reply(0, "ok", resource)),
        Err(e) => Json(reply(500, &e.to_string(), String::new())),
    }
}
