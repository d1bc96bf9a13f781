use axum::{
    extract::Path,
    http::{Method, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const DEFAULT_PORT: u16 = 4000;

/// What the server saw: returned as the body of every echo response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads `PORT`; defaults to `DEFAULT_PORT` on loopback.
    pub fn from_env() -> Result<Self, std::io::Error> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("PORT={raw}: {e}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            host: "127.0.0.1".to_string(),
            port,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/status/{code}", any(status))
        .fallback(echo)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, status.canonical_reason().unwrap_or_default().to_string()))
}
