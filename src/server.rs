use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::header::{self, HeaderValue};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{error, info, warn};
use serde::Serialize;
use tokio::net::TcpListener;
use top_contributors::api::{Client, Contributor, CountTier, Error, Result};
use top_contributors::TopContributors;
use tower_http::set_header::SetResponseHeaderLayer;

pub const DEFAULT_PATH: &str = "/api/top-contributors";
const SERVER_NAME: &str = "top-contributors";

#[derive(Serialize)]
struct ContributorBody {
    id: i64,
    name: String,
}

impl From<Contributor> for ContributorBody {
    fn from(contributor: Contributor) -> Self {
        ContributorBody {
            id: contributor.id,
            name: contributor.username,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// HTTP server owning its own listener and routes.
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Binds `listen` and serves the contributors endpoint under `path`.
    pub async fn bind<CLIENT>(listen: &str, path: &str, contributors: TopContributors<CLIENT>) -> Result<Server>
    where
        CLIENT: 'static + Client,
    {
        validate_route_path(path)?;
        let listener = TcpListener::bind(listen)
            .await
            .with_context(|| format!("failed listening on {}", listen))?;
        let router = Router::new()
            .route(path, get(top_contributors_handler::<CLIENT>).fallback(method_not_allowed))
            .fallback(not_found)
            .layer(SetResponseHeaderLayer::overriding(
                header::SERVER,
                HeaderValue::from_static(SERVER_NAME),
            ))
            .with_state(contributors);
        info!("Registered API endpoint '{}'", path);
        Ok(Server { listener, router })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr().context("failed reading local address")?)
    }

    /// Serves requests until `shutdown` completes, then drains open connections.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Accepting requests at {}", self.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("server failed")?;
        Ok(())
    }
}

async fn top_contributors_handler<CLIENT>(
    State(contributors): State<TopContributors<CLIENT>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response
where
    CLIENT: 'static + Client,
{
    let (location, tier) = match parse_query(&params) {
        Ok(query) => query,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match contributors.fetch(&location, tier).await {
        Ok(result) => {
            info!("Processed request ({} results)", result.len());
            let body: Vec<ContributorBody> = result.into_iter().map(ContributorBody::from).collect();
            json_response(StatusCode::OK, &body)
        }
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("query failed: {:#}", err)),
    }
}

/// Only static paths are served; captures and wildcards would make the router panic.
fn validate_route_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(Error::InvalidParameter(format!("route path `{}` must start with '/'", path)));
    }
    let dynamic = path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*') || segment.contains(|c: char| c == '{' || c == '}'));
    if dynamic {
        return Err(Error::InvalidParameter(format!("route path `{}` must be a static path", path)));
    }
    Ok(())
}

/// `count` defaults to the smallest tier; `city` is accepted as an alias of `location`.
fn parse_query(params: &HashMap<String, String>) -> Result<(String, CountTier)> {
    let tier = match params.get("count") {
        Some(count) => count.parse::<CountTier>()?,
        None => CountTier::default(),
    };
    let location = params
        .get("location")
        .or_else(|| params.get("city"))
        .filter(|location| !location.trim().is_empty())
        .ok_or(Error::MissingParameter("location"))?;
    Ok((location.to_string(), tier))
}

async fn method_not_allowed() -> Response {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "only GET requests allowed".to_string());
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET"));
    response
}

async fn not_found(uri: Uri) -> Response {
    info!("Request for unknown path: {}", uri);
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorBody {
            error: format!("unknown path: {}", uri.path()),
        },
    )
}

fn error_response(status: StatusCode, message: String) -> Response {
    warn!("Error response {} '{}'", status.as_u16(), message);
    json_response(status, &ErrorBody { error: message })
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            error!("Output representation failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"error":"internal error"}"#,
            )
                .into_response()
        }
    }
}
