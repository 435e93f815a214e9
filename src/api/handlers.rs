use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::service::sanitize::{sanitize_country_code, sanitize_limit};
use crate::service::{ProxyService, ServiceError};

const BAD_IP_ADDRESS: &str = "Bad IP address";
const BAD_COUNTRY: &str = "Bad country code";
const NO_RESULTS: &str = "No results for query";
const SERVICE_ERROR: &str = "Service error";

pub struct AppState {
    pub service: ProxyService,
}

/// Service failures collapse onto the fixed plain-text bodies; internal
/// detail is logged here and never reaches the caller.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            ServiceError::InvalidAddress => (StatusCode::BAD_REQUEST, BAD_IP_ADDRESS),
            ServiceError::InvalidCountryCode => (StatusCode::BAD_REQUEST, BAD_COUNTRY),
            ServiceError::NoResultFound => (StatusCode::NOT_FOUND, NO_RESULTS),
            ServiceError::Repository(e) => {
                error!(error = %e, "repository failure");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVICE_ERROR)
            }
            ServiceError::Serialization(e) => {
                error!(error = %e, "response encoding failure");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVICE_ERROR)
            }
        };
        (status, body).into_response()
    }
}

fn json_response<T: serde::Serialize>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value).map_err(ServiceError::from)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[derive(Deserialize)]
pub struct ListQuery {
    /// Raw limit text; sanitization strips non-digits and applies the
    /// default, so extraction itself never rejects.
    pub limit: Option<String>,
}

/// GET /ip/{address}
pub async fn get_ip_info(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Response, ApiError> {
    info!(%address, "received request for ip info");

    let addr: IpAddr = address
        .parse()
        .map_err(|_| ServiceError::InvalidAddress)?;

    let result = state.service.ip_info(addr).await?;
    json_response(&result)
}

/// GET /country/{CODE}?limit=N
pub async fn get_country_ip_list(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let code = sanitize_country_code(&country)?;
    let limit = sanitize_limit(query.limit.as_deref());
    info!(country = %code, limit, "received request for ip list by country");

    let result = state.service.country_addresses(&code, limit).await?;
    json_response(&result)
}

/// GET /country/{CODE}/isp
pub async fn get_country_isp_list(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
) -> Result<Response, ApiError> {
    let code = sanitize_country_code(&country)?;
    info!(country = %code, "received request for isp list by country");

    let result = state.service.country_isps(&code).await?;
    json_response(&result)
}

/// GET /country/{CODE}/total
pub async fn get_country_total(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
) -> Result<Response, ApiError> {
    let code = sanitize_country_code(&country)?;
    info!(country = %code, "received request for ip count by country");

    let result = state.service.country_total(&code).await?;
    json_response(&result)
}

/// GET /proxytypes
pub async fn get_most_proxy_types(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    info!("received request for most proxy types");

    let result = state.service.most_proxy_types().await?;
    json_response(&result)
}
