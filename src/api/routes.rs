use axum::{routing::get, Router};
use std::sync::Arc;

use crate::service::ProxyService;

use super::handlers::{
    get_country_ip_list, get_country_isp_list, get_country_total, get_ip_info,
    get_most_proxy_types, AppState,
};

pub fn create_api_router(service: ProxyService) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/ip/{address}", get(get_ip_info))
        .route("/country/{country}", get(get_country_ip_list))
        .route("/country/{country}/isp", get(get_country_isp_list))
        .route("/country/{country}/total", get(get_country_total))
        .route("/proxytypes", get(get_most_proxy_types))
        .with_state(state)
}
