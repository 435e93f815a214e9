//! End-to-end tests for the API endpoints against in-memory SQLite,
//! exercising the real router, sanitizers, transformer and storage.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use proxyscope::api::create_api_router;
use proxyscope::service::ProxyService;
use proxyscope::storage::{ProxyStorage, SqliteStorage};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A single connection so every query sees the same in-memory database.
async fn create_test_storage() -> Arc<SqliteStorage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1, 180).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

#[allow(clippy::too_many_arguments)]
async fn seed_range(
    storage: &SqliteStorage,
    ip_from: u32,
    ip_to: u32,
    country_code: &str,
    country_name: &str,
    city_name: &str,
    isp: &str,
    proxy_type: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO ip2proxy
            (ip_from, ip_to, country_code, country_name, region_name, city_name,
             isp, domain, usage_type, asn, "as", proxy_type)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(i64::from(ip_from))
    .bind(i64::from(ip_to))
    .bind(country_code)
    .bind(country_name)
    .bind("Region")
    .bind(city_name)
    .bind(isp)
    .bind("example.com")
    .bind("DCH")
    .bind("1299")
    .bind("AS1299")
    .bind(proxy_type)
    .execute(storage.pool())
    .await
    .unwrap();
}

fn build_app(storage: Arc<SqliteStorage>) -> axum::Router {
    let service = ProxyService::new(storage, 1000);
    create_api_router(service)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, content_type, body)
}

async fn get_json(app: axum::Router, uri: &str) -> Value {
    let (status, content_type, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_ip_lookup_found() {
    let storage = create_test_storage().await;
    seed_range(
        &storage, 168430080, 168430335, "PL", "Poland", "Warsaw", "Opera Software ASA", "PUB",
    )
    .await;

    let json = get_json(build_app(storage), "/ip/10.10.10.1").await;
    assert_eq!(json["proxy_type"], "PUB");
    assert_eq!(json["country_code"], "PL");
    assert_eq!(json["country_name"], "Poland");
    assert_eq!(json["city_name"], "Warsaw");
    assert_eq!(json["isp"], "Opera Software ASA");
    assert_eq!(json["as"], "AS1299");
}

#[tokio::test]
async fn test_ip_lookup_range_boundaries_inclusive() {
    let storage = create_test_storage().await;
    seed_range(
        &storage, 168430080, 168430335, "PL", "Poland", "Warsaw", "ISP1", "PUB",
    )
    .await;

    // 10.10.10.0 and 10.10.10.255 are the range ends.
    for addr in ["/ip/10.10.10.0", "/ip/10.10.10.255"] {
        let json = get_json(build_app(Arc::clone(&storage)), addr).await;
        assert_eq!(json["country_code"], "PL");
    }

    let (status, _, body) = get(build_app(storage), "/ip/10.10.11.0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"No results for query");
}

#[tokio::test]
async fn test_ip_lookup_bad_address() {
    let storage = create_test_storage().await;

    let (status, _, body) = get(build_app(storage), "/ip/not-an-ip").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Bad IP address");
}

#[tokio::test]
async fn test_country_ip_list_expansion_caps_at_limit() {
    let storage = create_test_storage().await;
    seed_range(&storage, 16778241, 16778241, "AU", "Australia", "Melbourne", "ISP1", "PUB").await;
    seed_range(&storage, 16778242, 16778249, "AU", "Australia", "Melbourne", "ISP1", "PUB").await;
    seed_range(&storage, 16778252, 16778259, "AU", "Australia", "Melbourne", "ISP1", "PUB").await;

    let json = get_json(build_app(storage), "/country/AU?limit=10").await;
    assert_eq!(json["total"], 10);
    let list = json["IPList"].as_array().unwrap();
    assert_eq!(list.len(), 10);
    assert_eq!(list[0]["ip_address"], "1.0.4.1");
    assert_eq!(list[9]["ip_address"], "1.0.4.12");
    assert_eq!(list[9]["country_name"], "Australia");
    assert_eq!(list[9]["city_name"], "Melbourne");
}

#[tokio::test]
async fn test_country_ip_list_defaults_limit_to_fifty() {
    let storage = create_test_storage().await;
    seed_range(&storage, 1000, 1999, "AU", "Australia", "Melbourne", "ISP1", "PUB").await;

    // Unusable limits all fall back to 50.
    for uri in [
        "/country/AU",
        "/country/AU?limit=abc",
        "/country/AU?limit=0",
        "/country/AU?limit=5000",
    ] {
        let json = get_json(build_app(Arc::clone(&storage)), uri).await;
        assert_eq!(json["total"], 50, "uri {uri}");
    }

    let json = get_json(build_app(storage), "/country/AU?limit=3").await;
    assert_eq!(json["total"], 3);
}

#[tokio::test]
async fn test_country_ip_list_empty_country_is_empty_list() {
    let storage = create_test_storage().await;

    let json = get_json(build_app(storage), "/country/ZZ").await;
    assert_eq!(json["total"], 0);
    assert_eq!(json["IPList"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_country_code_is_sanitized_before_query() {
    let storage = create_test_storage().await;
    seed_range(&storage, 100, 101, "AR", "Argentina", "Buenos Aires", "ISP1", "PUB").await;

    // Injection-looking input collapses to "AR".
    let json = get_json(
        build_app(storage),
        "/country/ARSAR'%3Cscript%3Ealert(1)%3C%2Fscript%3E",
    )
    .await;
    assert_eq!(json["total"], 2);
}

#[tokio::test]
async fn test_country_code_too_short_is_rejected() {
    let storage = create_test_storage().await;

    for uri in ["/country/a1", "/country/X", "/country/X/isp", "/country/X/total"] {
        let (status, _, body) = get(build_app(Arc::clone(&storage)), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body, b"Bad country code");
    }
}

#[tokio::test]
async fn test_country_isp_list_dedups() {
    let storage = create_test_storage().await;
    seed_range(&storage, 100, 110, "AR", "Argentina", "Buenos Aires", "ISP1", "PUB").await;
    seed_range(&storage, 200, 210, "AR", "Argentina", "Cordoba", "ISP1", "PUB").await;
    seed_range(&storage, 300, 310, "AR", "Argentina", "Rosario", "ISP2", "PUB").await;

    let json = get_json(build_app(storage), "/country/AR/isp").await;
    assert_eq!(json["total"], 2);
    let mut names: Vec<&str> = json["ISPList"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["isp"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["ISP1", "ISP2"]);
}

#[tokio::test]
async fn test_country_total_sums_range_sizes() {
    let storage = create_test_storage().await;
    seed_range(&storage, 100, 199, "AR", "Argentina", "Buenos Aires", "ISP1", "PUB").await;
    seed_range(&storage, 300, 309, "AR", "Argentina", "Cordoba", "ISP2", "PUB").await;

    let json = get_json(build_app(storage), "/country/AR/total").await;
    assert_eq!(json["total_ip"], 110);
}

#[tokio::test]
async fn test_country_total_empty_is_zero_not_error() {
    let storage = create_test_storage().await;

    let json = get_json(build_app(storage), "/country/ZZ/total").await;
    assert_eq!(json["total_ip"], 0);
}

#[tokio::test]
async fn test_proxy_types_ranked_descending() {
    let storage = create_test_storage().await;
    for i in 0..3 {
        seed_range(&storage, 100 + i, 100 + i, "AR", "Argentina", "BA", "ISP1", "PUB").await;
    }
    for i in 0..2 {
        seed_range(&storage, 200 + i, 200 + i, "AR", "Argentina", "BA", "ISP1", "VPN").await;
    }
    seed_range(&storage, 300, 300, "AR", "Argentina", "BA", "ISP1", "TOR").await;
    seed_range(&storage, 400, 400, "AR", "Argentina", "BA", "ISP1", "WEB").await;

    let json = get_json(build_app(storage), "/proxytypes").await;
    let list = json["ProxyTypeList"].as_array().unwrap();
    // Top 3 only, ordered by count descending.
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["proxy_type"], "PUB");
    assert_eq!(list[0]["total"], 3);
    assert_eq!(list[1]["proxy_type"], "VPN");
    assert_eq!(list[1]["total"], 2);
    assert_eq!(list[2]["total"], 1);
}
