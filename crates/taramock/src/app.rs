use std::{path::Path, time::Duration};

use axum::{http::StatusCode, routing::get, Router};
use taramock_oidc::{oidc_routes, OidcState};
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{health::health, pages::index};

/// Create the application router with all routes and middleware.
pub fn create_app(state: OidcState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(oidc_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use http_body_util::BodyExt;
    use taramock_core::identity::{Identity, IdentityCatalog};
    use taramock_oidc::{OidcConfig, SigningKeys};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let keys = SigningKeys::from_pem(
            "test-key",
            include_str!("../../oidc/testdata/signing.key"),
            include_str!("../../oidc/testdata/signing.pub"),
        )
        .unwrap();
        let identities = IdentityCatalog::new(vec![Identity {
            sub: "EE60001019906".to_string(),
            given_name: "MARY ÄNN".to_string(),
            family_name: "O'CONNEŽ-ŠUSLIK TESTNUMBER".to_string(),
        }])
        .unwrap();
        let state = OidcState::new(OidcConfig::new("http://localhost:8080"), keys, identities);

        let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../static");
        create_app(state, &static_dir)
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_page() {
        let (status, html) = get_body(test_app(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("http://localhost:8080/oidc/authorize"));
        assert!(html.contains("EE60001019906"));
        assert!(html.contains("O&#39;CONNEŽ-ŠUSLIK TESTNUMBER"));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_body(test_app(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "taramock");
        assert_eq!(json["status"], "UP");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_static_stylesheet() {
        let (status, css) = get_body(test_app(), "/static/style.css").await;

        assert_eq!(status, StatusCode::OK);
        assert!(css.contains("body"));
    }

    #[tokio::test]
    async fn test_oidc_routes_are_mounted() {
        let (status, body) = get_body(test_app(), "/.well-known/openid-configuration").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["jwks_uri"], "http://localhost:8080/oidc/jwks");

        let (status, _) = get_body(test_app(), "/oidc/jwks").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authorize_redirects_through_full_router() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/oidc/authorize?client_id=foo&redirect_uri=http://localhost:8081/cb&state=s1&response_type=code")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("http://localhost:8081/cb?code="));
        assert!(location.ends_with("&state=s1"));
    }
}
