//! HTTP surface. Handlers receive their stores through axum `Extension`s and
//! report failures as [`crate::error::AppError`].

pub mod admin_units;
pub mod alerts;
pub mod auth;
pub mod extract;
pub mod middleware;
pub mod users;
pub mod verification;

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower_cookies::CookieManagerLayer;

use crate::auth::{CredentialService, JwtManager};
use crate::store::{AdminUnitStore, AlertStore, TokenStore};
use crate::verification::VerificationWorkflow;

/// Everything the handlers need, built once from a shared connection pool.
#[derive(Clone)]
pub struct Services {
    pub alerts: AlertStore,
    pub workflow: VerificationWorkflow,
    pub credentials: CredentialService,
    pub admin_units: AdminUnitStore,
}

impl Services {
    pub fn new(
        db: DatabaseConnection,
        jwt: JwtManager,
        verification_base_url: Option<String>,
    ) -> Self {
        let alerts = AlertStore::new(db.clone());
        let workflow = VerificationWorkflow::new(alerts.clone(), TokenStore::new(db.clone()))
            .with_verification_base_url(verification_base_url);

        Self {
            alerts,
            workflow,
            credentials: CredentialService::new(db.clone(), jwt),
            admin_units: AdminUnitStore::new(db),
        }
    }
}

pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok", "message": "Alerts MIS API is running"}))
}

/// `/api/v1` routes plus `/health`. Tracing, CORS and metrics layers are
/// added by the binary.
pub fn router(services: Services) -> Router {
    let public_routes = Router::new()
        .route("/users/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/alerts/:id/verify", post(verification::verify_alert))
        .route("/admin-units/regions", get(admin_units::list_regions))
        .route("/admin-units/districts", get(admin_units::list_all_districts))
        .route(
            "/admin-units/subcounties",
            get(admin_units::list_all_subcounties),
        )
        .route(
            "/admin-units/regions/:region_id/districts",
            get(admin_units::list_districts),
        )
        .route(
            "/admin-units/districts/:district_id/subcounties",
            get(admin_units::list_subcounties),
        );

    let protected_routes = Router::new()
        .route("/users/logout", post(auth::logout))
        .route("/users/profile", get(users::profile))
        .route("/users/all", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/create", post(alerts::create_alert))
        .route("/alerts/query", post(alerts::query_alerts))
        .route("/alerts/verified/count", get(alerts::verified_count))
        .route("/alerts/not-verified/count", get(alerts::not_verified_count))
        .route(
            "/alerts/:id",
            get(alerts::get_alert)
                .put(alerts::update_alert)
                .delete(alerts::delete_alert),
        )
        .route(
            "/alerts/:id/generate-token",
            post(verification::generate_token),
        )
        .route_layer(axum::middleware::from_fn(middleware::auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", public_routes.merge(protected_routes))
        .layer(Extension(services.alerts))
        .layer(Extension(services.workflow))
        .layer(Extension(services.credentials))
        .layer(Extension(services.admin_units))
        .layer(CookieManagerLayer::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{memory_db, seed_admin_units};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn test_app() -> (Router, DatabaseConnection) {
        let db = memory_db().await;
        let services = Services::new(
            db.clone(),
            JwtManager::new(b"router-test-secret", 3600),
            Some("https://alerts.example/verify/".into()),
        );
        (router(services), db)
    }

    fn json_request(method: Method, uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn login_token(app: &Router) -> String {
        let (status, _) = send(
            app,
            json_request(
                Method::POST,
                "/api/v1/users/register",
                None,
                json!({
                    "username": "desk1",
                    "password": "s3cret-pass",
                    "firstName": "Desk",
                    "lastName": "Officer",
                    "email": "desk1@moh.go",
                    "affiliation": "MoH"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            json_request(
                Method::POST,
                "/api/v1/login",
                None,
                json!({"username": "desk1", "password": "s3cret-pass"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["user"].get("passwordHash").is_none());
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _db) = test_app().await;
        let (status, body) = send(&app, get_request("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_session() {
        let (app, _db) = test_app().await;

        let (status, _) = send(&app, get_request("/api/v1/alerts", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get_request("/api/v1/alerts", Some("garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (app, _db) = test_app().await;
        login_token(&app).await;

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/login",
                None,
                json!({"username": "desk1", "password": "wrong"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn session_cookie_authenticates() {
        let (app, _db) = test_app().await;
        login_token(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/login",
                None,
                json!({"username": "desk1", "password": "s3cret-pass"}),
            ))
            .await
            .unwrap();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));
        let pair = set_cookie.split(';').next().unwrap().to_string();

        let request = Request::builder()
            .uri("/api/v1/users/profile")
            .header(header::COOKIE, pair)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "desk1");
    }

    #[tokio::test]
    async fn token_verification_round_trip() {
        let (app, _db) = test_app().await;
        let token = login_token(&app).await;

        let (status, alert) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/alerts/create",
                Some(&token),
                json!({"personReporting": "Okello", "alertCaseName": "Suspected cholera"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(alert["status"], "Pending");
        assert_eq!(alert["isVerified"], false);
        let id = alert["id"].as_i64().unwrap();

        // Minting a token needs a session; redeeming it does not.
        let (status, _) = send(
            &app,
            json_request(Method::POST, &format!("/api/v1/alerts/{id}/generate-token"), None, json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, issued) = send(
            &app,
            json_request(
                Method::POST,
                &format!("/api/v1/alerts/{id}/generate-token"),
                Some(&token),
                json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let verification_token = issued["token"].as_str().unwrap().to_string();
        assert_eq!(
            issued["verificationUrl"],
            format!("https://alerts.example/verify?id={id}&token={verification_token}")
        );

        let payload = json!({
            "token": verification_token,
            "verifiedBy": "Field Team 3",
            "verificationDate": "2026-03-10",
            "verificationTime": "09:30:00",
            "status": "Verified",
            "cifNo": "ab12"
        });
        let verify_uri = format!("/api/v1/alerts/{id}/verify");

        let (status, verified) = send(
            &app,
            json_request(Method::POST, &verify_uri, None, payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verified["isVerified"], true);
        assert_eq!(verified["verifiedBy"], "Field Team 3");
        assert_eq!(verified["cifNo"], "AB12");

        let (status, body) = send(&app, json_request(Method::POST, &verify_uri, None, payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid or already used token");
    }

    #[tokio::test]
    async fn malformed_bodies_get_structured_errors() {
        let (app, _db) = test_app().await;
        let token = login_token(&app).await;

        let (_, alert) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/alerts/create",
                Some(&token),
                json!({"personReporting": "Okello", "alertCaseName": "Mpox"}),
            ),
        )
        .await;
        let id = alert["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                &format!("/api/v1/alerts/{id}/verify"),
                None,
                json!({"token": "abc", "verificationDate": "09/03/2026"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("verificationDate"));

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/alerts/create",
                Some(&token),
                json!({"personReporting": "Okello", "alertCaseAge": "seven"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_named_query_lists_valid_names() {
        let (app, _db) = test_app().await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/alerts/query",
                Some(&token),
                json!({"query": "everything"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["validQueries"].as_array().unwrap().len(), 4);

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/alerts/query?limit=10",
                Some(&token),
                json!({"query": "verified"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn listing_rejects_malformed_filters() {
        let (app, _db) = test_app().await;
        let token = login_token(&app).await;

        let (status, _) = send(&app, get_request("/api/v1/alerts?alert_id=abc", Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, get_request("/api/v1/alerts?page=zero", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 50);
    }

    #[tokio::test]
    async fn deleted_alert_is_not_found() {
        let (app, _db) = test_app().await;
        let token = login_token(&app).await;

        let (_, alert) = send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/alerts/create",
                Some(&token),
                json!({"personReporting": "Okello", "alertCaseName": "Measles"}),
            ),
        )
        .await;
        let uri = format!("/api/v1/alerts/{}", alert["id"]);

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(&uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, get_request(&uri, Some(&token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Alert not found");
    }

    #[tokio::test]
    async fn admin_units_are_public() {
        let (app, db) = test_app().await;
        let (region_id, _) = seed_admin_units(&db).await;

        let (status, body) = send(
            &app,
            get_request(&format!("/api/v1/admin-units/regions/{region_id}/districts"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["district"], "Kampala");

        let (status, body) = send(&app, get_request("/api/v1/admin-units/districts", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = send(&app, get_request("/api/v1/admin-units/subcounties", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["subcounty"], "Nakawa");

        let (status, _) = send(&app, get_request("/api/v1/admin-units/regions/abc/districts", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
