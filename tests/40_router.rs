use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use landlord_api::auth::{generate_jwt, Claims};
use landlord_api::config::AppConfig;
use landlord_api::repository::Repository;
use landlord_api::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

fn router() -> Router {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    app(AppState::new(Repository::in_memory(), SECRET), &config)
}

fn token(user: &str) -> String {
    let mut claims = Claims::new(user, 1);
    claims.email = Some(format!("{}@example.com", user));
    claims.first_name = Some("Pat".into());
    generate_jwt(&claims, SECRET).unwrap()
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user)));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

fn maple() -> Value {
    json!({
        "name": "Maple House",
        "address": "12 Maple St",
        "city": "Victoria",
        "postalCode": "V8V 1A1",
        "propertyType": "house",
        "rentAmount": "2500.50",
        "status": "occupied"
    })
}

#[tokio::test]
async fn api_requires_bearer_token() -> Result<()> {
    let app = router();

    let (status, body) = call(&app, Method::GET, "/api/properties", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let request = Request::builder()
        .uri("/api/properties")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn property_crud_is_owner_scoped() -> Result<()> {
    let app = router();

    let (status, body) = call(&app, Method::POST, "/api/properties", Some("alice"), Some(maple())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["userId"], "alice");
    assert_eq!(body["data"]["rentAmount"], "2500.50");
    assert_eq!(body["data"]["province"], "BC");

    let uri = format!("/api/properties/{}", id);
    let (status, _) = call(&app, Method::GET, &uri, Some("alice"), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, &uri, Some("mallory"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = call(&app, Method::PUT, &uri, Some("mallory"), Some(json!({ "name": "Mine" }))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::PUT, &uri, Some("alice"), Some(json!({ "bedrooms": 3 }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bedrooms"], 3);
    assert_eq!(body["data"]["name"], "Maple House");

    let (status, _) = call(&app, Method::DELETE, &uri, Some("mallory"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = call(&app, Method::DELETE, &uri, Some("alice"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    let (status, _) = call(&app, Method::GET, &uri, Some("alice"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn bad_payloads_map_to_400() -> Result<()> {
    let app = router();

    let mut negative = maple();
    negative["rentAmount"] = json!("-5");
    let (status, body) = call(&app, Method::POST, "/api/properties", Some("alice"), Some(negative)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["rentAmount"], "Must not be negative");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/properties")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("alice")))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::GET, "/api/properties/abc", Some("alice"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/tenants",
        Some("alice"),
        Some(json!({ "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["propertyId"], "This field is required");
    Ok(())
}

#[tokio::test]
async fn tenants_carry_lease_status_and_alerts_route_resolves() -> Result<()> {
    let app = router();
    let (_, body) = call(&app, Method::POST, "/api/properties", Some("alice"), Some(maple())).await?;
    let property_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/tenants",
        Some("alice"),
        Some(json!({
            "propertyId": property_id,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "leaseStart": "2020-01-01",
            "leaseEnd": "2021-01-01"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["leaseStatus"], "expired");

    let (status, body) = call(&app, Method::GET, "/api/tenants/lease-alerts", Some("alice"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["expired"].as_array().unwrap().len(), 1);
    assert!(body["data"]["expiringSoon"].as_array().unwrap().is_empty());

    let uri = format!("/api/tenants?propertyId={}", property_id);
    let (_, body) = call(&app, Method::GET, &uri, Some("alice"), None).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = call(&app, Method::GET, &uri, Some("mallory"), None).await?;
    assert!(body["data"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn dashboard_and_profile() -> Result<()> {
    let app = router();
    call(&app, Method::POST, "/api/properties", Some("alice"), Some(maple())).await?;

    let (status, body) = call(&app, Method::GET, "/api/dashboard/stats", Some("alice"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalProperties"], 1);
    assert_eq!(body["data"]["occupiedProperties"], 1);
    assert_eq!(body["data"]["totalMonthlyRent"], "2500.50");
    assert_eq!(body["data"]["pendingMaintenance"], 0);

    let (status, body) = call(&app, Method::GET, "/api/auth/user", Some("alice"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["firstName"], "Pat");
    Ok(())
}

#[tokio::test]
async fn transaction_routes_are_owner_scoped() -> Result<()> {
    let app = router();
    let (_, body) = call(&app, Method::POST, "/api/properties", Some("alice"), Some(maple())).await?;
    let property_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/transactions",
        Some("alice"),
        Some(json!({
            "propertyId": property_id,
            "type": "expense",
            "category": "repairs",
            "amount": "180.00",
            "description": "Heater part"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/transactions/{}", body["data"]["id"]);

    let (status, _) = call(&app, Method::GET, &uri, Some("mallory"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::PUT, &uri, Some("mallory"), Some(json!({ "isPaid": true }))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::DELETE, &uri, Some("mallory"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::GET, &uri, Some("alice"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isPaid"], false);

    let (status, body) = call(&app, Method::PUT, &uri, Some("alice"), Some(json!({ "isPaid": true }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isPaid"], true);
    assert_eq!(body["data"]["amount"], "180.00");

    let (status, _) = call(&app, Method::DELETE, &uri, Some("alice"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::DELETE, &uri, Some("alice"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
