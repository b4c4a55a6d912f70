mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(common::data(&body)["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn api_rejects_anonymous_requests() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/dashboard/stats")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn landlord_workflow() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();
    let owner = common::new_user();
    let token = common::token_for(&owner);
    let stranger = common::token_for(&common::new_user());

    // Property
    let res = client
        .post(server.url("/api/properties"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Harbour View",
            "address": "8 Wharf St",
            "city": "Victoria",
            "postalCode": "V8W 1T3",
            "propertyType": "apartment",
            "rentAmount": "1000.00",
            "status": "occupied"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let property_id = common::data(&body)["id"].as_i64().unwrap();

    // Tenant
    let res = client
        .post(server.url("/api/tenants"))
        .bearer_auth(&token)
        .json(&json!({
            "propertyId": property_id,
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "rentAmount": "1000.00"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let tenant_id = common::data(&body)["id"].as_i64().unwrap();
    assert_eq!(common::data(&body)["leaseStatus"], "no-lease");

    // Maintenance request tied to the tenant
    let res = client
        .post(server.url("/api/maintenance"))
        .bearer_auth(&token)
        .json(&json!({
            "propertyId": property_id,
            "tenantId": tenant_id,
            "title": "Heater",
            "description": "No heat in bedroom",
            "category": "hvac",
            "priority": "high"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let request_id = common::data(&body)["id"].as_i64().unwrap();
    assert_eq!(common::data(&body)["status"], "pending");

    // Transaction
    let res = client
        .post(server.url("/api/transactions"))
        .bearer_auth(&token)
        .json(&json!({
            "propertyId": property_id,
            "type": "income",
            "category": "rent",
            "amount": "1000.00",
            "description": "March rent",
            "transactionDate": "2024-03-01"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(common::data(&body)["type"], "income");

    // Another user cannot see or touch any of it
    let res = client
        .put(server.url(&format!("/api/maintenance/{}", request_id)))
        .bearer_auth(&stranger)
        .json(&json!({ "status": "completed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(server.url(&format!("/api/properties/{}/transactions", property_id)))
        .bearer_auth(&stranger)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert!(common::data(&body).as_array().unwrap().is_empty());

    // Dashboard reflects the pending request
    let res = client
        .get(server.url("/api/dashboard/stats"))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    let stats = common::data(&body);
    assert_eq!(stats["totalProperties"], 1);
    assert_eq!(stats["occupiedProperties"], 1);
    assert_eq!(stats["totalMonthlyRent"], "1000.00");
    assert_eq!(stats["pendingMaintenance"], 1);

    // Completing it clears the pending count
    let res = client
        .put(server.url(&format!("/api/maintenance/{}", request_id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "completed", "actualCost": "180.00" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(server.url("/api/dashboard/stats"))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(common::data(&body)["pendingMaintenance"], 0);

    // Deleting the property takes its children with it
    let res = client
        .delete(server.url(&format!("/api/properties/{}", property_id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(server.url(&format!("/api/tenants/{}", tenant_id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(server.url(&format!("/api/maintenance/{}", request_id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
