//! Integration tests for the REST client.
//!
//! These tests verify JSON decoding and the empty-body and not-found
//! policies against a mock server.

use std::collections::HashMap;

use bigbuy_api::clients::HttpError;
use bigbuy_api::{ApiError, AppKey, BigBuyConfig, BigBuyConfigBuilder, RestClient, RestError};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> BigBuyConfigBuilder {
    BigBuyConfig::builder()
        .app_key(AppKey::new("test-app-key").unwrap())
        .base_url(format!("{}/rest", server.uri()))
}

async fn respond(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_json_decodes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/catalog/languages.json"))
        .and(query_param("isoCode", "es"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"isoCode":"es","name":"Spanish"}]"#),
        )
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server).build().unwrap());
    let query: HashMap<String, String> = [("isoCode".to_string(), "es".to_string())]
        .into_iter()
        .collect();

    let languages = client
        .get_json("/catalog/languages.json", Some(query))
        .await
        .unwrap();

    assert_eq!(languages, Some(json!([{"isoCode": "es", "name": "Spanish"}])));
}

#[tokio::test]
async fn test_post_and_put_send_json_body() {
    let server = MockServer::start().await;
    let body = json!({"order": {"internalReference": "42"}});
    Mock::given(method("POST"))
        .and(path("/rest/order/create.json"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/rest/order/update.json"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id": 42}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server).build().unwrap());

    assert_eq!(client.post_json("order/create", body.clone()).await.unwrap(), None);
    assert_eq!(
        client.put_json("order/update", body).await.unwrap(),
        Some(json!({"id": 42}))
    );
}

#[tokio::test]
async fn test_delete_json() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/user/webhook/7.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server).build().unwrap());
    let result = client.delete_json("user/webhook/7", None).await.unwrap();

    assert_eq!(result, Some(Value::Bool(true)));
}

#[tokio::test]
async fn test_empty_body_is_none_by_default() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(200)).await;

    let client = RestClient::new(&config_for(&server).build().unwrap());

    assert_eq!(client.get_json("catalog/languages", None).await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_body_is_null_when_disabled() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(200)).await;

    let config = config_for(&server).none_on_empty(false).build().unwrap();
    let client = RestClient::new(&config);

    assert_eq!(
        client.get_json("catalog/languages", None).await.unwrap(),
        Some(Value::Null)
    );
}

#[tokio::test]
async fn test_404_is_an_error_by_default() {
    let server = MockServer::start().await;
    respond(
        &server,
        ResponseTemplate::new(404).set_body_string(r#"{"code":404,"message":"Not found"}"#),
    )
    .await;

    let client = RestClient::new(&config_for(&server).build().unwrap());
    let error = client
        .get_json("catalog/product/1", None)
        .await
        .unwrap_err();

    match error {
        RestError::Http(HttpError::Api(ApiError::Response(context))) => {
            assert_eq!(context.response.code, 404);
            assert_eq!(context.message, "Not found");
        }
        other => panic!("expected a generic API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_404_is_none_when_enabled() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(404).set_body_string("Not Found")).await;

    let config = config_for(&server).none_on_404(true).build().unwrap();
    let client = RestClient::new(&config);

    assert_eq!(client.get_json("catalog/product/1", None).await.unwrap(), None);
}

#[tokio::test]
async fn test_invalid_json_success_body() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(200).set_body_string("definitely not json")).await;

    let client = RestClient::new(&config_for(&server).build().unwrap());
    let result = client.get_json("catalog/languages", None).await;

    assert!(matches!(result, Err(RestError::InvalidJson { .. })));
}

#[tokio::test]
async fn test_classified_errors_reach_the_caller() {
    let server = MockServer::start().await;
    let body = json!({
        "code": "ER003",
        "message": json!({"info": "Not enough stock.", "data": [{"sku": "S1"}]}).to_string()
    });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_json(body))
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server).build().unwrap());
    let error = client
        .post_json("order/create", json!({"order": {}}))
        .await
        .unwrap_err();

    match error.api_error() {
        Some(ApiError::Stock { skus, context }) => {
            assert_eq!(skus, &vec!["S1".to_string()]);
            assert_eq!(context.message, "Not enough stock.");
        }
        other => panic!("expected a stock error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_endpoint_is_rejected() {
    let client = RestClient::new(
        &BigBuyConfig::builder()
            .app_key(AppKey::new("test-app-key").unwrap())
            .build()
            .unwrap(),
    );

    let result = client.get_json("/", None).await;
    assert!(matches!(result, Err(RestError::InvalidPath { .. })));
}

#[tokio::test]
async fn test_plain_http_url_is_refused() {
    let client = RestClient::new(
        &BigBuyConfig::builder()
            .app_key(AppKey::new("test-app-key").unwrap())
            .build()
            .unwrap(),
    );

    let result = client
        .get_json("http://api.bigbuy.eu/rest/catalog/languages.json", None)
        .await;

    assert!(matches!(
        result,
        Err(RestError::Http(HttpError::InsecureEndpoint { .. }))
    ));
}
