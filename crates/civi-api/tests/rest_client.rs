use civi_api::{ApiError, ApiRequest, CrmApi, CrmClient};
use civi_config::CrmConfig;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CrmClient {
    CrmClient::from_config(&CrmConfig {
        endpoint: format!("{}/civicrm/ajax/rest", server.uri()),
        api_key: "user-key".into(),
        site_key: "site-key".into(),
        ..CrmConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn get_sends_query_and_decodes_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/civicrm/ajax/rest"))
        .and(query_param("entity", "OptionValue"))
        .and(query_param("action", "get"))
        .and(query_param("api_key", "user-key"))
        .and(query_param("key", "site-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_error": 0,
            "count": 2,
            "values": {
                "31": {"id": "31", "value": "1", "name": "Meeting", "label": "Meeting", "weight": "1"},
                "32": {"id": "32", "value": "2", "name": "Phone Call", "label": "Phone Call", "weight": "2"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .call(&ApiRequest::new("OptionValue", "get").param("option_group_id", "activity_type"))
        .await
        .unwrap();

    assert_eq!(resp.count, Some(2));
    assert_eq!(resp.values.len(), 2);
}

#[tokio::test]
async fn getcount_returns_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("entity", "Activity"))
        .and(query_param("action", "getcount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"is_error": 0, "result": 7})))
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .call(&ApiRequest::new("Activity", "getcount").param("activity_type_id", 5))
        .await
        .unwrap();
    assert_eq!(resp.count_value().unwrap(), 7);
}

#[tokio::test]
async fn create_is_posted_as_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/civicrm/ajax/rest"))
        .and(body_string_contains("entity=Activity"))
        .and(body_string_contains("action=create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_error": 0,
            "id": 88,
            "values": [{"id": 88}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .call(&ApiRequest::new("Activity", "create").param("activity_type_id", 5))
        .await
        .unwrap();
    assert_eq!(resp.id, Some(88));
}

#[tokio::test]
async fn is_error_envelope_surfaces_as_crm_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_error": 1,
            "error_message": "API permission check failed"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call(&ApiRequest::new("CaseType", "get"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Crm { ref message, .. } if message.contains("permission")));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call(&ApiRequest::new("CaseType", "get"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 503, ref message } if message == "maintenance"));
}

#[tokio::test]
async fn html_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call(&ApiRequest::new("CaseType", "get"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn error_envelope_with_forbidden_status_keeps_crm_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "is_error": 1,
            "error_message": "Permission denied to create Activity"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call(&ApiRequest::new("Activity", "create").param("activity_type_id", 5))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ApiError::Crm { ref message, .. } if message == "Permission denied to create Activity")
    );
}
