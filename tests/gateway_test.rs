use disudata::domain::ports::DATA_PATH;
use disudata::{
    BillingGateway, CatalogError, GatewayConfig, GatewayError, HttpBillingGateway, Network,
    PlanCatalog, VtuError,
};
use httpmock::prelude::*;
use serde_json::json;

const BASIC_AUTH: &str = "Basic dnR1LXVzZXI6dnR1LXBhc3M=";

fn gateway_for(server: &MockServer) -> HttpBillingGateway {
    HttpBillingGateway::new(&GatewayConfig::new(server.base_url(), "vtu-user", "vtu-pass"))
}

#[tokio::test]
async fn test_every_call_carries_basic_auth() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/data")
            .header("authorization", BASIC_AUTH)
            .query_param("network_id", "glo");
        then.status(200).json_body(json!({"data": []}));
    });

    let list = gateway_for(&server)
        .get_data_list(DATA_PATH, &[("network_id", "glo".to_string())])
        .await
        .unwrap();

    mock.assert();
    assert!(list.is_empty());
    assert_eq!(list.status, 200);
}

#[tokio::test]
async fn test_provider_message_on_error_status() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(500)
            .json_body(json!({"status": "error", "message": "Provider timeout"}));
    });

    let err = gateway_for(&server)
        .get(DATA_PATH, &[("phone", "08031234567".to_string())])
        .await
        .unwrap_err();

    mock.assert();
    assert_eq!(err, GatewayError::provider_rejected(500, "Provider timeout"));
}

#[tokio::test]
async fn test_generic_message_when_provider_sends_none() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(404).body("not here");
    });

    let err = gateway_for(&server).get(DATA_PATH, &[]).await.unwrap_err();

    assert_eq!(err, GatewayError::rejected(404, "gateway error"));
}

#[tokio::test]
async fn test_non_json_success_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(200).body("<html>maintenance</html>");
    });

    let err = gateway_for(&server).get(DATA_PATH, &[]).await.unwrap_err();
    assert_eq!(err, GatewayError::rejected(200, "malformed response body"));
}

#[tokio::test]
async fn test_undecodable_plan_keeps_decoder_detail_from_users() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data").query_param("network_id", "mtn");
        then.status(200).json_body(json!([{"id": 1, "plan": "1GB"}]));
    });

    let err = PlanCatalog::new(gateway_for(&server))
        .resolve(Network::Mtn)
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        CatalogError::Upstream(GatewayError::UpstreamRejected { message, .. })
            if message.contains("amount")
    ));
    assert_eq!(err.user_message(), "Failed to fetch data plans. Please try again.");
    assert_eq!(
        VtuError::from(err).user_message(),
        "Failed to fetch data plans. Please try again."
    );
}

#[tokio::test]
async fn test_unreachable_provider() {
    let gateway = HttpBillingGateway::new(&GatewayConfig::new(
        "http://127.0.0.1:1",
        "vtu-user",
        "vtu-pass",
    ));

    let err = gateway
        .get(DATA_PATH, &[("phone", "08031234567".to_string())])
        .await
        .unwrap_err();

    match err {
        GatewayError::Unreachable { message } => assert!(!message.contains("08031234567")),
        other => panic!("expected Unreachable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_credentials_send_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(200).json_body(json!({"data": []}));
    });

    let mut config = GatewayConfig::new(server.base_url(), "vtu-user", "vtu-pass");
    config.password = None;
    let gateway = HttpBillingGateway::new(&config);

    let err = gateway.get(DATA_PATH, &[]).await.unwrap_err();

    assert_eq!(err, GatewayError::MisconfiguredCredentials);
    mock.assert_hits(0);
}

#[tokio::test]
async fn test_accepted_list_envelopes() {
    let plan = json!({"id": 1, "plan": "500MB", "amount": "150", "validity": "1 day"});
    let bodies = [
        json!({"data": [plan.clone()]}),
        json!({"status": "success", "data": {"data": [plan.clone()]}}),
        json!([plan.clone()]),
    ];

    for body in bodies {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/data").query_param("network_id", "airtel");
            then.status(200).json_body(body.clone());
        });

        let catalog = PlanCatalog::new(gateway_for(&server))
            .resolve(Network::Airtel)
            .await
            .unwrap();

        assert_eq!(catalog.len(), 1, "body: {}", body);
        assert_eq!(catalog.plans()[0].label, "500MB");
    }
}

#[tokio::test]
async fn test_unrecognized_envelope_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(200).json_body(json!({"plans": []}));
    });

    let err = PlanCatalog::new(gateway_for(&server))
        .resolve(Network::Mtn)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CatalogError::Upstream(GatewayError::rejected(200, "unexpected response shape"))
    );
    assert_eq!(err.user_message(), "Failed to fetch data plans. Please try again.");
}

#[tokio::test]
async fn test_catalog_surfaces_provider_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(400).json_body(json!({"message": "Invalid network"}));
    });

    let err = PlanCatalog::new(gateway_for(&server))
        .resolve(Network::Etisalat)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Invalid network");
}
