//! Request construction and transport against a local canned server.
//!
//! Run with: cargo test --test client_tests

mod common;

use chrono::{Duration, NaiveDate, Utc};
use dsws_client::models::{
    DataRequest, DataType, DateSpec, GetDataBundleRequest, Instrument, RequestBundle,
    StringKvPair,
};
use dsws_client::{ClientConfig, DswsClient, Error, Token};
use serde_json::json;
use std::time::Duration as StdDuration;

use common::init_logging;
use common::server::{CannedServer, Reply};

fn client(config: ClientConfig) -> DswsClient {
    let token = Token::new("test-token", Utc::now() + Duration::hours(1));
    DswsClient::new(token, config).unwrap()
}

fn snapshot() -> DateSpec {
    DateSpec::snapshot(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
}

#[tokio::test]
async fn test_bundle_body_is_pascal_case() {
    init_logging();
    let client = client(ClientConfig::default().with_app_id("integration"));

    let bundles = DswsClient::construct_request_bundles(
        Instrument::from_list(["VOD", "U:JPM"]),
        &["NAME", "ISIN"],
        snapshot(),
        Some("test"),
        true,
    )
    .unwrap();
    assert_eq!(bundles.len(), 1);

    let body = GetDataBundleRequest {
        token_value: "test-token",
        data_requests: bundles[0].requests(),
        properties: client.call_properties(bundles[0].properties()),
    };
    let json = serde_json::to_value(&body).unwrap();

    assert_eq!(json["TokenValue"], "test-token");
    assert_eq!(json["Properties"][0]["Key"], "__AppId");
    assert_eq!(json["Properties"][0]["Value"], "integration");

    let request = &json["DataRequests"][0];
    assert_eq!(request["Instrument"]["Value"], "VOD,U:JPM");
    assert_eq!(request["DataTypes"][1]["Value"], "ISIN");
    assert_eq!(request["Date"]["Start"], "2020-01-01");
    assert_eq!(request["Date"]["Kind"], 0);
    assert_eq!(request["Tag"], "test");

    let keys: Vec<&str> = request["Instrument"]["Properties"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["Key"].as_str())
        .collect();
    assert_eq!(keys, ["IsSymbolSet", "ReturnName"]);
}

#[tokio::test]
async fn test_session_can_be_replaced() {
    let client = client(ClientConfig::default());
    let clone = client.clone();

    client
        .session()
        .replace(Token::new("next", Utc::now() - Duration::hours(3)))
        .await;
    assert!(clone.session().is_expired().await);

    let request = DswsClient::construct_request(
        Instrument::new(["VOD"]),
        &["P"],
        snapshot(),
        None,
        false,
    )
    .unwrap();
    assert!(matches!(clone.fetch_one(&request, &[]).await, Err(Error::SessionExpired)));
}

#[tokio::test]
async fn test_empty_identifiers() {
    let client = client(ClientConfig::default());
    let result = client
        .fetch_snapshot_data(&[] as &[&str], &["P"], snapshot().start(), None)
        .await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_proxy_configuration() {
    let client = client(ClientConfig::default().with_proxy("http://127.0.0.1:3128"));
    assert_eq!(client.config().proxy.as_deref(), Some("http://127.0.0.1:3128"));
}

fn data_response(tag: &str) -> serde_json::Value {
    json!({
        "DataTypeValues": [{"DataType": "NAME", "SymbolValues": [
            {"Currency": "£", "Symbol": "VOD", "Type": 6, "Value": "VODAFONE GROUP"}
        ]}],
        "Dates": ["/Date(1577836800000+0000)/"],
        "SymbolNames": [{"Key": "VOD", "Value": "VOD"}],
        "Tag": tag
    })
}

fn bundle_reply(tag: &str) -> String {
    json!({"DataResponses": [data_response(tag)], "Properties": null}).to_string()
}

fn single_bundle() -> RequestBundle {
    let request =
        DataRequest::new(Instrument::new(["VOD"]), vec![DataType::new("NAME")], snapshot(), None)
            .unwrap();
    RequestBundle::new(vec![request]).unwrap()
}

fn local_config(server: &CannedServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.base_url.clone())
        .with_app_id("local")
}

#[tokio::test]
async fn test_fetch_all_is_bounded_and_complete() {
    init_logging();
    let reply = Reply::ok(bundle_reply("t")).with_delay(StdDuration::from_millis(100));
    let server = CannedServer::start(reply).await;
    let client = client(local_config(&server).with_max_concurrency(2));
    let bundles = vec![single_bundle(); 3];

    let responses = client.fetch_all(&bundles).await.unwrap();
    assert_eq!(responses.len(), 3);
    assert!((1..=2).contains(&server.peak_in_flight()));
    for line in server.request_lines() {
        assert!(line.starts_with("POST /DSWSClient/V1/DSService.svc/rest/GetDataBundle "));
    }

    let parsed = client.fetch_and_aggregate(&bundles).await.unwrap();
    assert_eq!(parsed.records.len(), 3);
    assert!(parsed.meta.tags.contains("t"));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    init_logging();
    let server = CannedServer::start(Reply::status(500, "Internal error")).await;
    let client = client(local_config(&server));

    let err = client.fetch_bundle(&single_bundle()).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        Error::Api { status: 500, ref message } if message == "Internal error"
    ));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    init_logging();
    let reply = Reply::ok(bundle_reply("t")).with_delay(StdDuration::from_secs(5));
    let server = CannedServer::start(reply).await;
    let client = client(local_config(&server).with_timeout(StdDuration::from_millis(200)));

    let result = client.fetch_all(&[single_bundle()]).await;
    assert!(matches!(result, Err(Error::Timeout)));
}

#[tokio::test]
async fn test_tag_reaches_every_request() {
    init_logging();
    let server = CannedServer::start(Reply::ok(bundle_reply("names"))).await;
    let client = client(local_config(&server).with_max_concurrency(4));
    let ids: Vec<String> = (0..1200).map(|i| format!("S{}", i)).collect();

    let parsed = client
        .fetch_snapshot_data(&ids, &["NAME"], snapshot().start(), Some("names"))
        .await
        .unwrap();
    assert!(parsed.meta.tags.contains("names"));

    let bodies = server.request_bodies();
    assert_eq!(bodies.len(), 3);
    let mut sent = 0;
    for body in &bodies {
        assert_eq!(body["Properties"][0]["Key"], "__AppId");
        for request in body["DataRequests"].as_array().unwrap() {
            assert_eq!(request["Tag"], "names");
            sent += request["Instrument"]["Value"].as_str().unwrap().split(',').count();
        }
    }
    assert_eq!(sent, 1200);
}

#[tokio::test]
async fn test_fetch_one_sends_extra_properties() {
    init_logging();
    let reply = json!({"DataResponse": data_response("one"), "Properties": null});
    let server = CannedServer::start(Reply::ok(reply.to_string())).await;
    let client = client(local_config(&server).with_data_source("PROD"));

    let request = DswsClient::construct_request(
        Instrument::new(["VOD"]),
        &["NAME"],
        snapshot(),
        Some("one"),
        false,
    )
    .unwrap();
    let response = client
        .fetch_one(&request, &[StringKvPair::new("Priority", "High")])
        .await
        .unwrap();
    assert_eq!(response.data_response.tag.as_deref(), Some("one"));

    let line = &server.request_lines()[0];
    assert!(line.starts_with("POST /DSWSClient/V1/DSService.svc/rest/GetData "));
    let body = &server.request_bodies()[0];
    let keys: Vec<&str> = body["Properties"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["Key"].as_str())
        .collect();
    assert_eq!(keys, ["Priority", "__AppId", "Source"]);
    assert_eq!(body["DataRequest"]["Tag"], "one");
}
