//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod server;

use std::sync::Once;

use dsws_client::models::DataResponse;
use serde_json::json;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Six daily prices for VOD.
pub fn timeseries_response() -> DataResponse {
    serde_json::from_value(json!({
        "AdditionalResponses": [{"Key": "Frequency", "Value": "D"}],
        "DataTypeNames": [{"Key": "P", "Value": null}],
        "DataTypeValues": [{
            "DataType": "P",
            "SymbolValues": [{
                "Currency": "£",
                "Symbol": "VOD",
                "Type": 10,
                "Value": [92.71, 92.01, 90.79, 89.81, 90.66, 89.68]
            }]
        }],
        "Dates": [
            "/Date(1681689600000+0000)/",
            "/Date(1681776000000+0000)/",
            "/Date(1681862400000+0000)/",
            "/Date(1681948800000+0000)/",
            "/Date(1682035200000+0000)/",
            "/Date(1682294400000+0000)/"
        ],
        "SymbolNames": [{"Key": "VOD", "Value": "VODAFONE GROUP"}],
        "Tag": null
    }))
    .expect("timeseries fixture")
}

/// Name and ISIN of two symbols at a single date.
pub fn snapshot_response() -> DataResponse {
    serde_json::from_value(json!({
        "AdditionalResponses": null,
        "DataTypeNames": [
            {"Key": "NAME", "Value": "NAME"},
            {"Key": "ISIN", "Value": "ISIN CODE"}
        ],
        "DataTypeValues": [
            {
                "DataType": "NAME",
                "SymbolValues": [
                    {"Currency": "£ ", "Symbol": "VOD", "Type": 6, "Value": "VODAFONE GROUP"},
                    {"Currency": "U$", "Symbol": "U:JPM", "Type": 6, "Value": "JP MORGAN CHASE & CO."}
                ]
            },
            {
                "DataType": "ISIN",
                "SymbolValues": [
                    {"Currency": "£", "Symbol": "VOD", "Type": 6, "Value": "GB00BH4HKS39"},
                    {"Currency": "U$", "Symbol": "U:JPM", "Type": 6, "Value": "US46625H1005"}
                ]
            }
        ],
        "Dates": ["/Date(1577836800000+0000)/"],
        "SymbolNames": [
            {"Key": "VOD", "Value": "VOD"},
            {"Key": "U:JPM", "Value": "U:JPM"}
        ],
        "Tag": "test"
    }))
    .expect("snapshot fixture")
}

/// The timeseries fixture with its dates removed.
pub fn invalid_response() -> DataResponse {
    let mut response = timeseries_response();
    response.dates = Some(Vec::new());
    response
}
