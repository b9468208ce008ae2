//! Common test utilities and fixtures

#![allow(dead_code)]

use rust_decimal_macros::dec;
use scalper::common::types::{Market, OrderBook, PriceLevel};
use scalper::config::types::ApiCredentials;
use scalper::BitstampRestClient;
use serde_json::{json, Value};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MARKET_ID: &str = "ltcbtc";

/// The LTC/BTC market used throughout the tests
pub fn ltc_btc_market() -> Market {
    Market::new(MARKET_ID, "LTC/BTC", "LTC", "BTC")
}

/// Create a sample order book for testing
pub fn sample_order_book() -> OrderBook {
    OrderBook {
        market_id: MARKET_ID.to_string(),
        bids: vec![
            PriceLevel::new(dec!(0.0049), dec!(10)),
            PriceLevel::new(dec!(0.0048), dec!(25)),
        ],
        asks: vec![
            PriceLevel::new(dec!(0.0051), dec!(5)),
            PriceLevel::new(dec!(0.0052), dec!(12)),
        ],
        timestamp: chrono::Utc::now(),
    }
}

/// Client pointed at a mock server, signed with throwaway credentials
pub fn client_for(server: &MockServer) -> BitstampRestClient {
    BitstampRestClient::new(&server.uri())
        .expect("Failed to create REST client")
        .with_credentials(ApiCredentials::new("key123".into(), "secret456".into()))
        .with_non_fatal_errors(vec![502, 503, 504, 520, 522, 525], vec![])
}

/// Sample API payloads
pub mod responses {
    use super::*;

    pub fn order_book(bids: &[(&str, &str)], asks: &[(&str, &str)]) -> Value {
        json!({
            "timestamp": "1704067200",
            "microtimestamp": "1704067200000000",
            "bids": bids.iter().map(|(p, q)| json!([p, q])).collect::<Vec<_>>(),
            "asks": asks.iter().map(|(p, q)| json!([p, q])).collect::<Vec<_>>(),
        })
    }

    pub fn ticker(last: &str) -> Value {
        json!({
            "last": last,
            "bid": "0.0049",
            "ask": "0.0051",
            "timestamp": "1704067200",
            "volume": "1250.5"
        })
    }

    pub fn open_order(id: u64, order_type: u8, price: &str, amount: &str) -> Value {
        json!({
            "id": id.to_string(),
            "datetime": "2024-01-01 12:00:00",
            "type": order_type.to_string(),
            "price": price,
            "amount": amount,
            "currency_pair": "LTC/BTC"
        })
    }

    pub fn order(id: u64, price: &str, amount: &str) -> Value {
        json!({
            "id": id.to_string(),
            "datetime": "2024-01-01 12:00:00.000000",
            "type": "0",
            "price": price,
            "amount": amount
        })
    }

    pub fn balance(fee_percent: &str) -> Value {
        json!({
            "ltc_available": "0.00",
            "btc_available": "1.00",
            "ltcbtc_fee": fee_percent
        })
    }

    pub fn error(reason: &str) -> Value {
        json!({ "status": "error", "reason": reason, "code": "API0001" })
    }
}

/// Mount a public GET endpoint
pub async fn mount_get(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a signed POST endpoint
pub async fn mount_post(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(header_exists("X-Auth-Signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
