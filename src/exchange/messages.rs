//! Bitstamp REST API payloads

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ids and enum codes arrive as strings or numbers depending on the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Str(String),
    Num(u64),
}

impl std::fmt::Display for StringOrNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StringOrNumber::Str(s) => f.write_str(s),
            StringOrNumber::Num(n) => write!(f, "{}", n),
        }
    }
}

/// `[price, amount]` pair in an order book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLevel(pub String, pub String);

/// Response from GET /api/v2/order_book/{pair}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookResponse {
    /// Unix timestamp in seconds
    pub timestamp: String,
    #[serde(default)]
    pub microtimestamp: Option<String>,
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
}

/// Response from GET /api/v2/ticker/{pair}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerResponse {
    pub last: String,
    #[serde(default)]
    pub bid: Option<String>,
    #[serde(default)]
    pub ask: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Entry of POST /api/v2/open_orders/{pair}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrderResponse {
    pub id: StringOrNumber,
    pub datetime: String,
    /// 0 = buy, 1 = sell
    #[serde(rename = "type")]
    pub order_type: StringOrNumber,
    pub price: String,
    pub amount: String,
    #[serde(default)]
    pub currency_pair: Option<String>,
}

/// Response from POST /api/v2/buy/{pair}/ and /api/v2/sell/{pair}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: StringOrNumber,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(rename = "type", default)]
    pub order_type: Option<StringOrNumber>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

/// Response from POST /api/v2/balance/{pair}/
///
/// Older accounts report a single `fee`, newer ones `{pair}_fee`. Both are
/// percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

impl BalanceResponse {
    /// Fee percentage for `pair`, as sent by the exchange
    pub fn fee_for(&self, pair: &str) -> Option<String> {
        self.fee.clone().or_else(|| {
            self.other
                .get(&format!("{}_fee", pair))
                .and_then(|v| match v {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
        })
    }
}

/// Error body, e.g. `{"status": "error", "reason": {"__all__": ["..."]}, "code": "API0001"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    #[serde(default)]
    pub reason: serde_json::Value,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Try to read an error body out of any JSON payload
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let status = value.get("status")?.as_str()?;
        if status != "error" {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn message(&self) -> String {
        let reason = match &self.reason {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "no reason given".to_string(),
            other => other.to_string(),
        };
        match &self.code {
            Some(code) => format!("{} ({})", reason, code),
            None => reason,
        }
    }
}

/// Parse Bitstamp's `YYYY-MM-DD HH:MM:SS[.ffffff]` UTC timestamps
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_book() {
        let json = r#"{
            "timestamp": "1704067200",
            "microtimestamp": "1704067200123456",
            "bids": [["0.00490000", "12.5"], ["0.00480000", "3"]],
            "asks": [["0.00510000", "7.25"]]
        }"#;
        let book: OrderBookResponse = serde_json::from_str(json).unwrap();
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0].0, "0.00490000");
        assert_eq!(book.asks[0].1, "7.25");
    }

    #[test]
    fn test_parse_open_order_with_numeric_fields() {
        let json = r#"{"id": 1234, "datetime": "2024-01-01 00:00:00", "type": 1, "price": "0.005", "amount": "20000"}"#;
        let order: OpenOrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(order.id.to_string(), "1234");
        assert_eq!(order.order_type, StringOrNumber::Num(1));
    }

    #[test]
    fn test_balance_fee_lookup() {
        let legacy: BalanceResponse = serde_json::from_str(r#"{"fee": "0.25"}"#).unwrap();
        assert_eq!(legacy.fee_for("btcusd").as_deref(), Some("0.25"));

        let per_pair: BalanceResponse =
            serde_json::from_str(r#"{"btcusd_fee": "0.40", "usd_available": "10"}"#).unwrap();
        assert_eq!(per_pair.fee_for("btcusd").as_deref(), Some("0.40"));
        assert_eq!(per_pair.fee_for("ltcbtc"), None);
    }

    #[test]
    fn test_error_response_detection() {
        let value: serde_json::Value = serde_json::from_str(
            r#"{"status": "error", "reason": {"__all__": ["Insufficient funds"]}, "code": "API0001"}"#,
        )
        .unwrap();
        let err = ErrorResponse::from_value(&value).unwrap();
        assert!(err.message().contains("Insufficient funds"));
        assert!(err.message().ends_with("(API0001)"));

        let ok: serde_json::Value = serde_json::from_str(r#"{"id": "1"}"#).unwrap();
        assert!(ErrorResponse::from_value(&ok).is_none());
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-01-01 12:30:45").unwrap();
        assert_eq!(dt.timestamp(), 1704112245);
        assert!(parse_datetime("2024-01-01 12:30:45.123456").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }
}
