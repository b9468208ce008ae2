//! REST API client for Bitstamp

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::auth::generate_auth_headers;
use super::messages::*;
use crate::common::errors::{ExchangeError, Result};
use crate::common::traits::TradingApi;
use crate::common::types::{OpenOrder, OrderBook, OrderId, OrderSide, PriceLevel};
use crate::config::types::{ApiCredentials, ExchangeConfig};

/// REST API client for Bitstamp
///
/// Classifies every failure for the strategy: connection problems, timeouts,
/// rate limits and the configured non-fatal status codes and messages are
/// transient; everything else is not.
#[derive(Debug, Clone)]
pub struct BitstampRestClient {
    /// HTTP client
    client: Client,
    /// Base URL, e.g. `https://www.bitstamp.net`
    base_url: String,
    /// Host as it appears in signed messages
    host: String,
    /// Optional API credentials for private endpoints
    credentials: Option<ApiCredentials>,
    /// Status codes reported as network errors
    non_fatal_error_codes: Vec<u16>,
    /// Transport error fragments reported as network errors
    non_fatal_error_messages: Vec<String>,
}

impl BitstampRestClient {
    /// Create a new REST client (unauthenticated)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::Internal(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| ExchangeError::Configuration(format!("Invalid REST URL {}: {}", base_url, e)))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(ExchangeError::Configuration(format!(
                    "REST URL {} has no host",
                    base_url
                )))
            }
        };

        Ok(Self {
            client,
            base_url,
            host,
            credentials: None,
            non_fatal_error_codes: Vec::new(),
            non_fatal_error_messages: Vec::new(),
        })
    }

    /// Build a client from the exchange section of the app config
    pub fn from_config(config: &ExchangeConfig) -> Result<Self> {
        let client = Self::with_timeout(
            &config.rest_url,
            Duration::from_secs(config.request_timeout_seconds),
        )?
        .with_non_fatal_errors(
            config.non_fatal_error_codes.clone(),
            config.non_fatal_error_messages.clone(),
        );

        Ok(match config.credentials() {
            Some(creds) => client.with_credentials(creds),
            None => client,
        })
    }

    /// Set API credentials for authenticated requests
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set which status codes and transport messages count as network errors
    pub fn with_non_fatal_errors(mut self, codes: Vec<u16>, messages: Vec<String>) -> Self {
        self.non_fatal_error_codes = codes;
        self.non_fatal_error_messages = messages;
        self
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn public_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_response(response).await
    }

    async fn private_post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            ExchangeError::Authentication(format!("API credentials required for {}", path))
        })?;

        let body = if params.is_empty() {
            String::new()
        } else {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in params {
                serializer.append_pair(key, value);
            }
            serializer.finish()
        };

        let headers = generate_auth_headers(
            &creds.api_key,
            &creds.api_secret,
            "POST",
            &self.host,
            path,
            &body,
        )?;

        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let request = headers.apply_to_request(self.client.post(&url)).body(body);
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ExchangeError::RateLimit {
                message: format!("Server returned status {}", status),
                retry_after_seconds,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if self.non_fatal_error_codes.contains(&status.as_u16()) {
            warn!(status = status.as_u16(), "Exchange returned non-fatal status");
            return Err(ExchangeError::Network(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        if !status.is_success() {
            return Err(ExchangeError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        if let Some(err) = ErrorResponse::from_value(&value) {
            return Err(ExchangeError::Api(err.message()));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Map a reqwest failure, honouring the configured non-fatal messages
    fn transport_error(&self, err: reqwest::Error) -> ExchangeError {
        let mut detail = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }

        if self
            .non_fatal_error_messages
            .iter()
            .any(|fragment| detail.contains(fragment.as_str()))
        {
            return ExchangeError::Network(detail);
        }
        ExchangeError::from(err)
    }

    async fn fee_rate(&self, market_id: &str) -> Result<Decimal> {
        let path = format!("/api/v2/balance/{}/", market_id);
        let balance: BalanceResponse = self.private_post(&path, &[]).await?;
        let percent = balance.fee_for(market_id).ok_or_else(|| {
            ExchangeError::InvalidResponse(format!("No fee in balance response for {}", market_id))
        })?;
        Ok(parse_decimal(&percent, "fee")? / Decimal::ONE_HUNDRED)
    }
}

#[async_trait]
impl TradingApi for BitstampRestClient {
    fn name(&self) -> &str {
        "Bitstamp"
    }

    #[instrument(skip(self))]
    async fn get_order_book(&self, market_id: &str) -> Result<OrderBook> {
        let path = format!("/api/v2/order_book/{}/", market_id);
        let response: OrderBookResponse = self.public_get(&path).await?;
        convert_order_book_response(market_id, response)
    }

    #[instrument(skip(self))]
    async fn get_open_orders(&self, market_id: &str) -> Result<Vec<OpenOrder>> {
        let path = format!("/api/v2/open_orders/{}/", market_id);
        let orders: Vec<OpenOrderResponse> = self.private_post(&path, &[]).await?;

        orders
            .into_iter()
            .map(|order| -> Result<OpenOrder> {
                Ok(OpenOrder {
                    id: OrderId::new(order.id.to_string()),
                    market_id: market_id.to_string(),
                    side: parse_side(&order.order_type)?,
                    price: parse_decimal(&order.price, "open order price")?,
                    quantity: parse_decimal(&order.amount, "open order amount")?,
                    created_at: parse_datetime(&order.datetime),
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn get_last_trade_price(&self, market_id: &str) -> Result<Decimal> {
        let path = format!("/api/v2/ticker/{}/", market_id);
        let ticker: TickerResponse = self.public_get(&path).await?;
        parse_decimal(&ticker.last, "last trade price")
    }

    #[instrument(skip(self))]
    async fn get_buy_fee_rate(&self, market_id: &str) -> Result<Decimal> {
        self.fee_rate(market_id).await
    }

    #[instrument(skip(self))]
    async fn get_sell_fee_rate(&self, market_id: &str) -> Result<Decimal> {
        self.fee_rate(market_id).await
    }

    #[instrument(skip(self))]
    async fn submit_order(
        &self,
        market_id: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderId> {
        let path = match side {
            OrderSide::Buy => format!("/api/v2/buy/{}/", market_id),
            OrderSide::Sell => format!("/api/v2/sell/{}/", market_id),
        };
        let params = [("amount", quantity.to_string()), ("price", price.to_string())];

        let response: OrderResponse = self.private_post(&path, &params).await?;
        Ok(OrderId::new(response.id.to_string()))
    }
}

// ============================================================================
// Helper Methods
// ============================================================================

/// Convert API order book response to unified OrderBook type
fn convert_order_book_response(market_id: &str, response: OrderBookResponse) -> Result<OrderBook> {
    let convert = |levels: Vec<BookLevel>, label: &str| -> Result<Vec<PriceLevel>> {
        levels
            .into_iter()
            .map(|BookLevel(price, amount)| {
                Ok(PriceLevel::new(
                    parse_decimal(&price, label)?,
                    parse_decimal(&amount, label)?,
                ))
            })
            .collect()
    };

    let timestamp = response
        .timestamp
        .parse::<i64>()
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(chrono::Utc::now);

    Ok(OrderBook {
        market_id: market_id.to_string(),
        bids: convert(response.bids, "bid")?,
        asks: convert(response.asks, "ask")?,
        timestamp,
    })
}

fn parse_decimal(value: &str, what: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| ExchangeError::InvalidResponse(format!("Invalid {} '{}': {}", what, value, e)))
}

fn parse_side(order_type: &StringOrNumber) -> Result<OrderSide> {
    match order_type.to_string().as_str() {
        "0" => Ok(OrderSide::Buy),
        "1" => Ok(OrderSide::Sell),
        other => Err(ExchangeError::InvalidResponse(format!(
            "Unknown order type: {}",
            other
        ))),
    }
}
