use crate::core::config::HyperliquidConfig;
use crate::core::errors::HyperliquidError;
use crate::exchange::signer::Account;
use crate::exchange::types::{
    Action, AllMids, ApiResponse, CancelRequest, CandleRequest, ExchangeRequest, InfoRequest,
    L2Book, OpenOrder, OrderRequest, Portfolio, UserFill,
};
use chrono::Utc;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::instrument;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the Hyperliquid HTTP API.
///
/// One method per supported operation; every method returns an
/// [`ApiResponse`] envelope and never propagates an error. Safe for
/// concurrent use: the only mutable state is the nonce cell.
pub struct HyperliquidClient {
    http: reqwest::Client,
    base_url: String,
    account: Option<Account>,
    wallet_address: Option<String>,
    last_nonce: AtomicU64,
}

impl HyperliquidClient {
    /// Create a client from configuration. The account is derived eagerly
    /// from the private key, so a malformed key fails here rather than on
    /// the first trading call.
    pub fn new(config: &HyperliquidConfig) -> Result<Self, HyperliquidError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let account = config
            .private_key()
            .map(Account::from_private_key)
            .transpose()?;

        // Configured address wins; otherwise fall back to the address the
        // key derives to.
        let wallet_address = config
            .wallet_address
            .clone()
            .or_else(|| account.as_ref().map(|a| a.address().to_string()));

        Ok(Self {
            http,
            base_url: config.effective_api_url().to_string(),
            account,
            wallet_address,
            last_nonce: AtomicU64::new(0),
        })
    }

    /// Point the client at a custom endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }

    pub fn can_sign(&self) -> bool {
        self.account.is_some()
    }

    /// Monotonic nonce: wall-clock milliseconds, bumped past the previous
    /// value so concurrent signed calls in the same millisecond never collide.
    fn next_nonce(&self) -> u64 {
        let now = Utc::now().timestamp_millis() as u64;
        let mut prev = self.last_nonce.load(Ordering::SeqCst);
        loop {
            let next = now.max(prev + 1);
            match self.last_nonce.compare_exchange(
                prev,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return next,
                Err(observed) => prev = observed,
            }
        }
    }

    fn resolve_user(&self, user: Option<String>) -> Option<String> {
        user.or_else(|| self.wallet_address.clone())
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, HyperliquidError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(HyperliquidError::Api {
                code: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn post_info<T: DeserializeOwned>(
        &self,
        request: &InfoRequest,
    ) -> Result<T, HyperliquidError> {
        let url = format!("{}/info", self.base_url);
        let response = self.http.post(&url).json(request).send().await?;
        Self::parse(response).await
    }

    async fn post_exchange(&self, action: &Action) -> Result<Value, HyperliquidError> {
        let account = self
            .account
            .as_ref()
            .ok_or(HyperliquidError::MissingCredentials)?;

        let nonce = self.next_nonce();
        let signature = account.sign_action(action, nonce, self.wallet_address.as_deref())?;
        let request = ExchangeRequest {
            action,
            nonce,
            signature,
            vault_address: self.wallet_address.as_deref(),
        };

        let url = format!("{}/exchange", self.base_url);
        let response = self.http.post(&url).json(&request).send().await?;
        Self::parse(response).await
    }

    // -- market data --------------------------------------------------------

    /// Current mid prices for all coins.
    #[instrument(skip(self), fields(exchange = "hyperliquid"))]
    pub async fn get_all_mids(&self) -> ApiResponse<AllMids> {
        self.post_info(&InfoRequest::AllMids).await.into()
    }

    /// L2 order book snapshot for a specific coin.
    #[instrument(skip(self), fields(exchange = "hyperliquid", coin = %coin))]
    pub async fn get_l2_book(&self, coin: &str, n_sig_figs: Option<u32>) -> ApiResponse<L2Book> {
        self.post_info(&InfoRequest::L2Book {
            coin: coin.to_string(),
            n_sig_figs,
        })
        .await
        .into()
    }

    /// Historical candle data.
    #[instrument(skip(self), fields(exchange = "hyperliquid", coin = %coin, interval = %interval))]
    pub async fn get_candle_snapshot(
        &self,
        coin: &str,
        interval: &str,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> ApiResponse<Value> {
        self.post_info(&InfoRequest::CandleSnapshot {
            req: CandleRequest {
                coin: coin.to_string(),
                interval: interval.to_string(),
                start_time,
                end_time,
            },
        })
        .await
        .into()
    }

    // -- account info -------------------------------------------------------

    /// Open orders for the given user, defaulting to the configured wallet.
    #[instrument(skip(self), fields(exchange = "hyperliquid"))]
    pub async fn get_open_orders(&self, user: Option<String>) -> ApiResponse<Vec<OpenOrder>> {
        self.post_info(&InfoRequest::OpenOrders {
            user: self.resolve_user(user),
        })
        .await
        .into()
    }

    /// Trading history (fills).
    #[instrument(skip(self), fields(exchange = "hyperliquid"))]
    pub async fn get_user_fills(&self, user: Option<String>) -> ApiResponse<Vec<UserFill>> {
        self.post_info(&InfoRequest::UserFills {
            user: self.resolve_user(user),
        })
        .await
        .into()
    }

    /// Trading history for a specific time range.
    #[instrument(skip(self), fields(exchange = "hyperliquid"))]
    pub async fn get_user_fills_by_time(
        &self,
        user: Option<String>,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> ApiResponse<Vec<UserFill>> {
        self.post_info(&InfoRequest::UserFillsByTime {
            user: self.resolve_user(user),
            start_time,
            end_time,
        })
        .await
        .into()
    }

    /// Clearinghouse state: positions, PnL and margin usage.
    #[instrument(skip(self), fields(exchange = "hyperliquid"))]
    pub async fn get_portfolio(&self, user: Option<String>) -> ApiResponse<Portfolio> {
        self.post_info(&InfoRequest::ClearinghouseState {
            user: self.resolve_user(user),
        })
        .await
        .into()
    }

    // -- trading ------------------------------------------------------------

    /// Place one or more orders (signed).
    #[instrument(skip(self, orders), fields(exchange = "hyperliquid", order_count = orders.len()))]
    pub async fn place_order(&self, orders: Vec<OrderRequest>) -> ApiResponse<Value> {
        self.post_exchange(&Action::Order { orders }).await.into()
    }

    /// Cancel specific orders by order id or client order id (signed).
    #[instrument(skip(self, cancels), fields(exchange = "hyperliquid", cancel_count = cancels.len()))]
    pub async fn cancel_order(&self, cancels: Vec<CancelRequest>) -> ApiResponse<Value> {
        self.post_exchange(&Action::Cancel { cancels }).await.into()
    }

    /// Cancel all open orders (signed).
    ///
    /// Sends `{type:"cancelByCloid", cancels:[]}` for compatibility with the
    /// deployed server; current exchange docs do not describe an empty cancel
    /// list as a cancel-everything mechanism, so verify before relying on it.
    #[instrument(skip(self), fields(exchange = "hyperliquid"))]
    pub async fn cancel_all_orders(&self) -> ApiResponse<Value> {
        self.post_exchange(&Action::CancelByCloid { cancels: vec![] })
            .await
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::types::{LimitOrder, OrderType, TimeInForce};

    const TEST_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn read_only_client() -> HyperliquidClient {
        HyperliquidClient::new(&HyperliquidConfig::default()).unwrap()
    }

    fn signing_client() -> HyperliquidClient {
        let config = HyperliquidConfig::default().with_private_key(TEST_KEY);
        HyperliquidClient::new(&config).unwrap()
    }

    fn sample_order() -> OrderRequest {
        OrderRequest {
            asset: 0,
            is_buy: true,
            price: "50000".to_string(),
            size: "0.1".to_string(),
            reduce_only: false,
            order_type: OrderType::Limit {
                limit: LimitOrder {
                    tif: TimeInForce::Gtc,
                },
            },
            cloid: None,
        }
    }

    #[test]
    fn read_only_client_has_no_signing_capability() {
        let client = read_only_client();
        assert!(!client.can_sign());
        assert!(client.wallet_address().is_none());
    }

    #[test]
    fn wallet_address_falls_back_to_derived_address() {
        let client = signing_client();
        assert_eq!(
            client.wallet_address(),
            Some("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf")
        );
    }

    #[test]
    fn configured_wallet_address_wins_over_derived() {
        let config = HyperliquidConfig::default()
            .with_private_key(TEST_KEY)
            .with_wallet_address("0x1111111111111111111111111111111111111111");
        let client = HyperliquidClient::new(&config).unwrap();
        assert_eq!(
            client.wallet_address(),
            Some("0x1111111111111111111111111111111111111111")
        );
    }

    #[test]
    fn malformed_private_key_fails_construction() {
        let config = HyperliquidConfig::default().with_private_key("0x1234");
        assert!(HyperliquidClient::new(&config).is_err());
    }

    #[test]
    fn nonces_are_strictly_increasing() {
        let client = signing_client();
        let first = client.next_nonce();
        let second = client.next_nonce();
        let third = client.next_nonce();
        assert!(second > first);
        assert!(third > second);
    }

    #[tokio::test]
    async fn place_order_without_key_returns_error_envelope() {
        let client = read_only_client();
        let result = client.place_order(vec![sample_order()]).await;

        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.error.unwrap().contains("Private key required"));
    }

    #[tokio::test]
    async fn cancel_order_without_key_returns_error_envelope() {
        let client = read_only_client();
        let result = client
            .cancel_order(vec![CancelRequest {
                asset: 0,
                oid: Some(1),
                cloid: None,
            }])
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("Private key required"));
    }

    #[tokio::test]
    async fn get_all_mids_success_wraps_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/info")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"type": "allMids"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"BTC": "50000", "ETH": "3000"}"#)
            .create_async()
            .await;

        let client = read_only_client().with_base_url(server.url());
        let result = client.get_all_mids().await;

        mock.assert_async().await;
        assert!(result.success);
        let mids = result.data.unwrap();
        assert_eq!(mids.get("BTC"), Some(&"50000".to_string()));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn non_2xx_response_becomes_error_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/info")
            .with_status(500)
            .with_body("remote exploded")
            .create_async()
            .await;

        let client = read_only_client().with_base_url(server.url());
        let result = client.get_all_mids().await;

        assert!(!result.success);
        assert!(result.data.is_none());
        let error = result.error.unwrap();
        assert!(error.contains("500"));
        assert!(error.contains("remote exploded"));
    }

    #[tokio::test]
    async fn exchange_request_carries_signature_and_nonce() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/exchange")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "action": {"type": "cancelByCloid", "cancels": []},
                "vaultAddress": "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let client = signing_client().with_base_url(server.url());
        let result = client.cancel_all_orders().await;

        mock.assert_async().await;
        assert!(result.success);
    }
}
