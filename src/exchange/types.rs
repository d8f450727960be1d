use crate::core::errors::HyperliquidError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Uniform result envelope produced by every client method.
///
/// Failures are values: the client never raises past its own boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

impl<T> From<Result<T, HyperliquidError>> for ApiResponse<T> {
    fn from(result: Result<T, HyperliquidError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// /info endpoint requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum InfoRequest {
    #[serde(rename = "allMids")]
    AllMids,
    #[serde(rename = "l2Book")]
    L2Book {
        coin: String,
        #[serde(rename = "nSigFigs", skip_serializing_if = "Option::is_none")]
        n_sig_figs: Option<u32>,
    },
    #[serde(rename = "candleSnapshot")]
    CandleSnapshot { req: CandleRequest },
    #[serde(rename = "openOrders")]
    OpenOrders { user: Option<String> },
    #[serde(rename = "userFills")]
    UserFills { user: Option<String> },
    #[serde(rename = "userFillsByTime")]
    UserFillsByTime {
        user: Option<String>,
        #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
        start_time: Option<u64>,
        #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
        end_time: Option<u64>,
    },
    #[serde(rename = "clearinghouseState")]
    ClearinghouseState { user: Option<String> },
}

#[derive(Debug, Clone, Serialize)]
pub struct CandleRequest {
    pub coin: String,
    pub interval: String,
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
}

// ---------------------------------------------------------------------------
// /exchange endpoint actions
// ---------------------------------------------------------------------------

/// Signed order action. Serialized verbatim into both the signing payload and
/// the request body, so declared field order and names are wire-significant.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "order")]
    Order { orders: Vec<OrderRequest> },
    #[serde(rename = "cancel")]
    Cancel { cancels: Vec<CancelRequest> },
    #[serde(rename = "cancelByCloid")]
    CancelByCloid { cancels: Vec<CancelRequest> },
}

/// Single order in the Hyperliquid compressed wire format.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(rename = "p")]
    pub price: String,
    #[serde(rename = "s")]
    pub size: String,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    #[serde(rename = "t")]
    pub order_type: OrderType,
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderType {
    Limit { limit: LimitOrder },
    Trigger { trigger: TriggerOrder },
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitOrder {
    pub tif: TimeInForce,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerOrder {
    #[serde(rename = "triggerPx")]
    pub trigger_px: String,
    #[serde(rename = "isMarket")]
    pub is_market: bool,
    pub tpsl: TpSl,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Alo,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TpSl {
    #[serde(rename = "tp")]
    Tp,
    #[serde(rename = "sl")]
    Sl,
}

/// Cancel target: order id or client order id, by asset index.
#[derive(Debug, Clone, Serialize)]
pub struct CancelRequest {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "o", skip_serializing_if = "Option::is_none")]
    pub oid: Option<u64>,
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

/// Body POSTed to `/exchange`. A missing vault address serializes as `null`,
/// matching the signing payload.
#[derive(Debug, Serialize)]
pub struct ExchangeRequest<'a> {
    pub action: &'a Action,
    pub nonce: u64,
    pub signature: String,
    #[serde(rename = "vaultAddress")]
    pub vault_address: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// /info endpoint responses
// ---------------------------------------------------------------------------

/// Mid prices keyed by coin. Ordered map so rendered output is deterministic.
pub type AllMids = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Book {
    #[serde(default)]
    pub coin: String,
    /// `[bids, asks]`
    pub levels: Vec<Vec<L2Level>>,
    #[serde(default)]
    pub time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Level {
    pub px: String,
    pub sz: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "t")]
    pub open_time: u64,
    #[serde(rename = "T", default)]
    pub close_time: u64,
    #[serde(rename = "s", default)]
    pub coin: String,
    #[serde(rename = "i", default)]
    pub interval: String,
    #[serde(rename = "o")]
    pub open: String,
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "v")]
    pub volume: String,
    #[serde(rename = "n", default)]
    pub num_trades: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrder {
    pub coin: String,
    pub side: String,
    pub sz: String,
    pub px: String,
    pub oid: u64,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(rename = "origSz", default)]
    pub orig_sz: String,
    #[serde(default)]
    pub cloid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFill {
    pub coin: String,
    pub px: String,
    pub sz: String,
    pub side: String,
    pub time: u64,
    #[serde(default)]
    pub oid: u64,
    #[serde(default)]
    pub crossed: bool,
    pub fee: String,
    #[serde(default)]
    pub tid: u64,
}

/// Clearinghouse-state summary. Fields default so a sparse response still
/// renders rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(rename = "totalNtlPos", default = "zero")]
    pub total_ntl_pos: String,
    #[serde(rename = "totalUnrealizedPnl", default = "zero")]
    pub total_unrealized_pnl: String,
    #[serde(rename = "totalMarginUsed", default = "zero")]
    pub total_margin_used: String,
    #[serde(default)]
    pub time: Option<u64>,
}

fn zero() -> String {
    "0".to_string()
}
