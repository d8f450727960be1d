pub mod client;
pub mod signer;
pub mod types;

pub use client::HyperliquidClient;
pub use types::{
    Action, AllMids, ApiResponse, CancelRequest, Candle, L2Book, L2Level, LimitOrder, OpenOrder,
    OrderRequest, OrderType, Portfolio, TimeInForce, TpSl, TriggerOrder, UserFill,
};
