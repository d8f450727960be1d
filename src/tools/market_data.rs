use super::{parse_args, pretty_json, ToolDescriptor, ToolReply};
use crate::core::errors::ToolError;
use crate::exchange::types::{Candle, L2Book};
use crate::exchange::HyperliquidClient;
use serde::Deserialize;
use serde_json::{json, Value};

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "get_all_mids",
            description: "Get current mid prices for all coins on Hyperliquid",
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        },
        ToolDescriptor {
            name: "get_l2_book",
            description: "Get L2 order book snapshot for a specific coin",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "coin": {
                        "type": "string",
                        "description": "The coin symbol (e.g., BTC, ETH, SOL)",
                    },
                    "nSigFigs": {
                        "type": "number",
                        "description": "Number of significant figures for price aggregation (optional)",
                        "minimum": 1,
                        "maximum": 5,
                    },
                },
                "required": ["coin"],
            }),
        },
        ToolDescriptor {
            name: "get_candle_snapshot",
            description: "Get historical candle data for a specific coin",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "coin": {
                        "type": "string",
                        "description": "The coin symbol (e.g., BTC, ETH, SOL)",
                    },
                    "interval": {
                        "type": "string",
                        "description": "Candle interval",
                        "enum": ["1m", "5m", "15m", "1h", "4h", "1d", "1w", "1M"],
                    },
                    "startTime": {
                        "type": "number",
                        "description": "Start time in milliseconds (optional)",
                    },
                    "endTime": {
                        "type": "number",
                        "description": "End time in milliseconds (optional)",
                    },
                },
                "required": ["coin", "interval"],
            }),
        },
    ]
}

pub async fn get_all_mids(
    client: &HyperliquidClient,
    _args: Value,
) -> Result<ToolReply, ToolError> {
    let result = client.get_all_mids().await;
    if !result.success {
        return Err(ToolError::remote("get mid prices", result.error));
    }

    let mids = result.data.unwrap_or_default();
    Ok(ToolReply::text(format!(
        "Mid prices for all coins:\n{}",
        pretty_json(&mids)
    )))
}

#[derive(Debug, Deserialize)]
struct L2BookArgs {
    coin: String,
    #[serde(rename = "nSigFigs", default)]
    n_sig_figs: Option<u32>,
}

pub async fn get_l2_book(client: &HyperliquidClient, args: Value) -> Result<ToolReply, ToolError> {
    let args: L2BookArgs = parse_args(args)?;

    let result = client.get_l2_book(&args.coin, args.n_sig_figs).await;
    if !result.success {
        return Err(ToolError::remote(
            format!("get L2 book for {}", args.coin),
            result.error,
        ));
    }

    let book = result.data.ok_or_else(|| {
        ToolError::remote(
            format!("get L2 book for {}", args.coin),
            Some("empty response".to_string()),
        )
    })?;

    Ok(ToolReply::text(format_l2_book(&args.coin, &book)))
}

pub(crate) fn format_l2_book(coin: &str, book: &L2Book) -> String {
    let empty = Vec::new();
    let bids = book.levels.first().unwrap_or(&empty);
    let asks = book.levels.get(1).unwrap_or(&empty);

    let bids_text = bids
        .iter()
        .map(|level| format!("{} @ {}", level.px, level.sz))
        .collect::<Vec<_>>()
        .join("\n");
    let asks_text = asks
        .iter()
        .map(|level| format!("{} @ {}", level.px, level.sz))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "L2 Order Book for {coin}:\n\nBids ({} levels):\n{bids_text}\n\nAsks ({} levels):\n{asks_text}",
        bids.len(),
        asks.len()
    )
}

#[derive(Debug, Deserialize)]
struct CandleSnapshotArgs {
    coin: String,
    interval: String,
    #[serde(rename = "startTime", default)]
    start_time: Option<u64>,
    #[serde(rename = "endTime", default)]
    end_time: Option<u64>,
}

pub async fn get_candle_snapshot(
    client: &HyperliquidClient,
    args: Value,
) -> Result<ToolReply, ToolError> {
    let args: CandleSnapshotArgs = parse_args(args)?;

    let result = client
        .get_candle_snapshot(&args.coin, &args.interval, args.start_time, args.end_time)
        .await;
    if !result.success {
        return Err(ToolError::remote(
            format!("get candle data for {}", args.coin),
            result.error,
        ));
    }

    // An absent "candles" key is an empty result; a present but unparseable
    // value is a remote-contract violation and must surface as an error.
    let candles: Vec<Candle> = match result.data.as_ref().and_then(|data| data.get("candles")) {
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            ToolError::remote(
                format!("get candle data for {}", args.coin),
                Some(e.to_string()),
            )
        })?,
        None => Vec::new(),
    };

    Ok(ToolReply::text(format_candles(
        &args.coin,
        &args.interval,
        &candles,
    )))
}

pub(crate) fn format_candles(coin: &str, interval: &str, candles: &[Candle]) -> String {
    let candle_text = candles
        .iter()
        .map(|candle| {
            format!(
                "{}: O:{} H:{} L:{} C:{} V:{}",
                candle.open_time, candle.open, candle.high, candle.low, candle.close, candle.volume
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Candle data for {coin} ({interval}):\n{candle_text}")
}
