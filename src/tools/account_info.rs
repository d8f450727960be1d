use super::{format_timestamp, parse_args, ToolDescriptor, ToolReply};
use crate::core::errors::ToolError;
use crate::exchange::types::{OpenOrder, Portfolio, UserFill};
use crate::exchange::HyperliquidClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Display cap for the unbounded fills query; the by-time variant is
/// already bounded by its window and renders everything.
const FILLS_DISPLAY_CAP: usize = 20;

pub fn tools() -> Vec<ToolDescriptor> {
    let user_property = json!({
        "type": "string",
        "description": "User wallet address (optional, defaults to configured wallet)",
    });

    vec![
        ToolDescriptor {
            name: "get_open_orders",
            description: "Get all open orders for the configured wallet or a specific user",
            input_schema: json!({
                "type": "object",
                "properties": { "user": user_property },
                "required": [],
            }),
        },
        ToolDescriptor {
            name: "get_user_fills",
            description: "Get trading history (fills) for the configured wallet or a specific user",
            input_schema: json!({
                "type": "object",
                "properties": { "user": user_property },
                "required": [],
            }),
        },
        ToolDescriptor {
            name: "get_user_fills_by_time",
            description: "Get trading history (fills) for a specific time range",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user": user_property,
                    "startTime": {
                        "type": "number",
                        "description": "Start time in milliseconds",
                    },
                    "endTime": {
                        "type": "number",
                        "description": "End time in milliseconds",
                    },
                },
                "required": [],
            }),
        },
        ToolDescriptor {
            name: "get_portfolio",
            description: "Get portfolio information including positions, PnL, and margin usage",
            input_schema: json!({
                "type": "object",
                "properties": { "user": user_property },
                "required": [],
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct UserArgs {
    #[serde(default)]
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FillsByTimeArgs {
    #[serde(default)]
    user: Option<String>,
    #[serde(rename = "startTime", default)]
    start_time: Option<u64>,
    #[serde(rename = "endTime", default)]
    end_time: Option<u64>,
}

fn side_label(side: &str) -> &'static str {
    if side == "B" {
        "BUY"
    } else {
        "SELL"
    }
}

pub async fn get_open_orders(
    client: &HyperliquidClient,
    args: Value,
) -> Result<ToolReply, ToolError> {
    let args: UserArgs = parse_args(args)?;

    let result = client.get_open_orders(args.user).await;
    if !result.success {
        return Err(ToolError::remote("get open orders", result.error));
    }

    let orders = result.data.unwrap_or_default();
    Ok(ToolReply::text(format_open_orders(&orders)))
}

pub(crate) fn format_open_orders(orders: &[OpenOrder]) -> String {
    if orders.is_empty() {
        return "No open orders found.".to_string();
    }

    let orders_text = orders
        .iter()
        .map(|order| {
            format!(
                "{} {} {} @ {} (ID: {})",
                order.coin,
                side_label(&order.side),
                order.sz,
                order.px,
                order.oid
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Open Orders ({}):\n\n{orders_text}", orders.len())
}

pub async fn get_user_fills(
    client: &HyperliquidClient,
    args: Value,
) -> Result<ToolReply, ToolError> {
    let args: UserArgs = parse_args(args)?;

    let result = client.get_user_fills(args.user).await;
    if !result.success {
        return Err(ToolError::remote("get user fills", result.error));
    }

    let fills = result.data.unwrap_or_default();
    if fills.is_empty() {
        return Ok(ToolReply::text("No trading history found."));
    }

    Ok(ToolReply::text(format_fills(
        &fills,
        Some(FILLS_DISPLAY_CAP),
    )))
}

pub async fn get_user_fills_by_time(
    client: &HyperliquidClient,
    args: Value,
) -> Result<ToolReply, ToolError> {
    let args: FillsByTimeArgs = parse_args(args)?;

    let result = client
        .get_user_fills_by_time(args.user, args.start_time, args.end_time)
        .await;
    if !result.success {
        return Err(ToolError::remote("get user fills by time", result.error));
    }

    let fills = result.data.unwrap_or_default();
    if fills.is_empty() {
        return Ok(ToolReply::text(
            "No trading history found for the specified time range.",
        ));
    }

    Ok(ToolReply::text(format_fills(&fills, None)))
}

pub(crate) fn format_fills(fills: &[UserFill], cap: Option<usize>) -> String {
    let shown = cap.map_or(fills.len(), |cap| fills.len().min(cap));

    let fills_text = fills[..shown]
        .iter()
        .map(|fill| {
            format!(
                "{}: {} {} {} @ {} (Fee: {})",
                format_timestamp(fill.time),
                fill.coin,
                side_label(&fill.side),
                fill.sz,
                fill.px,
                fill.fee
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let more_text = if fills.len() > shown {
        format!("\n... and {} more", fills.len() - shown)
    } else {
        String::new()
    };

    format!(
        "Trading History ({} fills):\n\n{fills_text}{more_text}",
        fills.len()
    )
}

pub async fn get_portfolio(
    client: &HyperliquidClient,
    args: Value,
) -> Result<ToolReply, ToolError> {
    let args: UserArgs = parse_args(args)?;

    let result = client.get_portfolio(args.user).await;
    if !result.success {
        return Err(ToolError::remote("get portfolio", result.error));
    }

    match result.data {
        Some(portfolio) => Ok(ToolReply::text(format_portfolio(&portfolio))),
        None => Ok(ToolReply::text("No portfolio data found.")),
    }
}

pub(crate) fn format_portfolio(portfolio: &Portfolio) -> String {
    let last_updated = portfolio
        .time
        .map_or_else(|| "N/A".to_string(), format_timestamp);

    format!(
        "Portfolio Summary:\n\nTotal Notional Position: ${}\nTotal Unrealized PnL: ${}\nTotal Margin Used: ${}\nLast Updated: {last_updated}",
        portfolio.total_ntl_pos, portfolio.total_unrealized_pnl, portfolio.total_margin_used
    )
}
