use super::{parse_args, pretty_json, ToolDescriptor, ToolReply};
use crate::core::errors::ToolError;
use crate::exchange::types::{
    CancelRequest, LimitOrder, OrderRequest, OrderType, TimeInForce, TpSl, TriggerOrder,
};
use crate::exchange::HyperliquidClient;
use serde::Deserialize;
use serde_json::{json, Value};

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "place_order",
            description: "Place a limit or trigger order on Hyperliquid",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "assetIndex": {
                        "type": "number",
                        "description": "Asset index for the coin (0 for BTC, 1 for ETH, etc.)",
                    },
                    "isBuy": {
                        "type": "boolean",
                        "description": "True for buy order, false for sell order",
                    },
                    "price": {
                        "type": "string",
                        "description": "Order price as string",
                    },
                    "size": {
                        "type": "string",
                        "description": "Order size as string",
                    },
                    "reduceOnly": {
                        "type": "boolean",
                        "description": "Whether this is a reduce-only order (optional, default false)",
                    },
                    "timeInForce": {
                        "type": "string",
                        "description": "Time in force",
                        "enum": ["Gtc", "Ioc", "Alo"],
                    },
                    "clientOrderId": {
                        "type": "string",
                        "description": "Client order ID (optional)",
                    },
                },
                "required": ["assetIndex", "isBuy", "price", "size", "timeInForce"],
            }),
        },
        ToolDescriptor {
            name: "place_trigger_order",
            description: "Place a trigger order (stop-loss or take-profit) on Hyperliquid",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "assetIndex": {
                        "type": "number",
                        "description": "Asset index for the coin (0 for BTC, 1 for ETH, etc.)",
                    },
                    "isBuy": {
                        "type": "boolean",
                        "description": "True for buy order, false for sell order",
                    },
                    "size": {
                        "type": "string",
                        "description": "Order size as string",
                    },
                    "triggerPrice": {
                        "type": "string",
                        "description": "Trigger price as string",
                    },
                    "isMarket": {
                        "type": "boolean",
                        "description": "Whether to execute as market order when triggered",
                    },
                    "triggerType": {
                        "type": "string",
                        "description": "Trigger type",
                        "enum": ["tp", "sl"],
                    },
                    "reduceOnly": {
                        "type": "boolean",
                        "description": "Whether this is a reduce-only order (optional, default false)",
                    },
                    "clientOrderId": {
                        "type": "string",
                        "description": "Client order ID (optional)",
                    },
                },
                "required": ["assetIndex", "isBuy", "size", "triggerPrice", "isMarket", "triggerType"],
            }),
        },
        ToolDescriptor {
            name: "cancel_order",
            description: "Cancel a specific order by order ID or client order ID",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "assetIndex": {
                        "type": "number",
                        "description": "Asset index for the coin",
                    },
                    "orderId": {
                        "type": "number",
                        "description": "Order ID to cancel (use either orderId or clientOrderId)",
                    },
                    "clientOrderId": {
                        "type": "string",
                        "description": "Client order ID to cancel (use either orderId or clientOrderId)",
                    },
                },
                "required": ["assetIndex"],
            }),
        },
        ToolDescriptor {
            name: "cancel_all_orders",
            description: "Cancel all open orders",
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct PlaceOrderArgs {
    #[serde(rename = "assetIndex")]
    asset_index: u32,
    #[serde(rename = "isBuy")]
    is_buy: bool,
    price: String,
    size: String,
    #[serde(rename = "reduceOnly", default)]
    reduce_only: bool,
    #[serde(rename = "timeInForce")]
    time_in_force: TimeInForce,
    #[serde(rename = "clientOrderId", default)]
    client_order_id: Option<String>,
}

pub async fn place_order(client: &HyperliquidClient, args: Value) -> Result<ToolReply, ToolError> {
    let args: PlaceOrderArgs = parse_args(args)?;

    let order = OrderRequest {
        asset: args.asset_index,
        is_buy: args.is_buy,
        price: args.price,
        size: args.size,
        reduce_only: args.reduce_only,
        order_type: OrderType::Limit {
            limit: LimitOrder {
                tif: args.time_in_force,
            },
        },
        cloid: args.client_order_id,
    };

    let result = client.place_order(vec![order]).await;
    if !result.success {
        return Err(ToolError::remote("place order", result.error));
    }

    Ok(ToolReply::text(format!(
        "Order placed successfully!\n\n{}",
        pretty_json(&result.data)
    )))
}

#[derive(Debug, Deserialize)]
struct TriggerOrderArgs {
    #[serde(rename = "assetIndex")]
    asset_index: u32,
    #[serde(rename = "isBuy")]
    is_buy: bool,
    size: String,
    #[serde(rename = "triggerPrice")]
    trigger_price: String,
    #[serde(rename = "isMarket")]
    is_market: bool,
    #[serde(rename = "triggerType")]
    trigger_type: TpSl,
    #[serde(rename = "reduceOnly", default)]
    reduce_only: bool,
    #[serde(rename = "clientOrderId", default)]
    client_order_id: Option<String>,
}

pub async fn place_trigger_order(
    client: &HyperliquidClient,
    args: Value,
) -> Result<ToolReply, ToolError> {
    let args: TriggerOrderArgs = parse_args(args)?;

    // Trigger orders reuse the order path; the limit price field is unused
    // and pinned to "0".
    let order = OrderRequest {
        asset: args.asset_index,
        is_buy: args.is_buy,
        price: "0".to_string(),
        size: args.size,
        reduce_only: args.reduce_only,
        order_type: OrderType::Trigger {
            trigger: TriggerOrder {
                trigger_px: args.trigger_price,
                is_market: args.is_market,
                tpsl: args.trigger_type,
            },
        },
        cloid: args.client_order_id,
    };

    let result = client.place_order(vec![order]).await;
    if !result.success {
        return Err(ToolError::remote("place trigger order", result.error));
    }

    Ok(ToolReply::text(format!(
        "Trigger order placed successfully!\n\n{}",
        pretty_json(&result.data)
    )))
}

#[derive(Debug, Deserialize)]
struct CancelOrderArgs {
    #[serde(rename = "assetIndex")]
    asset_index: u32,
    #[serde(rename = "orderId", default)]
    order_id: Option<u64>,
    #[serde(rename = "clientOrderId", default)]
    client_order_id: Option<String>,
}

pub async fn cancel_order(client: &HyperliquidClient, args: Value) -> Result<ToolReply, ToolError> {
    let args: CancelOrderArgs = parse_args(args)?;

    if args.order_id.is_none() && args.client_order_id.is_none() {
        return Err(ToolError::InvalidArguments(
            "Either orderId or clientOrderId must be provided".to_string(),
        ));
    }

    // Order id wins when both are supplied.
    let cancel = if let Some(oid) = args.order_id {
        CancelRequest {
            asset: args.asset_index,
            oid: Some(oid),
            cloid: None,
        }
    } else {
        CancelRequest {
            asset: args.asset_index,
            oid: None,
            cloid: args.client_order_id,
        }
    };

    let result = client.cancel_order(vec![cancel]).await;
    if !result.success {
        return Err(ToolError::remote("cancel order", result.error));
    }

    Ok(ToolReply::text(format!(
        "Order cancelled successfully!\n\n{}",
        pretty_json(&result.data)
    )))
}

pub async fn cancel_all_orders(
    client: &HyperliquidClient,
    _args: Value,
) -> Result<ToolReply, ToolError> {
    let result = client.cancel_all_orders().await;
    if !result.success {
        return Err(ToolError::remote("cancel all orders", result.error));
    }

    Ok(ToolReply::text(format!(
        "All orders cancelled successfully!\n\n{}",
        pretty_json(&result.data)
    )))
}
