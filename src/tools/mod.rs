pub mod account_info;
pub mod market_data;
pub mod trading;

use crate::core::errors::ToolError;
use crate::exchange::HyperliquidClient;
use chrono::{Local, TimeZone};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Static description of one operation: name, human description and the
/// JSON schema of its parameters.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Structured reply produced by every handler.
#[derive(Debug, Clone, Serialize)]
pub struct ToolReply {
    pub content: Vec<ToolContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl ToolReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text",
                text: text.into(),
            }],
        }
    }
}

/// All 11 supported tools, in catalog order.
pub fn all_tools() -> Vec<ToolDescriptor> {
    let mut tools = market_data::tools();
    tools.extend(account_info::tools());
    tools.extend(trading::tools());
    tools
}

/// Resolve a tool by name and run its handler.
///
/// Unknown names yield [`ToolError::MethodNotFound`]; everything else either
/// returns a reply or a structured handler error. Nothing panics past this
/// boundary.
pub async fn dispatch(
    client: &HyperliquidClient,
    name: &str,
    args: Value,
) -> Result<ToolReply, ToolError> {
    // Absent params arrive as null; treat that as an empty argument bag.
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };

    match name {
        "get_all_mids" => market_data::get_all_mids(client, args).await,
        "get_l2_book" => market_data::get_l2_book(client, args).await,
        "get_candle_snapshot" => market_data::get_candle_snapshot(client, args).await,
        "get_open_orders" => account_info::get_open_orders(client, args).await,
        "get_user_fills" => account_info::get_user_fills(client, args).await,
        "get_user_fills_by_time" => account_info::get_user_fills_by_time(client, args).await,
        "get_portfolio" => account_info::get_portfolio(client, args).await,
        "place_order" => trading::place_order(client, args).await,
        "place_trigger_order" => trading::place_trigger_order(client, args).await,
        "cancel_order" => trading::cancel_order(client, args).await,
        "cancel_all_orders" => trading::cancel_all_orders(client, args).await,
        _ => Err(ToolError::MethodNotFound(name.to_string())),
    }
}

/// Parse a handler's argument struct out of the generic argument bag.
/// Missing required fields surface as `InvalidArguments` naming the field.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Render a millisecond epoch timestamp as a local ISO-8601 string.
pub(crate) fn format_timestamp(millis: u64) -> String {
    Local
        .timestamp_millis_opt(millis as i64)
        .single()
        .map_or_else(
            || "N/A".to_string(),
            |dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        )
}

/// Two-space-indented JSON for payload echoes in replies.
pub(crate) fn pretty_json(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::HyperliquidConfig;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_eleven_uniquely_named_tools() {
        let tools = all_tools();
        assert_eq!(tools.len(), 11);

        let names: HashSet<&str> = tools.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn every_schema_is_an_object_with_properties() {
        for tool in all_tools() {
            assert_eq!(
                tool.input_schema["type"], "object",
                "schema of {} must be an object",
                tool.name
            );
            assert!(tool.input_schema["required"].is_array());
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn required_lists_match_the_wire_contract() {
        let tools = all_tools();
        let required = |name: &str| {
            tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool {name}"))
                .input_schema["required"]
                .clone()
        };

        assert_eq!(required("get_all_mids"), json!([]));
        assert_eq!(required("get_l2_book"), json!(["coin"]));
        assert_eq!(required("get_candle_snapshot"), json!(["coin", "interval"]));
        assert_eq!(required("get_open_orders"), json!([]));
        assert_eq!(required("get_user_fills"), json!([]));
        assert_eq!(required("get_user_fills_by_time"), json!([]));
        assert_eq!(required("get_portfolio"), json!([]));
        assert_eq!(
            required("place_order"),
            json!(["assetIndex", "isBuy", "price", "size", "timeInForce"])
        );
        assert_eq!(
            required("place_trigger_order"),
            json!(["assetIndex", "isBuy", "size", "triggerPrice", "isMarket", "triggerType"])
        );
        assert_eq!(required("cancel_order"), json!(["assetIndex"]));
        assert_eq!(required("cancel_all_orders"), json!([]));
    }

    #[test]
    fn enums_and_bounds_match_the_wire_contract() {
        let tools = all_tools();
        let schema = |name: &str| {
            &tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool {name}"))
                .input_schema
        };

        assert_eq!(
            schema("place_order")["properties"]["timeInForce"]["enum"],
            json!(["Gtc", "Ioc", "Alo"])
        );
        assert_eq!(
            schema("place_trigger_order")["properties"]["triggerType"]["enum"],
            json!(["tp", "sl"])
        );
        assert_eq!(
            schema("get_candle_snapshot")["properties"]["interval"]["enum"],
            json!(["1m", "5m", "15m", "1h", "4h", "1d", "1w", "1M"])
        );
        assert_eq!(schema("get_l2_book")["properties"]["nSigFigs"]["minimum"], 1);
        assert_eq!(schema("get_l2_book")["properties"]["nSigFigs"]["maximum"], 5);
    }

    #[tokio::test]
    async fn unknown_tool_is_method_not_found() {
        let client = HyperliquidClient::new(&HyperliquidConfig::default()).unwrap();
        let result = dispatch(&client, "no_such_tool", Value::Null).await;
        assert!(matches!(result, Err(ToolError::MethodNotFound(_))));
    }

    #[tokio::test]
    async fn null_arguments_are_treated_as_empty() {
        let client = HyperliquidClient::new(&HyperliquidConfig::default()).unwrap();
        // cancel_order has required validation that runs before any network
        // call, so a null bag must parse as empty and fail on the missing
        // assetIndex rather than on the null itself.
        let result = dispatch(&client, "cancel_order", Value::Null).await;
        match result {
            Err(ToolError::InvalidArguments(message)) => {
                assert!(message.contains("assetIndex"));
            }
            other => panic!("expected InvalidArguments, got {other:?}"),
        }
    }

    #[test]
    fn reply_content_serializes_as_text_block() {
        let reply = ToolReply::text("hello");
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "hello");
    }
}
