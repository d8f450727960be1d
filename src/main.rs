use hyperliquid_mcp::{HyperliquidClient, HyperliquidConfig, McpServer};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries JSON-RPC; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    #[cfg(feature = "env-file")]
    let config = HyperliquidConfig::from_env_file();
    #[cfg(not(feature = "env-file"))]
    let config = HyperliquidConfig::from_env();

    for problem in config.validate() {
        warn!("configuration: {problem}");
    }

    let client = HyperliquidClient::new(&config)?;

    info!(
        testnet = config.testnet,
        api_url = config.effective_api_url(),
        trading_enabled = client.can_sign(),
        wallet = client.wallet_address().unwrap_or("none"),
        "starting Hyperliquid MCP server on stdio"
    );

    let server = McpServer::new(Arc::new(client));
    server.run_stdio().await?;

    info!("stdin closed, shutting down");
    Ok(())
}
