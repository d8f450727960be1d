use secrecy::{ExposeSecret, Secret};
use std::env;

pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// Process configuration, read once from the environment at startup.
///
/// The private key and wallet address are optional; without them the client
/// is restricted to read-only `/info` operations.
#[derive(Debug, Clone)]
pub struct HyperliquidConfig {
    pub api_url: String,
    pub private_key: Option<Secret<String>>,
    pub wallet_address: Option<String>,
    pub testnet: bool,
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            api_url: MAINNET_API_URL.to_string(),
            private_key: None,
            wallet_address: None,
            testnet: false,
        }
    }
}

impl HyperliquidConfig {
    /// Create configuration from environment variables.
    ///
    /// Expected environment variables:
    /// - `HYPERLIQUID_API_URL` (optional)
    /// - `HYPERLIQUID_PRIVATE_KEY` (optional, required for trading)
    /// - `HYPERLIQUID_WALLET_ADDRESS` (optional)
    /// - `HYPERLIQUID_TESTNET` ("true" enables testnet; anything else is mainnet)
    pub fn from_env() -> Self {
        let testnet = env::var("HYPERLIQUID_TESTNET")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            api_url: env::var("HYPERLIQUID_API_URL")
                .unwrap_or_else(|_| MAINNET_API_URL.to_string()),
            private_key: env::var("HYPERLIQUID_PRIVATE_KEY").ok().map(Secret::new),
            wallet_address: env::var("HYPERLIQUID_WALLET_ADDRESS").ok(),
            testnet,
        }
    }

    /// Load environment variables from a .env file (if present), then read
    /// the configuration as [`Self::from_env`] does.
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Self {
        // Missing .env is fine; system environment still applies.
        let _ = dotenv::dotenv();
        Self::from_env()
    }

    /// Set the private key.
    #[must_use]
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(Secret::new(private_key.into()));
        self
    }

    /// Set the wallet address.
    #[must_use]
    pub fn with_wallet_address(mut self, wallet_address: impl Into<String>) -> Self {
        self.wallet_address = Some(wallet_address.into());
        self
    }

    /// Set testnet mode.
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// The API host actually used for outbound calls.
    ///
    /// The testnet flag always wins over any configured URL: `testnet` routes
    /// to the testnet host, everything else to mainnet.
    pub fn effective_api_url(&self) -> &'static str {
        if self.testnet {
            TESTNET_API_URL
        } else {
            MAINNET_API_URL
        }
    }

    /// Get the private key (use carefully - exposes the secret).
    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_ref().map(|k| k.expose_secret().as_str())
    }

    /// Check whether trading operations are possible with this configuration.
    pub fn has_credentials(&self) -> bool {
        self.private_key.is_some()
    }

    /// Validate the configuration and return a list of human-readable errors.
    ///
    /// Credentials are optional, so their absence is not an error; malformed
    /// values are.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.api_url.is_empty() {
            errors.push("API URL is required".to_string());
        }

        if let Some(key) = self.private_key() {
            if !key.starts_with("0x") {
                errors.push("Private key must start with 0x".to_string());
            }
        }

        if let Some(address) = &self.wallet_address {
            if !address.starts_with("0x") {
                errors.push("Wallet address must start with 0x".to_string());
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnet_flag_overrides_configured_url() {
        let config = HyperliquidConfig {
            api_url: "https://example.com".to_string(),
            ..HyperliquidConfig::default()
        }
        .testnet(true);
        assert!(config.effective_api_url().contains("hyperliquid-testnet.xyz"));
    }

    #[test]
    fn mainnet_host_used_regardless_of_override_url() {
        let config = HyperliquidConfig {
            api_url: "https://example.com".to_string(),
            ..HyperliquidConfig::default()
        };
        assert_eq!(config.effective_api_url(), MAINNET_API_URL);
        assert!(config.effective_api_url().contains("hyperliquid.xyz"));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(HyperliquidConfig::default().validate().is_empty());
    }

    #[test]
    fn private_key_without_0x_prefix_is_rejected() {
        let config = HyperliquidConfig::default().with_private_key("abcdef");
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Private key"));
    }

    #[test]
    fn wallet_address_without_0x_prefix_is_rejected() {
        let config = HyperliquidConfig::default().with_wallet_address("1234");
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Wallet address"));
    }

    #[test]
    fn well_formed_credentials_pass_validation() {
        let config = HyperliquidConfig::default()
            .with_private_key("0xabc123")
            .with_wallet_address("0x1234567890123456789012345678901234567890");
        assert!(config.validate().is_empty());
        assert!(config.has_credentials());
    }

    #[test]
    fn debug_output_never_contains_the_key() {
        let config = HyperliquidConfig::default().with_private_key("0xdeadbeef");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("deadbeef"));
    }
}
