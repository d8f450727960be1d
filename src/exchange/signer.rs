use crate::core::errors::HyperliquidError;
use crate::exchange::types::Action;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use serde::Serialize;
use sha3::{Digest, Keccak256};

/// Signing payload for `/exchange` actions.
///
/// Key order is fixed by declared field order and the serialization is
/// compact (comma/colon separators only), so identical inputs always hash to
/// identical bytes. An absent vault address serializes as `null`.
#[derive(Serialize)]
struct SignPayload<'a> {
    action: &'a Action,
    nonce: u64,
    #[serde(rename = "vaultAddress")]
    vault_address: Option<&'a str>,
}

/// Credential derived from the configured private key.
///
/// Owned by the client, constructed once, used only to produce signatures.
/// Never serialized or logged.
#[derive(Clone)]
pub struct Account {
    secret_key: SecretKey,
    address: String,
    secp: Secp256k1<secp256k1::All>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Account {
    pub fn from_private_key(private_key: &str) -> Result<Self, HyperliquidError> {
        let key_bytes = hex::decode(private_key.trim_start_matches("0x"))
            .map_err(|e| HyperliquidError::InvalidKey(format!("invalid hex: {e}")))?;
        let secret_key = SecretKey::from_slice(&key_bytes)
            .map_err(|e| HyperliquidError::InvalidKey(e.to_string()))?;

        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        let address = public_key_to_address(&public_key);

        Ok(Self {
            secret_key,
            address,
            secp,
        })
    }

    /// Ethereum-style address derived from the private key.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign an exchange action: keccak-256 over the canonical JSON of
    /// `{action, nonce, vaultAddress}`, signed with recoverable secp256k1
    /// ECDSA (RFC 6979, deterministic). Returns `0x` + 65-byte r‖s‖v hex.
    pub fn sign_action(
        &self,
        action: &Action,
        nonce: u64,
        vault_address: Option<&str>,
    ) -> Result<String, HyperliquidError> {
        let payload = SignPayload {
            action,
            nonce,
            vault_address,
        };
        let message = serde_json::to_string(&payload)?;

        let mut hasher = Keccak256::new();
        hasher.update(message.as_bytes());
        let hash = hasher.finalize();

        let message = Message::from_digest_slice(&hash)
            .map_err(|e| HyperliquidError::Signature(e.to_string()))?;
        let signature = self
            .secp
            .sign_ecdsa_recoverable(&message, &self.secret_key);

        let (recovery_id, compact) = signature.serialize_compact();
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&compact);
        bytes[64] = 27 + recovery_id.to_i32() as u8;

        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

fn public_key_to_address(public_key: &PublicKey) -> String {
    let uncompressed = public_key.serialize_uncompressed();

    // Skip the 0x04 prefix, hash the raw point, keep the last 20 bytes.
    let mut hasher = Keccak256::new();
    hasher.update(&uncompressed[1..]);
    let hash = hasher.finalize();

    format!("0x{}", hex::encode(&hash[12..]))
}
