//! Generator state exposed to JavaScript.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use wallet_core::{BitcoinWallet, WalletResult};

/// Wallet generation statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Total wallets generated.
    pub wallets_generated: u64,
    /// Number of `generate` / `generate_batch` calls.
    pub batches: u32,
    /// Time spent generating, in milliseconds.
    pub elapsed_ms: f64,
    /// Wallets per second over `elapsed_ms`.
    pub wallet_rate: f64,
}

impl GenerationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `count` wallets generated in `elapsed_ms`.
    pub fn record_batch(&mut self, count: u64, elapsed_ms: f64) {
        self.wallets_generated += count;
        self.batches += 1;
        self.elapsed_ms += elapsed_ms.max(0.0);
        if self.elapsed_ms > 0.0 {
            self.wallet_rate = (self.wallets_generated as f64) / (self.elapsed_ms / 1000.0);
        }
    }

    /// Format the generation rate for display.
    pub fn format_rate(&self) -> String {
        if self.wallet_rate >= 1_000.0 {
            format!("{:.2} K wallets/s", self.wallet_rate / 1_000.0)
        } else {
            format!("{:.2} wallets/s", self.wallet_rate)
        }
    }

    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

/// One derived address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    /// Address type name (`p2pkh`, `p2sh-p2wpkh`, `p2wpkh`).
    pub address_type: String,
    pub address: String,
}

/// Public view of a wallet. The private key is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub network: String,
    pub public_key: String,
    pub addresses: Vec<AddressInfo>,
}

impl WalletInfo {
    pub fn from_wallet(wallet: &BitcoinWallet) -> WalletResult<Self> {
        let addresses = wallet
            .addresses()?
            .into_iter()
            .map(|(address_type, address)| AddressInfo {
                address_type: address_type.name().to_string(),
                address: address.to_string(),
            })
            .collect();

        Ok(WalletInfo {
            network: wallet.network().name().to_string(),
            public_key: wallet.public_key(),
            addresses,
        })
    }

    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::{AddressType, KeyPair, Network};

    #[test]
    fn test_record_batch() {
        let mut stats = GenerationStats::new();
        stats.record_batch(100, 500.0);
        stats.record_batch(100, 500.0);

        assert_eq!(stats.wallets_generated, 200);
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.wallet_rate, 200.0);
        assert_eq!(stats.format_rate(), "200.00 wallets/s");
    }

    #[test]
    fn test_rate_without_elapsed_time() {
        let mut stats = GenerationStats::new();
        stats.record_batch(5, 0.0);

        assert_eq!(stats.wallet_rate, 0.0);
    }

    #[test]
    fn test_wallet_info_omits_private_key() {
        let key_pair = KeyPair::from_secret_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
        ).unwrap();
        let wallet = BitcoinWallet::with_address_types(
            key_pair,
            Network::Mainnet,
            &[AddressType::Legacy, AddressType::NativeSegWit],
        );

        let info = WalletInfo::from_wallet(&wallet).unwrap();

        assert_eq!(info.network, "mainnet");
        assert_eq!(
            info.addresses,
            vec![
                AddressInfo {
                    address_type: "p2pkh".into(),
                    address: "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm".into(),
                },
                AddressInfo {
                    address_type: "p2wpkh".into(),
                    address: "bc1qjxeyh7049zzn99s2c6r6hvp4zfa362997dpu0h".into(),
                },
            ]
        );
        assert!(!format!("{:?}", info).contains(&wallet.private_key()));
    }
}
