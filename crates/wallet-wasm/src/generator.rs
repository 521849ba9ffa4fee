//! Wallet generation controller for the browser.

use core::fmt::Display;

use wasm_bindgen::prelude::*;
use wallet_core::{parse_address, AddressType, BitcoinWallet, CryptoProvider, GeneratorConfig, Network};

use crate::state::{GenerationStats, WalletInfo};

fn js_error(context: &str, e: impl Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn parse_network(network: &str) -> Result<Network, JsValue> {
    Network::from_str(network).ok_or_else(|| JsValue::from_str("Invalid network"))
}

/// Generates wallets according to a configuration object.
#[wasm_bindgen]
pub struct WalletGenerator {
    config: GeneratorConfig,
    provider: CryptoProvider,
    stats: GenerationStats,
}

#[wasm_bindgen]
impl WalletGenerator {
    /// Create a generator.
    ///
    /// # Arguments
    /// * `config` - A configuration object such as
    ///   `{ network: "testnet", address_types: ["p2wpkh"] }`, or `undefined`
    ///   for mainnet with every address type
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WalletGenerator, JsValue> {
        let config: GeneratorConfig = if config.is_undefined() || config.is_null() {
            GeneratorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| js_error("Invalid config", e))?
        };
        config.validate().map_err(|e| js_error("Invalid config", e))?;

        let provider = CryptoProvider::initialize().map_err(|e| js_error("Crypto provider", e))?;

        Ok(WalletGenerator {
            config,
            provider,
            stats: GenerationStats::new(),
        })
    }

    /// Generate a single wallet.
    #[wasm_bindgen]
    pub fn generate(&mut self) -> Result<Wallet, JsValue> {
        let start = js_sys::Date::now();
        let wallet = self.generate_one()?;
        self.stats.record_batch(1, js_sys::Date::now() - start);
        Ok(wallet)
    }

    /// Generate `count` wallets, returned as an array of `Wallet`.
    #[wasm_bindgen]
    pub fn generate_batch(&mut self, count: u32) -> Result<js_sys::Array, JsValue> {
        let start = js_sys::Date::now();
        let wallets = js_sys::Array::new();
        for _ in 0..count {
            wallets.push(&JsValue::from(self.generate_one()?));
        }
        self.stats.record_batch(u64::from(count), js_sys::Date::now() - start);
        Ok(wallets)
    }

    /// Get generation statistics.
    #[wasm_bindgen]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        self.stats.to_js()
    }

    /// Get the formatted generation rate.
    #[wasm_bindgen]
    pub fn get_rate_display(&self) -> String {
        self.stats.format_rate()
    }

    /// Get the configured network.
    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.config.network.name().to_string()
    }

    fn generate_one(&self) -> Result<Wallet, JsValue> {
        BitcoinWallet::generate_with(&self.provider, &self.config)
            .map(|inner| Wallet { inner })
            .map_err(|e| js_error("Wallet generation failed", e))
    }
}

/// A generated wallet.
#[wasm_bindgen]
pub struct Wallet {
    inner: BitcoinWallet,
}

#[wasm_bindgen]
impl Wallet {
    /// Get the address of the given type (`p2pkh`, `p2sh-p2wpkh`, `p2wpkh`
    /// or their aliases `legacy`, `segwit`, `bech32`).
    #[wasm_bindgen]
    pub fn address(&self, address_type: &str) -> Result<String, JsValue> {
        let address_type: AddressType = address_type.parse().map_err(|e| js_error("Invalid address type", e))?;
        self.inner
            .address(address_type)
            .map(str::to_string)
            .map_err(|e| js_error("Address derivation failed", e))
    }

    #[wasm_bindgen(getter)]
    pub fn public_key(&self) -> String {
        self.inner.public_key()
    }

    #[wasm_bindgen(getter)]
    pub fn private_key(&self) -> String {
        self.inner.private_key()
    }

    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.inner.network().name().to_string()
    }

    #[wasm_bindgen]
    pub fn supported_address_types(&self) -> Vec<String> {
        self.inner
            .supported_address_types()
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    /// Convert to a plain object with the public key and every address.
    #[wasm_bindgen]
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        WalletInfo::from_wallet(&self.inner)
            .map_err(|e| js_error("Address derivation failed", e))?
            .to_js()
    }
}

/// Validate a Bitcoin address for the given network.
#[wasm_bindgen]
pub fn validate_address(address: &str, network: &str) -> Result<bool, JsValue> {
    let net = parse_network(network)?;

    match parse_address(address, net) {
        Ok(_) => Ok(true),
        Err(e) => Err(JsValue::from_str(&format!("{}", e))),
    }
}

/// Log to the browser console.
#[wasm_bindgen]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}
