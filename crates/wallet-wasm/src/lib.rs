//! WebAssembly bindings for Bitcoin wallet generation.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Generating wallets from a configuration object
//! - Reading keys and derived addresses
//! - Validating addresses
//! - Generation statistics

use wasm_bindgen::prelude::*;

pub mod generator;
pub mod state;

// Re-export main types for JS access
pub use generator::{Wallet, WalletGenerator};

/// Initialize the WASM module with better panic messages and run the
/// crypto provider self-test.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if let Err(e) = wallet_core::CryptoProvider::initialize() {
        generator::console_log(&format!("Crypto provider unavailable: {}", e));
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
