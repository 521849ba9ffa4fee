//! Bitcoin key generation and address derivation.
//!
//! This crate provides pure Rust implementations of:
//! - Base58 / Base58Check and Bech32 (BIP-173) encoding
//! - secp256k1 key pair generation with key normalization and bounded retry
//! - P2PKH, P2SH-P2WPKH and P2WPKH address derivation and parsing
//! - A wallet value object with lazily derived, cached addresses
//! - Address book lookup and notification hooks for found wallets

pub mod address;
pub mod base58;
pub mod bech32;
pub mod bits;
pub mod config;
pub mod error;
pub mod hash;
pub mod keys;
pub mod lookup;
pub mod network;
pub mod notify;
pub mod wallet;

pub use address::{derive_address, parse_address, AddressType, ParsedAddress};
pub use config::GeneratorConfig;
pub use error::{
    AddressError, ConfigError, CryptoError, EncodingError, KeyMaterialError, NotifyError, WalletError, WalletResult,
};
pub use hash::{double_sha256, hash160};
pub use keys::{CryptoProvider, KeyPair, KeyPairSource, RawKeyPair, DEFAULT_MAX_KEY_ATTEMPTS};
pub use lookup::{matching_wallets, AddressBook, InMemoryAddressBook, LookupError};
pub use network::Network;
pub use notify::{load_notifiers, Message, Notifier, Recipient};
pub use wallet::BitcoinWallet;
