//! Error types for codecs, key material, and wallet operations.

use thiserror::Error;

use crate::address::AddressType;

pub type WalletResult<T> = Result<T, WalletError>;

/// Top-level error surfaced by wallet operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Cryptography error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Invalid key material: {0}")]
    KeyMaterial(#[from] KeyMaterialError),

    #[error("Key generation gave up after {attempts} attempts")]
    KeyGenerationExhausted { attempts: u32 },
}

/// Codec contract violations.
///
/// These indicate an internal invariant breach (wrong bit width, corrupted
/// payload), never a recoverable condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Invalid Base58 character: {0}")]
    InvalidBase58Char(char),

    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Payload too short for a checksum: {0} bytes")]
    PayloadTooShort(usize),

    #[error("Invalid Bech32 encoding: {0}")]
    InvalidBech32(String),

    #[error("Value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: u8, bits: u8 },

    #[error("Invalid bit width: from {from_bits} to {to_bits}")]
    InvalidBitWidth { from_bits: u8, to_bits: u8 },

    #[error("Non-zero or excess padding in regrouped data")]
    InvalidPadding,
}

/// Address parsing and lookup failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address format")]
    InvalidFormat,

    #[error("Unknown version byte: {0:#04x}")]
    UnknownVersion(u8),

    #[error("Invalid witness version: {0}")]
    InvalidWitnessVersion(u8),

    #[error("Invalid witness program length: {0}")]
    InvalidWitnessProgramLength(usize),

    #[error("Address network mismatch: expected {expected}, got {got}")]
    NetworkMismatch { expected: String, got: String },

    #[error("Unsupported address type: {0}")]
    UnsupportedAddressType(String),

    #[error("Address type {0} is not supported by this wallet")]
    NotSupportedByWallet(AddressType),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Failures of the cryptographic primitives provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Crypto provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Crypto provider self-test failed: {0}")]
    SelfTestFailed(String),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),
}

/// A key component that cannot be normalized to 32 bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("Invalid key length: {hex_len} hex digits (expected one of 62, 63, 64)")]
    InvalidKeyLength { hex_len: usize },
}

/// Generator configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("At least one address type must be configured")]
    NoAddressTypes,

    #[error("Address type {0} is listed more than once")]
    DuplicateAddressType(AddressType),

    #[error("max_key_attempts must be at least 1")]
    ZeroKeyAttempts,
}

/// Notification delivery failures.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Unknown notifier: {0}")]
    UnknownNotifier(String),

    #[error("Refusing to send a message with an empty subject")]
    EmptyMessage,

    #[error("Notification I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
