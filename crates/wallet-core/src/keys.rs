//! secp256k1 key material: generation, normalization, and retry policy.
//!
//! A key source hands out its components at their natural length (a
//! big-endian integer without leading zero bytes). Each component is
//! normalized to exactly 32 bytes; a component whose hex form is shorter
//! than 62 digits is treated as a defective key and the pair is regenerated.

use std::sync::OnceLock;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use rand_core::{OsRng, RngCore};
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, KeyMaterialError, WalletError, WalletResult};

/// Default cap on key generation attempts.
pub const DEFAULT_MAX_KEY_ATTEMPTS: u32 = 16;

/// Length of a normalized key component in bytes.
pub const COMPONENT_LEN: usize = 32;

/// Length of an uncompressed SEC1 public key: `0x04 ‖ X ‖ Y`.
pub const PUBLIC_KEY_LEN: usize = 65;

/// Draws of random bytes before giving up on finding a valid scalar.
const MAX_SCALAR_DRAWS: usize = 8;

/// x coordinate of the secp256k1 generator point.
const GENERATOR_X: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// Raw output of a key generation primitive.
///
/// Components are big-endian with leading zero bytes stripped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RawKeyPair {
    pub private_scalar: Vec<u8>,
    pub public_x: Vec<u8>,
    pub public_y: Vec<u8>,
}

impl core::fmt::Debug for RawKeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawKeyPair")
            .field("private_scalar", &"<redacted>")
            .field("public_x", &hex::encode(&self.public_x))
            .field("public_y", &hex::encode(&self.public_y))
            .finish()
    }
}

/// A source of secp256k1 key pairs.
pub trait KeyPairSource {
    fn generate_key_pair(&self) -> Result<RawKeyPair, CryptoError>;
}

/// The secp256k1 primitives provider backed by `k256` and OS randomness.
///
/// Obtained through [`CryptoProvider::initialize`], which runs a self-test
/// once per process; later calls reuse the recorded outcome.
#[derive(Debug, Clone, Copy)]
pub struct CryptoProvider {
    _initialized: (),
}

static SELF_TEST: OnceLock<Result<(), CryptoError>> = OnceLock::new();

impl CryptoProvider {
    /// Initialize the provider, running the self-test on first use.
    pub fn initialize() -> Result<Self, CryptoError> {
        SELF_TEST
            .get_or_init(run_self_test)
            .clone()
            .map(|()| CryptoProvider { _initialized: () })
    }

    fn random_secret(&self) -> Result<SecretKey, CryptoError> {
        let mut bytes = Zeroizing::new([0u8; COMPONENT_LEN]);
        for _ in 0..MAX_SCALAR_DRAWS {
            OsRng
                .try_fill_bytes(&mut bytes[..])
                .map_err(|e| CryptoError::ProviderUnavailable(e.to_string()))?;

            // Zero or >= curve order is rejected; draw again
            if let Ok(secret) = SecretKey::from_slice(&bytes[..]) {
                return Ok(secret);
            }
        }
        Err(CryptoError::ProviderUnavailable(
            "random source produced no valid scalar".into(),
        ))
    }
}

impl KeyPairSource for CryptoProvider {
    fn generate_key_pair(&self) -> Result<RawKeyPair, CryptoError> {
        let secret = self.random_secret()?;
        let scalar = Zeroizing::new(secret.to_bytes());
        let point = secret.public_key().to_encoded_point(false);
        let (x, y) = split_uncompressed(point.as_bytes())?;

        Ok(RawKeyPair {
            private_scalar: strip_leading_zeros(&scalar),
            public_x: strip_leading_zeros(x),
            public_y: strip_leading_zeros(y),
        })
    }
}

fn run_self_test() -> Result<(), CryptoError> {
    let mut probe = [0u8; COMPONENT_LEN];
    OsRng
        .try_fill_bytes(&mut probe)
        .map_err(|e| CryptoError::ProviderUnavailable(e.to_string()))?;

    // 1·G must be the generator point
    let mut one = [0u8; COMPONENT_LEN];
    one[COMPONENT_LEN - 1] = 1;
    let secret = SecretKey::from_slice(&one)
        .map_err(|e| CryptoError::SelfTestFailed(e.to_string()))?;
    let point = secret.public_key().to_encoded_point(false);
    let (x, _) = split_uncompressed(point.as_bytes())?;

    if hex::encode(x) != GENERATOR_X {
        return Err(CryptoError::SelfTestFailed("generator point mismatch".into()));
    }

    info!(curve = "secp256k1", "crypto provider self-test passed");
    Ok(())
}

fn split_uncompressed(encoded: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    if encoded.len() != PUBLIC_KEY_LEN || encoded[0] != 0x04 {
        return Err(CryptoError::ProviderUnavailable(format!(
            "unexpected public key encoding of {} bytes",
            encoded.len()
        )));
    }
    Ok((&encoded[1..33], &encoded[33..65]))
}

fn strip_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

/// Hex form of a big-endian integer without leading zeros (`"0"` for zero).
pub fn natural_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    let trimmed = encoded.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Left-pad a 62, 63, or 64 digit hex string to 64 digits.
///
/// Any other length is an invalid key.
pub fn adjust_to_64(key: &str) -> Result<String, KeyMaterialError> {
    match key.len() {
        62 => Ok(format!("00{}", key)),
        63 => Ok(format!("0{}", key)),
        64 => Ok(key.to_string()),
        hex_len => Err(KeyMaterialError::InvalidKeyLength { hex_len }),
    }
}

fn normalize_component(bytes: &[u8]) -> Result<[u8; COMPONENT_LEN], KeyMaterialError> {
    let natural = Zeroizing::new(natural_hex(bytes));
    let adjusted = Zeroizing::new(adjust_to_64(&natural)?);

    let mut component = [0u8; COMPONENT_LEN];
    hex::decode_to_slice(adjusted.as_str(), &mut component)
        .map_err(|_| KeyMaterialError::InvalidKeyLength { hex_len: adjusted.len() })?;
    Ok(component)
}

/// A normalized secp256k1 key pair.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    private_key: [u8; COMPONENT_LEN],
    public_key: [u8; PUBLIC_KEY_LEN],
}

impl KeyPair {
    /// Generate a key pair from `source`, regenerating on defective key
    /// material up to `max_attempts` times.
    ///
    /// Provider failures are returned immediately and never retried.
    pub fn generate<S: KeyPairSource + ?Sized>(source: &S, max_attempts: u32) -> WalletResult<Self> {
        for attempt in 1..=max_attempts {
            let raw = source.generate_key_pair()?;
            match KeyPair::from_raw(&raw) {
                Ok(key_pair) => return Ok(key_pair),
                Err(KeyMaterialError::InvalidKeyLength { hex_len }) => {
                    debug!(attempt, hex_len, "regenerating key pair after invalid key material");
                }
            }
        }
        Err(WalletError::KeyGenerationExhausted { attempts: max_attempts })
    }

    /// Normalize raw components into fixed-width key material.
    pub fn from_raw(raw: &RawKeyPair) -> Result<Self, KeyMaterialError> {
        let private_key = normalize_component(&raw.private_scalar)?;
        let x = normalize_component(&raw.public_x)?;
        let y = normalize_component(&raw.public_y)?;

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key[0] = 0x04;
        public_key[1..33].copy_from_slice(&x);
        public_key[33..65].copy_from_slice(&y);

        Ok(KeyPair { private_key, public_key })
    }

    /// Build a key pair from a known 32-byte secret scalar.
    pub fn from_secret_bytes(secret: &[u8; COMPONENT_LEN]) -> Result<Self, CryptoError> {
        let secret_key = SecretKey::from_slice(secret)
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        let point = secret_key.public_key().to_encoded_point(false);

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(point.as_bytes());

        Ok(KeyPair { private_key: *secret, public_key })
    }

    /// Build a key pair from a 64-digit hex secret scalar.
    pub fn from_secret_hex(secret: &str) -> Result<Self, CryptoError> {
        let mut bytes = Zeroizing::new([0u8; COMPONENT_LEN]);
        hex::decode_to_slice(secret, &mut bytes[..])
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        KeyPair::from_secret_bytes(&bytes)
    }

    /// The 65-byte uncompressed public key.
    pub fn public_key_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public_key
    }

    /// The 32-byte big-endian secret scalar.
    pub fn private_key_bytes(&self) -> &[u8; COMPONENT_LEN] {
        &self.private_key
    }

    /// Uncompressed public key as 130 hex characters.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    /// Secret scalar as 64 hex characters.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key)
    }
}

impl core::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("private_key", &"<redacted>")
            .finish()
    }
}
