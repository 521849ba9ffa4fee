//! Bitcoin address derivation and validation.
//!
//! Supports:
//! - P2PKH (Pay to Public Key Hash) - Legacy addresses starting with 1 (mainnet) or m/n (testnet)
//! - P2SH-P2WPKH (SegWit key hash wrapped in P2SH) - Addresses starting with 3 (mainnet) or 2 (testnet)
//! - P2WPKH (Pay to Witness Public Key Hash) - Native SegWit v0, bc1q.../tb1q...
//!
//! Every derivation starts from the 65-byte uncompressed public key and its
//! HASH160. The result is a pure function of the key and the network.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base58;
use crate::bech32;
use crate::bits::convert_bits;
use crate::error::{AddressError, EncodingError};
use crate::hash::hash160;
use crate::network::Network;

/// Witness version carried by P2WPKH outputs.
pub const WITNESS_VERSION_0: u8 = 0x00;

/// Push opcode for a 20-byte witness program.
const PUSH_20: u8 = 0x14;

/// Length of a HASH160 digest.
pub const HASH160_LEN: usize = 20;

/// Bitcoin address type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressType {
    /// Legacy P2PKH: Base58Check(0x00 ‖ HASH160(pubkey))
    #[serde(rename = "p2pkh", alias = "legacy")]
    Legacy,
    /// P2SH-P2WPKH: Base58Check(0x05 ‖ HASH160(0x00 0x14 ‖ HASH160(pubkey)))
    #[serde(rename = "p2sh-p2wpkh", alias = "segwit")]
    ScriptSegWit,
    /// Native SegWit v0 P2WPKH: Bech32("bc", 0 ‖ HASH160(pubkey))
    #[serde(rename = "p2wpkh", alias = "bech32")]
    NativeSegWit,
}

impl AddressType {
    /// Every supported address type, in canonical order.
    pub const ALL: [AddressType; 3] = [
        AddressType::Legacy,
        AddressType::ScriptSegWit,
        AddressType::NativeSegWit,
    ];

    /// Get the display name for this address type.
    pub fn name(&self) -> &'static str {
        match self {
            AddressType::Legacy => "p2pkh",
            AddressType::ScriptSegWit => "p2sh-p2wpkh",
            AddressType::NativeSegWit => "p2wpkh",
        }
    }

    /// Position of this type in [`AddressType::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AddressType::Legacy => 0,
            AddressType::ScriptSegWit => 1,
            AddressType::NativeSegWit => 2,
        }
    }
}

impl core::fmt::Display for AddressType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AddressType {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p2pkh" | "legacy" => Ok(AddressType::Legacy),
            "p2sh-p2wpkh" | "p2sh" | "segwit" => Ok(AddressType::ScriptSegWit),
            "p2wpkh" | "bech32" | "native-segwit" => Ok(AddressType::NativeSegWit),
            _ => Err(AddressError::UnsupportedAddressType(s.to_string())),
        }
    }
}

/// Derive the address of `address_type` for an uncompressed public key.
pub fn derive_address(
    address_type: AddressType,
    public_key: &[u8],
    network: Network,
) -> Result<String, EncodingError> {
    address_from_pubkey_hash(address_type, &hash160(public_key), network)
}

/// Build the address of `address_type` from a 20-byte public key hash.
pub fn address_from_pubkey_hash(
    address_type: AddressType,
    pubkey_hash: &[u8; HASH160_LEN],
    network: Network,
) -> Result<String, EncodingError> {
    match address_type {
        AddressType::Legacy => Ok(base58_address(network.p2pkh_version(), pubkey_hash)),
        AddressType::ScriptSegWit => {
            let script_hash = hash160(&p2wpkh_redeem_script(pubkey_hash));
            Ok(base58_address(network.p2sh_version(), &script_hash))
        }
        AddressType::NativeSegWit => {
            let mut data = Vec::with_capacity(33);
            data.push(WITNESS_VERSION_0);
            data.extend(convert_bits(pubkey_hash, 8, 5, true)?);
            bech32::encode(network.bech32_hrp(), &data)
        }
    }
}

/// P2WPKH redeem script: OP_0 <20-byte-hash>
pub fn p2wpkh_redeem_script(pubkey_hash: &[u8; HASH160_LEN]) -> [u8; 22] {
    let mut script = [0u8; 22];
    script[0] = WITNESS_VERSION_0;
    script[1] = PUSH_20;
    script[2..].copy_from_slice(pubkey_hash);
    script
}

/// Version byte ‖ hash, Base58Check encoded.
fn base58_address(version: u8, hash: &[u8; HASH160_LEN]) -> String {
    let mut payload = [0u8; HASH160_LEN + 1];
    payload[0] = version;
    payload[1..].copy_from_slice(hash);
    base58::encode_check(&payload)
}

/// A parsed Bitcoin address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    /// The type of address.
    pub address_type: AddressType,
    /// The network this address belongs to.
    pub network: Network,
    /// Public key hash (Legacy, NativeSegWit) or redeem script hash (ScriptSegWit).
    pub hash: [u8; HASH160_LEN],
}

/// Parse a Bitcoin address and check it belongs to `expected_network`.
///
/// A P2SH address is reported as [`AddressType::ScriptSegWit`]; the redeem
/// script behind it cannot be recovered from the address alone.
pub fn parse_address(address: &str, expected_network: Network) -> Result<ParsedAddress, AddressError> {
    let trimmed = address.trim();
    let lower = trimmed.to_lowercase();

    let parsed = if lower.starts_with("bc1") || lower.starts_with("tb1") {
        parse_bech32_address(trimmed)?
    } else {
        parse_base58_address(trimmed)?
    };

    if parsed.network != expected_network {
        return Err(AddressError::NetworkMismatch {
            expected: expected_network.name().into(),
            got: parsed.network.name().into(),
        });
    }

    Ok(parsed)
}

fn parse_base58_address(address: &str) -> Result<ParsedAddress, AddressError> {
    let payload = base58::decode_check(address)?;

    if payload.len() != HASH160_LEN + 1 {
        return Err(AddressError::InvalidFormat);
    }

    let (address_type, network) = match payload[0] {
        0x00 => (AddressType::Legacy, Network::Mainnet),
        0x05 => (AddressType::ScriptSegWit, Network::Mainnet),
        0x6f => (AddressType::Legacy, Network::Testnet),
        0xc4 => (AddressType::ScriptSegWit, Network::Testnet),
        version => return Err(AddressError::UnknownVersion(version)),
    };

    let mut hash = [0u8; HASH160_LEN];
    hash.copy_from_slice(&payload[1..]);

    Ok(ParsedAddress { address_type, network, hash })
}

fn parse_bech32_address(address: &str) -> Result<ParsedAddress, AddressError> {
    let (hrp, data) = bech32::decode(address)?;

    let network = Network::from_bech32_hrp(&hrp).ok_or(AddressError::InvalidFormat)?;

    let (&witness_version, program_units) = data.split_first().ok_or(AddressError::InvalidFormat)?;
    if witness_version != WITNESS_VERSION_0 {
        return Err(AddressError::InvalidWitnessVersion(witness_version));
    }

    let program = convert_bits(program_units, 5, 8, false)?;
    if program.len() != HASH160_LEN {
        return Err(AddressError::InvalidWitnessProgramLength(program.len()));
    }

    let mut hash = [0u8; HASH160_LEN];
    hash.copy_from_slice(&program);

    Ok(ParsedAddress {
        address_type: AddressType::NativeSegWit,
        network,
        hash,
    })
}
