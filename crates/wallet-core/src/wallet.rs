//! The Bitcoin wallet value object.

use std::sync::OnceLock;

use crate::address::{derive_address, AddressType};
use crate::config::GeneratorConfig;
use crate::error::{AddressError, WalletResult};
use crate::keys::{KeyPair, KeyPairSource, DEFAULT_MAX_KEY_ATTEMPTS};
use crate::network::Network;

/// A key pair with its lazily derived addresses.
///
/// Each address is computed on first request and cached for the lifetime of
/// the wallet. The cache is thread-safe, so a wallet can be shared across
/// threads by reference.
pub struct BitcoinWallet {
    key_pair: KeyPair,
    network: Network,
    supported: Vec<AddressType>,
    addresses: [OnceLock<String>; 3],
}

impl BitcoinWallet {
    /// Generate a mainnet wallet supporting every address type.
    pub fn generate<S: KeyPairSource + ?Sized>(source: &S) -> WalletResult<Self> {
        let key_pair = KeyPair::generate(source, DEFAULT_MAX_KEY_ATTEMPTS)?;
        Ok(BitcoinWallet::from_key_pair(key_pair, Network::Mainnet))
    }

    /// Generate a wallet configured by `config`.
    pub fn generate_with<S: KeyPairSource + ?Sized>(source: &S, config: &GeneratorConfig) -> WalletResult<Self> {
        let key_pair = KeyPair::generate(source, config.max_key_attempts)?;
        Ok(BitcoinWallet::with_address_types(key_pair, config.network, &config.address_types))
    }

    /// Wrap an existing key pair, supporting every address type.
    pub fn from_key_pair(key_pair: KeyPair, network: Network) -> Self {
        BitcoinWallet::with_address_types(key_pair, network, &AddressType::ALL)
    }

    /// Wrap an existing key pair, supporting only `address_types`.
    ///
    /// The given order is kept; later duplicates are dropped.
    pub fn with_address_types(key_pair: KeyPair, network: Network, address_types: &[AddressType]) -> Self {
        let mut supported = Vec::with_capacity(address_types.len());
        for &address_type in address_types {
            if !supported.contains(&address_type) {
                supported.push(address_type);
            }
        }

        BitcoinWallet {
            key_pair,
            network,
            supported,
            addresses: Default::default(),
        }
    }

    /// The address of `address_type`, derived on first use.
    pub fn address(&self, address_type: AddressType) -> WalletResult<&str> {
        if !self.supports(address_type) {
            return Err(AddressError::NotSupportedByWallet(address_type).into());
        }

        let slot = &self.addresses[address_type.index()];
        if let Some(address) = slot.get() {
            return Ok(address.as_str());
        }

        let derived = derive_address(address_type, self.key_pair.public_key_bytes(), self.network)?;
        // A concurrent caller may have won; both derived the same string
        Ok(slot.get_or_init(|| derived).as_str())
    }

    /// The address for the first supported type.
    pub fn primary_address(&self) -> WalletResult<&str> {
        let address_type = self
            .supported
            .first()
            .copied()
            .ok_or_else(|| AddressError::UnsupportedAddressType("none configured".into()))?;
        self.address(address_type)
    }

    /// Every supported address, in configured order.
    pub fn addresses(&self) -> WalletResult<Vec<(AddressType, &str)>> {
        self.supported
            .iter()
            .map(|&t| self.address(t).map(|a| (t, a)))
            .collect()
    }

    /// Uncompressed public key as 130 hex characters.
    pub fn public_key(&self) -> String {
        self.key_pair.public_key_hex()
    }

    /// Secret scalar as 64 hex characters.
    pub fn private_key(&self) -> String {
        self.key_pair.private_key_hex()
    }

    pub fn supported_address_types(&self) -> &[AddressType] {
        &self.supported
    }

    pub fn supports(&self, address_type: AddressType) -> bool {
        self.supported.contains(&address_type)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }
}

impl PartialEq for BitcoinWallet {
    fn eq(&self, other: &Self) -> bool {
        self.key_pair == other.key_pair
            && self.network == other.network
            && self.supported == other.supported
    }
}

impl Eq for BitcoinWallet {}

impl core::fmt::Debug for BitcoinWallet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let cached: Vec<&str> = self.addresses.iter().filter_map(|slot| slot.get().map(String::as_str)).collect();
        f.debug_struct("BitcoinWallet")
            .field("network", &self.network)
            .field("supported", &self.supported)
            .field("cached_addresses", &cached)
            .field("key_pair", &self.key_pair)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;

    fn generator_wallet() -> BitcoinWallet {
        let key_pair = KeyPair::from_secret_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
        ).unwrap();
        BitcoinWallet::from_key_pair(key_pair, Network::Mainnet)
    }

    #[test]
    fn test_addresses_for_known_key() {
        let wallet = generator_wallet();

        assert_eq!(wallet.address(AddressType::Legacy).unwrap(), "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm");
        assert_eq!(wallet.address(AddressType::ScriptSegWit).unwrap(), "33q2i3GDkpHFAXnD3UdBsKhxzg7pvwAqtN");
        assert_eq!(wallet.address(AddressType::NativeSegWit).unwrap(), "bc1qjxeyh7049zzn99s2c6r6hvp4zfa362997dpu0h");
    }

    #[test]
    fn test_address_is_memoized() {
        let wallet = generator_wallet();

        let first = wallet.address(AddressType::NativeSegWit).unwrap();
        let second = wallet.address(AddressType::NativeSegWit).unwrap();

        assert_eq!(first, second);
        // Same cached allocation both times
        assert!(core::ptr::eq(first, second));
    }

    #[test]
    fn test_restricted_wallet_rejects_other_types() {
        let key_pair = generator_wallet().key_pair().clone();
        let wallet = BitcoinWallet::with_address_types(
            key_pair,
            Network::Mainnet,
            &[AddressType::NativeSegWit, AddressType::Legacy, AddressType::Legacy],
        );

        assert_eq!(wallet.supported_address_types(), &[AddressType::NativeSegWit, AddressType::Legacy]);
        assert_eq!(
            wallet.address(AddressType::ScriptSegWit),
            Err(WalletError::Address(AddressError::NotSupportedByWallet(AddressType::ScriptSegWit)))
        );
    }

    #[test]
    fn test_key_accessors() {
        let wallet = generator_wallet();

        assert_eq!(wallet.private_key(), format!("{}1", "0".repeat(63)));
        assert_eq!(wallet.public_key().len(), 130);
        assert!(wallet.public_key().starts_with("04"));
    }

    #[test]
    fn test_primary_address_is_first_supported() {
        let wallet = generator_wallet();
        assert_eq!(wallet.primary_address().unwrap(), "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm");
    }

    #[test]
    fn test_configured_order_sets_primary_address() {
        let config = GeneratorConfig::from_json(r#"{ "address_types": ["bech32", "p2pkh"] }"#).unwrap();
        let key_pair = generator_wallet().key_pair().clone();
        let wallet = BitcoinWallet::with_address_types(key_pair, config.network, &config.address_types);

        assert_eq!(wallet.supported_address_types(), config.address_types.as_slice());
        assert_eq!(wallet.primary_address().unwrap(), "bc1qjxeyh7049zzn99s2c6r6hvp4zfa362997dpu0h");

        let types: Vec<_> = wallet.addresses().unwrap().into_iter().map(|(t, _)| t).collect();
        assert_eq!(types, vec![AddressType::NativeSegWit, AddressType::Legacy]);
    }

    #[test]
    fn test_testnet_wallet() {
        let key_pair = generator_wallet().key_pair().clone();
        let wallet = BitcoinWallet::from_key_pair(key_pair, Network::Testnet);

        assert_eq!(wallet.address(AddressType::Legacy).unwrap(), "mtoKs9V381UAhUia3d7Vb9GNak8Qvmcsme");
        assert_eq!(wallet.address(AddressType::ScriptSegWit).unwrap(), "2MuPEmnCFNGnbNKQkicF4VGhED2Kzo8GTYh");
        assert_eq!(wallet.address(AddressType::NativeSegWit).unwrap(), "tb1qjxeyh7049zzn99s2c6r6hvp4zfa362995t605y");
    }

    #[test]
    fn test_debug_hides_private_key() {
        let wallet = generator_wallet();
        let debug = format!("{:?}", wallet);

        assert!(!debug.contains(&wallet.private_key()));
    }
}
