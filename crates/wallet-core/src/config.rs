//! Generator configuration.
//!
//! Every field is optional in the serialized form; an empty JSON object
//! yields a mainnet generator supporting all address types.

use serde::{Deserialize, Serialize};

use crate::address::AddressType;
use crate::error::ConfigError;
use crate::keys::DEFAULT_MAX_KEY_ATTEMPTS;
use crate::network::Network;
use crate::notify::Recipient;

/// Settings shared by everything that generates wallets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub network: Network,
    /// Address types each generated wallet supports, in priority order.
    pub address_types: Vec<AddressType>,
    /// Retry cap for key pairs whose components cannot be normalized.
    pub max_key_attempts: u32,
    /// Notifier names resolved through [`crate::notify::load_notifiers`].
    pub notifiers: Vec<String>,
    pub recipient: Option<Recipient>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            network: Network::Mainnet,
            address_types: AddressType::ALL.to_vec(),
            max_key_attempts: DEFAULT_MAX_KEY_ATTEMPTS,
            notifiers: vec!["stdout".to_string()],
            recipient: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address_types.is_empty() {
            return Err(ConfigError::NoAddressTypes);
        }

        for (i, address_type) in self.address_types.iter().enumerate() {
            if self.address_types[..i].contains(address_type) {
                return Err(ConfigError::DuplicateAddressType(*address_type));
            }
        }

        if self.max_key_attempts == 0 {
            return Err(ConfigError::ZeroKeyAttempts);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();

        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.address_types, AddressType::ALL.to_vec());
        assert_eq!(config.max_key_attempts, 16);
        assert_eq!(config.notifiers, vec!["stdout"]);
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "network": "testnet",
            "address_types": ["bech32", "p2pkh"],
            "max_key_attempts": 4,
            "notifiers": ["log"],
            "recipient": { "email": "ops@example.com" }
        }"#;
        let config = GeneratorConfig::from_json(json).unwrap();

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.address_types, vec![AddressType::NativeSegWit, AddressType::Legacy]);
        assert_eq!(config.max_key_attempts, 4);
        assert_eq!(config.notifiers, vec!["log"]);
        assert!(config.recipient.unwrap().is_defined());
    }

    #[test]
    fn test_rejects_empty_address_types() {
        let result = GeneratorConfig::from_json(r#"{ "address_types": [] }"#);
        assert!(matches!(result, Err(ConfigError::NoAddressTypes)));
    }

    #[test]
    fn test_rejects_duplicate_address_types() {
        let result = GeneratorConfig::from_json(r#"{ "address_types": ["p2wpkh", "bech32"] }"#);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateAddressType(AddressType::NativeSegWit))
        ));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let result = GeneratorConfig::from_json(r#"{ "max_key_attempts": 0 }"#);
        assert!(matches!(result, Err(ConfigError::ZeroKeyAttempts)));
    }

    #[test]
    fn test_rejects_unknown_address_type() {
        let result = GeneratorConfig::from_json(r#"{ "address_types": ["p2tr"] }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GeneratorConfig {
            network: Network::Testnet,
            ..GeneratorConfig::default()
        };
        let json = config.to_json().unwrap();

        assert!(json.contains("\"p2sh-p2wpkh\""));
        assert_eq!(GeneratorConfig::from_json(&json).unwrap(), config);
    }
}
