//! Checking generated wallets against a set of known addresses.

use std::collections::HashSet;
use std::convert::Infallible;

use thiserror::Error;

use crate::error::WalletError;
use crate::wallet::BitcoinWallet;

/// A store of addresses that are known to hold funds.
pub trait AddressBook {
    type Error: std::error::Error + 'static;

    /// Return the subset of `addresses` present in the book.
    fn find_known(&self, addresses: &[&str]) -> Result<Vec<String>, Self::Error>;
}

/// An [`AddressBook`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressBook {
    addresses: HashSet<String>,
}

impl InMemoryAddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: impl Into<String>) -> bool {
        self.addresses.insert(address.into())
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for InMemoryAddressBook {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        InMemoryAddressBook {
            addresses: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl AddressBook for InMemoryAddressBook {
    type Error = Infallible;

    fn find_known(&self, addresses: &[&str]) -> Result<Vec<String>, Self::Error> {
        Ok(addresses
            .iter()
            .filter(|a| self.addresses.contains(**a))
            .map(|a| a.to_string())
            .collect())
    }
}

#[derive(Debug, Error)]
pub enum LookupError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Address book lookup failed: {0}")]
    Store(#[source] E),
}

/// Wallets with at least one supported address present in `book`.
///
/// Every supported address of every wallet is checked in a single
/// `find_known` call.
pub fn matching_wallets<'w, B: AddressBook>(
    book: &B,
    wallets: &'w [BitcoinWallet],
) -> Result<Vec<&'w BitcoinWallet>, LookupError<B::Error>> {
    let mut candidates = Vec::new();
    for wallet in wallets {
        for (_, address) in wallet.addresses()? {
            candidates.push(address);
        }
    }

    let known: HashSet<String> = book
        .find_known(&candidates)
        .map_err(LookupError::Store)?
        .into_iter()
        .collect();

    let mut matches = Vec::new();
    for wallet in wallets {
        let addresses = wallet.addresses()?;
        if addresses.iter().any(|(_, address)| known.contains(*address)) {
            matches.push(wallet);
        }
    }

    Ok(matches)
}
