//! Notifications about discovered wallets.
//!
//! Notifiers are looked up by name in a static registry. Delivery failures
//! are logged and never abort the caller.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{NotifyError, WalletResult};
use crate::wallet::BitcoinWallet;

/// Notifier used when no names are configured.
pub const DEFAULT_NOTIFIER: &str = "stdout";

/// A notification subject with an optional body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub subject: String,
    pub body: Option<String>,
}

impl Message {
    pub fn new(subject: impl Into<String>, body: Option<String>) -> Self {
        Message {
            subject: subject.into(),
            body,
        }
    }

    /// Announce wallets found in an address book.
    ///
    /// Only addresses are listed. Private keys never leave the wallet.
    pub fn wallets_found<'a, I>(wallets: I) -> WalletResult<Self>
    where
        I: IntoIterator<Item = &'a BitcoinWallet>,
    {
        let mut count = 0;
        let mut lines = Vec::new();
        for wallet in wallets {
            count += 1;
            for (address_type, address) in wallet.addresses()? {
                lines.push(format!("{} {}", address_type, address));
            }
        }

        Ok(Message {
            subject: format!("Found {} wallet(s)", count),
            body: Some(lines.join("\n")),
        })
    }

    /// Single-line rendering used by the built-in notifiers.
    pub fn render(&self) -> String {
        match &self.body {
            Some(body) => format!("{} - {}", self.subject, body),
            None => self.subject.clone(),
        }
    }
}

/// Contact details for whoever receives notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub other: Option<String>,
}

impl Recipient {
    /// Whether any way of reaching the recipient is present.
    pub fn is_defined(&self) -> bool {
        self.email.is_some() || self.phone_number.is_some() || self.other.is_some()
    }
}

/// A delivery channel for [`Message`]s.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn send(&self, message: &Message, recipient: Option<&Recipient>) -> Result<(), NotifyError>;
}

/// Prints messages to standard output.
#[derive(Debug, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn name(&self) -> &'static str {
        "stdout"
    }

    fn send(&self, message: &Message, _recipient: Option<&Recipient>) -> Result<(), NotifyError> {
        check_message(message)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "Notification: {}", message.render())?;
        Ok(())
    }
}

/// Emits messages as `tracing` events.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn send(&self, message: &Message, recipient: Option<&Recipient>) -> Result<(), NotifyError> {
        check_message(message)?;
        let to = recipient.and_then(|r| r.name.as_deref()).unwrap_or("-");
        info!(subject = %message.subject, recipient = to, "{}", message.render());
        Ok(())
    }
}

fn check_message(message: &Message) -> Result<(), NotifyError> {
    if message.subject.trim().is_empty() {
        return Err(NotifyError::EmptyMessage);
    }
    Ok(())
}

type NotifierFactory = fn() -> Box<dyn Notifier>;

fn stdout_notifier() -> Box<dyn Notifier> {
    Box::new(StdoutNotifier)
}

fn log_notifier() -> Box<dyn Notifier> {
    Box::new(LogNotifier)
}

static REGISTRY: &[(&str, NotifierFactory)] = &[("stdout", stdout_notifier), ("log", log_notifier)];

/// Names of every registered notifier.
pub fn registered_notifiers() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Instantiate the notifier registered under `name`.
pub fn create_notifier(name: &str) -> Result<Box<dyn Notifier>, NotifyError> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, factory)| factory())
        .ok_or_else(|| NotifyError::UnknownNotifier(name.to_string()))
}

/// Instantiate every named notifier, falling back to stdout when `names`
/// is empty.
pub fn load_notifiers<S: AsRef<str>>(names: &[S]) -> Result<Vec<Box<dyn Notifier>>, NotifyError> {
    if names.is_empty() {
        info!("No notifiers configured, using {}", DEFAULT_NOTIFIER);
        return Ok(vec![create_notifier(DEFAULT_NOTIFIER)?]);
    }

    names.iter().map(|name| create_notifier(name.as_ref())).collect()
}

/// Send `message` through every notifier, returning how many succeeded.
pub fn notify_all(
    notifiers: &[Box<dyn Notifier>],
    message: &Message,
    recipient: Option<&Recipient>,
) -> usize {
    let mut delivered = 0;
    for notifier in notifiers {
        match notifier.send(message, recipient) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(notifier = notifier.name(), error = %e, "Notification failed"),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressType;
    use crate::keys::KeyPair;
    use crate::network::Network;

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn send(&self, _message: &Message, _recipient: Option<&Recipient>) -> Result<(), NotifyError> {
            Err(NotifyError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed")))
        }
    }

    #[test]
    fn test_recipient_is_defined() {
        assert!(!Recipient::default().is_defined());

        let named_only = Recipient {
            name: Some("Alice".into()),
            ..Recipient::default()
        };
        assert!(!named_only.is_defined());

        let with_phone = Recipient {
            phone_number: Some("+1 555 0100".into()),
            ..Recipient::default()
        };
        assert!(with_phone.is_defined());
    }

    #[test]
    fn test_load_defaults_to_stdout() {
        let notifiers = load_notifiers::<&str>(&[]).unwrap();
        assert_eq!(notifiers.len(), 1);
        assert_eq!(notifiers[0].name(), "stdout");
    }

    #[test]
    fn test_load_named_notifiers() {
        let notifiers = load_notifiers(&["log", "stdout"]).unwrap();
        let names: Vec<_> = notifiers.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["log", "stdout"]);
    }

    #[test]
    fn test_unknown_notifier() {
        let err = load_notifiers(&["telegram"]).err().unwrap();
        assert!(matches!(err, NotifyError::UnknownNotifier(name) if name == "telegram"));
    }

    #[test]
    fn test_registry_names() {
        assert_eq!(registered_notifiers().collect::<Vec<_>>(), vec!["stdout", "log"]);
    }

    #[test]
    fn test_empty_subject_rejected() {
        let message = Message::new("  ", None);
        assert!(matches!(LogNotifier.send(&message, None), Err(NotifyError::EmptyMessage)));
    }

    #[test]
    fn test_wallets_found_lists_addresses_only() {
        let key_pair = KeyPair::from_secret_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
        ).unwrap();
        let wallet = BitcoinWallet::with_address_types(key_pair, Network::Mainnet, &[AddressType::NativeSegWit]);

        let message = Message::wallets_found(std::slice::from_ref(&wallet)).unwrap();

        assert_eq!(message.subject, "Found 1 wallet(s)");
        assert_eq!(
            message.body.as_deref(),
            Some("p2wpkh bc1qjxeyh7049zzn99s2c6r6hvp4zfa362997dpu0h")
        );
        assert!(!message.render().contains(&wallet.private_key()));
    }

    #[test]
    fn test_notify_all_survives_failures() {
        let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(FailingNotifier), Box::new(LogNotifier)];
        let message = Message::new("Found 0 wallet(s)", None);

        assert_eq!(notify_all(&notifiers, &message, None), 1);
    }

    #[test]
    fn test_render() {
        assert_eq!(Message::new("subject", None).render(), "subject");
        assert_eq!(Message::new("subject", Some("body".into())).render(), "subject - body");
    }
}
