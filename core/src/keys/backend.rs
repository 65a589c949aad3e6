use super::bip38::Bip38Key;
use super::private::PrivateKey;
use super::types::{Bip38Error, KeyError};

/// Capability interface the transformer stages call into.
///
/// One implementation does real secp256k1 + BIP38 work; tests substitute a
/// deterministic fake so pipeline behavior (ordering, per-item isolation)
/// is observable without entropy or real key material. Identity derivation
/// is not part of the interface: it is a pure function of the key and lives
/// on [`PrivateKey`] itself.
pub trait KeyBackend {
    /// Generate a fresh random private key. Failure is fatal to the run.
    fn generate(&self) -> Result<PrivateKey, KeyError>;

    /// Parse hex or base58 text as a private key.
    fn parse_private(&self, text: &str) -> Result<PrivateKey, KeyError>;

    /// Encrypt a private key under a passphrase. Never fails.
    fn encrypt(&self, key: &PrivateKey, passphrase: &str) -> Bip38Key;

    /// Parse text as an encrypted key, validating the structural checksum.
    fn parse_encrypted(&self, text: &str) -> Result<Bip38Key, Bip38Error>;

    /// Recover the private key from an encrypted key.
    fn decrypt(&self, key: &Bip38Key, passphrase: &str) -> Result<PrivateKey, Bip38Error>;
}

/// Production backend over the real secp256k1/BIP38 implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Backend;

impl KeyBackend for Secp256k1Backend {
    fn generate(&self) -> Result<PrivateKey, KeyError> {
        PrivateKey::generate()
    }

    fn parse_private(&self, text: &str) -> Result<PrivateKey, KeyError> {
        PrivateKey::parse(text)
    }

    fn encrypt(&self, key: &PrivateKey, passphrase: &str) -> Bip38Key {
        Bip38Key::encrypt(key, passphrase)
    }

    fn parse_encrypted(&self, text: &str) -> Result<Bip38Key, Bip38Error> {
        Bip38Key::parse(text)
    }

    fn decrypt(&self, key: &Bip38Key, passphrase: &str) -> Result<PrivateKey, Bip38Error> {
        key.decrypt(passphrase)
    }
}
