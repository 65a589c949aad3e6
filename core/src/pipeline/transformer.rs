use crossbeam::channel::{Receiver, Sender};
use tracing::warn;

use crate::config::Config;
use crate::keys::KeyBackend;
use crate::types::RunError;

use super::{KeyRecord, RawToken};

/// Encrypting transformer: a single sequential worker turning raw tokens
/// into encrypted records, in input order.
pub struct EncryptWorker<B> {
    backend: B,
    passphrase: String,
}

impl<B: KeyBackend> EncryptWorker<B> {
    pub fn new(config: &Config, backend: B) -> Self {
        Self {
            backend,
            passphrase: config.passphrase.clone(),
        }
    }

    /// Run loop: take the next token, transform it, emit one record.
    ///
    /// A token that fails to parse is isolated: a diagnostic goes to the
    /// log stream, the token is dropped, the loop continues. A generation
    /// failure means the randomness source is gone and ends the whole run.
    pub fn run(self, rx: Receiver<RawToken>, tx: Sender<KeyRecord>) -> Result<(), RunError> {
        while let Ok(token) = rx.recv() {
            let private = if token.is_empty() {
                self.backend.generate()?
            } else {
                match self.backend.parse_private(&token) {
                    Ok(key) => key,
                    Err(err) => {
                        warn!(token = %token, "discarding private key: {err}");
                        continue;
                    }
                }
            };
            let bip38 = self.backend.encrypt(&private, &self.passphrase);
            if tx.send(KeyRecord { private, bip38 }).is_err() {
                break; // receiver gone, nothing left to feed
            }
        }
        Ok(())
    }
}

/// Decrypting transformer, same loop shape as [`EncryptWorker`].
pub struct DecryptWorker<B> {
    backend: B,
    passphrase: String,
}

impl<B: KeyBackend> DecryptWorker<B> {
    pub fn new(config: &Config, backend: B) -> Self {
        Self {
            backend,
            passphrase: config.passphrase.clone(),
        }
    }

    /// Run loop: parse, decrypt, emit; both failure points are isolated to
    /// the offending token.
    pub fn run(self, rx: Receiver<RawToken>, tx: Sender<KeyRecord>) -> Result<(), RunError> {
        while let Ok(token) = rx.recv() {
            let bip38 = match self.backend.parse_encrypted(&token) {
                Ok(key) => key,
                Err(err) => {
                    warn!(token = %token, "discarding encrypted key: {err}");
                    continue;
                }
            };
            let private = match self.backend.decrypt(&bip38, &self.passphrase) {
                Ok(key) => key,
                Err(err) => {
                    warn!(token = %token, "cannot decrypt: {err}");
                    continue;
                }
            };
            if tx.send(KeyRecord { private, bip38 }).is_err() {
                break; // receiver gone, nothing left to feed
            }
        }
        Ok(())
    }
}
