//! Key material: secp256k1 private keys, their derived identities, and the
//! BIP38 passphrase-protected encoding.

pub mod backend;
pub mod bip38;
pub mod private;
pub mod types;

pub use backend::{KeyBackend, Secp256k1Backend};
pub use bip38::Bip38Key;
pub use private::{Address, PrivateKey, PublicKey};
pub use types::{Bip38Error, KeyError};
