use thiserror::Error;

/// Secret scalar length in bytes.
pub const SECRET_LEN: usize = 32;

/// Version byte prefixing a mainnet WIF payload.
pub const WIF_VERSION: u8 = 0x80;

/// Trailing WIF byte marking a compressed public key.
pub const WIF_COMPRESSED_SUFFIX: u8 = 0x01;

/// Version byte prefixing a mainnet pay-to-pubkey-hash address.
pub const ADDRESS_VERSION: u8 = 0x00;

/// Decoded length of a BIP38 payload.
pub const BIP38_LEN: usize = 39;

/// Leading bytes of a non-EC-multiply BIP38 payload.
pub const BIP38_PREFIX: [u8; 2] = [0x01, 0x42];

/// Flagbyte bits always set in the non-EC-multiply format.
pub const FLAG_NON_EC: u8 = 0xc0;

/// Flagbyte bit carrying the compression state of the original key.
pub const FLAG_COMPRESSED: u8 = 0x20;

/// Length of the address-hash salt embedded in a BIP38 payload.
pub const SALT_LEN: usize = 4;

/// Private key generation and parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Input is neither 64 hex digits nor a well-formed WIF string.
    #[error("unrecognized private key format")]
    IncorrectFormat,

    /// Scalar bytes rejected by the curve (zero or not below the group order).
    #[error("invalid secret scalar")]
    InvalidScalar,

    /// Operating system randomness failure.
    #[error("random generator failure: {0}")]
    Rng(String),
}

/// Encrypted key parsing and decryption errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Bip38Error {
    /// Base58 checksum mismatch, bad length, or unknown payload layout.
    #[error("invalid checksum or format")]
    InvalidChecksumOrFormat,

    /// The passphrase and payload do not agree; the two causes are
    /// indistinguishable to the caller.
    #[error("wrong passphrase or corrupt data")]
    WrongPassphrase,
}
