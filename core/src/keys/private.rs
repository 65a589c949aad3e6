use std::fmt;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use rand::rngs::OsRng;
use rand::RngCore;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::types::{KeyError, ADDRESS_VERSION, SECRET_LEN, WIF_COMPRESSED_SUFFIX, WIF_VERSION};

/// Secp256k1 private key plus its compression state.
///
/// The compression flag decides the SEC1 encoding of the derived public key
/// and the WIF suffix byte, and survives a BIP38 round trip.
#[derive(Clone)]
pub struct PrivateKey {
    secret: SecretKey,
    compressed: bool,
}

impl PrivateKey {
    /// Generate a fresh key from operating-system randomness.
    ///
    /// Any failure here reflects total compromise of the randomness source
    /// and is fatal to the enclosing run.
    pub fn generate() -> Result<Self, KeyError> {
        let mut raw = [0u8; SECRET_LEN];
        OsRng
            .try_fill_bytes(&mut raw)
            .map_err(|e| KeyError::Rng(e.to_string()))?;
        let key = Self::from_bytes(&raw, false)
            .map_err(|_| KeyError::Rng("scalar out of range".to_string()));
        raw.zeroize();
        key
    }

    /// Build a key from raw scalar bytes.
    pub fn from_bytes(raw: &[u8; SECRET_LEN], compressed: bool) -> Result<Self, KeyError> {
        let secret = SecretKey::from_slice(raw).map_err(|_| KeyError::InvalidScalar)?;
        Ok(Self { secret, compressed })
    }

    /// Parse hex or WIF text, auto-detected.
    ///
    /// 64 hex digits are taken as a raw scalar (uncompressed); everything
    /// else goes through the base58check WIF decoder.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        if text.len() == 2 * SECRET_LEN && text.bytes().all(|b| b.is_ascii_hexdigit()) {
            let mut raw = [0u8; SECRET_LEN];
            hex::decode_to_slice(text, &mut raw).map_err(|_| KeyError::IncorrectFormat)?;
            let key = Self::from_bytes(&raw, false);
            raw.zeroize();
            return key;
        }
        Self::parse_wif(text)
    }

    fn parse_wif(text: &str) -> Result<Self, KeyError> {
        let mut payload = bs58::decode(text)
            .with_check(None)
            .into_vec()
            .map_err(|_| KeyError::IncorrectFormat)?;
        let parsed = match payload.as_slice() {
            [WIF_VERSION, raw @ ..] if raw.len() == SECRET_LEN => Self::from_slice(raw, false),
            [WIF_VERSION, raw @ .., WIF_COMPRESSED_SUFFIX] if raw.len() == SECRET_LEN => {
                Self::from_slice(raw, true)
            }
            _ => Err(KeyError::IncorrectFormat),
        };
        payload.zeroize();
        parsed
    }

    fn from_slice(raw: &[u8], compressed: bool) -> Result<Self, KeyError> {
        let mut bytes = [0u8; SECRET_LEN];
        bytes.copy_from_slice(raw);
        let key = Self::from_bytes(&bytes, compressed);
        bytes.zeroize();
        key
    }

    /// Raw scalar bytes.
    pub fn to_bytes(&self) -> [u8; SECRET_LEN] {
        self.secret.to_bytes().into()
    }

    /// Wallet-import-format encoding (version 0x80, base58check).
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(2 + SECRET_LEN);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.to_bytes());
        if self.compressed {
            payload.push(WIF_COMPRESSED_SUFFIX);
        }
        let encoded = bs58::encode(&payload).with_check().into_string();
        payload.zeroize();
        encoded
    }

    /// SEC1 public key derived from the scalar; deterministic, never fails.
    pub fn public_key(&self) -> PublicKey {
        let point = self.secret.public_key().to_encoded_point(self.compressed);
        PublicKey(point.as_bytes().to_vec())
    }

    /// Pay-to-pubkey-hash address derived from the public key.
    pub fn address(&self) -> Address {
        let digest = hash160(self.public_key().to_bytes());
        let mut payload = Vec::with_capacity(1 + digest.len());
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&digest);
        Address(bs58::encode(payload).with_check().into_string())
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wif())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak the scalar through Debug formatting.
        f.debug_struct("PrivateKey")
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

/// SEC1-encoded public key bytes (33 compressed, 65 uncompressed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Base58check pay-to-pubkey-hash address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RIPEMD160(SHA256(data)), the identity hash behind addresses.
fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

/// Double SHA-256, used for BIP38 address-hash salts.
pub(crate) fn sha256d(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tag: u8) -> [u8; SECRET_LEN] {
        let mut bytes = [0u8; SECRET_LEN];
        bytes[0] = 0x7f;
        bytes[SECRET_LEN - 1] = tag;
        bytes
    }

    #[test]
    fn rejects_zero_scalar() {
        let err = PrivateKey::from_bytes(&[0u8; SECRET_LEN], false).unwrap_err();
        assert_eq!(err, KeyError::InvalidScalar);
    }

    #[test]
    fn wif_rejects_wrong_version_byte() {
        let mut payload = vec![0x81u8];
        payload.extend_from_slice(&raw(1));
        let text = bs58::encode(payload).with_check().into_string();
        assert_eq!(PrivateKey::parse(&text).unwrap_err(), KeyError::IncorrectFormat);
    }

    #[test]
    fn wif_rejects_truncated_payload() {
        let mut payload = vec![WIF_VERSION];
        payload.extend_from_slice(&raw(1)[..16]);
        let text = bs58::encode(payload).with_check().into_string();
        assert_eq!(PrivateKey::parse(&text).unwrap_err(), KeyError::IncorrectFormat);
    }

    #[test]
    fn public_key_length_tracks_compression() {
        let uncompressed = PrivateKey::from_bytes(&raw(2), false).unwrap();
        let compressed = PrivateKey::from_bytes(&raw(2), true).unwrap();
        assert_eq!(uncompressed.public_key().to_bytes().len(), 65);
        assert_eq!(compressed.public_key().to_bytes().len(), 33);
    }

    #[test]
    fn address_starts_with_mainnet_prefix() {
        let key = PrivateKey::from_bytes(&raw(3), false).unwrap();
        // Version byte 0x00 always encodes to a leading '1'.
        assert!(key.address().as_str().starts_with('1'));
    }
}
