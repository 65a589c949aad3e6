use std::fmt;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use zeroize::Zeroize;

use super::private::{sha256d, PrivateKey};
use super::types::{
    Bip38Error, BIP38_LEN, BIP38_PREFIX, FLAG_COMPRESSED, FLAG_NON_EC, SALT_LEN, SECRET_LEN,
};

// Scrypt cost parameters fixed by the BIP38 format.
const SCRYPT_LOG_N: u8 = 14; // N = 16384
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 8;
const SCRYPT_DKLEN: usize = 64;

// Payload offsets: prefix(2) flag(1) salt(4) half1(16) half2(16).
const FLAG_OFFSET: usize = 2;
const SALT_OFFSET: usize = 3;
const DATA_OFFSET: usize = SALT_OFFSET + SALT_LEN;
const HALF_LEN: usize = 16;

/// Passphrase-protected private key in the non-EC-multiply BIP38 layout.
///
/// Holds the full decoded payload; the textual form is the base58check
/// encoding of those bytes ("6P…").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bip38Key {
    payload: [u8; BIP38_LEN],
}

impl Bip38Key {
    /// Encrypt a private key under a passphrase.
    ///
    /// The first four bytes of SHA256d(address) both salt the derivation
    /// and let decryption verify the passphrase afterwards.
    pub fn encrypt(key: &PrivateKey, passphrase: &str) -> Self {
        let address_hash = sha256d(key.address().as_str().as_bytes());
        let salt = &address_hash[..SALT_LEN];

        let (mut half1, mut half2) = derive_halves(passphrase, salt);
        let cipher = Aes256::new(GenericArray::from_slice(&half2));

        let mut scalar = key.to_bytes();
        let mut payload = [0u8; BIP38_LEN];
        payload[..FLAG_OFFSET].copy_from_slice(&BIP38_PREFIX);
        payload[FLAG_OFFSET] = if key.compressed() {
            FLAG_NON_EC | FLAG_COMPRESSED
        } else {
            FLAG_NON_EC
        };
        payload[SALT_OFFSET..DATA_OFFSET].copy_from_slice(salt);

        for i in 0..2 {
            let mut block = [0u8; HALF_LEN];
            for j in 0..HALF_LEN {
                block[j] = scalar[i * HALF_LEN + j] ^ half1[i * HALF_LEN + j];
            }
            let mut ga = GenericArray::clone_from_slice(&block);
            cipher.encrypt_block(&mut ga);
            let start = DATA_OFFSET + i * HALF_LEN;
            payload[start..start + HALF_LEN].copy_from_slice(&ga);
            block.zeroize();
        }

        scalar.zeroize();
        half1.zeroize();
        half2.zeroize();
        Self { payload }
    }

    /// Parse base58check text as an encrypted key.
    ///
    /// EC-multiply payloads (0x01 0x43) and reserved flag bits are rejected
    /// the same way as a damaged checksum.
    pub fn parse(text: &str) -> Result<Self, Bip38Error> {
        let decoded = bs58::decode(text)
            .with_check(None)
            .into_vec()
            .map_err(|_| Bip38Error::InvalidChecksumOrFormat)?;
        let payload: [u8; BIP38_LEN] = decoded
            .try_into()
            .map_err(|_| Bip38Error::InvalidChecksumOrFormat)?;
        if payload[..FLAG_OFFSET] != BIP38_PREFIX {
            return Err(Bip38Error::InvalidChecksumOrFormat);
        }
        let flag = payload[FLAG_OFFSET];
        if flag & FLAG_NON_EC != FLAG_NON_EC || flag & !(FLAG_NON_EC | FLAG_COMPRESSED) != 0 {
            return Err(Bip38Error::InvalidChecksumOrFormat);
        }
        Ok(Self { payload })
    }

    /// Recover the private key, verifying the embedded address hash.
    ///
    /// A wrong passphrase and a corrupt payload are indistinguishable here:
    /// both surface as the address-hash check failing.
    pub fn decrypt(&self, passphrase: &str) -> Result<PrivateKey, Bip38Error> {
        let salt = &self.payload[SALT_OFFSET..DATA_OFFSET];
        let (mut half1, mut half2) = derive_halves(passphrase, salt);
        let cipher = Aes256::new(GenericArray::from_slice(&half2));

        let mut scalar = [0u8; SECRET_LEN];
        for i in 0..2 {
            let start = DATA_OFFSET + i * HALF_LEN;
            let mut block =
                GenericArray::clone_from_slice(&self.payload[start..start + HALF_LEN]);
            cipher.decrypt_block(&mut block);
            for j in 0..HALF_LEN {
                scalar[i * HALF_LEN + j] = block[j] ^ half1[i * HALF_LEN + j];
            }
            block.as_mut_slice().zeroize();
        }
        half1.zeroize();
        half2.zeroize();

        let compressed = self.payload[FLAG_OFFSET] & FLAG_COMPRESSED != 0;
        let key = PrivateKey::from_bytes(&scalar, compressed)
            .map_err(|_| Bip38Error::WrongPassphrase);
        scalar.zeroize();
        let key = key?;

        let check = sha256d(key.address().as_str().as_bytes());
        if check[..SALT_LEN] != *salt {
            return Err(Bip38Error::WrongPassphrase);
        }
        Ok(key)
    }

    /// Raw payload bytes, for hex rendering.
    pub fn to_bytes(&self) -> [u8; BIP38_LEN] {
        self.payload
    }

    pub fn compressed(&self) -> bool {
        self.payload[FLAG_OFFSET] & FLAG_COMPRESSED != 0
    }
}

impl fmt::Display for Bip38Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.payload).with_check().into_string())
    }
}

/// Run the BIP38 scrypt schedule and split the derived key.
fn derive_halves(passphrase: &str, salt: &[u8]) -> ([u8; 32], [u8; 32]) {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, SCRYPT_DKLEN)
        .expect("static scrypt parameters are valid");
    let mut derived = [0u8; SCRYPT_DKLEN];
    scrypt::scrypt(passphrase.as_bytes(), salt, &params, &mut derived)
        .expect("output length is fixed and nonzero");
    let mut half1 = [0u8; 32];
    let mut half2 = [0u8; 32];
    half1.copy_from_slice(&derived[..32]);
    half2.copy_from_slice(&derived[32..]);
    derived.zeroize();
    (half1, half2)
}
