//! Key types, public keys and signatures for the three supported signature schemes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use parity_scale_codec::{Encode, Output};

use crate::blockchain::ss58;
use crate::blockchain::types::{AccountId, CoreResult};

type Blake2b256 = Blake2b<U32>;

/// Signature scheme of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptoAlgorithm {
    Sr25519,
    Ed25519,
    Ecdsa,
}

impl CryptoAlgorithm {
    /// Preference order used when several algorithms are acceptable.
    pub const PRIORITY: [CryptoAlgorithm; 3] = [
        CryptoAlgorithm::Sr25519,
        CryptoAlgorithm::Ed25519,
        CryptoAlgorithm::Ecdsa,
    ];

    /// Length of a raw public key for this scheme.
    pub fn public_key_len(&self) -> usize {
        match self {
            CryptoAlgorithm::Sr25519 | CryptoAlgorithm::Ed25519 => 32,
            CryptoAlgorithm::Ecdsa => 33,
        }
    }

    /// Length of a raw signature for this scheme.
    pub fn signature_len(&self) -> usize {
        match self {
            CryptoAlgorithm::Sr25519 | CryptoAlgorithm::Ed25519 => 64,
            CryptoAlgorithm::Ecdsa => 65,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CryptoAlgorithm::Sr25519 => "sr25519",
            CryptoAlgorithm::Ed25519 => "ed25519",
            CryptoAlgorithm::Ecdsa => "ecdsa",
        }
    }
}

impl std::fmt::Display for CryptoAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Four-byte key type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyType(pub [u8; 4]);

impl KeyType {
    /// Keys that control on-chain accounts.
    pub const ACCOUNT: KeyType = KeyType(*b"acco");
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Errors raised when raw key material has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{algorithm} {kind} must be {expected} bytes, got {actual}")]
pub struct KeyLengthError {
    pub algorithm: CryptoAlgorithm,
    pub kind: &'static str,
    pub expected: usize,
    pub actual: usize,
}

/// A public key of one of the supported schemes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublicKey {
    Sr25519([u8; 32]),
    Ed25519([u8; 32]),
    Ecdsa([u8; 33]),
}

impl PublicKey {
    /// Build a typed key from raw bytes returned by a signer.
    pub fn from_raw(algorithm: CryptoAlgorithm, raw: &[u8]) -> Result<Self, KeyLengthError> {
        let length_error = || KeyLengthError {
            algorithm,
            kind: "public key",
            expected: algorithm.public_key_len(),
            actual: raw.len(),
        };
        Ok(match algorithm {
            CryptoAlgorithm::Sr25519 => {
                PublicKey::Sr25519(raw.try_into().map_err(|_| length_error())?)
            }
            CryptoAlgorithm::Ed25519 => {
                PublicKey::Ed25519(raw.try_into().map_err(|_| length_error())?)
            }
            CryptoAlgorithm::Ecdsa => PublicKey::Ecdsa(raw.try_into().map_err(|_| length_error())?),
        })
    }

    pub fn algorithm(&self) -> CryptoAlgorithm {
        match self {
            PublicKey::Sr25519(_) => CryptoAlgorithm::Sr25519,
            PublicKey::Ed25519(_) => CryptoAlgorithm::Ed25519,
            PublicKey::Ecdsa(_) => CryptoAlgorithm::Ecdsa,
        }
    }

    pub fn raw(&self) -> &[u8] {
        match self {
            PublicKey::Sr25519(k) | PublicKey::Ed25519(k) => &k[..],
            PublicKey::Ecdsa(k) => &k[..],
        }
    }

    /// On-chain account identity. ECDSA keys are 33 bytes and are hashed down.
    pub fn account_id(&self) -> AccountId {
        match self {
            PublicKey::Sr25519(k) | PublicKey::Ed25519(k) => AccountId(*k),
            PublicKey::Ecdsa(k) => {
                let mut hashed = [0u8; 32];
                hashed.copy_from_slice(&Blake2b256::digest(k));
                AccountId(hashed)
            }
        }
    }

    /// SS58 address of the account in the given network format.
    pub fn to_ss58(&self, format: u16) -> CoreResult<String> {
        ss58::encode(self.account_id().as_bytes(), format)
    }
}

/// A signature produced by the remote signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Sr25519([u8; 64]),
    Ed25519([u8; 64]),
    Ecdsa([u8; 65]),
}

impl Signature {
    pub fn from_raw(algorithm: CryptoAlgorithm, raw: &[u8]) -> Result<Self, KeyLengthError> {
        let length_error = || KeyLengthError {
            algorithm,
            kind: "signature",
            expected: algorithm.signature_len(),
            actual: raw.len(),
        };
        Ok(match algorithm {
            CryptoAlgorithm::Sr25519 => {
                Signature::Sr25519(raw.try_into().map_err(|_| length_error())?)
            }
            CryptoAlgorithm::Ed25519 => {
                Signature::Ed25519(raw.try_into().map_err(|_| length_error())?)
            }
            CryptoAlgorithm::Ecdsa => {
                Signature::Ecdsa(raw.try_into().map_err(|_| length_error())?)
            }
        })
    }

    pub fn algorithm(&self) -> CryptoAlgorithm {
        match self {
            Signature::Sr25519(_) => CryptoAlgorithm::Sr25519,
            Signature::Ed25519(_) => CryptoAlgorithm::Ed25519,
            Signature::Ecdsa(_) => CryptoAlgorithm::Ecdsa,
        }
    }

    pub fn raw(&self) -> &[u8] {
        match self {
            Signature::Sr25519(s) | Signature::Ed25519(s) => &s[..],
            Signature::Ecdsa(s) => &s[..],
        }
    }
}

/// `MultiSignature` encoding: Ed25519 = 0, Sr25519 = 1, Ecdsa = 2.
///
/// `NodeRpc` implementors use this when assembling the extrinsic from a
/// [`SignedExtrinsic`](crate::blockchain::rpc::SignedExtrinsic).
impl Encode for Signature {
    fn size_hint(&self) -> usize {
        1 + self.raw().len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        let index: u8 = match self {
            Signature::Ed25519(_) => 0,
            Signature::Sr25519(_) => 1,
            Signature::Ecdsa(_) => 2,
        };
        dest.push_byte(index);
        dest.write(self.raw());
    }
}
