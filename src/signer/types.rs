//! Signer capability and error definitions.

use async_trait::async_trait;
use thiserror::Error;

use crate::blockchain::keys::{CryptoAlgorithm, KeyType, PublicKey, Signature};
use crate::blockchain::rpc::{RuntimeContext, SigningPayload};

/// Errors that can occur while resolving accounts or signing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The key type or every requested algorithm is unsupported.
    #[error("No accounts for key type '{key_type}' and algorithms {algorithms:?}")]
    NoAccountsForType {
        key_type: KeyType,
        algorithms: Vec<CryptoAlgorithm>,
    },

    /// A sign request referenced a key that was never resolved in this session.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The user declined the request in the signing service.
    #[error("Cancelled by user")]
    CancelledByUser,

    /// No signer transport could be selected.
    #[error("No usable signer transport")]
    NoTransport,

    #[error("{0}")]
    Other(String),
}

/// Something that can resolve an account key and sign extrinsic payloads for it.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Resolve the public key to act as, picking among `algorithms`.
    async fn resolve_account(
        &self,
        key_type: KeyType,
        algorithms: &[CryptoAlgorithm],
    ) -> Result<PublicKey, SignerError>;

    /// Sign `payload` with the key of `account`.
    async fn sign(
        &self,
        payload: &SigningPayload,
        account: &PublicKey,
        runtime: &RuntimeContext,
    ) -> Result<Signature, SignerError>;
}
