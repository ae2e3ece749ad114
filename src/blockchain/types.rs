//! Chain-specific types and error definitions.

use parity_scale_codec::{Decode, Encode, Input};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::keys::PublicKey;
use crate::signer::SignerError;

/// 32-byte chain account identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Raw identity bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(raw: [u8; 32]) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// The resolved user account: its public key and its formatted address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub key: PublicKey,
    pub address: String,
}

/// Errors that can occur during chain operations.
///
/// `Clone` because the memoized connection future hands its output to every waiter.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// The node connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A node or contract response did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The node or contract returned an explicit error payload.
    #[error("{0}")]
    Node(String),

    /// Account resolution or signing failed.
    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    /// Binary payload could not be decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    /// An address string could not be parsed or formatted.
    #[error("Address error: {0}")]
    Address(String),

    /// The submitted transaction was dropped, rejected or never finalized.
    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl CoreError {
    /// True when the user declined a request on the signer side.
    ///
    /// UI layers use this to skip showing an error for a deliberate abort.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Signer(SignerError::CancelledByUser))
    }
}

impl From<parity_scale_codec::Error> for CoreError {
    fn from(e: parity_scale_codec::Error) -> Self {
        CoreError::Codec(e.to_string())
    }
}

/// Result type for chain operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Error payload returned by a contract or node inside a `Result::Err`.
///
/// The payload's structure is chain-specific, so it is kept as the remaining raw bytes
/// and rendered as hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeErrorPayload(pub Vec<u8>);

impl Decode for NodeErrorPayload {
    fn decode<I: Input>(input: &mut I) -> Result<Self, parity_scale_codec::Error> {
        let len = input
            .remaining_len()?
            .ok_or("node error payload has unknown length")?;
        let mut raw = vec![0u8; len];
        input.read(&mut raw)?;
        Ok(Self(raw))
    }
}

impl std::fmt::Display for NodeErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node Error: {}", hex::encode(&self.0))
    }
}

impl From<NodeErrorPayload> for CoreError {
    fn from(payload: NodeErrorPayload) -> Self {
        CoreError::Node(payload.to_string())
    }
}
