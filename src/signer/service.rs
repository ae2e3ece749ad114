//! Boundary to the external signing service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::blockchain::keys::CryptoAlgorithm;
use crate::signer::transport::TransportStatus;
use crate::signer::types::SignerError;

/// Failure reported by the signing service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("request cancelled")]
    Cancelled,
    #[error("{0}")]
    Other(String),
}

impl From<ServiceError> for SignerError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Cancelled => SignerError::CancelledByUser,
            ServiceError::Other(message) => SignerError::Other(message),
        }
    }
}

/// Account returned by the signing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    pub public_key: Vec<u8>,
    /// Opaque locator of the private key inside the service.
    pub path: String,
}

/// Operations offered by a signing service over an open transport.
#[async_trait]
pub trait SignerService: Send + Sync {
    async fn get_account(&self, algorithm: CryptoAlgorithm)
        -> Result<AccountResponse, ServiceError>;

    /// Sign an extrinsic. The three blobs must be passed through unchanged.
    async fn sign_transaction(
        &self,
        algorithm: CryptoAlgorithm,
        path: &str,
        extrinsic: &[u8],
        metadata: &[u8],
        types: &[u8],
    ) -> Result<Vec<u8>, ServiceError>;
}

/// Negotiates the transport to a signing service.
#[async_trait]
pub trait SignerProvider: Send + Sync {
    /// Candidate transports and their current status.
    async fn transports(&self) -> HashMap<String, TransportStatus>;

    /// Open the service over the named transport.
    async fn open(&self, transport: &str) -> Result<Arc<dyn SignerService>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_mapping() {
        assert_eq!(
            SignerError::from(ServiceError::Cancelled),
            SignerError::CancelledByUser
        );
        assert_eq!(
            SignerError::from(ServiceError::Other("usb unplugged".into())),
            SignerError::Other("usb unplugged".into())
        );
    }
}
