//! Signer backed by an external signing service.
//!
//! # Security
//! - Only public keys and derivation paths are held here
//! - Paths are cached only for keys handed out by `resolve_account`

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::blockchain::keys::{CryptoAlgorithm, KeyType, PublicKey, Signature};
use crate::blockchain::rpc::{RuntimeContext, SigningPayload};
use crate::observability::metrics;
use crate::signer::envelope::TransactionEnvelope;
use crate::signer::service::{SignerProvider, SignerService};
use crate::signer::transport::TransportSelector;
use crate::signer::types::{Signer, SignerError};

pub struct RemoteSigner {
    service: Arc<dyn SignerService>,
    /// Raw public key → derivation path.
    account_paths: DashMap<Vec<u8>, String>,
}

impl RemoteSigner {
    pub fn new(service: Arc<dyn SignerService>) -> Self {
        Self {
            service,
            account_paths: DashMap::new(),
        }
    }

    /// Negotiate a transport and open the signing service over it.
    pub async fn connect(
        provider: &dyn SignerProvider,
        selector: &TransportSelector,
    ) -> Result<Self, SignerError> {
        let transports = provider.transports().await;
        let transport = selector
            .select(&transports)
            .await
            .ok_or(SignerError::NoTransport)?;

        let service = provider.open(&transport).await?;
        tracing::info!(transport = %transport, "Signer service opened");
        Ok(Self::new(service))
    }

    /// Number of keys with a known derivation path.
    pub fn known_accounts(&self) -> usize {
        self.account_paths.len()
    }
}

#[async_trait]
impl Signer for RemoteSigner {
    async fn resolve_account(
        &self,
        key_type: KeyType,
        algorithms: &[CryptoAlgorithm],
    ) -> Result<PublicKey, SignerError> {
        let no_accounts = || SignerError::NoAccountsForType {
            key_type,
            algorithms: algorithms.to_vec(),
        };
        if key_type != KeyType::ACCOUNT {
            return Err(no_accounts());
        }
        let algorithm = CryptoAlgorithm::PRIORITY
            .into_iter()
            .find(|a| algorithms.contains(a))
            .ok_or_else(no_accounts)?;

        let response = self.service.get_account(algorithm).await;
        metrics::record_signer_request("get_account", response.is_ok());
        let response = response?;

        self.account_paths
            .insert(response.public_key.clone(), response.path);

        let key = PublicKey::from_raw(algorithm, &response.public_key)
            .map_err(|e| SignerError::Other(e.to_string()))?;
        tracing::info!(algorithm = %algorithm, "Account resolved through signer");
        Ok(key)
    }

    async fn sign(
        &self,
        payload: &SigningPayload,
        account: &PublicKey,
        runtime: &RuntimeContext,
    ) -> Result<Signature, SignerError> {
        let path = self
            .account_paths
            .get(account.raw())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SignerError::AccountNotFound(hex::encode(account.raw())))?;

        let envelope = TransactionEnvelope::build(payload, runtime)
            .map_err(|e| SignerError::Other(e.to_string()))?;

        let algorithm = account.algorithm();
        tracing::debug!(
            algorithm = %algorithm,
            extrinsic_len = envelope.extrinsic.len(),
            "Requesting remote signature"
        );
        let raw = self
            .service
            .sign_transaction(
                algorithm,
                &path,
                &envelope.extrinsic,
                &envelope.metadata,
                &envelope.types,
            )
            .await;
        metrics::record_signer_request("sign_transaction", raw.is_ok());

        Signature::from_raw(algorithm, &raw?).map_err(|e| SignerError::Other(e.to_string()))
    }
}
