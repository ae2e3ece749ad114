//! Extrinsic signing, submission and finalization monitoring.
//!
//! # Responsibilities
//! - Ask the node for a signing payload and have it signed remotely
//! - Submit the signed extrinsic and follow its status stream
//! - Wait for the finalized block and hand back the extrinsic's events

use futures_util::StreamExt;

use crate::blockchain::keys::PublicKey;
use crate::blockchain::rpc::{
    ExtrinsicCall, ExtrinsicEvent, NodeRpc, SignedExtrinsic, TxProgress, TxStatus,
};
use crate::blockchain::types::{CoreError, CoreResult};
use crate::signer::Signer;

/// An extrinsic included in a finalized block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedTx {
    pub block_hash: [u8; 32],
    pub events: Vec<ExtrinsicEvent>,
}

impl FinalizedTx {
    /// Fail if the runtime reported the extrinsic as failed.
    pub fn success(self) -> CoreResult<Self> {
        match self.events.iter().find(|e| e.is("System", "ExtrinsicFailed")) {
            Some(failed) => Err(CoreError::Node(format!("Extrinsic failed: {}", failed.fields))),
            None => Ok(self),
        }
    }

    /// First event emitted by `pallet` with the given name.
    pub fn first_event(&self, pallet: &str, name: &str) -> Option<&ExtrinsicEvent> {
        self.events.iter().find(|e| e.is(pallet, name))
    }
}

/// Signs and submits extrinsics for one account.
pub struct TxBuilder<'a> {
    rpc: &'a dyn NodeRpc,
    signer: &'a dyn Signer,
}

impl<'a> TxBuilder<'a> {
    pub fn new(rpc: &'a dyn NodeRpc, signer: &'a dyn Signer) -> Self {
        Self { rpc, signer }
    }

    /// Build, sign and submit `call`, returning its status stream.
    pub async fn sign_and_submit(
        &self,
        call: &ExtrinsicCall,
        account: &PublicKey,
    ) -> CoreResult<TxProgress> {
        let payload = self.rpc.create_signing_payload(call, account).await?;
        let signature = self
            .signer
            .sign(&payload, account, self.rpc.runtime())
            .await?;

        tracing::info!(
            pallet = %call.pallet,
            call = %call.name,
            call_len = payload.call.len(),
            "Submitting extrinsic"
        );
        self.rpc
            .submit_and_watch(SignedExtrinsic {
                payload,
                signer: account.clone(),
                signature,
            })
            .await
    }

    /// Follow `progress` until the extrinsic is in a finalized block.
    pub async fn wait_for_finalized(mut progress: TxProgress) -> CoreResult<FinalizedTx> {
        while let Some(status) = progress.next().await {
            match status? {
                TxStatus::InFinalizedBlock { block_hash, events } => {
                    tracing::info!(block = %hex::encode(block_hash), "Extrinsic finalized");
                    return Ok(FinalizedTx { block_hash, events });
                }
                TxStatus::InBestBlock { block_hash } => {
                    tracing::debug!(block = %hex::encode(block_hash), "Extrinsic in best block");
                }
                TxStatus::Error(message) => {
                    return Err(CoreError::Transaction(format!("transaction error: {}", message)))
                }
                TxStatus::Invalid(message) => {
                    return Err(CoreError::Transaction(format!("transaction invalid: {}", message)))
                }
                TxStatus::Dropped(message) => {
                    return Err(CoreError::Transaction(format!("transaction dropped: {}", message)))
                }
                other => tracing::debug!(status = ?other, "Extrinsic status"),
            }
        }
        Err(CoreError::Transaction(
            "status stream ended before finalization".to_string(),
        ))
    }
}
