//! Boundary to the node RPC session.
//!
//! The session itself (websocket transport, metadata download, dynamic encoding of
//! calls) lives outside this crate. The core only drives it through [`NodeRpc`].

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use scale_info::PortableRegistry;

use crate::blockchain::keys::{PublicKey, Signature};
use crate::blockchain::types::CoreResult;
use crate::blockchain::value::Value;
use crate::config::NodeConfig;

/// One signed extension declared by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtensionInfo {
    pub identifier: String,
    /// Type of the extension's `extra` data.
    pub ty: u32,
    /// Type of the extension's `additional_signed` data.
    pub additional_signed: u32,
}

/// Runtime description needed to encode and sign extrinsics.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Portable type registry from the runtime metadata.
    pub types: PortableRegistry,
    /// Type id of the runtime's outer call enum.
    pub call_type: u32,
    pub extrinsic_version: u8,
    pub signed_extensions: Vec<SignedExtensionInfo>,
    /// SS58 address format of the chain.
    pub address_format: u16,
}

/// A runtime API call, e.g. `ContractsApi.call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeApiCall {
    pub api: String,
    pub method: String,
    pub params: Value,
}

/// A pallet call to be wrapped into an extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicCall {
    pub pallet: String,
    pub name: String,
    pub params: Value,
}

/// Everything that gets signed, already SCALE encoded by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload {
    pub call: Vec<u8>,
    /// Signed extensions' extra data.
    pub extra: Vec<u8>,
    /// Signed extensions' additional signed data.
    pub additional_signed: Vec<u8>,
}

impl SigningPayload {
    /// Bytes in extrinsic signing order: call, extra, additional signed.
    pub fn encode(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.call.len() + self.extra.len() + self.additional_signed.len());
        out.extend_from_slice(&self.call);
        out.extend_from_slice(&self.extra);
        out.extend_from_slice(&self.additional_signed);
        out
    }
}

/// A signed payload ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtrinsic {
    pub payload: SigningPayload,
    pub signer: PublicKey,
    /// Put on the wire with its `MultiSignature` encoding (`Signature::encode`).
    pub signature: Signature,
}

/// An event emitted while applying an extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicEvent {
    pub pallet: String,
    pub name: String,
    pub fields: Value,
}

impl ExtrinsicEvent {
    pub fn is(&self, pallet: &str, name: &str) -> bool {
        self.pallet == pallet && self.name == name
    }
}

/// Status updates of a submitted extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Validated,
    Broadcasted,
    NoLongerInBestBlock,
    InBestBlock { block_hash: [u8; 32] },
    InFinalizedBlock {
        block_hash: [u8; 32],
        events: Vec<ExtrinsicEvent>,
    },
    /// Rejected or failed inside the node's transaction pool.
    Error(String),
    Invalid(String),
    Dropped(String),
}

/// Stream of status updates for one submission.
pub type TxProgress = BoxStream<'static, CoreResult<TxStatus>>;

/// A connected node session.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Runtime description of the connected chain.
    fn runtime(&self) -> &RuntimeContext;

    /// Execute a read-only runtime API call.
    async fn call_runtime_api(&self, call: RuntimeApiCall) -> CoreResult<Value>;

    /// Encode `call` and fill in nonce, era, tip and the other signed extensions for `account`.
    async fn create_signing_payload(
        &self,
        call: &ExtrinsicCall,
        account: &PublicKey,
    ) -> CoreResult<SigningPayload>;

    /// Submit a signed extrinsic and follow its progress.
    async fn submit_and_watch(&self, extrinsic: SignedExtrinsic) -> CoreResult<TxProgress>;
}

/// Establishes node sessions.
#[async_trait]
pub trait NodeConnector: Send + Sync {
    async fn connect(&self, config: &NodeConfig) -> CoreResult<Arc<dyn NodeRpc>>;
}
