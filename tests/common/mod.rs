//! Shared mocks for integration tests: an in-memory node and signing service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use parity_scale_codec::{Decode, Encode};
use scale_info::{MetaType, Registry};

use polkachat_core::blockchain::rpc::{
    ExtrinsicCall, ExtrinsicEvent, RuntimeApiCall, RuntimeContext, SignedExtrinsic,
    SigningPayload, TxProgress,
};
use polkachat_core::blockchain::{
    AccountId, ContractEvent, ContractMessage, CoreError, CoreResult, CryptoAlgorithm,
    NodeConnector, NodeRpc, PublicKey, TxStatus, Value,
};
use polkachat_core::config::NodeConfig;
use polkachat_core::signer::{
    AccountResponse, ErrorPresenter, ServiceError, SignerProvider, SignerService, TransportStatus,
};

pub const SENDER: [u8; 32] = [0x11; 32];

/// How the mock node answers contract queries.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryMode {
    Ok,
    /// `result` carries a non-`Ok` variant.
    DispatchError,
    /// The contract returns `Err(bytes)`.
    ContractError(Vec<u8>),
}

/// In-memory node holding `len` chat messages.
pub struct MockNode {
    runtime: RuntimeContext,
    pub len: u32,
    pub mode: QueryMode,
    pub emit_event: bool,
    /// Replaces the `data` field of the emitted `ContractEmitted` event.
    pub event_data: Option<Value>,
    pub runtime_calls: AtomicUsize,
    pub windows: Mutex<Vec<(u32, u32)>>,
    pub submitted: Mutex<Vec<SignedExtrinsic>>,
}

impl MockNode {
    pub fn new(len: u32) -> Self {
        let mut registry = Registry::new();
        let call_type = registry.register_type(&MetaType::new::<Vec<u8>>()).id;
        let nonce = registry.register_type(&MetaType::new::<u32>()).id;
        let unit = registry.register_type(&MetaType::new::<()>()).id;

        Self {
            runtime: RuntimeContext {
                types: registry.into(),
                call_type,
                extrinsic_version: 4,
                signed_extensions: vec![polkachat_core::blockchain::rpc::SignedExtensionInfo {
                    identifier: "CheckNonce".to_string(),
                    ty: nonce,
                    additional_signed: unit,
                }],
                address_format: 42,
            },
            len,
            mode: QueryMode::Ok,
            emit_event: true,
            event_data: None,
            runtime_calls: AtomicUsize::new(0),
            windows: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn message(id: u32) -> ContractMessage {
        ContractMessage {
            id,
            sender: AccountId(SENDER),
            text: format!("message #{}", id),
        }
    }

    pub fn windows(&self) -> Vec<(u32, u32)> {
        self.windows.lock().unwrap().clone()
    }

    fn respond(&self, output: Vec<u8>) -> Value {
        let result = match &self.mode {
            QueryMode::DispatchError => {
                Value::variant("Err", vec![Value::Text("ContractTrapped".into())])
            }
            _ => Value::variant(
                "Ok",
                vec![Value::map([
                    ("flags", Value::UInt(0)),
                    ("data", Value::Bytes(output)),
                ])],
            ),
        };
        Value::map([("gas_consumed", Value::UInt(1)), ("result", result)])
    }
}

#[async_trait]
impl NodeRpc for MockNode {
    fn runtime(&self) -> &RuntimeContext {
        &self.runtime
    }

    async fn call_runtime_api(&self, call: RuntimeApiCall) -> CoreResult<Value> {
        self.runtime_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(call.api, "ContractsApi");
        let input = call
            .params
            .field("input_data")
            .and_then(Value::as_bytes)
            .expect("input_data")
            .to_vec();

        if let QueryMode::ContractError(payload) = &self.mode {
            let mut output = vec![1u8];
            output.extend_from_slice(payload);
            return Ok(self.respond(output));
        }

        let output = match &input[..4] {
            [0x83, 0x9b, 0x35, 0x48] => Ok::<u32, ()>(self.len).encode(),
            [0x2f, 0x86, 0x5b, 0xd9] => {
                let (from, to) = <(u32, u32)>::decode(&mut &input[4..]).expect("range");
                self.windows.lock().unwrap().push((from, to));
                let messages: Vec<ContractMessage> = (from..to).map(Self::message).collect();
                Ok::<Vec<ContractMessage>, ()>(messages).encode()
            }
            _ => panic!("unexpected selector {:?}", &input[..4]),
        };
        Ok(self.respond(output))
    }

    async fn create_signing_payload(
        &self,
        call: &ExtrinsicCall,
        _account: &PublicKey,
    ) -> CoreResult<SigningPayload> {
        let data = call
            .params
            .field("data")
            .and_then(Value::as_bytes)
            .ok_or_else(|| CoreError::MalformedResponse("no data".into()))?;
        Ok(SigningPayload {
            call: data.to_vec(),
            extra: vec![0x00],
            additional_signed: vec![0xaa; 32],
        })
    }

    async fn submit_and_watch(&self, extrinsic: SignedExtrinsic) -> CoreResult<TxProgress> {
        let text = String::decode(&mut &extrinsic.payload.call[4..])?;
        self.submitted.lock().unwrap().push(extrinsic);

        let mut events = vec![ExtrinsicEvent {
            pallet: "Balances".to_string(),
            name: "Withdraw".to_string(),
            fields: Value::None,
        }];
        if self.emit_event {
            let data = ContractEvent::MessageAdded(ContractMessage {
                id: self.len,
                sender: AccountId(SENDER),
                text,
            })
            .encode();
            let data = self.event_data.clone().unwrap_or(Value::Bytes(data));
            events.push(ExtrinsicEvent {
                pallet: "Contracts".to_string(),
                name: "ContractEmitted".to_string(),
                fields: Value::map([
                    ("contract", Value::Bytes(vec![0; 32])),
                    ("data", data),
                ]),
            });
        }

        let statuses = vec![
            Ok(TxStatus::Validated),
            Ok(TxStatus::Broadcasted),
            Ok(TxStatus::InBestBlock { block_hash: [1; 32] }),
            Ok(TxStatus::InFinalizedBlock {
                block_hash: [2; 32],
                events,
            }),
        ];
        Ok(stream::iter(statuses).boxed())
    }
}

/// Connector handing out one shared `MockNode`.
pub struct MockConnector {
    pub node: Arc<MockNode>,
    pub fail: bool,
    pub connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(node: MockNode) -> Self {
        Self {
            node: Arc::new(node),
            fail: false,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(MockNode::new(0))
        }
    }
}

#[async_trait]
impl NodeConnector for MockConnector {
    async fn connect(&self, _config: &NodeConfig) -> CoreResult<Arc<dyn NodeRpc>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail {
            return Err(CoreError::Connection("connection refused".into()));
        }
        Ok(self.node.clone())
    }
}

/// Signing service with a single sr25519 key.
#[derive(Default)]
pub struct MockSignerService {
    pub cancel_account: bool,
    pub cancel_signing: bool,
    pub account_requests: AtomicUsize,
    pub sign_requests: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl SignerService for MockSignerService {
    async fn get_account(
        &self,
        algorithm: CryptoAlgorithm,
    ) -> Result<AccountResponse, ServiceError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.cancel_account {
            return Err(ServiceError::Cancelled);
        }
        Ok(AccountResponse {
            public_key: vec![0x22; algorithm.public_key_len()],
            path: "//0".to_string(),
        })
    }

    async fn sign_transaction(
        &self,
        algorithm: CryptoAlgorithm,
        path: &str,
        extrinsic: &[u8],
        _metadata: &[u8],
        _types: &[u8],
    ) -> Result<Vec<u8>, ServiceError> {
        if self.cancel_signing {
            return Err(ServiceError::Cancelled);
        }
        self.sign_requests
            .lock()
            .unwrap()
            .push((path.to_string(), extrinsic.to_vec()));
        Ok(vec![0x33; algorithm.signature_len()])
    }
}

/// Provider exposing a single transport with a fixed status.
pub struct MockProvider {
    pub transport: String,
    pub status: TransportStatus,
    pub service: Arc<MockSignerService>,
}

#[async_trait]
impl SignerProvider for MockProvider {
    async fn transports(&self) -> HashMap<String, TransportStatus> {
        HashMap::from([(self.transport.clone(), self.status.clone())])
    }

    async fn open(&self, _transport: &str) -> Result<Arc<dyn SignerService>, ServiceError> {
        Ok(self.service.clone())
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub messages: Mutex<Vec<String>>,
}

#[async_trait]
impl ErrorPresenter for RecordingPresenter {
    async fn present_error(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}
