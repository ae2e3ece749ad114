//! Chat contract ABI: address, selectors, payload builders and response decoding.

use parity_scale_codec::{Decode, Encode};

use crate::blockchain::rpc::{ExtrinsicCall, NodeRpc, RuntimeApiCall};
use crate::blockchain::ss58;
use crate::blockchain::types::{AccountId, CoreError, CoreResult, NodeErrorPayload};
use crate::blockchain::value::Value;
use crate::observability::metrics;

/// Deployed chat contract.
pub const CONTRACT_ADDRESS: &str = "5GZRb5XZVCTsH6VSxT3e8tE3qQmaiq4hJhxgdoFg8iijP3S9";

/// `add(text: String)`
pub const ADD_SELECTOR: [u8; 4] = [0x4b, 0x05, 0x0e, 0xa9];
/// `get(from: u32, to: u32) -> Vec<Message>`
pub const GET_SELECTOR: [u8; 4] = [0x2f, 0x86, 0x5b, 0xd9];
/// `len() -> u32`
pub const COUNT_SELECTOR: [u8; 4] = [0x83, 0x9b, 0x35, 0x48];

/// Gas budget for `add` transactions.
pub const ADD_GAS_REF_TIME: u64 = 9_375_000_000;
pub const ADD_GAS_PROOF_SIZE: u64 = 524_288;

/// A chat message stored by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ContractMessage {
    pub id: u32,
    pub sender: AccountId,
    pub text: String,
}

/// Events emitted by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum ContractEvent {
    #[codec(index = 0)]
    MessageAdded(ContractMessage),
}

/// Stateless helper for the chat contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractClient;

impl ContractClient {
    pub fn new() -> Self {
        Self
    }

    /// Contract account identity.
    pub fn account_id(&self) -> CoreResult<AccountId> {
        let (raw, _format) = ss58::decode(CONTRACT_ADDRESS)?;
        Ok(AccountId(raw))
    }

    pub fn count_call(&self) -> Vec<u8> {
        COUNT_SELECTOR.to_vec()
    }

    /// `get` payload for the half-open range `[from, to)`.
    pub fn get_call(&self, from: u32, to: u32) -> Vec<u8> {
        let mut input = GET_SELECTOR.to_vec();
        from.encode_to(&mut input);
        to.encode_to(&mut input);
        input
    }

    pub fn add_call(&self, text: &str) -> Vec<u8> {
        let mut input = ADD_SELECTOR.to_vec();
        text.encode_to(&mut input);
        input
    }

    /// `Contracts.call` extrinsic that sends `input` to the contract.
    pub fn extrinsic(&self, input: Vec<u8>) -> CoreResult<ExtrinsicCall> {
        let contract = self.account_id()?;
        Ok(ExtrinsicCall {
            pallet: "Contracts".to_string(),
            name: "call".to_string(),
            params: Value::map([
                (
                    "dest",
                    Value::variant("Id", vec![Value::Bytes(contract.0.to_vec())]),
                ),
                ("value", Value::UInt(0)),
                (
                    "gas_limit",
                    Value::map([
                        ("ref_time", Value::from(ADD_GAS_REF_TIME)),
                        ("proof_size", Value::from(ADD_GAS_PROOF_SIZE)),
                    ]),
                ),
                ("storage_deposit_limit", Value::none_variant()),
                ("data", Value::Bytes(input)),
            ]),
        })
    }

    /// Run a read-only contract call and decode its `Result<R, _>` output.
    pub async fn query<R: Decode>(&self, rpc: &dyn NodeRpc, input: Vec<u8>) -> CoreResult<R> {
        let selector = hex::encode(input.get(..4).unwrap_or(&input[..]));
        let result = self.execute_query(rpc, input).await;
        metrics::record_contract_query(&selector, result.is_ok());
        result
    }

    async fn execute_query<R: Decode>(&self, rpc: &dyn NodeRpc, input: Vec<u8>) -> CoreResult<R> {
        let contract = Value::Bytes(self.account_id()?.0.to_vec());
        let call = RuntimeApiCall {
            api: "ContractsApi".to_string(),
            method: "call".to_string(),
            params: Value::map([
                ("origin", contract.clone()),
                ("dest", contract),
                ("value", Value::UInt(0)),
                ("gas_limit", Value::none_variant()),
                ("storage_deposit_limit", Value::none_variant()),
                ("input_data", Value::Bytes(input)),
            ]),
        };

        let response = rpc.call_runtime_api(call).await?;
        let data = Self::extract_output(&response)?;
        let decoded = Result::<R, NodeErrorPayload>::decode(&mut &data[..])?;
        decoded.map_err(CoreError::from)
    }

    /// Validate a `ContractsApi.call` response and return its output bytes.
    fn extract_output(response: &Value) -> CoreResult<&[u8]> {
        let (tag, values) = response
            .field("result")
            .and_then(Value::as_variant)
            .ok_or_else(|| {
                CoreError::MalformedResponse(format!("query response is malformed: {}", response))
            })?;

        if tag != "Ok" {
            let result = response.field("result").map(|v| v.to_string()).unwrap_or_default();
            return Err(CoreError::MalformedResponse(format!(
                "query response is not ok: {}",
                result
            )));
        }

        values
            .first()
            .and_then(|v| v.field("data"))
            .and_then(Value::as_bytes)
            .ok_or_else(|| {
                CoreError::MalformedResponse(format!("query response is not bytes: {:?}", values))
            })
    }

    /// Decode a `ContractEmitted` event payload.
    pub fn decode_event(&self, data: &[u8]) -> CoreResult<ContractMessage> {
        match ContractEvent::decode(&mut &data[..])? {
            ContractEvent::MessageAdded(message) => Ok(message),
        }
    }
}
