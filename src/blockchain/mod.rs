//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! NodeConnector (lazy, once)
//!     → client.rs (ChainCore: account cache, chat operations)
//!     → contract.rs (selectors, query execution, response and event decoding)
//!     → transaction.rs (sign, submit, wait for finalization)
//!     → signer (remote signing service)
//! ```
//!
//! # Security Constraints
//! - No private keys in this process; signing is delegated
//! - Every node response is shape-checked before it is decoded

pub mod client;
pub mod contract;
pub mod keys;
pub mod rpc;
pub mod ss58;
pub mod transaction;
pub mod types;
pub mod value;

pub use client::{ChainCore, PAGE_SIZE};
pub use contract::{ContractClient, ContractEvent, ContractMessage};
pub use keys::{CryptoAlgorithm, KeyType, PublicKey, Signature};
pub use rpc::{NodeConnector, NodeRpc, RuntimeContext, TxStatus};
pub use types::{Account, AccountId, CoreError, CoreResult};
pub use value::Value;
