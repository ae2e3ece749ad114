//! Client-side core of an on-chain chat.
//!
//! Reads and posts messages to a chat smart contract on a Substrate contracts chain.
//! Transactions are signed by an external signing service; this crate never sees a
//! private key.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod signer;

pub use blockchain::{ChainCore, ContractMessage, CoreError, CoreResult};
pub use config::CoreConfig;
pub use signer::{RemoteSigner, Signer, SignerError};
