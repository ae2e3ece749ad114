//! Remote signing subsystem.
//!
//! # Data Flow
//! ```text
//! SignerProvider.transports()
//!     → transport.rs (pick exactly one usable transport, report failures)
//!     → SignerProvider.open(id) → SignerService
//!     → remote.rs (account resolution, key → derivation path cache)
//!     → envelope.rs (payload + extrinsic metadata + type registry)
//!     → SignerService.sign_transaction → Signature
//! ```
//!
//! # Security Constraints
//! - Private keys never enter this process; only public keys and opaque paths do
//! - User cancellation stays distinguishable from every other failure

pub mod envelope;
pub mod remote;
pub mod service;
pub mod transport;
pub mod types;

pub use envelope::{TransactionEnvelope, TypeRegistryBuilder};
pub use remote::RemoteSigner;
pub use service::{AccountResponse, ServiceError, SignerProvider, SignerService};
pub use transport::{ErrorPresenter, LogErrorPresenter, TransportSelector, TransportStatus};
pub use types::{Signer, SignerError};
