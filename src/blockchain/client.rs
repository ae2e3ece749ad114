//! Chat chain core: lazy node connection, account cache and the chat operations.
//!
//! # Responsibilities
//! - Connect to the node exactly once, on first use
//! - Resolve the user's account through the signer once and cache it
//! - Read messages from the contract in fixed-size windows
//! - Send messages and wait for their finalized `ContractEmitted` event

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::blockchain::contract::{ContractClient, ContractMessage};
use crate::blockchain::keys::{CryptoAlgorithm, KeyType};
use crate::blockchain::rpc::{NodeConnector, NodeRpc};
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{Account, CoreError, CoreResult};
use crate::config::CoreConfig;
use crate::observability::metrics;
use crate::signer::{ErrorPresenter, RemoteSigner, Signer, SignerProvider, TransportSelector};

/// Messages fetched per contract query.
pub const PAGE_SIZE: u32 = 30;

type Connection = Shared<BoxFuture<'static, CoreResult<Arc<dyn NodeRpc>>>>;

/// Entry point for the chat operations.
pub struct ChainCore {
    /// Node session, established on first await and shared by every caller.
    connection: Connection,
    signer: Arc<dyn Signer>,
    /// Resolved account. The lock is held across resolution so it happens once.
    account: Mutex<Option<Account>>,
    contract: ContractClient,
}

impl ChainCore {
    /// Create the core. Nothing touches the network until the first operation.
    pub fn new(
        config: &CoreConfig,
        connector: Arc<dyn NodeConnector>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        let node = config.node.clone();
        let connection = async move {
            tracing::info!(url = %node.url, "Connecting to node");
            match connector.connect(&node).await {
                Ok(rpc) => {
                    tracing::info!(url = %node.url, "Node connection established");
                    Ok(rpc)
                }
                Err(e) => {
                    tracing::error!(url = %node.url, error = %e, "Node connection failed");
                    Err(match e {
                        CoreError::Connection(_) => e,
                        other => CoreError::Connection(other.to_string()),
                    })
                }
            }
        }
        .boxed()
        .shared();

        Self {
            connection,
            signer,
            account: Mutex::new(None),
            contract: ContractClient::new(),
        }
    }

    /// Create the core with a remote signer reached through `provider`.
    ///
    /// Fails if no signer transport is usable.
    pub async fn with_remote_signer(
        config: &CoreConfig,
        connector: Arc<dyn NodeConnector>,
        provider: &dyn SignerProvider,
        presenter: Arc<dyn ErrorPresenter>,
    ) -> CoreResult<Self> {
        let selector = TransportSelector::new(presenter);
        let signer = RemoteSigner::connect(provider, &selector).await?;
        Ok(Self::new(config, connector, Arc::new(signer)))
    }

    async fn rpc(&self) -> CoreResult<Arc<dyn NodeRpc>> {
        self.connection.clone().await
    }

    async fn account(&self) -> CoreResult<Account> {
        let mut cached = self.account.lock().await;
        if let Some(account) = cached.as_ref() {
            return Ok(account.clone());
        }

        let rpc = self.rpc().await?;
        let key = self
            .signer
            .resolve_account(KeyType::ACCOUNT, &CryptoAlgorithm::PRIORITY)
            .await?;
        let address = key.to_ss58(rpc.runtime().address_format)?;
        tracing::info!(address = %address, algorithm = %key.algorithm(), "Account resolved");

        let account = Account { key, address };
        *cached = Some(account.clone());
        Ok(account)
    }

    /// SS58 address of the user's account.
    pub async fn current_account_address(&self) -> CoreResult<String> {
        Ok(self.account().await?.address)
    }

    /// Number of messages stored in the contract.
    pub async fn message_count(&self) -> CoreResult<u32> {
        let rpc = self.rpc().await?;
        self.contract
            .query(rpc.as_ref(), self.contract.count_call())
            .await
    }

    /// Texts of all messages from index `from` on.
    pub async fn fetch_messages(&self, from: u32) -> CoreResult<Vec<String>> {
        Ok(self
            .fetch_message_records(from)
            .await?
            .into_iter()
            .map(|m| m.text)
            .collect())
    }

    /// All messages from index `from` on, in id order.
    ///
    /// Returns an empty list once the caller has caught up.
    pub async fn fetch_message_records(&self, from: u32) -> CoreResult<Vec<ContractMessage>> {
        let len = self.message_count().await?;
        if from >= len {
            return Ok(Vec::new());
        }

        let rpc = self.rpc().await?;
        let mut messages = Vec::with_capacity((len - from) as usize);
        let mut start = from;
        while start < len {
            let end = start.saturating_add(PAGE_SIZE).min(len);
            tracing::debug!(from = start, to = end, "Fetching message window");
            let window: Vec<ContractMessage> = self
                .contract
                .query(rpc.as_ref(), self.contract.get_call(start, end))
                .await?;
            messages.extend(window);
            start = end;
        }

        tracing::debug!(from, count = messages.len(), "Messages fetched");
        Ok(messages)
    }

    /// Post `text` to the contract and return the stored message once finalized.
    pub async fn send_message(&self, text: &str) -> CoreResult<ContractMessage> {
        let result = self.submit_message(text).await;
        metrics::record_transaction(match &result {
            Ok(_) => "finalized",
            Err(e) if e.is_cancelled() => "cancelled",
            Err(_) => "failed",
        });
        result
    }

    async fn submit_message(&self, text: &str) -> CoreResult<ContractMessage> {
        let rpc = self.rpc().await?;
        let call = self.contract.extrinsic(self.contract.add_call(text))?;
        let account = self.account().await?;

        let progress = TxBuilder::new(rpc.as_ref(), self.signer.as_ref())
            .sign_and_submit(&call, &account.key)
            .await?;
        let finalized = TxBuilder::wait_for_finalized(progress).await?.success()?;

        let emitted = finalized
            .first_event("Contracts", "ContractEmitted")
            .ok_or_else(|| {
                CoreError::MalformedResponse("Contract isn't emitted event".to_string())
            })?;
        let data = emitted
            .fields
            .field("data")
            .and_then(|v| v.as_bytes())
            .ok_or_else(|| {
                CoreError::MalformedResponse(format!("bad event emitted: {}", emitted.fields))
            })?;

        let message = self.contract.decode_event(data)?;
        tracing::info!(id = message.id, "Message stored");
        Ok(message)
    }
}
