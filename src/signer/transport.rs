//! Signer transport selection.
//!
//! The signing service is expected to expose a single transport; the user is never
//! offered a choice. When that transport is not usable the reason is shown to the
//! user and signer construction is aborted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

/// Readiness of one signer transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportStatus {
    Ready,
    Unavailable(String),
    Error(String),
}

/// Shows a failure to the user.
#[async_trait]
pub trait ErrorPresenter: Send + Sync {
    async fn present_error(&self, message: String);
}

/// Presenter that only writes the message to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorPresenter;

#[async_trait]
impl ErrorPresenter for LogErrorPresenter {
    async fn present_error(&self, message: String) {
        tracing::error!(%message, "Signer transport unavailable");
    }
}

pub struct TransportSelector {
    presenter: Arc<dyn ErrorPresenter>,
}

impl TransportSelector {
    pub fn new(presenter: Arc<dyn ErrorPresenter>) -> Self {
        Self { presenter }
    }

    /// Pick the transport to open, or `None` if no transport is usable.
    ///
    /// Candidates are visited in id order. Every unusable candidate seen before a
    /// ready one is reported through the presenter.
    pub async fn select(&self, transports: &HashMap<String, TransportStatus>) -> Option<String> {
        if transports.is_empty() {
            self.presenter
                .present_error("No signer transports are available".to_string())
                .await;
            return None;
        }
        if transports.len() > 1 {
            tracing::warn!(
                count = transports.len(),
                "Expected a single signer transport, choosing the first ready one"
            );
        }

        let mut ids: Vec<&String> = transports.keys().collect();
        ids.sort();

        for id in ids {
            let message = match &transports[id] {
                TransportStatus::Ready => {
                    tracing::debug!(transport = %id, "Signer transport selected");
                    return Some(id.clone());
                }
                TransportStatus::Unavailable(reason) => format!(
                    "Transport '{}' is not available because of the following reason: {}",
                    id, reason
                ),
                TransportStatus::Error(detail) => format!(
                    "Transport '{}' is not available because the transport produced an error: {}",
                    id, detail
                ),
            };
            self.presenter.present_error(message).await;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPresenter {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ErrorPresenter for RecordingPresenter {
        async fn present_error(&self, message: String) {
            self.messages.lock().unwrap().push(message);
        }
    }

    fn selector() -> (TransportSelector, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::default());
        (TransportSelector::new(presenter.clone()), presenter)
    }

    fn single(id: &str, status: TransportStatus) -> HashMap<String, TransportStatus> {
        HashMap::from([(id.to_string(), status)])
    }

    #[tokio::test]
    async fn test_ready_transport_selected() {
        let (selector, presenter) = selector();
        let selected = selector.select(&single("usb", TransportStatus::Ready)).await;
        assert_eq!(selected.as_deref(), Some("usb"));
        assert!(presenter.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_transport_reported_once() {
        let (selector, presenter) = selector();
        let selected = selector
            .select(&single("usb", TransportStatus::Unavailable("locked".into())))
            .await;
        assert!(selected.is_none());

        let messages = presenter.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("usb"));
        assert!(messages[0].contains("locked"));
    }

    #[tokio::test]
    async fn test_error_transport_reported() {
        let (selector, presenter) = selector();
        let selected = selector
            .select(&single("ipc", TransportStatus::Error("broken pipe".into())))
            .await;
        assert!(selected.is_none());
        let messages = presenter.messages.lock().unwrap();
        assert_eq!(
            messages[0],
            "Transport 'ipc' is not available because the transport produced an error: broken pipe"
        );
    }

    #[tokio::test]
    async fn test_empty_set() {
        let (selector, presenter) = selector();
        assert!(selector.select(&HashMap::new()).await.is_none());
        assert_eq!(presenter.messages.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_multiple_transports_first_ready_wins() {
        let (selector, presenter) = selector();
        let transports = HashMap::from([
            ("ble".to_string(), TransportStatus::Unavailable("off".into())),
            ("usb".to_string(), TransportStatus::Ready),
            ("wifi".to_string(), TransportStatus::Ready),
        ]);
        assert_eq!(selector.select(&transports).await.as_deref(), Some("usb"));
        assert_eq!(presenter.messages.lock().unwrap().len(), 1);
    }
}
