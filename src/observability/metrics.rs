//! Metrics collection.
//!
//! # Metrics
//! - `polkachat_contract_queries_total` (counter): read-only contract queries by selector, outcome
//! - `polkachat_transactions_total` (counter): submitted contract calls by outcome
//! - `polkachat_signer_requests_total` (counter): signer service calls by operation, outcome

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

pub fn record_contract_query(selector: &str, ok: bool) {
    metrics::counter!(
        "polkachat_contract_queries_total",
        "selector" => selector.to_string(),
        "outcome" => outcome(ok)
    )
    .increment(1);
}

/// `outcome` is a short label such as `finalized`, `failed` or `cancelled`.
pub fn record_transaction(outcome: &'static str) {
    metrics::counter!("polkachat_transactions_total", "outcome" => outcome).increment(1);
}

pub fn record_signer_request(operation: &'static str, ok: bool) {
    metrics::counter!(
        "polkachat_signer_requests_total",
        "operation" => operation,
        "outcome" => outcome(ok)
    )
    .increment(1);
}
