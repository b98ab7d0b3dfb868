use crate::store::AlertStore;

pub async fn init_metrics(alerts: &AlertStore) {
    let unverified = alerts
        .count(crate::query::unverified_condition())
        .await
        .unwrap_or(0);
    metrics::gauge!("alerts_mis_unverified_alerts").set(unverified as f64);

    tracing::info!("Initialized metrics: UnverifiedAlerts={}", unverified);
}

pub fn increment_alerts_created() {
    metrics::counter!("alerts_mis_alerts_created_total").increment(1);
    metrics::gauge!("alerts_mis_unverified_alerts").increment(1.0);
}

pub fn record_alert_deleted(was_verified: bool) {
    if !was_verified {
        metrics::gauge!("alerts_mis_unverified_alerts").decrement(1.0);
    }
}

pub fn increment_tokens_issued() {
    metrics::counter!("alerts_mis_verification_tokens_issued_total").increment(1);
}

/// Only called for the single winning redemption of a token.
pub fn increment_alerts_verified() {
    metrics::counter!("alerts_mis_alerts_verified_total").increment(1);
    metrics::gauge!("alerts_mis_unverified_alerts").decrement(1.0);
}

pub fn increment_verification_rejected(reason: &'static str) {
    metrics::counter!("alerts_mis_verification_rejected_total", "reason" => reason).increment(1);
}
