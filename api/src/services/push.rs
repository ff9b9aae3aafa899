//! Push notification delivery.
//!
//! Resolves a user's stored Web Push subscriptions and POSTs the payload to
//! each endpoint. Delivery is best-effort: failures are logged and never
//! surfaced to the caller, so a dead endpoint cannot fail the operation that
//! triggered the notification.

use db::models::push_subscription::{self, UserKind};
use once_cell::sync::Lazy;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::time::Duration;

/// Shared HTTP client for all outgoing push requests.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build push HTTP client")
});

#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

/// Service for delivering push notifications to a user's registered devices.
pub struct PushService;

impl PushService {
    /// Sends `payload` to every subscription registered for the user.
    ///
    /// Missing subscriptions and per-endpoint delivery failures are logged
    /// and skipped.
    pub async fn send_to_user(
        db: &DatabaseConnection,
        user_id: &str,
        user_type: UserKind,
        payload: &NotificationPayload,
    ) {
        let subscriptions = match push_subscription::Model::for_user(db, user_id, user_type).await {
            Ok(subs) => subs,
            Err(e) => {
                tracing::warn!(error = %e, user_id, %user_type, "failed to load push subscriptions");
                return;
            }
        };

        if subscriptions.is_empty() {
            tracing::debug!(user_id, %user_type, "no push subscriptions registered");
            return;
        }

        for sub in subscriptions {
            let result = HTTP_CLIENT
                .post(&sub.endpoint)
                .json(payload)
                .send()
                .await;
            match result {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => {
                    // TODO: delete the subscription when the endpoint reports 410 Gone.
                    tracing::warn!(
                        user_id,
                        %user_type,
                        status = %resp.status(),
                        "push endpoint rejected notification"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, user_id, %user_type, "push delivery failed");
                }
            }
        }
    }
}
