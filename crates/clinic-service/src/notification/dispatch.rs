//! Turns a message into notification records and delivery jobs.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use clinic_core::config::notification::NotificationConfig;
use clinic_core::error::AppError;
use clinic_database::repositories::{JobRepository, NotificationRepository};
use clinic_entity::appointment::NotificationMessage;
use clinic_entity::job::{CreateJob, JobPayload, JobPriority};
use clinic_entity::notification::{
    CreateNotification, DeliveryMethod, Notification, NotificationCategory,
};

/// A message addressed to one user.
#[derive(Debug, Clone)]
pub struct OutgoingNotification {
    /// Recipient.
    pub user_id: Uuid,
    /// Category shown in the inbox.
    pub category: NotificationCategory,
    /// Title, body and style.
    pub message: NotificationMessage,
    /// Extra context merged into the stored payload.
    pub context: Value,
}

/// Creates one record per delivery method and enqueues a
/// `notification_delivery` job for each.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    notif_repo: Arc<NotificationRepository>,
    job_repo: Arc<JobRepository>,
    methods: Vec<DeliveryMethod>,
    max_attempts: i32,
}

/// Parse configured method names, dropping unknown ones and duplicates.
pub fn parse_methods(names: &[String]) -> Vec<DeliveryMethod> {
    let mut methods = Vec::new();
    for name in names {
        match name.parse::<DeliveryMethod>() {
            Ok(method) if !methods.contains(&method) => methods.push(method),
            Ok(_) => {}
            Err(e) => warn!(method = %name, error = %e, "Ignoring delivery method"),
        }
    }
    if methods.is_empty() {
        methods.push(DeliveryMethod::InApp);
    }
    methods
}

/// Stored payload: the message style plus caller context.
fn build_payload(outgoing: &OutgoingNotification) -> Value {
    let mut payload = json!({ "type": outgoing.message.kind.as_str() });
    if let (Some(target), Value::Object(extra)) = (payload.as_object_mut(), &outgoing.context) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    payload
}

impl NotificationDispatcher {
    /// Creates a dispatcher from notification configuration.
    pub fn new(
        notif_repo: Arc<NotificationRepository>,
        job_repo: Arc<JobRepository>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            notif_repo,
            job_repo,
            methods: parse_methods(&config.delivery_methods),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Methods every notification is sent through.
    pub fn methods(&self) -> &[DeliveryMethod] {
        &self.methods
    }

    /// Record and queue `outgoing` on every configured method.
    pub async fn dispatch(
        &self,
        outgoing: &OutgoingNotification,
    ) -> Result<Vec<Notification>, AppError> {
        let payload = build_payload(outgoing);
        let mut created = Vec::with_capacity(self.methods.len());

        for method in &self.methods {
            let notification = self
                .notif_repo
                .create(&CreateNotification {
                    user_id: outgoing.user_id,
                    category: outgoing.category,
                    delivery_method: *method,
                    title: outgoing.message.title.clone(),
                    message: outgoing.message.message.clone(),
                    payload: payload.clone(),
                })
                .await?;

            let job = JobPayload::NotificationDelivery {
                notification_id: notification.id,
            };
            self.job_repo
                .create(&CreateJob::from_payload(
                    &job,
                    JobPriority::Normal,
                    self.max_attempts,
                )?)
                .await?;

            debug!(
                notification_id = %notification.id,
                user_id = %outgoing.user_id,
                method = %method,
                "Notification queued"
            );
            created.push(notification);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_entity::appointment::message::fallback_message;

    #[test]
    fn test_parse_methods_dedups_and_skips_unknown() {
        let names = vec![
            "in_app".to_string(),
            "email".to_string(),
            "EMAIL".to_string(),
            "fax".to_string(),
        ];
        assert_eq!(
            parse_methods(&names),
            vec![DeliveryMethod::InApp, DeliveryMethod::Email]
        );
    }

    #[test]
    fn test_parse_methods_never_empty() {
        assert_eq!(parse_methods(&[]), vec![DeliveryMethod::InApp]);
    }

    #[test]
    fn test_payload_carries_type_and_context() {
        let outgoing = OutgoingNotification {
            user_id: Uuid::nil(),
            category: NotificationCategory::Appointment,
            message: fallback_message(),
            context: json!({ "appointment_id": "a1", "status": "confirmed" }),
        };
        let payload = build_payload(&outgoing);
        assert_eq!(payload["type"], "info");
        assert_eq!(payload["status"], "confirmed");
    }
}
