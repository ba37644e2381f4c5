//! Notification delivery over the configured channels.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use clinic_core::error::AppError;
use clinic_core::events::{DomainEvent, EventPayload, NotificationEvent};
use clinic_core::traits::EventPublisher;
use clinic_database::repositories::{NotificationRepository, UserRepository};
use clinic_entity::job::{Job, JobPayload};
use clinic_entity::notification::{DeliveryMethod, Notification};
use clinic_entity::user::User;

use crate::executor::{JobExecutionError, JobHandler, decode_payload};
use crate::mail::{MailTransport, OutgoingMail};

/// Sends one notification through its delivery method.
#[derive(Debug, Clone)]
pub struct DeliveryChannels {
    events: Arc<dyn EventPublisher>,
    mailer: Arc<dyn MailTransport>,
    mail_from: String,
}

impl DeliveryChannels {
    pub fn new(
        events: Arc<dyn EventPublisher>,
        mailer: Arc<dyn MailTransport>,
        mail_from: impl Into<String>,
    ) -> Self {
        Self {
            events,
            mailer,
            mail_from: mail_from.into(),
        }
    }

    /// Deliver `notification` to `recipient`.
    pub async fn deliver(&self, notification: &Notification, recipient: &User) -> Result<(), AppError> {
        match notification.delivery_method {
            DeliveryMethod::InApp => {
                let kind = notification
                    .payload
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("info")
                    .to_string();
                self.events
                    .publish(DomainEvent::new(
                        None,
                        EventPayload::Notification(NotificationEvent::Delivered {
                            notification_id: notification.id,
                            user_id: notification.user_id,
                            title: notification.title.clone(),
                            message: notification.message.clone(),
                            kind,
                        }),
                    ))
                    .await;
                Ok(())
            }
            DeliveryMethod::Email => {
                self.mailer
                    .send(&OutgoingMail {
                        from: self.mail_from.clone(),
                        to: recipient.email.clone(),
                        subject: notification.title.clone(),
                        body: notification.message.clone(),
                    })
                    .await
            }
            DeliveryMethod::Sms => match recipient.phone.as_deref() {
                Some(phone) => {
                    info!(notification_id = %notification.id, phone, "SMS delivery placeholder");
                    Ok(())
                }
                None => Err(AppError::validation(format!(
                    "User {} has no phone number for SMS delivery",
                    recipient.id
                ))),
            },
            DeliveryMethod::Push => {
                info!(
                    notification_id = %notification.id,
                    user_id = %recipient.id,
                    "Push delivery placeholder"
                );
                Ok(())
            }
        }
    }
}

/// Handles `notification_delivery` jobs.
#[derive(Debug)]
pub struct NotificationDeliveryHandler {
    notification_repo: Arc<NotificationRepository>,
    user_repo: Arc<UserRepository>,
    channels: DeliveryChannels,
}

impl NotificationDeliveryHandler {
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        user_repo: Arc<UserRepository>,
        channels: DeliveryChannels,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            channels,
        }
    }
}

#[async_trait]
impl JobHandler for NotificationDeliveryHandler {
    fn job_type(&self) -> &str {
        "notification_delivery"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let JobPayload::NotificationDelivery { notification_id } = decode_payload(job)? else {
            return Err(JobExecutionError::Permanent(format!(
                "Job {} is not a notification delivery",
                job.id
            )));
        };

        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| {
                JobExecutionError::Permanent(format!("Notification {notification_id} not found"))
            })?;
        let recipient = self
            .user_repo
            .find_by_id(notification.user_id)
            .await?
            .ok_or_else(|| {
                JobExecutionError::Permanent(format!("User {} not found", notification.user_id))
            })?;

        match self.channels.deliver(&notification, &recipient).await {
            Ok(()) => {
                self.notification_repo.mark_sent(notification.id).await?;
                info!(
                    notification_id = %notification.id,
                    method = %notification.delivery_method,
                    "Notification delivered"
                );
                Ok(Some(json!({
                    "notification_id": notification.id,
                    "method": notification.delivery_method,
                })))
            }
            Err(e) => {
                let message = e.to_string();
                self.notification_repo
                    .mark_failed(notification.id, &message)
                    .await?;
                Err(JobExecutionError::Transient(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use clinic_entity::notification::{NotificationCategory, NotificationStatus};
    use clinic_entity::user::{UserRole, UserStatus};

    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        events: Mutex<Vec<DomainEvent>>,
        mails: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl EventPublisher for Recorder {
        async fn publish(&self, event: DomainEvent) {
            self.events.lock().await.push(event);
        }
    }

    #[async_trait]
    impl MailTransport for Recorder {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError> {
            self.mails.lock().await.push(mail.clone());
            Ok(())
        }
    }

    fn user(phone: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "ece.kaya@ogr.university.edu.tr".into(),
            password_hash: String::new(),
            full_name: "Ece Kaya".into(),
            institution_number: Some("20210123".into()),
            phone: phone.map(str::to_string),
            department: None,
            role: UserRole::Student,
            status: UserStatus::Active,
            email_verified: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn notification(user: &User, method: DeliveryMethod) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: user.id,
            category: NotificationCategory::Appointment,
            delivery_method: method,
            status: NotificationStatus::Pending,
            title: "Appointment Confirmed".into(),
            message: "Your appointment is confirmed.".into(),
            payload: json!({ "type": "success" }),
            error: None,
            sent_at: None,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    fn channels(recorder: &Arc<Recorder>) -> DeliveryChannels {
        DeliveryChannels::new(recorder.clone(), recorder.clone(), "clinic@university.edu.tr")
    }

    #[tokio::test]
    async fn test_in_app_publishes_on_user_channel() {
        let recorder = Arc::new(Recorder::default());
        let patient = user(None);
        channels(&recorder)
            .deliver(&notification(&patient, DeliveryMethod::InApp), &patient)
            .await
            .unwrap();

        let events = recorder.events.lock().await;
        assert_eq!(events.len(), 1);
        match &events[0].payload {
            EventPayload::Notification(NotificationEvent::Delivered { user_id, kind, .. }) => {
                assert_eq!(*user_id, patient.id);
                assert_eq!(kind, "success");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(recorder.mails.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_email_goes_through_transport() {
        let recorder = Arc::new(Recorder::default());
        let patient = user(None);
        channels(&recorder)
            .deliver(&notification(&patient, DeliveryMethod::Email), &patient)
            .await
            .unwrap();

        let mails = recorder.mails.lock().await;
        assert_eq!(mails.len(), 1);
        assert_eq!(mails[0].to, patient.email);
        assert_eq!(mails[0].subject, "Appointment Confirmed");
        assert_eq!(mails[0].from, "clinic@university.edu.tr");
    }

    #[tokio::test]
    async fn test_sms_needs_a_phone_number() {
        let recorder = Arc::new(Recorder::default());
        let without = user(None);
        assert!(
            channels(&recorder)
                .deliver(&notification(&without, DeliveryMethod::Sms), &without)
                .await
                .is_err()
        );

        let with = user(Some("+90 555 000 0000"));
        assert!(
            channels(&recorder)
                .deliver(&notification(&with, DeliveryMethod::Sms), &with)
                .await
                .is_ok()
        );
    }
}
