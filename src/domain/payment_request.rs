use crate::domain::payment::{PaymentMethod, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    Whatsapp,
}

/// One billed service line inside a payment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedService {
    pub service_id: Uuid,
    pub service_name: String,
    pub amount: i64,
    pub period: String,
    #[serde(default)]
    pub custom_field_values: serde_json::Value,
}

/// The billable obligation an operator owes. Created by the request-creation
/// flow elsewhere; this service only transitions its status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub id: Uuid,
    pub operator_id: Uuid,
    pub request_number: String,
    pub services: Vec<RequestedService>,
    pub total_amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub notification_channels: Vec<NotificationChannel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
