use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod mypayga;
pub mod signature;

/// Outbound payment initiation request, serialized verbatim as the
/// aggregator's `POST /pay` body.
#[derive(Debug, Clone, Serialize)]
pub struct InitiateRequest {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub success_url: String,
    pub error_url: String,
    pub callback_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    pub unique_id: String,
}

/// Normalized initiation result. Aggregator rejections, transport failures
/// and malformed responses all land in the `success == false` shape; the
/// orchestrator never sees a raw error from initiation.
#[derive(Debug, Clone, Default)]
pub struct InitiateOutcome {
    pub success: bool,
    pub payment_token: Option<String>,
    pub payment_url: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl InitiateOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Mobile-money carrier detection result for a phone number.
#[derive(Debug, Clone, Default)]
pub struct NetworkLookup {
    pub network: Option<String>,
    pub mobile_money_service: Option<String>,
    pub mobile_money_code: Option<String>,
    pub error: Option<String>,
}

/// Asynchronous callback body POSTed by the aggregator after a payment
/// settles. `hash` authenticates the other fields (see [`signature`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub hash: String,
    pub order_status: String,
    pub unique_id: String,
    pub amount: String,
    pub payment_token: String,
    pub payment_method: String,
    pub message: String,
    #[serde(default)]
    pub client_phone: Option<String>,
}

#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn initiate_payment(&self, request: InitiateRequest) -> InitiateOutcome;

    /// Raw status query, used by reconciliation. Failures propagate.
    async fn check_payment_status(&self, payment_token: &str) -> Result<serde_json::Value>;

    /// Carrier detection for method pre-validation. Advisory only.
    async fn lookup_network(&self, phone_number: &str) -> Result<NetworkLookup>;
}
