use crate::gateway::{InitiateOutcome, InitiateRequest, NetworkLookup, PaymentProvider};
use anyhow::Result;

/// Deterministic in-process provider for tests and local development.
pub struct MockProvider {
    pub behavior: String,
    pub token: Option<String>,
}

impl MockProvider {
    pub fn succeeding_with(token: &str) -> Self {
        Self {
            behavior: "ALWAYS_SUCCESS".to_string(),
            token: Some(token.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl PaymentProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn initiate_payment(&self, request: InitiateRequest) -> InitiateOutcome {
        match self.behavior.as_str() {
            "ALWAYS_REJECT" => InitiateOutcome::failure("mock decline"),
            "ALWAYS_TIMEOUT" => InitiateOutcome::failure("gateway timeout"),
            _ => {
                let token = self
                    .token
                    .clone()
                    .unwrap_or_else(|| format!("mock_tok_{}", uuid::Uuid::new_v4()));
                InitiateOutcome {
                    success: true,
                    payment_url: Some(format!("https://pay.mock/checkout/{token}")),
                    payment_token: Some(token),
                    message: Some(format!("mock accepted {}", request.unique_id)),
                    error: None,
                }
            }
        }
    }

    async fn check_payment_status(&self, payment_token: &str) -> Result<serde_json::Value> {
        Ok(serde_json::json!({
            "statusRequest": 200,
            "payment_token": payment_token,
            "order_status": "200",
        }))
    }

    async fn lookup_network(&self, _phone_number: &str) -> Result<NetworkLookup> {
        Ok(NetworkLookup {
            network: Some("Airtel".to_string()),
            mobile_money_service: Some("airtel_money".to_string()),
            mobile_money_code: Some("AM".to_string()),
            error: None,
        })
    }
}
