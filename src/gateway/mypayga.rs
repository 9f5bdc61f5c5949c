use crate::domain::payment::PROVIDER_NAME;
use crate::gateway::{InitiateOutcome, InitiateRequest, NetworkLookup, PaymentProvider};
use anyhow::Result;

pub struct MyPaygaGateway {
    pub base_url: String,
    pub api_key: String,
    pub country: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl MyPaygaGateway {
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

fn reported_status(v: &serde_json::Value) -> Option<i64> {
    v.get("statusRequest")
        .and_then(serde_json::Value::as_i64)
        .or_else(|| v.get("status").and_then(serde_json::Value::as_i64))
}

fn string_field(v: &serde_json::Value, key: &str) -> Option<String> {
    v.get(key).and_then(serde_json::Value::as_str).map(ToString::to_string)
}

#[async_trait::async_trait]
impl PaymentProvider for MyPaygaGateway {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn initiate_payment(&self, request: InitiateRequest) -> InitiateOutcome {
        let url = format!("{}/pay", self.base_url);
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .json(&request)
            .timeout(self.timeout())
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return InitiateOutcome::failure("gateway timeout"),
            Err(e) => return InitiateOutcome::failure(e.to_string()),
        };

        let body: serde_json::Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => return InitiateOutcome::failure(format!("invalid gateway response: {e}")),
        };

        if reported_status(&body) != Some(200) {
            return InitiateOutcome::failure(
                string_field(&body, "message").unwrap_or_else(|| "Payment initiation failed".to_string()),
            );
        }

        match (string_field(&body, "payment_token"), string_field(&body, "payment_url")) {
            (Some(payment_token), Some(payment_url)) => InitiateOutcome {
                success: true,
                payment_token: Some(payment_token),
                payment_url: Some(payment_url),
                message: string_field(&body, "message"),
                error: None,
            },
            _ => InitiateOutcome::failure("gateway accepted payment without issuing a token"),
        }
    }

    async fn check_payment_status(&self, payment_token: &str) -> Result<serde_json::Value> {
        let url = format!("{}/verify", self.base_url);
        let resp = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str()), ("payment_token", payment_token)])
            .timeout(self.timeout())
            .send()
            .await?;

        Ok(resp.json().await?)
    }

    async fn lookup_network(&self, phone_number: &str) -> Result<NetworkLookup> {
        let url = format!("{}/network", self.base_url);
        let resp = self
            .client
            .get(url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("tel_number", phone_number),
                ("country", self.country.as_str()),
                ("type", "mobile_money"),
            ])
            .timeout(self.timeout())
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;

        if reported_status(&body) == Some(200) {
            Ok(NetworkLookup {
                network: string_field(&body, "network"),
                mobile_money_service: string_field(&body, "mobile_money_svce"),
                mobile_money_code: string_field(&body, "mobile_money_code"),
                error: None,
            })
        } else {
            Ok(NetworkLookup {
                error: Some(
                    string_field(&body, "message").unwrap_or_else(|| "Network detection failed".to_string()),
                ),
                ..NetworkLookup::default()
            })
        }
    }
}
