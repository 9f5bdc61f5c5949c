use crate::domain::payment::{
    ApiResponse, InitiatePaymentRequest, InitiatePaymentResponse, Payment, PaymentStatus, CURRENCY,
};
use crate::domain::principal::Principal;
use crate::gateway::signature::verify_callback_signature;
use crate::gateway::{CallbackPayload, InitiateRequest, PaymentProvider};
use crate::lifecycle::transitions::{resolve_callback, CallbackResolution};
use crate::repo::audit_repo::AuditEntry;
use crate::repo::operators_repo::OperatorsRepo;
use crate::repo::payment_requests_repo::PaymentRequestsRepo;
use crate::repo::payments_repo::{NewPayment, PaymentsRepo};
use crate::service::audit_writer::AuditWriter;
use crate::service::receipt_sender::{ReceiptJob, ReceiptSender};
use axum::http::StatusCode;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub type ApiError = (StatusCode, ApiResponse);

#[derive(Clone)]
pub struct PaymentService {
    pub pool: PgPool,
    pub payments_repo: PaymentsRepo,
    pub payment_requests_repo: PaymentRequestsRepo,
    pub operators_repo: OperatorsRepo,
    pub provider: Arc<dyn PaymentProvider>,
    pub audit_writer: AuditWriter,
    pub receipt_sender: ReceiptSender,
    pub callback_secret: String,
    pub client_app_url: String,
    pub public_api_url: String,
}

impl PaymentService {
    pub async fn initiate(
        &self,
        req: InitiatePaymentRequest,
    ) -> Result<InitiatePaymentResponse, ApiError> {
        if !validate_phone_number(&req.phone_number) {
            return Err(fail(StatusCode::BAD_REQUEST, "Invalid phone number"));
        }

        let request = self
            .payment_requests_repo
            .find_by_id(req.payment_request_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Payment request not found"))?;

        if request.status != PaymentStatus::Pending {
            return Err(fail(StatusCode::BAD_REQUEST, "Payment request already processed"));
        }

        let operator = self
            .operators_repo
            .find_by_id(request.operator_id)
            .await
            .map_err(internal)?;

        // advisory carrier check; a mismatch or lookup failure never blocks
        match self.provider.lookup_network(&req.phone_number).await {
            Ok(lookup) => {
                if let Some(error) = lookup.error {
                    tracing::warn!("carrier lookup rejected: {}", error);
                } else if let Some(service) = lookup.mobile_money_service.as_deref() {
                    if service != req.payment_method.as_str() {
                        tracing::warn!(
                            requested = req.payment_method.as_str(),
                            detected = service,
                            "payment method does not match detected carrier"
                        );
                    }
                }
            }
            Err(err) => tracing::warn!("carrier lookup unavailable: {}", err),
        }

        let outcome = self
            .provider
            .initiate_payment(InitiateRequest {
                amount: request.total_amount,
                currency: CURRENCY.to_string(),
                description: format!("Paiement Taxe N° {}", request.request_number),
                success_url: format!("{}/payment/success?ref={}", self.client_app_url, request.id),
                error_url: format!("{}/payment/error?ref={}", self.client_app_url, request.id),
                callback_url: format!("{}/payments/callback", self.public_api_url),
                client_email: operator.as_ref().and_then(|o| o.email.clone()),
                client_phone: Some(req.phone_number.clone()),
                unique_id: request.id.to_string(),
            })
            .await;

        if !outcome.success {
            return Err(fail(
                StatusCode::BAD_REQUEST,
                outcome.error.as_deref().unwrap_or("Payment initiation failed"),
            ));
        }
        let payment_token = outcome
            .payment_token
            .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "Gateway did not issue a payment token"))?;
        let payment_url = outcome
            .payment_url
            .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "Gateway did not issue a payment URL"))?;

        let payment_id = Uuid::new_v4();
        let operator_name = operator
            .as_ref()
            .map(|o| o.display_name())
            .unwrap_or_else(|| "Unknown operator".to_string());

        let new_payment = NewPayment {
            id: payment_id,
            payment_request_id: request.id,
            operator_id: request.operator_id,
            operator_name,
            amount: request.total_amount,
            currency: CURRENCY.to_string(),
            method: req.payment_method,
            payment_token: payment_token.clone(),
            order_id: request.id.to_string(),
        };

        let mut tx = self.pool.begin().await.map_err(|e| internal(e.into()))?;
        PaymentsRepo::insert_tx(&mut tx, &new_payment).await.map_err(internal)?;
        PaymentRequestsRepo::mark_initiated_tx(&mut tx, request.id, req.payment_method, &payment_token)
            .await
            .map_err(internal)?;
        tx.commit().await.map_err(|e| internal(e.into()))?;

        tracing::info!(
            payment_id = %payment_id,
            payment_request_id = %request.id,
            "payment initiated"
        );

        Ok(InitiatePaymentResponse {
            payment_url,
            payment_id,
        })
    }

    /// Applies an aggregator callback. Signature check precedes every lookup
    /// and write; payment and payment request settle in one transaction;
    /// replays for an already-settled payment change nothing.
    pub async fn handle_callback(&self, payload: CallbackPayload) -> Result<&'static str, ApiError> {
        if !verify_callback_signature(&payload, &self.callback_secret) {
            tracing::error!("rejected callback with invalid signature");
            return Err(fail(StatusCode::UNAUTHORIZED, "Invalid signature"));
        }

        let mut tx = self.pool.begin().await.map_err(|e| internal(e.into()))?;
        let payment = PaymentsRepo::find_by_token_for_update(&mut tx, &payload.payment_token)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                tracing::error!("no payment matches callback token");
                fail(StatusCode::NOT_FOUND, "Payment not found")
            })?;

        match resolve_callback(payment.status, &payload.order_status) {
            CallbackResolution::AlreadySettled { current } => {
                tracing::info!(
                    payment_id = %payment.id,
                    status = current.as_str(),
                    "callback replay ignored"
                );
                Ok("Callback already processed")
            }
            CallbackResolution::Transition { next } => {
                let now = Utc::now();
                let paid_at = (next == PaymentStatus::Paid).then_some(now);

                PaymentsRepo::apply_callback_tx(
                    &mut tx,
                    payment.id,
                    next,
                    &payload.payment_token,
                    &payload.message,
                    paid_at,
                )
                .await
                .map_err(internal)?;
                PaymentRequestsRepo::apply_callback_tx(&mut tx, payment.payment_request_id, next, paid_at)
                    .await
                    .map_err(internal)?;
                tx.commit().await.map_err(|e| internal(e.into()))?;

                let after = settled_snapshot(&payment, next, &payload, paid_at);
                self.audit_writer.append(AuditEntry {
                    actor_id: "system".to_string(),
                    actor_email: "mypayga-callback".to_string(),
                    action: format!("payment.{}", next.as_str()),
                    resource: format!("payments/{}", payment.id),
                    before: serde_json::to_value(&payment).ok(),
                    after: serde_json::to_value(&after).ok(),
                    ip: None,
                    user_agent: None,
                });

                if next == PaymentStatus::Paid {
                    self.receipt_sender.trigger(ReceiptJob {
                        payment_id: payment.id,
                        operator_name: payment.operator_name.clone(),
                        amount: payment.amount,
                    });
                }

                tracing::info!(
                    payment_id = %payment.id,
                    payment_request_id = %payment.payment_request_id,
                    status = next.as_str(),
                    "callback applied"
                );
                Ok("Callback processed successfully")
            }
        }
    }

    pub async fn send_receipt(&self, payment_id: Uuid, principal: &Principal) -> Result<(), ApiError> {
        let payment = self
            .payments_repo
            .find_by_id(payment_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Payment not found"))?;

        if payment.status != PaymentStatus::Paid {
            return Err(fail(StatusCode::BAD_REQUEST, "Cannot send receipt for unpaid payment"));
        }

        let now = Utc::now();
        self.receipt_sender.trigger(ReceiptJob {
            payment_id,
            operator_name: payment.operator_name.clone(),
            amount: payment.amount,
        });
        self.payments_repo
            .mark_receipt_sent(payment_id, now)
            .await
            .map_err(internal)?;

        self.audit_writer.append(AuditEntry {
            actor_id: principal.user_id.clone(),
            actor_email: principal.email.clone(),
            action: "payment.receipt_sent".to_string(),
            resource: format!("payments/{payment_id}"),
            before: None,
            after: Some(serde_json::json!({
                "paymentId": payment_id,
                "receiptSentAt": now,
            })),
            ip: None,
            user_agent: None,
        });

        Ok(())
    }
}

/// After-image of the payment as the callback transaction left it.
fn settled_snapshot(
    payment: &Payment,
    next: PaymentStatus,
    payload: &CallbackPayload,
    paid_at: Option<chrono::DateTime<Utc>>,
) -> Payment {
    let mut after = payment.clone();
    after.status = next;
    after.provider_data.transaction_id = Some(payload.payment_token.clone());
    after.provider_data.message = Some(payload.message.clone());
    after.paid_at = paid_at.or(payment.paid_at);
    after
}

fn validate_phone_number(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (8..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

fn fail(status: StatusCode, error: &str) -> ApiError {
    (status, ApiResponse::err(error))
}

fn internal(e: anyhow::Error) -> ApiError {
    tracing::error!("internal error: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiResponse::err("Internal server error"),
    )
}

#[cfg(test)]
mod tests {
    use super::validate_phone_number;

    #[test]
    fn accepts_national_and_international_forms() {
        assert!(validate_phone_number("+24107000000"));
        assert!(validate_phone_number("07000000"));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(!validate_phone_number("1234567"));
        assert!(!validate_phone_number("+241 07 00 00 00"));
        assert!(!validate_phone_number("call-me"));
        assert!(!validate_phone_number("+1234567890123456"));
    }
}
