use municipal_payments::domain::payment::PaymentStatus;
use municipal_payments::gateway::mock::MockProvider;
use municipal_payments::gateway::{InitiateRequest, PaymentProvider};
use municipal_payments::lifecycle::transitions::{resolve_callback, CallbackResolution};

#[tokio::test]
async fn initiation_issues_token_and_checkout_url() {
    let provider = MockProvider::succeeding_with("TOK1");
    let outcome = provider.initiate_payment(initiate_request()).await;

    assert!(outcome.success);
    assert_eq!(outcome.payment_token.as_deref(), Some("TOK1"));
    assert!(outcome.payment_url.unwrap().contains("TOK1"));
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn rejection_is_a_failure_outcome_not_an_error() {
    let provider = MockProvider {
        behavior: "ALWAYS_REJECT".to_string(),
        token: None,
    };
    let outcome = provider.initiate_payment(initiate_request()).await;

    assert!(!outcome.success);
    assert!(outcome.payment_token.is_none());
    assert_eq!(outcome.error.as_deref(), Some("mock decline"));
}

#[tokio::test]
async fn issued_token_settles_exactly_once() {
    let provider = MockProvider::succeeding_with("TOK1");
    let outcome = provider.initiate_payment(initiate_request()).await;
    assert!(outcome.success);

    // first delivery settles the pending payment
    let first = resolve_callback(PaymentStatus::Pending, "200");
    assert_eq!(
        first,
        CallbackResolution::Transition {
            next: PaymentStatus::Paid
        }
    );

    // aggregator retry for the same token is ignored
    let replay = resolve_callback(PaymentStatus::Paid, "200");
    assert_eq!(
        replay,
        CallbackResolution::AlreadySettled {
            current: PaymentStatus::Paid
        }
    );
}

#[tokio::test]
async fn status_query_echoes_the_token() {
    let provider = MockProvider::succeeding_with("TOK1");
    let status = provider.check_payment_status("TOK1").await.unwrap();
    assert_eq!(status["payment_token"], "TOK1");
    assert_eq!(status["statusRequest"], 200);
}

#[tokio::test]
async fn network_lookup_reports_a_carrier() {
    let provider = MockProvider::succeeding_with("TOK1");
    let lookup = provider.lookup_network("+24107000000").await.unwrap();
    assert_eq!(lookup.mobile_money_service.as_deref(), Some("airtel_money"));
    assert!(lookup.error.is_none());
}

fn initiate_request() -> InitiateRequest {
    InitiateRequest {
        amount: 45_000,
        currency: "FCFA".to_string(),
        description: "Paiement Taxe N° REQ-2024-0001".to_string(),
        success_url: "http://localhost:5174/payment/success?ref=PR1".to_string(),
        error_url: "http://localhost:5174/payment/error?ref=PR1".to_string(),
        callback_url: "http://localhost:3000/payments/callback".to_string(),
        client_email: Some("operator@commune.ga".to_string()),
        client_phone: Some("+24107000000".to_string()),
        unique_id: "PR1".to_string(),
    }
}
