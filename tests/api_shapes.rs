use chrono::Utc;
use municipal_payments::domain::payment::{
    ApiResponse, Payment, PaymentMethod, PaymentStatus, ProviderData,
};
use municipal_payments::gateway::CallbackPayload;
use uuid::Uuid;

#[test]
fn callback_payload_defaults_missing_client_phone() {
    let payload: CallbackPayload = serde_json::from_value(serde_json::json!({
        "hash": "abc",
        "order_status": "200",
        "unique_id": "PR1",
        "amount": "45000",
        "payment_token": "TOK1",
        "payment_method": "airtel_money",
        "message": "OK"
    }))
    .unwrap();

    assert_eq!(payload.client_phone, None);
    assert_eq!(payload.payment_token, "TOK1");
}

#[test]
fn callback_payload_tolerates_extra_provider_fields() {
    let payload: CallbackPayload = serde_json::from_value(serde_json::json!({
        "hash": "abc",
        "order_status": "200",
        "unique_id": "PR1",
        "amount": "45000",
        "payment_token": "TOK1",
        "payment_method": "airtel_money",
        "message": "OK",
        "status_request": 200,
        "currency": "FCFA"
    }))
    .unwrap();

    assert_eq!(payload.order_status, "200");
}

#[test]
fn success_envelope_omits_error() {
    let value = serde_json::to_value(ApiResponse::ok(serde_json::json!({"paymentId": "p1"}))).unwrap();
    assert_eq!(value["success"], true);
    assert!(value.get("error").is_none());
    assert_eq!(value["data"]["paymentId"], "p1");
}

#[test]
fn error_envelope_omits_data() {
    let value = serde_json::to_value(ApiResponse::err("Payment not found")).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "Payment not found");
    assert!(value.get("data").is_none());
    assert!(value.get("message").is_none());
}

#[test]
fn payment_serializes_with_camel_case_provider_data() {
    let value = serde_json::to_value(sample_payment()).unwrap();

    assert_eq!(value["status"], "pending");
    assert_eq!(value["method"], "airtel_money");
    assert_eq!(value["providerData"]["paymentToken"], "TOK1");
    assert_eq!(value["paymentRequestId"], value["providerData"]["orderId"]);
    // unsettled payment has no paid/receipt timestamps in its wire shape
    assert!(value.get("paidAt").is_none());
    assert!(value.get("receiptSentAt").is_none());
}

#[test]
fn statuses_use_lowercase_wire_names() {
    assert_eq!(serde_json::to_value(PaymentStatus::Paid).unwrap(), "paid");
    assert_eq!(serde_json::to_value(PaymentStatus::Cancelled).unwrap(), "cancelled");
    let parsed: PaymentStatus = serde_json::from_value(serde_json::json!("failed")).unwrap();
    assert_eq!(parsed, PaymentStatus::Failed);
}

fn sample_payment() -> Payment {
    let request_id = Uuid::new_v4();
    let now = Utc::now();
    Payment {
        id: Uuid::new_v4(),
        payment_request_id: request_id,
        operator_id: Uuid::new_v4(),
        operator_name: "Awa Ndong".to_string(),
        amount: 45_000,
        currency: "FCFA".to_string(),
        status: PaymentStatus::Pending,
        method: PaymentMethod::AirtelMoney,
        provider: "mypayga".to_string(),
        provider_data: ProviderData {
            payment_token: "TOK1".to_string(),
            order_id: request_id.to_string(),
            transaction_id: None,
            message: None,
        },
        paid_at: None,
        receipt_sent_at: None,
        created_at: now,
        updated_at: now,
    }
}
