use hmac::{Hmac, Mac};
use municipal_payments::gateway::signature::verify_callback_signature;
use municipal_payments::gateway::CallbackPayload;
use sha2::Sha512;

const SECRET: &str = "test-mypayga-secret";

#[test]
fn accepts_valid_signature() {
    let payload = signed(base_payload());
    assert!(verify_callback_signature(&payload, SECRET));
}

#[test]
fn rejects_tampered_amount() {
    let mut payload = signed(base_payload());
    payload.amount = "1".to_string();
    assert!(!verify_callback_signature(&payload, SECRET));
}

#[test]
fn rejects_tampered_order_status() {
    let mut payload = signed(base_payload());
    payload.order_status = "400".to_string();
    assert!(!verify_callback_signature(&payload, SECRET));
}

#[test]
fn rejects_wrong_secret() {
    let payload = signed(base_payload());
    assert!(!verify_callback_signature(&payload, "another-secret"));
}

#[test]
fn missing_client_phone_hashes_like_empty_string() {
    let mut absent = base_payload();
    absent.client_phone = None;
    let absent = signed(absent);

    let mut empty = base_payload();
    empty.client_phone = Some(String::new());
    let empty = signed(empty);

    assert_eq!(absent.hash, empty.hash);
    assert!(verify_callback_signature(&absent, SECRET));
    assert!(verify_callback_signature(&empty, SECRET));
}

#[test]
fn present_client_phone_changes_the_hash() {
    let without = signed(base_payload());

    let mut with = base_payload();
    with.client_phone = Some("+24107000000".to_string());
    let with = signed(with);

    assert_ne!(without.hash, with.hash);
}

#[test]
fn hex_comparison_ignores_case() {
    let mut payload = signed(base_payload());
    payload.hash = payload.hash.to_uppercase();
    assert!(verify_callback_signature(&payload, SECRET));
}

fn base_payload() -> CallbackPayload {
    CallbackPayload {
        hash: String::new(),
        order_status: "200".to_string(),
        unique_id: "7e7c55b2-54be-4a9e-b212-63adcbb8a051".to_string(),
        amount: "45000".to_string(),
        payment_token: "TOK1".to_string(),
        payment_method: "airtel_money".to_string(),
        message: "OK".to_string(),
        client_phone: None,
    }
}

fn signed(mut payload: CallbackPayload) -> CallbackPayload {
    let data = format!(
        "{}{}{}{}{}{}{}",
        payload.order_status,
        payload.unique_id,
        payload.amount,
        payload.payment_token,
        payload.payment_method,
        payload.message,
        payload.client_phone.as_deref().unwrap_or(""),
    );
    let mut mac = Hmac::<Sha512>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(data.as_bytes());
    payload.hash = hex::encode(mac.finalize().into_bytes());
    payload
}
