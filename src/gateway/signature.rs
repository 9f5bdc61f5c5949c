use crate::gateway::CallbackPayload;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

/// Recomputes the keyed hash over the documented field ordering and compares
/// it against the hash carried in the callback. Pure function of payload and
/// secret; callers must reject the callback before touching any state when
/// this returns false.
pub fn verify_callback_signature(payload: &CallbackPayload, secret: &str) -> bool {
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

    let mut mac = match Hmac::<Sha512>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(data.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    // hex case is not significant; comparison time must not leak a prefix
    let provided = payload.hash.to_lowercase();
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(hash: &str) -> CallbackPayload {
        CallbackPayload {
            hash: hash.to_string(),
            order_status: "200".to_string(),
            unique_id: "req-1".to_string(),
            amount: "45000".to_string(),
            payment_token: "tok-1".to_string(),
            payment_method: "airtel_money".to_string(),
            message: "OK".to_string(),
            client_phone: None,
        }
    }

    fn sign(p: &CallbackPayload, secret: &str) -> String {
        let data = format!(
            "{}{}{}{}{}{}{}",
            p.order_status,
            p.unique_id,
            p.amount,
            p.payment_token,
            p.payment_method,
            p.message,
            p.client_phone.as_deref().unwrap_or(""),
        );
        let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(data.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn verification_is_deterministic() {
        let mut p = payload("");
        p.hash = sign(&p, "s3cret");
        assert!(verify_callback_signature(&p, "s3cret"));
        assert!(verify_callback_signature(&p, "s3cret"));
    }

    #[test]
    fn rejects_foreign_secret() {
        let mut p = payload("");
        p.hash = sign(&p, "s3cret");
        assert!(!verify_callback_signature(&p, "other"));
    }
}
