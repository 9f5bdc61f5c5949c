use municipal_payments::domain::payment::PaymentStatus;
use municipal_payments::lifecycle::transitions::{
    resolve_callback, status_for_order, CallbackResolution,
};

#[test]
fn success_order_status_settles_as_paid() {
    assert_eq!(status_for_order("200"), PaymentStatus::Paid);
}

#[test]
fn non_success_order_status_settles_as_failed() {
    for code in ["0", "201", "400", "ERROR", ""] {
        assert_eq!(status_for_order(code), PaymentStatus::Failed);
    }
}

#[test]
fn pending_payment_moves_to_paid() {
    let resolution = resolve_callback(PaymentStatus::Pending, "200");
    assert_eq!(
        resolution,
        CallbackResolution::Transition {
            next: PaymentStatus::Paid
        }
    );
}

#[test]
fn pending_payment_moves_to_failed() {
    let resolution = resolve_callback(PaymentStatus::Pending, "declined");
    assert_eq!(
        resolution,
        CallbackResolution::Transition {
            next: PaymentStatus::Failed
        }
    );
}

#[test]
fn replayed_callback_is_a_no_op_once_paid() {
    let first = resolve_callback(PaymentStatus::Pending, "200");
    assert!(matches!(first, CallbackResolution::Transition { .. }));

    let replay = resolve_callback(PaymentStatus::Paid, "200");
    assert_eq!(
        replay,
        CallbackResolution::AlreadySettled {
            current: PaymentStatus::Paid
        }
    );
}

#[test]
fn failed_payment_does_not_flip_to_paid() {
    let resolution = resolve_callback(PaymentStatus::Failed, "200");
    assert_eq!(
        resolution,
        CallbackResolution::AlreadySettled {
            current: PaymentStatus::Failed
        }
    );
}

#[test]
fn cancelled_payment_accepts_no_callback() {
    let resolution = resolve_callback(PaymentStatus::Cancelled, "200");
    assert_eq!(
        resolution,
        CallbackResolution::AlreadySettled {
            current: PaymentStatus::Cancelled
        }
    );
}

#[test]
fn terminal_statuses_are_terminal() {
    assert!(!PaymentStatus::Pending.is_terminal());
    assert!(PaymentStatus::Paid.is_terminal());
    assert!(PaymentStatus::Failed.is_terminal());
    assert!(PaymentStatus::Cancelled.is_terminal());
}
