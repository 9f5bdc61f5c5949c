use crate::domain::payment::{ApiResponse, InitiatePaymentRequest, PaymentStatus};
use crate::domain::principal::{Permission, Principal};
use crate::gateway::CallbackPayload;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

pub async fn initiate_payment(
    State(state): State<AppState>,
    Json(req): Json<InitiatePaymentRequest>,
) -> impl IntoResponse {
    match state.payment_service.initiate(req).await {
        Ok(resp) => (
            StatusCode::OK,
            Json(ApiResponse::ok_with_message(resp, "Payment initiated successfully")),
        )
            .into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn payment_callback(
    State(state): State<AppState>,
    Json(payload): Json<CallbackPayload>,
) -> impl IntoResponse {
    match state.payment_service.handle_callback(payload).await {
        Ok(message) => (StatusCode::OK, Json(ApiResponse::message_only(message))).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn send_receipt(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    if !principal.has(Permission::PaymentSendReceipt) {
        return forbidden();
    }

    match state.payment_service.send_receipt(payment_id, &principal).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::message_only("Receipt sent successfully")),
        )
            .into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    pub limit: Option<i64>,
    pub start_after: Option<Uuid>,
    pub status: Option<PaymentStatus>,
}

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListPaymentsQuery>,
) -> impl IntoResponse {
    if !principal.has(Permission::PaymentView) {
        return forbidden();
    }

    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    match state
        .payments_repo
        .list(limit, params.start_after, params.status)
        .await
    {
        Ok(payments) => (StatusCode::OK, Json(ApiResponse::ok(payments))).into_response(),
        Err(e) => {
            tracing::error!("failed to list payments: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err("Failed to fetch payments")),
            )
                .into_response()
        }
    }
}

pub async fn get_payment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    if !principal.has(Permission::PaymentView) {
        return forbidden();
    }

    match state.payments_repo.find_by_id(payment_id).await {
        Ok(Some(payment)) => (StatusCode::OK, Json(ApiResponse::ok(payment))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err("Payment not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to fetch payment: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err("Failed to fetch payment")),
            )
                .into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn forbidden() -> axum::response::Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::err("Missing permission")),
    )
        .into_response()
}
