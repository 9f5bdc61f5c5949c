use crate::domain::payment::ApiResponse;
use crate::domain::principal::{Permission, Principal};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

/// Builds the request's [`Principal`] from the identity headers asserted by
/// the upstream token verifier. Token validation itself happens before this
/// service; absent identity means the request never passed it.
pub async fn require_principal(mut request: Request<Body>, next: Next) -> Response {
    let user_id = header_value(&request, "x-auth-user-id");
    let email = header_value(&request, "x-auth-user-email");

    let (user_id, email) = match (user_id, email) {
        (Some(user_id), Some(email)) => (user_id, email),
        _ => return unauthorized(),
    };

    let permissions: Vec<Permission> = header_value(&request, "x-auth-permissions")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| Permission::parse(s.trim()))
        .collect();

    request.extensions_mut().insert(Principal {
        user_id,
        email,
        permissions,
    });
    next.run(request).await
}

fn header_value(request: &Request<Body>, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn unauthorized() -> Response {
    let body = serde_json::to_string(&ApiResponse::err("Authentication required")).unwrap_or_default();
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
