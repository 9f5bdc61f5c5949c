pub mod config;
pub mod domain {
    pub mod operator;
    pub mod payment;
    pub mod payment_request;
    pub mod principal;
}
pub mod gateway;
pub mod http {
    pub mod handlers {
        pub mod payments;
    }
    pub mod middleware {
        pub mod auth;
        pub mod rate_limit;
    }
}
pub mod lifecycle {
    pub mod transitions;
}
pub mod repo {
    pub mod audit_repo;
    pub mod operators_repo;
    pub mod payment_requests_repo;
    pub mod payments_repo;
}
pub mod service {
    pub mod audit_writer;
    pub mod payment_service;
    pub mod receipt_sender;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub payments_repo: repo::payments_repo::PaymentsRepo,
}
