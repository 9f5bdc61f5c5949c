use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use municipal_payments::config::AppConfig;
use municipal_payments::gateway::mypayga::MyPaygaGateway;
use municipal_payments::http::handlers::payments;
use municipal_payments::http::middleware::auth::require_principal;
use municipal_payments::http::middleware::rate_limit::{self, RateLimitState};
use municipal_payments::repo::audit_repo::AuditRepo;
use municipal_payments::repo::operators_repo::OperatorsRepo;
use municipal_payments::repo::payment_requests_repo::PaymentRequestsRepo;
use municipal_payments::repo::payments_repo::PaymentsRepo;
use municipal_payments::service::audit_writer::AuditWriter;
use municipal_payments::service::payment_service::PaymentService;
use municipal_payments::service::receipt_sender::ReceiptSender;
use municipal_payments::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let payment_requests_repo = PaymentRequestsRepo { pool: pool.clone() };
    let operators_repo = OperatorsRepo { pool: pool.clone() };
    let audit_writer = AuditWriter::spawn(AuditRepo { pool: pool.clone() });
    let receipt_sender = ReceiptSender::spawn();

    let provider = Arc::new(MyPaygaGateway {
        base_url: cfg.mypayga_api_url.clone(),
        api_key: cfg.mypayga_api_key.clone(),
        country: cfg.mypayga_country.clone(),
        timeout_ms: cfg.gateway_timeout_ms,
        client: reqwest::Client::new(),
    });

    let payment_service = PaymentService {
        pool: pool.clone(),
        payments_repo: payments_repo.clone(),
        payment_requests_repo,
        operators_repo,
        provider,
        audit_writer,
        receipt_sender,
        callback_secret: cfg.mypayga_secret_key.clone(),
        client_app_url: cfg.client_app_url.clone(),
        public_api_url: cfg.public_api_url.clone(),
    };

    let state = AppState {
        payment_service,
        payments_repo,
    };

    let protected_routes = Router::new()
        .route("/payments", get(payments::list_payments))
        .route("/payments/:payment_id", get(payments::get_payment))
        .route("/payments/:payment_id/send-receipt", post(payments::send_receipt))
        .layer(from_fn(require_principal));

    let app = Router::new()
        .route("/health", get(payments::health))
        .route("/payments/initiate", post(payments::initiate_payment))
        .route("/payments/callback", post(payments::payment_callback))
        .merge(protected_routes)
        .layer(from_fn_with_state(
            RateLimitState {
                redis_client: redis::Client::open(cfg.redis_url.clone())?,
                max_per_minute: cfg.rate_limit_per_minute,
            },
            rate_limit::enforce,
        ))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
