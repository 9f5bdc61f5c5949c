use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus, ProviderData};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

pub struct NewPayment {
    pub id: Uuid,
    pub payment_request_id: Uuid,
    pub operator_id: Uuid,
    pub operator_name: String,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub payment_token: String,
    pub order_id: String,
}

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

const PAYMENT_COLUMNS: &str = "id, payment_request_id, operator_id, operator_name, amount, currency, \
     status, method, provider, payment_token, order_id, transaction_id, provider_message, \
     paid_at, receipt_sent_at, created_at, updated_at";

impl PaymentsRepo {
    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, data: &NewPayment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, payment_request_id, operator_id, operator_name, amount, currency,
                status, method, provider, payment_token, order_id
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                'pending', $7, 'mypayga', $8, $9
            )
            "#,
        )
        .bind(data.id)
        .bind(data.payment_request_id)
        .bind(data.operator_id)
        .bind(&data.operator_name)
        .bind(data.amount)
        .bind(&data.currency)
        .bind(data.method.as_str())
        .bind(&data.payment_token)
        .bind(&data.order_id)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_payment(&r)).transpose()
    }

    /// Callback routing lookup. The row lock serializes concurrent duplicate
    /// deliveries for the same token.
    pub async fn find_by_token_for_update(
        tx: &mut Transaction<'_, Postgres>,
        payment_token: &str,
    ) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_token = $1 FOR UPDATE"
        ))
        .bind(payment_token)
        .fetch_optional(tx.as_mut())
        .await?;

        row.map(|r| row_to_payment(&r)).transpose()
    }

    pub async fn apply_callback_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: PaymentStatus,
        transaction_id: &str,
        message: &str,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET status = $2, transaction_id = $3, provider_message = $4,
                paid_at = COALESCE($5, paid_at), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(transaction_id)
        .bind(message)
        .bind(paid_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn mark_receipt_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE payments SET receipt_sent_at = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Newest-first keyset pagination. An unknown cursor yields an empty page.
    pub async fn list(
        &self,
        limit: i64,
        start_after: Option<Uuid>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments
            WHERE ($2::uuid IS NULL
                   OR (created_at, id) < (SELECT created_at, id FROM payments WHERE id = $2))
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .bind(start_after)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_payment).collect()
    }
}

fn row_to_payment(row: &PgRow) -> Result<Payment> {
    let status: String = row.get("status");
    let method: String = row.get("method");

    Ok(Payment {
        id: row.get("id"),
        payment_request_id: row.get("payment_request_id"),
        operator_id: row.get("operator_id"),
        operator_name: row.get("operator_name"),
        amount: row.get("amount"),
        currency: row.get("currency"),
        status: PaymentStatus::parse(&status)
            .with_context(|| format!("unknown payment status '{status}'"))?,
        method: PaymentMethod::parse(&method)
            .with_context(|| format!("unknown payment method '{method}'"))?,
        provider: row.get("provider"),
        provider_data: ProviderData {
            payment_token: row.get("payment_token"),
            order_id: row.get("order_id"),
            transaction_id: row.get("transaction_id"),
            message: row.get("provider_message"),
        },
        paid_at: row.get("paid_at"),
        receipt_sent_at: row.get("receipt_sent_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
