use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ReceiptJob {
    pub payment_id: Uuid,
    pub operator_name: String,
    pub amount: i64,
}

/// Decoupled receipt pipeline. Payment-state correctness never waits on a
/// receipt: jobs are handed off and the worker's failures stay its own.
#[derive(Clone)]
pub struct ReceiptSender {
    sender: mpsc::UnboundedSender<ReceiptJob>,
}

impl ReceiptSender {
    pub fn spawn() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ReceiptJob>();
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                // TODO: render the receipt document and deliver it over the
                // operator's notification channels
                tracing::info!(
                    payment_id = %job.payment_id,
                    operator = %job.operator_name,
                    amount = job.amount,
                    "receipt generation queued"
                );
            }
        });

        Self { sender }
    }

    pub fn trigger(&self, job: ReceiptJob) {
        if self.sender.send(job).is_err() {
            tracing::error!("receipt sender channel closed, job dropped");
        }
    }
}
