use crate::repo::audit_repo::{AuditEntry, AuditRepo};
use tokio::sync::mpsc;

/// Fire-and-forget handoff to the audit trail. Entries ride a channel to a
/// spawned worker; a failed write is logged and dropped, it never fails the
/// operation that produced it.
#[derive(Clone)]
pub struct AuditWriter {
    sender: mpsc::UnboundedSender<AuditEntry>,
}

impl AuditWriter {
    pub fn spawn(repo: AuditRepo) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<AuditEntry>();
        tokio::spawn(async move {
            while let Some(entry) = receiver.recv().await {
                if let Err(err) = repo.insert(&entry).await {
                    tracing::error!("audit log write failed for {}: {}", entry.resource, err);
                }
            }
        });

        Self { sender }
    }

    pub fn append(&self, entry: AuditEntry) {
        if self.sender.send(entry).is_err() {
            tracing::error!("audit writer channel closed, entry dropped");
        }
    }
}
