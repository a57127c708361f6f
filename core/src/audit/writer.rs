use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};

use crate::errors::AuditError;
use crate::types::AuditLogEntry;

const CHANNEL_CAPACITY: usize = 256;

enum AuditMsg {
    Entry(Box<AuditLogEntry>),
    Flush(oneshot::Sender<()>),
}

/// Append-only JSONL audit store. The logger is the sole owner of the
/// on-disk file; appends go through a background writer task so the
/// decision path never blocks on disk.
///
/// Callers must not assume an entry has durably landed until `flush()`
/// returns. Write failures flip the degraded flag and are reported via
/// tracing; they never block or change a decision.
#[derive(Clone)]
pub struct AuditLogger {
    tx: mpsc::Sender<AuditMsg>,
    path: PathBuf,
    degraded: Arc<AtomicBool>,
}

impl AuditLogger {
    /// Verifies the log file is writable, then spawns the writer task.
    pub async fn start(path: impl Into<PathBuf>) -> Result<AuditLogger, AuditError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AuditError::Open {
                        path: parent.display().to_string(),
                        source: e,
                    })?;
            }
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| AuditError::Open {
                path: path.display().to_string(),
                source: e,
            })?;

        let (tx, rx) = mpsc::channel::<AuditMsg>(CHANNEL_CAPACITY);
        let degraded = Arc::new(AtomicBool::new(false));

        tokio::spawn(writer_task(file, rx, degraded.clone()));

        tracing::debug!(
            target: "autoaccept.audit",
            path = %path.display(),
            "audit writer started"
        );

        Ok(AuditLogger { tx, path, degraded })
    }

    /// Queues an entry for append. Failure to queue degrades the logger
    /// instead of failing the caller's decision.
    pub async fn audit(&self, entry: AuditLogEntry) {
        tracing::info!(
            target: "autoaccept.audit",
            operation = %entry.operation,
            decision = %entry.decision,
            risk = %entry.risk_level,
            reason = %entry.reason,
            "audit"
        );
        if self.tx.send(AuditMsg::Entry(Box::new(entry))).await.is_err() {
            self.degraded.store(true, Ordering::Relaxed);
            tracing::error!(
                target: "autoaccept.audit",
                "audit writer closed, entry not persisted"
            );
        }
    }

    /// Resolves once everything queued so far has been written and synced.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(AuditMsg::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// True once any append has failed to persist. Surfaced in status
    /// output so operators notice the degraded state.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Most-recent-first. Malformed lines are skipped, not fatal.
    pub fn get_audit_logs(&self, limit: usize) -> Result<Vec<AuditLogEntry>, AuditError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| AuditError::Read {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let mut entries: Vec<AuditLogEntry> = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditLogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::debug!(
                        target: "autoaccept.audit",
                        error = %e,
                        "skipping malformed audit line"
                    );
                }
            }
        }

        let skip = entries.len().saturating_sub(limit);
        let mut recent: Vec<AuditLogEntry> = entries.into_iter().skip(skip).collect();
        recent.reverse();
        Ok(recent)
    }

    /// Truncates the store. The writer keeps its append handle; O_APPEND
    /// writes land at the new end of file.
    pub fn clear_audit_logs(&self) -> Result<(), AuditError> {
        if !self.path.exists() {
            return Ok(());
        }
        std::fs::write(&self.path, "").map_err(|e| AuditError::Clear {
            path: self.path.display().to_string(),
            source: e,
        })?;
        tracing::info!(target: "autoaccept.audit", "audit logs cleared");
        Ok(())
    }
}

async fn writer_task(
    mut file: tokio::fs::File,
    mut rx: mpsc::Receiver<AuditMsg>,
    degraded: Arc<AtomicBool>,
) {
    while let Some(msg) = rx.recv().await {
        match msg {
            AuditMsg::Entry(entry) => {
                let mut line = match serde_json::to_string(&entry) {
                    Ok(s) => s,
                    Err(e) => {
                        degraded.store(true, Ordering::Relaxed);
                        tracing::error!(
                            target: "autoaccept.audit",
                            error = %e,
                            "failed to serialize audit entry"
                        );
                        continue;
                    }
                };
                line.push('\n');
                // Line-oriented append per entry; a crash between writes
                // leaves earlier entries intact.
                if let Err(e) = file.write_all(line.as_bytes()).await {
                    degraded.store(true, Ordering::Relaxed);
                    tracing::error!(
                        target: "autoaccept.audit",
                        error = %e,
                        "failed to append audit entry"
                    );
                    continue;
                }
                if let Err(e) = file.flush().await {
                    degraded.store(true, Ordering::Relaxed);
                    tracing::error!(
                        target: "autoaccept.audit",
                        error = %e,
                        "failed to flush audit log"
                    );
                    continue;
                }
            }
            AuditMsg::Flush(ack) => {
                if let Err(e) = file.flush().await {
                    degraded.store(true, Ordering::Relaxed);
                    tracing::error!(
                        target: "autoaccept.audit",
                        error = %e,
                        "failed to flush audit log"
                    );
                }
                let _ = ack.send(());
            }
        }
    }

    let _ = file.flush().await;
}
