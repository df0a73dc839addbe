use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// Outcome tag on an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationStatus {
    Success,
    Failed,
}

/// One checkpoint verification attempt. Records are created exclusively by
/// the verification engine and never mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRecord {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub application_id: String,
    pub visitor_name: String,
    pub id_number: String,
    pub status: VerificationStatus,
    pub message: String,
}

/// Append-only audit trail, iterated newest-first for display.
#[derive(Debug, Default)]
pub struct VerificationLog {
    entries: Mutex<Vec<VerificationRecord>>,
    sequence: AtomicU64,
}

impl VerificationLog {
    pub fn append(
        &self,
        application_id: String,
        visitor_name: String,
        id_number: String,
        status: VerificationStatus,
        message: String,
    ) -> VerificationRecord {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = VerificationRecord {
            id: format!("chk-{sequence:06}"),
            timestamp: Local::now().naive_local(),
            application_id,
            visitor_name,
            id_number,
            status,
            message,
        };

        let mut guard = self.entries.lock().expect("log mutex poisoned");
        guard.insert(0, record.clone());
        record
    }

    /// Newest-first snapshot.
    pub fn entries(&self) -> Vec<VerificationRecord> {
        self.entries.lock().expect("log mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("log mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_orders_newest_first_with_distinct_ids() {
        let log = VerificationLog::default();
        let first = log.append(
            "VS1".to_string(),
            "Ada".to_string(),
            "100".to_string(),
            VerificationStatus::Success,
            "ok".to_string(),
        );
        let second = log.append(
            "VS2".to_string(),
            "Grace".to_string(),
            "200".to_string(),
            VerificationStatus::Failed,
            "denied".to_string(),
        );

        assert_ne!(first.id, second.id);
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].application_id, "VS2");
        assert_eq!(entries[1].application_id, "VS1");
    }
}
