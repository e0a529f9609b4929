//! Outcome feed with a fixed lifetime per message.

use chrono::{DateTime, Duration, Utc};
use sim_core::{Notification, Severity};

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    last_id: u64,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl_ms: u64) -> Self {
        let ttl_ms = i64::try_from(ttl_ms).unwrap_or(i64::MAX / 1_000_000);
        Self {
            items: Vec::new(),
            last_id: 0,
            ttl: Duration::milliseconds(ttl_ms),
        }
    }

    /// Record a message and return its id. Ids increase monotonically.
    pub fn push(&mut self, message: String, severity: Severity, now: DateTime<Utc>) -> u64 {
        self.last_id += 1;
        self.items.push(Notification {
            id: self.last_id,
            message,
            severity,
            created_at: now,
        });
        self.last_id
    }

    /// Remove one message. Returns whether it was still active.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop every message whose lifetime has elapsed at `now`.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items.retain(|n| now - n.created_at < ttl);
        before - self.items.len()
    }

    /// Active messages, oldest first.
    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
