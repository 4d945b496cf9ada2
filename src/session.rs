//! session.rs: in-memory per-conversation state.
//!
//! One `Session` per session identifier, created lazily on first reference and
//! kept for the lifetime of the process. The map lock is held only to find or
//! insert an entry; every mutation of one session runs under that session's own
//! mutex, so appends, the detected flag and the callback latch are linearized
//! per session while different sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// One recorded inbound message. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Message from the scammer side with the current time as timestamp.
    pub fn from_scammer(text: impl Into<String>) -> Self {
        Self::new("scammer", text, Utc::now().to_rfc3339())
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub start_time: DateTime<Utc>,
    pub messages: Vec<Message>,
    /// Monotonic: never goes back to false.
    pub detected: bool,
    /// One-shot latch for the intelligence callback.
    pub callback_sent: bool,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now,
            messages: Vec::new(),
            detected: false,
            callback_sent: false,
        }
    }

    fn snapshot(&self, id: &str) -> SessionSnapshot {
        SessionSnapshot {
            session_id: id.to_string(),
            start_time: self.start_time,
            messages: self.messages.clone(),
            detected: self.detected,
            callback_sent: self.callback_sent,
        }
    }
}

/// Point-in-time copy of a session, safe to hand out of the lock.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub detected: bool,
    pub callback_sent: bool,
}

impl SessionSnapshot {
    pub fn total_messages(&self) -> usize {
        self.messages.len()
    }

    pub fn engagement_duration_secs(&self) -> u64 {
        self.engagement_duration_secs_at(Utc::now())
    }

    pub fn engagement_duration_secs_at(&self, now: DateTime<Utc>) -> u64 {
        now.signed_duration_since(self.start_time)
            .num_seconds()
            .max(0) as u64
    }
}

type Entry = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: &str) -> Entry {
        if let Some(e) = self.inner.read().get(id) {
            return Arc::clone(e);
        }
        let mut map = self.inner.write();
        // Another writer may have inserted between the two locks.
        Arc::clone(
            map.entry(id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Session::new(Utc::now())))),
        )
    }

    /// Lazily create the session and return its current state.
    pub fn get_or_create(&self, id: &str) -> SessionSnapshot {
        self.entry(id).lock().snapshot(id)
    }

    /// Existing session only; does not create.
    pub fn snapshot(&self, id: &str) -> Option<SessionSnapshot> {
        let e = self.inner.read().get(id).cloned()?;
        let guard = e.lock();
        Some(guard.snapshot(id))
    }

    pub fn append(&self, id: &str, message: Message) {
        self.entry(id).lock().messages.push(message);
    }

    /// Idempotent; never clears the flag.
    pub fn mark_detected(&self, id: &str) {
        self.entry(id).lock().detected = true;
    }

    /// Append `message` and fold `scam_detected` into the session flag as one step.
    pub fn record_message(&self, id: &str, message: Message, scam_detected: bool) -> SessionSnapshot {
        let entry = self.entry(id);
        let mut s = entry.lock();
        s.messages.push(message);
        s.detected |= scam_detected;
        s.snapshot(id)
    }

    /// Returns true for exactly one caller per session: the one that flips the latch.
    pub fn try_consume_callback_latch(&self, id: &str) -> bool {
        let entry = self.entry(id);
        let mut s = entry.lock();
        if s.callback_sent {
            return false;
        }
        s.callback_sent = true;
        true
    }

    /// Check callback eligibility and consume the latch in one critical section.
    ///
    /// Eligible when the session is detected, the latch is still open, and either
    /// `has_intelligence` holds or at least `min_messages` messages were recorded.
    /// Returns the snapshot taken right after the latch flipped.
    pub fn claim_callback(
        &self,
        id: &str,
        has_intelligence: bool,
        min_messages: usize,
    ) -> Option<SessionSnapshot> {
        let entry = self.entry(id);
        let mut s = entry.lock();
        let eligible = s.detected
            && !s.callback_sent
            && (has_intelligence || s.messages.len() >= min_messages);
        if !eligible {
            return None;
        }
        s.callback_sent = true;
        Some(s.snapshot(id))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn unseen_id_is_created_with_defaults() {
        let store = SessionStore::new();
        assert!(store.snapshot("s1").is_none());
        let s = store.get_or_create("s1");
        assert_eq!(s.session_id, "s1");
        assert!(s.messages.is_empty());
        assert!(!s.detected);
        assert!(!s.callback_sent);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_or_create_keeps_start_time() {
        let store = SessionStore::new();
        let a = store.get_or_create("s1");
        store.append("s1", Message::from_scammer("hello"));
        let b = store.get_or_create("s1");
        assert_eq!(a.start_time, b.start_time);
        assert_eq!(b.total_messages(), 1);
    }

    #[test]
    fn detected_flag_is_monotonic() {
        let store = SessionStore::new();
        store.record_message("s1", Message::from_scammer("pay now"), true);
        let s = store.record_message("s1", Message::from_scammer("hi"), false);
        assert!(s.detected);
        store.mark_detected("s1");
        store.mark_detected("s1");
        assert!(store.get_or_create("s1").detected);
    }

    #[test]
    fn latch_is_consumed_once() {
        let store = SessionStore::new();
        assert!(store.try_consume_callback_latch("s1"));
        assert!(!store.try_consume_callback_latch("s1"));
        assert!(store.get_or_create("s1").callback_sent);
    }

    #[test]
    fn claim_requires_detection() {
        let store = SessionStore::new();
        for _ in 0..5 {
            store.record_message("s1", Message::from_scammer("hello"), false);
        }
        assert!(store.claim_callback("s1", true, 3).is_none());
        assert!(!store.get_or_create("s1").callback_sent);
    }

    #[test]
    fn claim_by_message_count_then_never_again() {
        let store = SessionStore::new();
        store.record_message("s1", Message::from_scammer("a"), true);
        store.record_message("s1", Message::from_scammer("b"), true);
        assert!(store.claim_callback("s1", false, 3).is_none());
        store.record_message("s1", Message::from_scammer("c"), true);
        let snap = store.claim_callback("s1", false, 3).expect("eligible on third");
        assert_eq!(snap.total_messages(), 3);
        assert!(snap.callback_sent);
        store.record_message("s1", Message::from_scammer("d"), true);
        assert!(store.claim_callback("s1", true, 3).is_none());
    }

    #[test]
    fn claim_by_intelligence_on_first_message() {
        let store = SessionStore::new();
        store.record_message("s1", Message::from_scammer("pay john@upi"), true);
        assert!(store.claim_callback("s1", true, 3).is_some());
    }

    #[test]
    fn concurrent_claims_have_one_winner() {
        let store = Arc::new(SessionStore::new());
        store.record_message("s1", Message::from_scammer("x"), true);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.claim_callback("s1", true, 3).is_some())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new();
        store.record_message("a", Message::from_scammer("x"), true);
        store.record_message("b", Message::from_scammer("y"), false);
        assert!(store.get_or_create("a").detected);
        assert!(!store.get_or_create("b").detected);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn duration_is_never_negative() {
        let store = SessionStore::new();
        let s = store.get_or_create("s1");
        assert_eq!(s.engagement_duration_secs_at(s.start_time - Duration::seconds(5)), 0);
        assert_eq!(s.engagement_duration_secs_at(s.start_time + Duration::seconds(42)), 42);
    }
}
