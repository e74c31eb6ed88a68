// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bounded store of per-session view preferences.
//!
//! Sessions idle for longer than the TTL are dropped, and when the store is
//! full the least recently used session makes room for a new one.

use dashmap::DashMap;
use llm_leaderboard_core::ViewPreferences;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct SessionEntry {
    prefs: ViewPreferences,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    entries: DashMap<String, SessionEntry>,
    max_entries: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preferences of a live session, defaults when unknown or expired.
    pub fn get(&self, session_id: &str) -> ViewPreferences {
        let now = Instant::now();
        match self.entries.get_mut(session_id) {
            Some(mut entry) if now.duration_since(entry.last_seen) <= self.ttl => {
                entry.last_seen = now;
                entry.prefs.clone()
            }
            _ => ViewPreferences::default(),
        }
    }

    /// Apply `update` to a session's preferences and return the result.
    pub fn update(&self, session_id: &str, update: impl FnOnce(&mut ViewPreferences)) -> ViewPreferences {
        let now = Instant::now();
        if !self.entries.contains_key(session_id) {
            self.make_room(now);
        }

        let mut entry = self.entries.entry(session_id.to_string()).or_insert_with(|| SessionEntry {
            prefs: ViewPreferences::default(),
            last_seen: now,
        });
        if now.duration_since(entry.last_seen) > self.ttl {
            entry.prefs = ViewPreferences::default();
        }
        entry.last_seen = now;
        update(&mut entry.prefs);
        entry.prefs.clone()
    }

    fn make_room(&self, now: Instant) {
        if self.entries.len() < self.max_entries {
            return;
        }
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_seen) <= self.ttl);

        while self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().last_seen)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
        debug!(evicted = before - self.entries.len(), "Evicted view sessions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(86_400);

    #[test]
    fn test_unknown_session_gets_defaults() {
        let store = SessionStore::new(4, DAY);
        assert_eq!(store.get("nobody"), ViewPreferences::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let store = SessionStore::new(3, DAY);
        for id in ["a", "b", "c"] {
            store.update(id, ViewPreferences::reset_columns);
            std::thread::sleep(Duration::from_millis(2));
        }
        store.get("a");
        store.update("d", ViewPreferences::reset_columns);

        assert_eq!(store.len(), 3);
        assert!(store.entries.contains_key("a"));
        assert!(!store.entries.contains_key("b"));
        assert!(store.entries.contains_key("d"));
    }

    #[test]
    fn test_expired_sessions_are_dropped() {
        let store = SessionStore::new(2, Duration::ZERO);
        store.update("a", |p| p.set_columns(vec!["rouge_l".into()]));
        std::thread::sleep(Duration::from_millis(2));

        assert_eq!(store.get("a"), ViewPreferences::default());
        store.update("b", ViewPreferences::reset_columns);
        store.update("c", ViewPreferences::reset_columns);
        assert!(store.len() <= 2);
        assert!(!store.entries.contains_key("a"));
    }
}
