use crate::types::TimeMs;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Smallest surface we require from a persistence backend (browser local
/// storage, a file, an in-memory map).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns `false` when the backend could not persist the value.
    fn put(&mut self, key: &str, value: String) -> bool;
}

/// In-memory backend for tests and headless runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) -> bool {
        self.entries.insert(key.to_string(), value);
        true
    }
}

/// A cleared level's record time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestTimeRecord {
    pub elapsed_ms: TimeMs,
    pub formatted_time: String,
    pub achieved_at: DateTime<Utc>,
}

/// Per-level best times backed by a key-value store. A corrupt stored blob
/// degrades to an empty book (amnesia), never to an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BestTimeBook {
    records: HashMap<String, BestTimeRecord>,
}

impl BestTimeBook {
    pub const STORAGE_KEY: &'static str = "jirai:best-times:v1";

    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            None => Self::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!("best-time store is corrupt, starting over: {err}");
                Self::default()
            }),
        }
    }

    pub fn get(&self, level_name: &str) -> Option<&BestTimeRecord> {
        self.records.get(level_name)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records `elapsed_ms` for `level_name` when it strictly beats the
    /// stored time, or when no record exists yet. Returns whether a new
    /// record was set. A persistence failure is logged and leaves the
    /// previously stored state as it was; it never touches game state.
    pub fn save_best_time(
        &mut self,
        store: &mut dyn KeyValueStore,
        level_name: &str,
        elapsed_ms: TimeMs,
        formatted_time: &str,
        achieved_at: DateTime<Utc>,
    ) -> bool {
        let improved = self
            .records
            .get(level_name)
            .is_none_or(|prev| elapsed_ms < prev.elapsed_ms);
        if !improved {
            return false;
        }

        self.records.insert(
            level_name.to_string(),
            BestTimeRecord {
                elapsed_ms,
                formatted_time: formatted_time.to_string(),
                achieved_at,
            },
        );

        match serde_json::to_string(self) {
            Ok(raw) => {
                if !store.put(Self::STORAGE_KEY, raw) {
                    log::warn!("could not persist best time for {level_name}");
                }
            }
            Err(err) => log::warn!("could not encode best times: {err}"),
        }
        true
    }
}
